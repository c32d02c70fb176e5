/*!
 * Authenticated request context
 *
 * Public API:
 * - UserCredential (type + extractor)
 */

mod core;
mod types;

pub use types::UserCredential;
