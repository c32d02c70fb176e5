/*
 * Responsibility
 * - Public surface of the HTTP layer (routes() and the request extractors)
 */
pub mod extractors;
pub mod handlers;
mod routes;

pub use routes::routes;
