/*
 * Responsibility
 * - The authenticated-request context as handlers see it
 * - The authorization gate produces it and stores it in request extensions;
 *   handlers receive it and pass it explicitly to the forwarder
 */

use crate::services::credential::Credential;

/// Credential admitted by the authorization gate for this request.
///
/// Immutable once produced; there is no way to swap the credential after the gate ran.
#[derive(Debug, Clone)]
pub struct UserCredential(Credential);

impl UserCredential {
    pub fn new(credential: Credential) -> Self {
        Self(credential)
    }

    pub fn credential(&self) -> &Credential {
        &self.0
    }
}
