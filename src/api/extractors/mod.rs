mod user_credential;

pub use user_credential::UserCredential;
