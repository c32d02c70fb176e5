use oauth2::{ErrorResponse, RequestTokenError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OAuthError {
    /// The credential expired and carries no refresh token.
    #[error("credential expired and cannot be refreshed")]
    Expired,

    #[error("token request failed: {0}")]
    TokenEndpoint(String),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}

impl<RE, TE> From<RequestTokenError<RE, TE>> for OAuthError
where
    RE: std::error::Error + 'static,
    TE: ErrorResponse + 'static,
{
    fn from(err: RequestTokenError<RE, TE>) -> Self {
        let message = match err {
            RequestTokenError::ServerResponse(res) => format!("error response {res:?}"),
            RequestTokenError::Request(e) => format!("request error: {e}"),
            RequestTokenError::Parse(e, body) => {
                format!("{e}: {}", String::from_utf8_lossy(&body))
            }
            RequestTokenError::Other(message) => message,
        };
        OAuthError::TokenEndpoint(message)
    }
}

#[cfg(test)]
mod tests {
    use oauth2::HttpClientError;
    use oauth2::basic::BasicErrorResponse;

    use super::*;

    #[test]
    fn token_errors_keep_their_detail() {
        let err: OAuthError =
            RequestTokenError::<HttpClientError<reqwest::Error>, BasicErrorResponse>::Other(
                "unexpected response Content-Type".into(),
            )
            .into();

        match err {
            OAuthError::TokenEndpoint(message) => {
                assert_eq!(message, "unexpected response Content-Type")
            }
            other => panic!("expected token endpoint error, got {other:?}"),
        }
    }
}
