use atelier_core::error::CoreError;
use atelier_core::routes::Route;

/// Message shown when the session has expired.
pub const SESSION_EXPIRED_MESSAGE: &str = "Your session has expired, please sign in again.";

/// Errors from the admin API client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The backend rejected the bearer token (HTTP 401), or no token is held.
    /// The session has already been cleared when this is returned.
    #[error("session expired")]
    SessionExpired,

    /// The backend rejected the input (4xx with a message or errors map).
    #[error("{message}")]
    Validation { status: u16, message: String },

    /// The requested product or category does not exist.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    /// Any other non-2xx response.
    #[error("API error ({status})")]
    Api {
        status: u16,
        /// Message extracted from the body, if it had one.
        message: Option<String>,
    },

    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The response body was not the JSON we expected.
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    /// A client-side check failed before any request was made.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Reading or writing the stored token failed.
    #[error("token storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type ClientResult<T> = Result<T, ClientError>;

/// How an error is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Global handling: clear token, go to login.
    SessionExpiry,
    /// Inline, next to the form.
    Validation,
    /// Distinct "not found" message, back to the listing.
    NotFound,
    /// Localised fallback text.
    Generic,
}

impl ClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::SessionExpired => ErrorKind::SessionExpiry,
            ClientError::Validation { .. } => ErrorKind::Validation,
            ClientError::Core(CoreError::Validation(_)) => ErrorKind::Validation,
            ClientError::NotFound { .. } => ErrorKind::NotFound,
            ClientError::Core(CoreError::NotFound { .. }) => ErrorKind::NotFound,
            _ => ErrorKind::Generic,
        }
    }

    /// Text to show the user. `fallback` is used when the error carries no
    /// message of its own.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ClientError::SessionExpired => SESSION_EXPIRED_MESSAGE.to_string(),
            ClientError::Validation { message, .. } => message.clone(),
            ClientError::NotFound { entity, .. } => format!("The requested {entity} was not found."),
            ClientError::Core(CoreError::Validation(msg)) => msg.clone(),
            ClientError::Core(CoreError::NotFound { entity, .. }) => {
                format!("The requested {entity} was not found.")
            }
            ClientError::Api {
                message: Some(message),
                ..
            } => message.clone(),
            _ => fallback.to_string(),
        }
    }

    /// Where to navigate after this error, if anywhere.
    pub fn redirect(&self) -> Option<Route> {
        match self.kind() {
            ErrorKind::SessionExpiry => Some(Route::Login),
            ErrorKind::NotFound => match self {
                ClientError::NotFound { entity: "category", .. }
                | ClientError::Core(CoreError::NotFound {
                    entity: "category", ..
                }) => Some(Route::CategoryList),
                _ => Some(Route::ProductList),
            },
            ErrorKind::Validation | ErrorKind::Generic => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_expiry_redirects_to_login() {
        let err = ClientError::SessionExpired;
        assert_eq!(err.kind(), ErrorKind::SessionExpiry);
        assert_eq!(err.redirect(), Some(Route::Login));
        assert_eq!(err.user_message("x"), SESSION_EXPIRED_MESSAGE);
    }

    #[test]
    fn generic_errors_use_fallback() {
        let err = ClientError::Api {
            status: 500,
            message: None,
        };
        assert_eq!(err.kind(), ErrorKind::Generic);
        assert_eq!(err.user_message("Saving failed."), "Saving failed.");
        assert_eq!(err.redirect(), None);

        let err = ClientError::Api {
            status: 500,
            message: Some("Database down".into()),
        };
        assert_eq!(err.user_message("Saving failed."), "Database down");
    }

    #[test]
    fn not_found_routes_back_to_listing() {
        let product = ClientError::NotFound {
            entity: "product",
            id: "9".into(),
        };
        assert_eq!(product.redirect(), Some(Route::ProductList));

        let category = ClientError::Core(CoreError::NotFound {
            entity: "category",
            id: "2".into(),
        });
        assert_eq!(category.kind(), ErrorKind::NotFound);
        assert_eq!(category.redirect(), Some(Route::CategoryList));
    }

    #[test]
    fn client_side_validation_is_inline() {
        let err = ClientError::Core(CoreError::Validation("select at least one category".into()));
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.user_message("x"), "select at least one category");
    }
}
