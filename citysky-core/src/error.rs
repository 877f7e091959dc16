use reqwest::StatusCode;

/// Shown when a submit is attempted with a blank query.
pub const EMPTY_QUERY_MESSAGE: &str = "Please enter a valid city name.";

/// Shown when a weather lookup fails without a service-supplied message.
pub const GENERIC_LOOKUP_MESSAGE: &str = "City not found";

/// Errors produced along the lookup path.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("{}", EMPTY_QUERY_MESSAGE)]
    EmptyQuery,

    #[error("service responded with status {status}: {}", .message.as_deref().unwrap_or("<no message>"))]
    Service {
        status: StatusCode,
        message: Option<String>,
    },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected response: {0}")]
    Parse(String),
}

impl LookupError {
    /// The text surfaced to the user for a failed weather lookup.
    pub fn user_message(&self) -> String {
        match self {
            LookupError::EmptyQuery => EMPTY_QUERY_MESSAGE.to_string(),
            LookupError::Service { message: Some(message), .. } if !message.is_empty() => {
                message.clone()
            }
            _ => GENERIC_LOOKUP_MESSAGE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_message_is_preferred() {
        let err = LookupError::Service {
            status: StatusCode::NOT_FOUND,
            message: Some("city not found".into()),
        };
        assert_eq!(err.user_message(), "city not found");
        assert!(err.to_string().contains("404"));
    }

    #[test]
    fn falls_back_to_generic_message() {
        let err = LookupError::Service { status: StatusCode::BAD_GATEWAY, message: None };
        assert_eq!(err.user_message(), GENERIC_LOOKUP_MESSAGE);

        let err = LookupError::Service {
            status: StatusCode::BAD_REQUEST,
            message: Some(String::new()),
        };
        assert_eq!(err.user_message(), GENERIC_LOOKUP_MESSAGE);

        let err = LookupError::Parse("no condition entries".into());
        assert_eq!(err.user_message(), GENERIC_LOOKUP_MESSAGE);
    }

    #[test]
    fn empty_query_message() {
        assert_eq!(LookupError::EmptyQuery.user_message(), "Please enter a valid city name.");
        assert_eq!(LookupError::EmptyQuery.to_string(), EMPTY_QUERY_MESSAGE);
    }
}
