use thiserror::Error;

/// Failures while fetching a page from the GraphQL endpoint.
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("graphql transport failure: {message}")]
    Transport { message: String },
    #[error("graphql endpoint returned status {status}: {body}")]
    Api { status: u16, body: String },
    #[error("graphql response with status {status} could not be decoded: {message}")]
    MalformedResponse {
        status: u16,
        body: String,
        message: String,
    },
}

impl HistoryError {
    /// Status code and body when a response was received.
    pub fn response(&self) -> Option<(u16, &str)> {
        match self {
            Self::Transport { .. } => None,
            Self::Api { status, body } | Self::MalformedResponse { status, body, .. } => {
                Some((*status, body.as_str()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::HistoryError;

    #[test]
    fn transport_errors_carry_no_response() {
        let err = HistoryError::Transport {
            message: "connection refused".to_string(),
        };
        assert!(err.response().is_none());
        assert_eq!(
            err.to_string(),
            "graphql transport failure: connection refused"
        );
    }

    #[test]
    fn api_errors_expose_status_and_body() {
        let err = HistoryError::Api {
            status: 502,
            body: "bad gateway".to_string(),
        };
        assert_eq!(err.response(), Some((502, "bad gateway")));
    }
}
