use snafu::Snafu;

/// Coarse failure class the widget uses to pick a fallback message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// The backend answered with a non-success status.
    Backend,
    /// No usable response was obtained.
    Transport,
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum TransportError {
    #[snafu(display("base url '{base_url}' is not an http(s) address on `{stage}`"))]
    InvalidBaseUrl {
        stage: &'static str,
        base_url: String,
    },
    #[snafu(display("failed to build http client on `{stage}`: {source}"))]
    BuildClient {
        stage: &'static str,
        source: reqwest::Error,
    },
    #[snafu(display("{endpoint} returned status {status} on `{stage}`"))]
    Backend {
        stage: &'static str,
        endpoint: String,
        status: u16,
    },
    #[snafu(display("{endpoint} is unreachable on `{stage}`: {source}"))]
    Unreachable {
        stage: &'static str,
        endpoint: String,
        #[snafu(source(from(reqwest::Error, boxed)))]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    #[snafu(display("failed to decode reply from {endpoint} on `{stage}`: {source}"))]
    DecodeReply {
        stage: &'static str,
        endpoint: String,
        #[snafu(source(from(reqwest::Error, boxed)))]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl TransportError {
    /// Classifies the error for user-facing fallback selection.
    ///
    /// A body that cannot be decoded is treated like a lost connection.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Backend { .. } => FailureKind::Backend,
            Self::InvalidBaseUrl { .. }
            | Self::BuildClient { .. }
            | Self::Unreachable { .. }
            | Self::DecodeReply { .. } => FailureKind::Transport,
        }
    }

    pub fn stage(&self) -> &'static str {
        match self {
            Self::InvalidBaseUrl { stage, .. }
            | Self::BuildClient { stage, .. }
            | Self::Backend { stage, .. }
            | Self::Unreachable { stage, .. }
            | Self::DecodeReply { stage, .. } => *stage,
        }
    }
}

pub type TransportResult<T> = Result<T, TransportError>;

fn boxed(source: reqwest::Error) -> Box<dyn std::error::Error + Send + Sync> {
    Box::new(source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_failures_are_backend_kind() {
        let error = TransportError::Backend {
            stage: "chat-status",
            endpoint: "http://localhost/api/chat".to_string(),
            status: 500,
        };

        assert_eq!(error.kind(), FailureKind::Backend);
        assert_eq!(error.stage(), "chat-status");
        assert!(error.to_string().contains("500"));
    }

    #[test]
    fn unreachable_and_decode_failures_are_transport_kind() {
        let unreachable = TransportError::Unreachable {
            stage: "chat-send",
            endpoint: "http://localhost/api/chat".to_string(),
            source: std::io::Error::other("connection refused").into(),
        };
        let decode = TransportError::DecodeReply {
            stage: "chat-decode",
            endpoint: "http://localhost/api/chat".to_string(),
            source: std::io::Error::other("expected value").into(),
        };

        assert_eq!(unreachable.kind(), FailureKind::Transport);
        assert_eq!(decode.kind(), FailureKind::Transport);
    }
}
