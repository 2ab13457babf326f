use std::fmt;

use crate::extract::ExtractError;

pub type RunId = u64;

/// Events delivered to the output sink over the lifetime of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// A debounced query started a new run; any earlier run is now superseded.
    RunStarted { run_id: RunId, query: String },
    /// One lyrics fragment, in page order.
    Fragment { run_id: RunId, text: String },
    /// The run extracted every fragment of its lyrics page.
    RunCompleted { run_id: RunId, fragments: usize },
    /// The run failed and went quiet; the session keeps serving new queries.
    RunContained { run_id: RunId, kind: ErrorKind },
    /// The input source closed and every debounced query has been dispatched.
    InputExhausted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for FetchError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    RedirectLimitExceeded,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    UnsupportedContentType { content_type: String },
    Cancelled,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::RedirectLimitExceeded => write!(f, "redirect limit exceeded"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::UnsupportedContentType { content_type } => {
                write!(f, "unsupported content type {content_type}")
            }
            FailureKind::Cancelled => write!(f, "cancelled"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}

/// Coarse classification of a pipeline failure, carried in [`EngineEvent::RunContained`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Transport,
    Parse,
    NoMatch,
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("transport error: {0}")]
    Transport(FetchError),
    #[error("parse error: {0}")]
    Parse(#[from] ExtractError),
    #[error("no element matched `{selector}`")]
    NoMatch { selector: String },
    #[error("run cancelled")]
    Cancelled,
}

impl PipelineError {
    /// `None` for cancellation, which is not a failure.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            PipelineError::Transport(_) => Some(ErrorKind::Transport),
            PipelineError::Parse(_) => Some(ErrorKind::Parse),
            PipelineError::NoMatch { .. } => Some(ErrorKind::NoMatch),
            PipelineError::Cancelled => None,
        }
    }
}

impl From<FetchError> for PipelineError {
    fn from(err: FetchError) -> Self {
        if err.kind == FailureKind::Cancelled {
            PipelineError::Cancelled
        } else {
            PipelineError::Transport(err)
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to build http client: {0}")]
    Client(FetchError),
    #[error("failed to start runtime: {0}")]
    Runtime(#[from] std::io::Error),
}
