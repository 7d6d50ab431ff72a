//! Error handling module for the client.
//!
//! Every failure in the client is recoverable: it leaves prior in-memory state
//! intact and is surfaced to the user as a dismissible notification.

/// Error codes as constants to avoid stringly-typed errors.
pub mod codes {
    pub const TRANSPORT: &str = "TRANSPORT";
    pub const REJECTED: &str = "REJECTED";
    pub const MALFORMED: &str = "MALFORMED";
    pub const NO_SESSION: &str = "NO_SESSION";
    pub const NOT_PERMITTED: &str = "NOT_PERMITTED";
    pub const BUSY: &str = "BUSY";
    pub const STORAGE: &str = "STORAGE";
}

/// Broad failure class, used to pick how a failure is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Network unreachable, timeout or an unreadable response.
    Connection,
    /// The service understood the request and refused it.
    Rejected,
    /// A local precondition failed; nothing was sent.
    Precondition,
    /// Durable client storage failed.
    Storage,
}

/// Client error type.
#[derive(Debug)]
pub enum ClientError {
    /// Transport failure (connect, timeout, broken body stream)
    Transport(String),
    /// Non-2xx response from a service
    Rejected { status: u16, message: String },
    /// Response body did not have the expected shape
    Malformed(String),
    /// Operation requires a logged-in session
    NoSession,
    /// Session lacks the capability the operation needs
    NotPermitted(String),
    /// Another mutation of the same kind is still in flight
    Busy(&'static str),
    /// Durable storage error
    Storage(String),
}

impl ClientError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            ClientError::Transport(_) => codes::TRANSPORT,
            ClientError::Rejected { .. } => codes::REJECTED,
            ClientError::Malformed(_) => codes::MALFORMED,
            ClientError::NoSession => codes::NO_SESSION,
            ClientError::NotPermitted(_) => codes::NOT_PERMITTED,
            ClientError::Busy(_) => codes::BUSY,
            ClientError::Storage(_) => codes::STORAGE,
        }
    }

    /// Get the failure class for this error.
    ///
    /// Malformed responses are grouped with transport failures.
    pub fn kind(&self) -> FailureKind {
        match self {
            ClientError::Transport(_) | ClientError::Malformed(_) => FailureKind::Connection,
            ClientError::Rejected { .. } => FailureKind::Rejected,
            ClientError::NoSession | ClientError::NotPermitted(_) | ClientError::Busy(_) => {
                FailureKind::Precondition
            }
            ClientError::Storage(_) => FailureKind::Storage,
        }
    }

    /// Get the error message.
    pub fn message(&self) -> String {
        match self {
            ClientError::Transport(msg) => msg.clone(),
            ClientError::Rejected { message, .. } => message.clone(),
            ClientError::Malformed(msg) => msg.clone(),
            ClientError::NoSession => "Login required".to_string(),
            ClientError::NotPermitted(msg) => msg.clone(),
            ClientError::Busy(operation) => format!("{} already in progress", operation),
            ClientError::Storage(msg) => msg.clone(),
        }
    }

    /// Text for the notification shown to the player.
    pub fn user_message(&self) -> String {
        match self.kind() {
            FailureKind::Connection => "Ошибка подключения".to_string(),
            FailureKind::Rejected => self.message(),
            FailureKind::Precondition => match self {
                ClientError::NoSession => "Войдите в аккаунт".to_string(),
                ClientError::Busy(_) => "Подождите завершения операции".to_string(),
                _ => "Недостаточно прав".to_string(),
            },
            FailureKind::Storage => "Ошибка локального хранилища".to_string(),
        }
    }

    /// Whether the service refused the request with the given status.
    pub fn is_rejected_with(&self, code: u16) -> bool {
        matches!(self, ClientError::Rejected { status, .. } if *status == code)
    }
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error_code(), self.message())
    }
}

impl std::error::Error for ClientError {}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        tracing::warn!("HTTP error: {:?}", err);
        if err.is_decode() {
            ClientError::Malformed(format!("Malformed response: {}", err))
        } else {
            ClientError::Transport(format!("Connection error: {}", err))
        }
    }
}

impl From<sqlx::Error> for ClientError {
    fn from(err: sqlx::Error) -> Self {
        tracing::error!("Storage error: {:?}", err);
        ClientError::Storage(format!("Storage error: {}", err))
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        tracing::warn!("JSON error: {:?}", err);
        ClientError::Malformed(format!("JSON error: {}", err))
    }
}
