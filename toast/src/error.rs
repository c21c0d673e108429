use thiserror::Error;

/// All possible error types that may occur while showing toasts or injecting page styles
#[derive(Error, Debug)]
pub enum ToastError {
    #[error("Toast container `{0}` not found")]
    ContainerMissing(String),
    #[error("Unknown toast severity `{0}`. Expected one of info, success or error")]
    UnknownSeverity(String),
    #[error("Page has no style root to receive shared styles")]
    MissingStyleRoot,
    #[error("DOM operation failed\n{0}")]
    Dom(String),
    #[error("Invalid toast configuration\n{0}")]
    Config(#[from] serde_json::Error),
}

impl From<&str> for ToastError {
    fn from(value: &str) -> Self {
        Self::Dom(value.to_owned())
    }
}

impl From<String> for ToastError {
    fn from(value: String) -> Self {
        Self::Dom(value)
    }
}

/// Generic [Result][std::result::Result] type where the error is always [ToastError]
pub type ToastResult<T> = std::result::Result<T, ToastError>;
