use std::path::PathBuf;

/// Errors produced by core `labnote` operations.
#[derive(Debug, thiserror::Error)]
pub enum LabnoteError {
    #[error("tab group {index} does not exist ({count} groups open)")]
    GroupOutOfRange { index: usize, count: usize },

    #[error("tab not found in group {group}: {key}")]
    TabNotFound { key: String, group: usize },

    #[error("failed to read tab state: {0}")]
    StateRead(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("failed to write tab state: {0}")]
    StateWrite(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("failed to read config {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("api error: {0}")]
    Api(String),

    #[error("http error: {0}")]
    Http(#[from] Box<ureq::Error>),

    #[error("failed to decode api response: {0}")]
    Decode(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("api base url is not configured")]
    ApiNotConfigured,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ureq::Error> for LabnoteError {
    fn from(err: ureq::Error) -> Self {
        LabnoteError::Http(Box::new(err))
    }
}
