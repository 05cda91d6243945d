use thiserror::Error;

/// Result type for tsgraph operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for tsgraph operations
#[derive(Error, Debug)]
pub enum Error {
    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed analyzer records
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Decoding or encoding of the record stream failed
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Storage related errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// A project declares a sub-project whose config file was never ingested
    #[error("Could not find project for sub-project path {path} (referenced by {project})")]
    UnresolvedProjectReference { project: String, path: String },

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Any other error
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Creates a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Creates a serialization error
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    /// Creates a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Creates the fatal project-reference error
    pub fn unresolved_project_reference(
        project: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self::UnresolvedProjectReference {
            project: project.into(),
            path: path.into(),
        }
    }

    /// Adds context to any error
    pub fn with_context<E>(context: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::WithContext {
            context: context.into(),
            source: Box::new(source),
        }
    }

    /// Whether this error aborts a linking session
    pub fn is_fatal_link_error(&self) -> bool {
        matches!(self, Self::UnresolvedProjectReference { .. })
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::with_context(context, e))
    }
}
