/// Convenience result type used across trackmap.
pub type TrackmapResult<T> = Result<T, TrackmapError>;

/// Top-level error taxonomy used by the rendering pipeline.
#[derive(thiserror::Error, Debug)]
pub enum TrackmapError {
    /// Canvas or tile dimensions outside the supported range.
    #[error("invalid dimensions: {0}")]
    InvalidDimensions(String),

    /// Malformed tile or marker image bytes.
    #[error("decode error: {0}")]
    Decode(String),

    /// Filesystem failure while writing output or reading inputs.
    #[error("io error: {context}")]
    Io {
        /// What was being attempted.
        context: String,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },

    /// Conflicting or out-of-range style and crop options.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// Errors when deserializing configuration or job files.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TrackmapError {
    /// Build a [`TrackmapError::InvalidDimensions`] value.
    pub fn invalid_dimensions(msg: impl Into<String>) -> Self {
        Self::InvalidDimensions(msg.into())
    }

    /// Build a [`TrackmapError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`TrackmapError::Io`] value.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Build a [`TrackmapError::InvalidConfig`] value.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Build a [`TrackmapError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
