/// Convenience result type used across trailhop.
pub type TrailResult<T> = Result<T, TrailError>;

/// Top-level error taxonomy.
///
/// Journey commands themselves never fail; errors only surface while loading a layout,
/// building a curve, or talking to the notification transport.
#[derive(thiserror::Error, Debug)]
pub enum TrailError {
    /// Invalid user-provided layout data.
    #[error("validation error: {0}")]
    Validation(String),

    /// A curve could not be built or sampled.
    #[error("geometry error: {0}")]
    Geometry(String),

    /// Notification delivery failed after all attempts.
    #[error("delivery error: {0}")]
    Delivery(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TrailError {
    /// Build a [`TrailError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`TrailError::Geometry`] value.
    pub fn geometry(msg: impl Into<String>) -> Self {
        Self::Geometry(msg.into())
    }

    /// Build a [`TrailError::Delivery`] value.
    pub fn delivery(msg: impl Into<String>) -> Self {
        Self::Delivery(msg.into())
    }

    /// Build a [`TrailError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for TrailError {
    fn from(e: serde_json::Error) -> Self {
        Self::serde(e.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
