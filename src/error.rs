use thiserror::Error;

pub type Result<T> = std::result::Result<T, ServiceError>;

/// Failures raised by the collaborators a service owns (registry, tracer) and
/// by the configuration layer.
///
/// None of these abort a run: construction failures leave the handle absent
/// and teardown failures are logged by the caller that closes the handle.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{component} unavailable: {message}")]
    Unavailable {
        component: &'static str,
        message: String,
    },

    #[error("failed to close {component}: {message}")]
    Close {
        component: &'static str,
        message: String,
    },

    #[error("invalid value for {key}: {message}")]
    InvalidConfig { key: String, message: String },
}

impl ServiceError {
    pub fn unavailable(component: &'static str, message: impl Into<String>) -> Self {
        Self::Unavailable {
            component,
            message: message.into(),
        }
    }

    pub fn close(component: &'static str, message: impl Into<String>) -> Self {
        Self::Close {
            component,
            message: message.into(),
        }
    }

    pub fn invalid_config(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            key: key.into(),
            message: message.into(),
        }
    }
}
