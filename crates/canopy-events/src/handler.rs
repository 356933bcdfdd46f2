// ABOUTME: Error type returned by event handlers
// ABOUTME: Handler failures are logged by the dispatcher and never abort dispatch

/// Event handler error types
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error("Handler not initialized")]
    NotInitialized,

    #[error("Handler failed to process event: {message}")]
    ProcessingFailed { message: String },

    #[error("Handler internal error: {source}")]
    Internal {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl HandlerError {
    pub fn processing(message: impl Into<String>) -> Self {
        Self::ProcessingFailed {
            message: message.into(),
        }
    }
}
