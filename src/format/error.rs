use thiserror::Error;

/// Failure while compiling, executing or writing a format template
#[derive(Debug, Error)]
pub enum FormatError {
    /// The template text could not be parsed
    #[error("template: {position}: {message}")]
    Syntax { position: usize, message: String },

    /// The template engine rejected the template or failed while executing it
    #[error("{0}")]
    Engine(#[from] minijinja::Error),

    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

impl FormatError {
    pub(crate) fn syntax(position: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            position,
            message: message.into(),
        }
    }
}
