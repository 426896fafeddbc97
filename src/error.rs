use thiserror::Error;

/// Everything that can go wrong when a line is routed to a command.
///
/// Neither variant is fatal: the loop reports it and reads the next line.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DispatchError {
    /// No command is registered under this name.
    #[error("[unknown command]")]
    UnknownCommand(String),

    /// The handler ran (or was about to run) and failed.
    #[error("[error]\n{message}")]
    HandlerFailure { name: String, message: String },
}

impl DispatchError {
    /// Name of the command the error refers to.
    pub fn command(&self) -> &str {
        match self {
            DispatchError::UnknownCommand(name) => name,
            DispatchError::HandlerFailure { name, .. } => name,
        }
    }
}
