//! Error handling for action dispatch
//!
//! Every failure inside the dispatcher is recovered locally: it is turned
//! into a `warn` command for the same client and the connection stays open.
//! Nothing here is ever surfaced as a transport failure.

use sdui_types::Command;
use thiserror::Error;

/// Recoverable failure while resolving or running an action.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ActionError {
    #[error("No action parameter.")]
    MissingAction,

    #[error("No handler for action: {action} in app: {app}.")]
    UnknownAction { action: String, app: String },

    #[error("Invalid message format: {0}")]
    MalformedMessage(String),

    #[error("No panel builder registered: {kind}")]
    UnknownBuilder { kind: String },

    #[error("Invalid value for '{field}': {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Action '{action}' failed unexpectedly.")]
    HandlerPanicked { action: String },
}

impl ActionError {
    pub fn invalid_input(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ActionError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// The `warn` command reporting this error to the client.
    pub fn into_command(self) -> Command {
        Command::warn(self.to_string())
    }
}

impl From<ActionError> for Command {
    fn from(error: ActionError) -> Self {
        error.into_command()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_action_names_action_and_app() {
        let command = ActionError::UnknownAction {
            action: "fly".into(),
            app: "trek".into(),
        }
        .into_command();
        assert_eq!(
            command,
            Command::warn("No handler for action: fly in app: trek.")
        );
    }

    #[test]
    fn test_unknown_builder_names_kind() {
        let command: Command = ActionError::UnknownBuilder {
            kind: "gallery".into(),
        }
        .into();
        assert_eq!(command, Command::warn("No panel builder registered: gallery"));
    }
}
