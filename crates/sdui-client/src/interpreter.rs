//! Command interpreter
//!
//! Replays a command array against a [`ClientView`], strictly in order.
//! Handlers are looked up by the `command` field; a missing field, an
//! unknown name or a malformed payload is recorded as a diagnostic and the
//! rest of the array still runs.

use std::collections::BTreeMap;

use sdui_types::Command;
use serde_json::Value;

use crate::error::ClientError;
use crate::view::ClientView;

pub type CommandHandler = Box<dyn Fn(&mut ClientView, &Value) + Send + Sync>;

pub struct Interpreter {
    handlers: BTreeMap<String, CommandHandler>,
}

impl std::fmt::Debug for Interpreter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interpreter")
            .field("handlers", &self.names())
            .finish()
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::standard()
    }
}

impl Interpreter {
    /// No handlers at all.
    pub fn empty() -> Self {
        Self {
            handlers: BTreeMap::new(),
        }
    }

    /// Handlers for every command the bundled apps emit.
    pub fn standard() -> Self {
        let mut interpreter = Self::empty();
        for name in [
            "warn",
            "log",
            "show-status",
            "clear-panel",
            "show-panel",
            "debug",
            "show-trek-welcome",
            "show-trek-info",
        ] {
            interpreter.register(name, apply_typed);
        }
        interpreter
    }

    pub fn register<F>(&mut self, name: impl Into<String>, handler: F)
    where
        F: Fn(&mut ClientView, &Value) + Send + Sync + 'static,
    {
        self.handlers.insert(name.into(), Box::new(handler));
    }

    pub fn names(&self) -> Vec<&str> {
        self.handlers.keys().map(String::as_str).collect()
    }

    pub fn interpret(&self, view: &mut ClientView, commands: &[Value]) {
        for (index, command) in commands.iter().enumerate() {
            match command.get("command").and_then(Value::as_str) {
                Some(name) => match self.handlers.get(name) {
                    Some(handler) => handler(view, command),
                    None => view.warn(format!("Unknown command: {}", name)),
                },
                None => view.warn(format!("Command {} has no command field", index)),
            }
        }
    }

    /// Parse one inbound message (a JSON command array) and replay it.
    /// Returns the number of commands in the array.
    pub fn interpret_text(&self, view: &mut ClientView, text: &str) -> Result<usize, ClientError> {
        let commands: Vec<Value> = serde_json::from_str(text)?;
        self.interpret(view, &commands);
        Ok(commands.len())
    }

    pub fn interpret_commands(&self, view: &mut ClientView, commands: &[Command]) {
        let values: Vec<Value> = commands
            .iter()
            .filter_map(|c| serde_json::to_value(c).ok())
            .collect();
        self.interpret(view, &values);
    }
}

fn apply_typed(view: &mut ClientView, value: &Value) {
    let command: Command = match serde_json::from_value(value.clone()) {
        Ok(command) => command,
        Err(e) => {
            let name = value.get("command").and_then(Value::as_str).unwrap_or("?");
            view.warn(format!("Malformed {} command: {}", name, e));
            return;
        }
    };

    match command {
        Command::Warn { message } => view.warn(format!("Server Warning: {}", message)),
        Command::Log { message } => view.info(format!("Server Info: {}", message)),
        Command::ShowStatus { instance } => {
            view.info(format!("show-status: {}", instance));
            view.set_instance(instance);
        }
        Command::ClearPanel => view.clear_panel(),
        Command::ShowPanel { steps } => view.show_panel(&steps),
        Command::Debug { data } => view.info(format!("Server debug: {}", data)),
        Command::ShowTrekWelcome { message } => view.set_console(message),
        Command::ShowTrekInfo {
            is_active,
            stardate,
            status,
            course,
        } => {
            let text = if is_active {
                format!(
                    "Stardate {}\n{}\nCourse: dir {}, warp {}",
                    stardate, status, course.dir, course.warp
                )
            } else {
                status
            };
            view.set_console(text);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::DiagnosticLevel;
    use serde_json::json;

    #[test]
    fn test_unknown_command_does_not_stop_replay() {
        let interpreter = Interpreter::standard();
        let mut view = ClientView::standard();
        interpreter.interpret(
            &mut view,
            &[
                json!({"command": "teleport"}),
                json!({"message": "no name"}),
                json!({"command": "show-status", "instance": "s1"}),
            ],
        );
        assert_eq!(view.instance(), Some("s1"));
        let warnings: Vec<_> = view
            .diagnostics()
            .iter()
            .filter(|d| d.level == DiagnosticLevel::Warn)
            .map(|d| d.message.as_str())
            .collect();
        assert_eq!(
            warnings,
            vec!["Unknown command: teleport", "Command 1 has no command field"]
        );
    }

    #[test]
    fn test_malformed_payload_is_diagnosed() {
        let interpreter = Interpreter::standard();
        let mut view = ClientView::standard();
        interpreter.interpret(&mut view, &[json!({"command": "show-panel", "steps": 3})]);
        assert!(view.diagnostics()[0].message.starts_with("Malformed show-panel"));
    }

    #[test]
    fn test_custom_handler() {
        let mut interpreter = Interpreter::empty();
        interpreter.register("beep", |view, _| view.info("beep"));
        let mut view = ClientView::standard();
        interpreter.interpret(&mut view, &[json!({"command": "beep"})]);
        assert_eq!(view.diagnostics()[0].message, "beep");
    }

    #[test]
    fn test_interpret_text_rejects_non_arrays() {
        let interpreter = Interpreter::standard();
        let mut view = ClientView::standard();
        assert!(interpreter.interpret_text(&mut view, "{\"command\":\"warn\"}").is_err());
        assert_eq!(
            interpreter
                .interpret_text(&mut view, "[{\"command\":\"clear-panel\"}]")
                .unwrap(),
            1
        );
        assert!(!view.is_content_visible());
    }

    #[test]
    fn test_trek_info_goes_to_console() {
        let interpreter = Interpreter::standard();
        let mut view = ClientView::standard();
        interpreter.interpret(
            &mut view,
            &[json!({
                "command": "show-trek-info",
                "isActive": false,
                "stardate": "",
                "status": "No game in progress.",
                "course": {"dir": 1.0, "warp": 0.01}
            })],
        );
        assert_eq!(view.console_text(), "No game in progress.");
    }
}
