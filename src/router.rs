use crate::command::Command;
use crate::error::DispatchError;
use log::{debug, warn};
use std::any::Any;
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};

/// Column width the command names are padded to in [`CommandRouter::help_text`].
pub const NAME_WIDTH: usize = 15;

/// Name-keyed registry of commands.
///
/// Commands are kept in registration order for the help listing. The router is
/// filled during setup and only read while the loop runs.
///
/// Example
/// ```
/// use cmdrouter::{Command, CommandRouter, DispatchError};
///
/// let mut router = CommandRouter::new();
/// router.register(Command::new("greet", |argv: &[String]| {
///     println!("hello {}", argv.join(" "));
///     Ok(())
/// }).description("say hi"));
///
/// assert!(router.dispatch("greet", &["world".to_string()]).is_ok());
/// assert_eq!(
///     router.dispatch("nope", &[]),
///     Err(DispatchError::UnknownCommand("nope".to_string()))
/// );
/// ```
#[derive(Debug, Default)]
pub struct CommandRouter {
    commands: Vec<Command>,
    index: HashMap<String, usize>,
}

impl CommandRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `command` under its name.
    ///
    /// Registering a name that is already present replaces the old command in
    /// place: it keeps its position in the help listing and the old handler is
    /// dropped.
    pub fn register(&mut self, command: Command) -> &mut Self {
        match self.index.get(command.name()) {
            Some(&slot) => {
                warn!("replacing already registered command `{}`", command.name());
                self.commands[slot] = command;
            }
            None => {
                debug!("registering command `{}`", command.name());
                self.index.insert(command.name().to_string(), self.commands.len());
                self.commands.push(command);
            }
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&Command> {
        self.index.get(name).map(|&slot| &self.commands[slot])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Registered commands in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Command> {
        self.commands.iter()
    }

    /// Run the command registered under `name` with `argv`.
    ///
    /// Whatever the handler does (returning an error, rejecting the argument
    /// count, panicking) ends up as [`DispatchError::HandlerFailure`]; nothing
    /// escapes to the caller's control flow.
    pub fn dispatch(&self, name: &str, argv: &[String]) -> Result<(), DispatchError> {
        let Some(command) = self.get(name) else {
            debug!("unknown command `{name}`");
            return Err(DispatchError::UnknownCommand(name.to_string()));
        };

        debug!("dispatching `{name}` with {argv:?}");
        let failure = |message: String| {
            debug!("command `{name}` failed: {message}");
            DispatchError::HandlerFailure {
                name: name.to_string(),
                message,
            }
        };

        command.check_arity(argv.len()).map_err(failure)?;

        match panic::catch_unwind(AssertUnwindSafe(|| command.invoke(argv))) {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(failure(format!("{e:#}"))),
            Err(payload) => Err(failure(panic_message(payload.as_ref()))),
        }
    }

    /// Signature and detail text of the command registered under `name`.
    pub fn describe(&self, name: &str) -> Result<String, DispatchError> {
        let command = self
            .get(name)
            .ok_or_else(|| DispatchError::UnknownCommand(name.to_string()))?;
        Ok(format!(
            "command [ {} ] :\n{}",
            command.signature(),
            command.detail_text()
        ))
    }

    /// Registered names in registration order, comma separated.
    pub fn commands(&self) -> String {
        self.commands
            .iter()
            .map(Command::name)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// One `  <name> <description>` line per command, names padded to
    /// [`NAME_WIDTH`] columns.
    pub fn help_text(&self) -> String {
        self.commands
            .iter()
            .map(|c| {
                format!(
                    "  {:<width$} {}\n",
                    c.name(),
                    c.short_description(),
                    width = NAME_WIDTH
                )
            })
            .collect()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "command panicked".to_string()
    }
}
