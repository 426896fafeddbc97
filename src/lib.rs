//! A minimal interactive command dispatcher.
//!
//! Setup code registers named commands on a [`CommandRouter`]; a [`Repl`] then
//! reads lines, splits them on spaces and routes the first word to the matching
//! handler with the remaining words as arguments. `help` and `exit` are built
//! in. A handler that fails (or panics) is reported as `[error]` and the loop
//! keeps going; an unregistered name is reported as `[unknown command]`.
//!
//! Handlers are plain closures over `&[String]`, or [`argh`] structs
//! implementing [`TypedCommand`].

pub mod builtin;
mod command;
mod error;
mod io_adapters;
pub mod line;
mod reader;
mod repl;
mod router;

pub use command::{Command, Handler, Param, TypedCommand};
pub use error::DispatchError;
pub use io_adapters::MemWriter;
pub use reader::{EditorReader, LineReader, PlainReader, ReadOutcome};
pub use repl::{DEFAULT_PROMPT, Repl, Step};
pub use router::{CommandRouter, NAME_WIDTH};
