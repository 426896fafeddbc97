use crate::error::DispatchError;
use crate::line::{self, Input};
use crate::reader::{LineReader, ReadOutcome};
use crate::router::CommandRouter;
use anyhow::Result;
use log::{debug, info};
use std::io::Write;

/// Prompt printed before every line unless configured otherwise.
pub const DEFAULT_PROMPT: &str = "> ";

/// What the loop should do after a line was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Continue,
    Exit,
}

/// The read-eval-print loop in front of a [`CommandRouter`].
///
/// Built-ins `help` and `exit` are handled here; every other line is
/// dispatched to the router. Router errors are printed to `out` and the loop
/// carries on.
///
/// Example
/// ```
/// use cmdrouter::{Command, CommandRouter, MemWriter, PlainReader, Repl};
/// use std::io::Cursor;
///
/// let mut router = CommandRouter::new();
/// router.register(Command::new("hi", |_: &[String]| Ok(())).description("say hi"));
///
/// let out = MemWriter::new();
/// let mut reader = PlainReader::new(Cursor::new("nope\nexit\n"), out.clone());
/// Repl::new(&router, out.clone()).run(&mut reader).unwrap();
/// assert_eq!(out.contents(), "> [unknown command]\n> ");
/// ```
pub struct Repl<'r, W> {
    router: &'r CommandRouter,
    prompt: String,
    out: W,
}

impl<'r, W: Write> Repl<'r, W> {
    pub fn new(router: &'r CommandRouter, out: W) -> Self {
        Self {
            router,
            prompt: DEFAULT_PROMPT.to_string(),
            out,
        }
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// Read and handle lines until `exit` or end of input.
    ///
    /// Only I/O failures of the reader or of `out` end the loop with an error.
    pub fn run(&mut self, reader: &mut dyn LineReader) -> Result<()> {
        info!(
            "command loop started with {} command(s): {}",
            self.router.len(),
            self.router.commands()
        );
        loop {
            let line = match reader.read_line(&self.prompt)? {
                ReadOutcome::Line(line) => line,
                ReadOutcome::Interrupted => {
                    debug!("line abandoned with Ctrl-C");
                    continue;
                }
                ReadOutcome::Eof => {
                    info!("end of input, leaving command loop");
                    break;
                }
            };
            if self.handle_line(&line)? == Step::Exit {
                info!("exit requested");
                break;
            }
        }
        Ok(())
    }

    /// Handle a single input line.
    pub fn handle_line(&mut self, line: &str) -> Result<Step> {
        match line::parse(line) {
            Input::Empty | Input::Ignored => {}
            Input::Exit => return Ok(Step::Exit),
            Input::HelpList => {
                writeln!(self.out, "commands :")?;
                write!(self.out, "{}", self.router.help_text())?;
            }
            Input::HelpTopic(name) => match self.router.describe(&name) {
                Ok(text) => writeln!(self.out, "{text}")?,
                Err(e) => self.report(&e)?,
            },
            Input::Call { name, argv } => {
                // flush pending output so it lands before anything the handler prints
                self.out.flush()?;
                if let Err(e) = self.router.dispatch(&name, &argv) {
                    self.report(&e)?;
                }
            }
        }
        self.out.flush()?;
        Ok(Step::Continue)
    }

    fn report(&mut self, err: &DispatchError) -> std::io::Result<()> {
        writeln!(self.out, "{err}")
    }
}
