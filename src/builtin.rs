use crate::command::{Command, Param, TypedCommand};
use crate::router::CommandRouter;
use anyhow::{Context, Result, anyhow};
use argh::FromArgs;
use std::env;
use std::io::{self, Write};

/// Register the demonstration commands shipped with the binary.
pub fn register_builtins(router: &mut CommandRouter) {
    router
        .register(
            Command::new("echo", |argv: &[String]| echo(&mut io::stdout(), argv))
                .description("print the arguments")
                .detail("Write the arguments to standard output, separated by spaces.")
                .param(Param::variadic("words")),
        )
        .register(
            Command::typed::<Add>()
                .description("add two integers")
                .detail("Print the sum of two signed 64-bit integers.\nFails on non-numeric input or overflow.")
                .params([Param::required("a"), Param::required("b")]),
        )
        .register(
            Command::typed::<Pwd>()
                .description("print the working directory")
                .params([]),
        );
}

/// Write `argv` joined by single spaces, followed by a newline.
///
/// Arguments are taken verbatim; `-5` or `--x` are words, not flags.
fn echo(stdout: &mut dyn Write, argv: &[String]) -> Result<()> {
    writeln!(stdout, "{}", argv.join(" "))?;
    stdout.flush()?;
    Ok(())
}

#[derive(FromArgs)]
/// Add two integers and print the sum.
pub struct Add {
    #[argh(positional)]
    /// left operand.
    pub a: i64,

    #[argh(positional)]
    /// right operand.
    pub b: i64,
}

impl Add {
    fn write_to(&self, stdout: &mut dyn Write) -> Result<()> {
        let sum = self
            .a
            .checked_add(self.b)
            .ok_or_else(|| anyhow!("add: {} + {} overflows", self.a, self.b))?;
        writeln!(stdout, "{}", sum)?;
        Ok(())
    }
}

impl TypedCommand for Add {
    fn name() -> &'static str {
        "add"
    }

    fn run(self) -> Result<()> {
        self.write_to(&mut io::stdout())
    }
}

#[derive(FromArgs)]
/// Print the current working directory to standard output.
pub struct Pwd {}

impl Pwd {
    fn write_to(&self, stdout: &mut dyn Write) -> Result<()> {
        let dir = env::current_dir().context("pwd: can't read the current directory")?;
        writeln!(stdout, "{}", dir.to_string_lossy())?;
        Ok(())
    }
}

impl TypedCommand for Pwd {
    fn name() -> &'static str {
        "pwd"
    }

    fn run(self) -> Result<()> {
        self.write_to(&mut io::stdout())
    }
}
