use argh::FromArgs;
use cmdrouter::builtin::register_builtins;
use cmdrouter::{CommandRouter, DEFAULT_PROMPT, EditorReader, LineReader, PlainReader, Repl};
use std::io::{self, IsTerminal};
use std::process::ExitCode;

#[derive(FromArgs)]
/// Interactive command dispatcher. Type `help` for the command list, `exit` to quit.
struct Args {
    #[argh(option, default = "DEFAULT_PROMPT.to_string()")]
    /// text printed before each input line.
    prompt: String,

    #[argh(switch)]
    /// read plain lines from stdin instead of using the line editor.
    plain: bool,

    #[argh(switch, short = 'v')]
    /// log debug output to stderr.
    verbose: bool,
}

fn main() -> ExitCode {
    let args: Args = argh::from_env();

    let level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();

    match try_main(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn try_main(args: Args) -> anyhow::Result<()> {
    let mut router = CommandRouter::new();
    register_builtins(&mut router);

    let mut reader: Box<dyn LineReader> = if args.plain || !io::stdin().is_terminal() {
        log::debug!("reading plain lines from stdin");
        Box::new(PlainReader::new(io::stdin().lock(), io::stdout()))
    } else {
        Box::new(EditorReader::new()?)
    };

    Repl::new(&router, io::stdout())
        .with_prompt(args.prompt)
        .run(reader.as_mut())
}
