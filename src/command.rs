use anyhow::{Result, anyhow};
use argh::{EarlyExit, FromArgs};
use std::fmt;

/// The callable bound to a command name.
///
/// Receives the positional arguments that followed the command name on the
/// input line. Returning an error never stops the loop; the router reports it.
pub type Handler = Box<dyn Fn(&[String]) -> Result<()>>;

/// One declared parameter of a command.
///
/// The declared list is what `help <name>` shows as the command's signature,
/// and what dispatch checks the argument count against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    name: String,
    default: Option<String>,
    variadic: bool,
}

impl Param {
    /// A parameter that must be supplied.
    pub fn required(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default: None,
            variadic: false,
        }
    }

    /// A parameter that may be omitted, shown with its default value.
    pub fn optional(name: impl Into<String>, default: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default: Some(default.into()),
            variadic: false,
        }
    }

    /// Swallows every remaining argument.
    pub fn variadic(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default: None,
            variadic: true,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn default(&self) -> Option<&str> {
        self.default.as_deref()
    }

    pub fn is_variadic(&self) -> bool {
        self.variadic
    }

    fn is_required(&self) -> bool {
        !self.variadic && self.default.is_none()
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.variadic {
            write!(f, "*{}", self.name)
        } else if let Some(default) = &self.default {
            write!(f, "{}={}", self.name, default)
        } else {
            write!(f, "{}", self.name)
        }
    }
}

/// A registered command: its name, help texts, declared parameters and handler.
///
/// Built with [`Command::new`] and the chained setters, then handed to
/// [`CommandRouter::register`](crate::CommandRouter::register). Once
/// registered it is never modified.
pub struct Command {
    name: String,
    description: String,
    detail: String,
    params: Option<Vec<Param>>,
    handler: Handler,
}

impl Command {
    pub const DEFAULT_DETAIL: &'static str = "(no detail)";

    /// Create a command with an empty description, the default detail text
    /// and no declared parameters (any number of arguments is accepted).
    pub fn new<F>(name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&[String]) -> Result<()> + 'static,
    {
        Self {
            name: name.into(),
            description: String::new(),
            detail: Self::DEFAULT_DETAIL.to_string(),
            params: None,
            handler: Box::new(handler),
        }
    }

    /// Create a command whose arguments are parsed into `T` with [`argh`].
    ///
    /// `--help` prints argh's usage text and succeeds; any other parse
    /// problem fails the invocation with argh's message.
    pub fn typed<T: TypedCommand>() -> Self {
        let name = T::name();
        Self::new(name, move |argv: &[String]| {
            let args: Vec<&str> = argv.iter().map(String::as_str).collect();
            match T::from_args(&[name], &args) {
                Ok(cmd) => cmd.run(),
                Err(EarlyExit { output, status }) => match status {
                    Ok(()) => {
                        println!("{}", output.trim_end());
                        Ok(())
                    }
                    Err(()) => Err(anyhow!("{}", output.trim_end())),
                },
            }
        })
    }

    /// Short description shown next to the name in the `help` listing.
    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = text.into();
        self
    }

    /// Long text shown by `help <name>`.
    pub fn detail(mut self, text: impl Into<String>) -> Self {
        self.detail = text.into();
        self
    }

    /// Declare the full parameter list. An empty list means the command
    /// takes no arguments at all.
    pub fn params(mut self, params: impl IntoIterator<Item = Param>) -> Self {
        self.params = Some(params.into_iter().collect());
        self
    }

    /// Append one declared parameter.
    pub fn param(mut self, param: Param) -> Self {
        self.params.get_or_insert_with(Vec::new).push(param);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn short_description(&self) -> &str {
        &self.description
    }

    pub fn detail_text(&self) -> &str {
        &self.detail
    }

    pub fn declared_params(&self) -> Option<&[Param]> {
        self.params.as_deref()
    }

    /// Human-readable call signature, e.g. `greet(who, times=1, *rest)`.
    ///
    /// Commands without declared parameters show `name(*args)`.
    pub fn signature(&self) -> String {
        match &self.params {
            Some(params) => {
                let rendered: Vec<String> = params.iter().map(Param::to_string).collect();
                format!("{}({})", self.name, rendered.join(", "))
            }
            None => format!("{}(*args)", self.name),
        }
    }

    /// Check `given` arguments against the declared parameters.
    ///
    /// Returns the failure message when the count cannot bind.
    pub(crate) fn check_arity(&self, given: usize) -> Result<(), String> {
        let Some(params) = &self.params else {
            return Ok(());
        };
        let positional: Vec<&Param> = params.iter().filter(|p| !p.variadic).collect();
        let variadic = positional.len() != params.len();
        let required: Vec<&Param> = positional.iter().copied().filter(|p| p.is_required()).collect();

        if given < required.len() {
            let missing: Vec<String> = required[given..]
                .iter()
                .map(|p| format!("'{}'", p.name))
                .collect();
            return Err(format!(
                "{}() missing {} required positional argument{}: {}",
                self.name,
                missing.len(),
                plural(missing.len()),
                missing.join(", ")
            ));
        }

        if !variadic && given > positional.len() {
            let takes = if required.len() == positional.len() {
                positional.len().to_string()
            } else {
                format!("from {} to {}", required.len(), positional.len())
            };
            return Err(format!(
                "{}() takes {} positional argument{} but {} {} given",
                self.name,
                takes,
                plural(positional.len()),
                given,
                if given == 1 { "was" } else { "were" }
            ));
        }
        Ok(())
    }

    pub(crate) fn invoke(&self, argv: &[String]) -> Result<()> {
        (self.handler)(argv)
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("detail", &self.detail)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

fn plural(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}

/// A command whose arguments are described by an [`argh`] struct.
///
/// Register it with [`Command::typed`].
pub trait TypedCommand: FromArgs + 'static {
    /// Name the command is registered under, e.g. "echo".
    fn name() -> &'static str;

    /// Run with the parsed arguments.
    fn run(self) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn noop(_: &[String]) -> Result<()> {
        Ok(())
    }

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_defaults() {
        let cmd = Command::new("build", noop);
        assert_eq!(cmd.name(), "build");
        assert_eq!(cmd.short_description(), "");
        assert_eq!(cmd.detail_text(), "(no detail)");
        assert!(cmd.declared_params().is_none());
        assert_eq!(cmd.signature(), "build(*args)");
    }

    #[test]
    fn test_signature_renders_defaults_and_variadic() {
        let cmd = Command::new("greet", noop)
            .param(Param::required("who"))
            .param(Param::optional("times", "1"))
            .param(Param::variadic("rest"));
        assert_eq!(cmd.signature(), "greet(who, times=1, *rest)");

        let empty = Command::new("clean", noop).params([]);
        assert_eq!(empty.signature(), "clean()");
    }

    #[test]
    fn test_arity_unchecked_without_declared_params() {
        let cmd = Command::new("any", noop);
        assert!(cmd.check_arity(0).is_ok());
        assert!(cmd.check_arity(42).is_ok());
    }

    #[test]
    fn test_arity_too_many() {
        let cmd = Command::new("clean", noop).params([]);
        assert_eq!(
            cmd.check_arity(1).unwrap_err(),
            "clean() takes 0 positional arguments but 1 was given"
        );

        let cmd = Command::new("greet", noop).param(Param::required("who"));
        assert_eq!(
            cmd.check_arity(2).unwrap_err(),
            "greet() takes 1 positional argument but 2 were given"
        );

        let cmd = Command::new("greet", noop)
            .param(Param::required("who"))
            .param(Param::optional("times", "1"));
        assert!(cmd.check_arity(1).is_ok());
        assert!(cmd.check_arity(2).is_ok());
        assert_eq!(
            cmd.check_arity(3).unwrap_err(),
            "greet() takes from 1 to 2 positional arguments but 3 were given"
        );
    }

    #[test]
    fn test_arity_missing() {
        let cmd = Command::new("add", noop).params([Param::required("a"), Param::required("b")]);
        assert_eq!(
            cmd.check_arity(0).unwrap_err(),
            "add() missing 2 required positional arguments: 'a', 'b'"
        );
        assert_eq!(
            cmd.check_arity(1).unwrap_err(),
            "add() missing 1 required positional argument: 'b'"
        );
    }

    #[test]
    fn test_arity_variadic_accepts_extra() {
        let cmd = Command::new("echo", noop).params([Param::required("first"), Param::variadic("rest")]);
        assert!(cmd.check_arity(1).is_ok());
        assert!(cmd.check_arity(10).is_ok());
        assert!(cmd.check_arity(0).is_err());
    }

    #[derive(FromArgs)]
    /// Repeat a word.
    struct Repeat {
        #[argh(option, short = 'n', default = "1")]
        /// how many times.
        times: usize,

        #[argh(positional)]
        /// the word.
        word: String,
    }

    thread_local! {
        static REPEATED: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
    }

    impl TypedCommand for Repeat {
        fn name() -> &'static str {
            "repeat"
        }

        fn run(self) -> Result<()> {
            REPEATED.with(|r| {
                for _ in 0..self.times {
                    r.borrow_mut().push(self.word.clone());
                }
            });
            Ok(())
        }
    }

    #[test]
    fn test_typed_command_parses_args() {
        let cmd = Command::typed::<Repeat>();
        assert_eq!(cmd.name(), "repeat");

        REPEATED.with(|r| r.borrow_mut().clear());
        cmd.invoke(&args(&["-n", "2", "hi"])).unwrap();
        REPEATED.with(|r| assert_eq!(*r.borrow(), vec!["hi", "hi"]));
    }

    #[test]
    fn test_typed_command_help_succeeds_and_bad_args_fail() {
        let cmd = Command::typed::<Repeat>();
        assert!(cmd.invoke(&args(&["--help"])).is_ok());

        let err = cmd.invoke(&args(&[])).unwrap_err();
        assert!(err.to_string().contains("word"));
    }

    #[test]
    fn test_handler_receives_argv() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let cmd = Command::new("greet", move |argv: &[String]| {
            sink.borrow_mut().extend_from_slice(argv);
            Ok(())
        });
        cmd.invoke(&args(&["world"])).unwrap();
        assert_eq!(*seen.borrow(), vec!["world"]);
    }
}
