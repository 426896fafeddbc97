//! Turning one line of input into something the loop can act on.

/// What a single input line asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Nothing but spaces.
    Empty,
    /// The lone word `exit`.
    Exit,
    /// `help` with no topic.
    HelpList,
    /// `help <name>`.
    HelpTopic(String),
    /// `help` followed by more than one word; silently ignored.
    Ignored,
    /// Anything else: command name plus its positional arguments.
    Call { name: String, argv: Vec<String> },
}

/// Split a line on single spaces.
///
/// Runs of spaces produce no empty tokens, and a trailing line terminator is
/// not part of the last token. Tabs and other whitespace stay inside tokens.
pub fn split_into_tokens(line: &str) -> Vec<String> {
    line.trim_end_matches(['\n', '\r'])
        .split(' ')
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Classify a raw input line.
pub fn parse(line: &str) -> Input {
    let mut tokens = split_into_tokens(line);
    if tokens.is_empty() {
        return Input::Empty;
    }
    if tokens.len() == 1 && tokens[0] == "exit" {
        return Input::Exit;
    }
    if tokens[0] == "help" {
        return match tokens.len() {
            1 => Input::HelpList,
            2 => Input::HelpTopic(tokens.swap_remove(1)),
            _ => Input::Ignored,
        };
    }
    let argv = tokens.split_off(1);
    let name = tokens.swap_remove(0);
    Input::Call { name, argv }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(name: &str, argv: &[&str]) -> Input {
        Input::Call {
            name: name.to_string(),
            argv: argv.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_split_drops_empty_tokens() {
        assert_eq!(split_into_tokens("greet  world "), vec!["greet", "world"]);
        assert_eq!(split_into_tokens("a\tb c\r\n"), vec!["a\tb", "c"]);
        assert!(split_into_tokens("").is_empty());
        assert!(split_into_tokens("   ").is_empty());
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(parse(""), Input::Empty);
        assert_eq!(parse("    \n"), Input::Empty);
    }

    #[test]
    fn test_parse_exit_only_when_alone() {
        assert_eq!(parse("exit"), Input::Exit);
        assert_eq!(parse(" exit \n"), Input::Exit);
        assert_eq!(parse("exit now"), call("exit", &["now"]));
    }

    #[test]
    fn test_parse_help_forms() {
        assert_eq!(parse("help"), Input::HelpList);
        assert_eq!(parse("help build"), Input::HelpTopic("build".to_string()));
        assert_eq!(parse("help build clean"), Input::Ignored);
    }

    #[test]
    fn test_parse_call() {
        assert_eq!(parse("greet world"), call("greet", &["world"]));
        assert_eq!(parse("build"), call("build", &[]));
        assert_eq!(parse("cp a b c"), call("cp", &["a", "b", "c"]));
    }
}
