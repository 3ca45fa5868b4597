//! Parsing of `#` commands read by the headless driver.

use dnd_choices::Selection;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Open choices only, or every choice with `all`.
    List { all: bool },
    Show(String),
    Resolve { choice_id: String, selection: Selection },
    Undo(String),
    LevelUp(String),
    Save(Option<String>),
    /// Saves in the save directory.
    Saves,
    Status,
    Help,
    Quit,
}

/// Parse one input line. Lines must start with `#`.
pub fn parse(line: &str) -> Result<Command, String> {
    let rest = line
        .trim()
        .strip_prefix('#')
        .ok_or_else(|| "Commands start with '#'. Type #help for help.".to_string())?;
    let (name, args) = match rest.split_once(char::is_whitespace) {
        Some((name, args)) => (name, args.trim()),
        None => (rest, ""),
    };

    match name {
        "list" => Ok(Command::List { all: args == "all" }),
        "show" => required(args, "#show <choice-id>").map(Command::Show),
        "resolve" => {
            let (choice_id, json) = args
                .split_once(char::is_whitespace)
                .ok_or_else(|| "Usage: #resolve <choice-id> <json>".to_string())?;
            let selection = serde_json::from_str(json.trim())
                .map_err(|e| format!("Selection is not valid JSON: {e}"))?;
            Ok(Command::Resolve {
                choice_id: choice_id.to_string(),
                selection,
            })
        }
        "undo" => required(args, "#undo <choice-id>").map(Command::Undo),
        "level" => required(args, "#level <class>").map(Command::LevelUp),
        "save" => Ok(Command::Save((!args.is_empty()).then(|| args.to_string()))),
        "saves" => Ok(Command::Saves),
        "status" => Ok(Command::Status),
        "help" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        _ => Err("Unknown command. Type #help for help.".to_string()),
    }
}

fn required(args: &str, usage: &str) -> Result<String, String> {
    if args.is_empty() {
        Err(format!("Usage: {usage}"))
    } else {
        Ok(args.to_string())
    }
}
