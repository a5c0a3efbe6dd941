//! Command parsing for the console front end

use portable_shelf::catalog::Filter;

/// One line of user input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Toggle the node on a row (1-based)
    Toggle(usize),
    /// Check everything
    SelectAll,
    /// Uncheck everything
    UnselectAll,
    /// Invert the selection
    Invert,
    /// Switch the filter
    Filter(Filter),
    /// Create or refresh shortcuts for the selection
    Add,
    /// Remove shortcuts of the selection
    Remove,
    /// Open the folder of the app on a row (1-based)
    Open(usize),
    /// Rescan everything
    Rescan,
    /// Show the command list
    Help,
    /// Leave
    Quit,
}

/// Command list shown by `help`
pub const HELP: &str = "\
Commands:
  <n> | t <n>       toggle row n (a group toggles all its apps)
  all | none        check / uncheck everything
  invert            invert the selection
  filter <name>     all, installed, startmenu, unused
  add               create or refresh shortcuts for checked apps
  remove            remove shortcuts of checked apps
  open <n>          open the folder of the app on row n
  rescan            reload apps and shortcuts
  help | quit";

fn row_number(arg: Option<&str>) -> Result<usize, String> {
    let arg = arg.ok_or("missing row number")?;
    match arg.parse::<usize>() {
        Ok(0) | Err(_) => Err(format!("'{arg}' is not a row number")),
        Ok(n) => Ok(n),
    }
}

/// Parse one input line; `Ok(None)` for a blank line
pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, None), |(word, rest)| (word, Some(rest.trim())));

    let command = match word.to_ascii_lowercase().as_str() {
        "t" | "toggle" => Command::Toggle(row_number(rest)?),
        "all" => Command::SelectAll,
        "none" => Command::UnselectAll,
        "invert" => Command::Invert,
        "filter" | "f" => Command::Filter(rest.unwrap_or("all").parse()?),
        "add" | "update" => Command::Add,
        "remove" | "rm" => Command::Remove,
        "open" | "o" => Command::Open(row_number(rest)?),
        "rescan" | "r" => Command::Rescan,
        "help" | "h" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        other => match other.parse::<usize>() {
            Ok(n) if n > 0 && rest.is_none() => Command::Toggle(n),
            _ => return Err(format!("unknown command '{word}' (try 'help')")),
        },
    };
    Ok(Some(command))
}
