use std::sync::LazyLock;

use regex::Regex;

static SLASH_COMMAND: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*/(\S+)\s*(.*)$").expect("slash command pattern is valid"));

/// Commands understood by the interactive prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandType {
    Lookup,  // /lookup <CALL>, or bare text
    History, // /history
    Recall,  // /recall <n>
    Clear,   // /clear
    Theme,   // /theme
    Map,     // /map
    About,   // /about
    Help,    // /help
    Quit,    // /quit
    Unknown, // Unrecognized slash command
}

impl CommandType {
    /// Parse command type from the word after the slash
    pub fn from_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "lookup" | "l" => CommandType::Lookup,
            "history" | "h" => CommandType::History,
            "recall" | "r" => CommandType::Recall,
            "clear" => CommandType::Clear,
            "theme" => CommandType::Theme,
            "map" => CommandType::Map,
            "about" => CommandType::About,
            "help" | "?" => CommandType::Help,
            "quit" | "exit" | "q" => CommandType::Quit,
            _ => CommandType::Unknown,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            CommandType::Lookup => "lookup",
            CommandType::History => "history",
            CommandType::Recall => "recall",
            CommandType::Clear => "clear",
            CommandType::Theme => "theme",
            CommandType::Map => "map",
            CommandType::About => "about",
            CommandType::Help => "help",
            CommandType::Quit => "quit",
            CommandType::Unknown => "unknown",
        }
    }
}

/// One line of prompt input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    pub command_type: CommandType,
    pub raw_text: String,
    pub arguments: String,
}

impl ParsedCommand {
    /// Parse a prompt line. Anything not starting with `/` is a lookup of
    /// the whole line.
    ///
    /// # Examples
    /// ```
    /// use hamcall_cli::command::{CommandType, ParsedCommand};
    ///
    /// let cmd = ParsedCommand::parse("/recall 2");
    /// assert_eq!(cmd.command_type, CommandType::Recall);
    /// assert_eq!(cmd.arguments, "2");
    /// ```
    pub fn parse(text: &str) -> Self {
        let trimmed = text.trim();

        if let Some(caps) = SLASH_COMMAND.captures(trimmed) {
            let name = caps.get(1).map_or("", |m| m.as_str());
            let arguments = caps.get(2).map_or("", |m| m.as_str()).trim().to_string();
            return ParsedCommand {
                command_type: CommandType::from_name(name),
                raw_text: trimmed.to_string(),
                arguments,
            };
        }

        ParsedCommand {
            command_type: CommandType::Lookup,
            raw_text: trimmed.to_string(),
            arguments: trimmed.to_string(),
        }
    }

    /// Zero-based history index for `/recall <n>`, where `n` counts from 1.
    pub fn recall_index(&self) -> Option<usize> {
        match self.arguments.parse::<usize>() {
            Ok(n) if n >= 1 => Some(n - 1),
            _ => None,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.raw_text.is_empty()
    }
}

pub const HELP_TEXT: &str = "\
Type a call sign to look it up, or one of:
  /lookup <CALL>  look up a call sign
  /history        list recent lookups
  /recall <n>     look up the n-th recent call sign again
  /clear          forget recent lookups
  /theme          switch dark/light map tiles
  /map            open the full map for the last result
  /about          about hamcall
  /help           this text
  /quit           leave";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_text_is_lookup() {
        let cmd = ParsedCommand::parse("  w1aw ");
        assert_eq!(cmd.command_type, CommandType::Lookup);
        assert_eq!(cmd.arguments, "w1aw");
    }

    #[test]
    fn test_lookup_command() {
        let cmd = ParsedCommand::parse("/lookup K1ABC");
        assert_eq!(cmd.command_type, CommandType::Lookup);
        assert_eq!(cmd.arguments, "K1ABC");
    }

    #[test]
    fn test_command_no_args() {
        let cmd = ParsedCommand::parse("/HELP");
        assert_eq!(cmd.command_type, CommandType::Help);
        assert_eq!(cmd.arguments, "");
    }

    #[test]
    fn test_unknown_command() {
        let cmd = ParsedCommand::parse("/frobnicate now");
        assert_eq!(cmd.command_type, CommandType::Unknown);
        assert_eq!(cmd.arguments, "now");
    }

    #[test]
    fn test_recall_index() {
        assert_eq!(ParsedCommand::parse("/recall 1").recall_index(), Some(0));
        assert_eq!(ParsedCommand::parse("/r 10").recall_index(), Some(9));
        assert_eq!(ParsedCommand::parse("/recall 0").recall_index(), None);
        assert_eq!(ParsedCommand::parse("/recall two").recall_index(), None);
        assert_eq!(ParsedCommand::parse("/recall").recall_index(), None);
    }

    #[test]
    fn test_blank_line() {
        assert!(ParsedCommand::parse("   ").is_blank());
        assert!(!ParsedCommand::parse("/quit").is_blank());
    }
}
