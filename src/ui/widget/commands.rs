use std::str::FromStr;

use strum::{AsRefStr, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

/// Commands that can be invoked by starting a message with a leading slash.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, EnumIter, AsRefStr, IntoStaticStr,
)]
#[strum(serialize_all = "kebab-case")]
pub enum SlashCommand {
    /// Hand the conversation to a human agent
    Human,
    /// Collapse the widget to its button
    Close,
    /// Leave the page for the admin dashboard
    Dashboard,
    /// Exit the application
    Quit,
    /// Show help
    Help,
}

impl SlashCommand {
    /// User-visible description shown in help.
    pub fn description(self) -> &'static str {
        match self {
            SlashCommand::Human => "talk to a human agent",
            SlashCommand::Close => "minimize the chat widget",
            SlashCommand::Dashboard => "open the admin dashboard",
            SlashCommand::Quit => "exit the application",
            SlashCommand::Help => "show available commands",
        }
    }

    /// Command string without the leading '/'.
    pub fn command(self) -> &'static str {
        self.into()
    }
}

/// Parse a slash command from user input. Words after the command are ignored.
pub fn parse_slash_command(input: &str) -> Option<SlashCommand> {
    let rest = input.trim().strip_prefix('/')?;
    let head = rest.split_whitespace().next()?;

    SlashCommand::from_str(head).ok().or_else(|| match head.to_lowercase().as_str() {
        "q" | "exit" | "bye" => Some(SlashCommand::Quit),
        "agent" | "handoff" => Some(SlashCommand::Human),
        "min" | "hide" => Some(SlashCommand::Close),
        "admin" => Some(SlashCommand::Dashboard),
        "h" | "?" => Some(SlashCommand::Help),
        _ => None,
    })
}

/// Get help text for all available commands
pub fn get_help_text() -> String {
    let mut help = String::from("Available commands:\n");
    for command in SlashCommand::iter() {
        help.push_str(&format!("/{} - {}\n", command.command(), command.description()));
    }
    help.push_str("Aliases: /q for /quit, /agent for /human, /hide for /close");
    help
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_known_commands_and_aliases() {
        assert_eq!(parse_slash_command("/human"), Some(SlashCommand::Human));
        assert_eq!(parse_slash_command("  /q  "), Some(SlashCommand::Quit));
        assert_eq!(parse_slash_command("/agent please"), Some(SlashCommand::Human));
        assert_eq!(parse_slash_command("/ADMIN"), Some(SlashCommand::Dashboard));
    }

    #[test]
    fn plain_text_and_unknown_commands_are_not_commands() {
        assert_eq!(parse_slash_command("hello"), None);
        assert_eq!(parse_slash_command("/nope"), None);
        assert_eq!(parse_slash_command("/"), None);
    }

    #[test]
    fn help_lists_every_command() {
        let help = get_help_text();
        for command in SlashCommand::iter() {
            assert!(help.contains(&format!("/{}", command.command())));
        }
    }
}
