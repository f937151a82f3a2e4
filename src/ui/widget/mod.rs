//! The floating chat widget and its parts

pub mod commands;
pub mod composer;
pub mod message_list;
pub mod shell;

pub use commands::{SlashCommand, get_help_text};
pub use composer::{ComposerResult, MessageComposer};
pub use message_list::{MessageList, MessageListState};
pub use shell::{ChatWidgetShell, ShellAction};
