mod console;
mod console_commands;

pub(crate) use console::{draw_console, ConsoleInput, ConsoleState};
pub use console_commands::{
    require_no_args, CommandParseError, CommandProcessor, CommandRegistry, ConsoleReply,
    LocalAction, ParsedCommand,
};
