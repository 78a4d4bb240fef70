use crate::assets::AssetLoader;

use super::tools::ConsoleReply;
use super::{KeyEvent, MouseEvent, MouseMoveEvent, Surface};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenCommand {
    None,
    Quit,
}

/// The single active screen driven by the window loop.
///
/// Input handlers return `true` when the event was consumed. The loop does
/// not act on the result; it is reported for diagnostics only.
pub trait Screen {
    fn load(&mut self, assets: &mut AssetLoader);
    /// Advances one fixed tick. `elapsed` is in seconds.
    fn advance(&mut self, elapsed: f64) -> ScreenCommand;
    fn on_key_down(&mut self, event: KeyEvent) -> bool;
    fn on_key_repeat(&mut self, event: KeyEvent) -> bool;
    fn on_mouse_move(&mut self, event: MouseMoveEvent) -> bool;
    fn on_mouse_button_down(&mut self, event: MouseEvent) -> bool;
    /// Called once per tick for every button still held after its press.
    fn on_mouse_button_repeat(&mut self, event: MouseEvent) -> bool;
    fn render(&mut self, target: &mut dyn Surface);
    fn console_line(&mut self, _line: &str, reply: &mut ConsoleReply) -> ScreenCommand {
        reply.lines.push("error: no commands available. try: help".to_string());
        ScreenCommand::None
    }
    fn shutdown(&mut self) {}
}
