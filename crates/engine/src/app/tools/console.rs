use std::collections::VecDeque;

use winit::event::{ElementState, KeyEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use super::console_commands::ConsoleReply;
use crate::app::rendering::{Color, Surface, TextAlign};
use crate::app::Rect;

const TEXT_SCALE: i32 = 2;
const LINE_ADVANCE: i32 = 7 * TEXT_SCALE;
const PADDING: i32 = 4 * TEXT_SCALE;
const BACKGROUND: Color = [16, 16, 18, 220];
const INPUT_COLOR: Color = [210, 230, 210, 255];
const OUTPUT_COLOR: Color = [170, 190, 230, 255];
const ERROR_COLOR: Color = [255, 110, 100, 255];
const PROMPT: &str = "> ";
const ERROR_PREFIX: &str = "error:";

const MAX_TRANSCRIPT_LINES: usize = 128;
const MAX_INPUT_CHARS: usize = 96;

/// One edit to the console prompt, already separated from window events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ConsoleInput {
    Text(String),
    Backspace,
    Submit,
    Close,
}

impl ConsoleInput {
    pub(crate) fn from_key_event(event: &KeyEvent) -> Option<Self> {
        if event.state != ElementState::Pressed {
            return None;
        }
        match event.physical_key {
            PhysicalKey::Code(KeyCode::Enter | KeyCode::NumpadEnter) => Some(Self::Submit),
            PhysicalKey::Code(KeyCode::Backspace) => Some(Self::Backspace),
            PhysicalKey::Code(KeyCode::Escape) => Some(Self::Close),
            _ => event.text.as_ref().map(|text| Self::Text(text.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind {
    Input,
    Output,
    Error,
}

/// Debug console: a single prompt line and a bounded transcript of entered
/// commands and their replies.
#[derive(Debug, Default)]
pub(crate) struct ConsoleState {
    is_open: bool,
    prompt: String,
    transcript: VecDeque<(LineKind, String)>,
}

impl ConsoleState {
    pub(crate) fn is_open(&self) -> bool {
        self.is_open
    }

    pub(crate) fn toggle_open(&mut self) {
        self.is_open = !self.is_open;
        self.prompt.clear();
    }

    /// Applies one edit. Returns the submitted command line, if any.
    pub(crate) fn apply_input(&mut self, input: ConsoleInput) -> Option<String> {
        if !self.is_open {
            return None;
        }
        match input {
            ConsoleInput::Text(text) => {
                let room = MAX_INPUT_CHARS.saturating_sub(self.prompt.chars().count());
                self.prompt
                    .extend(text.chars().filter(|ch| !ch.is_control()).take(room));
                None
            }
            ConsoleInput::Backspace => {
                self.prompt.pop();
                None
            }
            ConsoleInput::Close => {
                self.toggle_open();
                None
            }
            ConsoleInput::Submit => {
                let line = std::mem::take(&mut self.prompt);
                if line.trim().is_empty() {
                    return None;
                }
                self.push_line(LineKind::Input, format!("{PROMPT}{line}"));
                Some(line)
            }
        }
    }

    pub(crate) fn apply_reply(&mut self, reply: ConsoleReply) {
        if reply.clear_output {
            self.transcript.clear();
        }
        for line in reply.lines {
            let kind = if line.starts_with(ERROR_PREFIX) {
                LineKind::Error
            } else {
                LineKind::Output
            };
            self.push_line(kind, line);
        }
    }

    fn push_line(&mut self, kind: LineKind, line: String) {
        if self.transcript.len() == MAX_TRANSCRIPT_LINES {
            self.transcript.pop_front();
        }
        self.transcript.push_back((kind, line));
    }
}

/// Draws the console along the bottom edge: the prompt last, the newest
/// transcript lines directly above it.
pub(crate) fn draw_console(target: &mut dyn Surface, state: &ConsoleState) {
    let (width, height) = target.size();
    if !state.is_open() || width == 0 || height == 0 {
        return;
    }
    let height = height as i32;

    let room = ((height - 2 * PADDING) / LINE_ADVANCE - 1).max(0) as usize;
    let shown = state.transcript.len().min(room);
    let panel_height = (shown as i32 + 1) * LINE_ADVANCE + 2 * PADDING;
    target.fill_rect(
        Rect::new(0, (height - panel_height).max(0), width as i32, panel_height),
        BACKGROUND,
    );

    let mut y = height - PADDING - LINE_ADVANCE;
    draw_line(target, y, &format!("{PROMPT}{}", state.prompt), INPUT_COLOR);
    for (kind, line) in state.transcript.iter().rev().take(shown) {
        y -= LINE_ADVANCE;
        let color = match kind {
            LineKind::Input => INPUT_COLOR,
            LineKind::Output => OUTPUT_COLOR,
            LineKind::Error => ERROR_COLOR,
        };
        draw_line(target, y, line, color);
    }
}

fn draw_line(target: &mut dyn Surface, y: i32, text: &str, color: Color) {
    target.draw_text(text, PADDING, y, TEXT_SCALE, color, TextAlign::Left);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{DrawCall, RecordingSurface};

    fn open_console() -> ConsoleState {
        let mut console = ConsoleState::default();
        console.toggle_open();
        console
    }

    fn type_line(console: &mut ConsoleState, text: &str) -> Option<String> {
        console.apply_input(ConsoleInput::Text(text.to_string()));
        console.apply_input(ConsoleInput::Submit)
    }

    #[test]
    fn closed_console_ignores_input() {
        let mut console = ConsoleState::default();
        assert_eq!(type_line(&mut console, "freecam"), None);
        assert!(console.transcript.is_empty());
    }

    #[test]
    fn submit_returns_line_and_echoes_it() {
        let mut console = open_console();
        console.apply_input(ConsoleInput::Text("setmissile 61x".to_string()));
        console.apply_input(ConsoleInput::Backspace);

        assert_eq!(
            console.apply_input(ConsoleInput::Submit),
            Some("setmissile 61".to_string())
        );
        assert_eq!(console.prompt, "");
        assert_eq!(
            console.transcript.back(),
            Some(&(LineKind::Input, "> setmissile 61".to_string()))
        );
    }

    #[test]
    fn blank_submit_and_control_chars_are_dropped() {
        let mut console = open_console();
        assert_eq!(type_line(&mut console, "   "), None);
        console.apply_input(ConsoleInput::Text("a\n\t".to_string()));
        assert_eq!(console.prompt, "a");
        assert!(console.transcript.is_empty());
    }

    #[test]
    fn prompt_is_capped() {
        let mut console = open_console();
        console.apply_input(ConsoleInput::Text("x".repeat(MAX_INPUT_CHARS + 10)));
        assert_eq!(console.prompt.chars().count(), MAX_INPUT_CHARS);
    }

    #[test]
    fn close_discards_prompt() {
        let mut console = open_console();
        console.apply_input(ConsoleInput::Text("free".to_string()));
        console.apply_input(ConsoleInput::Close);
        assert!(!console.is_open());

        console.toggle_open();
        assert_eq!(console.prompt, "");
    }

    #[test]
    fn replies_are_classified_and_clear_resets_transcript() {
        let mut console = open_console();
        type_line(&mut console, "setmissile");
        console.apply_reply(ConsoleReply {
            clear_output: false,
            lines: vec![
                "error: expected exactly one argument <id>. usage: setmissile <id>".to_string(),
                "missile id set to 7".to_string(),
            ],
        });
        let kinds: Vec<_> = console.transcript.iter().map(|(kind, _)| *kind).collect();
        assert_eq!(kinds, vec![LineKind::Input, LineKind::Error, LineKind::Output]);

        console.apply_reply(ConsoleReply {
            clear_output: true,
            lines: Vec::new(),
        });
        assert!(console.transcript.is_empty());
    }

    #[test]
    fn transcript_keeps_newest_lines() {
        let mut console = open_console();
        for index in 0..MAX_TRANSCRIPT_LINES + 3 {
            type_line(&mut console, &format!("echo {index}"));
        }
        assert_eq!(console.transcript.len(), MAX_TRANSCRIPT_LINES);
        assert_eq!(
            console.transcript.front().map(|(_, line)| line.as_str()),
            Some("> echo 3")
        );
    }

    #[test]
    fn open_console_draws_prompt_then_newest_lines_upward() {
        let mut surface = RecordingSurface::new(800, 600);
        let mut console = open_console();
        console.apply_reply(ConsoleReply {
            clear_output: false,
            lines: vec!["first".to_string(), "error: second".to_string()],
        });
        console.apply_input(ConsoleInput::Text("freecam".to_string()));

        draw_console(&mut surface, &console);

        let texts: Vec<&str> = surface.texts().collect();
        assert_eq!(texts, vec!["> freecam", "error: second", "first"]);
        assert!(matches!(surface.calls()[0], DrawCall::Rect { .. }));
    }

    #[test]
    fn closed_or_tiny_console_draws_safely() {
        let mut surface = RecordingSurface::new(800, 600);
        draw_console(&mut surface, &ConsoleState::default());
        assert!(surface.calls().is_empty());

        let mut tiny = RecordingSurface::new(1, 1);
        let mut console = open_console();
        console.apply_reply(ConsoleReply {
            clear_output: false,
            lines: vec!["hidden".to_string()],
        });
        draw_console(&mut tiny, &console);
        assert_eq!(tiny.texts().collect::<Vec<_>>(), vec!["> "]);
    }
}
