mod clock;
mod geometry;
mod input;
mod loop_runner;
mod rendering;
mod screen;
mod tools;

pub use clock::{Clock, DeferredQueue, ManualClock, SystemClock};
pub use geometry::{radians_between, Rect, Vec2};
pub use input::{Key, KeyEvent, KeyMods, MouseButton, MouseEvent, MouseMoveEvent};
pub use loop_runner::{run_app, AppError, LoopConfig};
pub use rendering::{
    text_width_px, Color, DrawCall, FrameSurface, RecordingSurface, Renderer, Surface, TextAlign,
};
pub use screen::{Screen, ScreenCommand};
pub use tools::{
    require_no_args, CommandParseError, CommandProcessor, CommandRegistry, ConsoleReply,
    LocalAction, ParsedCommand,
};
