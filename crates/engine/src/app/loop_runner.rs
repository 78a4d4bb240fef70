use std::collections::VecDeque;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use pixels::Error as PixelsError;
use thiserror::Error;
use tracing::{debug, info, warn};
use winit::dpi::LogicalSize;
use winit::error::{EventLoopError, OsError};
use winit::event::{ElementState, Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::WindowBuilder;

use crate::assets::AssetLoader;

use super::input::{key_from_physical, mods_from_winit, mouse_button_from_winit, ButtonStates};
use super::tools::{draw_console, ConsoleInput, ConsoleReply, ConsoleState};
use super::{
    Key, KeyEvent, KeyMods, MouseButton, MouseEvent, MouseMoveEvent, Renderer, Screen,
    ScreenCommand,
};

const MAX_QUEUED_INPUT_EVENTS: usize = 256;

#[derive(Debug, Clone)]
pub struct LoopConfig {
    pub window_title: String,
    pub window_width: u32,
    pub window_height: u32,
    pub target_tps: u32,
    pub max_frame_delta: Duration,
    pub max_ticks_per_frame: u32,
    pub max_render_fps: Option<u32>,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            window_title: "ARPG".to_string(),
            window_width: 800,
            window_height: 600,
            target_tps: 25,
            max_frame_delta: Duration::from_millis(250),
            max_ticks_per_frame: 5,
            max_render_fps: Some(60),
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to create event loop: {0}")]
    CreateEventLoop(#[source] EventLoopError),
    #[error("failed to create application window: {0}")]
    CreateWindow(#[source] OsError),
    #[error("failed to initialize renderer: {0}")]
    CreateRenderer(#[source] PixelsError),
    #[error("event loop failed: {0}")]
    EventLoopRun(#[source] EventLoopError),
}

/// Opens the window and drives `screen` until it asks to quit or the window
/// is closed.
pub fn run_app(
    config: LoopConfig,
    mut assets: AssetLoader,
    mut screen: Box<dyn Screen>,
) -> Result<(), AppError> {
    let event_loop = EventLoop::new().map_err(AppError::CreateEventLoop)?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(config.window_title.clone())
            .with_inner_size(LogicalSize::new(
                config.window_width as f64,
                config.window_height as f64,
            ))
            .with_resizable(true)
            .build(&event_loop)
            .map_err(AppError::CreateWindow)?,
    );
    let mut renderer = Renderer::new(
        Arc::clone(&window),
        config.window_width,
        config.window_height,
    )
    .map_err(AppError::CreateRenderer)?;

    event_loop.set_control_flow(ControlFlow::Poll);

    let target_tps = config.target_tps.max(1);
    let max_frame_delta =
        normalize_non_zero_duration(config.max_frame_delta, Duration::from_millis(250));
    let max_ticks_per_frame = config.max_ticks_per_frame.max(1);
    let fixed_dt = Duration::from_secs_f64(1.0 / target_tps as f64);
    let fixed_dt_seconds = fixed_dt.as_secs_f64();
    let render_frame_target = target_frame_duration(config.max_render_fps.filter(|fps| *fps > 0));

    screen.load(&mut assets);
    info!(
        asset_root = %assets.root().display(),
        target_tps,
        max_frame_delta_ms = max_frame_delta.as_millis() as u64,
        max_ticks_per_frame,
        "screen_loaded"
    );

    let mut input_collector = InputCollector::default();
    let mut console = ConsoleState::default();
    let mut tick_events = Vec::new();
    let mut console_lines = Vec::new();
    let mut accumulator = Duration::ZERO;
    let mut last_frame_instant = Instant::now();
    let mut last_present_instant = Instant::now();
    let window_for_loop = Arc::clone(&window);

    event_loop
        .run(move |event, window_target| match event {
            Event::WindowEvent { window_id, event } if window_id == window_for_loop.id() => {
                match event {
                    WindowEvent::CloseRequested => {
                        info!(reason = "window_close", "shutdown_requested");
                        window_target.exit();
                    }
                    WindowEvent::Resized(new_size) => {
                        if let Err(error) = renderer.resize(new_size.width, new_size.height) {
                            warn!(error = %error, "renderer_resize_failed");
                            window_target.exit();
                        }
                    }
                    WindowEvent::ScaleFactorChanged { .. } => {
                        let size = window_for_loop.inner_size();
                        if let Err(error) = renderer.resize(size.width, size.height) {
                            warn!(error = %error, "renderer_resize_failed");
                            window_target.exit();
                        }
                    }
                    WindowEvent::ModifiersChanged(modifiers) => {
                        input_collector.set_mods(mods_from_winit(modifiers.state()));
                    }
                    WindowEvent::CursorMoved { position, .. } => {
                        let (x, y) = renderer.window_pos_to_logical(position.x, position.y);
                        input_collector.handle_cursor_moved(x, y);
                    }
                    WindowEvent::MouseInput { state, button, .. } => {
                        if let Some(button) = mouse_button_from_winit(button) {
                            input_collector.handle_mouse_input(button, state);
                        }
                    }
                    WindowEvent::KeyboardInput { event, .. } => {
                        if input_collector.is_console_toggle(event.physical_key, event.state) {
                            console.toggle_open();
                            input_collector.set_pointer_captured(console.is_open());
                            info!(console_open = console.is_open(), "console_toggled");
                        } else if console.is_open() {
                            if let Some(line) = ConsoleInput::from_key_event(&event)
                                .and_then(|input| console.apply_input(input))
                            {
                                console_lines.push(line);
                            }
                            input_collector.set_pointer_captured(console.is_open());
                        } else {
                            input_collector.handle_key(event.physical_key, event.state, event.repeat);
                        }
                    }
                    WindowEvent::RedrawRequested => {
                        let now = Instant::now();
                        let raw_frame_dt = now.saturating_duration_since(last_frame_instant);
                        last_frame_instant = now;

                        accumulator =
                            accumulator.saturating_add(clamp_frame_delta(raw_frame_dt, max_frame_delta));
                        let step_plan = plan_sim_steps(accumulator, fixed_dt, max_ticks_per_frame);
                        for _ in 0..step_plan.ticks_to_run {
                            input_collector.drain_tick_events_into(&mut tick_events);
                            for input in tick_events.drain(..) {
                                let consumed = dispatch_input(screen.as_mut(), input);
                                debug!(?input, consumed, "input_dispatched");
                            }

                            for line in console_lines.drain(..) {
                                let mut reply = ConsoleReply::default();
                                let command = screen.console_line(&line, &mut reply);
                                console.apply_reply(reply);
                                if command == ScreenCommand::Quit {
                                    info!(reason = "console_quit", "shutdown_requested");
                                    window_target.exit();
                                }
                            }

                            if screen.advance(fixed_dt_seconds) == ScreenCommand::Quit {
                                info!(reason = "screen_quit", "shutdown_requested");
                                window_target.exit();
                            }
                        }
                        accumulator = step_plan.remaining_accumulator;

                        if step_plan.dropped_backlog > Duration::ZERO {
                            warn!(
                                dropped_backlog_ms = step_plan.dropped_backlog.as_millis() as u64,
                                max_ticks_per_frame, "sim_clamp_triggered"
                            );
                        }

                        let elapsed_since_last_present =
                            Instant::now().saturating_duration_since(last_present_instant);
                        let cap_sleep =
                            compute_cap_sleep(elapsed_since_last_present, render_frame_target);
                        if cap_sleep > Duration::ZERO {
                            thread::sleep(cap_sleep);
                        }

                        let draw_result = renderer.draw_frame(|surface| {
                            screen.render(surface);
                            draw_console(surface, &console);
                        });
                        if let Err(error) = draw_result {
                            warn!(error = %error, "renderer_draw_failed");
                            window_target.exit();
                        }
                        last_present_instant = Instant::now();
                    }
                    _ => {}
                }
            }
            Event::AboutToWait => {
                window_for_loop.request_redraw();
            }
            Event::LoopExiting => {
                screen.shutdown();
                info!("shutdown");
            }
            _ => {}
        })
        .map_err(AppError::EventLoopRun)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputEvent {
    KeyDown(KeyEvent),
    KeyRepeat(KeyEvent),
    MouseMove(MouseMoveEvent),
    MouseDown(MouseEvent),
    MouseRepeat(MouseEvent),
}

fn dispatch_input(screen: &mut dyn Screen, input: InputEvent) -> bool {
    match input {
        InputEvent::KeyDown(event) => screen.on_key_down(event),
        InputEvent::KeyRepeat(event) => screen.on_key_repeat(event),
        InputEvent::MouseMove(event) => screen.on_mouse_move(event),
        InputEvent::MouseDown(event) => screen.on_mouse_button_down(event),
        InputEvent::MouseRepeat(event) => screen.on_mouse_button_repeat(event),
    }
}

/// Buffers window input between ticks and synthesizes per-tick repeats for
/// held mouse buttons.
#[derive(Debug, Default)]
struct InputCollector {
    queued: VecDeque<InputEvent>,
    held_buttons: ButtonStates,
    pressed_since_tick: ButtonStates,
    console_key_is_down: bool,
    pointer_captured: bool,
    cursor: (i32, i32),
    mods: KeyMods,
}

impl InputCollector {
    fn set_mods(&mut self, mods: KeyMods) {
        self.mods = mods;
    }

    /// While captured, pointer input is tracked but never reaches the screen.
    fn set_pointer_captured(&mut self, captured: bool) {
        if captured && !self.pointer_captured {
            self.held_buttons = ButtonStates::default();
            self.pressed_since_tick = ButtonStates::default();
        }
        self.pointer_captured = captured;
    }

    fn handle_cursor_moved(&mut self, x: i32, y: i32) {
        if self.cursor == (x, y) {
            return;
        }
        self.cursor = (x, y);
        if !self.pointer_captured {
            self.push(InputEvent::MouseMove(MouseMoveEvent { x, y }));
        }
    }

    fn handle_mouse_input(&mut self, button: MouseButton, state: ElementState) {
        match state {
            ElementState::Pressed if self.pointer_captured => {}
            ElementState::Pressed => {
                if !self.held_buttons.is_down(button) {
                    self.pressed_since_tick.set(button, true);
                    self.push(InputEvent::MouseDown(self.mouse_event(button)));
                }
                self.held_buttons.set(button, true);
            }
            ElementState::Released => self.held_buttons.set(button, false),
        }
    }

    /// Edge-triggered console toggle; held keys never retrigger.
    fn is_console_toggle(&mut self, key: PhysicalKey, state: ElementState) -> bool {
        if key != PhysicalKey::Code(KeyCode::Backquote) {
            return false;
        }
        match state {
            ElementState::Pressed => {
                let pressed_edge = !self.console_key_is_down;
                self.console_key_is_down = true;
                pressed_edge
            }
            ElementState::Released => {
                self.console_key_is_down = false;
                false
            }
        }
    }

    fn handle_key(&mut self, key: PhysicalKey, state: ElementState, repeat: bool) {
        if state != ElementState::Pressed {
            return;
        }
        let Some(key) = key_from_physical(key) else {
            return;
        };
        if key == Key::Backquote {
            return;
        }
        let event = KeyEvent::new(key, self.mods);
        if repeat {
            self.push(InputEvent::KeyRepeat(event));
        } else {
            self.push(InputEvent::KeyDown(event));
        }
    }

    fn drain_tick_events_into(&mut self, out: &mut Vec<InputEvent>) {
        out.extend(self.queued.drain(..));
        for button in self.held_buttons.held() {
            if !self.pressed_since_tick.is_down(button) {
                out.push(InputEvent::MouseRepeat(self.mouse_event(button)));
            }
        }
        self.pressed_since_tick = ButtonStates::default();
    }

    fn mouse_event(&self, button: MouseButton) -> MouseEvent {
        MouseEvent {
            button,
            x: self.cursor.0,
            y: self.cursor.1,
            mods: self.mods,
        }
    }

    fn push(&mut self, event: InputEvent) {
        if self.queued.len() == MAX_QUEUED_INPUT_EVENTS {
            self.queued.pop_front();
        }
        self.queued.push_back(event);
    }
}

#[derive(Debug, Clone, Copy)]
struct StepPlan {
    ticks_to_run: u32,
    remaining_accumulator: Duration,
    dropped_backlog: Duration,
}

fn plan_sim_steps(
    mut accumulator: Duration,
    fixed_dt: Duration,
    max_ticks_per_frame: u32,
) -> StepPlan {
    let mut ticks_to_run = 0u32;

    while accumulator >= fixed_dt && ticks_to_run < max_ticks_per_frame {
        accumulator = accumulator.saturating_sub(fixed_dt);
        ticks_to_run = ticks_to_run.saturating_add(1);
    }

    if accumulator >= fixed_dt {
        StepPlan {
            ticks_to_run,
            remaining_accumulator: Duration::ZERO,
            dropped_backlog: accumulator,
        }
    } else {
        StepPlan {
            ticks_to_run,
            remaining_accumulator: accumulator,
            dropped_backlog: Duration::ZERO,
        }
    }
}

fn clamp_frame_delta(frame_dt: Duration, max_frame_delta: Duration) -> Duration {
    frame_dt.min(max_frame_delta)
}

fn normalize_non_zero_duration(value: Duration, fallback: Duration) -> Duration {
    if value.is_zero() {
        fallback
    } else {
        value
    }
}

fn target_frame_duration(max_render_fps: Option<u32>) -> Option<Duration> {
    max_render_fps.map(|fps| Duration::from_secs_f64(1.0 / fps as f64))
}

fn compute_cap_sleep(elapsed: Duration, target: Option<Duration>) -> Duration {
    match target {
        Some(frame_target) if elapsed < frame_target => frame_target - elapsed,
        _ => Duration::ZERO,
    }
}
