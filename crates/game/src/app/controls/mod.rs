//! In-game HUD and input routing: the bottom control bar, the side panels,
//! the escape menu and the translation of pointer input into hero orders.

mod hud;
mod regions;

use std::time::Duration;

use engine::app::{
    radians_between, require_no_args, Clock, CommandParseError, CommandRegistry, DeferredQueue,
    Key, KeyEvent, KeyMods, MouseButton, MouseEvent, MouseMoveEvent, ParsedCommand, Surface,
    TextAlign,
};
use engine::map::{MapRenderer, Missile, Player};
use engine::ui::Label;
use engine::AssetLoader;
use tracing::{debug, info};

use super::config::ControlsConfig;
use super::panels::{EscapeMenu, Panel, SidePanel};
use super::session::GameWorld;
use hud::HudSprites;

pub(crate) use regions::{ActionableRegion, ActionableType, DEFAULT_REGIONS};

const ZONE_TEXT_SCALE: i32 = 4;

/// Requests the controls make of the screen that owns them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum ControlsEvent {
    /// Walk the hero to a world position, in tiles.
    MovePlayer { x: f64, y: f64 },
    ExitGame,
}

/// Console commands owned by the controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ControlsCommand {
    SetMissile(i32),
    ToggleFreeCam,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeferredEvent {
    HideZoneText,
}

/// Last accepted action time per button, in simulated seconds. `None`
/// means the button has not acted yet.
#[derive(Debug, Clone, Copy, Default)]
struct ButtonDebounce {
    left: Option<f64>,
    right: Option<f64>,
}

impl ButtonDebounce {
    fn slot(&mut self, button: MouseButton) -> Option<&mut Option<f64>> {
        match button {
            MouseButton::Left => Some(&mut self.left),
            MouseButton::Right => Some(&mut self.right),
            MouseButton::Middle => None,
        }
    }

    fn record(&mut self, button: MouseButton, now: f64) {
        if let Some(slot) = self.slot(button) {
            *slot = Some(now);
        }
    }

    /// Records `now` and returns true when the button is outside its
    /// threshold window.
    fn try_act(&mut self, button: MouseButton, now: f64, threshold: f64) -> bool {
        let Some(slot) = self.slot(button) else {
            return false;
        };
        if slot.is_some_and(|last| now - last < threshold) {
            return false;
        }
        *slot = Some(now);
        true
    }
}

pub(crate) struct GameControls {
    inventory: SidePanel,
    hero_stats: SidePanel,
    escape_menu: EscapeMenu,
    regions: Vec<ActionableRegion>,
    hovered: Vec<ActionableType>,
    free_cam: bool,
    missile_id: i32,
    missile_target_scale: f64,
    camera_pan_speed: f64,
    mouse_action_threshold: f64,
    debounce: ButtonDebounce,
    sim_time: f64,
    hud: Option<HudSprites>,
    zone_text: Label,
    zone_text_shown: bool,
    clock: Box<dyn Clock>,
    deferred: DeferredQueue<DeferredEvent>,
    due_events: Vec<DeferredEvent>,
    events: Vec<ControlsEvent>,
}

impl GameControls {
    pub(crate) fn new(config: &ControlsConfig, clock: Box<dyn Clock>) -> Self {
        Self {
            inventory: SidePanel::inventory(),
            hero_stats: SidePanel::hero_stats(),
            escape_menu: EscapeMenu::new(config.window_width),
            regions: config.regions(),
            hovered: Vec::new(),
            free_cam: false,
            missile_id: config.default_missile_id,
            missile_target_scale: config.missile_target_scale,
            camera_pan_speed: config.camera_pan_speed,
            mouse_action_threshold: config.mouse_action_threshold_secs,
            debounce: ButtonDebounce::default(),
            sim_time: 0.0,
            hud: None,
            zone_text: Label::new(ZONE_TEXT_SCALE, config.zone_text_color, TextAlign::Center),
            zone_text_shown: false,
            clock,
            deferred: DeferredQueue::default(),
            due_events: Vec::new(),
            events: Vec::new(),
        }
    }

    pub(crate) fn load(&mut self, assets: &mut AssetLoader, hero: &Player) {
        self.hud = Some(HudSprites::load(assets, hero));
        self.inventory.load(assets);
        self.hero_stats.load(assets);
        self.escape_menu.load(assets);
        info!(regions = self.regions.len(), "game_controls_loaded");
    }

    /// Always reports the key as unconsumed, even when it was acted on.
    pub(crate) fn on_key_down(&mut self, event: KeyEvent, world: &mut GameWorld) -> bool {
        match event.key {
            Key::Escape => {
                if self.inventory.is_open() || self.hero_stats.is_open() {
                    self.inventory.close();
                    self.hero_stats.close();
                    self.update_layout(world.map_renderer.as_mut());
                } else {
                    self.escape_menu.toggle();
                }
            }
            Key::Up => self.escape_menu.on_up_key(),
            Key::Down => self.escape_menu.on_down_key(),
            Key::Enter => self.escape_menu.on_enter_key(),
            Key::I => {
                self.inventory.toggle();
                self.update_layout(world.map_renderer.as_mut());
            }
            Key::C => {
                self.hero_stats.toggle();
                self.update_layout(world.map_renderer.as_mut());
            }
            Key::R => self.toggle_run(&mut world.hero),
            Key::Left | Key::Right | Key::Backquote => {}
        }
        self.escape_menu.drain_events_into(&mut self.events);
        false
    }

    /// Pans the camera with the arrow keys while free camera is enabled.
    pub(crate) fn on_key_repeat(&mut self, event: KeyEvent, world: &mut GameWorld) -> bool {
        if !self.free_cam {
            return false;
        }
        let mut speed = self.camera_pan_speed;
        if event.mods == KeyMods::SHIFT {
            speed *= 2.0;
        }
        let (dx, dy) = match event.key {
            Key::Down => (0.0, speed),
            Key::Up => (0.0, -speed),
            Key::Right => (speed, 0.0),
            Key::Left => (-speed, 0.0),
            _ => return false,
        };
        world.map_renderer.move_camera_by(dx, dy);
        true
    }

    pub(crate) fn on_mouse_move(&mut self, event: MouseMoveEvent) -> bool {
        if self.escape_menu.is_open() {
            self.escape_menu.on_mouse_move(event);
            self.hovered.clear();
            return false;
        }
        self.hovered.clear();
        for region in regions::regions_at(&self.regions, event.x, event.y) {
            self.hovered.push(region.kind);
            on_hover_actionable(region.kind);
        }
        false
    }

    pub(crate) fn on_mouse_button_down(
        &mut self,
        event: MouseEvent,
        world: &mut GameWorld,
    ) -> bool {
        if self.escape_menu.is_open() {
            let consumed = self.escape_menu.on_mouse_button_down(event);
            self.escape_menu.drain_events_into(&mut self.events);
            return consumed;
        }

        if event.button == MouseButton::Left && hud::run_button_contains(event.x, event.y) {
            self.toggle_run(&mut world.hero);
            info!(running = world.hero.is_run_toggled(), "run_button_clicked");
        }
        if let Some(region) = regions::first_region_at(&self.regions, event.x, event.y) {
            on_click_actionable(region.kind);
            return false;
        }

        let (x, y) = project_to_world(world.map_renderer.as_ref(), event.x, event.y);
        match event.button {
            MouseButton::Left => {
                self.debounce.record(MouseButton::Left, self.sim_time);
                self.events.push(ControlsEvent::MovePlayer { x, y });
                true
            }
            MouseButton::Right => {
                self.debounce.record(MouseButton::Right, self.sim_time);
                self.shoot_missile(x, y, world)
            }
            MouseButton::Middle => false,
        }
    }

    /// Held-button handling. Actions are rate limited per button; the event
    /// is reported consumed whether or not an action fired.
    pub(crate) fn on_mouse_button_repeat(
        &mut self,
        event: MouseEvent,
        world: &mut GameWorld,
    ) -> bool {
        if self.escape_menu.is_open() {
            return false;
        }

        let (x, y) = project_to_world(world.map_renderer.as_ref(), event.x, event.y);
        let now = self.sim_time;
        let threshold = self.mouse_action_threshold;
        match event.button {
            MouseButton::Left if self.debounce.try_act(MouseButton::Left, now, threshold) => {
                self.events.push(ControlsEvent::MovePlayer { x, y });
            }
            MouseButton::Right if self.debounce.try_act(MouseButton::Right, now, threshold) => {
                self.shoot_missile(x, y, world);
            }
            _ => {}
        }
        true
    }

    /// Spawns the selected missile at the hero, aimed at a world position in
    /// tiles. Returns false without side effects if the missile cannot be
    /// built.
    pub(crate) fn shoot_missile(&mut self, x: f64, y: f64, world: &mut GameWorld) -> bool {
        let Ok(def) = world.missiles.get(self.missile_id) else {
            return false;
        };
        let hero = world.hero.location();
        let Ok(mut missile) = Missile::new(hero.x as i32, hero.y as i32, def) else {
            return false;
        };
        let radians = radians_between(
            hero.x,
            hero.y,
            x * self.missile_target_scale,
            y * self.missile_target_scale,
        );
        missile.set_radians(radians, |id, commands| commands.remove(id));
        let id = world.map_engine.add_entity(Box::new(missile));
        debug!(entity = id.0, missile_id = self.missile_id, radians, "missile_spawned");
        true
    }

    /// Shifts the map view away from whichever side panel is open.
    pub(crate) fn update_layout(&self, renderer: &mut dyn MapRenderer) {
        let right_open = self.inventory.is_open();
        let left_open = self.hero_stats.is_open();
        if right_open == left_open {
            renderer.viewport_default();
        } else if right_open {
            renderer.viewport_to_left();
        } else {
            renderer.viewport_to_right();
        }
    }

    pub(crate) fn render(&mut self, target: &mut dyn Surface) {
        self.inventory.render(target);
        self.hero_stats.render(target);
        self.escape_menu.render(target);

        let Some(hud) = &mut self.hud else {
            return;
        };
        hud.render(target);

        if self.zone_text_shown {
            let (width, height) = target.size();
            self.zone_text.set_position(width as i32 / 2, height as i32 / 4);
            self.zone_text.render(target);
        }
    }

    pub(crate) fn set_zone_change_text(&mut self, text: impl Into<String>) {
        self.zone_text.set_text(text);
    }

    pub(crate) fn show_zone_change_text(&mut self) {
        self.zone_text_shown = true;
    }

    /// Hides the banner once `delay` of wall-clock time has passed. Hides
    /// cannot be cancelled; every scheduled hide fires.
    pub(crate) fn hide_zone_change_text_after(&mut self, delay: Duration) {
        let due = self.clock.now() + delay;
        self.deferred.schedule(due, DeferredEvent::HideZoneText);
    }

    pub(crate) fn is_zone_text_shown(&self) -> bool {
        self.zone_text_shown
    }

    pub(crate) fn advance(&mut self, elapsed: f64) {
        self.sim_time += elapsed;
        self.escape_menu.advance(elapsed);

        self.deferred.drain_due_into(self.clock.now(), &mut self.due_events);
        for event in self.due_events.drain(..) {
            match event {
                DeferredEvent::HideZoneText => self.zone_text_shown = false,
            }
        }
    }

    pub(crate) fn in_escape_menu(&self) -> bool {
        self.escape_menu.is_open()
    }

    pub(crate) fn is_free_cam(&self) -> bool {
        self.free_cam
    }

    pub(crate) fn missile_id(&self) -> i32 {
        self.missile_id
    }

    pub(crate) fn hovered_actionables(&self) -> &[ActionableType] {
        &self.hovered
    }

    pub(crate) fn drain_events_into(&mut self, out: &mut Vec<ControlsEvent>) {
        out.append(&mut self.events);
    }

    pub(crate) fn register_debug_commands(registry: &mut CommandRegistry<ControlsCommand>) {
        registry
            .register(
                "setmissile",
                "Set missile id summoned on right click",
                "<id:i32>",
                parse_set_missile_command,
            )
            .expect("controls command registration should not fail");
        registry
            .register(
                "freecam",
                "Toggle free camera movement",
                "",
                parse_free_cam_command,
            )
            .expect("controls command registration should not fail");
    }

    pub(crate) fn apply_debug_command(&mut self, command: ControlsCommand) -> String {
        match command {
            ControlsCommand::SetMissile(id) => {
                self.missile_id = id;
                info!(missile_id = id, "missile_id_set");
                format!("missile id set to {id}")
            }
            ControlsCommand::ToggleFreeCam => {
                self.free_cam = !self.free_cam;
                info!(free_cam = self.free_cam, "free_cam_toggled");
                format!("free camera {}", if self.free_cam { "on" } else { "off" })
            }
        }
    }

    fn toggle_run(&mut self, hero: &mut Player) {
        if let Some(hud) = &mut self.hud {
            hud.toggle_run_button();
        }
        hero.toggle_run_walk();
        hero.set_is_running(hero.is_run_toggled());
    }
}

/// World position under a screen pixel, truncated toward zero to one decimal.
fn project_to_world(renderer: &dyn MapRenderer, x: i32, y: i32) -> (f64, f64) {
    let (world_x, world_y) = renderer.screen_to_world(x, y);
    (truncate_tenths(world_x), truncate_tenths(world_y))
}

fn truncate_tenths(value: f64) -> f64 {
    (value * 10.0).trunc() / 10.0
}

fn on_hover_actionable(_kind: ActionableType) {}

fn on_click_actionable(kind: ActionableType) {
    info!(action = kind.action_name(), "actionable_pressed");
}

fn parse_set_missile_command(
    args: &[String],
) -> Result<ParsedCommand<ControlsCommand>, CommandParseError> {
    let [id] = args else {
        return Err(CommandParseError::new(
            "expected exactly one argument <id>",
            "setmissile <id>",
        ));
    };
    let id = id.parse::<i32>().map_err(|_| {
        CommandParseError::new(
            format!("invalid missile id '{id}' (expected i32)"),
            "setmissile <id>",
        )
    })?;
    Ok(ParsedCommand::Queueable(ControlsCommand::SetMissile(id)))
}

fn parse_free_cam_command(
    args: &[String],
) -> Result<ParsedCommand<ControlsCommand>, CommandParseError> {
    require_no_args(args, "freecam")?;
    Ok(ParsedCommand::Queueable(ControlsCommand::ToggleFreeCam))
}
