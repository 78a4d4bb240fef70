use std::time::Duration;

use engine::app::{
    Clock, CommandProcessor, CommandRegistry, ConsoleReply, KeyEvent, MouseEvent, MouseMoveEvent,
    Rect, Surface,
};
use engine::map::{MapEngine, MapRenderer, MissileCatalog, Player};
use engine::{AssetLoader, Screen, ScreenCommand};
use tracing::info;

use super::config::ControlsConfig;
use super::controls::{ControlsCommand, ControlsEvent, GameControls};

const HERO_MARKER_HALF_SIZE: i32 = 5;
const HERO_MARKER_COLOR: [u8; 4] = [240, 220, 120, 255];

/// Everything the controls act on. Owned by the screen and lent to the
/// controls for the duration of each call.
pub(crate) struct GameWorld {
    pub(crate) hero: Player,
    pub(crate) map_engine: MapEngine,
    pub(crate) map_renderer: Box<dyn MapRenderer>,
    pub(crate) missiles: MissileCatalog,
}

pub(crate) struct GameplayScreen {
    world: GameWorld,
    controls: GameControls,
    commands: CommandProcessor<ControlsCommand>,
    pending_commands: Vec<ControlsCommand>,
    events: Vec<ControlsEvent>,
    current_zone: Option<String>,
    zone_text_hide_after: Duration,
}

impl GameplayScreen {
    pub(crate) fn new(world: GameWorld, config: &ControlsConfig, clock: Box<dyn Clock>) -> Self {
        let mut registry = CommandRegistry::with_engine_builtins();
        GameControls::register_debug_commands(&mut registry);
        Self {
            world,
            controls: GameControls::new(config, clock),
            commands: CommandProcessor::new(registry),
            pending_commands: Vec::new(),
            events: Vec::new(),
            current_zone: None,
            zone_text_hide_after: Duration::from_secs_f64(config.zone_text_hide_secs),
        }
    }

    fn apply_controls_events(&mut self) -> ScreenCommand {
        self.controls.drain_events_into(&mut self.events);
        let mut command = ScreenCommand::None;
        for event in self.events.drain(..) {
            match event {
                ControlsEvent::MovePlayer { x, y } => self.world.hero.move_to_world(x, y),
                ControlsEvent::ExitGame => {
                    info!("exit_game_requested");
                    command = ScreenCommand::Quit;
                }
            }
        }
        command
    }

    fn follow_hero(&mut self) {
        if self.controls.is_free_cam() {
            return;
        }
        let (x, y) = self.world.hero.tile_position();
        self.world.map_renderer.set_camera_target(x, y);
    }

    fn update_zone(&mut self) {
        let (x, y) = self.world.hero.tile_position();
        let zone = self
            .world
            .map_engine
            .zone_at(x, y)
            .map(|zone| zone.name.clone());
        if zone == self.current_zone {
            return;
        }
        if let Some(name) = &zone {
            info!(zone = %name, "zone_entered");
            self.controls.set_zone_change_text(format!("Entering {name}"));
            self.controls.show_zone_change_text();
            self.controls
                .hide_zone_change_text_after(self.zone_text_hide_after);
        }
        self.current_zone = zone;
    }
}

impl Screen for GameplayScreen {
    fn load(&mut self, assets: &mut AssetLoader) {
        self.controls.load(assets, &self.world.hero);
        self.controls.update_layout(self.world.map_renderer.as_mut());
        self.follow_hero();
        self.update_zone();
        info!(hero = self.world.hero.name(), "gameplay_screen_loaded");
    }

    fn advance(&mut self, elapsed: f64) -> ScreenCommand {
        let command = self.apply_controls_events();

        self.world.hero.advance(elapsed);
        self.world.map_engine.advance(elapsed);
        self.controls.advance(elapsed);

        self.follow_hero();
        self.update_zone();
        command
    }

    fn on_key_down(&mut self, event: KeyEvent) -> bool {
        self.controls.on_key_down(event, &mut self.world)
    }

    fn on_key_repeat(&mut self, event: KeyEvent) -> bool {
        self.controls.on_key_repeat(event, &mut self.world)
    }

    fn on_mouse_move(&mut self, event: MouseMoveEvent) -> bool {
        self.controls.on_mouse_move(event)
    }

    fn on_mouse_button_down(&mut self, event: MouseEvent) -> bool {
        self.controls.on_mouse_button_down(event, &mut self.world)
    }

    fn on_mouse_button_repeat(&mut self, event: MouseEvent) -> bool {
        self.controls.on_mouse_button_repeat(event, &mut self.world)
    }

    fn render(&mut self, target: &mut dyn Surface) {
        self.world
            .map_renderer
            .render(target, &self.world.map_engine);

        let (x, y) = self.world.hero.tile_position();
        let (screen_x, screen_y) = self.world.map_renderer.world_to_screen(x, y);
        target.fill_rect(
            Rect::new(
                screen_x - HERO_MARKER_HALF_SIZE,
                screen_y - HERO_MARKER_HALF_SIZE,
                HERO_MARKER_HALF_SIZE * 2,
                HERO_MARKER_HALF_SIZE * 2,
            ),
            HERO_MARKER_COLOR,
        );

        self.controls.render(target);
    }

    fn console_line(&mut self, line: &str, reply: &mut ConsoleReply) -> ScreenCommand {
        self.commands.process_line(line, reply);
        self.commands
            .drain_pending_commands_into(&mut self.pending_commands);
        for command in self.pending_commands.drain(..) {
            let message = self.controls.apply_debug_command(command);
            reply.lines.push(message);
        }
        if self.commands.take_quit_requested() {
            return ScreenCommand::Quit;
        }
        ScreenCommand::None
    }

    fn shutdown(&mut self) {
        info!(
            entity_count = self.world.map_engine.entity_count(),
            "gameplay_screen_shutdown"
        );
    }
}

#[cfg(test)]
mod tests {
    use engine::app::{Key, ManualClock, MouseButton, RecordingSurface, Vec2};
    use engine::map::IsoMapRenderer;

    use super::*;

    fn world() -> GameWorld {
        let mut map_engine = MapEngine::new();
        map_engine.add_zone("Blood Moor", Rect::new(10, 0, 20, 20));
        GameWorld {
            hero: Player::new("hero", Vec2::new(0.0, 0.0)),
            map_engine,
            map_renderer: Box::new(IsoMapRenderer::new(800, 600)),
            missiles: MissileCatalog::builtin(),
        }
    }

    fn screen(clock: ManualClock) -> GameplayScreen {
        GameplayScreen::new(world(), &ControlsConfig::default(), Box::new(clock))
    }

    #[test]
    fn left_click_walks_hero_toward_clicked_tile() {
        let mut screen = screen(ManualClock::default());
        let (x, y) = screen.world.map_renderer.world_to_screen(3.0, 1.0);

        assert!(screen.on_mouse_button_down(MouseEvent::new(MouseButton::Left, x, y)));
        assert_eq!(screen.advance(0.04), ScreenCommand::None);

        assert_eq!(screen.world.hero.target(), Some(Vec2::new(15.0, 5.0)));
        assert!(screen.world.hero.location().x > 0.0);
    }

    #[test]
    fn save_and_exit_quits_on_next_tick() {
        let mut screen = screen(ManualClock::default());
        screen.on_key_down(KeyEvent::plain(Key::Escape));
        screen.on_key_down(KeyEvent::plain(Key::Down));
        screen.on_key_down(KeyEvent::plain(Key::Enter));

        assert_eq!(screen.advance(0.04), ScreenCommand::Quit);
    }

    #[test]
    fn entering_zone_raises_banner_until_real_time_elapses() {
        let clock = ManualClock::default();
        let mut screen = screen(clock.clone());
        screen.world.hero = Player::new("hero", Vec2::new(60.0, 10.0));

        screen.advance(0.04);
        assert!(screen.controls.is_zone_text_shown());
        assert_eq!(screen.current_zone.as_deref(), Some("Blood Moor"));

        screen.advance(0.04);
        assert!(screen.controls.is_zone_text_shown());

        clock.advance(Duration::from_secs(5));
        screen.advance(0.04);
        assert!(!screen.controls.is_zone_text_shown());
    }

    #[test]
    fn console_commands_reach_controls() {
        let mut screen = screen(ManualClock::default());
        let mut reply = ConsoleReply::default();

        let command = screen.console_line("setmissile 7", &mut reply);
        assert_eq!(command, ScreenCommand::None);
        assert_eq!(screen.controls.missile_id(), 7);
        assert_eq!(reply.lines, vec!["missile id set to 7".to_string()]);

        let mut reply = ConsoleReply::default();
        screen.console_line("freecam", &mut reply);
        assert!(screen.controls.is_free_cam());

        let mut reply = ConsoleReply::default();
        assert_eq!(screen.console_line("quit", &mut reply), ScreenCommand::Quit);
    }

    #[test]
    fn camera_stops_following_hero_in_free_cam() {
        let mut screen = screen(ManualClock::default());
        screen.world.hero = Player::new("hero", Vec2::new(10.0, 0.0));
        screen.advance(0.04);
        assert_eq!(screen.world.map_renderer.world_to_screen(2.0, 0.0), (400, 300));

        let mut reply = ConsoleReply::default();
        screen.console_line("freecam", &mut reply);
        screen.world.hero = Player::new("hero", Vec2::new(50.0, 0.0));
        screen.advance(0.04);
        assert_eq!(screen.world.map_renderer.world_to_screen(2.0, 0.0), (400, 300));
    }

    #[test]
    fn render_draws_hero_marker_before_hud() {
        let mut screen = screen(ManualClock::default());
        screen.advance(0.04);
        let mut surface = RecordingSurface::new(800, 600);

        screen.render(&mut surface);

        assert!(surface.calls().iter().any(|call| matches!(
            call,
            engine::app::DrawCall::Rect { color, .. } if *color == HERO_MARKER_COLOR
        )));
    }
}
