use std::time::Duration;

use engine::app::{CommandProcessor, ConsoleReply, ManualClock, RecordingSurface, Vec2};
use engine::map::{IsoMapRenderer, MapEngine, MissileCatalog, ViewportAlign};

use super::hud::{LEFT_SKILL_FRAME, RIGHT_SKILL_FRAME};
use super::*;
use crate::app::config::RawRegion;

const TICK: f64 = 0.04;

fn world() -> GameWorld {
    GameWorld {
        hero: Player::new("hero", Vec2::new(0.0, 0.0)),
        map_engine: MapEngine::new(),
        map_renderer: Box::new(IsoMapRenderer::new(800, 600)),
        missiles: MissileCatalog::builtin(),
    }
}

fn controls() -> GameControls {
    controls_with_clock(ManualClock::default())
}

fn controls_with_clock(clock: ManualClock) -> GameControls {
    GameControls::new(&ControlsConfig::default(), Box::new(clock))
}

fn loaded_controls(world: &GameWorld) -> (GameControls, tempfile::TempDir) {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut assets = AssetLoader::new(dir.path());
    let mut controls = controls();
    controls.load(&mut assets, &world.hero);
    (controls, dir)
}

fn drain(controls: &mut GameControls) -> Vec<ControlsEvent> {
    let mut events = Vec::new();
    controls.drain_events_into(&mut events);
    events
}

fn press(controls: &mut GameControls, world: &mut GameWorld, key: Key) -> bool {
    controls.on_key_down(KeyEvent::plain(key), world)
}

#[test]
fn hover_reports_every_region_but_click_takes_only_the_first() {
    let config = ControlsConfig {
        actionable_regions: Some(vec![
            RawRegion {
                kind: 0,
                left: 0,
                top: 0,
                width: 10,
                height: 10,
            },
            RawRegion {
                kind: 1,
                left: 5,
                top: 5,
                width: 10,
                height: 10,
            },
        ]),
        ..ControlsConfig::default()
    };
    let mut controls = GameControls::new(&config, Box::new(ManualClock::default()));
    let mut world = world();

    assert!(!controls.on_mouse_move(MouseMoveEvent { x: 7, y: 7 }));
    assert_eq!(
        controls.hovered_actionables(),
        &[ActionableType::LeftSkill, ActionableType::LeftSelector]
    );

    assert!(!controls.on_mouse_button_down(MouseEvent::new(MouseButton::Left, 7, 7), &mut world));
    assert!(drain(&mut controls).is_empty());

    controls.on_mouse_move(MouseMoveEvent { x: 300, y: 300 });
    assert!(controls.hovered_actionables().is_empty());
}

#[test]
fn clicking_a_hud_region_does_not_move_or_shoot() {
    let mut controls = controls();
    let mut world = world();

    let walk_run = MouseEvent::new(MouseButton::Left, 260, 580);
    assert!(!controls.on_mouse_button_down(walk_run, &mut world));
    let right_skill = MouseEvent::new(MouseButton::Right, 650, 560);
    assert!(!controls.on_mouse_button_down(right_skill, &mut world));

    assert!(drain(&mut controls).is_empty());
    assert_eq!(world.map_engine.entity_count(), 0);
}

#[test]
fn left_click_queues_move_truncated_toward_zero() {
    let mut controls = controls();
    let mut world = world();

    assert!(controls.on_mouse_button_down(MouseEvent::new(MouseButton::Left, 450, 330), &mut world));
    assert!(controls.on_mouse_button_down(MouseEvent::new(MouseButton::Left, 400, 250), &mut world));
    assert!(!controls.on_mouse_button_down(MouseEvent::new(MouseButton::Middle, 400, 250), &mut world));

    assert_eq!(
        drain(&mut controls),
        vec![
            ControlsEvent::MovePlayer { x: 0.6, y: 0.0 },
            ControlsEvent::MovePlayer { x: -0.6, y: -0.6 },
        ]
    );
}

#[test]
fn right_click_spawns_missile_that_removes_itself_after_flight() {
    let mut controls = controls();
    let mut world = world();

    assert!(controls.on_mouse_button_down(MouseEvent::new(MouseButton::Right, 450, 330), &mut world));
    assert_eq!(world.map_engine.entity_count(), 1);

    for _ in 0..25 {
        world.map_engine.advance(TICK);
    }
    assert_eq!(world.map_engine.entity_count(), 0);
}

#[test]
fn unknown_missile_id_fails_without_touching_entities() {
    let mut controls = controls();
    let mut world = world();
    controls.apply_debug_command(ControlsCommand::SetMissile(-1));

    assert!(!controls.shoot_missile(3.0, 3.0, &mut world));
    assert!(!controls.on_mouse_button_down(MouseEvent::new(MouseButton::Right, 450, 330), &mut world));
    assert_eq!(world.map_engine.entity_count(), 0);
}

#[test]
fn missile_selection_is_per_instance() {
    let mut first = controls();
    let second = controls();

    first.apply_debug_command(ControlsCommand::SetMissile(35));

    assert_eq!(first.missile_id(), 35);
    assert_eq!(second.missile_id(), 59);
}

#[test]
fn layout_follows_open_side_panels() {
    let mut controls = controls();
    let mut world = world();
    let alignment = |world: &GameWorld| world.map_renderer.alignment();

    controls.update_layout(world.map_renderer.as_mut());
    assert_eq!(alignment(&world), ViewportAlign::Default);

    press(&mut controls, &mut world, Key::I);
    assert_eq!(alignment(&world), ViewportAlign::Left);

    press(&mut controls, &mut world, Key::C);
    assert_eq!(alignment(&world), ViewportAlign::Default);

    press(&mut controls, &mut world, Key::I);
    assert_eq!(alignment(&world), ViewportAlign::Right);

    controls.update_layout(world.map_renderer.as_mut());
    assert_eq!(alignment(&world), ViewportAlign::Right);
}

#[test]
fn held_buttons_act_at_most_once_per_threshold() {
    let mut controls = controls();
    let mut world = world();
    let held = MouseEvent::new(MouseButton::Left, 450, 330);

    assert!(controls.on_mouse_button_repeat(held, &mut world));
    assert_eq!(drain(&mut controls).len(), 1);

    controls.advance(0.1);
    assert!(controls.on_mouse_button_repeat(held, &mut world));
    assert!(drain(&mut controls).is_empty());

    controls.advance(0.2);
    assert!(controls.on_mouse_button_repeat(held, &mut world));
    assert_eq!(drain(&mut controls).len(), 1);
}

#[test]
fn button_press_starts_the_debounce_window() {
    let mut controls = controls();
    let mut world = world();
    let right = MouseEvent::new(MouseButton::Right, 450, 330);

    controls.on_mouse_button_down(right, &mut world);
    controls.advance(0.2);
    controls.on_mouse_button_repeat(right, &mut world);
    assert_eq!(world.map_engine.entity_count(), 1);

    // Left has its own window.
    controls.on_mouse_button_repeat(MouseEvent::new(MouseButton::Left, 450, 330), &mut world);
    assert_eq!(drain(&mut controls).len(), 1);

    controls.advance(0.1);
    controls.on_mouse_button_repeat(right, &mut world);
    assert_eq!(world.map_engine.entity_count(), 2);
}

#[test]
fn escape_closes_side_panels_before_opening_menu() {
    let mut controls = controls();
    let mut world = world();
    press(&mut controls, &mut world, Key::I);
    press(&mut controls, &mut world, Key::C);

    press(&mut controls, &mut world, Key::Escape);
    assert!(!controls.inventory.is_open());
    assert!(!controls.hero_stats.is_open());
    assert!(!controls.in_escape_menu());
    assert_eq!(world.map_renderer.alignment(), ViewportAlign::Default);

    press(&mut controls, &mut world, Key::Escape);
    assert!(controls.in_escape_menu());
    press(&mut controls, &mut world, Key::Escape);
    assert!(!controls.in_escape_menu());
}

#[test]
fn key_down_never_reports_consumed() {
    let mut controls = controls();
    let mut world = world();

    for key in [
        Key::Escape,
        Key::Down,
        Key::Up,
        Key::Enter,
        Key::I,
        Key::C,
        Key::R,
        Key::Left,
    ] {
        assert!(!press(&mut controls, &mut world, key), "{key:?}");
    }
}

#[test]
fn r_toggles_run_on_hero_and_button() {
    let mut world = world();
    let (mut controls, _dir) = loaded_controls(&world);

    press(&mut controls, &mut world, Key::R);
    assert!(world.hero.is_run_toggled());
    assert!(world.hero.is_running());
    assert!(controls
        .hud
        .as_ref()
        .is_some_and(HudSprites::is_run_button_toggled));

    press(&mut controls, &mut world, Key::R);
    assert!(!world.hero.is_running());
}

#[test]
fn clicking_the_run_button_toggles_run() {
    let mut world = world();
    let (mut controls, _dir) = loaded_controls(&world);
    let run_button = MouseEvent::new(MouseButton::Left, 260, 580);

    assert!(!controls.on_mouse_button_down(run_button, &mut world));
    assert!(world.hero.is_run_toggled());
    assert!(world.hero.is_running());
    assert!(controls
        .hud
        .as_ref()
        .is_some_and(HudSprites::is_run_button_toggled));
    assert!(drain(&mut controls).is_empty());

    let right_click = MouseEvent::new(MouseButton::Right, 260, 580);
    controls.on_mouse_button_down(right_click, &mut world);
    assert!(world.hero.is_run_toggled());

    controls.on_mouse_button_down(run_button, &mut world);
    assert!(!world.hero.is_run_toggled());
}

#[test]
fn run_button_works_before_hud_is_loaded() {
    let mut controls = controls();
    let mut world = world();

    controls.on_mouse_button_down(MouseEvent::new(MouseButton::Left, 260, 580), &mut world);
    assert!(world.hero.is_run_toggled());
}

#[test]
fn arrow_repeat_pans_only_in_free_cam() {
    let mut controls = controls();
    let mut world = world();
    let right = KeyEvent::plain(Key::Right);

    assert!(!controls.on_key_repeat(right, &mut world));
    assert_eq!(world.map_renderer.world_to_screen(0.0, 0.0), (400, 300));

    controls.apply_debug_command(ControlsCommand::ToggleFreeCam);
    assert!(controls.on_key_repeat(right, &mut world));
    assert_eq!(world.map_renderer.world_to_screen(0.0, 0.0), (392, 300));

    assert!(controls.on_key_repeat(KeyEvent::new(Key::Up, KeyMods::SHIFT), &mut world));
    assert_eq!(world.map_renderer.world_to_screen(0.0, 0.0), (392, 316));

    let shift_ctrl = KeyMods {
        ctrl: true,
        ..KeyMods::SHIFT
    };
    assert!(controls.on_key_repeat(KeyEvent::new(Key::Left, shift_ctrl), &mut world));
    assert_eq!(world.map_renderer.world_to_screen(0.0, 0.0), (400, 316));

    assert!(!controls.on_key_repeat(KeyEvent::plain(Key::Enter), &mut world));
}

#[test]
fn open_escape_menu_captures_pointer_input() {
    let mut controls = controls();
    let mut world = world();
    press(&mut controls, &mut world, Key::Escape);

    assert!(!controls.on_mouse_move(MouseMoveEvent { x: 260, y: 580 }));
    assert!(controls.hovered_actionables().is_empty());

    let map_click = MouseEvent::new(MouseButton::Left, 700, 100);
    assert!(!controls.on_mouse_button_down(map_click, &mut world));
    assert!(!controls.on_mouse_button_repeat(map_click, &mut world));
    assert!(drain(&mut controls).is_empty());

    // "Return to Game" sits at y = 312.
    assert!(controls.on_mouse_button_down(MouseEvent::new(MouseButton::Left, 400, 320), &mut world));
    assert!(!controls.in_escape_menu());
}

#[test]
fn opening_escape_menu_drops_stale_hover() {
    let mut controls = controls();
    let mut world = world();

    controls.on_mouse_move(MouseMoveEvent { x: 260, y: 580 });
    assert_eq!(controls.hovered_actionables(), &[ActionableType::WalkRun]);

    press(&mut controls, &mut world, Key::Escape);
    controls.on_mouse_move(MouseMoveEvent { x: 261, y: 580 });
    assert!(controls.hovered_actionables().is_empty());
}

#[test]
fn every_scheduled_banner_hide_fires() {
    let clock = ManualClock::default();
    let mut controls = controls_with_clock(clock.clone());
    controls.set_zone_change_text("Entering Blood Moor");
    controls.show_zone_change_text();
    controls.hide_zone_change_text_after(Duration::from_secs(1));
    controls.hide_zone_change_text_after(Duration::from_secs(3));

    controls.advance(10.0);
    assert!(controls.is_zone_text_shown());

    clock.advance(Duration::from_secs(1));
    controls.advance(TICK);
    assert!(!controls.is_zone_text_shown());

    controls.show_zone_change_text();
    clock.advance(Duration::from_secs(2));
    controls.advance(TICK);
    assert!(!controls.is_zone_text_shown());
}

#[test]
fn hud_is_drawn_left_to_right_along_the_bottom_edge() {
    let world = world();
    let (mut controls, _dir) = loaded_controls(&world);
    let mut surface = RecordingSurface::new(800, 600);

    controls.render(&mut surface);

    let sprites: Vec<_> = surface.sprite_calls().collect();
    assert_eq!(
        sprites,
        vec![
            ("hud/control_panel", 0, 0, 600),
            ("hud/globe_overlap", 0, 28, 595),
            ("hud/generic_skills", LEFT_SKILL_FRAME, 117, 600),
            ("hud/control_panel", 1, 165, 600),
            ("hud/control_panel", 2, 253, 600),
            ("hud/menu_button", 0, 392, 584),
            ("hud/control_panel", 3, 406, 600),
            ("hud/control_panel", 4, 553, 600),
            ("hud/generic_skills", RIGHT_SKILL_FRAME, 634, 600),
            ("hud/control_panel", 5, 682, 600),
            ("hud/globe_overlap", 1, 690, 592),
            ("hud/run_button", 0, 255, 590),
        ]
    );
    assert_eq!(surface.texts().count(), 0);
}

#[test]
fn banner_is_centered_in_upper_quarter_when_shown() {
    let world = world();
    let (mut controls, _dir) = loaded_controls(&world);
    controls.set_zone_change_text("Entering Den of Evil");
    controls.show_zone_change_text();
    let mut surface = RecordingSurface::new(800, 600);

    controls.render(&mut surface);

    assert!(surface.calls().iter().any(|call| matches!(
        call,
        engine::app::DrawCall::Text { text, x: 400, y: 150, align: TextAlign::Center }
            if text == "Entering Den of Evil"
    )));
}

#[test]
fn nothing_but_panels_is_drawn_before_load() {
    let mut controls = controls();
    let mut world = world();
    controls.show_zone_change_text();
    let mut surface = RecordingSurface::new(800, 600);

    controls.render(&mut surface);
    assert!(surface.calls().is_empty());

    press(&mut controls, &mut world, Key::I);
    controls.render(&mut surface);
    assert_eq!(surface.texts().collect::<Vec<_>>(), vec!["INVENTORY"]);
}

#[test]
fn debug_commands_parse_and_apply() {
    let mut registry = CommandRegistry::with_engine_builtins();
    GameControls::register_debug_commands(&mut registry);
    let mut processor = CommandProcessor::new(registry);
    let mut reply = ConsoleReply::default();

    processor.process_line("setmissile fire", &mut reply);
    processor.process_line("freecam now", &mut reply);
    assert_eq!(
        reply.lines,
        vec![
            "error: invalid missile id 'fire' (expected i32). usage: setmissile <id>".to_string(),
            "error: unexpected extra arguments. usage: freecam".to_string(),
        ]
    );

    processor.process_line("SetMissile 61", &mut reply);
    processor.process_line("freecam", &mut reply);
    let mut pending = Vec::new();
    processor.drain_pending_commands_into(&mut pending);
    assert_eq!(
        pending,
        vec![ControlsCommand::SetMissile(61), ControlsCommand::ToggleFreeCam]
    );

    let mut controls = controls();
    let replies: Vec<_> = pending
        .into_iter()
        .map(|command| controls.apply_debug_command(command))
        .collect();
    assert_eq!(replies, vec!["missile id set to 61", "free camera on"]);
    assert_eq!(controls.missile_id(), 61);
    assert!(controls.is_free_cam());
}
