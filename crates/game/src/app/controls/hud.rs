use engine::app::{Rect, Surface};
use engine::map::Player;
use engine::ui::{Sprite, ToggleButton};
use engine::AssetLoader;

const GLOBE_SHEET: &str = "hud/globe_overlap";
const MAIN_PANEL_SHEET: &str = "hud/control_panel";
const MENU_BUTTON_SHEET: &str = "hud/menu_button";
const SKILL_ICON_SHEET: &str = "hud/generic_skills";
const RUN_BUTTON_SHEET: &str = "hud/run_button";

/// Widths of the six control-panel pieces; they tile the 800 pixel bar
/// together with the two skill icons.
const MAIN_PANEL_FRAME_SIZES: [(u32, u32); 6] =
    [(117, 48), (88, 48), (153, 48), (147, 48), (81, 48), (118, 48)];
const SKILL_ICON_SIZE: (u32, u32) = (48, 48);
const SKILL_ICON_FRAME_COUNT: usize = 12;
const GLOBE_FRAME_SIZES: [(u32, u32); 2] = [(80, 73), (80, 73)];
const MENU_BUTTON_FRAME_SIZES: [(u32, u32); 2] = [(16, 16), (16, 16)];
const RUN_BUTTON_FRAME_SIZES: [(u32, u32); 2] = [(17, 20), (17, 20)];

pub(crate) const LEFT_SKILL_FRAME: usize = 2;
pub(crate) const RIGHT_SKILL_FRAME: usize = 10;
const RUN_BUTTON_POSITION: (i32, i32) = (255, 570);
const RUN_BUTTON_BOUNDS: Rect = Rect::new(
    RUN_BUTTON_POSITION.0,
    RUN_BUTTON_POSITION.1,
    RUN_BUTTON_FRAME_SIZES[0].0 as i32,
    RUN_BUTTON_FRAME_SIZES[0].1 as i32,
);

/// Screen-space hit test for the run/walk button. The button sits at a fixed
/// spot, so this holds before the sprites are loaded too.
pub(crate) fn run_button_contains(x: i32, y: i32) -> bool {
    RUN_BUTTON_BOUNDS.contains(x, y)
}

/// Sprites of the bottom control bar, available once loaded.
#[derive(Debug)]
pub(crate) struct HudSprites {
    globe: Sprite,
    main_panel: Sprite,
    menu_button: Sprite,
    skill_icon: Sprite,
    run_button: ToggleButton,
}

impl HudSprites {
    pub(crate) fn load(assets: &mut AssetLoader, hero: &Player) -> Self {
        let skill_sizes = [SKILL_ICON_SIZE; SKILL_ICON_FRAME_COUNT];
        let mut run_button =
            ToggleButton::new(assets.load_sheet(RUN_BUTTON_SHEET, &RUN_BUTTON_FRAME_SIZES));
        run_button.set_position(RUN_BUTTON_POSITION.0, RUN_BUTTON_POSITION.1);
        if hero.is_run_toggled() {
            run_button.toggle();
        }
        Self {
            globe: Sprite::new(assets.load_sheet(GLOBE_SHEET, &GLOBE_FRAME_SIZES)),
            main_panel: Sprite::new(assets.load_sheet(MAIN_PANEL_SHEET, &MAIN_PANEL_FRAME_SIZES)),
            menu_button: Sprite::new(assets.load_sheet(MENU_BUTTON_SHEET, &MENU_BUTTON_FRAME_SIZES)),
            skill_icon: Sprite::new(assets.load_sheet(SKILL_ICON_SHEET, &skill_sizes)),
            run_button,
        }
    }

    pub(crate) fn toggle_run_button(&mut self) {
        self.run_button.toggle();
    }

    pub(crate) fn is_run_button_toggled(&self) -> bool {
        self.run_button.is_toggled()
    }

    /// Draws the bar left to right along the bottom edge; each piece starts
    /// where the previous one ended.
    pub(crate) fn render(&mut self, target: &mut dyn Surface) {
        let (width, height) = target.size();
        let (width, height) = (width as i32, height as i32);
        let mut offset = 0;

        // Left globe holder and globe.
        draw_at(&mut self.main_panel, target, 0, offset, height);
        draw_at(&mut self.globe, target, 0, offset + 28, height - 5);
        offset += frame_width(&self.main_panel);

        offset += draw_piece(&mut self.skill_icon, target, LEFT_SKILL_FRAME, offset, height);
        // Left skill selector, then stamina.
        offset += draw_piece(&mut self.main_panel, target, 1, offset, height);
        offset += draw_piece(&mut self.main_panel, target, 2, offset, height);

        draw_at(&mut self.menu_button, target, 0, width / 2 - 8, height - 16);

        // Potions, then right skill selector.
        offset += draw_piece(&mut self.main_panel, target, 3, offset, height);
        offset += draw_piece(&mut self.main_panel, target, 4, offset, height);
        offset += draw_piece(&mut self.skill_icon, target, RIGHT_SKILL_FRAME, offset, height);

        // Right globe holder and globe.
        draw_piece(&mut self.main_panel, target, 5, offset, height);
        draw_at(&mut self.globe, target, 1, offset + 8, height - 8);

        self.run_button.render(target);
    }
}

/// Draws `frame` with its bottom-left corner at `(x, y)` and returns its width.
fn draw_piece(sprite: &mut Sprite, target: &mut dyn Surface, frame: usize, x: i32, y: i32) -> i32 {
    draw_at(sprite, target, frame, x, y);
    frame_width(sprite)
}

fn draw_at(sprite: &mut Sprite, target: &mut dyn Surface, frame: usize, x: i32, y: i32) {
    sprite.set_current_frame(frame);
    sprite.set_position(x, y);
    sprite.render(target);
}

fn frame_width(sprite: &Sprite) -> i32 {
    sprite.current_frame_size().0 as i32
}
