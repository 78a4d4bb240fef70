use engine::app::{Surface, TextAlign};
use engine::ui::{Label, Sprite};
use engine::AssetLoader;
use tracing::debug;

use super::Panel;

const PANEL_WIDTH: u32 = 400;
const PANEL_HEIGHT: u32 = 552;
const TITLE_TOP: i32 = 16;
const TITLE_SCALE: i32 = 3;
const TITLE_COLOR: [u8; 4] = [199, 179, 119, 255];

/// Half-screen panel docked to one side, above the control bar.
#[derive(Debug)]
pub(crate) struct SidePanel {
    name: &'static str,
    sheet_key: &'static str,
    left: i32,
    is_open: bool,
    frame: Option<Sprite>,
    title: Label,
}

impl SidePanel {
    /// Inventory, docked on the right half.
    pub(crate) fn inventory() -> Self {
        Self::new("inventory", "panels/inventory", "INVENTORY", PANEL_WIDTH as i32)
    }

    /// Character stats, docked on the left half.
    pub(crate) fn hero_stats() -> Self {
        Self::new("hero_stats", "panels/hero_stats", "CHARACTER", 0)
    }

    fn new(name: &'static str, sheet_key: &'static str, title: &str, left: i32) -> Self {
        let mut label = Label::new(TITLE_SCALE, TITLE_COLOR, TextAlign::Center);
        label.set_text(title);
        label.set_position(left + PANEL_WIDTH as i32 / 2, TITLE_TOP);
        Self {
            name,
            sheet_key,
            left,
            is_open: false,
            frame: None,
            title: label,
        }
    }

    pub(crate) fn load(&mut self, assets: &mut AssetLoader) {
        let mut frame = Sprite::new(assets.load_sheet(self.sheet_key, &[(PANEL_WIDTH, PANEL_HEIGHT)]));
        frame.set_position(self.left, PANEL_HEIGHT as i32);
        self.frame = Some(frame);
    }
}

impl Panel for SidePanel {
    fn is_open(&self) -> bool {
        self.is_open
    }

    fn open(&mut self) {
        self.is_open = true;
        debug!(panel = self.name, "panel_opened");
    }

    fn close(&mut self) {
        self.is_open = false;
    }

    fn render(&mut self, target: &mut dyn Surface) {
        if !self.is_open {
            return;
        }
        if let Some(frame) = &self.frame {
            frame.render(target);
        }
        self.title.render(target);
    }
}
