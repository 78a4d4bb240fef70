use engine::app::{Color, MouseButton, MouseEvent, MouseMoveEvent, Rect, Surface, TextAlign};
use engine::ui::{Label, Sprite};
use engine::AssetLoader;
use tracing::info;

use super::Panel;
use crate::app::controls::ControlsEvent;

const ITEM_TOP: i32 = 200;
const ITEM_SPACING: i32 = 56;
const ITEM_HEIGHT: i32 = 24;
const ITEM_HALF_WIDTH: i32 = 180;
const ITEM_SCALE: i32 = 4;
const ITEM_COLOR: Color = [170, 160, 140, 255];
const SELECTED_ITEM_COLOR: Color = [255, 255, 255, 255];
const OVERLAY_COLOR: Color = [0, 0, 0, 160];
const MARKER_SHEET: &str = "menu/pentspin";
const MARKER_SIZE: (u32, u32) = (32, 32);
const MARKER_FRAME_COUNT: usize = 8;
const MARKER_FRAMES_PER_SECOND: f64 = 20.0;
const MARKER_GAP: i32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EscapeMenuItem {
    Options,
    SaveAndExit,
    ReturnToGame,
}

impl EscapeMenuItem {
    pub(crate) const ALL: [EscapeMenuItem; 3] = [
        EscapeMenuItem::Options,
        EscapeMenuItem::SaveAndExit,
        EscapeMenuItem::ReturnToGame,
    ];

    pub(crate) fn label(self) -> &'static str {
        match self {
            EscapeMenuItem::Options => "Options",
            EscapeMenuItem::SaveAndExit => "Save and Exit Game",
            EscapeMenuItem::ReturnToGame => "Return to Game",
        }
    }
}

/// In-game pause menu. Every input handler is a no-op while it is closed.
#[derive(Debug)]
pub(crate) struct EscapeMenu {
    is_open: bool,
    selected: usize,
    center_x: i32,
    labels: Vec<Label>,
    marker: Option<Sprite>,
    marker_elapsed: f64,
    events: Vec<ControlsEvent>,
}

impl EscapeMenu {
    pub(crate) fn new(screen_width: u32) -> Self {
        let center_x = screen_width as i32 / 2;
        let labels = EscapeMenuItem::ALL
            .iter()
            .enumerate()
            .map(|(index, item)| {
                let mut label = Label::new(ITEM_SCALE, ITEM_COLOR, TextAlign::Center);
                label.set_text(item.label());
                label.set_position(center_x, item_top(index));
                label
            })
            .collect();
        Self {
            is_open: false,
            selected: 0,
            center_x,
            labels,
            marker: None,
            marker_elapsed: 0.0,
            events: Vec::new(),
        }
    }

    pub(crate) fn load(&mut self, assets: &mut AssetLoader) {
        let sizes = [MARKER_SIZE; MARKER_FRAME_COUNT];
        self.marker = Some(Sprite::new(assets.load_sheet(MARKER_SHEET, &sizes)));
    }

    pub(crate) fn selected(&self) -> EscapeMenuItem {
        EscapeMenuItem::ALL[self.selected]
    }

    pub(crate) fn on_up_key(&mut self) {
        if !self.is_open {
            return;
        }
        let count = EscapeMenuItem::ALL.len();
        self.selected = (self.selected + count - 1) % count;
    }

    pub(crate) fn on_down_key(&mut self) {
        if !self.is_open {
            return;
        }
        self.selected = (self.selected + 1) % EscapeMenuItem::ALL.len();
    }

    pub(crate) fn on_enter_key(&mut self) {
        if !self.is_open {
            return;
        }
        self.activate(self.selected());
    }

    /// Highlights the item under the cursor. Returns whether an item was hit.
    pub(crate) fn on_mouse_move(&mut self, event: MouseMoveEvent) -> bool {
        if !self.is_open {
            return false;
        }
        match self.item_at(event.x, event.y) {
            Some(index) => {
                self.selected = index;
                true
            }
            None => false,
        }
    }

    /// Activates the clicked item. Returns whether an item was hit.
    pub(crate) fn on_mouse_button_down(&mut self, event: MouseEvent) -> bool {
        if !self.is_open || event.button != MouseButton::Left {
            return false;
        }
        let Some(index) = self.item_at(event.x, event.y) else {
            return false;
        };
        self.selected = index;
        self.activate(self.selected());
        true
    }

    pub(crate) fn advance(&mut self, elapsed: f64) {
        if !self.is_open {
            return;
        }
        self.marker_elapsed += elapsed;
        if let Some(marker) = &mut self.marker {
            let frame_count = marker.frame_count().max(1);
            let frame = (self.marker_elapsed * MARKER_FRAMES_PER_SECOND) as usize % frame_count;
            marker.set_current_frame(frame);
        }
    }

    pub(crate) fn drain_events_into(&mut self, out: &mut Vec<ControlsEvent>) {
        out.append(&mut self.events);
    }

    fn activate(&mut self, item: EscapeMenuItem) {
        match item {
            EscapeMenuItem::Options => info!("options_menu_unavailable"),
            EscapeMenuItem::SaveAndExit => {
                info!("save_and_exit_selected");
                self.events.push(ControlsEvent::ExitGame);
            }
            EscapeMenuItem::ReturnToGame => self.close(),
        }
    }

    fn item_rect(&self, index: usize) -> Rect {
        Rect::new(
            self.center_x - ITEM_HALF_WIDTH,
            item_top(index),
            ITEM_HALF_WIDTH * 2,
            ITEM_HEIGHT,
        )
    }

    fn item_at(&self, x: i32, y: i32) -> Option<usize> {
        (0..EscapeMenuItem::ALL.len()).find(|index| self.item_rect(*index).contains(x, y))
    }
}

fn item_top(index: usize) -> i32 {
    ITEM_TOP + index as i32 * ITEM_SPACING
}

impl Panel for EscapeMenu {
    fn is_open(&self) -> bool {
        self.is_open
    }

    fn open(&mut self) {
        self.is_open = true;
        self.selected = 0;
        self.marker_elapsed = 0.0;
        info!("escape_menu_opened");
    }

    fn close(&mut self) {
        self.is_open = false;
    }

    fn render(&mut self, target: &mut dyn Surface) {
        if !self.is_open {
            return;
        }
        let (width, height) = target.size();
        target.fill_rect(Rect::new(0, 0, width as i32, height as i32), OVERLAY_COLOR);

        for (index, label) in self.labels.iter_mut().enumerate() {
            let color = if index == self.selected {
                SELECTED_ITEM_COLOR
            } else {
                ITEM_COLOR
            };
            label.set_color(color);
            label.render(target);
        }

        let selected_rect = self.item_rect(self.selected);
        if let Some(marker) = &mut self.marker {
            let (marker_width, marker_height) = marker.current_frame_size();
            let bottom = selected_rect.top + (ITEM_HEIGHT + marker_height as i32) / 2;
            marker.set_position(selected_rect.left - MARKER_GAP - marker_width as i32, bottom);
            marker.render(target);
            marker.set_position(selected_rect.right() + MARKER_GAP, bottom);
            marker.render(target);
        }
    }
}

#[cfg(test)]
mod tests {
    use engine::app::RecordingSurface;

    use super::*;

    fn open_menu() -> EscapeMenu {
        let mut menu = EscapeMenu::new(800);
        menu.open();
        menu
    }

    fn click_item(menu: &mut EscapeMenu, index: usize) -> bool {
        let rect = menu.item_rect(index);
        menu.on_mouse_button_down(MouseEvent::new(MouseButton::Left, rect.left + 5, rect.top + 5))
    }

    #[test]
    fn navigation_is_ignored_while_closed() {
        let mut menu = EscapeMenu::new(800);
        menu.on_down_key();
        menu.on_enter_key();
        let rect = menu.item_rect(2);

        assert!(!menu.on_mouse_move(MouseMoveEvent {
            x: rect.left,
            y: rect.top,
        }));
        assert!(!click_item(&mut menu, 2));
        assert_eq!(menu.selected(), EscapeMenuItem::Options);
        assert!(!menu.is_open());
    }

    #[test]
    fn up_and_down_wrap_around() {
        let mut menu = open_menu();
        menu.on_up_key();
        assert_eq!(menu.selected(), EscapeMenuItem::ReturnToGame);
        menu.on_down_key();
        assert_eq!(menu.selected(), EscapeMenuItem::Options);
        menu.on_down_key();
        assert_eq!(menu.selected(), EscapeMenuItem::SaveAndExit);
    }

    #[test]
    fn return_to_game_closes_and_save_and_exit_emits_exit() {
        let mut menu = open_menu();
        menu.on_down_key();
        menu.on_enter_key();
        let mut events = Vec::new();
        menu.drain_events_into(&mut events);
        assert_eq!(events, vec![ControlsEvent::ExitGame]);
        assert!(menu.is_open());

        assert!(click_item(&mut menu, 2));
        assert!(!menu.is_open());
    }

    #[test]
    fn mouse_move_highlights_item_and_miss_returns_false() {
        let mut menu = open_menu();
        let rect = menu.item_rect(1);
        assert!(menu.on_mouse_move(MouseMoveEvent {
            x: rect.right(),
            y: rect.bottom(),
        }));
        assert_eq!(menu.selected(), EscapeMenuItem::SaveAndExit);

        assert!(!menu.on_mouse_move(MouseMoveEvent { x: 5, y: 5 }));
        assert!(!menu.on_mouse_button_down(MouseEvent::new(MouseButton::Left, 5, 5)));
        assert!(!menu.on_mouse_button_down(MouseEvent::new(
            MouseButton::Right,
            rect.left,
            rect.top
        )));
    }

    #[test]
    fn marker_animates_at_fixed_rate() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut assets = AssetLoader::new(dir.path());
        let mut menu = open_menu();
        menu.load(&mut assets);

        menu.advance(0.05);
        menu.advance(0.05);
        let mut surface = RecordingSurface::new(800, 600);
        menu.render(&mut surface);

        let markers: Vec<_> = surface
            .sprite_calls()
            .filter(|(sheet, ..)| *sheet == MARKER_SHEET)
            .map(|(_, frame, ..)| frame)
            .collect();
        assert_eq!(markers, vec![2, 2]);
        assert_eq!(
            surface.texts().collect::<Vec<_>>(),
            vec!["Options", "Save and Exit Game", "Return to Game"]
        );
    }
}
