mod escape_menu;
mod side_panel;

use engine::app::Surface;

pub(crate) use escape_menu::EscapeMenu;
pub(crate) use side_panel::SidePanel;

/// A HUD overlay that can be shown and hidden.
pub(crate) trait Panel {
    fn is_open(&self) -> bool;
    fn open(&mut self);
    fn close(&mut self);
    fn toggle(&mut self) {
        if self.is_open() {
            self.close();
        } else {
            self.open();
        }
    }
    fn render(&mut self, target: &mut dyn Surface);
}
