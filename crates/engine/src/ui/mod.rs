mod button;
mod label;
mod sprite;

pub use button::ToggleButton;
pub use label::Label;
pub use sprite::Sprite;
