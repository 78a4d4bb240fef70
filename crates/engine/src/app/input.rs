use winit::keyboard::{KeyCode, ModifiersState, PhysicalKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Escape,
    Enter,
    Up,
    Down,
    Left,
    Right,
    I,
    C,
    R,
    Backquote,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct KeyMods {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl KeyMods {
    pub const NONE: KeyMods = KeyMods {
        shift: false,
        ctrl: false,
        alt: false,
    };
    pub const SHIFT: KeyMods = KeyMods {
        shift: true,
        ctrl: false,
        alt: false,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

const BUTTON_COUNT: usize = 3;

impl MouseButton {
    pub const ALL: [MouseButton; BUTTON_COUNT] =
        [MouseButton::Left, MouseButton::Right, MouseButton::Middle];

    const fn index(self) -> usize {
        match self {
            MouseButton::Left => 0,
            MouseButton::Right => 1,
            MouseButton::Middle => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub mods: KeyMods,
}

impl KeyEvent {
    pub const fn new(key: Key, mods: KeyMods) -> Self {
        Self { key, mods }
    }

    pub const fn plain(key: Key) -> Self {
        Self::new(key, KeyMods::NONE)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseEvent {
    pub button: MouseButton,
    pub x: i32,
    pub y: i32,
    pub mods: KeyMods,
}

impl MouseEvent {
    pub const fn new(button: MouseButton, x: i32, y: i32) -> Self {
        Self {
            button,
            x,
            y,
            mods: KeyMods::NONE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseMoveEvent {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ButtonStates {
    down: [bool; BUTTON_COUNT],
}

impl ButtonStates {
    pub(crate) fn set(&mut self, button: MouseButton, is_down: bool) {
        self.down[button.index()] = is_down;
    }

    pub(crate) fn is_down(&self, button: MouseButton) -> bool {
        self.down[button.index()]
    }

    pub(crate) fn held(&self) -> impl Iterator<Item = MouseButton> + '_ {
        MouseButton::ALL
            .into_iter()
            .filter(|button| self.is_down(*button))
    }
}

pub(crate) fn key_from_physical(key: PhysicalKey) -> Option<Key> {
    let PhysicalKey::Code(code) = key else {
        return None;
    };
    match code {
        KeyCode::Escape => Some(Key::Escape),
        KeyCode::Enter | KeyCode::NumpadEnter => Some(Key::Enter),
        KeyCode::ArrowUp => Some(Key::Up),
        KeyCode::ArrowDown => Some(Key::Down),
        KeyCode::ArrowLeft => Some(Key::Left),
        KeyCode::ArrowRight => Some(Key::Right),
        KeyCode::KeyI => Some(Key::I),
        KeyCode::KeyC => Some(Key::C),
        KeyCode::KeyR => Some(Key::R),
        KeyCode::Backquote => Some(Key::Backquote),
        _ => None,
    }
}

pub(crate) fn mouse_button_from_winit(button: winit::event::MouseButton) -> Option<MouseButton> {
    match button {
        winit::event::MouseButton::Left => Some(MouseButton::Left),
        winit::event::MouseButton::Right => Some(MouseButton::Right),
        winit::event::MouseButton::Middle => Some(MouseButton::Middle),
        _ => None,
    }
}

pub(crate) fn mods_from_winit(state: ModifiersState) -> KeyMods {
    KeyMods {
        shift: state.shift_key(),
        ctrl: state.control_key(),
        alt: state.alt_key(),
    }
}
