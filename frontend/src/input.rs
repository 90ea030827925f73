use std::collections::HashMap;

use otherworld_core::input::InputButton;
use sdl2::keyboard::Scancode;

/// Maps SDL scancodes to engine button IDs.
pub struct KeyMap {
    map: HashMap<Scancode, u8>,
}

impl KeyMap {
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    /// Bind a scancode to an engine button ID.
    pub fn bind(&mut self, scancode: Scancode, button_id: u8) {
        self.map.insert(scancode, button_id);
    }

    /// Look up the engine button ID for a scancode.
    pub fn get(&self, scancode: Scancode) -> Option<u8> {
        self.map.get(&scancode).copied()
    }
}

/// Build the default key map: arrows steer the hero, space and the
/// control keys fire.
pub fn default_key_map(buttons: &[InputButton]) -> KeyMap {
    let mut km = KeyMap::new();

    for button in buttons {
        let scancodes: &[Scancode] = match button.name {
            "Up" => &[Scancode::Up],
            "Down" => &[Scancode::Down],
            "Left" => &[Scancode::Left],
            "Right" => &[Scancode::Right],
            "Action" => &[Scancode::Space, Scancode::LCtrl, Scancode::Return],
            _ => &[],
        };

        for &sc in scancodes {
            km.bind(sc, button.id);
        }
    }

    km
}

/// ASCII for keys the code-entry screens accept: letters and backspace.
pub fn typed_char(scancode: Scancode) -> Option<u8> {
    use Scancode::*;
    let ch = match scancode {
        A => b'A', B => b'B', C => b'C', D => b'D', E => b'E', F => b'F',
        G => b'G', H => b'H', I => b'I', J => b'J', K => b'K', L => b'L',
        M => b'M', N => b'N', O => b'O', P => b'P', Q => b'Q', R => b'R',
        S => b'S', T => b'T', U => b'U', V => b'V', W => b'W', X => b'X',
        Y => b'Y', Z => b'Z',
        Backspace => 8,
        _ => return None,
    };
    Some(ch)
}
