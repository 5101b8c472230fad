//! Standard keyboard layout
//!
//! Also known as the Da Chen (大千) layout. It is the default layout on
//! almost all platforms and the most commonly used one.

use crate::{
    editor::keymap::KeyCode,
    zhuyin::{Bopomofo, BopomofoKind, Syllable},
};

use super::{KeyBehavior, KeyEvent, SyllableEditor};

#[derive(Debug, Default)]
pub struct Standard {
    syllable: Syllable,
}

impl Standard {
    pub fn new() -> Standard {
        Standard {
            syllable: Syllable::new(),
        }
    }
}

impl SyllableEditor for Standard {
    fn key_press(&mut self, key: KeyEvent) -> KeyBehavior {
        let bopomofo = match key.code {
            KeyCode::N1 => Bopomofo::B,
            KeyCode::N2 => Bopomofo::D,
            KeyCode::N3 => Bopomofo::TONE3,
            KeyCode::N4 => Bopomofo::TONE4,
            KeyCode::N5 => Bopomofo::ZH,
            KeyCode::N6 => Bopomofo::TONE2,
            KeyCode::N7 => Bopomofo::TONE5,
            KeyCode::N8 => Bopomofo::A,
            KeyCode::N9 => Bopomofo::AI,
            KeyCode::N0 => Bopomofo::AN,
            KeyCode::Minus => Bopomofo::ER,
            KeyCode::Q => Bopomofo::P,
            KeyCode::W => Bopomofo::T,
            KeyCode::E => Bopomofo::G,
            KeyCode::R => Bopomofo::J,
            KeyCode::T => Bopomofo::CH,
            KeyCode::Y => Bopomofo::Z,
            KeyCode::U => Bopomofo::I,
            KeyCode::I => Bopomofo::O,
            KeyCode::O => Bopomofo::EI,
            KeyCode::P => Bopomofo::EN,
            KeyCode::A => Bopomofo::M,
            KeyCode::S => Bopomofo::N,
            KeyCode::D => Bopomofo::K,
            KeyCode::F => Bopomofo::Q,
            KeyCode::G => Bopomofo::SH,
            KeyCode::H => Bopomofo::C,
            KeyCode::J => Bopomofo::U,
            KeyCode::K => Bopomofo::E,
            KeyCode::L => Bopomofo::AU,
            KeyCode::SColon => Bopomofo::ANG,
            KeyCode::Z => Bopomofo::F,
            KeyCode::X => Bopomofo::L,
            KeyCode::C => Bopomofo::H,
            KeyCode::V => Bopomofo::X,
            KeyCode::B => Bopomofo::R,
            KeyCode::N => Bopomofo::S,
            KeyCode::M => Bopomofo::IU,
            KeyCode::Comma => Bopomofo::EH,
            KeyCode::Dot => Bopomofo::OU,
            KeyCode::Slash => Bopomofo::ENG,
            KeyCode::Space => Bopomofo::TONE1,
            _ => return KeyBehavior::NoWord,
        };

        let kind = bopomofo.kind();
        if kind == BopomofoKind::Tone {
            if !self.syllable.is_empty() {
                self.syllable.update(bopomofo);
                return KeyBehavior::Commit;
            }
        } else {
            self.syllable.remove_tone();
        }

        // Space (TONE1) on an empty syllable is not a phonetic symbol; let
        // the frontend insert a literal space.
        if bopomofo == Bopomofo::TONE1 {
            return KeyBehavior::NoWord;
        }

        self.syllable.update(bopomofo);
        KeyBehavior::Absorb
    }

    fn is_empty(&self) -> bool {
        self.syllable.is_empty()
    }

    fn remove_last(&mut self) {
        self.syllable.pop();
    }

    fn clear(&mut self) {
        self.syllable.clear();
    }

    fn read(&self) -> Syllable {
        self.syllable
    }
}

#[cfg(test)]
mod test {
    use crate::editor::keymap::{IdentityKeymap, KeyCode, Keymap, QWERTY};

    use super::*;

    #[test]
    fn space_on_empty_is_ignored() {
        let mut editor = Standard::new();
        let keymap = IdentityKeymap::new(QWERTY);
        let behavior = editor.key_press(keymap.map_key(KeyCode::Space));
        assert_eq!(KeyBehavior::NoWord, behavior);
    }

    #[test]
    fn ma1() {
        let mut editor = Standard::new();
        let keymap = IdentityKeymap::new(QWERTY);
        editor.key_press(keymap.map_key(KeyCode::A));
        let behavior = editor.key_press(keymap.map_key(KeyCode::N8));
        assert_eq!(KeyBehavior::Absorb, behavior);
        let syllable = editor.read();
        assert_eq!(Some(Bopomofo::M), syllable.initial());
        assert_eq!(Some(Bopomofo::A), syllable.rime());
    }

    #[test]
    fn ma_space_commits() {
        let mut editor = Standard::new();
        let keymap = IdentityKeymap::new(QWERTY);
        editor.key_press(keymap.map_key(KeyCode::A));
        editor.key_press(keymap.map_key(KeyCode::N8));
        let behavior = editor.key_press(keymap.map_key(KeyCode::Space));
        assert_eq!(KeyBehavior::Commit, behavior);
    }
}
