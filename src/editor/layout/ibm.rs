//! IBM keyboard layout
//!
//! Assigns the 37 Bopomofo symbols left-to-right, top-to-bottom across the
//! keyboard with no context-sensitive rules — the simplest of the bundled
//! layouts.

use crate::{
    editor::keymap::KeyCode,
    zhuyin::{Bopomofo, BopomofoKind, Syllable},
};

use super::{KeyBehavior, KeyEvent, SyllableEditor};

#[derive(Debug, Default)]
pub struct Ibm {
    syllable: Syllable,
}

impl Ibm {
    pub fn new() -> Ibm {
        Ibm {
            syllable: Syllable::new(),
        }
    }
}

impl SyllableEditor for Ibm {
    fn key_press(&mut self, key: KeyEvent) -> KeyBehavior {
        let bopomofo = match key.code {
            KeyCode::N1 => Bopomofo::B,
            KeyCode::N2 => Bopomofo::P,
            KeyCode::N3 => Bopomofo::M,
            KeyCode::N4 => Bopomofo::F,
            KeyCode::N5 => Bopomofo::D,
            KeyCode::N6 => Bopomofo::T,
            KeyCode::N7 => Bopomofo::N,
            KeyCode::N8 => Bopomofo::L,
            KeyCode::N9 => Bopomofo::G,
            KeyCode::N0 => Bopomofo::K,
            KeyCode::Minus => Bopomofo::H,
            KeyCode::Equal => Bopomofo::J,
            KeyCode::Q => Bopomofo::Q,
            KeyCode::W => Bopomofo::X,
            KeyCode::E => Bopomofo::ZH,
            KeyCode::R => Bopomofo::CH,
            KeyCode::T => Bopomofo::SH,
            KeyCode::Y => Bopomofo::R,
            KeyCode::U => Bopomofo::Z,
            KeyCode::I => Bopomofo::C,
            KeyCode::O => Bopomofo::S,
            KeyCode::P => Bopomofo::I,
            KeyCode::LBracket => Bopomofo::U,
            KeyCode::RBracket => Bopomofo::IU,
            KeyCode::A => Bopomofo::A,
            KeyCode::S => Bopomofo::O,
            KeyCode::D => Bopomofo::E,
            KeyCode::F => Bopomofo::EH,
            KeyCode::G => Bopomofo::AI,
            KeyCode::H => Bopomofo::EI,
            KeyCode::J => Bopomofo::AU,
            KeyCode::K => Bopomofo::OU,
            KeyCode::L => Bopomofo::AN,
            KeyCode::SColon => Bopomofo::EN,
            KeyCode::Z => Bopomofo::ANG,
            KeyCode::X => Bopomofo::ENG,
            KeyCode::C => Bopomofo::ER,
            KeyCode::V => Bopomofo::TONE5,
            KeyCode::B => Bopomofo::TONE2,
            KeyCode::N => Bopomofo::TONE3,
            KeyCode::M => Bopomofo::TONE4,
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
    fn ma_tone2_commits() {
        let mut editor = Ibm::new();
        let keymap = IdentityKeymap::new(QWERTY);
        editor.key_press(keymap.map_key(KeyCode::N3));
        editor.key_press(keymap.map_key(KeyCode::A));
        let behavior = editor.key_press(keymap.map_key(KeyCode::B));
        assert_eq!(KeyBehavior::Commit, behavior);
        let syllable = editor.read();
        assert_eq!(Some(Bopomofo::M), syllable.initial());
        assert_eq!(Some(Bopomofo::A), syllable.rime());
        assert_eq!(Some(Bopomofo::TONE2), syllable.tone());
    }
}
