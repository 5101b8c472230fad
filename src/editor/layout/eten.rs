//! Eten (倚天) full keyboard layout
//!
//! The full (non-26-key) variant of the Eten keycap overlay: one key per
//! Bopomofo symbol, no fuzzy initial/medial disambiguation. Distinct from
//! [`super::eten26`], which packs the same 37 symbols onto 26 keys using
//! context-sensitive rules.

use crate::{
    editor::keymap::KeyCode,
    zhuyin::{Bopomofo, BopomofoKind, Syllable},
};

use super::{KeyBehavior, KeyEvent, SyllableEditor};

#[derive(Debug, Default)]
pub struct Eten {
    syllable: Syllable,
}

impl Eten {
    pub fn new() -> Eten {
        Eten {
            syllable: Syllable::new(),
        }
    }
}

impl SyllableEditor for Eten {
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
            KeyCode::K => Bopomofo::ENG,
            KeyCode::L => Bopomofo::ANG,
            KeyCode::SColon => Bopomofo::AU,
            KeyCode::Z => Bopomofo::F,
            KeyCode::X => Bopomofo::L,
            KeyCode::C => Bopomofo::H,
            KeyCode::V => Bopomofo::X,
            KeyCode::B => Bopomofo::R,
            KeyCode::N => Bopomofo::S,
            KeyCode::M => Bopomofo::IU,
            KeyCode::Comma => Bopomofo::EH,
            KeyCode::Dot => Bopomofo::E,
            KeyCode::Slash => Bopomofo::OU,
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
    fn space_on_empty_is_ignored() {
        let mut editor = Eten::new();
        let keymap = IdentityKeymap::new(QWERTY);
        assert_eq!(
            KeyBehavior::NoWord,
            editor.key_press(keymap.map_key(KeyCode::Space))
        );
    }

    #[test]
    fn ma_tone2_commits() {
        let mut editor = Eten::new();
        let keymap = IdentityKeymap::new(QWERTY);
        editor.key_press(keymap.map_key(KeyCode::A));
        editor.key_press(keymap.map_key(KeyCode::N8));
        let behavior = editor.key_press(keymap.map_key(KeyCode::N6));
        assert_eq!(KeyBehavior::Commit, behavior);
        let syllable = editor.read();
        assert_eq!(Some(Bopomofo::M), syllable.initial());
        assert_eq!(Some(Bopomofo::TONE2), syllable.tone());
    }
}
