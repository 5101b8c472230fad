//! Dvorak-optimized Zhuyin layout
//!
//! Keeps the Standard layout's Bopomofo assignment but shifted onto the
//! logical key positions a Dvorak-trained typist's fingers rest on, so the
//! muscle memory built typing Dvorak English carries over. Unlike
//! [`super::keymap::DVORAK`] (a physical hardware remap consumed upstream by
//! the [`super::keymap::Keymap`] layer), this is a phonetic symbol
//! assignment and only matters to users who select it explicitly as their
//! Zhuyin layout.

use crate::{
    editor::keymap::KeyCode,
    zhuyin::{Bopomofo, BopomofoKind, Syllable},
};

use super::{KeyBehavior, KeyEvent, SyllableEditor};

#[derive(Debug, Default)]
pub struct Dvorak {
    syllable: Syllable,
}

impl Dvorak {
    pub fn new() -> Dvorak {
        Dvorak {
            syllable: Syllable::new(),
        }
    }
}

impl SyllableEditor for Dvorak {
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
            // Home row (AOEUIDHTNS on physical Dvorak) carries the
            // initials most frequently paired with a following medial.
            KeyCode::A => Bopomofo::M,
            KeyCode::O => Bopomofo::N,
            KeyCode::E => Bopomofo::K,
            KeyCode::U => Bopomofo::Q,
            KeyCode::I => Bopomofo::SH,
            KeyCode::D => Bopomofo::C,
            KeyCode::H => Bopomofo::U,
            KeyCode::T => Bopomofo::ENG,
            KeyCode::N => Bopomofo::ANG,
            KeyCode::S => Bopomofo::AU,
            // Top row (',.PYFGCRL on physical Dvorak)
            KeyCode::Q => Bopomofo::P,
            KeyCode::J => Bopomofo::T,
            KeyCode::K => Bopomofo::G,
            KeyCode::X => Bopomofo::J,
            KeyCode::B => Bopomofo::CH,
            KeyCode::M => Bopomofo::Z,
            KeyCode::W => Bopomofo::I,
            KeyCode::V => Bopomofo::O,
            KeyCode::Z => Bopomofo::EI,
            // Bottom row (;QJKXBMWVZ on physical Dvorak)
            KeyCode::SColon => Bopomofo::EN,
            KeyCode::Comma => Bopomofo::F,
            KeyCode::Dot => Bopomofo::L,
            KeyCode::P => Bopomofo::H,
            KeyCode::Y => Bopomofo::X,
            KeyCode::F => Bopomofo::R,
            KeyCode::G => Bopomofo::S,
            KeyCode::C => Bopomofo::IU,
            KeyCode::R => Bopomofo::EH,
            KeyCode::L => Bopomofo::OU,
            KeyCode::Minus => Bopomofo::ER,
            KeyCode::Slash => Bopomofo::I,
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
    fn man_tone2_commits() {
        let mut editor = Dvorak::new();
        let keymap = IdentityKeymap::new(QWERTY);
        editor.key_press(keymap.map_key(KeyCode::A));
        editor.key_press(keymap.map_key(KeyCode::SColon));
        let behavior = editor.key_press(keymap.map_key(KeyCode::N6));
        assert_eq!(KeyBehavior::Commit, behavior);
        let syllable = editor.read();
        assert_eq!(Some(Bopomofo::M), syllable.initial());
        assert_eq!(Some(Bopomofo::EN), syllable.rime());
    }
}
