//! Eten26 (倚天26鍵) keyboard layout

use crate::{
    editor::keymap::KeyCode,
    zhuyin::{Bopomofo, BopomofoKind, Syllable},
};

use super::{KeyBehavior, KeyEvent, SyllableEditor};

#[derive(Debug, Default)]
pub struct Eten26 {
    syllable: Syllable,
}

impl Eten26 {
    pub fn new() -> Eten26 {
        Eten26 {
            syllable: Syllable::new(),
        }
    }
    fn is_end_key(&self, key: KeyCode) -> bool {
        match key {
            KeyCode::D | KeyCode::F | KeyCode::J | KeyCode::K | KeyCode::Space => {
                !self.syllable.is_empty()
            }
            _ => false,
        }
    }
    fn has_initial_or_medial(&self) -> bool {
        self.syllable.has_initial() || self.syllable.has_medial()
    }
}

impl SyllableEditor for Eten26 {
    fn key_press(&mut self, key: KeyEvent) -> KeyBehavior {
        if self.is_end_key(key.code) {
            if !self.syllable.has_medial() && !self.syllable.has_rime() {
                match self.syllable.initial() {
                    Some(Bopomofo::J) => {
                        self.syllable.update(Bopomofo::ZH);
                    }
                    Some(Bopomofo::X) => {
                        self.syllable.update(Bopomofo::SH);
                    }
                    Some(Bopomofo::P) => {
                        self.syllable.remove_initial();
                        self.syllable.update(Bopomofo::OU);
                    }
                    Some(Bopomofo::M) => {
                        self.syllable.remove_initial();
                        self.syllable.update(Bopomofo::AN);
                    }
                    Some(Bopomofo::N) => {
                        self.syllable.remove_initial();
                        self.syllable.update(Bopomofo::EN);
                    }
                    Some(Bopomofo::T) => {
                        self.syllable.remove_initial();
                        self.syllable.update(Bopomofo::ANG);
                    }
                    Some(Bopomofo::L) => {
                        self.syllable.remove_initial();
                        self.syllable.update(Bopomofo::ENG);
                    }
                    Some(Bopomofo::H) => {
                        self.syllable.remove_initial();
                        self.syllable.update(Bopomofo::ER);
                    }
                    _ => (),
                }
            }
            match key.code {
                KeyCode::F => self.syllable.update(Bopomofo::TONE2),
                KeyCode::J => self.syllable.update(Bopomofo::TONE3),
                KeyCode::K => self.syllable.update(Bopomofo::TONE4),
                KeyCode::D => self.syllable.update(Bopomofo::TONE5),
                _ => {
                    self.syllable.remove_tone();
                }
            };
            return KeyBehavior::Commit;
        }

        let bopomofo = match key.code {
            KeyCode::A => Bopomofo::A,
            KeyCode::B => Bopomofo::B,
            KeyCode::C => Bopomofo::X,
            KeyCode::D => Bopomofo::D,
            KeyCode::E => Bopomofo::I,
            KeyCode::F => Bopomofo::F,
            KeyCode::G => Bopomofo::J,
            KeyCode::H => {
                if self.has_initial_or_medial() {
                    Bopomofo::ER
                } else {
                    Bopomofo::H
                }
            }
            KeyCode::I => Bopomofo::AI,
            KeyCode::J => Bopomofo::R,
            KeyCode::K => Bopomofo::K,
            KeyCode::L => {
                if self.has_initial_or_medial() {
                    Bopomofo::ENG
                } else {
                    Bopomofo::L
                }
            }
            KeyCode::M => {
                if self.has_initial_or_medial() {
                    Bopomofo::AN
                } else {
                    Bopomofo::M
                }
            }
            KeyCode::N => {
                if self.has_initial_or_medial() {
                    Bopomofo::EN
                } else {
                    Bopomofo::N
                }
            }
            KeyCode::O => Bopomofo::O,
            KeyCode::P => {
                if self.has_initial_or_medial() {
                    Bopomofo::OU
                } else {
                    Bopomofo::P
                }
            }
            KeyCode::Q => {
                if self.has_initial_or_medial() {
                    Bopomofo::EI
                } else {
                    Bopomofo::Z
                }
            }
            KeyCode::R => Bopomofo::E,
            KeyCode::S => Bopomofo::S,
            KeyCode::T => {
                if self.has_initial_or_medial() {
                    Bopomofo::ANG
                } else {
                    Bopomofo::T
                }
            }
            KeyCode::U => Bopomofo::IU,
            KeyCode::V => Bopomofo::G,
            KeyCode::W => {
                if self.has_initial_or_medial() {
                    Bopomofo::EH
                } else {
                    Bopomofo::C
                }
            }
            KeyCode::X => Bopomofo::U,
            KeyCode::Y => Bopomofo::CH,
            KeyCode::Z => Bopomofo::AU,
            _ => return KeyBehavior::NoWord,
        };

        match bopomofo.kind() {
            BopomofoKind::Medial if bopomofo == Bopomofo::U => match self.syllable.initial() {
                Some(Bopomofo::J) => {
                    self.syllable.update(Bopomofo::ZH);
                }
                Some(Bopomofo::X) => {
                    self.syllable.update(Bopomofo::SH);
                }
                _ => (),
            },
            BopomofoKind::Medial => {
                if let Some(Bopomofo::G) = self.syllable.initial() {
                    self.syllable.update(Bopomofo::Q);
                }
            }
            BopomofoKind::Rime if self.syllable.medial().is_none() => match self.syllable.initial()
            {
                Some(Bopomofo::J) => {
                    self.syllable.update(Bopomofo::ZH);
                }
                Some(Bopomofo::X) => {
                    self.syllable.update(Bopomofo::SH);
                }
                _ => (),
            },
            _ => (),
        };

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
    fn han_tone4() {
        let mut editor = Eten26::new();
        let keymap = IdentityKeymap::new(QWERTY);
        editor.key_press(keymap.map_key(KeyCode::H));
        editor.key_press(keymap.map_key(KeyCode::M));
        let behavior = editor.key_press(keymap.map_key(KeyCode::K));
        assert_eq!(KeyBehavior::Commit, behavior);
        let syllable = editor.read();
        assert_eq!(Some(Bopomofo::H), syllable.initial());
        assert_eq!(Some(Bopomofo::AN), syllable.rime());
        assert_eq!(Some(Bopomofo::TONE4), syllable.tone());
    }
}
