//! Phonetic (PHO) engine: layout keys in, one syllable assembled, a
//! tone key finalizes it and publishes candidates from the phonetic table.

use std::cell::RefCell;
use std::rc::Rc;

use crate::candidate::Candidate;
use crate::dictionary::Dictionary;

use super::keymap::KeyEvent;
use super::layout::{KeyBehavior, SyllableEditor};

/// Result of feeding one key to [`PhoEngine`].
#[derive(Debug, Clone, PartialEq)]
pub enum PhoOutcome {
    Ignored,
    /// The syllable buffer changed; carries the new preedit string.
    Preedit(String),
    /// A tone key finalized the syllable; carries the ranked candidates
    /// from the phonetic table (possibly empty, if the syllable has no
    /// entry).
    Candidates(Vec<Candidate>),
}

/// Drives one [`SyllableEditor`] and looks the finished syllable up in the
/// phonetic table (`pho.tab2`), modeled as any [`Dictionary`].
#[derive(Debug)]
pub struct PhoEngine {
    editor: Box<dyn SyllableEditor>,
    dict: Rc<RefCell<dyn Dictionary>>,
}

impl PhoEngine {
    pub fn new(editor: Box<dyn SyllableEditor>, dict: Rc<RefCell<dyn Dictionary>>) -> PhoEngine {
        PhoEngine { editor, dict }
    }

    pub fn is_empty(&self) -> bool {
        self.editor.is_empty()
    }

    /// Swaps the active layout, discarding any in-progress syllable. Used by
    /// `set_keyboard_layout` so a method change doesn't need to rebuild the
    /// dictionary handle.
    pub fn set_editor(&mut self, editor: Box<dyn SyllableEditor>) {
        self.editor = editor;
    }

    pub fn preedit(&self) -> String {
        if self.editor.is_empty() {
            String::new()
        } else {
            self.editor.read().to_string()
        }
    }

    /// Clears the in-progress syllable with no further side effects
    /// (`context_reset`).
    pub fn clear(&mut self) {
        self.editor.clear();
    }

    /// Backspace: removes the most recently entered symbol. `Ignored` on an empty buffer so the frontend deletes the
    /// preceding committed character instead.
    pub fn backspace(&mut self) -> PhoOutcome {
        if self.editor.is_empty() {
            return PhoOutcome::Ignored;
        }
        self.editor.remove_last();
        PhoOutcome::Preedit(self.preedit())
    }

    /// Escape: discards the in-progress syllable.
    pub fn escape(&mut self) -> PhoOutcome {
        if self.editor.is_empty() {
            return PhoOutcome::Ignored;
        }
        self.editor.clear();
        PhoOutcome::Preedit(String::new())
    }

    /// Feeds one printable key through the active layout.
    pub fn feed(&mut self, key: KeyEvent) -> PhoOutcome {
        match self.editor.key_press(key) {
            KeyBehavior::NoWord => PhoOutcome::Ignored,
            KeyBehavior::Absorb => PhoOutcome::Preedit(self.preedit()),
            KeyBehavior::Commit => {
                let syllable = self.editor.read();
                self.editor.clear();
                let candidates = self
                    .dict
                    .borrow()
                    .lookup_word(syllable)
                    .map(|phrase| Candidate::new(phrase.as_str().to_string()))
                    .collect();
                PhoOutcome::Candidates(candidates)
            }
        }
    }
}

#[cfg(test)]
mod test {
    use std::collections::HashMap;

    use super::*;
    use crate::dictionary::Phrase;
    use crate::editor::keymap::{IdentityKeymap, KeyCode, Keymap, QWERTY};
    use crate::editor::layout::standard::Standard;
    use crate::{syl, zhuyin::Bopomofo};

    fn dict_with_ma() -> Rc<RefCell<dyn Dictionary>> {
        let mut dict: HashMap<Vec<_>, Vec<Phrase>> = HashMap::new();
        let ma1 = syl![Bopomofo::M, Bopomofo::A, Bopomofo::TONE1];
        dict.insert(vec![ma1], vec![Phrase::new("媽", 100), Phrase::new("嗎", 10)]);
        Rc::new(RefCell::new(dict))
    }

    #[test]
    fn typing_ma_then_space_publishes_candidates() {
        let mut engine = PhoEngine::new(Box::new(Standard::new()), dict_with_ma());
        let keymap = IdentityKeymap::new(QWERTY);

        assert_eq!(
            PhoOutcome::Preedit("ㄇ".to_string()),
            engine.feed(keymap.map_key(KeyCode::A))
        );
        assert_eq!(
            PhoOutcome::Preedit("ㄇㄚ".to_string()),
            engine.feed(keymap.map_key(KeyCode::N8))
        );
        match engine.feed(keymap.map_key(KeyCode::Space)) {
            PhoOutcome::Candidates(candidates) => {
                assert_eq!(2, candidates.len());
                assert_eq!("媽", candidates[0].text);
            }
            other => panic!("expected candidates, got {other:?}"),
        }
        assert!(engine.is_empty());
    }

    #[test]
    fn space_on_empty_buffer_is_ignored() {
        let mut engine = PhoEngine::new(Box::new(Standard::new()), dict_with_ma());
        let keymap = IdentityKeymap::new(QWERTY);
        assert_eq!(
            PhoOutcome::Ignored,
            engine.feed(keymap.map_key(KeyCode::Space))
        );
    }

    #[test]
    fn backspace_removes_last_symbol() {
        let mut engine = PhoEngine::new(Box::new(Standard::new()), dict_with_ma());
        let keymap = IdentityKeymap::new(QWERTY);
        engine.feed(keymap.map_key(KeyCode::A));
        engine.feed(keymap.map_key(KeyCode::N8));
        assert_eq!(
            PhoOutcome::Preedit("ㄇ".to_string()),
            engine.backspace()
        );
        assert_eq!(PhoOutcome::Preedit(String::new()), engine.backspace());
        assert_eq!(PhoOutcome::Ignored, engine.backspace());
    }
}
