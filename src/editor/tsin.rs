//! Phrase (TSIN) engine: buffers finalized syllables and queries the
//! phrase database for candidates starting at a per-syllable cursor.

use crate::candidate::Candidate;
use crate::conversion::{Break, ChineseSequence, ConversionEngine, Interval};
use crate::zhuyin::Syllable;

use super::keymap::KeyEvent;
use super::layout::{KeyBehavior, SyllableEditor};

/// Result of feeding one key to [`TsinEngine`].
#[derive(Debug, Clone, PartialEq)]
pub enum TsinOutcome {
    Ignored,
    Preedit(String),
    /// Phrase candidates starting at the current cursor.
    Candidates(Vec<Candidate>),
}

/// Result of [`TsinEngine::select`].
#[derive(Debug, Clone, PartialEq)]
pub enum TsinSelection {
    /// The cursor advanced but syllables remain buffered; carries the next
    /// page of candidates.
    Partial(Vec<Candidate>),
    /// The cursor reached the end of the buffer; carries the full commit
    /// string and clears the engine.
    Done(String),
}

/// Drives one [`SyllableEditor`] to assemble syllables, then hands the
/// accumulated buffer to a [`ConversionEngine`] for phrase segmentation.
#[derive(Debug)]
pub struct TsinEngine {
    editor: Box<dyn SyllableEditor>,
    engine: Box<dyn ConversionEngine>,
    syllables: Vec<Syllable>,
    selections: Vec<Interval>,
    breaks: Vec<Break>,
    cursor: usize,
}

impl TsinEngine {
    pub fn new(editor: Box<dyn SyllableEditor>, engine: Box<dyn ConversionEngine>) -> TsinEngine {
        TsinEngine {
            editor,
            engine,
            syllables: Vec::new(),
            selections: Vec::new(),
            breaks: Vec::new(),
            cursor: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.editor.is_empty() && self.syllables.is_empty()
    }

    /// Swaps the active layout; the buffered syllables, selections and
    /// conversion engine are untouched.
    pub fn set_editor(&mut self, editor: Box<dyn SyllableEditor>) {
        self.editor = editor;
    }

    fn sequence(&self) -> ChineseSequence {
        ChineseSequence {
            syllables: self.syllables.clone(),
            selections: self.selections.clone(),
            breaks: self.breaks.iter().map(|b| Break(b.0)).collect(),
        }
    }

    pub fn preedit(&self) -> String {
        let mut text: String = self.syllables.iter().map(|s| s.to_string()).collect();
        if !self.editor.is_empty() {
            text.push_str(&self.editor.read().to_string());
        }
        text
    }

    pub fn clear(&mut self) {
        self.editor.clear();
        self.syllables.clear();
        self.selections.clear();
        self.breaks.clear();
        self.cursor = 0;
    }

    fn candidates_at_cursor(&self) -> Vec<Candidate> {
        let seq = self.sequence();
        self.engine
            .convert_next(&seq, self.cursor)
            .into_iter()
            .filter(|interval| interval.start == self.cursor && !interval.phrase.is_empty())
            .map(|interval| Candidate::new(interval.phrase))
            .collect()
    }

    /// Backspace: while a syllable is being composed, removes its last
    /// symbol; otherwise drops the most recently finalized syllable,
    /// discarding any selection/break past the new end.
    pub fn backspace(&mut self) -> TsinOutcome {
        if !self.editor.is_empty() {
            self.editor.remove_last();
            return TsinOutcome::Preedit(self.preedit());
        }
        if self.syllables.pop().is_none() {
            return TsinOutcome::Ignored;
        }
        let len = self.syllables.len();
        self.selections.retain(|interval| interval.end <= len);
        self.breaks.retain(|b| b.0 <= len);
        self.cursor = self.cursor.min(len);
        if self.syllables.is_empty() {
            TsinOutcome::Preedit(String::new())
        } else {
            TsinOutcome::Candidates(self.candidates_at_cursor())
        }
    }

    /// Escape: discards the entire buffer.
    pub fn escape(&mut self) -> TsinOutcome {
        if self.is_empty() {
            return TsinOutcome::Ignored;
        }
        self.clear();
        TsinOutcome::Preedit(String::new())
    }

    /// Feeds one printable key through the active layout.
    pub fn feed(&mut self, key: KeyEvent) -> TsinOutcome {
        match self.editor.key_press(key) {
            KeyBehavior::NoWord => TsinOutcome::Ignored,
            KeyBehavior::Absorb => TsinOutcome::Preedit(self.preedit()),
            KeyBehavior::Commit => {
                let syllable = self.editor.read();
                self.editor.clear();
                self.syllables.push(syllable);
                TsinOutcome::Candidates(self.candidates_at_cursor())
            }
        }
    }

    /// Commits the phrase selected from the last published candidate list,
    /// advancing the cursor past it. Returns `None` if the buffer is empty
    /// or the cursor already reached its end.
    pub fn select(&mut self, candidate: &Candidate) -> Option<TsinSelection> {
        if self.cursor >= self.syllables.len() {
            return None;
        }
        let span = candidate.text.chars().count().max(1);
        let end = (self.cursor + span).min(self.syllables.len());
        self.selections.push(Interval {
            start: self.cursor,
            end,
            phrase: candidate.text.clone(),
        });
        self.cursor = end;
        if self.cursor >= self.syllables.len() {
            let commit = self.selections.iter().map(|iv| iv.phrase.clone()).collect();
            self.clear();
            Some(TsinSelection::Done(commit))
        } else {
            Some(TsinSelection::Partial(self.candidates_at_cursor()))
        }
    }

    /// Enter: commits the selections made so far plus the engine's default
    /// segmentation for whatever syllables remain past the cursor.
    pub fn commit_defaults(&mut self) -> String {
        let seq = self.sequence();
        let mut text: String = self.selections.iter().map(|iv| iv.phrase.clone()).collect();
        for interval in self.engine.convert_next(&seq, self.cursor) {
            if interval.start >= self.cursor {
                text.push_str(&interval.phrase);
            }
        }
        self.clear();
        text
    }
}

#[cfg(test)]
mod test {
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;

    use super::*;
    use crate::conversion::DpConversionEngine;
    use crate::dictionary::Phrase;
    use crate::editor::keymap::{IdentityKeymap, KeyCode, Keymap, QWERTY};
    use crate::editor::layout::standard::Standard;
    use crate::{syl, zhuyin::Bopomofo};

    fn type_ma1(engine: &mut TsinEngine, keymap: &IdentityKeymap) {
        engine.feed(keymap.map_key(KeyCode::A));
        engine.feed(keymap.map_key(KeyCode::N8));
        engine.feed(keymap.map_key(KeyCode::Space));
    }

    fn engine_with_ma() -> (TsinEngine, IdentityKeymap) {
        let mut dict: HashMap<Vec<Syllable>, Vec<Phrase>> = HashMap::new();
        let ma1 = syl![Bopomofo::M, Bopomofo::A, Bopomofo::TONE1];
        dict.insert(vec![ma1], vec![Phrase::new("媽", 100)]);
        dict.insert(vec![ma1, ma1], vec![Phrase::new("媽媽", 200)]);
        let conversion = Box::new(DpConversionEngine::new(Rc::new(RefCell::new(dict))));
        (
            TsinEngine::new(Box::new(Standard::new()), conversion),
            IdentityKeymap::new(QWERTY),
        )
    }

    #[test]
    fn single_syllable_publishes_candidate() {
        let (mut engine, keymap) = engine_with_ma();
        match engine.feed(keymap.map_key(KeyCode::A)) {
            TsinOutcome::Preedit(p) => assert_eq!("ㄇ", p),
            other => panic!("{other:?}"),
        }
        engine.feed(keymap.map_key(KeyCode::N8));
        match engine.feed(keymap.map_key(KeyCode::Space)) {
            TsinOutcome::Candidates(candidates) => {
                assert!(candidates.iter().any(|c| c.text == "媽"));
            }
            other => panic!("{other:?}"),
        }
    }

    #[test]
    fn selecting_full_span_commits_and_clears() {
        let (mut engine, keymap) = engine_with_ma();
        type_ma1(&mut engine, &keymap);
        type_ma1(&mut engine, &keymap);
        let candidate = Candidate::new("媽媽");
        match engine.select(&candidate) {
            Some(TsinSelection::Done(commit)) => assert_eq!("媽媽", commit),
            other => panic!("{other:?}"),
        }
        assert!(engine.is_empty());
    }

    #[test]
    fn backspace_on_empty_buffer_is_ignored() {
        let (mut engine, _keymap) = engine_with_ma();
        assert_eq!(TsinOutcome::Ignored, engine.backspace());
    }
}
