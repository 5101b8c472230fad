//! Smart punctuation.
//!
//! ASCII punctuation typed while the active engine is idle maps directly to a
//! Chinese equivalent. Paired marks (`"`, `'`) alternate open/close across
//! keystrokes; everything else here is single-sided and maps unconditionally.

/// Which half of a pair the next paired-mark keystroke should produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairSlot {
    NextOpen,
    NextClose,
}

impl Default for PairSlot {
    fn default() -> Self {
        PairSlot::NextOpen
    }
}

/// Per-context pairing state for the marks that are ambiguous on their own.
/// Reset on focus change via `reset_punctuation_state` and on
/// `context_reset`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PunctuationState {
    double_quote: PairSlot,
    single_quote: PairSlot,
}

impl PunctuationState {
    pub fn new() -> PunctuationState {
        PunctuationState::default()
    }

    pub fn reset(&mut self) {
        *self = PunctuationState::default();
    }

    /// Converts one typed ASCII punctuation key to its Chinese commit
    /// string, or `None` if `ascii` is not a recognized smart-punctuation
    /// key (frontend should insert it literally).
    pub fn apply(&mut self, ascii: char) -> Option<&'static str> {
        match ascii {
            '"' => Some(self.pair(Slot::Double)),
            '\'' => Some(self.pair(Slot::Single)),
            '(' => Some("("),
            ')' => Some(")"),
            '[' => Some("["),
            ']' => Some("]"),
            '{' => Some("「"),
            '}' => Some("」"),
            '<' => Some("〈"),
            '>' => Some("〉"),
            '.' => Some("。"),
            ',' => Some("，"),
            '!' => Some("!"),
            '?' => Some("?"),
            ';' => Some("；"),
            ':' => Some("："),
            '~' => Some("～"),
            '\\' => Some("、"),
            _ => None,
        }
    }

    fn pair(&mut self, slot: Slot) -> &'static str {
        let state = match slot {
            Slot::Double => &mut self.double_quote,
            Slot::Single => &mut self.single_quote,
        };
        let (text, next) = match (slot, *state) {
            (Slot::Double, PairSlot::NextOpen) => ("“", PairSlot::NextClose),
            (Slot::Double, PairSlot::NextClose) => ("”", PairSlot::NextOpen),
            (Slot::Single, PairSlot::NextOpen) => ("‘", PairSlot::NextClose),
            (Slot::Single, PairSlot::NextClose) => ("’", PairSlot::NextOpen),
        };
        *state = next;
        text
    }
}

#[derive(Debug, Clone, Copy)]
enum Slot {
    Double,
    Single,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn double_quotes_alternate() {
        let mut state = PunctuationState::new();
        assert_eq!(Some("“"), state.apply('"'));
        assert_eq!(Some("”"), state.apply('"'));
        assert_eq!(Some("“"), state.apply('"'));
    }

    #[test]
    fn single_and_double_quotes_track_independently() {
        let mut state = PunctuationState::new();
        assert_eq!(Some("“"), state.apply('"'));
        assert_eq!(Some("‘"), state.apply('\''));
        assert_eq!(Some("”"), state.apply('"'));
        assert_eq!(Some("’"), state.apply('\''));
    }

    #[test]
    fn reset_restores_next_open() {
        let mut state = PunctuationState::new();
        state.apply('"');
        state.reset();
        assert_eq!(Some("“"), state.apply('"'));
    }

    #[test]
    fn single_sided_marks_are_unconditional() {
        let mut state = PunctuationState::new();
        assert_eq!(Some("。"), state.apply('.'));
        assert_eq!(Some("，"), state.apply(','));
        assert_eq!(Some("("), state.apply('('));
    }

    #[test]
    fn unrecognized_ascii_passes_through() {
        let mut state = PunctuationState::new();
        assert_eq!(None, state.apply('@'));
    }
}
