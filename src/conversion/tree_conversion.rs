use std::{cell::RefCell, rc::Rc};

use crate::dictionary::Dictionary;
use crate::zhuyin::Syllable;

use super::{ChineseSequence, ConversionEngine, Interval};

/// A greedy, single-syllable-at-a-time fallback engine: no cross-syllable
/// phrase segmentation, just the highest-frequency single-character word for
/// each syllable in turn. Cheaper than [`super::DpConversionEngine`] for
/// dictionaries that only carry single-word entries.
#[derive(Debug)]
pub struct TreeConversionEngine {
    dict: Rc<RefCell<dyn Dictionary>>,
}

impl TreeConversionEngine {
    pub fn new(dict: Rc<RefCell<dyn Dictionary>>) -> TreeConversionEngine {
        TreeConversionEngine { dict }
    }

    fn best_word(&self, syllable: Syllable) -> Option<String> {
        self.dict
            .borrow()
            .lookup_word(syllable)
            .max_by_key(|phrase| phrase.freq())
            .map(|phrase| phrase.as_str().to_string())
    }
}

impl ConversionEngine for TreeConversionEngine {
    fn convert(&self, segment: &ChineseSequence) -> Vec<Interval> {
        self.convert_next(segment, 0)
    }

    fn convert_next(&self, segment: &ChineseSequence, next: usize) -> Vec<Interval> {
        segment.syllables[next..]
            .iter()
            .enumerate()
            .map(|(i, &syllable)| {
                let start = next + i;
                let phrase = self.best_word(syllable).unwrap_or_default();
                Interval {
                    start,
                    end: start + 1,
                    phrase,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod test {
    use std::collections::HashMap;

    use super::*;
    use crate::dictionary::Phrase;
    use crate::{syl, zhuyin::Bopomofo};

    #[test]
    fn picks_highest_frequency_word_per_syllable() {
        let mut dict: HashMap<Vec<Syllable>, Vec<Phrase>> = HashMap::new();
        let ce4 = syl![Bopomofo::C, Bopomofo::E, Bopomofo::TONE4];
        dict.insert(
            vec![ce4],
            vec![Phrase::new("測", 1), Phrase::new("策", 100)],
        );
        let engine = TreeConversionEngine::new(Rc::new(RefCell::new(dict)));

        let segment = ChineseSequence {
            syllables: vec![ce4],
            selections: Vec::new(),
            breaks: Vec::new(),
        };
        let result = engine.convert(&segment);
        assert_eq!(1, result.len());
        assert_eq!("策", result[0].phrase);
    }

    #[test]
    fn unknown_syllable_yields_empty_phrase() {
        let dict: HashMap<Vec<Syllable>, Vec<Phrase>> = HashMap::new();
        let engine = TreeConversionEngine::new(Rc::new(RefCell::new(dict)));
        let ce4 = syl![Bopomofo::C, Bopomofo::E, Bopomofo::TONE4];
        let segment = ChineseSequence {
            syllables: vec![ce4],
            selections: Vec::new(),
            breaks: Vec::new(),
        };
        let result = engine.convert(&segment);
        assert_eq!("", result[0].phrase);
    }
}
