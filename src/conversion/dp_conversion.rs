use std::{cell::RefCell, ops::Neg, rc::Rc};

use crate::{
    dictionary::{Dictionary, Phrase},
    zhuyin::Syllable,
};

use super::{Break, ChineseSequence, ConversionEngine, Interval};

#[derive(Debug)]
pub struct DpConversionEngine {
    dict: Rc<RefCell<dyn Dictionary>>,
}

impl DpConversionEngine {
    pub fn new(dict: Rc<RefCell<dyn Dictionary>>) -> DpConversionEngine {
        DpConversionEngine { dict }
    }

    fn find_best_phrase(
        &self,
        offset: usize,
        syllables: &[Syllable],
        selections: &[Interval],
        breaks: &[Break],
    ) -> Option<Phrase> {
        let start = offset;
        let end = offset + syllables.len();

        for br in breaks.iter() {
            if br.0 > start && br.0 < end {
                // There exists a break point that forbids connecting these
                // syllables.
                return None;
            }
        }

        let mut max_freq = 0;
        let mut best_phrase = None;
        'next_phrase: for phrase in self.dict.borrow().lookup_phrase(syllables) {
            // If there exists a user selected interval which is a
            // sub-interval of this phrase but the substring is
            // different then we can skip this phrase.
            for selection in selections.iter() {
                debug_assert!(!selection.phrase.is_empty());
                if start <= selection.start && end >= selection.end {
                    let offset = selection.start - start;
                    let len = selection.end - selection.start;
                    let substring: String =
                        phrase.as_str().chars().skip(offset).take(len).collect();
                    if substring != selection.phrase {
                        continue 'next_phrase;
                    }
                }
            }

            // If there are phrases that can satisfy all the constraints
            // then pick the one with highest frequency.
            if best_phrase.is_none() || phrase.freq() > max_freq {
                max_freq = phrase.freq();
                best_phrase = Some(phrase);
            }
        }

        best_phrase
    }
    fn find_intervals(&self, seq: &ChineseSequence) -> Vec<PossibleInterval> {
        let mut intervals = vec![];
        for begin in 0..seq.syllables.len() {
            for end in begin..=seq.syllables.len() {
                if let Some(phrase) = self.find_best_phrase(
                    begin,
                    &seq.syllables[begin..end],
                    &seq.selections,
                    &seq.breaks,
                ) {
                    intervals.push(PossibleInterval {
                        start: begin,
                        end,
                        phrase,
                    });
                }
            }
        }
        intervals
    }
    fn dp_phrasing(&self, len: usize, mut intervals: Vec<PossibleInterval>) -> Vec<Interval> {
        // Assume P(x,y) is the highest score phrasing result from x to y. The
        // following is formula for P(x,y):
        //
        // P(x,y) = MAX( P(x,y-1)+P(y-1,y), P(x,y-2)+P(y-2,y), ... )
        //
        // While P(x,y-1) is stored in highest_score array, and P(y-1,y) is
        // interval end at y. In this formula, x is always 0.
        //
        // The format of highest_score array is described as following:
        //
        // highest_score[0] = P(0,0)
        // highest_score[1] = P(0,1)
        // ...
        // highest_score[y-1] = P(0,y-1)

        let mut highest_score = vec![RecordNode::default(); len + 1];

        // The interval shall be sorted by the increase order of end.
        intervals.sort_by(|a, b| a.end.cmp(&b.end));

        for i in 0..intervals.len() {
            let start = intervals[i].start;
            let end = intervals[i].end;

            let mut record = highest_score[start].clone();
            record.interval_index.push(i);

            record.score = 0;
            record.score += 1000 * self.rule_largest_sum(&record.interval_index, &intervals);
            record.score += 1000 * self.rule_largest_avgwordlen(&record.interval_index, &intervals);
            record.score +=
                100 * self.rule_smallest_lenvariance(&record.interval_index, &intervals);
            record.score += self.rule_largest_freqsum(&record.interval_index, &intervals);

            if highest_score[end].score < record.score {
                highest_score[end] = record;
            }
        }

        highest_score[len]
            .interval_index
            .iter()
            .map(|&i| intervals[i].clone().into())
            .collect()
    }

    fn rule_largest_sum(&self, interval_index: &[usize], intervals: &[PossibleInterval]) -> i32 {
        let mut score = 0;
        for &i in interval_index {
            score += intervals[i].end - intervals[i].start;
        }
        score as i32
    }

    fn rule_largest_avgwordlen(
        &self,
        interval_index: &[usize],
        intervals: &[PossibleInterval],
    ) -> i32 {
        // Constant factor 6=1*2*3, to keep value as integer
        6 * self.rule_largest_sum(interval_index, intervals)
            / i32::try_from(interval_index.len()).expect("number of intervals should be small")
    }

    fn rule_smallest_lenvariance(
        &self,
        interval_index: &[usize],
        intervals: &[PossibleInterval],
    ) -> i32 {
        let len = interval_index.len();
        let mut score = 0;
        // kcwu: heuristic? why variance no square function?
        for i in 0..len {
            for j in i + 1..len {
                let interval_1 = &intervals[interval_index[i]];
                let interval_2 = &intervals[interval_index[j]];
                score += interval_1.len().abs_diff(interval_2.len());
            }
        }
        i32::try_from(score).expect("score should fit in i32").neg()
    }

    fn rule_largest_freqsum(
        &self,
        interval_index: &[usize],
        intervals: &[PossibleInterval],
    ) -> i32 {
        let mut score = 0;
        for &i in interval_index {
            let interval = &intervals[i];
            let reduction_factor = if interval.len() == 1 { 512 } else { 1 };
            score += interval.phrase.freq() / reduction_factor;
        }
        i32::try_from(score).expect("score should fit in i32")
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct PossibleInterval {
    start: usize,
    end: usize,
    phrase: Phrase,
}

impl PossibleInterval {
    pub fn len(&self) -> usize {
        self.end - self.start
    }
}

impl From<PossibleInterval> for Interval {
    fn from(value: PossibleInterval) -> Self {
        Interval {
            start: value.start,
            end: value.end,
            phrase: value.phrase.to_string(),
        }
    }
}

#[derive(Default, Clone, Debug)]
struct RecordNode {
    interval_index: Vec<usize>,
    score: i32,
}

/// Builds the suffix of `segment` starting at syllable `next`, with
/// selections/breaks clipped and re-based to the suffix's own coordinates.
fn tail_sequence(segment: &ChineseSequence, next: usize) -> ChineseSequence {
    ChineseSequence {
        syllables: segment.syllables[next..].to_vec(),
        selections: segment
            .selections
            .iter()
            .filter(|iv| iv.start >= next)
            .map(|iv| Interval {
                start: iv.start - next,
                end: iv.end - next,
                phrase: iv.phrase.clone(),
            })
            .collect(),
        breaks: segment
            .breaks
            .iter()
            .filter(|br| br.0 >= next)
            .map(|br| Break(br.0 - next))
            .collect(),
    }
}

impl ConversionEngine for DpConversionEngine {
    fn convert(&self, segment: &ChineseSequence) -> Vec<Interval> {
        self.convert_next(segment, 0)
    }

    /// Segments the syllables from `next` to the end of `segment`, the same
    /// cursor-relative contract `TreeConversionEngine::convert_next` uses:
    /// a `next` past the end of the sequence yields no intervals.
    fn convert_next(&self, segment: &ChineseSequence, next: usize) -> Vec<Interval> {
        let next = next.min(segment.syllables.len());
        let tail = tail_sequence(segment, next);
        let intervals = self.find_intervals(&tail);
        self.dp_phrasing(tail.syllables.len(), intervals)
            .into_iter()
            .map(|iv| Interval {
                start: iv.start + next,
                end: iv.end + next,
                phrase: iv.phrase,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, collections::HashMap, rc::Rc};

    use crate::{
        conversion::{Break, ChineseSequence, ConversionEngine, Interval},
        dictionary::Dictionary,
        syl,
        zhuyin::Bopomofo::*,
    };

    use super::DpConversionEngine;

    fn test_dictionary() -> Rc<RefCell<dyn Dictionary>> {
        Rc::new(RefCell::new(HashMap::from([
            (vec![syl![G, U, O, TONE2]], vec![("國", 1).into()]),
            (vec![syl![M, I, EN, TONE2]], vec![("民", 1).into()]),
            (vec![syl![D, A, TONE4]], vec![("大", 1).into()]),
            (vec![syl![H, U, EI, TONE4]], vec![("會", 1).into()]),
            (vec![syl![D, AI, TONE4]], vec![("代", 1).into()]),
            (vec![syl![B, I, AU, TONE3]], vec![("表", 1).into()]),
            (
                vec![syl![G, U, O, TONE2], syl![M, I, EN, TONE2]],
                vec![("國民", 200).into()],
            ),
            (
                vec![syl![D, A, TONE4], syl![H, U, EI, TONE4]],
                vec![("大會", 200).into()],
            ),
            (
                vec![syl![D, AI, TONE4], syl![B, I, AU, TONE3]],
                vec![("代表", 200).into(), ("戴錶", 100).into()],
            ),
            (vec![syl![X, I, EN]], vec![("心", 1).into()]),
            (
                vec![syl![K, U, TONE4], syl![I, EN]],
                vec![("庫音", 300).into()],
            ),
            (
                vec![syl![X, I, EN], syl![K, U, TONE4], syl![I, EN]],
                vec![("新酷音", 200).into()],
            ),
        ])))
    }

    #[test]
    fn convert_empty_sequence() {
        let dict = test_dictionary();
        let engine = DpConversionEngine::new(dict);
        let sequence = ChineseSequence {
            syllables: vec![],
            selections: vec![],
            breaks: vec![],
        };
        assert_eq!(Vec::<Interval>::new(), engine.convert(&sequence));
    }

    #[test]
    fn convert_simple_chinese_sequence() {
        let dict = test_dictionary();
        let engine = DpConversionEngine::new(dict);
        let sequence = ChineseSequence {
            syllables: vec![
                syl![G, U, O, TONE2],
                syl![M, I, EN, TONE2],
                syl![D, A, TONE4],
                syl![H, U, EI, TONE4],
                syl![D, AI, TONE4],
                syl![B, I, AU, TONE3],
            ],
            selections: vec![],
            breaks: vec![],
        };
        assert_eq!(
            vec![
                Interval {
                    start: 0,
                    end: 2,
                    phrase: "國民".to_string()
                },
                Interval {
                    start: 2,
                    end: 4,
                    phrase: "大會".to_string()
                },
                Interval {
                    start: 4,
                    end: 6,
                    phrase: "代表".to_string()
                },
            ],
            engine.convert(&sequence)
        );
    }

    #[test]
    fn convert_chinese_sequence_with_breaks() {
        let dict = test_dictionary();
        let engine = DpConversionEngine::new(dict);
        let sequence = ChineseSequence {
            syllables: vec![
                syl![G, U, O, TONE2],
                syl![M, I, EN, TONE2],
                syl![D, A, TONE4],
                syl![H, U, EI, TONE4],
                syl![D, AI, TONE4],
                syl![B, I, AU, TONE3],
            ],
            selections: vec![],
            breaks: vec![Break(1), Break(5)],
        };
        assert_eq!(
            vec![
                Interval {
                    start: 0,
                    end: 1,
                    phrase: "國".to_string()
                },
                Interval {
                    start: 1,
                    end: 2,
                    phrase: "民".to_string()
                },
                Interval {
                    start: 2,
                    end: 4,
                    phrase: "大會".to_string()
                },
                Interval {
                    start: 4,
                    end: 5,
                    phrase: "代".to_string()
                },
                Interval {
                    start: 5,
                    end: 6,
                    phrase: "表".to_string()
                },
            ],
            engine.convert(&sequence)
        );
    }

    #[test]
    fn convert_chinese_sequence_with_good_selection() {
        let dict = test_dictionary();
        let engine = DpConversionEngine::new(dict);
        let sequence = ChineseSequence {
            syllables: vec![
                syl![G, U, O, TONE2],
                syl![M, I, EN, TONE2],
                syl![D, A, TONE4],
                syl![H, U, EI, TONE4],
                syl![D, AI, TONE4],
                syl![B, I, AU, TONE3],
            ],
            selections: vec![Interval {
                start: 4,
                end: 6,
                phrase: "戴錶".to_string(),
            }],
            breaks: vec![],
        };
        assert_eq!(
            vec![
                Interval {
                    start: 0,
                    end: 2,
                    phrase: "國民".to_string()
                },
                Interval {
                    start: 2,
                    end: 4,
                    phrase: "大會".to_string()
                },
                Interval {
                    start: 4,
                    end: 6,
                    phrase: "戴錶".to_string()
                },
            ],
            engine.convert(&sequence)
        );
    }

    #[test]
    fn convert_chinese_sequence_with_substring_selection() {
        let dict = test_dictionary();
        let engine = DpConversionEngine::new(dict);
        let sequence = ChineseSequence {
            syllables: vec![syl![X, I, EN], syl![K, U, TONE4], syl![I, EN]],
            selections: vec![Interval {
                start: 1,
                end: 3,
                phrase: "酷音".to_string(),
            }],
            breaks: vec![],
        };
        assert_eq!(
            vec![Interval {
                start: 0,
                end: 3,
                phrase: "新酷音".to_string()
            },],
            engine.convert(&sequence)
        );
    }

    #[test]
    fn convert_next_segments_only_the_tail_past_cursor() {
        let dict = test_dictionary();
        let engine = DpConversionEngine::new(dict);
        let sequence = ChineseSequence {
            syllables: vec![
                syl![G, U, O, TONE2],
                syl![M, I, EN, TONE2],
                syl![D, A, TONE4],
                syl![H, U, EI, TONE4],
                syl![D, AI, TONE4],
                syl![B, I, AU, TONE3],
            ],
            selections: vec![],
            breaks: vec![],
        };
        assert_eq!(engine.convert(&sequence), engine.convert_next(&sequence, 0));
        assert_eq!(
            vec![
                Interval {
                    start: 2,
                    end: 4,
                    phrase: "大會".to_string()
                },
                Interval {
                    start: 4,
                    end: 6,
                    phrase: "代表".to_string()
                },
            ],
            engine.convert_next(&sequence, 2)
        );
        assert_eq!(
            vec![Interval {
                start: 4,
                end: 6,
                phrase: "代表".to_string()
            }],
            engine.convert_next(&sequence, 4)
        );
    }

    #[test]
    fn convert_next_mid_word_cursor_drops_the_syllables_before_it() {
        let dict = test_dictionary();
        let engine = DpConversionEngine::new(dict);
        let sequence = ChineseSequence {
            syllables: vec![
                syl![G, U, O, TONE2],
                syl![M, I, EN, TONE2],
                syl![D, A, TONE4],
                syl![H, U, EI, TONE4],
            ],
            selections: vec![],
            breaks: vec![],
        };
        // Cursor at 1 splits off 國 from 國民; the remaining 民 has no
        // matching multi-syllable phrase with what follows, so it falls
        // back to its own single-syllable entry.
        assert_eq!(
            vec![
                Interval {
                    start: 1,
                    end: 2,
                    phrase: "民".to_string()
                },
                Interval {
                    start: 2,
                    end: 4,
                    phrase: "大會".to_string()
                },
            ],
            engine.convert_next(&sequence, 1)
        );
    }

    #[test]
    fn convert_next_past_the_end_returns_no_intervals() {
        let dict = test_dictionary();
        let engine = DpConversionEngine::new(dict);
        let sequence = ChineseSequence {
            syllables: vec![syl![G, U, O, TONE2], syl![M, I, EN, TONE2]],
            selections: vec![],
            breaks: vec![],
        };
        assert_eq!(Vec::<Interval>::new(), engine.convert_next(&sequence, 2));
        assert_eq!(Vec::<Interval>::new(), engine.convert_next(&sequence, 8));
    }
}
