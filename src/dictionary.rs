//! Dictionaries for looking up phrases.
//!
//! A [`Dictionary`] maps a sequence of syllables to the phrases it can spell,
//! each carrying a frequency used to rank candidates. [`LayeredDictionary`]
//! stacks several dictionaries (bundled system tables, the user's personal
//! phrase history) into the single view the phrase engine queries.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::path::Path;

use miette::Diagnostic;
use thiserror::Error;

use crate::zhuyin::Syllable;

pub use layered::LayeredDictionary;
pub use trie::{TrieDictionary, TrieDictionaryBuilder, TrieDictionaryStatistics};

mod layered;
/// cbindgen:ignore
mod trie;

pub use sqlite::{SqliteDictionary, SqliteDictionaryBuilder, SqliteDictionaryError};
mod sqlite;

/// A phrase and the frequency it has been observed or assigned.
///
/// Frequency is an arbitrary, dictionary-relative scale (spec's "higher is
/// more likely"); the candidate model only ever compares frequencies within
/// the same lookup, never across dictionaries.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Phrase {
    phrase: String,
    freq: u32,
}

impl Phrase {
    pub fn new<S: Into<String>>(phrase: S, freq: u32) -> Phrase {
        Phrase {
            phrase: phrase.into(),
            freq,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.phrase
    }

    pub fn freq(&self) -> u32 {
        self.freq
    }
}

impl std::fmt::Display for Phrase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.phrase)
    }
}

impl From<(&str, u32)> for Phrase {
    fn from((phrase, freq): (&str, u32)) -> Self {
        Phrase::new(phrase, freq)
    }
}

impl Ord for Phrase {
    fn cmp(&self, other: &Self) -> Ordering {
        self.freq
            .cmp(&other.freq)
            .then_with(|| self.phrase.cmp(&other.phrase))
    }
}

impl PartialOrd for Phrase {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// The error type which is returned from updating a dictionary.
#[derive(Error, Diagnostic, Debug)]
#[error("update dictionary failed")]
#[diagnostic(code(hime::dictionary_update_error))]
pub struct DictionaryUpdateError {
    pub source: Box<dyn std::error::Error + Send + Sync>,
}

/// The error type which is returned from building a dictionary.
#[derive(Error, Diagnostic, Debug)]
#[error("build dictionary failed")]
#[diagnostic(code(hime::build_dictionary_error))]
pub struct BuildDictionaryError {
    pub source: Box<dyn std::error::Error + Send + Sync>,
}

/// The error type which is returned from building or updating a dictionary.
#[derive(Error, Diagnostic, Debug)]
#[error("found duplicated phrases")]
#[diagnostic(code(hime::duplicate_phrase_error))]
pub struct DuplicatePhraseError;

/// A collection of metadata of a dictionary.
///
/// The dictionary version and copyright information can be used in
/// configuration application.
#[derive(Clone, Default)]
pub struct DictionaryInfo {
    /// The name of the dictionary.
    pub name: Option<String>,
    /// The copyright information of the dictionary.
    ///
    /// It's recommended to include the copyright holders' names and email
    /// addresses, separated by semicolons.
    pub copyright: Option<String>,
    /// The license information of the dictionary.
    ///
    /// It's recommended to use the [SPDX license identifier](https://spdx.org/licenses/).
    pub license: Option<String>,
    /// The date the dictionary was created.
    ///
    /// It's recommended to use the ISO-8601 format, YYYY-MM-DD.
    pub created_date: Option<String>,
    /// The version of the dictionary.
    pub version: Option<String>,
    /// The name of the software used to generate the dictionary.
    pub software: Option<String>,
}

/// A generic iterator over the phrases matched by a lookup.
pub type Phrases<'a> = Box<dyn Iterator<Item = Phrase> + 'a>;

/// A generic iterator over every (syllables, phrase) entry a dictionary
/// holds, used by compaction/export tooling.
pub type DictEntries<'a> = Box<dyn Iterator<Item = (Vec<Syllable>, Phrase)> + 'a>;

/// A set of phrases excluded from lookup results regardless of which
/// dictionary produced them, e.g. a user's personally blocked words.
pub trait BlockList {
    fn is_blocked(&self, phrase: &str) -> bool;
}

impl BlockList for HashSet<String> {
    fn is_blocked(&self, phrase: &str) -> bool {
        self.contains(phrase)
    }
}

/// An interface for looking up dictionaries.
///
/// This is the main dictionary trait. For more about the concept of
/// dictionaries generally, please see the [module-level
/// documentation][crate::dictionary].
pub trait Dictionary {
    /// Returns an iterator to all single syllable words matched by the
    /// syllable, if any.
    fn lookup_word(&self, syllable: Syllable) -> Phrases {
        self.lookup_phrase(&[syllable])
    }
    /// Returns an iterator to all phrases matched by the syllables, if any.
    fn lookup_phrase(&self, syllables: &[Syllable]) -> Phrases;
    /// Returns every entry this dictionary holds, for export/compaction.
    fn entries(&self) -> DictEntries;
    /// Returns information about the dictionary instance.
    fn about(&self) -> DictionaryInfo;
    /// Returns a mutable reference to the dictionary if the underlying
    /// implementation allows update.
    fn as_mut_dict(&mut self) -> Option<&mut dyn DictionaryMut>;
}

/// An interface for updating dictionaries, typically the user's personal
/// phrase dictionary.
pub trait DictionaryMut {
    /// Inserts a brand new phrase. Fails with [`DuplicatePhraseError`]
    /// (wrapped in [`DictionaryUpdateError`]) if the phrase is already
    /// present for this syllable sequence.
    fn insert(&mut self, syllables: &[Syllable], phrase: Phrase) -> Result<(), DictionaryUpdateError>;
    /// Updates an existing phrase's frequency, recording `time` (a Unix
    /// timestamp) so recency can be weighed alongside frequency.
    fn update(
        &mut self,
        syllables: &[Syllable],
        phrase: Phrase,
        user_freq: u32,
        time: u64,
    ) -> Result<(), DictionaryUpdateError>;
    /// Removes a phrase entirely.
    fn remove(&mut self, syllables: &[Syllable], phrase_str: &str) -> Result<(), DictionaryUpdateError>;
}

/// An interface for constructing a read-optimized dictionary from a full set
/// of entries in one pass, used by offline dictionary compiler tooling.
pub trait DictionaryBuilder {
    fn set_info(&mut self, info: DictionaryInfo) -> Result<(), BuildDictionaryError>;
    fn insert(&mut self, syllables: &[Syllable], phrase: Phrase) -> Result<(), BuildDictionaryError>;
    fn build(&mut self, path: &Path) -> Result<(), BuildDictionaryError>;
}

impl Dictionary for HashMap<Vec<Syllable>, Vec<Phrase>> {
    fn lookup_phrase(&self, syllables: &[Syllable]) -> Phrases {
        self.get(syllables)
            .cloned()
            .map(|v| Box::new(v.into_iter()) as Phrases)
            .unwrap_or_else(|| Box::new(std::iter::empty()))
    }

    fn entries(&self) -> DictEntries {
        Box::new(
            self.clone()
                .into_iter()
                .flat_map(|(syllables, phrases)| {
                    phrases
                        .into_iter()
                        .map(move |phrase| (syllables.clone(), phrase))
                }),
        )
    }

    fn about(&self) -> DictionaryInfo {
        Default::default()
    }

    fn as_mut_dict(&mut self) -> Option<&mut dyn DictionaryMut> {
        Some(self)
    }
}

impl DictionaryMut for HashMap<Vec<Syllable>, Vec<Phrase>> {
    fn insert(&mut self, syllables: &[Syllable], phrase: Phrase) -> Result<(), DictionaryUpdateError> {
        let vec = self.entry(syllables.to_vec()).or_default();
        if vec.iter().any(|it| it.as_str() == phrase.as_str()) {
            return Err(DictionaryUpdateError {
                source: Box::new(DuplicatePhraseError),
            });
        }
        vec.push(phrase);
        Ok(())
    }

    fn update(
        &mut self,
        syllables: &[Syllable],
        phrase: Phrase,
        user_freq: u32,
        _time: u64,
    ) -> Result<(), DictionaryUpdateError> {
        let vec = self.entry(syllables.to_vec()).or_default();
        match vec.iter_mut().find(|it| it.as_str() == phrase.as_str()) {
            Some(existing) => *existing = Phrase::new(phrase.as_str().to_string(), user_freq),
            None => vec.push(Phrase::new(phrase.as_str().to_string(), user_freq)),
        }
        Ok(())
    }

    fn remove(&mut self, syllables: &[Syllable], phrase_str: &str) -> Result<(), DictionaryUpdateError> {
        if let Some(vec) = self.get_mut(syllables) {
            vec.retain(|it| it.as_str() != phrase_str);
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use std::collections::HashMap;

    use super::{Dictionary, DictionaryMut, Phrase};
    use crate::{syl, zhuyin::Bopomofo};

    #[test]
    fn hashmap_dictionary_roundtrip() {
        let mut dict: HashMap<Vec<_>, Vec<Phrase>> = HashMap::new();
        let key = vec![syl![Bopomofo::C, Bopomofo::E, Bopomofo::TONE4]];
        dict.as_mut_dict()
            .unwrap()
            .insert(&key, Phrase::new("測", 100))
            .unwrap();

        let found: Vec<_> = dict.lookup_phrase(&key).collect();
        assert_eq!(vec![Phrase::new("測", 100)], found);
    }

    #[test]
    fn hashmap_dictionary_rejects_duplicate() {
        let mut dict: HashMap<Vec<_>, Vec<Phrase>> = HashMap::new();
        let key = vec![syl![Bopomofo::C, Bopomofo::E, Bopomofo::TONE4]];
        dict.as_mut_dict()
            .unwrap()
            .insert(&key, Phrase::new("測", 100))
            .unwrap();
        assert!(dict
            .as_mut_dict()
            .unwrap()
            .insert(&key, Phrase::new("測", 1))
            .is_err());
    }
}
