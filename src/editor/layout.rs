//! Phonetic (Bopomofo/Zhuyin) keyboard layout engines
//!
//! The most widely used Zhuyin layout is the one printed directly on
//! keycaps sold in Taiwan: a one-to-one mapping from keys to Zhuyin
//! symbols. Several alternative layouts instead take advantage of
//! impossible Bopomofo combinations to pack more symbols onto fewer keys
//! (Hsu, Eten26, IBM) or spell Hanyu Pinyin letters that are translated to
//! Bopomofo afterwards (Pinyin).
//!
//! Each layout is one [`SyllableEditor`] implementation, driven key by key
//! and holding a single in-progress [`Syllable`].

use std::fmt::Debug;

use crate::zhuyin::Syllable;

pub use super::keymap::KeyEvent;

pub mod dvorak;
pub mod eten;
pub mod eten26;
pub mod hsu;
pub mod ibm;
pub mod pinyin;
pub mod standard;

/// Outcome of feeding one key to a [`SyllableEditor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyBehavior {
    /// The key was not recognized by this layout.
    NoWord,
    /// The key was absorbed into the in-progress syllable.
    Absorb,
    /// The key finalized the syllable (a tone key committed it).
    Commit,
}

/// Which phonetic key table drives the active [`SyllableEditor`]. Numeric
/// values are part of the C ABI and must not be renumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum Layout {
    Standard = 0,
    Hsu = 1,
    Eten = 2,
    Eten26 = 3,
    Ibm = 4,
    Pinyin = 5,
    Dvorak = 6,
}

impl Default for Layout {
    fn default() -> Self {
        Layout::Standard
    }
}

/// Builds the [`SyllableEditor`] for a given [`Layout`].
pub fn new_syllable_editor(layout: Layout) -> Box<dyn SyllableEditor> {
    match layout {
        Layout::Standard => Box::new(standard::Standard::new()),
        Layout::Hsu => Box::new(hsu::Hsu::new()),
        Layout::Eten => Box::new(eten::Eten::new()),
        Layout::Eten26 => Box::new(eten26::Eten26::new()),
        Layout::Ibm => Box::new(ibm::Ibm::new()),
        Layout::Pinyin => Box::new(pinyin::Pinyin::new()),
        Layout::Dvorak => Box::new(dvorak::Dvorak::new()),
    }
}

/// A phonetic layout engine: keys in, one [`Syllable`] accumulated.
pub trait SyllableEditor: Debug {
    /// Handles one key press, returning how the layout consumed it.
    fn key_press(&mut self, key: KeyEvent) -> KeyBehavior;
    /// Whether the in-progress syllable is empty.
    fn is_empty(&self) -> bool;
    /// Removes the most recently entered Bopomofo symbol.
    fn remove_last(&mut self);
    /// Clears the in-progress syllable.
    fn clear(&mut self);
    /// Reads the in-progress syllable without consuming it.
    fn read(&self) -> Syllable;
    /// Returns the raw key sequence typed so far, if the layout tracks one
    /// (used by layouts, like Pinyin, whose spelling cannot always be
    /// reconstructed from the decoded [`Syllable`] alone).
    fn key_seq(&self) -> Option<String> {
        None
    }
}
