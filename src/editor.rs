//! Per-method key-processing engines plus the physical-to-logical keymap
//! they're built on.
//!
//! [`keymap`] turns a physical key position into the logical [`KeyCode`]
//! identity every layout is written against; [`layout`] turns a sequence of
//! those into a finished [`crate::zhuyin::Syllable`]; [`pho`], [`tsin`] and
//! [`intcode`] are the three composition engines that drive a layout (or, for
//! [`intcode`], a bare hex buffer) and decide when a key finalizes into
//! candidates or a commit.
//!
//! [`KeyCode`]: keymap::KeyCode

pub mod intcode;
pub mod keymap;
pub mod layout;
pub mod pho;
pub mod tsin;
