//! The HIME cross-platform Chinese/CJK input method core engine.
//!
//! [`context::Context`] is the per-session dispatcher a frontend drives one
//! key at a time; [`library::Library`] is the process-wide registry and
//! bundled-table singleton every `Context` is built against. The
//! composition engines themselves ([`editor::pho`], [`editor::tsin`],
//! [`gtab`], [`editor::intcode`]) can be used standalone for testing or
//! tooling without going through a `Context` at all.

pub mod candidate;
pub mod context;
pub mod conversion;
pub mod dictionary;
pub mod editor;
pub mod gtab;
pub mod library;
pub mod method;
pub mod punctuation;
pub mod registry;
pub mod script_variant;
pub mod zhuyin;

pub use context::{Context, FeedbackEvent, KeyResult};
pub use library::{Library, LibraryError};
pub use method::Method;
