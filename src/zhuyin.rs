mod bopomofo;
mod syllable;

pub use bopomofo::{Bopomofo, BopomofoKind, BopomofoParseError};
pub use syllable::{IntoSyllablesBytes, Syllable, SyllableBuilder, SyllableDecodeError};
