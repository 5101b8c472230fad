//! Keyboard layout conversion to phonetic keys
//!
//! This module contains engines for physical-to-logical key conversions.
//!
//! Traditionally the keyboards sold in Chinese speaking regions have both
//! the English alphabets and Zhuyin symbols printed on the keys. Like
//! English keyboards can have different physical layouts (QWERTY, Dvorak,
//! etc.), the Zhuyin symbols printed on top of them stay fixed to the key
//! *position*, not to the character the physical layout produces.
//!
//! Since people usually practice a Zhuyin input method independently from
//! practicing English typing, they acquire different muscle memory for key
//! position. This module provides a [`Keymap`] that maps a physical
//! keyboard's layout back to the logical [`KeyCode`] identity the phonetic
//! and table layout engines are written against, so a user on a physical
//! Dvorak keyboard still gets the Zhuyin symbols printed on their QWERTY-
//! labelled keycaps.

use std::fmt::Debug;

/// Logical, layout-independent key identity.
///
/// Named after the legend printed on a standard QWERTY keycap; this is the
/// identity every [`super::layout::SyllableEditor`] is written against,
/// regardless of the user's actual physical keyboard layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[rustfmt::skip]
pub enum KeyCode {
    N1, N2, N3, N4, N5, N6, N7, N8, N9, N0, Minus, Equal, BSlash, Grave,
      Q, W, E, R, T, Y, U, I, O, P, LBracket, RBracket,
       A, S, D, F, G, H, J, K, L, SColon, Quote,
        Z, X, C, V, B, N, M, Comma, Dot, Slash, Space,
}

use KeyCode::*;

#[rustfmt::skip]
pub const QWERTY: [KeyCode; 48] = [
    N1, N2, N3, N4, N5, N6, N7, N8, N9, N0, Minus, Equal, BSlash, Grave,
      Q, W, E, R, T, Y, U, I, O, P, LBracket, RBracket,
       A, S, D, F, G, H, J, K, L, SColon, Quote,
        Z, X, C, V, B, N, M, Comma, Dot, Slash, Space,
];

/// Physical key positions of a US Dvorak keyboard, in QWERTY legend order.
///
/// Row 1 is unchanged from QWERTY (digits and punctuation); the letter rows
/// follow the standard Dvorak rearrangement.
#[rustfmt::skip]
pub const DVORAK: [KeyCode; 48] = [
    N1, N2, N3, N4, N5, N6, N7, N8, N9, N0, LBracket, RBracket, BSlash, Grave,
      Quote, Comma, Dot, P, Y, F, G, C, R, L, Slash, Equal,
       A, O, E, U, I, D, H, T, N, S, Minus,
        SColon, Q, J, K, X, B, M, W, V, Z, Space,
];

impl KeyCode {
    const fn physical_index(self) -> usize {
        self as usize
    }

    /// Looks up the [`KeyCode`] whose US QWERTY keycap carries `c`.
    pub fn from_ascii(c: u8) -> Option<KeyCode> {
        let lower = c.to_ascii_lowercase();
        QWERTY.iter().copied().zip(ASCII_LEGEND).find_map(|(code, legend)| {
            if legend == lower as char {
                Some(code)
            } else {
                None
            }
        })
    }
}

#[rustfmt::skip]
const ASCII_LEGEND: [char; 48] = [
    '1', '2', '3', '4', '5', '6', '7', '8', '9', '0', '-', '=', '\\', '`',
      'q', 'w', 'e', 'r', 't', 'y', 'u', 'i', 'o', 'p', '[', ']',
       'a', 's', 'd', 'f', 'g', 'h', 'j', 'k', 'l', ';', '\'',
        'z', 'x', 'c', 'v', 'b', 'n', 'm', ',', '.', '/', ' ',
];

/// A single logical key press handed to a layout engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyEvent {
    pub code: KeyCode,
}

impl KeyEvent {
    pub const fn new(code: KeyCode) -> KeyEvent {
        KeyEvent { code }
    }
}

/// Translates a physical key position into the logical [`KeyCode`] identity
/// the layout engines understand.
pub trait Keymap: Debug {
    fn map_key(&self, code: KeyCode) -> KeyEvent;
}

/// A keymap backed by a 48-entry physical-position table, same shape as
/// [`QWERTY`]/[`DVORAK`].
#[derive(Debug, Clone, Copy)]
pub struct IdentityKeymap {
    table: [KeyCode; 48],
}

impl IdentityKeymap {
    pub const fn new(table: [KeyCode; 48]) -> IdentityKeymap {
        IdentityKeymap { table }
    }
}

impl Keymap for IdentityKeymap {
    fn map_key(&self, code: KeyCode) -> KeyEvent {
        KeyEvent::new(self.table[code.physical_index()])
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn qwerty_identity_roundtrip() {
        let keymap = IdentityKeymap::new(QWERTY);
        for code in QWERTY {
            assert_eq!(code, keymap.map_key(code).code);
        }
    }

    #[test]
    fn dvorak_remaps_letters() {
        let keymap = IdentityKeymap::new(DVORAK);
        // The physical key in the Dvorak "home row" A position is still A.
        assert_eq!(KeyCode::A, keymap.map_key(KeyCode::A).code);
        // The physical key in the Dvorak "home row" S position prints O.
        assert_eq!(KeyCode::O, keymap.map_key(KeyCode::S).code);
    }

    #[test]
    fn from_ascii() {
        assert_eq!(Some(KeyCode::A), KeyCode::from_ascii(b'a'));
        assert_eq!(Some(KeyCode::Space), KeyCode::from_ascii(b' '));
        assert_eq!(None, KeyCode::from_ascii(b'\t'));
    }
}
