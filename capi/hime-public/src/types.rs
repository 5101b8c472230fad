//! C-visible types for the public HIME ABI: opaque handles, fixed-size
//! result structs and the enums frontends switch on. Re-exports the
//! `#[repr(i32)]` enums already defined in the core crate rather than
//! duplicating their numbering.

use std::ffi::c_int;

pub use hime::context::KeyResult;
pub use hime::editor::layout::Layout;
pub use hime::method::Method;
pub use hime::registry::GtabId as GtabTable;
pub use hime::script_variant::{Charset, OutputVariant};

/// Bitflags for `process_key`'s `mods` parameter.
pub use hime::context::modifier;

/// Buffer size used for the fixed-width name/filename fields below. Large
/// enough for every bundled GTAB display name (CJK names run well under 64
/// bytes of UTF-8) and for `find_method_by_name`/`search_methods` queries.
pub const NAME_BUF_LEN: usize = 64;
pub const FILENAME_BUF_LEN: usize = 64;
pub const SELKEY_BUF_LEN: usize = 16;

pub const MIN_PER_PAGE: c_int = 1;
pub const MAX_PER_PAGE: c_int = 10;

/// One entry of the method/GTAB registry, as returned by
/// `gtab_get_table_info`. Strings are NUL-terminated UTF-8, truncated to
/// fit; callers that need the untruncated name should go through
/// `search_methods` instead.
#[repr(C)]
pub struct GtabInfo {
    pub id: c_int,
    pub name: [u8; NAME_BUF_LEN],
    pub filename: [u8; FILENAME_BUF_LEN],
    pub key_count: c_int,
    pub max_keystrokes: c_int,
    pub dup_sel: bool,
    pub enabled: bool,
}

impl Default for GtabInfo {
    fn default() -> Self {
        GtabInfo {
            id: -1,
            name: [0; NAME_BUF_LEN],
            filename: [0; FILENAME_BUF_LEN],
            key_count: 0,
            max_keystrokes: 0,
            dup_sel: false,
            enabled: false,
        }
    }
}

/// Query passed to `search_methods`.
///
/// `query` must be a NUL-terminated UTF-8 string; `method_type` restricts
/// the search to one [`Method`], or pass `-1` to search every registry
/// entry regardless of kind.
#[repr(C)]
pub struct SearchFilter {
    pub query: *const std::os::raw::c_char,
    pub method_type: c_int,
}

/// One scored hit written into the caller-provided `out` array by
/// `search_methods`.
#[repr(C)]
pub struct SearchResult {
    pub index: c_int,
    pub name: [u8; NAME_BUF_LEN],
    pub score: c_int,
}

impl Default for SearchResult {
    fn default() -> Self {
        SearchResult {
            index: -1,
            name: [0; NAME_BUF_LEN],
            score: 0,
        }
    }
}

/// Writes as much of `text` as fits (NUL-terminated) into `out`, returning
/// the full UTF-8 byte length of `text` regardless of truncation — the
/// buffer-undersize convention shared by every string-returning entry
/// point: callers with a too-small buffer still learn how big a buffer
/// they'd need to retry with.
pub fn copy_into_fixed<const N: usize>(text: &str, out: &mut [u8; N]) -> c_int {
    let bytes = text.as_bytes();
    let copy_len = bytes.len().min(N - 1);
    out[..copy_len].copy_from_slice(&bytes[..copy_len]);
    out[copy_len] = 0;
    bytes.len() as c_int
}
