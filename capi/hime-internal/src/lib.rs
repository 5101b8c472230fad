//! Internal, non-stable exports layered on top of `hime-public`.
//!
//! These are for frontends that need lower-level access the public ABI
//! deliberately doesn't promise to keep shaped the same way forever: raw
//! GTAB table enumeration (a table browser, an offline coverage report)
//! and the active table's radical alphabet. Ordinary frontends only need
//! `hime-public`; this crate exists so that need never forces a breaking
//! change onto the stable surface.

use std::os::raw::{c_char, c_int};

use hime::Context;
use hime_public::types::copy_into_fixed;

/// The number of packed-key -> character entries in `ctx`'s active GTAB
/// table, or `-1` if no GTAB table is loaded.
#[no_mangle]
pub extern "C" fn gtab_table_entry_count(ctx: *mut Context) -> c_int {
    match unsafe { ctx.as_ref() }.and_then(Context::active_gtab_table) {
        Some(table) => table.entry_count() as c_int,
        None => -1,
    }
}

/// Writes the UTF-8 text of the `idx`-th entry of `ctx`'s active GTAB
/// table (on-disk order, not ranked) into `buf`. Returns the byte length
/// on success, `-1` if no table is loaded or `idx` is out of range.
#[no_mangle]
pub extern "C" fn gtab_table_entry_text(ctx: *mut Context, idx: c_int, buf: *mut c_char, size: c_int) -> c_int {
    let Some(table) = (unsafe { ctx.as_ref() }).and_then(Context::active_gtab_table) else {
        return -1;
    };
    let Ok(idx) = usize::try_from(idx) else {
        return -1;
    };
    let Some(entry) = table.entry_at(idx) else {
        return -1;
    };
    let text = entry.text_str();
    let full_len = text.len() as c_int;
    if buf.is_null() || size <= 0 {
        return full_len;
    }
    let size = size as usize;
    let bytes = text.as_bytes();
    let copy_len = bytes.len().min(size - 1);
    unsafe {
        std::ptr::copy_nonoverlapping(bytes.as_ptr() as *const c_char, buf, copy_len);
        *buf.add(copy_len) = 0;
    }
    full_len
}

/// Radical alphabet size (`key_count`) of `ctx`'s active GTAB table, or
/// `-1` if none is loaded.
#[no_mangle]
pub extern "C" fn gtab_table_key_count(ctx: *mut Context) -> c_int {
    match unsafe { ctx.as_ref() }.and_then(Context::active_gtab_table) {
        Some(table) => table.key_count as c_int,
        None => -1,
    }
}

/// Radical index -> ASCII key character for `ctx`'s active GTAB table.
/// Returns `0` if no table is loaded or `index` is out of range.
#[no_mangle]
pub extern "C" fn gtab_table_radical_char(ctx: *mut Context, index: u32) -> c_char {
    unsafe { ctx.as_ref() }
        .and_then(Context::active_gtab_table)
        .and_then(|table| table.radical_char(index))
        .map_or(0, |b| b as c_char)
}

/// The selection-key alphabet declared by `ctx`'s active GTAB table's
/// header (distinct from the `Context`-wide candidate selection keys set
/// via `set_selection_keys`, which a frontend may have overridden). Returns
/// the byte length on success, `-1` if no table is loaded.
#[no_mangle]
pub extern "C" fn gtab_table_selection_keys(ctx: *mut Context, buf: *mut c_char, size: c_int) -> c_int {
    let Some(table) = (unsafe { ctx.as_ref() }).and_then(Context::active_gtab_table) else {
        return -1;
    };
    if buf.is_null() || size <= 0 {
        return table.selection_keys.len() as c_int;
    }
    let mut scratch = [0u8; 16];
    let full_len = copy_into_fixed(&table.selection_keys, &mut scratch);
    let size = size as usize;
    let copy_len = (scratch.iter().position(|&b| b == 0).unwrap_or(scratch.len())).min(size - 1);
    unsafe {
        std::ptr::copy_nonoverlapping(scratch.as_ptr() as *const c_char, buf, copy_len);
        *buf.add(copy_len) = 0;
    }
    full_len
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn no_table_loaded_reports_minus_one() {
        let ctx = hime::Context::new();
        let ctx_ptr = &ctx as *const Context as *mut Context;
        assert_eq!(-1, gtab_table_entry_count(ctx_ptr));
        assert_eq!(-1, gtab_table_key_count(ctx_ptr));
    }
}
