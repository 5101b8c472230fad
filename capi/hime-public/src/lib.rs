//! The stable, frontend-facing C ABI every HIME frontend (TSF, IMK, IBus,
//! the Android/iOS JNI and UIKit bridges) binds against. Every entry point
//! here is NULL-safe: a null `Context` pointer returns the documented safe
//! default instead of dereferencing, and `context_free(NULL)` is a no-op.
//!
//! This crate is a thin FFI skin over [`hime::context::Context`] and
//! [`hime::library::Library`] — it holds no state of its own beyond the
//! opaque handles it hands back to callers.

pub mod types;

use std::ffi::{c_char, c_int, CStr};
use std::os::raw::c_void;

use hime::{context::EngineError, library::Library, Context};

use types::{copy_into_fixed, GtabInfo, GtabTable, KeyResult, Layout, Method, SearchFilter, SearchResult};

const VERSION: &CStr = match CStr::from_bytes_with_nul(concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes()) {
    Ok(cstr) => cstr,
    Err(_) => unreachable!(),
};

/// Loads the global registry and bundled tables from `data_dir`. Must
/// precede any `context_new`. Returns `0` on a fully successful load, a
/// negative code if some bundled table failed to load (the registry is
/// still installed; affected methods just produce no candidates), `-1` if
/// `data_dir` is not valid UTF-8.
#[no_mangle]
pub extern "C" fn init(data_dir: *const c_char) -> c_int {
    let Some(path) = cstr_to_str(data_dir) else {
        return -1;
    };
    match Library::init(path) {
        Ok(()) => 0,
        Err(_) => -2,
    }
}

/// Releases cached GTAB tables. The registry and bundled dictionaries stay
/// installed for the lifetime of the process (see [`Library::cleanup`]).
#[no_mangle]
pub extern "C" fn cleanup() {
    Library::cleanup();
}

/// The crate's semver, as a static NUL-terminated string. Never null.
#[no_mangle]
pub extern "C" fn version() -> *const c_char {
    VERSION.as_ptr()
}

#[no_mangle]
pub extern "C" fn context_new() -> *mut Context {
    Box::into_raw(Box::new(Context::new()))
}

#[no_mangle]
pub extern "C" fn context_free(ctx: *mut Context) {
    if ctx.is_null() {
        return;
    }
    unsafe {
        drop(Box::from_raw(ctx));
    }
}

#[no_mangle]
pub extern "C" fn context_reset(ctx: *mut Context) {
    if let Some(ctx) = unsafe { ctx.as_mut() } {
        ctx.reset();
    }
}

#[no_mangle]
pub extern "C" fn set_input_method(ctx: *mut Context, method: Method) -> c_int {
    match unsafe { ctx.as_mut() } {
        Some(ctx) => {
            if ctx.set_input_method(method) {
                0
            } else {
                -1
            }
        }
        None => -1,
    }
}

#[no_mangle]
pub extern "C" fn get_input_method(ctx: *mut Context) -> Method {
    match unsafe { ctx.as_ref() } {
        Some(ctx) => ctx.get_input_method(),
        None => Method::Pho,
    }
}

#[no_mangle]
pub extern "C" fn is_chinese_mode(ctx: *mut Context) -> bool {
    unsafe { ctx.as_ref() }.map_or(false, Context::is_chinese_mode)
}

#[no_mangle]
pub extern "C" fn set_chinese_mode(ctx: *mut Context, on: bool) {
    if let Some(ctx) = unsafe { ctx.as_mut() } {
        ctx.set_chinese_mode(on);
    }
}

#[no_mangle]
pub extern "C" fn toggle_chinese_mode(ctx: *mut Context) -> bool {
    match unsafe { ctx.as_mut() } {
        Some(ctx) => ctx.toggle_chinese_mode(),
        None => false,
    }
}

#[no_mangle]
pub extern "C" fn process_key(
    ctx: *mut Context,
    keycode: u32,
    charcode: u32,
    mods: u32,
) -> KeyResult {
    match unsafe { ctx.as_mut() } {
        Some(ctx) => ctx.process_key(keycode, charcode, mods),
        None => KeyResult::Ignored,
    }
}

#[no_mangle]
pub extern "C" fn get_preedit(ctx: *mut Context, buf: *mut c_char, size: c_int) -> c_int {
    match unsafe { ctx.as_ref() } {
        Some(ctx) => copy_str_to_buf(ctx.get_preedit(), buf, size),
        None => -1,
    }
}

#[no_mangle]
pub extern "C" fn get_preedit_cursor(ctx: *mut Context) -> c_int {
    match unsafe { ctx.as_ref() } {
        Some(ctx) => ctx.get_preedit_cursor() as c_int,
        None => 0,
    }
}

#[no_mangle]
pub extern "C" fn get_commit(ctx: *mut Context, buf: *mut c_char, size: c_int) -> c_int {
    match unsafe { ctx.as_ref() } {
        Some(ctx) => copy_str_to_buf(ctx.get_commit(), buf, size),
        None => -1,
    }
}

#[no_mangle]
pub extern "C" fn clear_commit(ctx: *mut Context) {
    if let Some(ctx) = unsafe { ctx.as_mut() } {
        ctx.clear_commit();
    }
}

#[no_mangle]
pub extern "C" fn has_candidates(ctx: *mut Context) -> bool {
    unsafe { ctx.as_ref() }.map_or(false, Context::has_candidates)
}

#[no_mangle]
pub extern "C" fn get_candidate_count(ctx: *mut Context) -> c_int {
    unsafe { ctx.as_ref() }.map_or(0, |ctx| ctx.get_candidate_count() as c_int)
}

#[no_mangle]
pub extern "C" fn get_candidate(ctx: *mut Context, idx: c_int, buf: *mut c_char, size: c_int) -> c_int {
    let Some(ctx) = (unsafe { ctx.as_ref() }) else {
        return -1;
    };
    let Ok(idx) = usize::try_from(idx) else {
        return -1;
    };
    match ctx.get_candidate(idx) {
        Some(text) => copy_str_to_buf(text, buf, size),
        None => -1,
    }
}

#[no_mangle]
pub extern "C" fn select_candidate(ctx: *mut Context, idx: c_int) -> KeyResult {
    let Some(ctx) = (unsafe { ctx.as_mut() }) else {
        return KeyResult::Ignored;
    };
    let Ok(idx) = usize::try_from(idx) else {
        return KeyResult::Ignored;
    };
    ctx.select_candidate(idx)
}

#[no_mangle]
pub extern "C" fn candidate_page_up(ctx: *mut Context) -> bool {
    match unsafe { ctx.as_mut() } {
        Some(ctx) => ctx.candidate_page_up(),
        None => false,
    }
}

#[no_mangle]
pub extern "C" fn candidate_page_down(ctx: *mut Context) -> bool {
    match unsafe { ctx.as_mut() } {
        Some(ctx) => ctx.candidate_page_down(),
        None => false,
    }
}

#[no_mangle]
pub extern "C" fn set_keyboard_layout(ctx: *mut Context, layout: Layout) -> c_int {
    match unsafe { ctx.as_mut() } {
        Some(ctx) => {
            if ctx.set_keyboard_layout(layout) {
                0
            } else {
                -1
            }
        }
        None => -1,
    }
}

#[no_mangle]
pub extern "C" fn set_keyboard_layout_by_name(ctx: *mut Context, name: *const c_char) -> c_int {
    let Some(ctx) = (unsafe { ctx.as_mut() }) else {
        return -1;
    };
    let Some(name) = cstr_to_str(name) else {
        return -1;
    };
    if ctx.set_keyboard_layout_by_name(name) {
        0
    } else {
        -1
    }
}

#[no_mangle]
pub extern "C" fn set_selection_keys(ctx: *mut Context, keys: *const c_char) {
    let Some(ctx) = (unsafe { ctx.as_mut() }) else {
        return;
    };
    if let Some(keys) = cstr_to_str(keys) {
        ctx.set_selection_keys(keys);
    }
}

#[no_mangle]
pub extern "C" fn set_candidates_per_page(ctx: *mut Context, n: c_int) {
    if let Some(ctx) = unsafe { ctx.as_mut() } {
        ctx.set_candidates_per_page(n);
    }
}

/// The number of entries in the process-wide registry (built-in engines
/// plus every bundled GTAB table), or `0` if [`init`] has not run.
#[no_mangle]
pub extern "C" fn gtab_get_table_count() -> c_int {
    Library::get().map_or(0, |library| library.registry().len() as c_int)
}

/// Fills `out` with the registry entry at position `idx`. Returns `0` on
/// success, `-1` if `idx` is out of range, the registry is not installed,
/// or `out` is null.
#[no_mangle]
pub extern "C" fn gtab_get_table_info(idx: c_int, out: *mut GtabInfo) -> c_int {
    if out.is_null() {
        return -1;
    }
    let Some(library) = Library::get() else {
        return -1;
    };
    let Ok(idx) = usize::try_from(idx) else {
        return -1;
    };
    let Some(entry) = library.registry().entry(idx) else {
        return -1;
    };
    let mut info = GtabInfo {
        id: entry.gtab_id.map_or(-1, |id| id as c_int),
        enabled: entry.enabled,
        ..GtabInfo::default()
    };
    copy_into_fixed(&entry.name, &mut info.name);
    if let Some(filename) = &entry.filename {
        copy_into_fixed(filename, &mut info.filename);
        if let Ok(table) = library.load_gtab(filename) {
            info.key_count = table.key_count as c_int;
            info.max_keystrokes = table.max_keystrokes as c_int;
            info.dup_sel = table.dup_sel;
        }
    }
    unsafe {
        *out = info;
    }
    0
}

#[no_mangle]
pub extern "C" fn gtab_load_table_by_id(ctx: *mut Context, id: GtabTable) -> c_int {
    match unsafe { ctx.as_mut() } {
        Some(ctx) => {
            if ctx.load_gtab_by_id(id) {
                0
            } else {
                -1
            }
        }
        None => -1,
    }
}

#[no_mangle]
pub extern "C" fn gtab_load_table(ctx: *mut Context, filename: *const c_char) -> c_int {
    let Some(ctx) = (unsafe { ctx.as_mut() }) else {
        return -1;
    };
    let Some(filename) = cstr_to_str(filename) else {
        return -1;
    };
    if ctx.load_gtab_table(filename) {
        0
    } else {
        -1
    }
}

#[no_mangle]
pub extern "C" fn search_methods(filter: *const SearchFilter, out: *mut SearchResult, max: c_int) -> c_int {
    let Some(filter) = (unsafe { filter.as_ref() }) else {
        return -1;
    };
    let Some(library) = Library::get() else {
        return 0;
    };
    let Some(query) = cstr_to_str(filter.query) else {
        return -1;
    };
    let method_type = Method::from_i32(filter.method_type);
    let results = library.registry().search(query, method_type);

    if out.is_null() || max <= 0 {
        return results.len() as c_int;
    }
    let max = max as usize;
    let out_slice = unsafe { std::slice::from_raw_parts_mut(out, max) };
    for (slot, result) in out_slice.iter_mut().zip(results.iter()) {
        *slot = SearchResult {
            index: result.index as c_int,
            score: result.score,
            ..SearchResult::default()
        };
        copy_into_fixed(&result.name, &mut slot.name);
    }
    results.len() as c_int
}

#[no_mangle]
pub extern "C" fn find_method_by_name(name: *const c_char) -> c_int {
    let Some(library) = Library::get() else {
        return -1;
    };
    let Some(name) = cstr_to_str(name) else {
        return -1;
    };
    library.registry().find_by_name(name).map_or(-1, |idx| idx as c_int)
}

#[no_mangle]
pub extern "C" fn set_charset(ctx: *mut Context, charset: types::Charset) {
    if let Some(ctx) = unsafe { ctx.as_mut() } {
        ctx.set_charset(charset);
    }
}

#[no_mangle]
pub extern "C" fn set_output_variant(ctx: *mut Context, variant: types::OutputVariant) {
    if let Some(ctx) = unsafe { ctx.as_mut() } {
        ctx.set_output_variant(variant);
    }
}

#[no_mangle]
pub extern "C" fn convert_trad_to_simp(input: *const c_char, out: *mut c_char, size: c_int) -> c_int {
    let Some(input) = cstr_to_str(input) else {
        return -1;
    };
    copy_str_to_buf(&hime::script_variant::traditional_to_simplified(input), out, size)
}

#[no_mangle]
pub extern "C" fn convert_simp_to_trad(input: *const c_char, out: *mut c_char, size: c_int) -> c_int {
    let Some(input) = cstr_to_str(input) else {
        return -1;
    };
    copy_str_to_buf(&hime::script_variant::simplified_to_traditional(input), out, size)
}

/// A soft diagnostic code for the last `process_key`/config call on `ctx`,
/// for frontends that want more detail than the `KeyResult`/bool surface
/// carries. Not part of the stable numbering contract: values are an
/// opaque hint, only `0` ("no error") is guaranteed stable.
#[no_mangle]
pub extern "C" fn get_last_error(ctx: *mut Context) -> c_int {
    let Some(ctx) = (unsafe { ctx.as_ref() }) else {
        return 0;
    };
    match ctx.last_error() {
        None => 0,
        Some(EngineError::UnknownMethod) => 1,
        Some(EngineError::UnknownLayout) => 2,
        Some(EngineError::GtabNotLoaded) => 3,
        Some(EngineError::GtabLoad(_)) => 4,
        Some(EngineError::InvalidIntcode) => 5,
    }
}

/// A frontend's UI-feedback hook: `event_kind` is a [`FeedbackEvent`]
/// discriminant, `user_data` is whatever opaque pointer was passed to
/// [`context_set_feedback`] — the core never dereferences it itself.
pub type FeedbackCallback = extern "C" fn(event_kind: c_int, user_data: *mut c_void);

/// Installs `callback` as `ctx`'s UI-feedback hook, invoked synchronously
/// during `process_key`. Passing `None` clears it. Must not call back into
/// `ctx` from within `callback` (re-entrancy is undefined behavior, same as
/// the Rust API it wraps).
#[no_mangle]
pub extern "C" fn context_set_feedback(
    ctx: *mut Context,
    callback: Option<FeedbackCallback>,
    user_data: *mut c_void,
) {
    let Some(ctx) = (unsafe { ctx.as_mut() }) else {
        return;
    };
    match callback {
        Some(cb) => ctx.set_feedback(Box::new(move |event| cb(event as c_int, user_data))),
        None => ctx.set_feedback(Box::new(|_event| {})),
    }
}

fn cstr_to_str<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        return None;
    }
    unsafe { CStr::from_ptr(ptr) }.to_str().ok()
}

fn copy_str_to_buf(text: &str, buf: *mut c_char, size: c_int) -> c_int {
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

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn context_free_null_is_noop() {
        context_free(std::ptr::null_mut());
    }

    #[test]
    fn null_context_getters_return_safe_defaults() {
        let ctx = std::ptr::null_mut();
        assert_eq!(Method::Pho, get_input_method(ctx));
        assert!(!is_chinese_mode(ctx));
        assert_eq!(KeyResult::Ignored, process_key(ctx, 0, b'a' as u32, 0));
        assert_eq!(-1, get_preedit(ctx, std::ptr::null_mut(), 0));
        assert!(!has_candidates(ctx));
        assert_eq!(0, get_candidate_count(ctx));
    }

    #[test]
    fn roundtrip_through_real_context() {
        let ctx = context_new();
        assert!(!ctx.is_null());
        set_chinese_mode(ctx, false);
        assert!(!is_chinese_mode(ctx));
        assert_eq!(KeyResult::Ignored, process_key(ctx, 0, b'a' as u32, 0));
        context_free(ctx);
    }

    #[test]
    fn copy_str_to_buf_truncates_and_reports_full_length() {
        let mut buf = [0i8; 4];
        let len = copy_str_to_buf("hello", buf.as_mut_ptr(), buf.len() as c_int);
        assert_eq!(5, len);
        assert_eq!(0, buf[3]);
    }
}
