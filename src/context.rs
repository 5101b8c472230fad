//! Context / dispatcher: the per-session state machine every frontend
//! key event is driven through.
//!
//! One [`Context`] per input focus. Construction pulls whatever bundled
//! dictionaries [`Library::init`] managed to load; a `Context` still works
//! with none of them loaded, just producing no candidates.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Arc;

use crate::candidate::{Candidate, CandidateModel};
use crate::conversion::{ConversionEngine, DpConversionEngine, TreeConversionEngine};
use crate::dictionary::{Dictionary, Phrase};
use crate::editor::intcode::{CodePage, IntcodeEditor, IntcodeOutcome};
use crate::editor::keymap::{KeyCode, KeyEvent};
use crate::editor::layout::{new_syllable_editor, Layout};
use crate::editor::pho::{PhoEngine, PhoOutcome};
use crate::editor::tsin::{TsinEngine, TsinOutcome, TsinSelection};
use crate::gtab::{GtabEditor, GtabTable, SpaceStyle};
use crate::library::{Library, SharedDict};
use crate::method::Method;
use crate::punctuation::PunctuationState;
use crate::registry::GtabId;
use crate::script_variant::{self, Charset, OutputVariant};
use crate::zhuyin::Syllable;

/// Result of [`Context::process_key`]/[`Context::select_candidate`]. Numeric values are part of the stable C ABI and must not
/// be renumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum KeyResult {
    Ignored = 0,
    Absorbed = 1,
    Commit = 2,
    Preedit = 3,
}

/// Bitflags for the `mods` parameter of `process_key`.
pub mod modifier {
    pub const SHIFT: u32 = 1;
    pub const CONTROL: u32 = 2;
    pub const ALT: u32 = 4;
    pub const CAPSLOCK: u32 = 8;
}

/// Non-printable key identities carried in `process_key`'s `keycode`
/// parameter; printable keys are identified by `charcode` instead. The exact
/// split is left up to the binding; this is this crate's resolution of that
/// choice (see DESIGN.md).
pub mod keycode {
    pub const NONE: u32 = 0;
    pub const BACKSPACE: u32 = 0x08;
    pub const TAB: u32 = 0x09;
    pub const ENTER: u32 = 0x0D;
    pub const ESCAPE: u32 = 0x1B;
    pub const SPACE: u32 = 0x20;
    pub const DELETE: u32 = 0x7F;
    pub const LEFT: u32 = 0x1001;
    pub const RIGHT: u32 = 0x1002;
    pub const UP: u32 = 0x1003;
    pub const DOWN: u32 = 0x1004;
    pub const PAGE_UP: u32 = 0x1005;
    pub const PAGE_DOWN: u32 = 0x1006;
    /// Mode-toggle shortcut; the physical binding
    /// (e.g. bare Shift) is a frontend concern, the core just needs a
    /// dedicated keycode to dispatch on.
    pub const TOGGLE_CHINESE_MODE: u32 = 0x1007;
}

/// A hint for the frontend's UI feedback. The callback must not re-enter
/// the [`Context`] that invoked it. Numeric values are part of the stable
/// C ABI and must not be renumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum FeedbackEvent {
    KeyPress = 0,
    Delete = 1,
    Enter = 2,
    Space = 3,
    Candidate = 4,
    ModeChange = 5,
    Error = 6,
}

/// A soft, non-fatal failure observed while processing a key or a
/// configuration call.
/// Retained on [`Context`] for frontends that want more detail than the
/// [`KeyResult`]/bool return values carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    UnknownMethod,
    UnknownLayout,
    GtabNotLoaded,
    GtabLoad(String),
    InvalidIntcode,
}

/// The active engine's substate. `Context::active_method` names which
/// variant is live; the other engines, if ever constructed, are simply
/// dropped on a method switch — there is no "resume where you left off"
/// guarantee across methods.
enum EngineState {
    Pho(PhoEngine),
    Tsin(TsinEngine),
    /// `None` until a GTAB table is loaded with `load_gtab_table`/`_by_id`.
    Gtab(Option<GtabEditor>),
    Intcode(IntcodeEditor),
}

impl std::fmt::Debug for EngineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            EngineState::Pho(_) => "Pho",
            EngineState::Tsin(_) => "Tsin",
            EngineState::Gtab(_) => "Gtab",
            EngineState::Intcode(_) => "Intcode",
        };
        f.write_str(name)
    }
}

/// Outcome of feeding one key to whichever engine is active, translated
/// into the fields [`Context`] needs to update. Carries only owned data so
/// producing one never holds a borrow of the engine that made it.
enum Outcome {
    Ignored,
    Absorbed,
    Preedit(String),
    Candidates(String, Vec<Candidate>),
    Commit(String),
    Error,
}

fn shared_dict_or_empty(dict: Option<Arc<dyn Dictionary + Send + Sync>>) -> Rc<RefCell<dyn Dictionary>> {
    match dict {
        Some(arc) => Rc::new(RefCell::new(SharedDict(arc))),
        None => Rc::new(RefCell::new(HashMap::<Vec<Syllable>, Vec<Phrase>>::new())),
    }
}

/// Builds the phrase conversion engine TSIN drives. When the bundled phrase
/// table failed to load, falls back to a per-syllable best-word lookup
/// against the phonetic table instead of producing no candidates at all.
fn build_conversion_engine() -> Box<dyn ConversionEngine> {
    let library = Library::get();
    if let Some(tsin_dict) = library.and_then(Library::tsin_dict) {
        return Box::new(DpConversionEngine::new(Rc::new(RefCell::new(SharedDict(tsin_dict)))));
    }
    let fallback = shared_dict_or_empty(library.and_then(Library::pho_dict));
    Box::new(TreeConversionEngine::new(fallback))
}

fn feed_pho(engine: &mut PhoEngine, keycode: u32, charcode: u32) -> Outcome {
    if keycode == keycode::BACKSPACE {
        return match engine.backspace() {
            PhoOutcome::Ignored => Outcome::Ignored,
            PhoOutcome::Preedit(text) => Outcome::Preedit(text),
            PhoOutcome::Candidates(candidates) => Outcome::Candidates(engine.preedit(), candidates),
        };
    }
    if keycode == keycode::ESCAPE {
        if engine.is_empty() {
            return Outcome::Ignored;
        }
        engine.escape();
        return Outcome::Absorbed;
    }
    let Some(code) = KeyCode::from_ascii(charcode as u8) else {
        return Outcome::Ignored;
    };
    match engine.feed(KeyEvent::new(code)) {
        PhoOutcome::Ignored => Outcome::Ignored,
        PhoOutcome::Preedit(text) => Outcome::Preedit(text),
        PhoOutcome::Candidates(candidates) => Outcome::Candidates(String::new(), candidates),
    }
}

fn feed_tsin(engine: &mut TsinEngine, keycode: u32, charcode: u32) -> Outcome {
    if keycode == keycode::BACKSPACE {
        return match engine.backspace() {
            TsinOutcome::Ignored => Outcome::Ignored,
            TsinOutcome::Preedit(text) => Outcome::Preedit(text),
            TsinOutcome::Candidates(candidates) => Outcome::Candidates(engine.preedit(), candidates),
        };
    }
    if keycode == keycode::ESCAPE {
        if engine.is_empty() {
            return Outcome::Ignored;
        }
        engine.escape();
        return Outcome::Absorbed;
    }
    if keycode == keycode::ENTER {
        if engine.is_empty() {
            return Outcome::Ignored;
        }
        return Outcome::Commit(engine.commit_defaults());
    }
    let Some(code) = KeyCode::from_ascii(charcode as u8) else {
        return Outcome::Ignored;
    };
    match engine.feed(KeyEvent::new(code)) {
        TsinOutcome::Ignored => Outcome::Ignored,
        TsinOutcome::Preedit(text) => Outcome::Preedit(text),
        TsinOutcome::Candidates(candidates) => Outcome::Candidates(engine.preedit(), candidates),
    }
}

fn gtab_preedit_outcome(editor: &GtabEditor) -> Outcome {
    let preedit = editor.preedit();
    if editor.is_empty() {
        return Outcome::Preedit(preedit);
    }
    let candidates = editor
        .candidates()
        .into_iter()
        .map(|entry| Candidate::new(entry.text_str().to_string()))
        .collect();
    Outcome::Candidates(preedit, candidates)
}

fn feed_gtab(slot: &mut Option<GtabEditor>, keycode: u32, charcode: u32) -> Outcome {
    let Some(editor) = slot else {
        return Outcome::Ignored;
    };
    if keycode == keycode::BACKSPACE {
        if !editor.remove_last() {
            return Outcome::Ignored;
        }
        return gtab_preedit_outcome(editor);
    }
    if keycode == keycode::ESCAPE {
        if editor.is_empty() {
            return Outcome::Ignored;
        }
        editor.clear();
        return Outcome::Absorbed;
    }
    if keycode == keycode::SPACE && editor.table().space_style == SpaceStyle::AutoSelectFirst {
        let Some(first) = editor.candidates().first().map(|e| e.text_str().to_string()) else {
            return Outcome::Ignored;
        };
        editor.clear();
        return Outcome::Commit(first);
    }
    let Some(ch) = char::from_u32(charcode) else {
        return Outcome::Ignored;
    };
    match editor.feed(ch) {
        Ok(()) => gtab_preedit_outcome(editor),
        Err(_) => Outcome::Ignored,
    }
}

fn feed_intcode(editor: &mut IntcodeEditor, keycode: u32, charcode: u32) -> Outcome {
    if keycode == keycode::BACKSPACE {
        if editor.is_empty() {
            return Outcome::Ignored;
        }
        editor.remove_last();
        return Outcome::Preedit(editor.preedit().to_string());
    }
    if keycode == keycode::ESCAPE {
        if editor.is_empty() {
            return Outcome::Ignored;
        }
        editor.clear();
        return Outcome::Absorbed;
    }
    let Some(ch) = char::from_u32(charcode) else {
        return Outcome::Ignored;
    };
    match editor.feed(ch) {
        IntcodeOutcome::Ignored => Outcome::Ignored,
        IntcodeOutcome::Absorbed => Outcome::Absorbed,
        IntcodeOutcome::Commit(c) => Outcome::Commit(c.to_string()),
        IntcodeOutcome::Error => Outcome::Error,
    }
}

/// A single input session. Not `Send`/`Sync`: every
/// operation must run on the thread that owns it; it is single-threaded.
pub struct Context {
    active_method: Method,
    chinese_mode: bool,
    layout: Layout,
    state: EngineState,
    preedit: String,
    commit: String,
    candidates: CandidateModel,
    charset: Charset,
    output_variant: OutputVariant,
    punctuation: PunctuationState,
    smart_punctuation: bool,
    last_error: Option<EngineError>,
    feedback: Option<Box<dyn FnMut(FeedbackEvent)>>,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("active_method", &self.active_method)
            .field("chinese_mode", &self.chinese_mode)
            .field("layout", &self.layout)
            .field("state", &self.state)
            .field("preedit", &self.preedit)
            .field("commit", &self.commit)
            .field("charset", &self.charset)
            .field("output_variant", &self.output_variant)
            .finish_non_exhaustive()
    }
}

impl Default for Context {
    fn default() -> Self {
        Context::new()
    }
}

impl Context {
    /// Builds a fresh PHO context in Chinese mode with the standard layout.
    /// Works with or without [`Library::init`] having run: a missing
    /// dictionary just means no candidates, not a construction failure.
    pub fn new() -> Context {
        let dict = shared_dict_or_empty(Library::get().and_then(Library::pho_dict));
        Context {
            active_method: Method::Pho,
            chinese_mode: true,
            layout: Layout::default(),
            state: EngineState::Pho(PhoEngine::new(new_syllable_editor(Layout::default()), dict)),
            preedit: String::new(),
            commit: String::new(),
            candidates: CandidateModel::new(),
            charset: Charset::default(),
            output_variant: OutputVariant::default(),
            punctuation: PunctuationState::new(),
            smart_punctuation: true,
            last_error: None,
            feedback: None,
        }
    }

    /// Installs the frontend's UI-feedback callback. The
    /// callback must not call back into this `Context`.
    pub fn set_feedback(&mut self, callback: Box<dyn FnMut(FeedbackEvent)>) {
        self.feedback = Some(callback);
    }

    pub fn last_error(&self) -> Option<&EngineError> {
        self.last_error.as_ref()
    }

    fn commit_text(&mut self, text: &str) {
        self.commit = script_variant::apply_output_variant(
            self.charset == Charset::Traditional,
            self.output_variant,
            text,
        );
    }

    fn engine_is_idle(&self) -> bool {
        match &self.state {
            EngineState::Pho(engine) => engine.is_empty(),
            EngineState::Tsin(engine) => engine.is_empty(),
            EngineState::Gtab(editor) => editor.as_ref().map_or(true, GtabEditor::is_empty),
            EngineState::Intcode(editor) => editor.is_empty(),
        }
    }

    fn apply_outcome(&mut self, outcome: Outcome) -> KeyResult {
        match outcome {
            Outcome::Ignored => KeyResult::Ignored,
            Outcome::Absorbed => {
                self.preedit.clear();
                self.candidates.clear();
                KeyResult::Absorbed
            }
            Outcome::Preedit(text) => {
                self.preedit = text;
                self.candidates.clear();
                KeyResult::Preedit
            }
            Outcome::Candidates(preedit, candidates) => {
                self.preedit = preedit;
                self.candidates.set_candidates(candidates);
                KeyResult::Preedit
            }
            Outcome::Commit(text) => {
                self.commit_text(&text);
                self.preedit.clear();
                self.candidates.clear();
                KeyResult::Commit
            }
            Outcome::Error => {
                self.last_error = Some(EngineError::InvalidIntcode);
                if let Some(callback) = &mut self.feedback {
                    callback(FeedbackEvent::Error);
                }
                KeyResult::Absorbed
            }
        }
    }

    fn feed_active_engine(&mut self, keycode: u32, charcode: u32) -> KeyResult {
        let outcome = match &mut self.state {
            EngineState::Pho(engine) => feed_pho(engine, keycode, charcode),
            EngineState::Tsin(engine) => feed_tsin(engine, keycode, charcode),
            EngineState::Gtab(editor) => feed_gtab(editor, keycode, charcode),
            EngineState::Intcode(editor) => feed_intcode(editor, keycode, charcode),
        };
        self.apply_outcome(outcome)
    }

    fn select_candidate_internal(&mut self, idx: usize) -> KeyResult {
        let Some(candidate) = self.candidates.get(idx).cloned() else {
            return KeyResult::Ignored;
        };
        let outcome = match &mut self.state {
            EngineState::Pho(_) => Outcome::Commit(candidate.text),
            EngineState::Tsin(engine) => match engine.select(&candidate) {
                Some(TsinSelection::Done(text)) => Outcome::Commit(text),
                Some(TsinSelection::Partial(next)) => Outcome::Candidates(engine.preedit(), next),
                None => Outcome::Ignored,
            },
            EngineState::Gtab(editor) => {
                if let Some(editor) = editor {
                    editor.clear();
                }
                Outcome::Commit(candidate.text)
            }
            EngineState::Intcode(_) => Outcome::Ignored,
        };
        self.apply_outcome(outcome)
    }

    fn reset_engine_substate(&mut self) {
        match &mut self.state {
            EngineState::Pho(engine) => engine.clear(),
            EngineState::Tsin(engine) => engine.clear(),
            EngineState::Gtab(editor) => {
                if let Some(editor) = editor {
                    editor.clear();
                }
            }
            EngineState::Intcode(editor) => editor.clear(),
        }
        self.preedit.clear();
        self.candidates.clear();
    }

    fn try_candidate_window(&mut self, keycode: u32, charcode: u32) -> Option<KeyResult> {
        if keycode == keycode::PAGE_UP {
            self.candidates.page_up();
            return Some(KeyResult::Absorbed);
        }
        if keycode == keycode::PAGE_DOWN {
            self.candidates.page_down();
            return Some(KeyResult::Absorbed);
        }
        let ch = char::from_u32(charcode)?;
        let idx = self.candidates.index_for_key(ch)?;
        Some(self.select_candidate_internal(idx))
    }

    fn handle_toggle(&mut self) -> KeyResult {
        self.toggle_chinese_mode();
        self.reset_engine_substate();
        if let Some(callback) = &mut self.feedback {
            callback(FeedbackEvent::ModeChange);
        }
        KeyResult::Preedit
    }

    /// The dispatch entry point.
    /// Printable keys go through `charcode`; non-printable ones through
    /// `keycode` (see the [`keycode`] module). `mods` is accepted for API
    /// completeness but no current engine conditions behavior on it.
    pub fn process_key(&mut self, keycode: u32, charcode: u32, _mods: u32) -> KeyResult {
        self.last_error = None;

        if keycode == keycode::TOGGLE_CHINESE_MODE {
            return self.handle_toggle();
        }

        if !self.chinese_mode {
            return KeyResult::Ignored;
        }

        if self.candidates.has_candidates() {
            if let Some(result) = self.try_candidate_window(keycode, charcode) {
                return result;
            }
        }

        let result = self.feed_active_engine(keycode, charcode);

        if result == KeyResult::Ignored && self.smart_punctuation && self.engine_is_idle() {
            if let Some(ch) = char::from_u32(charcode) {
                if let Some(text) = self.punctuation.apply(ch) {
                    let text = text.to_string();
                    self.commit_text(&text);
                    self.preedit.clear();
                    self.candidates.clear();
                    return KeyResult::Commit;
                }
            }
        }

        result
    }

    /// Clears all composition/candidate/commit state; configuration (active
    /// method, layout, charset, selection keys, ...) survives. Calling this twice in a row is equivalent to calling it
    /// once.
    pub fn reset(&mut self) {
        self.reset_engine_substate();
        self.commit.clear();
        self.punctuation.reset();
        self.last_error = None;
    }

    pub fn get_preedit(&self) -> &str {
        &self.preedit
    }

    /// A cursor always at the end of the preedit string: none of this
    /// crate's engines expose a movable insertion point mid-syllable.
    pub fn get_preedit_cursor(&self) -> usize {
        self.preedit.chars().count()
    }

    pub fn get_commit(&self) -> &str {
        &self.commit
    }

    pub fn clear_commit(&mut self) {
        self.commit.clear();
    }

    pub fn has_candidates(&self) -> bool {
        self.candidates.has_candidates()
    }

    pub fn get_candidate_count(&self) -> usize {
        self.candidates.count()
    }

    pub fn get_candidate(&self, idx: usize) -> Option<&str> {
        self.candidates.get(idx).map(|c| c.text.as_str())
    }

    pub fn select_candidate(&mut self, idx: usize) -> KeyResult {
        self.select_candidate_internal(idx)
    }

    pub fn candidate_page_up(&mut self) -> bool {
        self.candidates.page_up()
    }

    pub fn candidate_page_down(&mut self) -> bool {
        self.candidates.page_down()
    }

    pub fn is_chinese_mode(&self) -> bool {
        self.chinese_mode
    }

    pub fn set_chinese_mode(&mut self, on: bool) {
        self.chinese_mode = on;
    }

    pub fn toggle_chinese_mode(&mut self) -> bool {
        self.chinese_mode = !self.chinese_mode;
        self.chinese_mode
    }

    pub fn get_input_method(&self) -> Method {
        self.active_method
    }

    /// The currently loaded GTAB table, if `active_method` is
    /// [`Method::Gtab`] and a table has been loaded. Exposed for frontends
    /// that need lower-level table introspection than the candidate/preedit
    /// surface offers (see `capi/hime-internal`).
    pub fn active_gtab_table(&self) -> Option<&GtabTable> {
        match &self.state {
            EngineState::Gtab(Some(editor)) => Some(editor.table()),
            _ => None,
        }
    }

    /// Switches the active engine, discarding whatever the previous one had
    /// composed. Fails for [`Method::Anthy`]/[`Method::Chewing`], which have
    /// no engine substate in this crate.
    pub fn set_input_method(&mut self, method: Method) -> bool {
        if !method.is_available() {
            self.last_error = Some(EngineError::UnknownMethod);
            return false;
        }
        self.active_method = method;
        self.state = match method {
            Method::Pho => {
                let dict = shared_dict_or_empty(Library::get().and_then(Library::pho_dict));
                EngineState::Pho(PhoEngine::new(new_syllable_editor(self.layout), dict))
            }
            Method::Tsin => EngineState::Tsin(TsinEngine::new(new_syllable_editor(self.layout), build_conversion_engine())),
            Method::Gtab => EngineState::Gtab(None),
            Method::Intcode => EngineState::Intcode(IntcodeEditor::new(CodePage::Unicode)),
            Method::Anthy | Method::Chewing => unreachable!("checked above"),
        };
        self.preedit.clear();
        self.candidates.clear();
        true
    }

    /// Loads `filename` as the active GTAB table and switches to
    /// [`Method::Gtab`].
    pub fn load_gtab_table(&mut self, filename: &str) -> bool {
        let Some(library) = Library::get() else {
            self.last_error = Some(EngineError::GtabNotLoaded);
            return false;
        };
        match library.load_gtab(filename) {
            Ok(table) => {
                self.active_method = Method::Gtab;
                self.state = EngineState::Gtab(Some(GtabEditor::new(table)));
                self.preedit.clear();
                self.candidates.clear();
                true
            }
            Err(err) => {
                self.last_error = Some(EngineError::GtabLoad(err.to_string()));
                false
            }
        }
    }

    /// Same as [`Context::load_gtab_table`], looked up by well-known ID
    /// against the registry.
    pub fn load_gtab_by_id(&mut self, id: GtabId) -> bool {
        let Some(library) = Library::get() else {
            self.last_error = Some(EngineError::GtabNotLoaded);
            return false;
        };
        let filename = (0..library.registry().len())
            .filter_map(|i| library.registry().entry(i))
            .find(|entry| entry.gtab_id == Some(id))
            .and_then(|entry| entry.filename.clone());
        match filename {
            Some(filename) => self.load_gtab_table(&filename),
            None => {
                self.last_error = Some(EngineError::GtabNotLoaded);
                false
            }
        }
    }

    /// Sets the layout used by PHO/TSIN; stored even while GTAB/Intcode is
    /// active so it takes effect on the next switch back.
    pub fn set_keyboard_layout(&mut self, layout: Layout) -> bool {
        self.layout = layout;
        match &mut self.state {
            EngineState::Pho(engine) => engine.set_editor(new_syllable_editor(layout)),
            EngineState::Tsin(engine) => engine.set_editor(new_syllable_editor(layout)),
            EngineState::Gtab(_) | EngineState::Intcode(_) => {}
        }
        self.preedit.clear();
        true
    }

    pub fn set_keyboard_layout_by_name(&mut self, name: &str) -> bool {
        let layout = match name.to_ascii_lowercase().as_str() {
            "standard" => Layout::Standard,
            "hsu" => Layout::Hsu,
            "eten" => Layout::Eten,
            "eten26" => Layout::Eten26,
            "ibm" => Layout::Ibm,
            "pinyin" => Layout::Pinyin,
            "dvorak" => Layout::Dvorak,
            _ => {
                self.last_error = Some(EngineError::UnknownLayout);
                return false;
            }
        };
        self.set_keyboard_layout(layout)
    }

    pub fn set_selection_keys(&mut self, keys: &str) {
        self.candidates.set_selection_keys(keys);
    }

    pub fn set_candidates_per_page(&mut self, n: i32) {
        self.candidates.set_per_page(n);
    }

    pub fn charset(&self) -> Charset {
        self.charset
    }

    pub fn set_charset(&mut self, charset: Charset) {
        self.charset = charset;
    }

    pub fn output_variant(&self) -> OutputVariant {
        self.output_variant
    }

    pub fn set_output_variant(&mut self, variant: OutputVariant) {
        self.output_variant = variant;
    }

    pub fn set_smart_punctuation(&mut self, on: bool) {
        self.smart_punctuation = on;
        if !on {
            self.punctuation.reset();
        }
    }
}

#[cfg(test)]
mod test {
    use std::collections::HashMap;

    use super::*;
    use crate::dictionary::Phrase;
    use crate::{syl, zhuyin::Bopomofo};

    fn dict_with_ma() -> Rc<RefCell<dyn Dictionary>> {
        let mut dict: HashMap<Vec<Syllable>, Vec<Phrase>> = HashMap::new();
        let ma1 = syl![Bopomofo::M, Bopomofo::A, Bopomofo::TONE1];
        dict.insert(vec![ma1], vec![Phrase::new("媽", 100)]);
        Rc::new(RefCell::new(dict))
    }

    fn context_with_ma() -> Context {
        let mut ctx = Context::new();
        ctx.state = EngineState::Pho(PhoEngine::new(new_syllable_editor(Layout::Standard), dict_with_ma()));
        ctx
    }

    #[test]
    fn typing_ma1_then_space_commits_first_candidate() {
        let mut ctx = context_with_ma();
        assert_eq!(KeyResult::Preedit, ctx.process_key(0, b'a' as u32, 0));
        assert_eq!(KeyResult::Preedit, ctx.process_key(0, b'8' as u32, 0));
        assert_eq!(KeyResult::Preedit, ctx.process_key(0, b' ' as u32, 0));
        assert!(ctx.has_candidates());
        assert_eq!(KeyResult::Commit, ctx.process_key(0, b'1' as u32, 0));
        assert_eq!("媽", ctx.get_commit());
    }

    #[test]
    fn english_mode_ignores_printable_keys() {
        let mut ctx = context_with_ma();
        ctx.set_chinese_mode(false);
        assert_eq!(KeyResult::Ignored, ctx.process_key(0, b'a' as u32, 0));
        assert!(ctx.get_preedit().is_empty());
    }

    #[test]
    fn escape_clears_preedit_and_is_absorbed() {
        let mut ctx = context_with_ma();
        ctx.process_key(0, b'a' as u32, 0);
        assert_eq!(KeyResult::Absorbed, ctx.process_key(keycode::ESCAPE, 0, 0));
        assert!(ctx.get_preedit().is_empty());
    }

    #[test]
    fn reset_is_idempotent() {
        let mut ctx = context_with_ma();
        ctx.process_key(0, b'a' as u32, 0);
        ctx.reset();
        let preedit_after_first = ctx.get_preedit().to_string();
        ctx.reset();
        assert_eq!(preedit_after_first, ctx.get_preedit());
    }

    #[test]
    fn unavailable_method_is_rejected() {
        let mut ctx = Context::new();
        assert!(!ctx.set_input_method(Method::Anthy));
        assert_eq!(Method::Pho, ctx.get_input_method());
    }
}
