//! GTAB binary table decoder and lookup engine
//!
//! Parses HIME's on-disk table-based input method format (`*.gtab`): a
//! packed, variable-bit radical encoding with a quick-key acceleration
//! block, and performs exact/prefix/wildcard queries against it.
//!
//! File layout (little-endian throughout, see spec's data model):
//!
//! ```text
//! offset 0   : header (version, flag, cname, selkey, space_style,
//!                      key_count, max_press, dup_sel, def_chars)
//! offset 64  : QUICK_KEYS block (86480 bytes)
//! offset Q   : header_tail (128 bytes), byte 99 = keybits
//! offset Q+128    : keymap (key_count bytes)
//! offset Q+128+K  : keynames (key_count * 4 bytes)
//! offset ...       : index table ((key_count+1) * 4 bytes)
//! offset ...       : entries (def_chars * 8 bytes, or 12 if key64)
//! ```

use std::io::Read;
use std::path::Path;

use binary_layout::prelude::*;
use thiserror::Error;
use tracing::instrument;

const QUICK_KEYS_LEN: usize = 86480;
const HEADER_TAIL_LEN: usize = 128;
const KEYBITS_OFFSET_IN_TAIL: usize = 99;

define_layout!(gtab_header, LittleEndian, {
    version: i32,
    flag: u32,
    cname: [u8; 32],
    selkey: [u8; 12],
    space_style: i32,
    key_count: i32,
    max_press: i32,
    dup_sel: i32,
    def_chars: i32,
});

const HEADER_LEN: usize = 64;

#[derive(Error, Debug)]
pub enum GtabError {
    #[error("I/O error loading gtab table")]
    Io(#[from] std::io::Error),
    #[error("malformed gtab header")]
    MalformedHeader,
    #[error("file size does not match the size computed from the header")]
    SizeMismatch,
    #[error("key width implied by max_press * keybits is unsupported")]
    UnsupportedKeyWidth,
}

/// Whether a search should auto-select the first candidate on Space, or
/// only open the candidate window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpaceStyle {
    OpenSymbolTable,
    AutoSelectFirst,
}

/// A single packed-key -> UTF-8 character mapping, file order preserved.
#[derive(Debug, Clone, Copy)]
pub struct GtabEntry {
    pub key: u64,
    pub text: [u8; 4],
}

impl GtabEntry {
    pub fn text_str(&self) -> &str {
        let len = self
            .text
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(self.text.len());
        std::str::from_utf8(&self.text[..len]).unwrap_or("")
    }
}

/// A radical or wildcard typed while composing a GTAB query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadicalInput {
    Index(u32),
    /// `?` — matches any single radical.
    AnySingle,
    /// `*` — matches any zero-or-more tail; truncates the query.
    AnyTail,
}

/// An in-memory, immutable GTAB table, shared across contexts after load.
#[derive(Debug)]
pub struct GtabTable {
    pub name: String,
    pub filename: String,
    pub key_count: u32,
    pub max_keystrokes: u32,
    pub keybits: u32,
    pub dup_sel: bool,
    pub space_style: SpaceStyle,
    pub selection_keys: String,
    keymap: Vec<u8>,
    index_table: Vec<u32>,
    entries: Vec<GtabEntry>,
    key64: bool,
}

impl GtabTable {
    #[instrument(skip(data), fields(len = data.len()))]
    fn parse(data: &[u8], filename: &str) -> Result<GtabTable, GtabError> {
        if data.len() < HEADER_LEN + QUICK_KEYS_LEN + HEADER_TAIL_LEN {
            tracing::warn!("gtab file too small for fixed header region");
            return Err(GtabError::SizeMismatch);
        }

        let header = gtab_header::View::new(&data[..HEADER_LEN]);
        let key_count = header.key_count().read();
        let max_press = header.max_press().read();
        let dup_sel = header.dup_sel().read();
        let def_chars = header.def_chars().read();
        let space_style_raw = header.space_style().read();

        if key_count <= 0 || key_count as u64 > 64 || max_press <= 0 || def_chars < 0 {
            return Err(GtabError::MalformedHeader);
        }
        let key_count = key_count as u32;
        let max_press = max_press as u32;
        let def_chars = def_chars as u32;

        let cname = cstr_to_string(header.cname().into_slice());
        let selkey = cstr_to_string(header.selkey().into_slice());

        let tail_start = HEADER_LEN + QUICK_KEYS_LEN;
        let tail = &data[tail_start..tail_start + HEADER_TAIL_LEN];
        let keybits = tail[KEYBITS_OFFSET_IN_TAIL] as u32;
        if keybits == 0 || keybits as u64 > 32 {
            return Err(GtabError::MalformedHeader);
        }

        let entry_key_width = max_press as u64 * keybits as u64;
        let key64 = match entry_key_width {
            w if w <= 32 => false,
            w if w <= 64 => true,
            _ => return Err(GtabError::UnsupportedKeyWidth),
        };
        let entry_size: usize = if key64 { 12 } else { 8 };

        let keymap_start = tail_start + HEADER_TAIL_LEN;
        let keynames_start = keymap_start + key_count as usize;
        let index_start = keynames_start + key_count as usize * 4;
        let index_len = (key_count as usize + 1) * 4;
        let entries_start = index_start + index_len;
        let entries_len = def_chars as usize * entry_size;

        if data.len() < entries_start + entries_len {
            return Err(GtabError::SizeMismatch);
        }

        let keymap = data[keymap_start..keymap_start + key_count as usize].to_vec();

        let index_table = data[index_start..index_start + index_len]
            .chunks_exact(4)
            .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect();

        let entry_bytes = &data[entries_start..entries_start + entries_len];
        let mut entries = Vec::with_capacity(def_chars as usize);
        for chunk in entry_bytes.chunks_exact(entry_size) {
            let key = if key64 {
                u64::from_le_bytes([
                    chunk[0], chunk[1], chunk[2], chunk[3], chunk[4], chunk[5], chunk[6], chunk[7],
                ])
            } else {
                u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]) as u64
            };
            let text_off = if key64 { 8 } else { 4 };
            let mut text = [0u8; 4];
            text.copy_from_slice(&chunk[text_off..text_off + 4]);
            entries.push(GtabEntry { key, text });
        }
        // entries are expected sorted ascending by packed key (spec's data
        // model); tables that violate this still search correctly via the
        // index table, just without the ascending-order optimization.

        Ok(GtabTable {
            name: cname,
            filename: filename.to_string(),
            key_count,
            max_keystrokes: max_press,
            keybits,
            dup_sel: dup_sel != 0,
            space_style: if space_style_raw == 0 {
                SpaceStyle::OpenSymbolTable
            } else {
                SpaceStyle::AutoSelectFirst
            },
            selection_keys: if selkey.is_empty() {
                "1234567890".to_string()
            } else {
                selkey
            },
            keymap,
            index_table,
            entries,
            key64,
        })
    }

    pub fn load_from_reader<R: Read>(mut reader: R, filename: &str) -> Result<GtabTable, GtabError> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::parse(&data, filename)
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<GtabTable, GtabError> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        let filename = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::parse(&data, &filename)
    }

    /// Radical index -> ASCII key character.
    pub fn radical_char(&self, index: u32) -> Option<u8> {
        self.keymap.get(index as usize).copied()
    }

    /// ASCII key character -> radical index.
    pub fn char_radical(&self, c: u8) -> Option<u32> {
        self.keymap.iter().position(|&k| k == c).map(|i| i as u32)
    }

    /// Total number of packed-key -> character mappings in the table.
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Raw on-disk-order access to one entry, for frontends that want to
    /// enumerate a whole table rather than query it (e.g. a table browser).
    pub fn entry_at(&self, idx: usize) -> Option<&GtabEntry> {
        self.entries.get(idx)
    }

    fn mask(&self) -> u64 {
        if self.key64 {
            u64::MAX
        } else {
            u32::MAX as u64
        }
    }

    /// Encodes a typed radical sequence (no wildcards) into a search key,
    /// MSB-first: the first-typed radical occupies the highest bits.
    pub fn encode(&self, radicals: &[u32]) -> u64 {
        let mut key: u64 = 0;
        for &r in radicals {
            key = (key << self.keybits) | r as u64;
        }
        key <<= (self.max_keystrokes as usize - radicals.len()) as u32 * self.keybits;
        key & self.mask()
    }

    fn key_prefix(&self, entry_key: u64, len: usize) -> u64 {
        (entry_key >> ((self.max_keystrokes as usize - len) as u32 * self.keybits)) & self.mask()
    }

    /// Searches for entries whose radical prefix matches `radicals`.
    ///
    /// Exact matches (full key equality) are returned first, then prefix
    /// matches, each group preserving on-disk (frequency) order. A `*` at
    /// any position truncates the query to the fixed prefix before it and
    /// performs a pure prefix scan; `?` matches any single radical via
    /// a dynamic linear scan rather than the leading-radical index.
    pub fn search(&self, radicals: &[RadicalInput]) -> Vec<&GtabEntry> {
        if radicals.is_empty() {
            return Vec::new();
        }

        let fixed_len = radicals
            .iter()
            .position(|r| matches!(r, RadicalInput::AnyTail))
            .unwrap_or(radicals.len());
        let fixed = &radicals[..fixed_len];

        let has_wildcard = fixed.iter().any(|r| matches!(r, RadicalInput::AnySingle));

        let candidates: Box<dyn Iterator<Item = &GtabEntry>> = if has_wildcard || fixed.is_empty() {
            Box::new(self.entries.iter())
        } else {
            let leading = match fixed[0] {
                RadicalInput::Index(i) => i as usize,
                _ => unreachable!(),
            };
            let start = *self.index_table.get(leading).unwrap_or(&0) as usize;
            let end = *self
                .index_table
                .get(leading + 1)
                .unwrap_or(&(self.entries.len() as u32)) as usize;
            Box::new(self.entries[start.min(self.entries.len())..end.min(self.entries.len())].iter())
        };

        let fixed_indices: Option<Vec<u32>> = if has_wildcard {
            None
        } else {
            Some(
                fixed
                    .iter()
                    .map(|r| match r {
                        RadicalInput::Index(i) => *i,
                        _ => unreachable!(),
                    })
                    .collect(),
            )
        };
        let exact_key = fixed_indices.as_deref().map(|idx| self.encode(idx) & self.mask());

        let mut exact = Vec::new();
        let mut prefix = Vec::new();
        for entry in candidates {
            if !radical_matches(fixed, entry.key, self.max_keystrokes, self.keybits, self.mask()) {
                continue;
            }
            if exact_key == Some(entry.key & self.mask()) {
                exact.push(entry);
            } else {
                prefix.push(entry);
            }
        }
        exact.extend(prefix);
        exact
    }
}

fn radical_matches(fixed: &[RadicalInput], entry_key: u64, max_press: u32, keybits: u32, mask: u64) -> bool {
    for (i, r) in fixed.iter().enumerate() {
        let shift = (max_press as usize - 1 - i) as u32 * keybits;
        let radical = (entry_key >> shift) & ((1u64 << keybits) - 1) & mask;
        match r {
            RadicalInput::Index(expect) => {
                if radical != *expect as u64 {
                    return false;
                }
            }
            RadicalInput::AnySingle => {}
            RadicalInput::AnyTail => unreachable!("AnyTail truncates fixed before this point"),
        }
    }
    true
}

fn cstr_to_string(bytes: &[u8]) -> String {
    let len = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..len]).into_owned()
}

/// A key typed while composing a GTAB query could not be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GtabFeedError {
    /// The table's `max_keystrokes` radical slots are already full.
    BufferFull,
    /// `c` is not a radical in this table's `keymap` and not `?`/`*`.
    NotARadical,
}

/// Stateful front-end over a loaded [`GtabTable`]: accumulates the radicals
/// typed so far and re-searches on every key. One per [`crate::context::Context`] with an active GTAB
/// method; the table itself is shared, immutable, process-wide data.
#[derive(Debug, Clone)]
pub struct GtabEditor {
    table: std::sync::Arc<GtabTable>,
    radicals: Vec<RadicalInput>,
}

impl GtabEditor {
    pub fn new(table: std::sync::Arc<GtabTable>) -> GtabEditor {
        GtabEditor {
            table,
            radicals: Vec::new(),
        }
    }

    pub fn table(&self) -> &GtabTable {
        &self.table
    }

    pub fn is_empty(&self) -> bool {
        self.radicals.is_empty()
    }

    pub fn clear(&mut self) {
        self.radicals.clear();
    }

    /// Drops the most recently typed radical; returns whether anything was
    /// removed.
    pub fn remove_last(&mut self) -> bool {
        self.radicals.pop().is_some()
    }

    /// The radicals typed so far, rendered back through the table's keymap
    /// (and `?`/`*` literally for wildcards) — the GTAB preedit string.
    pub fn preedit(&self) -> String {
        self.radicals
            .iter()
            .map(|r| match r {
                RadicalInput::Index(i) => self
                    .table
                    .radical_char(*i)
                    .map(|c| c as char)
                    .unwrap_or('?'),
                RadicalInput::AnySingle => '?',
                RadicalInput::AnyTail => '*',
            })
            .collect()
    }

    /// Feeds one typed key. `?`/`*` are accepted as wildcards; any other
    /// character must be a radical in the table's keymap.
    pub fn feed(&mut self, c: char) -> Result<(), GtabFeedError> {
        if self.radicals.len() >= self.table.max_keystrokes as usize {
            return Err(GtabFeedError::BufferFull);
        }
        let input = match c {
            '?' => RadicalInput::AnySingle,
            '*' => RadicalInput::AnyTail,
            _ => {
                let index = self
                    .table
                    .char_radical(c as u8)
                    .ok_or(GtabFeedError::NotARadical)?;
                RadicalInput::Index(index)
            }
        };
        self.radicals.push(input);
        Ok(())
    }

    /// Entries matching the radicals typed so far, in the table's ranked
    /// order.
    pub fn candidates(&self) -> Vec<&GtabEntry> {
        self.table.search(&self.radicals)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn build_test_table(entries: &[(u32, &str)]) -> Vec<u8> {
        // key_count = 4 radicals (a, b, c, d), keybits = ceil(log2(5)) = 3,
        // max_press = 2, so entry key width = 6 bits, fits in 32 bits.
        let key_count: i32 = 4;
        let max_press: i32 = 2;
        let def_chars = entries.len() as i32;

        let mut data = vec![0u8; HEADER_LEN];
        {
            let mut header = gtab_header::View::new(&mut data[..]);
            header.version_mut().write(1);
            header.flag_mut().write(0);
            header.space_style_mut().write(0);
            header.key_count_mut().write(key_count);
            header.max_press_mut().write(max_press);
            header.dup_sel_mut().write(0);
            header.def_chars_mut().write(def_chars);
        }
        data.extend(std::iter::repeat(0u8).take(QUICK_KEYS_LEN));
        let mut tail = vec![0u8; HEADER_TAIL_LEN];
        tail[KEYBITS_OFFSET_IN_TAIL] = 3;
        data.extend(tail);
        data.extend(b"abcd"); // keymap
        data.extend(std::iter::repeat(0u8).take(key_count as usize * 4)); // keynames
        data.extend(std::iter::repeat(0u8).take((key_count as usize + 1) * 4)); // index table (unused by this test's linear fallback path)
        for (key, text) in entries {
            data.extend_from_slice(&key.to_le_bytes());
            let mut text_bytes = [0u8; 4];
            let bytes = text.as_bytes();
            text_bytes[..bytes.len()].copy_from_slice(bytes);
            data.extend_from_slice(&text_bytes);
        }
        data
    }

    #[test]
    fn rejects_truncated_file() {
        let data = vec![0u8; 10];
        let err = GtabTable::parse(&data, "test.gtab").unwrap_err();
        assert!(matches!(err, GtabError::SizeMismatch));
    }

    #[test]
    fn parses_minimal_table() {
        // radical 'a'=0, 'b'=1 -> key = (0<<3)|1 = 1
        let data = build_test_table(&[(1, "字")]);
        let table = GtabTable::parse(&data, "test.gtab").unwrap();
        assert_eq!(table.key_count, 4);
        assert_eq!(table.max_keystrokes, 2);
        assert_eq!(table.keybits, 3);
        assert_eq!(table.char_radical(b'a'), Some(0));
        assert_eq!(table.char_radical(b'b'), Some(1));
    }

    #[test]
    fn encode_matches_entry_key() {
        let data = build_test_table(&[(1, "字")]);
        let table = GtabTable::parse(&data, "test.gtab").unwrap();
        // typed "a" then "b": a=0, b=1
        let key = table.encode(&[0, 1]);
        assert_eq!(key, 1);
    }

    #[test]
    fn search_finds_exact_match() {
        let data = build_test_table(&[(1, "字")]);
        let table = GtabTable::parse(&data, "test.gtab").unwrap();
        let results = table.search(&[RadicalInput::Index(0), RadicalInput::Index(1)]);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].text_str(), "字");
    }

    #[test]
    fn search_ranks_zero_padded_short_key_as_exact() {
        // Entry "單" is reachable with a single keystroke ('a' = radical 0);
        // its on-disk key is zero-padded to the full two-radical width.
        // "字" needs both keystrokes and shares the same leading radical.
        let data = build_test_table(&[(0, "單"), (1, "字")]);
        let table = GtabTable::parse(&data, "test.gtab").unwrap();
        let results = table.search(&[RadicalInput::Index(0)]);
        assert_eq!(results[0].text_str(), "單");
    }

    #[test]
    fn search_wildcard_tail_is_prefix_scan() {
        let data = build_test_table(&[(1, "字"), (2, "詞")]);
        let table = GtabTable::parse(&data, "test.gtab").unwrap();
        let results = table.search(&[RadicalInput::Index(0), RadicalInput::AnyTail]);
        assert_eq!(results.len(), 2);
    }
}
