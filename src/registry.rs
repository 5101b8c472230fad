//! Method registry & search.
//!
//! A process-global, enumerable catalog of the built-in engines (PHO, TSIN,
//! INTCODE) plus the bundled GTAB tables, built once at `init` and read-only
//! thereafter. `gtab_get_table_info(idx)`/`gtab_load_table_by_id`
//! depend on stable positional indices, so entries are kept in an
//! [`IndexMap`] keyed by a synthetic slug rather than a `HashMap`.

use indexmap::IndexMap;

use crate::method::Method;

/// Well-known GTAB table identifiers.
///
/// Only a handful of well-known IDs are given symbolic constants; the
/// rest of the ~21 bundled tables are numbered in the gaps, recorded in
/// DESIGN.md as an Open-Question decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum GtabId {
    Cj = 0,
    Cj5 = 1,
    CjAlt = 2,
    QuickClassic = 3,
    Simplex = 10,
    SimplexNew = 11,
    Dayi = 20,
    Dayi3 = 21,
    Dayi6 = 22,
    Array30 = 30,
    ArrayCompat = 31,
    Boshiamy = 40,
    BoshiamyCompat = 41,
    PinyinTab = 50,
    Jyutping = 51,
    ZhuyinDachen = 52,
    ZhuyinHsu = 53,
    Hangul = 60,
    Wubi = 61,
    Vims = 70,
    Symbols = 80,
    Custom = 99,
}

impl GtabId {
    pub const fn from_i32(value: i32) -> Option<GtabId> {
        use GtabId::*;
        Some(match value {
            0 => Cj,
            1 => Cj5,
            2 => CjAlt,
            3 => QuickClassic,
            10 => Simplex,
            11 => SimplexNew,
            20 => Dayi,
            21 => Dayi3,
            22 => Dayi6,
            30 => Array30,
            31 => ArrayCompat,
            40 => Boshiamy,
            41 => BoshiamyCompat,
            50 => PinyinTab,
            51 => Jyutping,
            52 => ZhuyinDachen,
            53 => ZhuyinHsu,
            60 => Hangul,
            61 => Wubi,
            70 => Vims,
            80 => Symbols,
            99 => Custom,
            _ => return None,
        })
    }
}

/// One entry in the method registry: a built-in engine or a bundled GTAB
/// table.
#[derive(Debug, Clone)]
pub struct MethodEntry {
    pub name: String,
    pub kind: Method,
    pub gtab_id: Option<GtabId>,
    pub filename: Option<String>,
    pub enabled: bool,
}

impl MethodEntry {
    fn builtin(name: &str, kind: Method) -> MethodEntry {
        MethodEntry {
            name: name.to_string(),
            kind,
            gtab_id: None,
            filename: None,
            enabled: kind.is_available(),
        }
    }

    fn gtab(id: GtabId, name: &str, filename: &str) -> MethodEntry {
        MethodEntry {
            name: name.to_string(),
            kind: Method::Gtab,
            gtab_id: Some(id),
            filename: Some(filename.to_string()),
            enabled: true,
        }
    }
}

/// The ~21 bundled GTAB tables.
const BUNDLED_GTAB_TABLES: &[(GtabId, &str, &str)] = &[
    (GtabId::Cj, "倉頡 Cangjie", "cj.gtab"),
    (GtabId::Cj5, "倉頡五代 Cangjie5", "cj5.gtab"),
    (GtabId::CjAlt, "倉頡(舊版) Cangjie (Old)", "cj-old.gtab"),
    (GtabId::QuickClassic, "速成 Quick (Classic)", "quick-classic.gtab"),
    (GtabId::Simplex, "簡易 Simplex", "simplex.gtab"),
    (GtabId::SimplexNew, "簡易(新版) Simplex (New)", "simplex-new.gtab"),
    (GtabId::Dayi, "大易 DaYi", "dayi.gtab"),
    (GtabId::Dayi3, "大易三碼 DaYi-3", "dayi3.gtab"),
    (GtabId::Dayi6, "大易六碼 DaYi-6", "dayi6.gtab"),
    (GtabId::Array30, "行列30 Array30", "array30.gtab"),
    (GtabId::ArrayCompat, "行列(相容) Array (Compat)", "array-compat.gtab"),
    (GtabId::Boshiamy, "嘸蝦米 Boshiamy", "boshiamy.gtab"),
    (GtabId::BoshiamyCompat, "嘸蝦米(相容) Boshiamy (Compat)", "boshiamy-compat.gtab"),
    (GtabId::PinyinTab, "漢語拼音 Hanyu Pinyin", "pinyin.gtab"),
    (GtabId::Jyutping, "粵語拼音 Jyutping", "jyutping.gtab"),
    (GtabId::ZhuyinDachen, "注音(大千) Zhuyin (Standard)", "zhuyin-dachen.gtab"),
    (GtabId::ZhuyinHsu, "注音(許氏) Zhuyin (Hsu)", "zhuyin-hsu.gtab"),
    (GtabId::Hangul, "諺文 Hangul", "hangul.gtab"),
    (GtabId::Wubi, "五笔 Wubi", "wubi.gtab"),
    (GtabId::Vims, "威妥瑪 Vims", "vims.gtab"),
    (GtabId::Symbols, "特殊符號 Symbols", "symbols.gtab"),
];

/// The process-global, read-only catalog built at `init`.
#[derive(Debug)]
pub struct Registry {
    entries: IndexMap<String, MethodEntry>,
}

impl Registry {
    /// Builds the built-in catalog: PHO, TSIN, INTCODE, the two reserved
    /// stubs, then every bundled GTAB table, in stable ID order.
    pub fn builtin() -> Registry {
        let mut entries = IndexMap::new();
        for (key, entry) in [
            ("pho", MethodEntry::builtin("注音 Phonetic", Method::Pho)),
            ("tsin", MethodEntry::builtin("詞音 Phrase", Method::Tsin)),
            ("intcode", MethodEntry::builtin("內碼 Intcode", Method::Intcode)),
            ("anthy", MethodEntry::builtin("Anthy", Method::Anthy)),
            ("chewing", MethodEntry::builtin("酷音 Chewing", Method::Chewing)),
        ] {
            entries.insert(key.to_string(), entry);
        }
        for &(id, name, filename) in BUNDLED_GTAB_TABLES {
            entries.insert(filename.to_string(), MethodEntry::gtab(id, name, filename));
        }
        Registry { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `gtab_get_table_info`/general positional enumeration.
    pub fn entry(&self, idx: usize) -> Option<&MethodEntry> {
        self.entries.get_index(idx).map(|(_, entry)| entry)
    }

    pub fn find_by_filename(&self, filename: &str) -> Option<(usize, &MethodEntry)> {
        self.entries
            .get_full(filename)
            .map(|(idx, _, entry)| (idx, entry))
    }

    /// `find_method_by_name`: returns the index of the first
    /// entry whose display name matches exactly, case-insensitively.
    pub fn find_by_name(&self, name: &str) -> Option<usize> {
        self.entries
            .values()
            .position(|entry| entry.name.eq_ignore_ascii_case(name))
    }

    /// `search_methods`/`gtab_search_tables`.
    pub fn search(&self, query: &str, method_type: Option<Method>) -> Vec<SearchResult> {
        let mut results: Vec<SearchResult> = self
            .entries
            .values()
            .enumerate()
            .filter(|(_, entry)| method_type.map_or(true, |t| entry.kind == t))
            .filter_map(|(idx, entry)| {
                score_name(&entry.name, query).map(|score| SearchResult {
                    index: idx,
                    name: entry.name.clone(),
                    score,
                })
            })
            .collect();
        // stable sort keeps insertion order within equal scores
        results.sort_by(|a, b| b.score.cmp(&a.score));
        results
    }
}

/// One scored hit from [`Registry::search`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub index: usize,
    pub name: String,
    pub score: i32,
}

/// Scores `name` against `query`. ASCII is matched case-insensitively; CJK
/// substrings must match exactly (Unicode case folding does not apply to
/// Han script). Returns `None` on no match.
fn score_name(name: &str, query: &str) -> Option<i32> {
    if query.is_empty() {
        return Some(0);
    }
    let query_is_ascii = query.is_ascii();
    let (haystack, needle): (String, String) = if query_is_ascii {
        (name.to_lowercase(), query.to_lowercase())
    } else {
        (name.to_string(), query.to_string())
    };

    let pos = haystack.find(&needle)?;
    let mut score = 100;
    if pos == 0 {
        // Prefix bonus scales with how much of the name the query covers.
        score += 50 + (needle.chars().count() as i32) * 5;
    }
    Some(score)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn builtin_registry_has_bundled_gtab_tables() {
        let registry = Registry::builtin();
        assert!(registry.len() > 21);
        let (_, cj) = registry.find_by_filename("cj.gtab").unwrap();
        assert_eq!(Some(GtabId::Cj), cj.gtab_id);
    }

    #[test]
    fn search_prefers_prefix_match() {
        let registry = Registry::builtin();
        let results = registry.search("倉頡", Some(Method::Gtab));
        assert!(!results.is_empty());
        assert!(results[0].name.contains("倉頡"));
        // results are sorted descending by score
        for window in results.windows(2) {
            assert!(window[0].score >= window[1].score);
        }
    }

    #[test]
    fn search_ascii_is_case_insensitive() {
        let registry = Registry::builtin();
        let results = registry.search("CANGJIE", None);
        assert!(results.iter().any(|r| r.name.contains("Cangjie")));
    }

    #[test]
    fn search_reserved_methods_are_disabled() {
        let registry = Registry::builtin();
        let (_, anthy) = registry.find_by_filename("anthy").unwrap();
        assert!(!anthy.enabled);
    }
}
