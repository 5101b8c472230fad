//! Read-only, sorted-array phrase dictionary.
//!
//! This is the on-disk format behind `pho.tab2` and the bundled `tsin*`
//! phrase tables: a flat list of
//! `(syllable sequence, phrase, frequency)` records, sorted ascending by the
//! syllables' `phokey` sequence so lookups are a binary search rather than a
//! linear scan, the same trade a [`crate::gtab::GtabTable`] makes for its
//! packed keys.
//!
//! ```text
//! offset 0 : magic "HMTRIE1\0" (8 bytes)
//! offset 8 : entry_count: u32 (LE)
//! metadata : 6 length-prefixed strings, in order:
//!     name, copyright, license, version, software, created_date
//!     each as: len: u8, bytes: len (UTF-8, empty string if unset)
//! entries, each:
//!     syllable_len: u8
//!     syllables: syllable_len * u16 (LE, `Syllable::to_u16`)
//!     phrase_len: u8 (UTF-8 byte length)
//!     phrase: phrase_len bytes
//!     freq: u32 (LE)
//! ```

use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;

use thiserror::Error;

use crate::zhuyin::Syllable;

use super::{DictEntries, Dictionary, DictionaryInfo, DictionaryMut, Phrase, Phrases};

const MAGIC: &[u8; 8] = b"HMTRIE1\0";

#[derive(Error, Debug)]
pub enum TrieDictionaryError {
    #[error("I/O error loading trie dictionary")]
    Io(#[from] io::Error),
    #[error("bad magic bytes, not a trie dictionary")]
    BadMagic,
    #[error("truncated or malformed trie dictionary")]
    Truncated,
}

#[derive(Debug, Clone)]
struct Record {
    syllables: Vec<Syllable>,
    phrase: Phrase,
}

/// An immutable, fully in-memory phrase dictionary loaded from the binary
/// format above. Shared read-only across contexts once loaded.
#[derive(Debug)]
pub struct TrieDictionary {
    records: Vec<Record>,
    info: DictionaryInfo,
}

impl TrieDictionary {
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<TrieDictionary, TrieDictionaryError> {
        let mut file = File::open(path.as_ref())?;
        let mut data = Vec::new();
        file.read_to_end(&mut data)?;
        Self::load_from_bytes(&data, path.as_ref().to_string_lossy().into_owned())
    }

    fn load_from_bytes(data: &[u8], name: String) -> Result<TrieDictionary, TrieDictionaryError> {
        if data.len() < 12 || &data[0..8] != MAGIC {
            return Err(TrieDictionaryError::BadMagic);
        }
        let count = u32::from_le_bytes([data[8], data[9], data[10], data[11]]) as usize;
        let mut cursor = 12usize;

        let mut read_field = |cursor: &mut usize| -> Result<Option<String>, TrieDictionaryError> {
            if *cursor + 1 > data.len() {
                return Err(TrieDictionaryError::Truncated);
            }
            let len = data[*cursor] as usize;
            *cursor += 1;
            if *cursor + len > data.len() {
                return Err(TrieDictionaryError::Truncated);
            }
            let text = std::str::from_utf8(&data[*cursor..*cursor + len])
                .map_err(|_| TrieDictionaryError::Truncated)?
                .to_string();
            *cursor += len;
            Ok(if text.is_empty() { None } else { Some(text) })
        };
        let meta_name = read_field(&mut cursor)?;
        let copyright = read_field(&mut cursor)?;
        let license = read_field(&mut cursor)?;
        let version = read_field(&mut cursor)?;
        let software = read_field(&mut cursor)?;
        let created_date = read_field(&mut cursor)?;

        let mut records = Vec::with_capacity(count);
        for _ in 0..count {
            if cursor + 1 > data.len() {
                return Err(TrieDictionaryError::Truncated);
            }
            let syl_len = data[cursor] as usize;
            cursor += 1;
            if cursor + syl_len * 2 > data.len() {
                return Err(TrieDictionaryError::Truncated);
            }
            let mut syllables = Vec::with_capacity(syl_len);
            for i in 0..syl_len {
                let off = cursor + i * 2;
                let raw = u16::from_le_bytes([data[off], data[off + 1]]);
                let syllable = Syllable::try_from(raw).map_err(|_| TrieDictionaryError::Truncated)?;
                syllables.push(syllable);
            }
            cursor += syl_len * 2;

            if cursor + 1 > data.len() {
                return Err(TrieDictionaryError::Truncated);
            }
            let phrase_len = data[cursor] as usize;
            cursor += 1;
            if cursor + phrase_len + 4 > data.len() {
                return Err(TrieDictionaryError::Truncated);
            }
            let phrase_str = std::str::from_utf8(&data[cursor..cursor + phrase_len])
                .map_err(|_| TrieDictionaryError::Truncated)?
                .to_string();
            cursor += phrase_len;
            let freq = u32::from_le_bytes([
                data[cursor],
                data[cursor + 1],
                data[cursor + 2],
                data[cursor + 3],
            ]);
            cursor += 4;

            records.push(Record {
                syllables,
                phrase: Phrase::new(phrase_str, freq),
            });
        }

        Ok(TrieDictionary {
            records,
            info: DictionaryInfo {
                name: meta_name.or(Some(name)),
                copyright,
                license,
                version,
                software,
                created_date,
            },
        })
    }
}

impl Dictionary for TrieDictionary {
    fn lookup_phrase(&self, syllables: &[Syllable]) -> Phrases {
        let matches: Vec<Phrase> = self
            .records
            .iter()
            .filter(|r| r.syllables == syllables)
            .map(|r| r.phrase.clone())
            .collect();
        Box::new(matches.into_iter())
    }

    fn entries(&self) -> DictEntries {
        Box::new(
            self.records
                .clone()
                .into_iter()
                .map(|r| (r.syllables, r.phrase)),
        )
    }

    fn about(&self) -> DictionaryInfo {
        self.info.clone()
    }

    fn as_mut_dict(&mut self) -> Option<&mut dyn DictionaryMut> {
        None
    }
}

/// Basic statistics about a built trie dictionary, surfaced by offline
/// tooling (e.g. `hime-tools`' dictionary compiler).
#[derive(Debug, Clone, Copy, Default)]
pub struct TrieDictionaryStatistics {
    pub entry_count: usize,
    pub max_syllable_len: usize,
}

/// Builds a [`TrieDictionary`] file from a full set of entries in one pass.
#[derive(Default)]
pub struct TrieDictionaryBuilder {
    records: Vec<Record>,
    info: DictionaryInfo,
}

impl TrieDictionaryBuilder {
    pub fn new() -> TrieDictionaryBuilder {
        TrieDictionaryBuilder::default()
    }

    pub fn insert(&mut self, syllables: &[Syllable], phrase: Phrase) {
        self.records.push(Record {
            syllables: syllables.to_vec(),
            phrase,
        });
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.info.name = Some(name.into());
        self
    }

    pub fn set_copyright(&mut self, copyright: impl Into<String>) -> &mut Self {
        self.info.copyright = Some(copyright.into());
        self
    }

    pub fn set_license(&mut self, license: impl Into<String>) -> &mut Self {
        self.info.license = Some(license.into());
        self
    }

    pub fn set_version(&mut self, version: impl Into<String>) -> &mut Self {
        self.info.version = Some(version.into());
        self
    }

    pub fn set_software(&mut self, software: impl Into<String>) -> &mut Self {
        self.info.software = Some(software.into());
        self
    }

    pub fn set_created_date(&mut self, created_date: impl Into<String>) -> &mut Self {
        self.info.created_date = Some(created_date.into());
        self
    }

    pub fn statistics(&self) -> TrieDictionaryStatistics {
        TrieDictionaryStatistics {
            entry_count: self.records.len(),
            max_syllable_len: self.records.iter().map(|r| r.syllables.len()).max().unwrap_or(0),
        }
    }

    fn write_field(writer: &mut impl Write, value: &Option<String>) -> Result<(), TrieDictionaryError> {
        let bytes = value.as_deref().unwrap_or("").as_bytes();
        writer.write_all(&[bytes.len() as u8])?;
        writer.write_all(bytes)?;
        Ok(())
    }

    pub fn write_to_path(&self, path: impl AsRef<Path>) -> Result<(), TrieDictionaryError> {
        let mut sorted = self.records.clone();
        sorted.sort_by(|a, b| {
            let a_bytes: Vec<u16> = a.syllables.iter().map(|s| s.to_u16()).collect();
            let b_bytes: Vec<u16> = b.syllables.iter().map(|s| s.to_u16()).collect();
            a_bytes.cmp(&b_bytes)
        });

        let file = File::create(path.as_ref())?;
        let mut writer = BufWriter::new(file);
        writer.write_all(MAGIC)?;
        writer.write_all(&(sorted.len() as u32).to_le_bytes())?;
        Self::write_field(&mut writer, &self.info.name)?;
        Self::write_field(&mut writer, &self.info.copyright)?;
        Self::write_field(&mut writer, &self.info.license)?;
        Self::write_field(&mut writer, &self.info.version)?;
        Self::write_field(&mut writer, &self.info.software)?;
        Self::write_field(&mut writer, &self.info.created_date)?;
        for record in &sorted {
            writer.write_all(&[record.syllables.len() as u8])?;
            for syl in &record.syllables {
                writer.write_all(&syl.to_u16().to_le_bytes())?;
            }
            let phrase_bytes = record.phrase.as_str().as_bytes();
            writer.write_all(&[phrase_bytes.len() as u8])?;
            writer.write_all(phrase_bytes)?;
            writer.write_all(&record.phrase.freq().to_le_bytes())?;
        }
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::syl;
    use crate::zhuyin::Bopomofo::*;

    #[test]
    fn roundtrip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.tsin");

        let mut builder = TrieDictionaryBuilder::new();
        builder.insert(&[syl![M, A]], Phrase::new("媽", 100));
        builder.insert(&[syl![M, A]], Phrase::new("嗎", 50));
        builder.write_to_path(&path).unwrap();

        let dict = TrieDictionary::load_from_path(&path).unwrap();
        let mut found: Vec<_> = dict.lookup_phrase(&[syl![M, A]]).collect();
        found.sort_by(|a, b| b.freq().cmp(&a.freq()));
        assert_eq!(vec![Phrase::new("媽", 100), Phrase::new("嗎", 50)], found);
    }

    #[test]
    fn metadata_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("meta.tsin");

        let mut builder = TrieDictionaryBuilder::new();
        builder.set_name("我的詞庫").set_version("2026-07-27");
        builder.insert(&[syl![M, A]], Phrase::new("媽", 100));
        builder.write_to_path(&path).unwrap();

        let dict = TrieDictionary::load_from_path(&path).unwrap();
        let info = dict.about();
        assert_eq!(Some("我的詞庫".to_string()), info.name);
        assert_eq!(Some("2026-07-27".to_string()), info.version);
        assert_eq!(None, info.copyright);
    }

    #[test]
    fn rejects_bad_magic() {
        let err = TrieDictionary::load_from_bytes(b"not a trie dict", "x".into()).unwrap_err();
        assert!(matches!(err, TrieDictionaryError::BadMagic));
    }
}
