//! Process-global library state: data directory loading, the method
//! registry, and the process-wide phonetic/phrase dictionaries and GTAB
//! table cache.
//!
//! A process calls [`Library::init`] once against a data directory before
//! creating any [`crate::context::Context`]; loaded tables and the registry
//! are then shared, immutable, read-only data for the rest of the process's
//! life.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};

use thiserror::Error;
use tracing::instrument;

use crate::dictionary::{DictEntries, Dictionary, DictionaryInfo, DictionaryMut, Phrases, TrieDictionary, TrieDictionaryError};
use crate::gtab::{GtabError, GtabTable};
use crate::registry::Registry;
use crate::zhuyin::Syllable;

/// The bundled phonetic table's on-disk filename.
const PHO_TABLE_FILENAME: &str = "pho.tab2";

/// The bundled phrase table's on-disk filename. The `tsin*` file family name
/// doesn't pin down an exact filename; `tsin.tab2` is picked here (same
/// [`TrieDictionary`] format as `pho.tab2`, per that module's own doc
/// comment) and recorded as an Open-Question decision in DESIGN.md.
const TSIN_TABLE_FILENAME: &str = "tsin.tab2";

/// Error returned by [`Library::init`]. Library init failing returns a negative
/// error code; contexts still function but produce no candidates for the
/// affected method.
///
/// The registry and whatever tables *did* load successfully are installed
/// before this is returned, so a caller that ignores the error still gets a
/// partially functional library, matching that sentence literally.
#[derive(Error, Debug)]
pub enum LibraryError {
    #[error("phonetic table unavailable")]
    Pho(#[source] TrieDictionaryError),
}

/// Adapts a process-wide `Arc<dyn Dictionary + Send + Sync>` to the
/// `Rc<RefCell<dyn Dictionary>>` shape [`crate::editor::pho::PhoEngine`],
/// [`crate::editor::tsin::TsinEngine`] and the [`crate::conversion`] engines
/// are built against. `Rc` itself is not `Sync`, so the shared table can't
/// live directly in the [`Library`] singleton as an `Rc`; each `Context`
/// wraps a clone of the `Arc` in its own `Rc<RefCell<_>>` instead.
///
/// Read-only: the underlying table is immutable after load, so
/// [`Dictionary::as_mut_dict`] always returns `None`.
#[derive(Debug, Clone)]
pub struct SharedDict(pub Arc<dyn Dictionary + Send + Sync>);

impl Dictionary for SharedDict {
    fn lookup_phrase(&self, syllables: &[Syllable]) -> Phrases {
        self.0.lookup_phrase(syllables)
    }

    fn entries(&self) -> DictEntries {
        self.0.entries()
    }

    fn about(&self) -> DictionaryInfo {
        self.0.about()
    }

    fn as_mut_dict(&mut self) -> Option<&mut dyn DictionaryMut> {
        None
    }
}

/// The process-global singleton: a read-only [`Registry`] plus whichever bundled
/// dictionaries loaded successfully, and a cache of on-demand-loaded GTAB
/// tables.
#[derive(Debug)]
pub struct Library {
    data_dir: PathBuf,
    registry: Registry,
    pho_dict: Option<Arc<dyn Dictionary + Send + Sync>>,
    tsin_dict: Option<Arc<dyn Dictionary + Send + Sync>>,
    gtab_cache: Mutex<HashMap<String, Arc<GtabTable>>>,
}

static LIBRARY: OnceLock<Library> = OnceLock::new();

impl Library {
    /// Loads the global registry and the bundled dictionaries from
    /// `data_dir`. A second call after a successful first one is a no-op —
    /// there is no API to rebind the singleton to a different directory
    /// without a process restart; the singleton is process-wide and immutable
    /// after load.
    #[instrument(skip(data_dir))]
    pub fn init(data_dir: impl AsRef<Path>) -> Result<(), LibraryError> {
        if LIBRARY.get().is_some() {
            return Ok(());
        }
        let data_dir = data_dir.as_ref().to_path_buf();

        let pho_load_err = match TrieDictionary::load_from_path(data_dir.join(PHO_TABLE_FILENAME)) {
            Ok(dict) => {
                let pho_dict: Option<Arc<dyn Dictionary + Send + Sync>> = Some(Arc::new(dict));
                let tsin_dict = match TrieDictionary::load_from_path(data_dir.join(TSIN_TABLE_FILENAME)) {
                    Ok(dict) => Some(Arc::new(dict) as Arc<dyn Dictionary + Send + Sync>),
                    Err(err) => {
                        tracing::warn!(error = %err, "phrase table unavailable, TSIN candidates disabled");
                        None
                    }
                };
                let library = Library {
                    data_dir,
                    registry: Registry::builtin(),
                    pho_dict,
                    tsin_dict,
                    gtab_cache: Mutex::new(HashMap::new()),
                };
                let _ = LIBRARY.set(library);
                return Ok(());
            }
            Err(err) => err,
        };

        tracing::warn!(error = %pho_load_err, "phonetic table unavailable, PHO candidates disabled");
        let tsin_dict = match TrieDictionary::load_from_path(data_dir.join(TSIN_TABLE_FILENAME)) {
            Ok(dict) => Some(Arc::new(dict) as Arc<dyn Dictionary + Send + Sync>),
            Err(err) => {
                tracing::warn!(error = %err, "phrase table unavailable, TSIN candidates disabled");
                None
            }
        };

        let library = Library {
            data_dir,
            registry: Registry::builtin(),
            pho_dict: None,
            tsin_dict,
            gtab_cache: Mutex::new(HashMap::new()),
        };
        // Lost races just drop their `Library`; the winner's data stands.
        let _ = LIBRARY.set(library);
        Err(LibraryError::Pho(pho_load_err))
    }

    /// Releases the cached GTAB tables. The registry and bundled dictionaries
    /// stay installed: they
    /// are part of the process-singleton identity, not a per-use cache, and
    /// Rust has no way to un-set a [`OnceLock`] short of process exit.
    pub fn cleanup() {
        if let Some(library) = LIBRARY.get() {
            library.gtab_cache.lock().unwrap().clear();
        }
    }

    /// The installed singleton, if [`Library::init`] has run.
    pub fn get() -> Option<&'static Library> {
        LIBRARY.get()
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn pho_dict(&self) -> Option<Arc<dyn Dictionary + Send + Sync>> {
        self.pho_dict.as_ref().map(Arc::clone)
    }

    pub fn tsin_dict(&self) -> Option<Arc<dyn Dictionary + Send + Sync>> {
        self.tsin_dict.as_ref().map(Arc::clone)
    }

    /// Loads (or returns the cached) GTAB table named `filename`, resolved
    /// relative to the library.s data directory. Tables are loaded lazily and
    /// cached per process.
    #[instrument(skip(self))]
    pub fn load_gtab(&self, filename: &str) -> Result<Arc<GtabTable>, GtabError> {
        let mut cache = self.gtab_cache.lock().unwrap();
        if let Some(table) = cache.get(filename) {
            return Ok(Arc::clone(table));
        }
        let table = Arc::new(GtabTable::load_from_path(self.data_dir.join(filename))?);
        cache.insert(filename.to_string(), Arc::clone(&table));
        Ok(table)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn init_without_data_files_still_installs_registry() {
        let dir = tempfile::tempdir().unwrap();
        // First call in the process wins; later test runs in the same
        // process observe whichever directory initialized first, so this
        // only asserts the registry is present, not which directory.
        let _ = Library::init(dir.path());
        let library = Library::get().expect("init always installs the singleton");
        assert!(library.registry().len() > 21);
    }

    #[test]
    fn shared_dict_reports_immutable() {
        let mut dict: std::collections::HashMap<Vec<Syllable>, Vec<crate::dictionary::Phrase>> =
            std::collections::HashMap::new();
        dict.insert(Vec::new(), Vec::new());
        let shared = SharedDict(Arc::new(dict));
        let mut shared = shared;
        assert!(shared.as_mut_dict().is_none());
    }
}
