//! Backing stores: the raw bytes every cell points into
//!
//! Each source file is mapped once and registered in a [`StoreRegistry`].
//! Cells never hold references into a store, only a [`StoreId`] plus an
//! offset/length pair, so a destination table can outlive the parse of any
//! single addend without dangling. The registry is dropped once, when the
//! run is over.

use crate::error::{Error, Result};
use memmap2::Mmap;
use std::fs::File;
use std::ops::Deref;
use std::path::{Path, PathBuf};

/// Handle to a store owned by a [`StoreRegistry`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StoreId(usize);

enum StoreData {
    Mapped(Mmap),
    Owned(Vec<u8>),
}

/// The full contents of one source file
pub struct BackingStore {
    path: PathBuf,
    data: StoreData,
}

impl BackingStore {
    /// Map a file read-only
    pub fn map<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| Error::FileOpen {
            path: path.to_path_buf(),
            source: e,
        })?;
        let len = file
            .metadata()
            .map_err(|e| Error::FileOpen {
                path: path.to_path_buf(),
                source: e,
            })?
            .len();

        // Zero-length mappings are rejected by some platforms.
        if len == 0 {
            return Ok(Self::from_bytes(path, Vec::new()));
        }

        // SAFETY: the mapping is read-only and never handed out mutably. The
        // file being truncated underneath us is outside our control, as for
        // any mmap-based reader.
        let mmap = unsafe { Mmap::map(&file) }.map_err(|e| Error::Map {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(Self {
            path: path.to_path_buf(),
            data: StoreData::Mapped(mmap),
        })
    }

    /// Wrap an in-memory buffer (stdin, tests)
    pub fn from_bytes<P: Into<PathBuf>>(path: P, bytes: Vec<u8>) -> Self {
        Self {
            path: path.into(),
            data: StoreData::Owned(bytes),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_mapped(&self) -> bool {
        matches!(self.data, StoreData::Mapped(_))
    }
}

impl Deref for BackingStore {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match &self.data {
            StoreData::Mapped(m) => m,
            StoreData::Owned(v) => v,
        }
    }
}

impl std::fmt::Debug for BackingStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackingStore")
            .field("path", &self.path)
            .field("len", &self.len())
            .field("mapped", &self.is_mapped())
            .finish()
    }
}

/// Arena owning every backing store of a run
#[derive(Debug, Default)]
pub struct StoreRegistry {
    stores: Vec<BackingStore>,
}

impl StoreRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of a store and return its handle
    pub fn insert(&mut self, store: BackingStore) -> StoreId {
        let id = StoreId(self.stores.len());
        self.stores.push(store);
        id
    }

    /// Map a file and register it
    pub fn map_file<P: AsRef<Path>>(&mut self, path: P) -> Result<StoreId> {
        let store = BackingStore::map(path)?;
        Ok(self.insert(store))
    }

    pub fn get(&self, id: StoreId) -> &BackingStore {
        &self.stores[id.0]
    }

    /// Bytes of `len` bytes at `start` in store `id`
    pub fn slice(&self, id: StoreId, start: usize, len: usize) -> &[u8] {
        &self.get(id)[start..start + len]
    }

    pub fn len(&self) -> usize {
        self.stores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stores.is_empty()
    }
}
