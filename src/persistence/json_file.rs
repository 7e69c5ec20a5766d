//! Repository backed by a single JSON layout file.
//!
//! The file holds zones, locker types, and locker rows. Every change is
//! written through to disk.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::{Locker, LockerId, LockerType, Zone};

use super::memory::InMemoryRepository;
use super::{LockerRecord, LockerRepository, PersistenceError, Scope};

/// On-disk document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutFile {
    #[serde(default = "first_code")]
    pub next_code: u64,
    #[serde(default)]
    pub zones: Vec<Zone>,
    #[serde(default = "LockerType::defaults")]
    pub types: Vec<LockerType>,
    #[serde(default)]
    pub lockers: Vec<LockerRecord>,
}

fn first_code() -> u64 {
    1
}

impl Default for LayoutFile {
    fn default() -> Self {
        Self {
            next_code: first_code(),
            zones: Vec::new(),
            types: LockerType::defaults(),
            lockers: Vec::new(),
        }
    }
}

/// JSON file repository
#[derive(Debug)]
pub struct JsonFileRepository {
    path: PathBuf,
    scope: Scope,
    zones: Vec<Zone>,
    types: Vec<LockerType>,
    rows: BTreeMap<u64, LockerRecord>,
    next_code: u64,
}

impl JsonFileRepository {
    /// Open a layout file, starting empty when it does not exist yet
    pub fn open(path: impl AsRef<Path>, scope: Scope) -> Result<Self, PersistenceError> {
        let path = path.as_ref().to_path_buf();
        let file = if path.exists() {
            let content = fs::read_to_string(&path)?;
            serde_json::from_str(&content)?
        } else {
            LayoutFile::default()
        };

        let mut rows = BTreeMap::new();
        let mut next_code = file.next_code;
        for record in file.lockers {
            let code = record.lockr_cd.unwrap_or_else(|| {
                let code = next_code;
                next_code += 1;
                code
            });
            next_code = next_code.max(code + 1);
            rows.insert(
                code,
                LockerRecord {
                    lockr_cd: Some(code),
                    ..record
                },
            );
        }

        debug!(path = %path.display(), lockers = rows.len(), "opened layout file");
        Ok(Self {
            path,
            scope,
            zones: file.zones,
            types: file.types,
            rows,
            next_code,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    pub fn types(&self) -> &[LockerType] {
        &self.types
    }

    /// Write `rows` to disk as the new document contents
    fn flush(&self, rows: &BTreeMap<u64, LockerRecord>, next_code: u64) -> Result<(), PersistenceError> {
        let file = LayoutFile {
            next_code,
            zones: self.zones.clone(),
            types: self.types.clone(),
            lockers: rows.values().cloned().collect(),
        };
        fs::write(&self.path, serde_json::to_string_pretty(&file)?)?;
        Ok(())
    }
}

// Changes are staged on a copy of the rows and kept only once the file write
// succeeds, so a failed write leaves no row behind in memory.
impl LockerRepository for JsonFileRepository {
    fn load_all(&self, scope: &Scope) -> Result<Vec<Locker>, PersistenceError> {
        InMemoryRepository::select(&self.rows, scope)
    }

    fn save(&mut self, locker: &Locker) -> Result<Locker, PersistenceError> {
        let record = LockerRecord::from_locker(locker, &self.scope)?;
        let mut rows = self.rows.clone();
        let mut next_code = self.next_code;
        let saved = InMemoryRepository::upsert(&mut rows, &mut next_code, record)?;
        self.flush(&rows, next_code)?;
        self.rows = rows;
        self.next_code = next_code;
        saved.into_locker()
    }

    fn delete(&mut self, id: &LockerId) -> Result<(), PersistenceError> {
        let mut rows = self.rows.clone();
        InMemoryRepository::remove(&mut rows, id)?;
        self.flush(&rows, self.next_code)?;
        self.rows = rows;
        Ok(())
    }

    fn test_connection(&self) -> bool {
        self.path
            .parent()
            .map_or(true, |dir| dir.as_os_str().is_empty() || dir.is_dir())
    }
}
