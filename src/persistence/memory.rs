//! In-process repository with auto-increment ids

use std::collections::BTreeMap;

use crate::model::{Locker, LockerId};

use super::{LockerRecord, LockerRepository, PersistenceError, Scope};

/// Repository keeping rows in memory, keyed by their stored code.
///
/// Can be switched offline to exercise failure handling.
#[derive(Debug, Clone)]
pub struct InMemoryRepository {
    scope: Scope,
    rows: BTreeMap<u64, LockerRecord>,
    next_code: u64,
    online: bool,
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new(Scope::default())
    }
}

impl InMemoryRepository {
    pub fn new(scope: Scope) -> Self {
        Self {
            scope,
            rows: BTreeMap::new(),
            next_code: 1,
            online: true,
        }
    }

    /// Simulate losing or regaining the backing store
    pub fn set_online(&mut self, online: bool) {
        self.online = online;
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn record(&self, code: u64) -> Option<&LockerRecord> {
        self.rows.get(&code)
    }

    fn ensure_online(&self) -> Result<(), PersistenceError> {
        if self.online {
            Ok(())
        } else {
            Err(PersistenceError::Offline)
        }
    }

    /// Insert or replace a record, assigning a code to new rows
    pub(crate) fn upsert(
        rows: &mut BTreeMap<u64, LockerRecord>,
        next_code: &mut u64,
        mut record: LockerRecord,
    ) -> Result<LockerRecord, PersistenceError> {
        let code = match record.lockr_cd {
            Some(code) if rows.contains_key(&code) => code,
            Some(code) => {
                return Err(PersistenceError::Rejected(format!(
                    "locker {} does not exist",
                    code
                )))
            }
            None => {
                let code = *next_code;
                *next_code += 1;
                code
            }
        };
        record.lockr_cd = Some(code);
        rows.insert(code, record.clone());
        Ok(record)
    }

    pub(crate) fn remove(
        rows: &mut BTreeMap<u64, LockerRecord>,
        id: &LockerId,
    ) -> Result<(), PersistenceError> {
        let code: u64 = id
            .as_str()
            .parse()
            .map_err(|_| PersistenceError::Rejected(format!("'{}' is not a stored locker id", id)))?;
        if rows.values().any(|r| r.parent_lockr_cd == Some(code)) {
            return Err(PersistenceError::Rejected(format!(
                "cannot delete {}: child lockers exist",
                code
            )));
        }
        rows.remove(&code)
            .map(|_| ())
            .ok_or_else(|| PersistenceError::Rejected(format!("locker {} does not exist", code)))
    }

    pub(crate) fn select(
        rows: &BTreeMap<u64, LockerRecord>,
        scope: &Scope,
    ) -> Result<Vec<Locker>, PersistenceError> {
        rows.values()
            .filter(|r| scope.matches(r))
            .cloned()
            .map(LockerRecord::into_locker)
            .collect()
    }
}

impl LockerRepository for InMemoryRepository {
    fn load_all(&self, scope: &Scope) -> Result<Vec<Locker>, PersistenceError> {
        self.ensure_online()?;
        Self::select(&self.rows, scope)
    }

    fn save(&mut self, locker: &Locker) -> Result<Locker, PersistenceError> {
        self.ensure_online()?;
        let record = LockerRecord::from_locker(locker, &self.scope)?;
        Self::upsert(&mut self.rows, &mut self.next_code, record)?.into_locker()
    }

    fn delete(&mut self, id: &LockerId) -> Result<(), PersistenceError> {
        self.ensure_online()?;
        Self::remove(&mut self.rows, id)
    }

    fn test_connection(&self) -> bool {
        self.online
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LockerType, NewLocker};

    fn new_locker(id: LockerId) -> Locker {
        NewLocker::of_type(&LockerType::defaults()[0], "zone-1", 0.0, 0.0).into_locker(id)
    }

    #[test]
    fn test_insert_assigns_sequential_codes() {
        let mut repo = InMemoryRepository::default();
        let a = repo.save(&new_locker(LockerId::temporary(1))).unwrap();
        let b = repo.save(&new_locker(LockerId::temporary(2))).unwrap();
        assert_eq!(a.id.as_str(), "1");
        assert_eq!(b.id.as_str(), "2");
        assert_eq!(repo.len(), 2);
    }

    #[test]
    fn test_update_unknown_code_is_rejected() {
        let mut repo = InMemoryRepository::default();
        let result = repo.save(&new_locker(LockerId::new("99")));
        assert!(matches!(result, Err(PersistenceError::Rejected(_))));
    }

    #[test]
    fn test_offline_fails() {
        let mut repo = InMemoryRepository::default();
        repo.set_online(false);
        assert!(!repo.test_connection());
        assert!(matches!(
            repo.save(&new_locker(LockerId::temporary(1))),
            Err(PersistenceError::Offline)
        ));
    }

    #[test]
    fn test_delete_refuses_parent_with_children() {
        let mut repo = InMemoryRepository::default();
        let parent = repo.save(&new_locker(LockerId::temporary(1))).unwrap();
        let mut child = new_locker(LockerId::temporary(2));
        child.parent_id = Some(parent.id.clone());
        repo.save(&child).unwrap();
        assert!(repo.delete(&parent.id).is_err());
    }

    #[test]
    fn test_load_filters_by_zone() {
        let mut repo = InMemoryRepository::default();
        repo.save(&new_locker(LockerId::temporary(1))).unwrap();
        let mut other = new_locker(LockerId::temporary(2));
        other.zone_id = "zone-2".to_string();
        repo.save(&other).unwrap();

        let all = repo.load_all(&Scope::default()).unwrap();
        assert_eq!(all.len(), 2);
        let zoned = repo.load_all(&Scope::default().with_zone("zone-2")).unwrap();
        assert_eq!(zoned.len(), 1);
        assert_eq!(zoned[0].zone_id, "zone-2");
    }
}
