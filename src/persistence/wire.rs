//! Persisted record shape and status code mapping

use serde::{Deserialize, Serialize};

use crate::model::{Assignment, Locker, LockerId, LockerStatus};

use super::{PersistenceError, Scope};

/// Two-character status codes used by the locker table
pub struct StatusCode;

impl StatusCode {
    pub fn encode(status: LockerStatus) -> &'static str {
        match status {
            LockerStatus::Available => "00",
            LockerStatus::Occupied => "01",
            LockerStatus::Maintenance => "03",
            LockerStatus::Expired => "05",
        }
    }

    pub fn decode(code: &str) -> Option<LockerStatus> {
        match code {
            "00" => Some(LockerStatus::Available),
            "01" | "02" => Some(LockerStatus::Occupied),
            "03" | "04" => Some(LockerStatus::Maintenance),
            "05" => Some(LockerStatus::Expired),
            _ => None,
        }
    }
}

/// One row of the locker table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct LockerRecord {
    pub lockr_cd: Option<u64>,
    pub comp_cd: String,
    pub bcoff_cd: String,
    /// Zone id
    pub lockr_knd: String,
    pub lockr_type_cd: String,
    pub x: Option<i64>,
    pub y: Option<i64>,
    pub width: f64,
    pub height: f64,
    pub depth: f64,
    pub rotation: f64,
    pub front_view_x: Option<i64>,
    pub front_view_y: Option<i64>,
    pub lockr_label: String,
    pub lockr_no: Option<u32>,
    pub group_num: Option<u32>,
    pub door_direction: Option<String>,
    pub parent_lockr_cd: Option<u64>,
    pub tier_level: u32,
    pub lockr_stat: String,
    #[serde(default)]
    pub floor: Option<u32>,
    #[serde(default)]
    pub lockr_gendr_set: Option<String>,
    #[serde(default)]
    pub mem_sno: Option<String>,
    #[serde(default)]
    pub mem_nm: Option<String>,
    #[serde(default)]
    pub lockr_use_s_date: Option<String>,
    #[serde(default)]
    pub lockr_use_e_date: Option<String>,
    #[serde(default)]
    pub memo: Option<String>,
}

/// Stored id of a locker, `None` for a temporary id
fn stored_code(id: &LockerId) -> Result<Option<u64>, PersistenceError> {
    if id.is_temporary() {
        return Ok(None);
    }
    id.as_str()
        .parse()
        .map(Some)
        .map_err(|_| PersistenceError::Rejected(format!("'{}' is not a stored locker id", id)))
}

fn to_coordinate(value: Option<f64>) -> Option<i64> {
    value.map(|v| v.round() as i64)
}

impl LockerRecord {
    pub fn from_locker(locker: &Locker, scope: &Scope) -> Result<Self, PersistenceError> {
        let parent_lockr_cd = match &locker.parent_id {
            Some(parent) => Some(stored_code(parent)?.ok_or_else(|| {
                PersistenceError::Rejected(format!("parent '{}' has not been saved", parent))
            })?),
            None => None,
        };

        Ok(Self {
            lockr_cd: stored_code(&locker.id)?,
            comp_cd: scope.company.clone(),
            bcoff_cd: scope.branch.clone(),
            lockr_knd: locker.zone_id.clone(),
            lockr_type_cd: locker.type_id.clone(),
            x: to_coordinate(locker.x),
            y: to_coordinate(locker.y),
            width: locker.width,
            height: locker.height,
            depth: locker.depth,
            rotation: locker.rotation,
            front_view_x: to_coordinate(locker.front_view_x),
            front_view_y: to_coordinate(locker.front_view_y),
            lockr_label: locker.label.clone(),
            lockr_no: locker.number,
            group_num: locker.group_num,
            door_direction: locker.door_direction.clone(),
            parent_lockr_cd,
            tier_level: locker.tier_level,
            lockr_stat: StatusCode::encode(locker.status).to_string(),
            floor: locker.floor,
            lockr_gendr_set: locker.gender.clone(),
            mem_sno: locker.assignment.member_serial.clone(),
            mem_nm: locker.assignment.member_name.clone(),
            lockr_use_s_date: locker.assignment.start_date.clone(),
            lockr_use_e_date: locker.assignment.end_date.clone(),
            memo: locker.assignment.memo.clone(),
        })
    }

    /// Convert a stored row back into a locker. Rows without a code are rejected.
    pub fn into_locker(self) -> Result<Locker, PersistenceError> {
        let code = self
            .lockr_cd
            .ok_or_else(|| PersistenceError::Rejected("record has no LOCKR_CD".to_string()))?;

        Ok(Locker {
            id: LockerId::new(code.to_string()),
            label: self.lockr_label,
            number: self.lockr_no,
            x: self.x.map(|v| v as f64),
            y: self.y.map(|v| v as f64),
            width: self.width,
            height: self.height,
            depth: self.depth,
            rotation: self.rotation,
            front_view_x: self.front_view_x.map(|v| v as f64),
            front_view_y: self.front_view_y.map(|v| v as f64),
            zone_id: self.lockr_knd,
            type_id: self.lockr_type_cd,
            status: StatusCode::decode(&self.lockr_stat).unwrap_or_default(),
            parent_id: self.parent_lockr_cd.map(|p| LockerId::new(p.to_string())),
            tier_level: self.tier_level,
            group_num: self.group_num,
            door_direction: self.door_direction,
            floor: self.floor,
            gender: self.lockr_gendr_set,
            assignment: Assignment {
                member_serial: self.mem_sno,
                member_name: self.mem_nm,
                start_date: self.lockr_use_s_date,
                end_date: self.lockr_use_e_date,
                memo: self.memo,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LockerType, NewLocker};
    use pretty_assertions::assert_eq;

    fn locker(id: &str) -> Locker {
        NewLocker::of_type(&LockerType::defaults()[0], "zone-1", 10.4, 20.6)
            .with_label("A-01")
            .with_rotation(405.5)
            .into_locker(LockerId::new(id))
    }

    #[test]
    fn test_status_codes() {
        for status in LockerStatus::ALL {
            assert_eq!(StatusCode::decode(StatusCode::encode(status)), Some(status));
        }
        assert_eq!(StatusCode::decode("02"), Some(LockerStatus::Occupied));
        assert_eq!(StatusCode::decode("04"), Some(LockerStatus::Maintenance));
        assert_eq!(StatusCode::decode("99"), None);
    }

    #[test]
    fn test_record_rounds_coordinates_keeps_rotation() {
        let record = LockerRecord::from_locker(&locker("12"), &Scope::default()).unwrap();
        assert_eq!(record.lockr_cd, Some(12));
        assert_eq!((record.x, record.y), (Some(10), Some(21)));
        assert_eq!(record.rotation, 405.5);
        assert_eq!(record.lockr_stat, "00");
    }

    #[test]
    fn test_temporary_id_has_no_code() {
        let record = LockerRecord::from_locker(&locker("temp-1"), &Scope::default()).unwrap();
        assert_eq!(record.lockr_cd, None);
    }

    #[test]
    fn test_unsaved_parent_is_rejected() {
        let mut tier = locker("temp-2");
        tier.parent_id = Some(LockerId::temporary(1));
        assert!(matches!(
            LockerRecord::from_locker(&tier, &Scope::default()),
            Err(PersistenceError::Rejected(_))
        ));
    }

    #[test]
    fn test_json_uses_column_names() {
        let record = LockerRecord::from_locker(&locker("3"), &Scope::default()).unwrap();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["LOCKR_CD"], 3);
        assert_eq!(json["LOCKR_KND"], "zone-1");
        assert_eq!(json["FRONT_VIEW_Y"], serde_json::Value::Null);
        assert_eq!(json["LOCKR_USE_S_DATE"], serde_json::Value::Null);
    }

    #[test]
    fn test_record_back_to_locker() {
        let original = locker("3");
        let restored = LockerRecord::from_locker(&original, &Scope::default())
            .unwrap()
            .into_locker()
            .unwrap();
        assert_eq!(restored.id, original.id);
        assert_eq!(restored.x, Some(10.0));
        assert_eq!(restored.label, "A-01");
        assert_eq!(restored.status, original.status);
    }
}
