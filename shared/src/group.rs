use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::wire::{flag, null_as_default};

/// Networking role of a vehicle inside its fleet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    Standalone,
    Leader,
    Follower,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Standalone, Role::Leader, Role::Follower];

    /// Wire spelling. Anything unrecognised is a standalone vehicle.
    pub fn from_wire(s: &str) -> Self {
        match s {
            "leader" => Role::Leader,
            "follower" => Role::Follower,
            _ => Role::Standalone,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Standalone => "standalone",
            Role::Leader => "leader",
            Role::Follower => "follower",
        }
    }

    /// Operator-facing name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Role::Standalone => "Standalone",
            Role::Leader => "Leader",
            Role::Follower => "Follower",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(d)?;
        Ok(raw.as_deref().map(Role::from_wire).unwrap_or_default())
    }
}

/// Peer-to-peer link status as reported by the device. The device only ever
/// says `"ok"` or names the problem, so everything else is kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EspNowStatus {
    #[default]
    Unknown,
    Ok,
    Other(String),
}

impl EspNowStatus {
    pub fn from_wire(s: &str) -> Self {
        match s {
            "" | "unknown" => EspNowStatus::Unknown,
            "ok" => EspNowStatus::Ok,
            other => EspNowStatus::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            EspNowStatus::Unknown => "unknown",
            EspNowStatus::Ok => "ok",
            EspNowStatus::Other(s) => s,
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, EspNowStatus::Ok)
    }
}

impl Serialize for EspNowStatus {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EspNowStatus {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(d)?;
        Ok(raw.as_deref().map(EspNowStatus::from_wire).unwrap_or_default())
    }
}

/// Device answer to `get_group_config`. Every field is optional on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupConfigReport {
    #[serde(default)]
    pub role: Role,
    #[serde(default, deserialize_with = "null_as_default")]
    pub my_mac: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub leader_mac: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub group_id: i64,
    #[serde(default, deserialize_with = "flag")]
    pub espnow_enabled: bool,
    #[serde(default)]
    pub espnow_status: EspNowStatus,
}

/// One follower as seen by its leader.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowerReport {
    #[serde(default, deserialize_with = "null_as_default")]
    pub mac: String,
    /// Epoch milliseconds of the last heartbeat the leader received.
    #[serde(default, deserialize_with = "null_as_default")]
    pub last_seen_ms: i64,
}

/// Periodic fleet status pushed inside telemetry frames. Both parts are
/// independent: a push may carry either, both or neither.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub followers: Option<Vec<FollowerReport>>,
    /// An empty or null status means the push carried none.
    #[serde(
        default,
        deserialize_with = "present_status",
        skip_serializing_if = "Option::is_none"
    )]
    pub espnow_status: Option<EspNowStatus>,
}

fn present_status<'de, D>(d: D) -> Result<Option<EspNowStatus>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(d)?;
    Ok(raw
        .filter(|s| !s.is_empty())
        .map(|s| EspNowStatus::from_wire(&s)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_fills_defaults_for_missing_fields() {
        let report: GroupConfigReport = serde_json::from_str(r#"{"role":"leader"}"#).unwrap();
        assert_eq!(report.role, Role::Leader);
        assert_eq!(report.my_mac, "");
        assert_eq!(report.group_id, 0);
        assert!(!report.espnow_enabled);
        assert_eq!(report.espnow_status, EspNowStatus::Unknown);
    }

    #[test]
    fn report_accepts_nulls_and_numeric_flags() {
        let report: GroupConfigReport = serde_json::from_str(
            r#"{"role":null,"my_mac":null,"group_id":null,"espnow_enabled":1,"espnow_status":"error"}"#,
        )
        .unwrap();
        assert_eq!(report.role, Role::Standalone);
        assert!(report.espnow_enabled);
        assert_eq!(report.espnow_status, EspNowStatus::Other("error".into()));
    }

    #[test]
    fn unknown_role_reads_as_standalone() {
        assert_eq!(Role::from_wire("scout"), Role::Standalone);
        let role: Role = serde_json::from_str(r#""follower""#).unwrap();
        assert_eq!(role, Role::Follower);
    }

    #[test]
    fn status_parts_are_optional() {
        let status: GroupStatus = serde_json::from_str(r#"{"espnow_status":"ok"}"#).unwrap();
        assert!(status.followers.is_none());
        assert_eq!(status.espnow_status, Some(EspNowStatus::Ok));

        let status: GroupStatus =
            serde_json::from_str(r#"{"followers":[{"mac":"AA:BB:CC:DD:EE:01","last_seen_ms":42}]}"#)
                .unwrap();
        assert_eq!(status.followers.as_ref().map(Vec::len), Some(1));
        assert!(status.espnow_status.is_none());
    }

    #[test]
    fn empty_status_reads_as_absent() {
        let status: GroupStatus = serde_json::from_str(r#"{"espnow_status":""}"#).unwrap();
        assert!(status.espnow_status.is_none());
        let status: GroupStatus = serde_json::from_str(r#"{"espnow_status":null}"#).unwrap();
        assert!(status.espnow_status.is_none());
        let status: GroupStatus = serde_json::from_str(r#"{"espnow_status":"error"}"#).unwrap();
        assert_eq!(status.espnow_status, Some(EspNowStatus::Other("error".into())));
    }
}
