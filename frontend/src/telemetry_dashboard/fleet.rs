// frontend/src/telemetry_dashboard/fleet.rs
//
// Fleet role configuration: the form the operator edits, the last
// configuration the device reported, and the follower liveness list.

use console_shared::{
    ConsoleCmd, DashboardLayout, EspNowStatus, GroupConfigParam, GroupConfigReport, GroupStatus,
    MacAddress, PanelKind, Role,
};

use super::transport::Transport;

/// A follower heard from within this window is online.
pub const FOLLOWER_TIMEOUT_MS: i64 = 2_000;

pub const NO_FOLLOWERS_TEXT: &str = "No followers online";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Follower {
    pub mac: String,
    pub last_seen_ms: i64,
}

impl Follower {
    /// Strictly inside the window: exactly `FOLLOWER_TIMEOUT_MS` old is offline.
    pub fn is_online(&self, now_ms: i64) -> bool {
        now_ms.saturating_sub(self.last_seen_ms) < FOLLOWER_TIMEOUT_MS
    }
}

/// What the device last told us about its fleet membership.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupState {
    pub role: Role,
    pub my_mac: String,
    pub leader_mac: String,
    pub group_id: i64,
    pub espnow_enabled: bool,
    pub espnow_status: EspNowStatus,
    pub followers_online: Vec<Follower>,
}

/// Operator-editable copy of the configuration. Text fields hold raw input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FleetForm {
    pub role: Role,
    pub group_id_text: String,
    pub leader_mac_text: String,
    pub espnow_enabled: bool,
    leader_mac_visible: bool,
}

impl FleetForm {
    pub fn leader_mac_visible(&self) -> bool {
        self.leader_mac_visible
    }

    /// Returns true when the leader MAC field appeared or disappeared.
    fn set_role(&mut self, role: Role) -> bool {
        self.role = role;
        let visible = role == Role::Follower;
        let changed = visible != self.leader_mac_visible;
        self.leader_mac_visible = visible;
        changed
    }

    fn load(&mut self, state: &GroupState) {
        self.group_id_text = state.group_id.to_string();
        self.leader_mac_text = state.leader_mac.clone();
        self.espnow_enabled = state.espnow_enabled;
        self.set_role(state.role);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SaveError {
    #[error("Enter a valid leader MAC address (format: AA:BB:CC:DD:EE:FF), got {0:?}")]
    InvalidLeaderMac(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveNotice {
    RestartRequired,
}

impl SaveNotice {
    pub fn message(&self) -> &'static str {
        match self {
            SaveNotice::RestartRequired => {
                "Configuration saved.\n\nRestart the device for the changes to take effect."
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusView {
    pub role_name: &'static str,
    pub my_mac: String,
    pub lamp_on: bool,
    pub lamp_text: &'static str,
    /// Only a leader tracks followers.
    pub show_followers: bool,
    pub follower_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FollowerEntry {
    /// 1-based.
    pub ordinal: usize,
    pub mac: String,
    pub online: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FollowerList {
    Empty,
    Entries(Vec<FollowerEntry>),
}

pub struct FleetConfigurator {
    state: GroupState,
    form: FleetForm,
}

impl FleetConfigurator {
    /// `None` when the layout has no fleet panel.
    pub fn initialize(layout: &DashboardLayout, tx: &dyn Transport) -> Option<Self> {
        if !layout.has_panel(PanelKind::Fleet) {
            tracing::warn!("[GROUP] no fleet panel in layout, configurator disabled");
            return None;
        }
        let state = GroupState::default();
        let mut form = FleetForm::default();
        form.load(&state);

        let this = Self { state, form };
        this.request_configuration(tx);
        Some(this)
    }

    pub fn request_configuration(&self, tx: &dyn Transport) {
        tx.send(&ConsoleCmd::GetGroupConfig);
    }

    pub fn form(&self) -> &FleetForm {
        &self.form
    }

    pub fn set_role(&mut self, role: Role) -> bool {
        self.form.set_role(role)
    }

    pub fn set_group_id_text(&mut self, text: impl Into<String>) {
        self.form.group_id_text = text.into();
    }

    pub fn set_leader_mac_text(&mut self, text: impl Into<String>) {
        self.form.leader_mac_text = text.into();
    }

    pub fn set_espnow_enabled(&mut self, enabled: bool) {
        self.form.espnow_enabled = enabled;
    }

    /// Validates the form and sends it. Nothing is sent on error.
    pub fn save_configuration(&self, tx: &dyn Transport) -> Result<SaveNotice, SaveError> {
        let role = self.form.role;
        let leader_mac = self.form.leader_mac_text.trim();

        let leader_mac = if role == Role::Follower {
            if !MacAddress::is_valid(leader_mac) {
                return Err(SaveError::InvalidLeaderMac(leader_mac.to_string()));
            }
            Some(leader_mac.to_ascii_uppercase())
        } else {
            None
        };

        let param = GroupConfigParam {
            role,
            group_id: parse_leading_int(&self.form.group_id_text),
            espnow_enabled: self.form.espnow_enabled,
            leader_mac,
        };
        tracing::info!("[GROUP] saving {param:?}");
        tx.send(&ConsoleCmd::GroupConfig { param });

        Ok(SaveNotice::RestartRequired)
    }

    /// Replaces the reported configuration and rewrites the form from it.
    /// The follower list is owned by status pushes and left alone.
    pub fn handle_configuration(&mut self, report: GroupConfigReport) {
        let GroupConfigReport {
            role,
            my_mac,
            leader_mac,
            group_id,
            espnow_enabled,
            espnow_status,
        } = report;

        self.state = GroupState {
            role,
            my_mac,
            leader_mac,
            group_id,
            espnow_enabled,
            espnow_status,
            followers_online: std::mem::take(&mut self.state.followers_online),
        };
        self.form.load(&self.state);
        tracing::debug!("[GROUP] configuration {:?}", self.state.role);
    }

    pub fn handle_status(&mut self, status: GroupStatus) {
        if let Some(followers) = status.followers {
            self.state.followers_online = followers
                .into_iter()
                .map(|f| Follower {
                    mac: f.mac,
                    last_seen_ms: f.last_seen_ms,
                })
                .collect();
        }
        if let Some(espnow_status) = status.espnow_status {
            self.state.espnow_status = espnow_status;
        }
    }

    pub fn status_view(&self) -> StatusView {
        let lamp_on = self.state.espnow_status.is_ok();
        StatusView {
            role_name: self.state.role.display_name(),
            my_mac: if self.state.my_mac.is_empty() {
                "Unknown".to_string()
            } else {
                self.state.my_mac.clone()
            },
            lamp_on,
            lamp_text: if lamp_on { "OK" } else { "Not enabled" },
            show_followers: self.is_leader(),
            follower_count: self.state.followers_online.len(),
        }
    }

    /// Liveness is judged against `now_ms` each time this is called.
    pub fn follower_list(&self, now_ms: i64) -> FollowerList {
        if self.state.followers_online.is_empty() {
            return FollowerList::Empty;
        }
        FollowerList::Entries(
            self.state
                .followers_online
                .iter()
                .enumerate()
                .map(|(i, f)| FollowerEntry {
                    ordinal: i + 1,
                    mac: f.mac.clone(),
                    online: f.is_online(now_ms),
                })
                .collect(),
        )
    }

    pub fn state(&self) -> GroupState {
        self.state.clone()
    }

    pub fn is_leader(&self) -> bool {
        self.state.role == Role::Leader
    }

    pub fn is_follower(&self) -> bool {
        self.state.role == Role::Follower
    }
}

/// Leading optional sign and decimal digits; anything else reads as 0.
fn parse_leading_int(text: &str) -> i64 {
    let text = text.trim_start();
    let (negative, rest) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    let Ok(value) = rest[..digits].parse::<i64>() else {
        return 0;
    };
    if negative { -value } else { value }
}
