// Simulated balance-bot: attitude, chart channels and fleet heartbeats.

use console_shared::{FollowerReport, MacAddress, TelemetryFrame, SAMPLE_LEN};
use rand::RngExt;

pub const HEARTBEAT_INTERVAL_MS: i64 = 1000;
const DROPOUT_MS: std::ops::Range<i64> = 2_500..6_000;

const BATTERY_FULL_V: f64 = 12.4;
const BATTERY_EMPTY_V: f64 = 10.8;
/// Volts lost per second of runtime.
const BATTERY_DRAIN_V_PER_S: f64 = 0.0005;

/// Balancing motion around the pitch zero-offset.
#[derive(Debug, Clone, Default)]
pub struct BotSim {
    t_s: f64,
    yaw: f64,
}

impl BotSim {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances by `dt_s` seconds and returns the attitude part of a frame
    /// plus the 9 chart channels (angle, torque, speed groups).
    pub fn step(&mut self, dt_s: f64, pitch_zero: f64) -> (TelemetryFrame, [f64; SAMPLE_LEN]) {
        let mut rng = rand::rng();
        self.t_s += dt_s.max(0.0);
        let t = self.t_s;

        let ang_target = pitch_zero + 1.5 * (0.7 * t).sin();
        let ang_now = ang_target + 0.4 * (3.1 * t).sin() + rng.random_range(-0.3..0.3);
        let ang_err = ang_target - ang_now;

        let spd_tar = 4.0 * (0.35 * t).sin();
        let spd_now = spd_tar + 0.6 * (1.7 * t).cos() + rng.random_range(-0.2..0.2);
        let pos_err = 0.8 * (0.2 * t).sin();

        let ang_duty = 40.0 * ang_err + 8.0 * (3.1 * t).cos();
        let spd_duty = 2.0 * (spd_tar - spd_now);
        let pos_duty = 1.5 * pos_err;

        self.yaw += 6.0 * dt_s * (0.05 * t).cos();
        self.yaw = (self.yaw + 180.0).rem_euclid(360.0) - 180.0;

        let battery = (BATTERY_FULL_V - BATTERY_DRAIN_V_PER_S * t).max(BATTERY_EMPTY_V)
            + rng.random_range(-0.02..0.02);

        let frame = TelemetryFrame {
            pitch: ang_now,
            roll: 0.8 * (0.9 * t).sin() + rng.random_range(-0.1..0.1),
            yaw: self.yaw,
            battery,
            fallen: false,
            sample: None,
            group_status: None,
        };
        let sample = [
            ang_target,
            ang_now,
            ang_err,
            ang_duty,
            spd_duty * 10.0,
            pos_duty * 10.0,
            spd_now,
            spd_tar,
            pos_err * 10.0,
        ];
        (frame, sample)
    }
}

#[derive(Debug, Clone)]
struct SimFollower {
    mac: MacAddress,
    last_seen_ms: Option<i64>,
    next_beat_ms: i64,
    silent_until_ms: i64,
}

/// Followers heartbeating to this device while it leads a fleet. A follower
/// only shows up once its first heartbeat arrived.
#[derive(Debug, Clone)]
pub struct FleetSim {
    followers: Vec<SimFollower>,
    /// Chance that a heartbeat is followed by a silent stretch.
    dropout_chance: f64,
}

impl FleetSim {
    pub fn new(leader: MacAddress, count: usize, dropout_chance: f64) -> Self {
        let followers = (0..count)
            .map(|i| SimFollower {
                mac: follower_mac(leader, i),
                last_seen_ms: None,
                next_beat_ms: 0,
                silent_until_ms: 0,
            })
            .collect();
        Self {
            followers,
            dropout_chance: dropout_chance.clamp(0.0, 1.0),
        }
    }

    pub fn tick(&mut self, now_ms: i64) {
        let mut rng = rand::rng();
        for f in &mut self.followers {
            if now_ms < f.silent_until_ms || now_ms < f.next_beat_ms {
                continue;
            }
            f.last_seen_ms = Some(now_ms);
            f.next_beat_ms = now_ms + HEARTBEAT_INTERVAL_MS;
            if rng.random_bool(self.dropout_chance) {
                f.silent_until_ms = now_ms + rng.random_range(DROPOUT_MS);
            }
        }
    }

    /// Heard-from followers with the epoch time of their last heartbeat.
    pub fn reports(&self) -> Vec<FollowerReport> {
        self.followers
            .iter()
            .filter_map(|f| {
                f.last_seen_ms.map(|last_seen_ms| FollowerReport {
                    mac: f.mac.to_string(),
                    last_seen_ms,
                })
            })
            .collect()
    }
}

/// Followers share the leader's OUI; the last octet counts up from it.
fn follower_mac(leader: MacAddress, index: usize) -> MacAddress {
    let mut octets = leader.octets();
    octets[3] ^= 0x40;
    octets[5] = octets[5].wrapping_add((index as u8).wrapping_add(1));
    MacAddress(octets)
}
