// ── Access point uptime policy ──
//
// Secondary check behind a signal-related health issue: an AP that has run
// for more than 30 days is due a scheduled reboot, and one that restarted
// within the last hour may be unstable.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use strum::Display;

use crate::model::{AccessPointStats, MacAddress};

/// Uptime (hours) beyond which a scheduled reboot is advisable. 30 days.
pub const REBOOT_AFTER_HOURS: f64 = 720.0;
/// Uptime (hours) below which the AP is considered freshly restarted.
pub const RECENT_RESTART_HOURS: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UptimeState {
    #[strum(serialize = "High uptime - consider scheduled reboot")]
    RebootAdvisable,
    #[strum(serialize = "Recent restart detected - may indicate stability issues")]
    RecentRestart,
    #[strum(serialize = "Uptime normal")]
    Normal,
}

impl UptimeState {
    pub fn needs_reboot(self) -> bool {
        !matches!(self, Self::Normal)
    }
}

/// Outcome of the uptime policy for one AP.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UptimeAssessment {
    pub ap: MacAddress,
    pub ap_name: Option<String>,
    pub uptime_hours: f64,
    pub state: UptimeState,
    pub needs_reboot: bool,
}

impl UptimeAssessment {
    pub fn uptime_days(&self) -> f64 {
        self.uptime_hours / 24.0
    }

    /// Uptime as `16days 16h` style text, rounded down to whole minutes.
    pub fn humanized(&self) -> String {
        let minutes = Duration::try_from_secs_f64(self.uptime_hours * 3600.0)
            .map(|d| d.as_secs() / 60 * 60)
            .unwrap_or_default();
        humantime::format_duration(Duration::from_secs(minutes)).to_string()
    }

    /// The AP's name if known, otherwise its MAC.
    pub fn ap_label(&self) -> String {
        self.ap_name
            .clone()
            .unwrap_or_else(|| self.ap.to_string())
    }
}

/// Classify an uptime expressed in hours.
pub fn classify_hours(uptime_hours: f64) -> UptimeState {
    if uptime_hours > REBOOT_AFTER_HOURS {
        UptimeState::RebootAdvisable
    } else if uptime_hours < RECENT_RESTART_HOURS {
        UptimeState::RecentRestart
    } else {
        UptimeState::Normal
    }
}

/// Apply the uptime policy to an AP's statistics.
pub fn assess(stats: &AccessPointStats) -> UptimeAssessment {
    let uptime_hours = stats.uptime.as_secs_f64() / 3600.0;
    let state = classify_hours(uptime_hours);
    UptimeAssessment {
        ap: stats.id.clone(),
        ap_name: stats.name.clone(),
        uptime_hours,
        state,
        needs_reboot: state.needs_reboot(),
    }
}
