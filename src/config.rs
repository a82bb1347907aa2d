//! System configuration parameters
//!
//! All tunable parameters for the rumor mill. Values can be overridden via
//! NVS; defaults mirror the board the firmware ships on.

use serde::{Deserialize, Serialize};

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Access point ---
    /// SSID of the soft-AP the device brings up.
    pub ap_ssid: String,
    /// WPA2 passphrase (8-64 bytes).
    pub ap_password: String,

    // --- Trigger ---
    /// Reed sensor poll interval (milliseconds).
    pub reed_poll_ms: u32,
    /// Minimum spacing between accepted triggers (milliseconds).
    pub print_cooldown_ms: u32,

    // --- Registry ---
    /// Bounded wait for the registry lock (milliseconds).
    pub lock_timeout_ms: u32,
    /// Print quota assigned to rumors created without an explicit one.
    pub default_max_prints: u16,

    // --- Storage ---
    /// Path of the snapshot document on the mounted storage partition.
    pub rumors_path: String,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            ap_ssid: "RumourMill".into(),
            ap_password: "OhNoSheDidnt".into(),

            reed_poll_ms: 50,
            print_cooldown_ms: 15_000,

            lock_timeout_ms: 500,
            default_max_prints: 5,

            rumors_path: "/spiffs/rumors.json".into(),
        }
    }
}

impl SystemConfig {
    /// Range-check every field. Invalid configs are rejected before they are
    /// persisted, never silently clamped.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.ap_ssid.is_empty() || self.ap_ssid.len() > 32 {
            return Err("ap_ssid must be 1-32 bytes");
        }
        if !self.ap_password.is_empty()
            && (self.ap_password.len() < 8 || self.ap_password.len() > 64)
        {
            return Err("ap_password must be 8-64 bytes for WPA2, or empty for open");
        }
        if !(10..=1000).contains(&self.reed_poll_ms) {
            return Err("reed_poll_ms must be 10-1000");
        }
        if !(1000..=600_000).contains(&self.print_cooldown_ms) {
            return Err("print_cooldown_ms must be 1000-600000");
        }
        if !(50..=5000).contains(&self.lock_timeout_ms) {
            return Err("lock_timeout_ms must be 50-5000");
        }
        if self.default_max_prints < 1 {
            return Err("default_max_prints must be >= 1");
        }
        if self.rumors_path.is_empty() {
            return Err("rumors_path must not be empty");
        }
        Ok(())
    }
}
