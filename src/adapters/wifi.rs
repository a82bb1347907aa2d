//! WiFi soft-AP adapter.
//!
//! The rumor mill is its own network: it brings up a WPA2 access point and
//! serves the UI to whoever joins. No station mode, no internet uplink.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: real ESP-IDF WiFi driver via `esp_idf_svc::wifi`.
//! - **all other targets**: simulation stub for host-side tests.

use core::fmt;

use log::info;

#[cfg(target_os = "espidf")]
use esp_idf_svc::{
    eventloop::EspSystemEventLoop,
    hal::modem::Modem,
    nvs::EspDefaultNvsPartition,
    wifi::{AccessPointConfiguration, AuthMethod, BlockingWifi, Configuration, EspWifi},
};

// ───────────────────────────────────────────────────────────────
// Errors & validation
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApError {
    InvalidSsid,
    InvalidPassword,
    PlatformFailed,
}

impl fmt::Display for ApError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSsid => write!(f, "SSID invalid (must be 1-32 printable ASCII bytes)"),
            Self::InvalidPassword => {
                write!(f, "password invalid (must be 8-64 bytes for WPA2, or empty for open)")
            }
            Self::PlatformFailed => write!(f, "WiFi driver failed"),
        }
    }
}

fn is_printable_ascii(s: &str) -> bool {
    s.bytes().all(|b| (0x20..=0x7E).contains(&b))
}

fn checked_ssid(ssid: &str) -> Result<heapless::String<32>, ApError> {
    if ssid.is_empty() || !is_printable_ascii(ssid) {
        return Err(ApError::InvalidSsid);
    }
    ssid.try_into().map_err(|()| ApError::InvalidSsid)
}

fn checked_password(password: &str) -> Result<heapless::String<64>, ApError> {
    if !password.is_empty() && password.len() < 8 {
        return Err(ApError::InvalidPassword);
    }
    password.try_into().map_err(|()| ApError::InvalidPassword)
}

// ───────────────────────────────────────────────────────────────
// Adapter
// ───────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct ApAdapter {
    ssid: heapless::String<32>,
    password: heapless::String<64>,
    #[cfg(target_os = "espidf")]
    wifi: BlockingWifi<EspWifi<'static>>,
    #[cfg(not(target_os = "espidf"))]
    started: bool,
}

#[cfg(target_os = "espidf")]
impl ApAdapter {
    pub fn new(
        modem: Modem,
        sysloop: EspSystemEventLoop,
        nvs: EspDefaultNvsPartition,
        ssid: &str,
        password: &str,
    ) -> Result<Self, ApError> {
        let ssid = checked_ssid(ssid)?;
        let password = checked_password(password)?;
        let driver =
            EspWifi::new(modem, sysloop.clone(), Some(nvs)).map_err(|_| ApError::PlatformFailed)?;
        let wifi = BlockingWifi::wrap(driver, sysloop).map_err(|_| ApError::PlatformFailed)?;
        Ok(Self {
            ssid,
            password,
            wifi,
        })
    }

    /// Configure and start the access point.
    pub fn start(&mut self) -> Result<(), ApError> {
        let auth_method = if self.password.is_empty() {
            AuthMethod::None
        } else {
            AuthMethod::WPA2Personal
        };
        let ap = AccessPointConfiguration {
            ssid: self.ssid.clone(),
            password: self.password.clone(),
            auth_method,
            ..Default::default()
        };
        self.wifi
            .set_configuration(&Configuration::AccessPoint(ap))
            .map_err(|_| ApError::PlatformFailed)?;
        self.wifi.start().map_err(|_| ApError::PlatformFailed)?;
        info!("wifi: AP '{}' up", self.ssid);
        Ok(())
    }

    /// Dotted-quad address clients should open once joined.
    pub fn ip(&self) -> String {
        self.wifi
            .wifi()
            .ap_netif()
            .get_ip_info()
            .map(|net| net.ip.to_string())
            .unwrap_or_else(|_| "0.0.0.0".into())
    }
}

#[cfg(not(target_os = "espidf"))]
impl ApAdapter {
    pub fn new(ssid: &str, password: &str) -> Result<Self, ApError> {
        Ok(Self {
            ssid: checked_ssid(ssid)?,
            password: checked_password(password)?,
            started: false,
        })
    }

    pub fn start(&mut self) -> Result<(), ApError> {
        self.started = true;
        info!("wifi(sim): AP '{}' up", self.ssid);
        Ok(())
    }

    pub fn ip(&self) -> String {
        "192.168.4.1".into()
    }
}

impl ApAdapter {
    pub fn ssid(&self) -> &str {
        &self.ssid
    }
}
