//! NVS (Non-Volatile Storage) adapter for the system configuration.
//!
//! Implements [`ConfigPort`]. The config travels as a postcard blob under a
//! single namespace/key; validation happens on every save so a bad blob can
//! never reach flash. On non-device targets an in-memory map stands in for
//! NVS so the load/save contract is testable on the host.

use log::{info, warn};

use crate::app::ports::{ConfigError, ConfigPort};
use crate::config::SystemConfig;

#[cfg(not(target_os = "espidf"))]
use std::{cell::RefCell, collections::HashMap};

#[cfg(target_os = "espidf")]
use esp_idf_sys::*;

const CONFIG_NAMESPACE: &str = "rumormill";
const CONFIG_KEY: &[u8] = b"syscfg\0";

/// Upper bound on the stored blob; anything larger is treated as corrupt.
#[cfg(target_os = "espidf")]
const MAX_BLOB_SIZE: usize = 2048;

pub struct NvsAdapter {
    #[cfg(not(target_os = "espidf"))]
    store: RefCell<HashMap<String, Vec<u8>>>,
}

impl NvsAdapter {
    /// Create the adapter and initialise NVS flash.
    ///
    /// On first boot or after a partition-layout change the NVS partition is
    /// erased and re-initialised automatically.
    pub fn new() -> Result<Self, ConfigError> {
        #[cfg(target_os = "espidf")]
        {
            // SAFETY: nvs_flash_init/erase run from the single main-task
            // context before any concurrent NVS access exists.
            let ret = unsafe { nvs_flash_init() };
            if ret == ESP_ERR_NVS_NO_FREE_PAGES || ret == ESP_ERR_NVS_NEW_VERSION_FOUND {
                warn!("nvs: erasing and re-initialising flash partition");
                if unsafe { nvs_flash_erase() } != ESP_OK {
                    return Err(ConfigError::IoError);
                }
                if unsafe { nvs_flash_init() } != ESP_OK {
                    return Err(ConfigError::IoError);
                }
            } else if ret != ESP_OK {
                return Err(ConfigError::IoError);
            }
            info!("nvs: flash initialised");
        }

        #[cfg(not(target_os = "espidf"))]
        info!("nvs(sim): in-memory backend");

        Ok(Self {
            #[cfg(not(target_os = "espidf"))]
            store: RefCell::new(HashMap::new()),
        })
    }

    /// Open the config namespace, run `f` with the handle, close it again.
    #[cfg(target_os = "espidf")]
    fn with_handle<T>(
        write: bool,
        f: impl FnOnce(nvs_handle_t) -> Result<T, i32>,
    ) -> Result<T, i32> {
        let mut ns_buf = [0u8; 16];
        let ns = CONFIG_NAMESPACE.as_bytes();
        ns_buf[..ns.len()].copy_from_slice(ns);

        let mode = if write {
            nvs_open_mode_t_NVS_READWRITE
        } else {
            nvs_open_mode_t_NVS_READONLY
        };

        let mut handle: nvs_handle_t = 0;
        // SAFETY: ns_buf is a valid NUL-terminated namespace string.
        let ret = unsafe { nvs_open(ns_buf.as_ptr().cast(), mode, &mut handle) };
        if ret != ESP_OK {
            return Err(ret);
        }
        let result = f(handle);
        // SAFETY: handle came from a successful nvs_open.
        unsafe { nvs_close(handle) };
        result
    }
}

impl ConfigPort for NvsAdapter {
    fn load(&self) -> Result<SystemConfig, ConfigError> {
        #[cfg(not(target_os = "espidf"))]
        {
            match self.store.borrow().get(CONFIG_NAMESPACE) {
                Some(bytes) => {
                    let cfg = postcard::from_bytes(bytes).map_err(|_| {
                        warn!("nvs(sim): stored config undecodable");
                        ConfigError::Corrupted
                    })?;
                    info!("nvs(sim): config loaded");
                    Ok(cfg)
                }
                None => {
                    info!("nvs(sim): no stored config, using defaults");
                    Ok(SystemConfig::default())
                }
            }
        }

        #[cfg(target_os = "espidf")]
        {
            let result = Self::with_handle(false, |handle| {
                let mut size: usize = 0;
                // SAFETY: size-query call per the NVS blob API contract.
                let ret = unsafe {
                    nvs_get_blob(handle, CONFIG_KEY.as_ptr().cast(), core::ptr::null_mut(), &mut size)
                };
                if ret != ESP_OK || size == 0 || size > MAX_BLOB_SIZE {
                    return Err(ret);
                }
                let mut buf = vec![0u8; size];
                // SAFETY: buf has exactly the queried size.
                let ret = unsafe {
                    nvs_get_blob(handle, CONFIG_KEY.as_ptr().cast(), buf.as_mut_ptr().cast(), &mut size)
                };
                if ret != ESP_OK {
                    return Err(ret);
                }
                Ok(buf)
            });

            match result {
                Ok(bytes) => {
                    let cfg =
                        postcard::from_bytes(&bytes).map_err(|_| ConfigError::Corrupted)?;
                    info!("nvs: config loaded");
                    Ok(cfg)
                }
                Err(ESP_ERR_NVS_NOT_FOUND) => {
                    info!("nvs: no stored config, using defaults");
                    Ok(SystemConfig::default())
                }
                Err(rc) => {
                    warn!("nvs: config read failed (rc={rc})");
                    Err(ConfigError::IoError)
                }
            }
        }
    }

    fn save(&self, config: &SystemConfig) -> Result<(), ConfigError> {
        config
            .validate()
            .map_err(ConfigError::ValidationFailed)?;
        let bytes = postcard::to_allocvec(config).map_err(|_| ConfigError::IoError)?;

        #[cfg(not(target_os = "espidf"))]
        {
            self.store
                .borrow_mut()
                .insert(CONFIG_NAMESPACE.to_string(), bytes);
            Ok(())
        }

        #[cfg(target_os = "espidf")]
        {
            let result = Self::with_handle(true, |handle| {
                // SAFETY: bytes outlives the call; key is NUL-terminated.
                let ret = unsafe {
                    nvs_set_blob(
                        handle,
                        CONFIG_KEY.as_ptr().cast(),
                        bytes.as_ptr().cast(),
                        bytes.len(),
                    )
                };
                if ret != ESP_OK {
                    return Err(ret);
                }
                // SAFETY: commit on an open handle.
                let ret = unsafe { nvs_commit(handle) };
                if ret != ESP_OK {
                    return Err(ret);
                }
                Ok(())
            });
            result.map_err(|rc| {
                warn!("nvs: config write failed (rc={rc})");
                ConfigError::IoError
            })
        }
    }
}
