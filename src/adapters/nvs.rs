//! NVS (Non-Volatile Storage) adapter.
//!
//! Implements [`ConfigPort`] over the ESP-IDF NVS partition: the whole
//! [`SystemConfig`] is one postcard blob under a single namespace/key.
//! All fields are range-checked on both save and load — a bad value is
//! rejected, never clamped. Writes are atomic per `nvs_commit()`.
//!
//! On non-espidf targets the backend is a plain in-memory slot (dev/test
//! only).

use log::info;

use crate::app::ports::{ConfigError, ConfigPort};
use crate::config::SystemConfig;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

/// Largest serialized config we ever expect; sized generously.
const CONFIG_BLOB_MAX: usize = 64;

#[cfg(target_os = "espidf")]
const CONFIG_NAMESPACE: &core::ffi::CStr = c"cctlume";
#[cfg(target_os = "espidf")]
const CONFIG_KEY: &core::ffi::CStr = c"syscfg";

pub struct NvsConfigStore {
    #[cfg(not(target_os = "espidf"))]
    blob: std::cell::RefCell<Option<Vec<u8>>>,
}

impl NvsConfigStore {
    /// Initialise NVS flash and return the store.
    ///
    /// On first boot or after an NVS version mismatch the partition is
    /// erased and re-initialised automatically.
    pub fn new() -> Result<Self, ConfigError> {
        #[cfg(target_os = "espidf")]
        {
            // SAFETY: nvs_flash_init / nvs_flash_erase run in the single
            // main-task context before any concurrent NVS access.
            let ret = unsafe { nvs_flash_init() };
            if ret == ESP_ERR_NVS_NO_FREE_PAGES || ret == ESP_ERR_NVS_NEW_VERSION_FOUND {
                log::warn!("NVS: erasing and re-initialising flash partition");
                if unsafe { nvs_flash_erase() } != ESP_OK {
                    return Err(ConfigError::IoError);
                }
                if unsafe { nvs_flash_init() } != ESP_OK {
                    return Err(ConfigError::IoError);
                }
            } else if ret != ESP_OK {
                return Err(ConfigError::IoError);
            }
            info!("NvsConfigStore: ESP-IDF NVS initialised");
        }

        #[cfg(not(target_os = "espidf"))]
        info!("NvsConfigStore: simulation backend");

        Ok(Self {
            #[cfg(not(target_os = "espidf"))]
            blob: std::cell::RefCell::new(None),
        })
    }

    /// Open the config namespace, run `f` with the handle, then close.
    #[cfg(target_os = "espidf")]
    fn with_handle<T>(write: bool, f: impl FnOnce(nvs_handle_t) -> Result<T, i32>) -> Result<T, i32> {
        let mode = if write {
            nvs_open_mode_t_NVS_READWRITE
        } else {
            nvs_open_mode_t_NVS_READONLY
        };

        let mut handle: nvs_handle_t = 0;
        // SAFETY: namespace is a NUL-terminated literal; the handle is
        // closed on every path below.
        let ret = unsafe { nvs_open(CONFIG_NAMESPACE.as_ptr(), mode, &mut handle) };
        if ret != ESP_OK {
            return Err(ret);
        }

        let result = f(handle);
        unsafe {
            nvs_close(handle);
        }
        result
    }
}

fn validate_config(cfg: &SystemConfig) -> Result<(), ConfigError> {
    if !(1200..=921_600).contains(&cfg.uart_baud) {
        return Err(ConfigError::ValidationFailed("uart_baud must be 1200–921600"));
    }
    if !(1..=1000).contains(&cfg.poll_interval_ms) {
        return Err(ConfigError::ValidationFailed("poll_interval_ms must be 1–1000"));
    }
    if !(1..=86_400).contains(&cfg.telemetry_interval_secs) {
        return Err(ConfigError::ValidationFailed(
            "telemetry_interval_secs must be 1–86400",
        ));
    }
    // startup_control_byte: any 8-bit value decodes to in-range fields.
    Ok(())
}

impl ConfigPort for NvsConfigStore {
    fn load(&self) -> Result<SystemConfig, ConfigError> {
        #[cfg(target_os = "espidf")]
        {
            let mut buf = [0u8; CONFIG_BLOB_MAX];
            let len = Self::with_handle(false, |handle| {
                let mut len = buf.len();
                // SAFETY: buf outlives the call; len is in/out.
                let ret = unsafe {
                    nvs_get_blob(handle, CONFIG_KEY.as_ptr(), buf.as_mut_ptr().cast(), &mut len)
                };
                if ret != ESP_OK {
                    return Err(ret);
                }
                Ok(len)
            })
            .map_err(|ret| {
                if ret == ESP_ERR_NVS_NOT_FOUND {
                    ConfigError::NotFound
                } else {
                    ConfigError::IoError
                }
            })?;

            let cfg: SystemConfig =
                postcard::from_bytes(&buf[..len]).map_err(|_| ConfigError::Corrupted)?;
            // Other tools can write this partition; a blob that decodes is
            // not necessarily in range, so loads re-validate too.
            validate_config(&cfg)?;
            Ok(cfg)
        }

        #[cfg(not(target_os = "espidf"))]
        {
            let cfg: SystemConfig = match self.blob.borrow().as_deref() {
                Some(bytes) => postcard::from_bytes(bytes).map_err(|_| ConfigError::Corrupted)?,
                None => return Err(ConfigError::NotFound),
            };
            validate_config(&cfg)?;
            Ok(cfg)
        }
    }

    fn save(&self, config: &SystemConfig) -> Result<(), ConfigError> {
        validate_config(config)?;

        let bytes = postcard::to_allocvec(config).map_err(|_| ConfigError::IoError)?;
        debug_assert!(bytes.len() <= CONFIG_BLOB_MAX);

        #[cfg(target_os = "espidf")]
        {
            Self::with_handle(true, |handle| {
                // SAFETY: bytes lives across both calls.
                let ret = unsafe {
                    nvs_set_blob(handle, CONFIG_KEY.as_ptr(), bytes.as_ptr().cast(), bytes.len())
                };
                if ret != ESP_OK {
                    return Err(ret);
                }
                let ret = unsafe { nvs_commit(handle) };
                if ret != ESP_OK {
                    return Err(ret);
                }
                Ok(())
            })
            .map_err(|_| ConfigError::IoError)?;
        }

        #[cfg(not(target_os = "espidf"))]
        {
            *self.blob.borrow_mut() = Some(bytes);
        }

        Ok(())
    }
}

#[cfg(all(test, not(target_os = "espidf")))]
mod tests {
    use super::*;

    #[test]
    fn save_then_load_roundtrips() {
        let store = NvsConfigStore::new().unwrap();
        assert_eq!(store.load(), Err(ConfigError::NotFound));

        let cfg = SystemConfig {
            uart_baud: 115_200,
            startup_control_byte: 0x3C,
            ..SystemConfig::default()
        };
        store.save(&cfg).unwrap();
        assert_eq!(store.load().unwrap(), cfg);
    }

    #[test]
    fn save_rejects_out_of_range_fields() {
        let store = NvsConfigStore::new().unwrap();

        let mut cfg = SystemConfig::default();
        cfg.uart_baud = 300;
        assert!(matches!(
            store.save(&cfg),
            Err(ConfigError::ValidationFailed(_))
        ));

        let mut cfg = SystemConfig::default();
        cfg.poll_interval_ms = 0;
        assert!(matches!(
            store.save(&cfg),
            Err(ConfigError::ValidationFailed(_))
        ));

        // Nothing invalid was persisted.
        assert_eq!(store.load(), Err(ConfigError::NotFound));
    }

    #[test]
    fn load_rejects_out_of_range_blob() {
        let store = NvsConfigStore::new().unwrap();

        // A blob written by another tool can decode fine while carrying
        // out-of-range values; a zero poll interval would divide the main
        // loop's telemetry pacing by zero.
        let mut cfg = SystemConfig::default();
        cfg.poll_interval_ms = 0;
        *store.blob.borrow_mut() = Some(postcard::to_allocvec(&cfg).unwrap());

        assert!(matches!(
            store.load(),
            Err(ConfigError::ValidationFailed(_))
        ));
    }
}
