//! Environment-driven service configuration.
//!
//! The service is configured entirely through environment variables:
//!
//! | Variable              | Default                 | Purpose                      |
//! |-----------------------|-------------------------|------------------------------|
//! | `IPFS_API_URL`        | `http://127.0.0.1:5001` | IPFS node HTTP API address   |
//! | `PIN_DATA_DIR`        | `./data`                | Root of the on-disk state    |
//! | `PIN_BIND`            | `0.0.0.0:7070`          | Listen address               |
//! | `PIN_METRICS_ENABLED` | `true`                  | Prometheus endpoint gate     |

use std::path::PathBuf;

use pin_ipfs::IpfsConfig;

/// Runtime configuration for the API binary.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Listen address, `host:port`.
    pub bind_addr: String,
    /// Root of the on-disk state; `metadata/` and `uploads/` live under it.
    pub data_dir: PathBuf,
    /// Storage node configuration.
    pub ipfs: IpfsConfig,
}

impl ApiConfig {
    /// Read configuration from the environment, applying defaults.
    pub fn from_env() -> Self {
        let bind_addr =
            std::env::var("PIN_BIND").unwrap_or_else(|_| "0.0.0.0:7070".to_string());
        let data_dir = std::env::var("PIN_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./data"));
        Self {
            bind_addr,
            data_dir,
            ipfs: IpfsConfig::from_env(),
        }
    }

    /// Directory holding the persisted record index.
    pub fn metadata_dir(&self) -> PathBuf {
        self.data_dir.join("metadata")
    }

    /// Directory for transient per-request upload staging files.
    pub fn uploads_dir(&self) -> PathBuf {
        self.data_dir.join("uploads")
    }
}
