use std::env;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AppSettings {
    pub server: ServerConfig,
    pub ftp: FtpConfig,
    pub usage: UsageConfig,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FtpConfig {
    /// Control connection address, always `host:port`.
    pub host: String,
    pub user: String,
    pub password: String,
    /// Directory whose children are the tenant directories.
    pub root_path: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UsageConfig {
    pub total_capacity_gb: f64,
    pub refresh_interval_secs: u64,
    /// Upper bound on one whole refresh cycle, connect included.
    pub refresh_timeout_secs: u64,
}

impl AppSettings {
    pub fn from_env() -> Result<Self, AppError> {
        // Server config
        let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()
            .map_err(|_| {
                AppError::Configuration("SERVER_PORT must be a valid port number".to_string())
            })?;

        // CORS origins
        let cors_origins = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .collect();

        // FTP connection
        let ftp_host = env::var("FTPHOST")
            .map_err(|_| AppError::Configuration("FTPHOST must be set".to_string()))?;

        let ftp_user = env::var("FTPUSER")
            .map_err(|_| AppError::Configuration("FTPUSER must be set".to_string()))?;

        let ftp_password = env::var("FTPPASS")
            .map_err(|_| AppError::Configuration("FTPPASS must be set".to_string()))?;

        let ftp_root = env::var("FTPPATH")
            .map_err(|_| AppError::Configuration("FTPPATH must be set".to_string()))?;

        // Usage accounting
        let total_capacity_gb = env::var("TOTAL_CAPACITY_GB")
            .unwrap_or_else(|_| "40".to_string())
            .parse::<f64>()
            .map_err(|_| {
                AppError::Configuration("TOTAL_CAPACITY_GB must be a number".to_string())
            })?;

        if total_capacity_gb <= 0.0 {
            return Err(AppError::Configuration(
                "TOTAL_CAPACITY_GB must be positive".to_string(),
            ));
        }

        let refresh_interval_secs = env::var("REFRESH_INTERVAL_SECS")
            .unwrap_or_else(|_| "180".to_string())
            .parse::<u64>()
            .map_err(|_| {
                AppError::Configuration("REFRESH_INTERVAL_SECS must be a valid number".to_string())
            })?;

        let refresh_timeout_secs = env::var("REFRESH_TIMEOUT_SECS")
            .unwrap_or_else(|_| "120".to_string())
            .parse::<u64>()
            .map_err(|_| {
                AppError::Configuration("REFRESH_TIMEOUT_SECS must be a valid number".to_string())
            })?;

        Ok(AppSettings {
            server: ServerConfig {
                host: server_host,
                port: server_port,
                cors_origins,
            },
            ftp: FtpConfig {
                host: normalize_ftp_host(ftp_host),
                user: ftp_user,
                password: ftp_password,
                root_path: ftp_root,
            },
            usage: UsageConfig {
                total_capacity_gb,
                refresh_interval_secs,
                refresh_timeout_secs,
            },
        })
    }
}

/// Appends the default FTP control port when the host carries none.
fn normalize_ftp_host(host: String) -> String {
    if host.contains(':') {
        host
    } else {
        format!("{host}:21")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_host_gets_default_port() {
        assert_eq!(normalize_ftp_host("mail.example.com".to_string()), "mail.example.com:21");
    }

    #[test]
    fn explicit_port_is_kept() {
        assert_eq!(normalize_ftp_host("mail.example.com:2121".to_string()), "mail.example.com:2121");
    }
}
