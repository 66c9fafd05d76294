pub mod settings;

pub use settings::{AppSettings, FtpConfig, ServerConfig, UsageConfig};
