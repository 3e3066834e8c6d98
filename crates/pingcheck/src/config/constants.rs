use crate::config::LogFormat;

/// The default value for `log-format`.
pub const DEFAULT_LOG_FORMAT: LogFormat = LogFormat::Compact;

/// The default value for `log-filter`.
pub const DEFAULT_LOG_FILTER: &str = "pingcheck=debug";

/// The exit status when the target did not reply.
pub const EXIT_UNREACHABLE: u8 = 1;

/// The exit status when the configuration is invalid.
pub const EXIT_CONFIG_ERROR: u8 = 3;
