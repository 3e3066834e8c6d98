use anyhow::anyhow;
use clap::ValueEnum;
use pingcheck_core::{defaults, PrivilegeMode, ReplyMatching};
use pingcheck_privilege::Privilege;
use std::time::Duration;

mod cmd;
mod constants;

pub use cmd::Args;
pub use constants::{EXIT_CONFIG_ERROR, EXIT_UNREACHABLE};

/// How to format log data.
#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
pub enum LogFormat {
    /// Display log data in a compact format.
    Compact,
    /// Display log data in a pretty format.
    Pretty,
    /// Display log data in the full default format.
    Full,
    /// Display log data in a json format.
    Json,
}

/// A duration given on the command line, where a negative value means unbounded.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum DurationLimit {
    Unbounded,
    Bounded(Duration),
}

impl DurationLimit {
    const fn bounded(self) -> Option<Duration> {
        match self {
            Self::Unbounded => None,
            Self::Bounded(duration) => Some(duration),
        }
    }
}

/// Fully parsed and validated configuration.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct PingcheckConfig {
    pub target: String,
    pub timeout: Option<Duration>,
    pub interval: Option<Duration>,
    pub count: Option<usize>,
    pub deadline: Option<Duration>,
    pub privilege_mode: PrivilegeMode,
    pub reply_matching: ReplyMatching,
    pub final_probe: bool,
    pub verbose: bool,
    pub log_format: LogFormat,
    pub log_filter: String,
}

impl PingcheckConfig {
    pub fn from(args: Args, privilege: &Privilege) -> anyhow::Result<Self> {
        let has_privileges = privilege.has_privileges();
        let needs_privileges = privilege.needs_privileges();
        let privilege_mode = if args.unprivileged {
            PrivilegeMode::Unprivileged
        } else {
            defaults::DEFAULT_PRIVILEGE_MODE
        };
        let reply_matching = if args.accept_any_reply {
            ReplyMatching::FirstDatagram
        } else {
            defaults::DEFAULT_REPLY_MATCHING
        };
        // a zero timeout waits indefinitely
        let timeout = args.timeout.map_or(defaults::DEFAULT_TIMEOUT, |timeout| {
            timeout.bounded().filter(|timeout| !timeout.is_zero())
        });
        let interval = args
            .interval
            .map_or(defaults::DEFAULT_INTERVAL, DurationLimit::bounded);
        let deadline = args
            .deadline
            .map_or(defaults::DEFAULT_DEADLINE, DurationLimit::bounded);
        let count = match args.count {
            None => defaults::DEFAULT_COUNT,
            Some(count) if count < 0 => None,
            Some(count) => Some(usize::try_from(count)?),
        };
        let final_probe = defaults::DEFAULT_FINAL_PROBE && !args.no_final_probe;
        let verbose = args.verbose || args.log_filter.is_some();
        let log_format = args.log_format.unwrap_or(constants::DEFAULT_LOG_FORMAT);
        let log_filter = args
            .log_filter
            .unwrap_or_else(|| String::from(constants::DEFAULT_LOG_FILTER));
        validate_privilege(privilege_mode, has_privileges, needs_privileges)?;
        validate_deadline(deadline)?;
        Ok(Self {
            target: args.target,
            timeout,
            interval,
            count,
            deadline,
            privilege_mode,
            reply_matching,
            final_probe,
            verbose,
            log_format,
            log_filter,
        })
    }
}

impl Default for PingcheckConfig {
    fn default() -> Self {
        Self {
            target: String::new(),
            timeout: defaults::DEFAULT_TIMEOUT,
            interval: defaults::DEFAULT_INTERVAL,
            count: defaults::DEFAULT_COUNT,
            deadline: defaults::DEFAULT_DEADLINE,
            privilege_mode: defaults::DEFAULT_PRIVILEGE_MODE,
            reply_matching: defaults::DEFAULT_REPLY_MATCHING,
            final_probe: defaults::DEFAULT_FINAL_PROBE,
            verbose: false,
            log_format: constants::DEFAULT_LOG_FORMAT,
            log_filter: String::from(constants::DEFAULT_LOG_FILTER),
        }
    }
}

fn validate_privilege(
    privilege_mode: PrivilegeMode,
    has_privileges: bool,
    needs_privileges: bool,
) -> anyhow::Result<()> {
    match (privilege_mode, has_privileges, needs_privileges) {
        (PrivilegeMode::Privileged, true, _) | (PrivilegeMode::Unprivileged, _, false) => Ok(()),
        (PrivilegeMode::Privileged, false, true) => Err(anyhow!("privileges are required")),
        (PrivilegeMode::Privileged, false, false) => Err(anyhow!(
            "privileges are required (hint: try adding -u to run in unprivileged mode)"
        )),
        (PrivilegeMode::Unprivileged, false, true) => {
            Err(anyhow!("unprivileged mode not supported on this platform"))
        }
        (PrivilegeMode::Unprivileged, true, true) => Err(anyhow!(
            "unprivileged mode not supported on this platform (hint: process is privileged so disable unprivileged mode)"
        )),
    }
}

fn validate_deadline(deadline: Option<Duration>) -> anyhow::Result<()> {
    if deadline.is_some_and(|deadline| deadline.is_zero()) {
        Err(anyhow!("deadline must be greater than zero"))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_config_default() {
        let config = parse_config("pingcheck example.com").unwrap();
        let expected = PingcheckConfig {
            target: String::from("example.com"),
            ..PingcheckConfig::default()
        };
        pretty_assertions::assert_eq!(expected, config);
    }

    #[test_case("pingcheck --version", Err(anyhow!(format!("pingcheck {}", env!("CARGO_PKG_VERSION")))); "show version")]
    #[test_case("pingcheck -V", Err(anyhow!(format!("pingcheck {}", env!("CARGO_PKG_VERSION")))); "show version short")]
    fn test_version(cmd: &str, expected: anyhow::Result<PingcheckConfig>) {
        compare(parse_config(cmd), expected);
    }

    #[test_case("pingcheck example.com --dummy", Err(anyhow!("error: unexpected argument '--dummy' found")); "invalid argument")]
    #[test_case("pingcheck example.com foo.com", Err(anyhow!("error: unexpected argument 'foo.com' found")); "two targets")]
    fn test_unexpected(cmd: &str, expected: anyhow::Result<PingcheckConfig>) {
        compare_lines(parse_config(cmd), expected, 0);
    }

    #[test]
    fn test_missing_target() {
        let err = parse_config("pingcheck -c 3").unwrap_err();
        assert!(err
            .to_string()
            .contains("the following required arguments were not provided"));
    }

    #[test_case("pingcheck example.com", Ok(cfg().build()); "default timeout")]
    #[test_case("pingcheck example.com --timeout 500ms", Ok(cfg().timeout(Some(Duration::from_millis(500))).build()); "custom timeout")]
    #[test_case("pingcheck example.com -t 3s", Ok(cfg().timeout(Some(Duration::from_secs(3))).build()); "custom timeout short")]
    #[test_case("pingcheck example.com -t 0", Ok(cfg().timeout(None).build()); "zero timeout")]
    #[test_case("pingcheck example.com -t -1", Ok(cfg().timeout(None).build()); "negative timeout")]
    #[test_case("pingcheck example.com -t soon", Err(anyhow!("error: invalid value 'soon' for '--timeout <TIMEOUT>': expected number at 0 For more information, try '--help'.")); "invalid timeout")]
    fn test_timeout(cmd: &str, expected: anyhow::Result<PingcheckConfig>) {
        compare(parse_config(cmd), expected);
    }

    #[test_case("pingcheck example.com", Ok(cfg().interval(None).build()); "default interval")]
    #[test_case("pingcheck example.com --interval 1s", Ok(cfg().interval(Some(Duration::from_secs(1))).build()); "custom interval")]
    #[test_case("pingcheck example.com -i 250ms", Ok(cfg().interval(Some(Duration::from_millis(250))).build()); "custom interval short")]
    #[test_case("pingcheck example.com -i -1", Ok(cfg().interval(None).build()); "no interval")]
    fn test_interval(cmd: &str, expected: anyhow::Result<PingcheckConfig>) {
        compare(parse_config(cmd), expected);
    }

    #[test_case("pingcheck example.com", Ok(cfg().count(None).build()); "default count")]
    #[test_case("pingcheck example.com --count 5", Ok(cfg().count(Some(5)).build()); "custom count")]
    #[test_case("pingcheck example.com -c 0", Ok(cfg().count(Some(0)).build()); "zero count")]
    #[test_case("pingcheck example.com -c -1", Ok(cfg().count(None).build()); "unlimited count")]
    #[test_case("pingcheck example.com -c foo", Err(anyhow!("error: invalid value 'foo' for '--count <COUNT>': invalid digit found in string For more information, try '--help'.")); "invalid count")]
    fn test_count(cmd: &str, expected: anyhow::Result<PingcheckConfig>) {
        compare(parse_config(cmd), expected);
    }

    #[test_case("pingcheck example.com", Ok(cfg().deadline(None).build()); "default deadline")]
    #[test_case("pingcheck example.com --deadline 10s", Ok(cfg().deadline(Some(Duration::from_secs(10))).build()); "custom deadline")]
    #[test_case("pingcheck example.com -w 5s", Ok(cfg().deadline(Some(Duration::from_secs(5))).build()); "custom deadline short")]
    #[test_case("pingcheck example.com -w -1", Ok(cfg().deadline(None).build()); "unlimited deadline")]
    #[test_case("pingcheck example.com -w 0", Err(anyhow!("deadline must be greater than zero")); "zero deadline")]
    fn test_deadline(cmd: &str, expected: anyhow::Result<PingcheckConfig>) {
        compare(parse_config(cmd), expected);
    }

    #[test_case("pingcheck example.com", Ok(cfg().reply_matching(ReplyMatching::Strict).build()); "default reply matching")]
    #[test_case("pingcheck example.com --accept-any-reply", Ok(cfg().reply_matching(ReplyMatching::FirstDatagram).build()); "accept any reply")]
    fn test_reply_matching(cmd: &str, expected: anyhow::Result<PingcheckConfig>) {
        compare(parse_config(cmd), expected);
    }

    #[test_case("pingcheck example.com", Ok(cfg().final_probe(true).build()); "default final probe")]
    #[test_case("pingcheck example.com --no-final-probe", Ok(cfg().final_probe(false).build()); "no final probe")]
    fn test_final_probe(cmd: &str, expected: anyhow::Result<PingcheckConfig>) {
        compare(parse_config(cmd), expected);
    }

    #[test_case("pingcheck example.com", Ok(cfg().verbose(false).build()); "default verbose")]
    #[test_case("pingcheck example.com --verbose", Ok(cfg().verbose(true).build()); "enable verbose")]
    #[test_case("pingcheck example.com -v", Ok(cfg().verbose(true).build()); "enable verbose short")]
    #[test_case("pingcheck example.com --log-filter trace", Ok(cfg().verbose(true).log_filter(String::from("trace")).build()); "log filter enables logging")]
    fn test_verbose(cmd: &str, expected: anyhow::Result<PingcheckConfig>) {
        compare(parse_config(cmd), expected);
    }

    #[test_case("pingcheck example.com", Ok(cfg().log_format(LogFormat::Compact).build()); "default log format")]
    #[test_case("pingcheck example.com --log-format pretty", Ok(cfg().log_format(LogFormat::Pretty).build()); "pretty log format")]
    #[test_case("pingcheck example.com --log-format full", Ok(cfg().log_format(LogFormat::Full).build()); "full log format")]
    #[test_case("pingcheck example.com --log-format json", Ok(cfg().log_format(LogFormat::Json).build()); "json log format")]
    #[test_case("pingcheck example.com --log-format foo", Err(anyhow!("error: invalid value 'foo' for '--log-format <LOG_FORMAT>' [possible values: compact, pretty, full, json] For more information, try '--help'.")); "invalid log format")]
    fn test_log_format(cmd: &str, expected: anyhow::Result<PingcheckConfig>) {
        compare(parse_config(cmd), expected);
    }

    #[test_case("pingcheck example.com", true, false, Ok(cfg().privilege_mode(PrivilegeMode::Privileged).build()); "default privilege mode")]
    #[test_case("pingcheck example.com --unprivileged", true, false, Ok(cfg().privilege_mode(PrivilegeMode::Unprivileged).build()); "unprivileged mode")]
    #[test_case("pingcheck example.com -u", true, false, Ok(cfg().privilege_mode(PrivilegeMode::Unprivileged).build()); "unprivileged mode short")]
    #[test_case("pingcheck example.com", true, true, Ok(cfg().privilege_mode(PrivilegeMode::Privileged).build()); "has privilege and needs")]
    #[test_case("pingcheck example.com", false, false, Err(anyhow!("privileges are required (hint: try adding -u to run in unprivileged mode)")); "no privilege and not needs")]
    #[test_case("pingcheck example.com", false, true, Err(anyhow!("privileges are required")); "no privilege and needs")]
    #[test_case("pingcheck example.com -u", false, false, Ok(cfg().privilege_mode(PrivilegeMode::Unprivileged).build()); "no privilege and not needs in unprivileged mode")]
    #[test_case("pingcheck example.com -u", false, true, Err(anyhow!("unprivileged mode not supported on this platform")); "no privilege and needs in unprivileged mode")]
    #[test_case("pingcheck example.com -u", true, true, Err(anyhow!("unprivileged mode not supported on this platform (hint: process is privileged so disable unprivileged mode)")); "privilege and needs in unprivileged mode")]
    fn test_privilege(
        cmd: &str,
        has_privileges: bool,
        needs_privileges: bool,
        expected: anyhow::Result<PingcheckConfig>,
    ) {
        compare(
            parse_config_with_privileges(cmd, has_privileges, needs_privileges),
            expected,
        );
    }

    fn parse_config(cmd: &str) -> anyhow::Result<PingcheckConfig> {
        parse_config_with_privileges(cmd, true, false)
    }

    fn parse_config_with_privileges(
        cmd: &str,
        has_privileges: bool,
        needs_privileges: bool,
    ) -> anyhow::Result<PingcheckConfig> {
        let args = parse(cmd)?;
        let privilege = Privilege::new(has_privileges, needs_privileges);
        PingcheckConfig::from(args, &privilege)
    }

    fn parse(cmd: &str) -> anyhow::Result<Args> {
        use clap::Parser;
        Ok(Args::try_parse_from(
            cmd.split(' ').map(std::ffi::OsString::from),
        )?)
    }

    fn compare(actual: anyhow::Result<PingcheckConfig>, expected: anyhow::Result<PingcheckConfig>) {
        match (actual, expected) {
            (Ok(cfg), Ok(exp)) => {
                pretty_assertions::assert_eq!(exp, cfg);
            }
            (Err(err), Err(exp_err)) => {
                pretty_assertions::assert_eq!(
                    remove_whitespace(exp_err.to_string()),
                    remove_whitespace(err.to_string())
                );
            }
            (Ok(_), Err(exp_err)) => {
                panic!("expected err {}", exp_err.to_string().trim());
            }
            (Err(err), Ok(_)) => {
                panic!("unexpected err {}", err.to_string().trim());
            }
        }
    }

    /// Compare only the given line of an error.
    fn compare_lines(
        actual: anyhow::Result<PingcheckConfig>,
        expected: anyhow::Result<PingcheckConfig>,
        line: usize,
    ) {
        let nth = |err: anyhow::Error| {
            err.to_string()
                .lines()
                .nth(line)
                .map(ToString::to_string)
                .unwrap_or_default()
        };
        match (actual, expected) {
            (Err(err), Err(exp_err)) => {
                pretty_assertions::assert_eq!(nth(exp_err), nth(err));
            }
            (actual, expected) => compare(actual, expected),
        }
    }

    fn remove_whitespace(mut s: String) -> String {
        s.retain(|c| !c.is_whitespace());
        s
    }

    fn cfg() -> PingcheckConfigBuilder {
        PingcheckConfigBuilder::new("example.com")
    }

    pub struct PingcheckConfigBuilder {
        config: PingcheckConfig,
    }

    impl PingcheckConfigBuilder {
        pub fn new(target: &str) -> Self {
            Self {
                config: PingcheckConfig {
                    target: String::from(target),
                    ..PingcheckConfig::default()
                },
            }
        }

        pub fn timeout(self, timeout: Option<Duration>) -> Self {
            Self {
                config: PingcheckConfig {
                    timeout,
                    ..self.config
                },
            }
        }

        pub fn interval(self, interval: Option<Duration>) -> Self {
            Self {
                config: PingcheckConfig {
                    interval,
                    ..self.config
                },
            }
        }

        pub fn count(self, count: Option<usize>) -> Self {
            Self {
                config: PingcheckConfig {
                    count,
                    ..self.config
                },
            }
        }

        pub fn deadline(self, deadline: Option<Duration>) -> Self {
            Self {
                config: PingcheckConfig {
                    deadline,
                    ..self.config
                },
            }
        }

        pub fn privilege_mode(self, privilege_mode: PrivilegeMode) -> Self {
            Self {
                config: PingcheckConfig {
                    privilege_mode,
                    ..self.config
                },
            }
        }

        pub fn reply_matching(self, reply_matching: ReplyMatching) -> Self {
            Self {
                config: PingcheckConfig {
                    reply_matching,
                    ..self.config
                },
            }
        }

        pub fn final_probe(self, final_probe: bool) -> Self {
            Self {
                config: PingcheckConfig {
                    final_probe,
                    ..self.config
                },
            }
        }

        pub fn verbose(self, verbose: bool) -> Self {
            Self {
                config: PingcheckConfig {
                    verbose,
                    ..self.config
                },
            }
        }

        pub fn log_format(self, log_format: LogFormat) -> Self {
            Self {
                config: PingcheckConfig {
                    log_format,
                    ..self.config
                },
            }
        }

        pub fn log_filter(self, log_filter: String) -> Self {
            Self {
                config: PingcheckConfig {
                    log_filter,
                    ..self.config
                },
            }
        }

        pub fn build(self) -> PingcheckConfig {
            self.config
        }
    }
}
