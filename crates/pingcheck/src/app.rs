use crate::config::{LogFormat, PingcheckConfig};
use pingcheck_core::{Builder, Pinger};
use std::io::Write;

/// Run the reachability check, returning whether the target replied.
///
/// Each event is written to stdout as it happens.
pub fn run_pingcheck(cfg: &PingcheckConfig) -> anyhow::Result<bool> {
    let pinger = make_pinger(cfg)?;
    tracing::debug!(?cfg, "starting check");
    let mut stdout = std::io::stdout().lock();
    Ok(pinger.check_reachable_with(&cfg.target, |event| {
        if let Err(err) = writeln!(stdout, "{event}") {
            tracing::warn!(%err, "failed to write event");
        }
    }))
}

/// Install the log subscriber; logs go to stderr.
pub fn configure_logging(cfg: &PingcheckConfig) {
    if cfg.verbose {
        let builder = tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(&cfg.log_filter);
        match cfg.log_format {
            LogFormat::Compact => builder.compact().init(),
            LogFormat::Pretty => builder.pretty().init(),
            LogFormat::Full => builder.init(),
            LogFormat::Json => builder.json().init(),
        }
    }
}

fn make_pinger(cfg: &PingcheckConfig) -> anyhow::Result<Pinger> {
    Ok(Builder::new()
        .timeout(cfg.timeout)
        .interval(cfg.interval)
        .count(cfg.count)
        .deadline(cfg.deadline)
        .privilege_mode(cfg.privilege_mode)
        .reply_matching(cfg.reply_matching)
        .final_probe(cfg.final_probe)
        .build()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pingcheck_core::{PrivilegeMode, ReplyMatching};
    use std::time::Duration;

    #[test]
    fn test_make_pinger() -> anyhow::Result<()> {
        let cfg = PingcheckConfig {
            target: String::from("example.com"),
            timeout: Some(Duration::from_millis(100)),
            count: Some(3),
            deadline: Some(Duration::from_secs(1)),
            privilege_mode: PrivilegeMode::Unprivileged,
            reply_matching: ReplyMatching::FirstDatagram,
            final_probe: false,
            ..PingcheckConfig::default()
        };
        let pinger = make_pinger(&cfg)?;
        assert_eq!(Some(Duration::from_millis(100)), pinger.timeout());
        assert_eq!(Some(3), pinger.count());
        assert_eq!(Some(Duration::from_secs(1)), pinger.deadline());
        assert_eq!(PrivilegeMode::Unprivileged, pinger.privilege_mode());
        assert_eq!(ReplyMatching::FirstDatagram, pinger.reply_matching());
        assert!(!pinger.final_probe());
        Ok(())
    }

    #[test]
    fn test_make_pinger_zero_deadline() {
        let cfg = PingcheckConfig {
            deadline: Some(Duration::ZERO),
            ..PingcheckConfig::default()
        };
        let err = make_pinger(&cfg).unwrap_err();
        assert_eq!(
            "invalid config: deadline must be greater than zero",
            err.to_string()
        );
    }
}
