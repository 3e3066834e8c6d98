use crate::config::Config;
use crate::error::Result;
use crate::{Error, Pinger, PrivilegeMode, ReplyMatching, Sequencer, TraceId};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

/// Build a pinger.
///
/// This is a convenience builder to simplify the creation of a [`Pinger`].
///
/// # Examples
///
/// ```no_run
/// # fn main() -> anyhow::Result<()> {
/// use pingcheck_core::{Builder, PrivilegeMode};
/// use std::time::Duration;
///
/// let pinger = Builder::new()
///     .privilege_mode(PrivilegeMode::Unprivileged)
///     .timeout(Some(Duration::from_millis(500)))
///     .count(Some(3))
///     .build()?;
/// let reachable = pinger.check_reachable("example.com");
/// # Ok(())
/// # }
/// ```
///
/// # See Also
///
/// - [`Pinger`] - An `ICMP` reachability checker.
#[derive(Debug)]
pub struct Builder {
    timeout: Option<Duration>,
    interval: Option<Duration>,
    count: Option<usize>,
    deadline: Option<Duration>,
    privilege_mode: PrivilegeMode,
    reply_matching: ReplyMatching,
    final_probe: bool,
    trace_identifier: TraceId,
    sequencer: Option<Arc<Sequencer>>,
}

impl Default for Builder {
    fn default() -> Self {
        Self {
            timeout: Config::default().timeout,
            interval: Config::default().interval,
            count: Config::default().count,
            deadline: Config::default().deadline,
            privilege_mode: Config::default().privilege_mode,
            reply_matching: Config::default().reply_matching,
            final_probe: Config::default().final_probe,
            trace_identifier: TraceId::current(),
            sequencer: None,
        }
    }
}

impl Builder {
    /// Build a pinger builder with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the reply timeout for each probe.
    ///
    /// `None`, or a zero duration, waits for a reply indefinitely.
    #[must_use]
    pub fn timeout(self, timeout: Option<Duration>) -> Self {
        Self { timeout, ..self }
    }

    /// Set the minimum spacing between the start of consecutive probes.
    ///
    /// If not set then probes are sent back to back.
    #[must_use]
    pub fn interval(self, interval: Option<Duration>) -> Self {
        Self { interval, ..self }
    }

    /// Set the maximum number of probes.
    ///
    /// If not set then probes are sent until a reply is received or the deadline passes.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # fn main() -> anyhow::Result<()> {
    /// use pingcheck_core::Builder;
    ///
    /// let pinger = Builder::new().count(Some(5)).build()?;
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn count(self, count: Option<usize>) -> Self {
        Self { count, ..self }
    }

    /// Set the wall-clock budget for the whole check.
    ///
    /// A zero deadline is rejected by [`Builder::build`].
    #[must_use]
    pub fn deadline(self, deadline: Option<Duration>) -> Self {
        Self { deadline, ..self }
    }

    /// Set the privilege mode.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # fn main() -> anyhow::Result<()> {
    /// use pingcheck_core::{Builder, PrivilegeMode};
    ///
    /// let pinger = Builder::new()
    ///     .privilege_mode(PrivilegeMode::Unprivileged)
    ///     .build()?;
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn privilege_mode(self, privilege_mode: PrivilegeMode) -> Self {
        Self {
            privilege_mode,
            ..self
        }
    }

    /// Set how inbound datagrams are matched to the probe awaiting a reply.
    #[must_use]
    pub fn reply_matching(self, reply_matching: ReplyMatching) -> Self {
        Self {
            reply_matching,
            ..self
        }
    }

    /// Enable or disable the last-chance probe sent when the deadline is near.
    #[must_use]
    pub fn final_probe(self, final_probe: bool) -> Self {
        Self {
            final_probe,
            ..self
        }
    }

    /// Set the echo identifier.
    ///
    /// If not set then an identifier derived from the process id is used.
    #[must_use]
    pub fn trace_identifier(self, trace_id: u16) -> Self {
        Self {
            trace_identifier: TraceId(trace_id),
            ..self
        }
    }

    /// Share a sequence number source with other pingers.
    ///
    /// If not set then every pinger in the process draws from the same [`Sequencer`].
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # fn main() -> anyhow::Result<()> {
    /// use pingcheck_core::{Builder, Sequencer};
    /// use std::sync::Arc;
    ///
    /// let sequencer = Arc::new(Sequencer::new());
    /// let first = Builder::new().sequencer(Arc::clone(&sequencer)).build()?;
    /// let second = Builder::new().sequencer(sequencer).build()?;
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn sequencer(self, sequencer: Arc<Sequencer>) -> Self {
        Self {
            sequencer: Some(sequencer),
            ..self
        }
    }

    /// Build the [`Pinger`].
    ///
    /// # Errors
    ///
    /// This function will return `Error::BadConfig` if the configuration is invalid.
    pub fn build(self) -> Result<Pinger> {
        if self.deadline.is_some_and(|deadline| deadline.is_zero()) {
            return Err(Error::BadConfig(String::from(
                "deadline must be greater than zero",
            )));
        }
        let config = Config {
            timeout: self.timeout,
            interval: self.interval,
            count: self.count,
            deadline: self.deadline,
            privilege_mode: self.privilege_mode,
            reply_matching: self.reply_matching,
            final_probe: self.final_probe,
        };
        Ok(Pinger::new(
            config,
            self.trace_identifier,
            self.sequencer.unwrap_or_else(process_sequencer),
        ))
    }
}

/// The [`Sequencer`] used by pingers built without an explicit one.
fn process_sequencer() -> Arc<Sequencer> {
    static SEQUENCER: OnceLock<Arc<Sequencer>> = OnceLock::new();
    Arc::clone(SEQUENCER.get_or_init(|| Arc::new(Sequencer::new())))
}
