use crate::config::Config;
use crate::{Event, PrivilegeMode, ReplyMatching, Sequencer, TraceId};
use std::sync::Arc;
use std::time::Duration;

/// An `ICMP` reachability checker.
///
/// See the [`crate`] documentation for more information.
///
/// Note that this is type cheaply cloneable.
#[derive(Debug, Clone)]
pub struct Pinger {
    inner: Arc<inner::PingerInner>,
}

impl Pinger {
    /// Create a `Pinger`.
    ///
    /// Use the [`crate::Builder`] type to create a [`Pinger`].
    #[must_use]
    pub(crate) fn new(config: Config, trace_identifier: TraceId, sequencer: Arc<Sequencer>) -> Self {
        Self {
            inner: Arc::new(inner::PingerInner::new(
                config,
                trace_identifier,
                sequencer,
            )),
        }
    }

    /// Check whether `target` is reachable.
    ///
    /// The target may be a hostname or an `IPv4` address literal. This method blocks until an
    /// echo reply is received, or the count or deadline is exhausted. Progress is logged at
    /// `info` level.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # fn main() -> anyhow::Result<()> {
    /// use pingcheck_core::Builder;
    ///
    /// let pinger = Builder::new().count(Some(3)).build()?;
    /// if pinger.check_reachable("1.1.1.1") {
    ///     println!("up");
    /// }
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # See Also
    ///
    /// - [`Pinger::check_reachable_with`] - Check with a custom event handler.
    pub fn check_reachable(&self, target: &str) -> bool {
        self.inner.check_reachable(target, |_| ())
    }

    /// Check whether `target` is reachable, calling `func` for each [`Event`].
    ///
    /// # Example
    ///
    /// ```no_run
    /// # fn main() -> anyhow::Result<()> {
    /// use pingcheck_core::Builder;
    ///
    /// let pinger = Builder::new().count(Some(3)).build()?;
    /// let reachable = pinger.check_reachable_with("example.com", |event| println!("{event}"));
    /// # Ok(())
    /// # }
    /// ```
    pub fn check_reachable_with<F: FnMut(&Event<'_>)>(&self, target: &str, func: F) -> bool {
        self.inner.check_reachable(target, func)
    }

    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.inner.config().timeout
    }

    #[must_use]
    pub fn interval(&self) -> Option<Duration> {
        self.inner.config().interval
    }

    #[must_use]
    pub fn count(&self) -> Option<usize> {
        self.inner.config().count
    }

    #[must_use]
    pub fn deadline(&self) -> Option<Duration> {
        self.inner.config().deadline
    }

    #[must_use]
    pub fn privilege_mode(&self) -> PrivilegeMode {
        self.inner.config().privilege_mode
    }

    #[must_use]
    pub fn reply_matching(&self) -> ReplyMatching {
        self.inner.config().reply_matching
    }

    #[must_use]
    pub fn final_probe(&self) -> bool {
        self.inner.config().final_probe
    }

    #[must_use]
    pub fn trace_identifier(&self) -> TraceId {
        self.inner.trace_identifier()
    }

    /// The source of echo sequence numbers for this pinger.
    #[must_use]
    pub fn sequencer(&self) -> &Arc<Sequencer> {
        self.inner.sequencer()
    }
}

mod inner {
    use crate::config::Config;
    use crate::net::SocketImpl;
    use crate::{Controller, EchoProber, Event, Sequencer, TraceId};
    use pingcheck_dns::SystemResolver;
    use std::sync::Arc;
    use tracing::instrument;

    #[derive(Debug)]
    pub(super) struct PingerInner {
        config: Config,
        trace_identifier: TraceId,
        sequencer: Arc<Sequencer>,
    }

    impl PingerInner {
        pub(super) fn new(
            config: Config,
            trace_identifier: TraceId,
            sequencer: Arc<Sequencer>,
        ) -> Self {
            Self {
                config,
                trace_identifier,
                sequencer,
            }
        }

        #[instrument(skip(self, func), level = "trace")]
        pub(super) fn check_reachable<F: FnMut(&Event<'_>)>(&self, target: &str, mut func: F) -> bool {
            let prober = EchoProber::<SocketImpl>::new(
                self.trace_identifier,
                self.config.privilege_mode,
                self.config.reply_matching,
                Arc::clone(&self.sequencer),
            );
            Controller::new(&self.config, |event| {
                tracing::info!(%event);
                func(event);
            })
            .run(&SystemResolver, &prober, target)
        }

        pub(super) const fn config(&self) -> &Config {
            &self.config
        }

        pub(super) const fn trace_identifier(&self) -> TraceId {
            self.trace_identifier
        }

        pub(super) const fn sequencer(&self) -> &Arc<Sequencer> {
            &self.sequencer
        }
    }
}
