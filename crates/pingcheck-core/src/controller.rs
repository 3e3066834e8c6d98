use crate::config::Config;
use crate::probe::{EchoReply, ProbeOutcome};
use crate::prober::Prober;
use pingcheck_dns::Resolver;
use std::fmt::{Display, Formatter};
use std::net::Ipv4Addr;
use std::thread;
use std::time::{Duration, Instant};
use tracing::instrument;

/// Progress of a reachability check.
///
/// The `Display` form of each event is the line reported to the user.
#[derive(Debug)]
pub enum Event<'a> {
    /// A probe is about to be sent.
    Probing { target: &'a str, addr: Ipv4Addr },
    /// A probe did not receive an echo reply.
    Failed {
        target: &'a str,
        addr: Ipv4Addr,
        outcome: &'a ProbeOutcome,
    },
    /// An echo reply was received; the check is complete.
    Reachable {
        target: &'a str,
        addr: Ipv4Addr,
        reply: &'a EchoReply,
    },
    /// The probe count or deadline was exhausted; the check is complete.
    Unreachable { target: &'a str, addr: Ipv4Addr },
    /// The target could not be resolved; the check is complete.
    ResolveFailed {
        target: &'a str,
        error: &'a pingcheck_dns::Error,
    },
}

impl Display for Event<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Probing { target, addr } => write!(f, "Ping {target} ({addr})"),
            Self::Failed { outcome, .. } => write!(f, "{outcome}"),
            Self::Reachable { target, addr, .. } => write!(f, "{target} ({addr}) is reachable"),
            Self::Unreachable { target, addr } => write!(f, "{target} ({addr}) is not reachable"),
            Self::ResolveFailed { target, error } => {
                write!(f, "failed to resolve {target}: {error}")
            }
        }
    }
}

/// Drives repeated probes of a single target until it replies or the limits are exhausted.
#[derive(Debug)]
pub struct Controller<F> {
    config: Config,
    publish: F,
}

impl<F: FnMut(&Event<'_>)> Controller<F> {
    /// Create a `Controller` which reports progress to `publish`.
    pub fn new(config: &Config, publish: F) -> Self {
        Self {
            config: *config,
            publish,
        }
    }

    /// Check whether `target` is reachable.
    ///
    /// Returns `true` as soon as a probe receives an echo reply.
    #[instrument(skip(self, resolver, prober), level = "trace")]
    pub fn run<R: Resolver, P: Prober>(&mut self, resolver: &R, prober: &P, target: &str) -> bool {
        let addr = match resolver.lookup(target) {
            Ok(addr) => addr,
            Err(error) => {
                (self.publish)(&Event::ResolveFailed {
                    target,
                    error: &error,
                });
                return false;
            }
        };
        let mut session = Session::start(addr, self.config.deadline);
        self.probe_until_done(prober, target, &mut session);
        tracing::debug!(
            target,
            %addr,
            attempts = session.attempts,
            reachable = session.reachable,
            "check complete"
        );
        session.reachable
    }

    fn probe_until_done<P: Prober>(&mut self, prober: &P, target: &str, session: &mut Session) {
        let addr = session.addr;
        while !self.count_exhausted(session) {
            if session.expired() {
                tracing::debug!(attempts = session.attempts, "deadline reached");
                break;
            }
            (self.publish)(&Event::Probing { target, addr });
            session.attempts += 1;
            let outcome = prober.probe(addr, self.config.timeout);
            if let ProbeOutcome::Success(reply) = &outcome {
                (self.publish)(&Event::Reachable {
                    target,
                    addr,
                    reply,
                });
                session.reachable = true;
                return;
            }
            (self.publish)(&Event::Failed {
                target,
                addr,
                outcome: &outcome,
            });
            self.last_chance_probe(prober, session);
            if session.expired() {
                tracing::debug!(attempts = session.attempts, "deadline reached");
                break;
            }
            self.pause(session);
        }
        (self.publish)(&Event::Unreachable { target, addr });
    }

    fn count_exhausted(&self, session: &Session) -> bool {
        matches!(self.config.count, Some(count) if session.attempts >= count)
    }

    /// Spend whatever remains of a near deadline on one more probe.
    ///
    /// The probe is not counted as an attempt and its outcome is not reported.
    fn last_chance_probe<P: Prober>(&self, prober: &P, session: &Session) {
        if !self.config.final_probe {
            return;
        }
        let Some(remaining) = session.remaining().filter(|remaining| !remaining.is_zero()) else {
            return;
        };
        let within_timeout = self.config.timeout.map_or(true, |timeout| remaining < timeout);
        if self.config.interval.is_none() || within_timeout {
            let outcome = prober.probe(session.addr, Some(remaining));
            tracing::debug!(?remaining, %outcome, "last chance probe");
        }
    }

    /// Sleep for the part of the interval not already spent waiting on the probe timeout.
    fn pause(&self, session: &Session) {
        let Some(interval) = self.config.interval else {
            return;
        };
        let residual = interval.saturating_sub(self.config.timeout.unwrap_or_default());
        let residual = session
            .remaining()
            .map_or(residual, |remaining| residual.min(remaining));
        if !residual.is_zero() {
            thread::sleep(residual);
        }
    }
}

/// The state of one reachability check.
#[derive(Debug)]
struct Session {
    addr: Ipv4Addr,
    deadline: Option<Instant>,
    attempts: usize,
    reachable: bool,
}

impl Session {
    fn start(addr: Ipv4Addr, deadline: Option<Duration>) -> Self {
        Self {
            addr,
            deadline: deadline.map(|deadline| Instant::now() + deadline),
            attempts: 0,
            reachable: false,
        }
    }

    /// Time left before the deadline, `None` if unbounded.
    fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    fn expired(&self) -> bool {
        self.remaining().is_some_and(|remaining| remaining.is_zero())
    }
}
