use crate::resolver::{Error, Resolver, Result};
use std::net::{IpAddr, Ipv4Addr};
use tracing::instrument;

/// Resolves targets with the operating system resolver (`getaddrinfo`).
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemResolver;

impl Resolver for SystemResolver {
    #[instrument(skip(self), level = "trace")]
    fn lookup(&self, target: &str) -> Result<Ipv4Addr> {
        if let Ok(addr) = target.parse::<IpAddr>() {
            return literal(target, addr);
        }
        let all =
            dns_lookup::lookup_host(target).map_err(|err| Error::LookupFailed(Box::new(err)))?;
        tracing::debug!(target, addrs = ?all);
        first_ipv4(target, all)
    }
}

fn literal(target: &str, addr: IpAddr) -> Result<Ipv4Addr> {
    match addr {
        IpAddr::V4(addr) => Ok(addr),
        IpAddr::V6(_) => Err(Error::NoIpv4Addr(target.to_string())),
    }
}

fn first_ipv4(target: &str, addrs: impl IntoIterator<Item = IpAddr>) -> Result<Ipv4Addr> {
    addrs
        .into_iter()
        .find_map(|addr| match addr {
            IpAddr::V4(addr) => Some(addr),
            IpAddr::V6(_) => None,
        })
        .ok_or_else(|| Error::NoIpv4Addr(target.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv6Addr;
    use test_case::test_case;

    #[test_case("1.1.1.1", Some(Ipv4Addr::new(1, 1, 1, 1)); "ipv4 literal")]
    #[test_case("127.0.0.1", Some(Ipv4Addr::LOCALHOST); "loopback literal")]
    #[test_case("::1", None; "ipv6 literal")]
    fn test_literal(target: &str, expected: Option<Ipv4Addr>) -> anyhow::Result<()> {
        let addr = target.parse::<IpAddr>()?;
        assert_eq!(expected, literal(target, addr).ok());
        Ok(())
    }

    #[test]
    fn test_first_ipv4_skips_ipv6() {
        let addrs = [
            IpAddr::V6(Ipv6Addr::LOCALHOST),
            IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1)),
            IpAddr::V4(Ipv4Addr::new(10, 0, 0, 2)),
        ];
        assert_eq!(
            Ipv4Addr::new(10, 0, 0, 1),
            first_ipv4("example.com", addrs).unwrap()
        );
    }

    #[test]
    fn test_first_ipv4_none() {
        let err = first_ipv4("example.com", [IpAddr::V6(Ipv6Addr::LOCALHOST)]).unwrap_err();
        assert_eq!("no IPv4 address found for example.com", err.to_string());
    }

    #[test]
    fn test_lookup_literal_does_not_query() -> anyhow::Result<()> {
        assert_eq!(Ipv4Addr::new(192, 0, 2, 7), SystemResolver.lookup("192.0.2.7")?);
        Ok(())
    }
}
