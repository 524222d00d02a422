use crate::{
    resolve::{SrvResolver, SystemResolver, SRV_PREFIX},
    server, QueryErr, Server,
};
use std::{
    net::{IpAddr, SocketAddr, ToSocketAddrs},
    time::Duration,
};
use tracing::debug;

/// Port used by Java Edition servers when none is given.
pub const DEFAULT_PORT: u16 = 25565;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);

/// Main struct used for configuring the connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conf {
    /// Server IP address or a domain name.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// See [SocketConf].
    pub socket_conf: SocketConf,
}

/// Additional socket configuration.
///
/// Every timeout defaults to three seconds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocketConf {
    /// Timeout for establishing the TCP connection, per resolved address.
    pub connect_timeout: Option<Duration>,
    /// Set the read timeout for socket.
    pub read_time_out: Option<Duration>,
    /// Set the write timeout for socket.
    pub write_timeout: Option<Duration>,
}

impl Default for SocketConf {
    fn default() -> Self {
        Self {
            connect_timeout: Some(DEFAULT_TIMEOUT),
            read_time_out: Some(DEFAULT_TIMEOUT),
            write_timeout: Some(DEFAULT_TIMEOUT),
        }
    }
}

impl ToSocketAddrs for Conf {
    type Iter = std::vec::IntoIter<SocketAddr>;

    fn to_socket_addrs(&self) -> std::io::Result<Self::Iter> {
        (&*self.host, self.port).to_socket_addrs()
    }
}

impl std::fmt::Display for Conf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

impl Conf {
    /// Create a connection configuration using the default port(25565).
    ///
    /// # Examples
    ///
    /// ```
    /// # use mcstatus_query::{Conf, SocketConf};
    /// #
    /// let conf = Conf::create("www.example.com");
    /// #
    /// # assert_eq!(conf.host, "www.example.com");
    /// # assert_eq!(conf.port, 25565);
    /// # assert_eq!(conf.socket_conf, SocketConf::default());
    /// ```
    pub fn create(host: &str) -> Self {
        Self::create_with_port(host, DEFAULT_PORT)
    }

    /// Create a connection configuration using the specified port.
    pub fn create_with_port(host: &str, port: u16) -> Self {
        Self {
            host: host.trim().into(),
            port,
            socket_conf: SocketConf::default(),
        }
    }

    /// Create a connection configuration from `host` or `host:port`.
    ///
    /// The port is split off at the last colon. IPv6 literals are written
    /// as `[addr]:port`, or as a bare `addr` to use the default port. If
    /// the port cannot be converted to [u16], a [QueryErr] is returned.
    ///
    /// # Example
    ///
    /// ```
    /// # use mcstatus_query::{Conf, QueryErr};
    /// #
    /// # fn main() -> Result<(), QueryErr> {
    ///     let conf = Conf::create_from_str("www.example.com:25566")?;
    /// #
    /// #   assert_eq!(conf.host, "www.example.com");
    /// #   assert_eq!(conf.port, 25566);
    /// #
    /// #   let conf = Conf::create_from_str("www.example.com")?;
    /// #   assert_eq!(conf.port, 25565);
    /// #   let conf = Conf::create_from_str("www.example.com:-1");
    /// #   assert!(conf.is_err());
    /// #   Ok(())
    /// # }
    /// ```
    pub fn create_from_str(addr: &str) -> Result<Self, QueryErr> {
        let (host, port) = split_host_port(addr)?;

        Ok(Self::create_with_port(host, port.unwrap_or(DEFAULT_PORT)))
    }

    /// Get info from a modern Java Edition server.
    ///
    /// Using the [Server List Ping](https://wiki.vg/Server_List_Ping#Current_.281.7.2B.29) protocol.
    /// Suitable for Java Edition servers version 1.7 and above. Return type is [Server].
    ///
    /// # Example
    ///
    /// ```no_run
    /// use mcstatus_query::{Conf, QueryErr};
    ///
    /// fn main() -> Result<(), QueryErr> {
    ///     let server = Conf::create("www.example.com");
    ///     let info = server.get_server_status()?;
    ///
    ///     Ok(())
    /// }
    /// ```
    pub fn get_server_status(&self) -> Result<Server, QueryErr> {
        server::get_server_status(self)
    }
}

/// Resolve a `host` or `host:port` string into a [Conf].
///
/// Without a port, the `_minecraft._tcp.<host>` SRV record is tried first
/// and its target is used when present. Otherwise this is the same as
/// [Conf::create_from_str].
pub fn lookup(addr: &str) -> Result<Conf, QueryErr> {
    lookup_with(addr, &SystemResolver)
}

/// [lookup] with a chosen [SrvResolver].
pub fn lookup_with<R: SrvResolver>(addr: &str, resolver: &R) -> Result<Conf, QueryErr> {
    let (host, port) = split_host_port(addr)?;

    if let Some(port) = port {
        return Ok(Conf::create_with_port(host, port));
    }

    // IP literals have no SRV records.
    if host.is_empty() || host.parse::<IpAddr>().is_ok() {
        return Ok(Conf::create(host));
    }

    match resolver.resolve_srv(&format!("{}{}", SRV_PREFIX, host)) {
        Some((target, port)) => {
            debug!(%host, %target, port, "using SRV record");
            Ok(Conf::create_with_port(&target, port))
        }
        None => Ok(Conf::create(host)),
    }
}

/// Split `addr` into host and the port, if one is written.
fn split_host_port(addr: &str) -> Result<(&str, Option<u16>), QueryErr> {
    let addr = addr.trim();

    // Bracketed IPv6, with or without a port.
    if let Some(rest) = addr.strip_prefix('[') {
        return match rest.split_once(']') {
            Some((host, "")) => Ok((host, None)),
            Some((host, port)) => match port.strip_prefix(':') {
                Some(port) => Ok((host, Some(parse_port(port)?))),
                None => Err(QueryErr::DataErr(format!(
                    "Invalid IPv6 socket address syntax: {}",
                    addr
                ))),
            },
            None => Err(QueryErr::DataErr(format!(
                "Invalid IPv6 socket address syntax: {}",
                addr
            ))),
        };
    }

    match addr.rsplit_once(':') {
        // A bare IPv6 literal has more than one colon.
        Some((host, _)) if host.contains(':') => Ok((addr, None)),
        Some((host, port)) => Ok((host, Some(parse_port(port)?))),
        None => Ok((addr, None)),
    }
}

fn parse_port(port: &str) -> Result<u16, QueryErr> {
    port.trim()
        .parse::<u16>()
        .map_err(|_| QueryErr::DataErr(format!("Invalid port: {}", port)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Answers with a fixed record and remembers what was asked.
    #[derive(Default)]
    struct FixedSrv {
        answer: Option<(String, u16)>,
        asked: RefCell<Vec<String>>,
    }

    impl SrvResolver for FixedSrv {
        fn resolve_srv(&self, name: &str) -> Option<(String, u16)> {
            self.asked.borrow_mut().push(name.to_string());
            self.answer.clone()
        }
    }

    #[test]
    fn bare_host_uses_the_srv_record() {
        let srv = FixedSrv {
            answer: Some(("mc1.example.net".into(), 25577)),
            ..Default::default()
        };
        let conf = lookup_with("example.net", &srv).unwrap();

        assert_eq!(conf.host, "mc1.example.net");
        assert_eq!(conf.port, 25577);
        assert_eq!(*srv.asked.borrow(), vec!["_minecraft._tcp.example.net"]);
    }

    #[test]
    fn missing_srv_record_falls_back_to_default_port() {
        let srv = FixedSrv::default();
        let conf = lookup_with("example.net", &srv).unwrap();

        assert_eq!(conf.host, "example.net");
        assert_eq!(conf.port, DEFAULT_PORT);
        assert_eq!(srv.asked.borrow().len(), 1);
    }

    #[test]
    fn explicit_ports_and_ip_literals_skip_srv() {
        let srv = FixedSrv {
            answer: Some(("elsewhere".into(), 1)),
            ..Default::default()
        };

        assert_eq!(lookup_with("example.net:25570", &srv).unwrap().port, 25570);
        assert_eq!(lookup_with("127.0.0.1", &srv).unwrap().host, "127.0.0.1");
        assert_eq!(lookup_with("[::1]", &srv).unwrap().host, "::1");
        assert!(srv.asked.borrow().is_empty());
    }

    #[test]
    fn splits_host_and_port() {
        let conf = Conf::create_from_str("play.example.com:25570").unwrap();
        assert_eq!(conf.host, "play.example.com");
        assert_eq!(conf.port, 25570);

        let conf = Conf::create_from_str(" 192.168.1.10 ").unwrap();
        assert_eq!(conf.host, "192.168.1.10");
        assert_eq!(conf.port, DEFAULT_PORT);
    }

    #[test]
    fn understands_ipv6_literals() {
        let conf = Conf::create_from_str("[::1]:25570").unwrap();
        assert_eq!(conf.host, "::1");
        assert_eq!(conf.port, 25570);
        assert_eq!(conf.to_string(), "[::1]:25570");

        let conf = Conf::create_from_str("[2001:db8::1]").unwrap();
        assert_eq!(conf.host, "2001:db8::1");
        assert_eq!(conf.port, DEFAULT_PORT);

        let conf = Conf::create_from_str("2001:db8::1").unwrap();
        assert_eq!(conf.host, "2001:db8::1");
        assert_eq!(conf.port, DEFAULT_PORT);

        assert!(Conf::create_from_str("[::1]25565").is_err());
        assert!(Conf::create_from_str("[::1").is_err());
    }

    #[test]
    fn rejects_ports_outside_u16() {
        for addr in ["example.com:", "example.com:abc", "example.com:65536"] {
            match Conf::create_from_str(addr) {
                Err(QueryErr::DataErr(msg)) => assert!(msg.starts_with("Invalid port")),
                other => panic!("{} should fail, got {:?}", addr, other),
            }
        }
    }
}
