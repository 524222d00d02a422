//! Query a Minecraft Java Edition server with the
//! [Server List Ping](https://wiki.vg/Server_List_Ping) protocol and
//! summarise the answer as a [Report].

mod conf;
mod error;
mod motd;
mod report;
mod resolve;
mod server;
mod share;
mod varint;

pub use conf::{lookup, lookup_with, Conf, SocketConf, DEFAULT_PORT};
pub use error::QueryErr;
pub use report::{extract_count, extract_favicon, extract_motd, Report, Status};
pub use resolve::{SrvResolver, SystemResolver};
pub use server::{Component, Description, Player, Players, Server, Version};
pub use varint::{decode_varint, encode_varint};

use tracing::{debug, warn};

/// Whether this build can talk to servers at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Available,
    Unavailable,
}

impl Capability {
    /// The status client is compiled in with the `java-status` feature.
    pub fn detect() -> Self {
        if cfg!(feature = "java-status") {
            Capability::Available
        } else {
            Capability::Unavailable
        }
    }
}

/// Run one query for the process arguments `args` (program name first).
///
/// Every outcome is a [Report]; nothing here fails or panics on bad input
/// or an unreachable server.
pub fn run<I>(args: I) -> Report
where
    I: IntoIterator<Item = String>,
{
    if Capability::detect() == Capability::Unavailable {
        warn!("built without the java-status feature");
        return Report::unavailable();
    }

    let Some(addr) = args.into_iter().nth(1) else {
        return Report::no_host();
    };

    match lookup(&addr).and_then(|conf| conf.get_server_status()) {
        Ok(server) => {
            debug!(%addr, latency = ?server.latency, "server online");
            Report::from(&server)
        }
        Err(err) => {
            warn!(%addr, error = %err, "status query failed");
            Report::offline(&err)
        }
    }
}
