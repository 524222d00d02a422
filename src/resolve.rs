use hickory_resolver::Resolver;
use std::cmp::Reverse;
use tracing::debug;

/// Prefix of the SRV record Java Edition clients look up for a bare host.
pub const SRV_PREFIX: &str = "_minecraft._tcp.";

/// Source of SRV answers, as `(target host, port)`.
pub trait SrvResolver {
    /// Resolve the SRV record `name`. Any failure means "no record".
    fn resolve_srv(&self, name: &str) -> Option<(String, u16)>;
}

/// Resolver using the system DNS configuration.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemResolver;

impl SrvResolver for SystemResolver {
    fn resolve_srv(&self, name: &str) -> Option<(String, u16)> {
        let resolver = match Resolver::from_system_conf() {
            Ok(resolver) => resolver,
            Err(err) => {
                debug!(error = %err, "no system resolver, skipping SRV lookup");
                return None;
            }
        };

        match resolver.srv_lookup(name) {
            Ok(answer) => answer
                .iter()
                .min_by_key(|srv| (srv.priority(), Reverse(srv.weight())))
                .map(|srv| {
                    (
                        srv.target().to_utf8().trim_end_matches('.').to_string(),
                        srv.port(),
                    )
                }),
            Err(err) => {
                debug!(%name, error = %err, "SRV lookup failed");
                None
            }
        }
    }
}
