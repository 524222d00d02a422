use crate::{server::Description, QueryErr, Server};
use serde::{ser::SerializeStruct, Serialize, Serializer};
use serde_json::Value;
use tracing::warn;

const NO_HOST: &str = "no_host";
const NO_MCSTATUS: &str = "no_mcstatus";
const FAVICON_KEYS: [&str; 2] = ["favicon", "icon"];

/// The single JSON line the program prints.
///
/// The `online` key is derived from the variant, so an online report
/// always says `true` and an offline one `false`.
#[derive(Debug, Clone, PartialEq)]
pub enum Report {
    /// The server answered the status request.
    Online(Status),
    /// The query failed, or no host was given.
    Offline { error: String },
    /// The status client is not part of this build.
    Unavailable,
}

/// Fields of an online report, with defaults already applied.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Status {
    pub players: u64,
    pub max_players: u64,
    pub motd: String,
    pub version: String,
    pub favicon: Option<String>,
}

impl Serialize for Report {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Report::Online(status) => {
                let mut line = serializer.serialize_struct("Report", 6)?;
                line.serialize_field("online", &true)?;
                line.serialize_field("players", &status.players)?;
                line.serialize_field("maxPlayers", &status.max_players)?;
                line.serialize_field("motd", &status.motd)?;
                line.serialize_field("version", &status.version)?;
                line.serialize_field("favicon", &status.favicon)?;
                line.end()
            }
            Report::Offline { error } => {
                let mut line = serializer.serialize_struct("Report", 2)?;
                line.serialize_field("online", &false)?;
                line.serialize_field("error", error)?;
                line.end()
            }
            Report::Unavailable => {
                let mut line = serializer.serialize_struct("Report", 1)?;
                line.serialize_field("error", NO_MCSTATUS)?;
                line.end()
            }
        }
    }
}

impl Report {
    pub fn no_host() -> Self {
        Report::Offline {
            error: NO_HOST.into(),
        }
    }

    pub fn unavailable() -> Self {
        Report::Unavailable
    }

    pub fn offline(err: &QueryErr) -> Self {
        let mut error = err.to_string();

        if error.trim().is_empty() {
            error = format!("{:?}", err);
        }

        Report::Offline { error }
    }

    /// Serialize as one line of JSON, without the trailing newline.
    pub fn to_json_line(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|err| {
            warn!(error = %err, "failed to serialize report");
            serde_json::json!({ "online": false, "error": err.to_string() }).to_string()
        })
    }
}

impl From<&Server> for Report {
    fn from(server: &Server) -> Self {
        let players = server.players.as_ref();

        Report::Online(Status {
            players: extract_count(players.and_then(|p| p.online)),
            max_players: extract_count(players.and_then(|p| p.max)),
            motd: extract_motd(server.description.as_ref()),
            version: server
                .version
                .as_ref()
                .and_then(|v| v.name.clone())
                .unwrap_or_default(),
            favicon: extract_favicon(&server.raw),
        })
    }
}

impl std::fmt::Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_json_line())
    }
}

/// A player count, with missing and negative values reported as 0.
pub fn extract_count(count: Option<i64>) -> u64 {
    count.map_or(0, |n| n.max(0) as u64)
}

/// Textual form of the description, empty when there is none.
pub fn extract_motd(description: Option<&Description>) -> String {
    description
        .map(Description::to_legacy_text)
        .unwrap_or_default()
}

/// The first non-empty string under `favicon` or `icon` in the raw response.
pub fn extract_favicon(raw: &Value) -> Option<String> {
    let map = raw.as_object()?;

    FAVICON_KEYS.iter().find_map(|key| match map.get(*key) {
        Some(Value::String(icon)) if !icon.is_empty() => Some(icon.clone()),
        _ => None,
    })
}
