use crate::{
    share::{create_tcp_socket, get_current_time_millis},
    varint::{encode_varint, read_varint},
    Conf, QueryErr,
};
use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::{
    io::{Read, Write},
    time::{Duration, Instant},
};
use tracing::debug;

/// Packets are never larger than 2^21 - 1 bytes.
const MAX_PACKET_SIZE: i32 = 2_097_151;
const STATUS_PACKET_ID: i32 = 0x00;
const PING_PACKET_ID: i32 = 0x01;

/// Status response of a Java Edition server.
///
/// Every field is optional because servers (and proxies in front of them)
/// routinely omit parts of the response. The complete object stays
/// available in `raw`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Server {
    /// Server version. Includes version name and protocol number.
    pub version: Option<Version>,
    /// Server player info.
    pub players: Option<Players>,
    /// Server description, similar to MOTD.
    pub description: Option<Description>,
    /// Server icon, base64 encoding. Values that are not strings are ignored.
    #[serde(default, deserialize_with = "lenient")]
    pub favicon: Option<String>,

    /// Whether the server enforces secure chat.
    #[serde(
        alias = "enforcesSecureChat",
        rename = "enforcesSecureChat",
        default,
        deserialize_with = "lenient"
    )]
    pub enforces_secure_chat: Option<bool>,

    /// The undecoded response object.
    #[serde(skip)]
    pub raw: Value,

    /// Round trip of the ping exchange, or of the status exchange when the
    /// server does not answer pings.
    #[serde(skip_deserializing)]
    pub latency: Duration,
}

impl std::fmt::Display for Server {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            serde_json::to_string(self).map_err(|_| std::fmt::Error)?
        )
    }
}

impl Server {
    /// Decode a status response object, keeping the object itself as `raw`.
    pub fn from_raw(raw: Value) -> Result<Self, QueryErr> {
        if !raw.is_object() {
            return Err(QueryErr::DataErr(format!(
                "Status response must be a JSON object, but got: {}",
                raw
            )));
        }

        let mut server = Server::deserialize(&raw)?;
        server.raw = raw;

        Ok(server)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Version {
    pub name: Option<String>,
    pub protocol: Option<i64>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Players {
    pub max: Option<i64>,
    pub online: Option<i64>,
    /// A few of the connected players. Servers may hide it or send `null`.
    #[serde(default, deserialize_with = "nullable_vec")]
    pub sample: Vec<Player>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct Player {
    pub name: String,
    pub id: String,
}

/// Keep a value only when it has the expected type.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(serde_json::from_value(Value::deserialize(deserializer)?).ok())
}

fn nullable_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// The server description, either plain text or a chat component tree.
///
/// Anything that is neither lands in [Description::Other] so a strange
/// description never fails the whole response.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum Description {
    Text(String),
    List(Vec<Description>),
    Component(Component),
    Other(Value),
}

/// A [chat component](https://wiki.vg/Text_formatting#Text_components).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct Component {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub underlined: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strikethrough: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub obfuscated: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra: Option<Vec<Description>>,
}

pub fn get_server_status(conf: &Conf) -> Result<Server, QueryErr> {
    let mut socket = create_tcp_socket(conf)?;
    let started = Instant::now();

    socket.write_all(&build_handshake_packet(conf))?;
    socket.write_all(&build_status_request_packet())?;
    debug!(server = %conf, "status request sent");

    let mut server = read_status_response(&mut socket)?;

    server.latency = started.elapsed();
    // The status is already complete; a server that ignores pings keeps it.
    match get_server_ping(&mut socket) {
        Ok(latency) => server.latency = latency,
        Err(err) => {
            debug!(server = %conf, error = %err, "ping failed, keeping status latency")
        }
    }
    debug!(server = %conf, status = %server, "status received");

    Ok(server)
}

/// Decode the status response packet from `reader`.
pub fn read_status_response<R: Read>(reader: &mut R) -> Result<Server, QueryErr> {
    let (id, data) = read_packet(reader)?;

    if id != STATUS_PACKET_ID {
        return Err(QueryErr::DataErr(format!(
            "Expected status response packet id 0x00, but got: 0x{:02X}",
            id
        )));
    }

    let mut data = data.as_slice();
    let (_, str_len) = read_varint(&mut data)?;

    if str_len < 0 || str_len as usize > data.len() {
        return Err(QueryErr::DataErr(format!(
            "Status response string length {} does not fit in {} remaining bytes",
            str_len,
            data.len()
        )));
    }

    let json = String::from_utf8(data[..str_len as usize].to_vec())?;

    Server::from_raw(serde_json::from_str::<Value>(&json)?)
}

/// Read one uncompressed packet, returning its id and payload.
fn read_packet<R: Read>(reader: &mut R) -> Result<(i32, Vec<u8>), QueryErr> {
    let (_, packet_len) = read_varint(reader)?;

    if packet_len <= 0 || packet_len > MAX_PACKET_SIZE {
        return Err(QueryErr::DataErr(format!(
            "Invalid packet length: {}",
            packet_len
        )));
    }

    let mut bufs = vec![0u8; packet_len as usize];
    reader.read_exact(&mut bufs)?;

    let mut body = bufs.as_slice();
    let (id_len, id) = read_varint(&mut body)?;

    Ok((id, bufs[id_len..].to_vec()))
}

/// Wrap `data` into a [packet](https://wiki.vg/Protocol#Packet_format).
fn build_packet(id: i32, mut data: Vec<u8>) -> Vec<u8> {
    let mut id_bytes = encode_varint(id);
    let mut packet = encode_varint((id_bytes.len() + data.len()) as i32);

    packet.append(&mut id_bytes);
    packet.append(&mut data);

    packet
}

/// Build handshake packet buffer.
fn build_handshake_packet(conf: &Conf) -> Vec<u8> {
    let mut packet_data = Vec::<u8>::new();
    let server_addr_bytes = conf.host.as_bytes();

    // If the client is pinging to determine what version to use,
    // by convention -1 should be set.
    packet_data.append(&mut encode_varint(-1));
    // UTF-8 string prefixed with its size in bytes as a VarInt.
    packet_data.append(&mut encode_varint(server_addr_bytes.len() as i32));
    packet_data.extend_from_slice(server_addr_bytes);
    packet_data.extend_from_slice(&conf.port.to_be_bytes());
    // Next state, 1 for status.
    packet_data.append(&mut encode_varint(1));

    build_packet(0x00, packet_data)
}

/// Build status request packet buffer.
fn build_status_request_packet() -> Vec<u8> {
    build_packet(STATUS_PACKET_ID, Vec::new())
}

/// Build ping request packet buffer.
fn build_ping_request_packet() -> Result<(i64, Vec<u8>), QueryErr> {
    let now_millis = get_current_time_millis()?;

    Ok((
        now_millis,
        build_packet(PING_PACKET_ID, now_millis.to_be_bytes().to_vec()),
    ))
}

fn get_server_ping<S: Read + Write>(socket: &mut S) -> Result<Duration, QueryErr> {
    let (req_t, ping_request_packet) = build_ping_request_packet()?;
    let started = Instant::now();

    socket.write_all(&ping_request_packet)?;

    let (id, data) = read_packet(socket)?;

    if id != PING_PACKET_ID {
        return Err(QueryErr::DataErr(format!(
            "Expected pong packet id 0x01, but got: 0x{:02X}",
            id
        )));
    }

    // The server echoes the 8 bytes the client sent.
    let time_bytes: [u8; 8] = data.as_slice().try_into().map_err(|_| {
        QueryErr::DataErr(format!(
            "Pong payload must be 8 bytes, but got {}",
            data.len()
        ))
    })?;
    let receive_t = i64::from_be_bytes(time_bytes);

    if receive_t != req_t {
        return Err(QueryErr::DataErr(format!(
            "Server's response time does not match the sending time(send: {}, receive: {}), indicating that the latency is not reliable.",
            req_t, receive_t
        )));
    }

    Ok(started.elapsed())
}
