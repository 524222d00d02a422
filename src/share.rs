use crate::{conf::Conf, QueryErr};
use std::{
    io::ErrorKind,
    net::{TcpStream, ToSocketAddrs},
    time::{SystemTime, UNIX_EPOCH},
};
use tracing::debug;

/// Current Unix time in milliseconds.
pub fn get_current_time_millis() -> Result<i64, QueryErr> {
    let tm = SystemTime::now().duration_since(UNIX_EPOCH)?.as_millis();

    i64::try_from(tm).map_err(|_| {
        QueryErr::InternalErr(format!(
            "Failed to obtain current time. It should not exceed i64::MAX, but got: {}",
            tm
        ))
    })
}

/// Connect to the first resolved address that accepts, applying [crate::SocketConf].
pub fn create_tcp_socket(conf: &Conf) -> Result<TcpStream, QueryErr> {
    let addrs = conf.to_socket_addrs()?.collect::<Vec<_>>();
    let mut last_err = None;

    if addrs.is_empty() {
        return Err(QueryErr::DataErr(format!(
            "Could not resolve any address for {}",
            conf
        )));
    }

    for addr in addrs {
        debug!(%addr, "connecting");

        let attempt = match conf.socket_conf.connect_timeout {
            Some(timeout) => TcpStream::connect_timeout(&addr, timeout),
            None => TcpStream::connect(addr),
        };

        match attempt {
            Ok(socket) => {
                socket.set_read_timeout(conf.socket_conf.read_time_out)?;
                socket.set_write_timeout(conf.socket_conf.write_timeout)?;
                socket.set_nodelay(true)?;

                return Ok(socket);
            }
            Err(err) => {
                debug!(%addr, error = %err, "connection attempt failed");
                last_err = Some(err);
            }
        }
    }

    Err(last_err
        .unwrap_or_else(|| std::io::Error::new(ErrorKind::NotFound, "no address"))
        .into())
}
