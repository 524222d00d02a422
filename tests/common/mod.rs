#![allow(dead_code)]

use mcstatus_query::{decode_varint, encode_varint};
use std::{
    io::{Read, Write},
    net::{TcpListener, TcpStream},
    thread::{self, JoinHandle},
};

/// How the mock server answers a status request.
pub enum Reply {
    /// A well-formed status packet with this JSON body, then a pong.
    Status(String),
    /// Raw bytes written after the handshake, then the socket closes.
    Raw(Vec<u8>),
}

fn read_varint(socket: &mut TcpStream) -> i32 {
    let mut bufs = Vec::new();
    let mut byte = [0u8; 1];

    loop {
        socket.read_exact(&mut byte).unwrap();
        bufs.push(byte[0]);

        if byte[0] & 0x80 == 0 {
            return decode_varint(&bufs).unwrap();
        }
    }
}

fn read_packet(socket: &mut TcpStream) -> Vec<u8> {
    let len = read_varint(socket);
    let mut bufs = vec![0u8; len as usize];

    socket.read_exact(&mut bufs).unwrap();
    bufs
}

pub fn packet(id: i32, mut data: Vec<u8>) -> Vec<u8> {
    let mut body = encode_varint(id);
    body.append(&mut data);

    let mut packet = encode_varint(body.len() as i32);
    packet.append(&mut body);
    packet
}

pub fn status_packet(json: &str) -> Vec<u8> {
    let mut data = encode_varint(json.len() as i32);
    data.extend_from_slice(json.as_bytes());

    packet(0x00, data)
}

/// Serve exactly one connection on a local port, returning `127.0.0.1:<port>`.
pub fn spawn_server(reply: Reply) -> (String, JoinHandle<Vec<u8>>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap().to_string();

    let handle = thread::spawn(move || {
        let (mut socket, _) = listener.accept().unwrap();
        let handshake = read_packet(&mut socket);
        let status_request = read_packet(&mut socket);

        assert_eq!(status_request, vec![0x00]);

        match reply {
            Reply::Status(json) => {
                socket.write_all(&status_packet(&json)).unwrap();

                let ping = read_packet(&mut socket);
                assert_eq!(ping[0], 0x01);
                socket.write_all(&packet(0x01, ping[1..].to_vec())).unwrap();
            }
            Reply::Raw(bufs) => {
                socket.write_all(&bufs).unwrap();
            }
        }

        handshake
    });

    (addr, handle)
}

/// An address nothing listens on.
pub fn closed_addr() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap().to_string();

    drop(listener);
    addr
}
