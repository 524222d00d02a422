mod regular_server;

pub use regular_server::*;
