// Library surface of the dashboard server, shared by the binary and the
// integration tests.

pub mod app;
pub mod config;
pub mod protocol;
pub mod ws_server;
