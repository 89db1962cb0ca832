//! HTTP file sharing module
//!
//! Serves the bound file or accepts uploads through a browser, depending on
//! which router variant is built.

pub mod control;
pub mod pages;
pub mod receive;
pub mod send;
pub mod server;

pub use control::ServerControl;
pub use server::{bind_listener, create_router, receive_router, run, send_router, serve};
