//! docserve - static document server
//!
//! Core library for the HTTP request handling and the connection dispatcher.

pub mod config;
pub mod http;
pub mod server;
