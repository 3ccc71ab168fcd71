//! Workload simulators served behind the gateway
//!
//! Each one is an ordinary leaf backend: it does some work and answers
//! `GET /` with a plain-text completion message.

pub mod cpu;
pub mod io;
pub mod mem;
pub mod net;

/// Bytes in one mebibyte
pub const MIB: usize = 1024 * 1024;
