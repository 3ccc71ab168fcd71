//! Gateway module - Name-based dispatch to backend services

pub mod router;

pub use router::{Gateway, Route, RouteTable, LATENCY_HEADER};
