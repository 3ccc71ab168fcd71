//! HTTP surface for every service role

pub mod handlers;
pub mod routes;
