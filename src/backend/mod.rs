//! Backend module - Call types, target resolution, and the HTTP caller

pub mod http_backend;
pub mod resolver;
pub mod traits;

pub use http_backend::HttpCaller;
pub use resolver::{DnsResolver, StaticResolver, TargetResolver};
pub use traits::{spawn_call, BackendCaller, BackendTarget, CallResult, Outcome};
