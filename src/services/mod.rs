//! Composite backends that issue nested calls of their own

pub mod chain;
pub mod fanout;

pub use chain::ChainDelegator;
pub use fanout::{FailurePolicy, FanoutCoordinator, FanoutJob};
