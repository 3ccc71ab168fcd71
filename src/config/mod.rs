//! Configuration module

pub mod settings;

pub use settings::{
    ChainConfig, ClientConfig, CpuWorkload, FanoutConfig, IoWorkload, LoggingConfig,
    MemWorkload, NetWorkload, ResolverConfig, RouteConfig, ServiceConfig, ServiceRole, Settings,
    WorkloadConfig,
};
