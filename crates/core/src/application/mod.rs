// Application Layer - Dispatch engine

pub mod dispatch;

// Re-exports
pub use dispatch::{
    shutdown_channel, DispatchConfig, DispatchPool, ShutdownSender, ShutdownToken,
};
