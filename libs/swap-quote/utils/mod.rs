//! Common utilities for the binaries

mod shutdown;

pub use shutdown::ShutdownManager;
