// Domain layer - Plain data types, no I/O
pub mod dashboard;
pub mod filter;
pub mod format;
pub mod metrics;
pub mod timescale;
