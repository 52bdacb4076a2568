pub mod access;
pub mod metrics;
