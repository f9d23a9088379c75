//! Cache store implementations

pub mod moka;
pub mod noop;

pub use moka::MokaMockCache;
pub use noop::NoopMockCache;
