pub(crate) mod alloc;
pub mod core;
pub mod error;
pub(crate) mod math;
pub mod rng;
