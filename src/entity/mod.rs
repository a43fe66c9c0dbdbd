pub mod store;
pub mod typography;
pub mod word;
