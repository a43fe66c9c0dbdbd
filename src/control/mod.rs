pub mod message;
pub mod osc;
