pub mod dualism;
pub mod landscape;
pub mod router;
