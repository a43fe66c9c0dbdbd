pub mod effects;
pub mod feedback;
pub mod transition;
