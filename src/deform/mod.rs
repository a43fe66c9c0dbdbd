pub mod mesh;
pub mod noise;
