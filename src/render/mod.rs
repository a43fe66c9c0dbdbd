pub mod blur;
pub mod composite;
pub mod mesh_paint;
pub mod surface;
pub mod text;
pub mod vector;
