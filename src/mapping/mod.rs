pub mod remap;
