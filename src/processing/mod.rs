pub mod data_loader;
pub mod effects;
pub mod image;
pub mod kernels;
pub mod task;
