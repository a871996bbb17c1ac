pub mod base;
pub mod utilities;
