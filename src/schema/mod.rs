//! Type system and schema container

pub mod meta;
pub mod model;
pub mod relations;
pub mod validate;
