pub mod plan;
pub mod send;
pub mod status;
pub mod validate;
