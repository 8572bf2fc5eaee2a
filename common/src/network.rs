pub mod endpoint;
pub mod target;
