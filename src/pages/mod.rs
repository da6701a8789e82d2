pub mod registry;
pub mod start;
