pub mod hex;
pub mod persistence;
