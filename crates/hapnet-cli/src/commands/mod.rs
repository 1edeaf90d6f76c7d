pub mod seed;
pub mod version;
