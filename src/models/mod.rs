pub mod block;
pub mod platform;
pub mod profile;
