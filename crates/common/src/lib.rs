#![forbid(unsafe_code)]

mod error;

pub use error::*;

pub const DEFAULT_ADDRESS: &str = "0.0.0.0:6379";
pub const MAX_CONNECTIONS: usize = 1024;
pub const INITIAL_BUFFER_CAPACITY: usize = 4 * 1024; // 4 KB
pub const MAX_FRAME_SIZE: usize = 64 * 1024 * 1024; // 64 MB
