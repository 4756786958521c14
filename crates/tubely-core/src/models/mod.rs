//! Data models shared across the service

mod video;

pub use video::*;
