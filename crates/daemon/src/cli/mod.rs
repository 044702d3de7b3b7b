pub mod args;
pub mod op;
pub mod ops;

pub use ops::{Create, Daemon, Health, Init, Open, Version};
