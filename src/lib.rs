#![cfg_attr(not(test), no_std)]

// Must come first so the logging macros are visible to every module below
mod fmt;

#[cfg(feature = "stm32")]
pub mod board;
pub mod config;
pub mod drivers;
pub mod protocol;
pub mod tasks;
pub mod timing;

#[cfg(feature = "stm32")]
pub use board::Board;
pub use drivers::imu::{Mpu6050, Vector3};
