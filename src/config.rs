// Centralize all configuration constants
use crate::drivers::imu::{AccelRange, GyroRange};

// Acquisition cycle
pub const IDLE_PERIOD_MS: u64 = 4000;
pub const SAMPLE_PERIOD_MS: u64 = 10;
pub const BURST_DURATION_MS: u64 = 4000;
pub const BURST_SAMPLES: u32 = (BURST_DURATION_MS / SAMPLE_PERIOD_MS) as u32;

// I2C bus 0
pub const I2C_FREQUENCY_HZ: u32 = 100_000;
pub const I2C_PULLUPS: bool = true;

// Console
pub const CONSOLE_BAUDRATE: u32 = 115_200;
pub const LINE_CAPACITY: usize = 128;

// Sensor full-scale selection
pub const ACCEL_RANGE: AccelRange = AccelRange::G4;
pub const GYRO_RANGE: GyroRange = GyroRange::Dps500;

// Give RTT a moment to drain before a reset
pub const RESTART_DELAY_MS: u64 = 100;
