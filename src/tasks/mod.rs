pub mod acquisition;

#[cfg(feature = "stm32")]
pub use acquisition::acquisition_task;
pub use acquisition::{run, run_cycle, write_line, BurstReport, StreamError};
