//! Timer seam for the acquisition loop.
//!
//! The loop never sleeps directly. It asks a [`Cadence`] for the idle wait
//! and for the periodic sample tick, so host tests can run a full cycle
//! without waiting eight seconds.

/// Source of idle waits and a periodic tick.
#[allow(async_fn_in_trait)]
pub trait Cadence {
    /// Waits `ms` milliseconds.
    async fn idle(&mut self, ms: u64);

    /// Arms the periodic tick. The first tick is one period away.
    fn start(&mut self, period_ms: u64);

    /// Waits for the next tick of the current period.
    async fn tick(&mut self);
}

#[cfg(feature = "stm32")]
pub use embassy::TickerCadence;

#[cfg(feature = "stm32")]
mod embassy {
    use super::Cadence;
    use embassy_time::{Duration, Ticker, Timer};

    /// [`Cadence`] backed by the embassy time driver.
    ///
    /// Samples land on a fixed grid; a slow read or a slow console write
    /// does not push later samples back.
    pub struct TickerCadence {
        ticker: Option<Ticker>,
    }

    impl TickerCadence {
        pub const fn new() -> Self {
            Self { ticker: None }
        }
    }

    impl Default for TickerCadence {
        fn default() -> Self {
            Self::new()
        }
    }

    impl Cadence for TickerCadence {
        async fn idle(&mut self, ms: u64) {
            Timer::after(Duration::from_millis(ms)).await;
        }

        fn start(&mut self, period_ms: u64) {
            self.ticker = Some(Ticker::every(Duration::from_millis(period_ms)));
        }

        async fn tick(&mut self) {
            match self.ticker.as_mut() {
                Some(ticker) => ticker.next().await,
                None => warn!("Cadence ticked before start; sample spacing lost"),
            }
        }
    }
}
