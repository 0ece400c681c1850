//! Logging shims.
//!
//! Library code logs through these macros so it builds for both worlds:
//! - `defmt` feature: forwards to `defmt` (RTT on the board)
//! - host unit tests: `println!`
//! - anything else: arguments are evaluated and dropped
#![macro_use]
#![allow(unused_macros)]

macro_rules! debug {
    ($s:literal $(, $x:expr)* $(,)?) => {
        {
            #[cfg(feature = "defmt")]
            ::defmt::debug!($s $(, $x)*);
            #[cfg(all(test, not(feature = "defmt")))]
            ::std::println!(concat!("[DEBUG] ", $s) $(, $x)*);
            #[cfg(not(any(test, feature = "defmt")))]
            let _ = ($( & $x ),*);
        }
    };
}

macro_rules! info {
    ($s:literal $(, $x:expr)* $(,)?) => {
        {
            #[cfg(feature = "defmt")]
            ::defmt::info!($s $(, $x)*);
            #[cfg(all(test, not(feature = "defmt")))]
            ::std::println!(concat!("[INFO] ", $s) $(, $x)*);
            #[cfg(not(any(test, feature = "defmt")))]
            let _ = ($( & $x ),*);
        }
    };
}

macro_rules! warn {
    ($s:literal $(, $x:expr)* $(,)?) => {
        {
            #[cfg(feature = "defmt")]
            ::defmt::warn!($s $(, $x)*);
            #[cfg(all(test, not(feature = "defmt")))]
            ::std::println!(concat!("[WARN] ", $s) $(, $x)*);
            #[cfg(not(any(test, feature = "defmt")))]
            let _ = ($( & $x ),*);
        }
    };
}

macro_rules! error {
    ($s:literal $(, $x:expr)* $(,)?) => {
        {
            #[cfg(feature = "defmt")]
            ::defmt::error!($s $(, $x)*);
            #[cfg(all(test, not(feature = "defmt")))]
            ::std::println!(concat!("[ERROR] ", $s) $(, $x)*);
            #[cfg(not(any(test, feature = "defmt")))]
            let _ = ($( & $x ),*);
        }
    };
}
