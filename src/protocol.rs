//! Console line protocol.
//!
//! One record per `\n`-terminated line:
//!
//! ```text
//! Waiting 4 seconds before starting data collection...
//! START
//! 0.00,0.01,-0.02,1.00,0.31,-0.12,0.05
//! ...
//! 3.99,0.01,-0.02,1.00,0.30,-0.11,0.06
//! END
//! Waiting 4 seconds before the next cycle...
//! ```
//!
//! Sample fields are elapsed seconds, accel x/y/z (g) and gyro x/y/z (°/s),
//! each with two decimals. [`Framer`] is the receiving side: it pulls whole
//! bursts back out of a stream of lines, the way the host reader does.

use core::fmt::{self, Write};

use crate::config::SAMPLE_PERIOD_MS;
use crate::drivers::imu::Vector3;

pub const AWAITING_START_BANNER: &str = "Waiting 4 seconds before starting data collection...";
pub const AWAITING_NEXT_CYCLE_BANNER: &str = "Waiting 4 seconds before the next cycle...";
pub const START_MARKER: &str = "START";
pub const END_MARKER: &str = "END";

const SAMPLE_FIELDS: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Sample {
    pub elapsed_s: f32,
    pub accel: Vector3,
    pub gyro: Vector3,
}

impl Sample {
    /// Sample `index` of a burst, timestamped relative to the burst start.
    pub fn at(index: u32, accel: Vector3, gyro: Vector3) -> Self {
        Self {
            elapsed_s: (index as u64 * SAMPLE_PERIOD_MS) as f32 / 1000.0,
            accel,
            gyro,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Line {
    AwaitingStart,
    Start,
    Sample(Sample),
    End,
    AwaitingNextCycle,
}

impl Line {
    /// Writes the line including its terminating `\n`.
    pub fn encode<W: Write>(&self, out: &mut W) -> fmt::Result {
        match self {
            Self::AwaitingStart => writeln!(out, "{}", AWAITING_START_BANNER),
            Self::Start => writeln!(out, "{}", START_MARKER),
            Self::Sample(s) => writeln!(
                out,
                "{:.2},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2}",
                s.elapsed_s, s.accel.x, s.accel.y, s.accel.z, s.gyro.x, s.gyro.y, s.gyro.z
            ),
            Self::End => writeln!(out, "{}", END_MARKER),
            Self::AwaitingNextCycle => writeln!(out, "{}", AWAITING_NEXT_CYCLE_BANNER),
        }
    }

    /// Parses one received line. Surrounding whitespace (including `\r`) is
    /// ignored; anything unrecognised yields `None`.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        match line {
            START_MARKER => Some(Self::Start),
            END_MARKER => Some(Self::End),
            AWAITING_START_BANNER => Some(Self::AwaitingStart),
            AWAITING_NEXT_CYCLE_BANNER => Some(Self::AwaitingNextCycle),
            _ => parse_sample(line).map(Self::Sample),
        }
    }
}

fn parse_sample(line: &str) -> Option<Sample> {
    if line.matches(',').count() != SAMPLE_FIELDS - 1 {
        return None;
    }

    let mut fields = [0f32; SAMPLE_FIELDS];
    for (slot, field) in fields.iter_mut().zip(line.split(',')) {
        *slot = field.trim().parse().ok()?;
    }

    let [t, ax, ay, az, gx, gy, gz] = fields;
    Some(Sample {
        elapsed_s: t,
        accel: Vector3::new(ax, ay, az),
        gyro: Vector3::new(gx, gy, gz),
    })
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameEvent {
    Started,
    Sample(Sample),
    Finished { samples: u32 },
}

/// Reassembles START..END bursts from received lines.
#[derive(Debug, Default)]
pub struct Framer {
    in_burst: bool,
    samples: u32,
}

impl Framer {
    pub const fn new() -> Self {
        Self {
            in_burst: false,
            samples: 0,
        }
    }

    pub fn in_burst(&self) -> bool {
        self.in_burst
    }

    pub fn push(&mut self, line: &str) -> Option<FrameEvent> {
        match Line::parse(line)? {
            // A START inside a burst means we lost the END; start over
            Line::Start => {
                self.in_burst = true;
                self.samples = 0;
                Some(FrameEvent::Started)
            }
            Line::Sample(s) if self.in_burst => {
                self.samples += 1;
                Some(FrameEvent::Sample(s))
            }
            Line::End if self.in_burst => {
                self.in_burst = false;
                Some(FrameEvent::Finished {
                    samples: core::mem::take(&mut self.samples),
                })
            }
            _ => None,
        }
    }
}
