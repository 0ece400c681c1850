//! End-to-end: emulated MPU-6050 on a fake bus, through sensor init and two
//! acquisition cycles, checked from the receiving side of the console.

use embassy_futures::block_on;
use embedded_hal_async::i2c::{ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation};
use imu_burst::drivers::{create_default_imu, ImuError};
use imu_burst::protocol::{FrameEvent, Framer};
use imu_burst::tasks::run_cycle;
use imu_burst::timing::Cadence;

const ADDRESS: u8 = 0x68;

/// Register file answering at 0x68 with fixed accel/gyro raw counts.
struct Chip {
    regs: [u8; 128],
    pointer: usize,
    present: bool,
}

impl Chip {
    fn new() -> Self {
        let mut regs = [0u8; 128];
        regs[0x75] = 0x68; // WHO_AM_I
        regs[0x6B] = 0x40; // asleep
        // accel 0.5 g, -1 g, 2 g at ±4 g
        for (i, raw) in [4096i16, -8192, 16384].iter().enumerate() {
            regs[0x3B + i * 2..0x3D + i * 2].copy_from_slice(&raw.to_be_bytes());
        }
        // gyro 100, -50, 0.5 °/s at ±500 °/s
        for (i, raw) in [6550i16, -3275, 33].iter().enumerate() {
            regs[0x43 + i * 2..0x45 + i * 2].copy_from_slice(&raw.to_be_bytes());
        }
        Self {
            regs,
            pointer: 0,
            present: true,
        }
    }
}

impl ErrorType for Chip {
    type Error = ErrorKind;
}

impl I2c for Chip {
    async fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        if !self.present || address != ADDRESS {
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        }
        for op in operations.iter_mut() {
            match op {
                Operation::Write(bytes) => {
                    if let Some((&reg, data)) = bytes.split_first() {
                        self.pointer = reg as usize;
                        for &b in data {
                            self.regs[self.pointer] = b;
                            self.pointer += 1;
                        }
                    }
                }
                Operation::Read(buf) => {
                    for b in buf.iter_mut() {
                        *b = self.regs[self.pointer];
                        self.pointer += 1;
                    }
                }
            }
        }
        Ok(())
    }
}

#[derive(Default)]
struct Console {
    bytes: Vec<u8>,
    flushes: usize,
}

impl embedded_io_async::ErrorType for Console {
    type Error = core::convert::Infallible;
}

impl embedded_io_async::Write for Console {
    async fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.bytes.extend_from_slice(buf);
        Ok(buf.len())
    }

    async fn flush(&mut self) -> Result<(), Self::Error> {
        self.flushes += 1;
        Ok(())
    }
}

#[derive(Default)]
struct Instant {
    idle_ms: u64,
    ticks: u64,
    period_ms: u64,
}

impl Instant {
    fn elapsed_ms(&self) -> u64 {
        self.idle_ms + self.ticks * self.period_ms
    }
}

impl Cadence for Instant {
    async fn idle(&mut self, ms: u64) {
        self.idle_ms += ms;
    }

    fn start(&mut self, period_ms: u64) {
        self.period_ms = period_ms;
    }

    async fn tick(&mut self) {
        self.ticks += 1;
    }
}

#[test]
fn boot_then_two_cycles() {
    let mut imu = block_on(create_default_imu(Chip::new())).expect("sensor init");
    let mut console = Console::default();
    let mut clock = Instant::default();

    for _ in 0..2 {
        let report = block_on(run_cycle(&mut imu, &mut console, &mut clock)).unwrap();
        assert_eq!(report.samples, 400);
        assert_eq!(report.read_errors(), 0);
    }

    // Nominal timing: 2 × (4 s idle + 4 s burst + 4 s idle)
    assert_eq!(clock.elapsed_ms(), 24_000);

    let text = String::from_utf8(console.bytes).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(console.flushes, lines.len());
    assert_eq!(lines[0], "Waiting 4 seconds before starting data collection...");
    assert_eq!(lines[1], "START");

    let mut framer = Framer::new();
    let mut bursts = Vec::new();
    let mut index = 0u32;
    for line in &lines {
        match framer.push(line) {
            Some(FrameEvent::Started) => index = 0,
            Some(FrameEvent::Sample(s)) => {
                let expected = format!("{}.{:02}", index / 100, index % 100);
                assert_eq!(format!("{:.2}", s.elapsed_s), expected);
                index += 1;
            }
            Some(FrameEvent::Finished { samples }) => bursts.push(samples),
            None => {}
        }
    }
    assert_eq!(bursts, vec![400, 400]);

    assert_eq!(lines[2], "0.00,0.50,-1.00,2.00,100.00,-50.00,0.50");
    assert_eq!(lines[401], "3.99,0.50,-1.00,2.00,100.00,-50.00,0.50");
    assert_eq!(lines[402], "END");
    assert_eq!(lines[403], "Waiting 4 seconds before the next cycle...");
    assert_eq!(lines.len(), 2 * 404);
}

#[test]
fn missing_sensor_never_reaches_acquisition() {
    let mut chip = Chip::new();
    chip.present = false;

    let err = block_on(create_default_imu(chip)).err();
    assert_eq!(
        err,
        Some(ImuError::Bus(ErrorKind::NoAcknowledge(
            NoAcknowledgeSource::Address
        )))
    );
}
