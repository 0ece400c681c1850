use embedded_io_async::{Error as _, ErrorKind, Write};
use heapless::String;

use crate::config::{BURST_SAMPLES, IDLE_PERIOD_MS, LINE_CAPACITY, SAMPLE_PERIOD_MS};
use crate::drivers::imu::{MotionSensor, Vector3};
use crate::protocol::{Line, Sample};
use crate::timing::Cadence;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StreamError {
    Console(ErrorKind),
    LineOverflow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BurstReport {
    pub samples: u32,
    pub accel_errors: u32,
    pub gyro_errors: u32,
}

impl BurstReport {
    /// Failed sensor reads of either vector.
    pub fn read_errors(&self) -> u32 {
        self.accel_errors + self.gyro_errors
    }
}

/// Formats one line and pushes it out, flushing before returning.
pub async fn write_line<W: Write>(console: &mut W, line: &Line) -> Result<(), StreamError> {
    let mut buf: String<LINE_CAPACITY> = String::new();
    line.encode(&mut buf).map_err(|_| StreamError::LineOverflow)?;

    console
        .write_all(buf.as_bytes())
        .await
        .map_err(|e| StreamError::Console(e.kind()))?;
    console
        .flush()
        .await
        .map_err(|e| StreamError::Console(e.kind()))
}

/// One IDLE → SAMPLING → IDLE cycle.
pub async fn run_cycle<S, W, C>(
    sensor: &mut S,
    console: &mut W,
    cadence: &mut C,
) -> Result<BurstReport, StreamError>
where
    S: MotionSensor,
    W: Write,
    C: Cadence,
{
    write_line(console, &Line::AwaitingStart).await?;
    cadence.idle(IDLE_PERIOD_MS).await;

    write_line(console, &Line::Start).await?;
    debug!("Burst started: {} samples every {}ms", BURST_SAMPLES, SAMPLE_PERIOD_MS);
    cadence.start(SAMPLE_PERIOD_MS);

    let mut report = BurstReport::default();
    let mut accel = Vector3::ZERO;
    let mut gyro = Vector3::ZERO;

    for i in 0..BURST_SAMPLES {
        // A failed read repeats the last good vector so the line count holds
        match sensor.acceleration().await {
            Ok(v) => accel = v,
            Err(e) => {
                report.accel_errors += 1;
                if report.accel_errors % 100 == 1 {
                    warn!("Accel read error #{} at sample {}: {:?}", report.accel_errors, i, e);
                }
            }
        }
        match sensor.angular_rate().await {
            Ok(v) => gyro = v,
            Err(e) => {
                report.gyro_errors += 1;
                if report.gyro_errors % 100 == 1 {
                    warn!("Gyro read error #{} at sample {}: {:?}", report.gyro_errors, i, e);
                }
            }
        }

        write_line(console, &Line::Sample(Sample::at(i, accel, gyro))).await?;
        report.samples += 1;

        cadence.tick().await;
    }

    write_line(console, &Line::End).await?;
    if report.read_errors() > 0 {
        warn!(
            "Burst finished: {} samples, {} accel and {} gyro reads failed",
            report.samples, report.accel_errors, report.gyro_errors
        );
    } else {
        debug!("Burst finished: {} samples", report.samples);
    }

    write_line(console, &Line::AwaitingNextCycle).await?;
    cadence.idle(IDLE_PERIOD_MS).await;

    Ok(report)
}

/// Runs acquisition cycles forever. A console failure abandons the current
/// cycle and waits one idle period before the next.
pub async fn run<S, W, C>(sensor: &mut S, console: &mut W, cadence: &mut C)
where
    S: MotionSensor,
    W: Write,
    C: Cadence,
{
    loop {
        if let Err(e) = run_cycle(sensor, console, cadence).await {
            error!("Acquisition cycle aborted: {:?}", e);
            cadence.idle(IDLE_PERIOD_MS).await;
        }
    }
}

#[cfg(feature = "stm32")]
#[embassy_executor::task]
pub async fn acquisition_task(
    mut imu: crate::drivers::imu::Mpu6050<
        embassy_stm32::i2c::I2c<'static, embassy_stm32::mode::Async>,
    >,
    mut console: embassy_stm32::usart::UartTx<'static, embassy_stm32::mode::Async>,
) {
    info!(
        "Acquisition task started - {} samples at {}ms, {}ms idle",
        BURST_SAMPLES, SAMPLE_PERIOD_MS, IDLE_PERIOD_MS
    );
    let mut cadence = crate::timing::TickerCadence::new();
    run(&mut imu, &mut console, &mut cadence).await;
}
