use embedded_hal_async::i2c::{ErrorKind, I2c};

use crate::config::{ACCEL_RANGE, GYRO_RANGE};

// MPU-6050 I2C addresses (AD0 low / high)
pub const MPU6050_ADDRESS: u8 = 0x68;
pub const MPU6050_ADDRESS_ALT: u8 = 0x69;

// MPU-6050 Register Addresses
const MPU6050_GYRO_CONFIG_ADDR: u8 = 0x1B;
const MPU6050_ACCEL_CONFIG_ADDR: u8 = 0x1C;
const MPU6050_ACCEL_XOUT_H_ADDR: u8 = 0x3B;
const MPU6050_TEMP_OUT_H_ADDR: u8 = 0x41;
const MPU6050_GYRO_XOUT_H_ADDR: u8 = 0x43;
const MPU6050_PWR_MGMT_1_ADDR: u8 = 0x6B;
const MPU6050_WHO_AM_I_ADDR: u8 = 0x75;

// MPU-6050 ID
const MPU6050_ID: u8 = 0x68;

const PWR_MGMT_1_SLEEP: u8 = 1 << 6;

// Temperature transfer function from the register map
const TEMP_SENSITIVITY: f32 = 340.0;
const TEMP_OFFSET_C: f32 = 36.53;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3 {
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// Accelerometer full-scale range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AccelRange {
    G2,
    G4,
    G8,
    G16,
}

impl AccelRange {
    /// AFS_SEL field as written to ACCEL_CONFIG.
    pub const fn register_value(self) -> u8 {
        (self as u8) << 3
    }

    /// LSB per g.
    pub const fn sensitivity(self) -> f32 {
        match self {
            Self::G2 => 16384.0,
            Self::G4 => 8192.0,
            Self::G8 => 4096.0,
            Self::G16 => 2048.0,
        }
    }
}

/// Gyroscope full-scale range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GyroRange {
    Dps250,
    Dps500,
    Dps1000,
    Dps2000,
}

impl GyroRange {
    /// FS_SEL field as written to GYRO_CONFIG.
    pub const fn register_value(self) -> u8 {
        (self as u8) << 3
    }

    /// LSB per degree/second.
    pub const fn sensitivity(self) -> f32 {
        match self {
            Self::Dps250 => 131.0,
            Self::Dps500 => 65.5,
            Self::Dps1000 => 32.8,
            Self::Dps2000 => 16.4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ImuError {
    Bus(ErrorKind),
}

impl ImuError {
    fn bus<E: embedded_hal_async::i2c::Error>(e: E) -> Self {
        Self::Bus(e.kind())
    }
}

/// Accessor seam used by the acquisition loop.
#[allow(async_fn_in_trait)]
pub trait MotionSensor {
    /// Linear acceleration in g.
    async fn acceleration(&mut self) -> Result<Vector3, ImuError>;

    /// Angular rate in degrees/second.
    async fn angular_rate(&mut self) -> Result<Vector3, ImuError>;
}

pub struct Mpu6050<I2C> {
    i2c: I2C,
    addr: u8,
    accel_range: AccelRange,
    gyro_range: GyroRange,
}

impl<I2C: I2c> Mpu6050<I2C> {
    /// Binds a handle to `addr` and checks that something answers there.
    ///
    /// A bus error is fatal. An unexpected WHO_AM_I is only reported, since
    /// register-compatible clones answer with other IDs.
    pub async fn new(i2c: I2C, addr: u8) -> Result<Self, ImuError> {
        let mut mpu = Self {
            i2c,
            addr,
            // Power-on defaults
            accel_range: AccelRange::G2,
            gyro_range: GyroRange::Dps250,
        };

        let id = mpu.device_id().await?;
        if id == MPU6050_ID {
            info!("MPU-6050 detected at 0x{:02X}", addr);
        } else {
            warn!(
                "Unexpected WHO_AM_I: 0x{:02X}, expected 0x{:02X}",
                id, MPU6050_ID
            );
        }

        Ok(mpu)
    }

    pub async fn device_id(&mut self) -> Result<u8, ImuError> {
        self.read_byte(MPU6050_WHO_AM_I_ADDR).await
    }

    /// Selects both full-scale ranges in one burst write (GYRO_CONFIG and
    /// ACCEL_CONFIG are adjacent).
    pub async fn configure(&mut self, accel: AccelRange, gyro: GyroRange) -> Result<(), ImuError> {
        self.i2c
            .write(
                self.addr,
                &[
                    MPU6050_GYRO_CONFIG_ADDR,
                    gyro.register_value(),
                    accel.register_value(),
                ],
            )
            .await
            .map_err(ImuError::bus)?;

        self.accel_range = accel;
        self.gyro_range = gyro;
        Ok(())
    }

    pub async fn wake_up(&mut self) -> Result<(), ImuError> {
        let pwr = self.read_byte(MPU6050_PWR_MGMT_1_ADDR).await?;
        self.write_byte(MPU6050_PWR_MGMT_1_ADDR, pwr & !PWR_MGMT_1_SLEEP).await
    }

    pub async fn sleep(&mut self) -> Result<(), ImuError> {
        let pwr = self.read_byte(MPU6050_PWR_MGMT_1_ADDR).await?;
        self.write_byte(MPU6050_PWR_MGMT_1_ADDR, pwr | PWR_MGMT_1_SLEEP).await
    }

    pub fn accel_range(&self) -> AccelRange {
        self.accel_range
    }

    pub fn gyro_range(&self) -> GyroRange {
        self.gyro_range
    }

    /// Die temperature in °C.
    pub async fn temperature(&mut self) -> Result<f32, ImuError> {
        let raw = self.read_bytes::<2>(MPU6050_TEMP_OUT_H_ADDR).await?;
        Ok(i16::from_be_bytes(raw) as f32 / TEMP_SENSITIVITY + TEMP_OFFSET_C)
    }

    pub fn release(self) -> I2C {
        self.i2c
    }

    async fn read_vector(&mut self, reg: u8, sensitivity: f32) -> Result<Vector3, ImuError> {
        let raw = self.read_bytes::<6>(reg).await?;
        Ok(Vector3 {
            x: i16::from_be_bytes([raw[0], raw[1]]) as f32 / sensitivity,
            y: i16::from_be_bytes([raw[2], raw[3]]) as f32 / sensitivity,
            z: i16::from_be_bytes([raw[4], raw[5]]) as f32 / sensitivity,
        })
    }

    async fn write_byte(&mut self, reg: u8, value: u8) -> Result<(), ImuError> {
        self.i2c
            .write(self.addr, &[reg, value])
            .await
            .map_err(ImuError::bus)
    }

    async fn read_byte(&mut self, reg: u8) -> Result<u8, ImuError> {
        let mut buf = [0u8; 1];
        self.i2c
            .write_read(self.addr, &[reg], &mut buf)
            .await
            .map_err(ImuError::bus)?;
        Ok(buf[0])
    }

    async fn read_bytes<const N: usize>(&mut self, reg: u8) -> Result<[u8; N], ImuError> {
        let mut buf = [0u8; N];
        self.i2c
            .write_read(self.addr, &[reg], &mut buf)
            .await
            .map_err(ImuError::bus)?;
        Ok(buf)
    }
}

impl<I2C: I2c> MotionSensor for Mpu6050<I2C> {
    async fn acceleration(&mut self) -> Result<Vector3, ImuError> {
        let sensitivity = self.accel_range.sensitivity();
        self.read_vector(MPU6050_ACCEL_XOUT_H_ADDR, sensitivity).await
    }

    async fn angular_rate(&mut self) -> Result<Vector3, ImuError> {
        let sensitivity = self.gyro_range.sensitivity();
        self.read_vector(MPU6050_GYRO_XOUT_H_ADDR, sensitivity).await
    }
}

// Factory function to create the default IMU (MPU-6050, ±4 g, ±500 °/s)
//
// Only a failure to create the handle is returned. Configuration and wake-up
// failures are logged and the handle is still handed back.
pub async fn create_default_imu<I2C: I2c>(i2c: I2C) -> Result<Mpu6050<I2C>, ImuError> {
    let mut mpu = Mpu6050::new(i2c, MPU6050_ADDRESS).await?;

    match mpu.configure(ACCEL_RANGE, GYRO_RANGE).await {
        Ok(()) => info!(
            "Full-scale set: accel {:?}, gyro {:?}",
            ACCEL_RANGE, GYRO_RANGE
        ),
        Err(e) => warn!("MPU-6050 config failed: {:?}", e),
    }

    if let Err(e) = mpu.wake_up().await {
        warn!("MPU-6050 wake-up failed: {:?}", e);
    }

    match mpu.temperature().await {
        Ok(t) => info!("MPU-6050 die temperature: {}°C", t),
        Err(e) => debug!("Temperature read failed: {:?}", e),
    }

    Ok(mpu)
}
