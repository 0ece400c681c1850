pub mod imu;

pub use imu::{create_default_imu, ImuError, MotionSensor, Mpu6050, Vector3};
