#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_time::{Duration, Timer};
use {defmt_rtt as _, panic_probe as _};

use imu_burst::{
    config::RESTART_DELAY_MS, drivers::create_default_imu, tasks::acquisition_task, Board,
};

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Starting imu-burst acquisition firmware");

    let board = match Board::init() {
        Ok(board) => board,
        Err(e) => {
            error!("Console UART setup failed: {:?}", e);
            Timer::after(Duration::from_millis(RESTART_DELAY_MS)).await;
            restart()
        }
    };

    // The only recovery path: no handle, no acquisition
    let imu = match create_default_imu(board.i2c0).await {
        Ok(imu) => imu,
        Err(e) => {
            error!("Failed to create MPU-6050 instance: {:?}", e);
            Timer::after(Duration::from_millis(RESTART_DELAY_MS)).await;
            restart()
        }
    };

    unwrap!(spawner.spawn(acquisition_task(imu, board.console)));
    info!("Acquisition task spawned on main executor");
}

fn restart() -> ! {
    warn!("Restarting");
    cortex_m::peripheral::SCB::sys_reset()
}
