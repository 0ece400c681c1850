use embassy_stm32::mode::Async;
use embassy_stm32::time::Hertz;
use embassy_stm32::usart::{self, Config as UsartConfig, UartTx};
use embassy_stm32::{bind_interrupts, i2c, peripherals, rcc, Config};

use crate::config::{CONSOLE_BAUDRATE, I2C_FREQUENCY_HZ, I2C_PULLUPS};

// ── IRQ table ─────────────────────────────────────────────
bind_interrupts!(pub struct Irqs {
    I2C1 => i2c::EventInterruptHandler<peripherals::I2C1>,
            i2c::ErrorInterruptHandler<peripherals::I2C1>;
});

// ── Board struct ──────────────────────────────────────────
pub struct Board {
    /// I²C bus 0: SCL PB8, SDA PB9
    pub i2c0: i2c::I2c<'static, Async>, // DMA
    /// Data console: USART2 TX on PA2 (ST-LINK virtual COM port)
    pub console: UartTx<'static, Async>, // DMA
}

impl Board {
    pub fn init() -> Result<Self, usart::ConfigError> {
        let mut config = Config::default();

        // HSI16 → PLL → 64MHz SYSCLK
        config.rcc.hsi = Some(rcc::Hsi {
            sys_div: rcc::HsiSysDiv::DIV1,
        });
        config.rcc.pll = Some(rcc::Pll {
            source: rcc::PllSource::HSI,
            prediv: rcc::PllPreDiv::DIV2,   // 16MHz / 2 = 8MHz
            mul: rcc::PllMul::MUL16,        // 8MHz * 16 = 128MHz
            divp: None,
            divq: None,
            divr: Some(rcc::PllRDiv::DIV2), // 128MHz / 2 = 64MHz
        });
        config.rcc.sys = rcc::Sysclk::PLL1_R;
        let p = embassy_stm32::init(config);

        // I²C1 as bus 0 (DMA CH2 TX, CH3 RX)
        let i2c0 = i2c::I2c::new(
            p.I2C1,
            p.PB8,
            p.PB9,
            Irqs,
            p.DMA1_CH2,
            p.DMA1_CH3,
            Hertz(I2C_FREQUENCY_HZ),
            bus_config(),
        );
        info!(
            "I2C bus 0 master: SCL=PB8 SDA=PB9 {}Hz pull-ups={}",
            I2C_FREQUENCY_HZ, I2C_PULLUPS
        );

        // USART2 TX only (DMA CH1)
        let mut us_cfg = UsartConfig::default();
        us_cfg.baudrate = CONSOLE_BAUDRATE;
        let console = UartTx::new(p.USART2, p.PA2, p.DMA1_CH1, us_cfg)?;
        info!("Console on USART2 at {} baud", CONSOLE_BAUDRATE);

        Ok(Self { i2c0, console })
    }
}

fn bus_config() -> i2c::Config {
    let mut i2c_cfg = i2c::Config::default();
    i2c_cfg.sda_pullup = I2C_PULLUPS;
    i2c_cfg.scl_pullup = I2C_PULLUPS;
    i2c_cfg
}
