//! Display setup and initialization module.
//
// - `setup_display` builds the SPI device, the ILI9341 driver and runs init.
// - Delays come from a busy-wait on SYSTIMER unit 0 (see `SysTimerCounter`).
// - CS belongs to the SPI device, DC/RST to the driver.

use esp_backtrace as _;

use esp_hal::{
    gpio::Output,
    spi::master::{Config, Spi},
    spi::Mode,
    time::Rate,
    timer::systimer::{SystemTimer, Unit},
    Blocking,
};

use embedded_hal_bus::spi::{ExclusiveDevice, NoDelay};

use crate::config::PanelConfig;
use crate::delay_timer::{CounterDelay, FreeRunningCounter};
use crate::ili9341::Ili9341;
use crate::wiring::DisplayPins;

// Low 16 bits of the free-running SYSTIMER unit 0 (16 MHz on the S3).
pub struct SysTimerCounter;

impl FreeRunningCounter for SysTimerCounter {
    #[inline]
    fn ticks_per_us(&self) -> u32 {
        (SystemTimer::ticks_per_second() / 1_000_000) as u32
    }

    #[inline]
    fn now(&mut self) -> u16 {
        SystemTimer::unit_value(Unit::Unit0) as u16
    }
}

pub type TimerDelay = CounterDelay<SysTimerCounter>;

pub fn timer_delay() -> TimerDelay {
    CounterDelay::new(SysTimerCounter)
}

// This matches wiring: Spi<'a, Blocking> + CS pin + NoDelay
pub type SpiDev<'a> = ExclusiveDevice<Spi<'a, Blocking>, Output<'a>, NoDelay>;

// Expose a ready-to-use display type
pub type DisplayType<'a> = Ili9341<SpiDev<'a>, Output<'a>, Output<'a>>;

/// Bring up SPI2 and the panel. Returns the display (Active) and the
/// backlight pin, already switched on.
pub fn setup_display<'a>(
    display_pins: DisplayPins<'a>,
    delay: &mut TimerDelay,
) -> (DisplayType<'a>, Output<'a>) {
    let DisplayPins {
        spi2,
        sck,
        mosi,
        lcd_cs,
        lcd_dc,
        lcd_rst,
        mut lcd_bl,
    } = display_pins;

    // SPI @ 40 MHz, Mode 0 (ILI9341 write cycle is 100 ns min)
    let spi = Spi::new(
        spi2,
        Config::default()
            .with_frequency(Rate::from_mhz(40))
            .with_mode(Mode::_0),
    )
    .unwrap()
    .with_sck(sck)
    .with_mosi(mosi);

    let spi_dev = ExclusiveDevice::new(spi, lcd_cs, NoDelay).unwrap();

    let mut display = Ili9341::new(spi_dev, lcd_dc, lcd_rst, PanelConfig::default());
    display.initialize(delay).expect("ILI9341 init failed");

    lcd_bl.set_high();
    (display, lcd_bl)
}
