// Board pin mapping for the ESP32-S3 demo board.
//! The following wiring is assumed (ILI9341 module on SPI2):
//! - LCD CS   => GPIO9
//! - LCD DC   => GPIO8
//! - LCD RST  => GPIO14
//! - LCD BL   => GPIO2
//! - LCD SCK  => GPIO10
//! - LCD MOSI => GPIO11
//! - GND => GND
//! - 3.3V => 3.3V
//! MISO is not connected; the driver never reads from the panel.

use esp_hal::gpio::{Level, Output, OutputConfig};
use esp_hal::peripherals::{Peripherals, GPIO10, GPIO11, SPI2};

pub struct DisplayPins<'a> {
    pub spi2: SPI2<'a>,
    pub sck: GPIO10<'a>,
    pub mosi: GPIO11<'a>,
    pub lcd_cs: Output<'a>,  // GPIO9
    pub lcd_dc: Output<'a>,  // GPIO8
    pub lcd_rst: Output<'a>, // GPIO14
    pub lcd_bl: Output<'a>,  // GPIO2
}

pub fn init_display_pins<'a>(p: Peripherals) -> DisplayPins<'a> {
    // CS idles high, RST idles released, backlight off until init is done.
    // Do NOT configure GPIO10/11 here, the SPI driver owns them.
    let lcd_cs  = Output::new(p.GPIO9,  Level::High, OutputConfig::default());
    let lcd_dc  = Output::new(p.GPIO8,  Level::Low,  OutputConfig::default());
    let lcd_rst = Output::new(p.GPIO14, Level::High, OutputConfig::default());
    let lcd_bl  = Output::new(p.GPIO2,  Level::Low,  OutputConfig::default());

    DisplayPins {
        spi2: p.SPI2,
        sck: p.GPIO10,
        mosi: p.GPIO11,
        lcd_cs, lcd_dc, lcd_rst, lcd_bl,
    }
}
