//! ILI9341 demo
//! ========================================
//! needs to be run in WSL2 terminal
//! source ~/export-esp.sh
//! cargo run --release --features esp32s3
//! ========================================
//!
//! Brings the panel up, paints color bars, blits a small gradient tile and
//! then blinks a square in the corner forever.

//% CHIPS: esp32s3
//% FEATURES: esp-hal/unstable

#![no_std]
#![no_main]

// Define the application description, which is placed in a special section of the binary.
// This is used by the bootloader to verify the application.
// The macro automatically fills in the fields.
esp_bootloader_esp_idf::esp_app_desc!();

use esp_backtrace as _;
use esp_hal::{main, Config};
use esp_println::println;

use embedded_graphics::{pixelcolor::Rgb565, prelude::*};
use embedded_hal::delay::DelayNs;

use ili9341_tft::{
    display::{setup_display, timer_delay},
    wiring::init_display_pins,
};

// Forwards driver `log` records to the serial console.
struct PrintlnLogger;

impl log::Log for PrintlnLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::Level::Debug
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            println!("[{}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: PrintlnLogger = PrintlnLogger;

const TILE: u16 = 32;

#[main]
fn main() -> ! {
    let peripherals = esp_hal::init(Config::default());

    log::set_logger(&LOGGER).ok();
    log::set_max_level(log::LevelFilter::Debug);

    println!("ili9341 demo: boot");

    let pins = init_display_pins(peripherals);
    let mut delay = timer_delay();
    let (mut display, _backlight) = setup_display(pins, &mut delay);
    let (w, h) = display.size();
    println!("ili9341 demo: panel {}x{}", w, h);

    // Color bars
    let bars = [
        Rgb565::RED, Rgb565::GREEN, Rgb565::BLUE, Rgb565::YELLOW,
        Rgb565::CYAN, Rgb565::MAGENTA, Rgb565::WHITE, Rgb565::BLACK,
    ];
    let bar_h = h / bars.len() as u16;
    for (i, c) in bars.iter().enumerate() {
        display.fill_rect(0, i as u16 * bar_h, w, bar_h, *c).expect("fill");
    }

    // Gradient tile, stored low byte first like an image converted on a PC
    let mut tile = [0u8; (TILE as usize) * (TILE as usize) * 2];
    for (i, px) in tile.chunks_exact_mut(2).enumerate() {
        let (x, y) = ((i % TILE as usize) as u8, (i / TILE as usize) as u8);
        let c = Rgb565::new(x, y * 2, 31 - x).into_storage();
        px.copy_from_slice(&c.to_le_bytes());
    }
    display
        .draw_bitmap((w - TILE) / 2, (h - TILE) / 2, TILE, TILE, &tile)
        .expect("bitmap");

    // Diagonal, one pixel at a time
    for i in 0..w.min(h) {
        display.set_pixel(i, i, Rgb565::WHITE).expect("pixel");
    }

    let mut on = false;
    loop {
        on = !on;
        let c = if on { Rgb565::RED } else { Rgb565::BLACK };
        if let Err(e) = display.fill_rect(w - 16, 0, 16, 16, c) {
            println!("ili9341 demo: draw failed: {:?}", e);
        }
        delay.delay_ms(500);
    }
}
