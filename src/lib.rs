#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod delay_timer;
pub mod ili9341;
pub mod init_sequence;

#[cfg(feature = "esp32s3")]
pub mod display;
#[cfg(feature = "esp32s3")]
pub mod wiring;

#[cfg(test)]
mod mock;

pub use config::{PanelConfig, Timing, LCD_HEIGHT, LCD_WIDTH};
pub use delay_timer::{CounterDelay, FreeRunningCounter};
pub use ili9341::{Ili9341, Ili9341Error};
pub use init_sequence::InitState;
