// ILI9341 TFT driver over 4-wire SPI (separate D/C line).
//
// Wiring on the demo board (ESP32-S3 + 2.8" ILI9341 module):
//   CS  = GPIO9
//   DC  = GPIO8
//   RST = GPIO14
//   SCK = GPIO10, MOSI = GPIO11
//
// Protocol:
//   DC low  -> byte is a command
//   DC high -> bytes are parameters or pixel data
//   Pixels are RGB565, high byte first on the wire.
//   0x2A/0x2B set the column/row window, 0x2C starts a memory write and the
//   controller auto-advances row-major through the window.

use core::fmt;

use embedded_graphics::{
    pixelcolor::Rgb565,
    prelude::*,
    primitives::Rectangle,
};
use embedded_hal::{
    delay::DelayNs,
    digital::OutputPin,
    spi::SpiDevice,
};

use crate::config::{PanelConfig, Timing};
use crate::init_sequence::{
    InitState, CASET, DISPON, INIT_SEQUENCE, MADCTL, MADCTL_PORTRAIT_BGR, PASET, RAMWR, SLPOUT,
    SWRESET,
};

// Staging buffer size for fills and bitmaps. Lives on the caller's stack.
pub const FILL_CHUNK: usize = 512;

/// Error type that wraps SPI and GPIO errors.
#[derive(Debug)]
pub enum Ili9341Error<SpiE, GpioE> {
    Spi(SpiE),
    Gpio(GpioE),
    /// Bitmap byte count is not `2 * width * height`.
    BufferLengthMismatch { expected: usize, actual: usize },
    /// Drawing was attempted before `initialize()` completed.
    NotInitialized,
}

impl<SpiE: fmt::Debug, GpioE: fmt::Debug> From<SpiE> for Ili9341Error<SpiE, GpioE> {
    fn from(e: SpiE) -> Self { Self::Spi(e) }
}

/// ILI9341 panel driver.
///
/// Owns the SPI device (which handles CS), the D/C line and the reset line.
/// Every drawing call takes `&mut self`, so a window and the pixel stream
/// that fills it can never be interleaved with another caller's.
pub struct Ili9341<SPI, DC, RST> {
    spi: SPI,
    dc: DC,
    rst: RST,
    w: u16,
    h: u16,
    timing: Timing,
    state: InitState,
}

impl<SPI, DC, RST> Ili9341<SPI, DC, RST>
where
    SPI: SpiDevice<u8>,
    DC: OutputPin,
    RST: OutputPin<Error = DC::Error>,
{
    /// Wrap the peripherals. Nothing is sent until `initialize()`.
    pub fn new(spi: SPI, dc: DC, rst: RST, config: PanelConfig) -> Self {
        Self {
            spi,
            dc,
            rst,
            w: config.width,
            h: config.height,
            timing: config.timing,
            state: InitState::Unreset,
        }
    }

    /// Give the peripherals back.
    pub fn release(self) -> (SPI, DC, RST) {
        (self.spi, self.dc, self.rst)
    }

    // Panel width in pixels.
    #[inline]
    pub fn width(&self) -> u16 { self.w }

    // Panel height in pixels.
    #[inline]
    pub fn height(&self) -> u16 { self.h }

    // Panel Size
    pub fn size(&self) -> (u16, u16) { (self.w, self.h) }

    pub fn state(&self) -> InitState { self.state }

    // ---- Bring-up ----

    /// Hardware reset: RST low, settle, RST high, settle.
    ///
    /// Leaves the driver in `PoweringUp`; drawing needs a full `initialize()`.
    pub fn reset(
        &mut self,
        delay: &mut impl DelayNs,
    ) -> Result<(), Ili9341Error<SPI::Error, DC::Error>> {
        self.state = InitState::Resetting;
        log::debug!("ili9341: hardware reset");

        self.rst.set_low().map_err(Ili9341Error::Gpio)?;
        delay.delay_ms(self.timing.reset_low_ms);
        self.rst.set_high().map_err(Ili9341Error::Gpio)?;
        delay.delay_ms(self.timing.reset_high_ms);

        self.state = InitState::PoweringUp;
        Ok(())
    }

    /// Full bring-up from any state to `Active`.
    ///
    /// The command trace is the same on every call; nothing depends on what
    /// the controller was doing before the hardware reset.
    pub fn initialize(
        &mut self,
        delay: &mut impl DelayNs,
    ) -> Result<(), Ili9341Error<SPI::Error, DC::Error>> {
        let result = self.run_init(delay);
        if result.is_err() {
            log::warn!("ili9341: init aborted in {:?}", self.state);
        }
        result
    }

    fn run_init(
        &mut self,
        delay: &mut impl DelayNs,
    ) -> Result<(), Ili9341Error<SPI::Error, DC::Error>> {
        self.reset(delay)?;

        // SW reset + settle
        self.write_command(SWRESET)?;
        delay.delay_ms(self.timing.sw_reset_ms);

        self.state = InitState::ConfiguringPanel;
        log::debug!("ili9341: sending {} register writes", INIT_SEQUENCE.len());
        for &(cmd, params) in INIT_SEQUENCE {
            self.command(cmd, params)?;
        }

        // Sleep out + settle
        self.state = InitState::SleepingOut;
        self.write_command(SLPOUT)?;
        delay.delay_ms(self.timing.sleep_out_ms);

        self.write_command(DISPON)?;
        // Orientation again once the panel is running
        self.command(MADCTL, &[MADCTL_PORTRAIT_BGR])?;

        self.state = InitState::Active;
        log::debug!("ili9341: active, {}x{}", self.w, self.h);
        Ok(())
    }

    // ---- Command/data framing ----

    /// Send one command byte with D/C low.
    pub fn write_command(&mut self, cmd: u8) -> Result<(), Ili9341Error<SPI::Error, DC::Error>> {
        self.dc.set_low().map_err(Ili9341Error::Gpio)?;
        self.spi.write(&[cmd])?;
        Ok(())
    }

    /// Send parameter or pixel bytes with D/C high. D/C stays high afterwards.
    pub fn write_data(&mut self, data: &[u8]) -> Result<(), Ili9341Error<SPI::Error, DC::Error>> {
        self.dc.set_high().map_err(Ili9341Error::Gpio)?;
        if !data.is_empty() {
            self.spi.write(data)?;
        }
        Ok(())
    }

    /// Command byte followed by its parameters, if any.
    pub fn command(&mut self, cmd: u8, params: &[u8]) -> Result<(), Ili9341Error<SPI::Error, DC::Error>> {
        self.write_command(cmd)?;
        if !params.is_empty() {
            self.write_data(params)?;
        }
        Ok(())
    }

    // ---- Window ----

    // Program the write window and open a memory write.
    //
    // Only called after the drawing entry points have checked bounds; the
    // debug asserts catch a caller in this file that forgot. On return D/C is
    // high and the next `2 * (x1-x0+1) * (y1-y0+1)` data bytes fill the
    // window row by row.
    fn set_window(
        &mut self,
        x0: u16, y0: u16,
        x1: u16, y1: u16,
    ) -> Result<(), Ili9341Error<SPI::Error, DC::Error>> {
        debug_assert!(x0 <= x1 && y0 <= y1);
        debug_assert!(x1 < self.w && y1 < self.h);

        let ca = [(x0 >> 8) as u8, (x0 & 0xFF) as u8, (x1 >> 8) as u8, (x1 & 0xFF) as u8];
        let ra = [(y0 >> 8) as u8, (y0 & 0xFF) as u8, (y1 >> 8) as u8, (y1 & 0xFF) as u8];

        self.command(CASET, &ca)?;
        self.command(PASET, &ra)?;
        self.write_command(RAMWR)?;
        self.dc.set_high().map_err(Ili9341Error::Gpio)?;
        Ok(())
    }

    // ---- Drawing ----

    /// Plot one pixel. Off-panel coordinates are ignored.
    pub fn set_pixel(
        &mut self, x: u16, y: u16, color: Rgb565,
    ) -> Result<(), Ili9341Error<SPI::Error, DC::Error>> {
        self.ensure_active()?;
        if x >= self.w || y >= self.h {
            log::trace!("ili9341: pixel ({}, {}) off panel", x, y);
            return Ok(());
        }

        let be = color.into_storage().to_be_bytes();
        self.set_window(x, y, x, y)?;
        self.spi.write(&be)?;
        Ok(())
    }

    /// Fill a rectangle with one color.
    ///
    /// Exactly `w * h` pixels are sent after the window, so the controller's
    /// write cursor ends on the last cell. Rectangles that do not fit on the
    /// panel are ignored.
    pub fn fill_rect(
        &mut self, x: u16, y: u16, w: u16, h: u16, color: Rgb565,
    ) -> Result<(), Ili9341Error<SPI::Error, DC::Error>> {
        self.ensure_active()?;
        if w == 0 || h == 0 { return Ok(()); }
        let Some((x1, y1)) = self.rect_end(x, y, w, h) else {
            log::trace!("ili9341: fill {}x{} at ({}, {}) off panel", w, h, x, y);
            return Ok(());
        };

        self.set_window(x, y, x1, y1)?;

        let c = color.into_storage().to_be_bytes();
        let mut chunk: heapless::Vec<u8, FILL_CHUNK> = heapless::Vec::new();
        while chunk.len() + 2 <= FILL_CHUNK {
            chunk.extend_from_slice(&c).ok();
        }

        // Count pixels in u32: w * h always fits, w * h * 2 may not on 32-bit.
        let chunk_px = (chunk.len() / 2) as u32;
        let mut remaining = (w as u32) * (h as u32);
        while remaining > 0 {
            let take = core::cmp::min(chunk_px, remaining);
            self.spi.write(&chunk[..(take as usize) * 2])?;
            remaining -= take;
        }
        Ok(())
    }

    /// Blit a `w x h` image at (x, y).
    ///
    /// `data` holds `w * h` RGB565 pixels, row-major, each stored low byte
    /// first. Pixels are swapped to wire order while streaming.
    pub fn draw_bitmap(
        &mut self, x: u16, y: u16, w: u16, h: u16, data: &[u8],
    ) -> Result<(), Ili9341Error<SPI::Error, DC::Error>> {
        self.ensure_active()?;

        // Size math in u64 so a huge extent cannot overflow a 32-bit usize.
        let expected = (w as u64) * (h as u64) * 2;
        if data.len() as u64 != expected {
            return Err(Ili9341Error::BufferLengthMismatch {
                expected: usize::try_from(expected).unwrap_or(usize::MAX),
                actual: data.len(),
            });
        }
        if w == 0 || h == 0 { return Ok(()); }
        let Some((x1, y1)) = self.rect_end(x, y, w, h) else {
            log::trace!("ili9341: bitmap {}x{} at ({}, {}) off panel", w, h, x, y);
            return Ok(());
        };

        self.set_window(x, y, x1, y1)?;

        let mut chunk: heapless::Vec<u8, FILL_CHUNK> = heapless::Vec::new();
        for px in data.chunks_exact(2) {
            if chunk.len() + 2 > FILL_CHUNK {
                self.spi.write(&chunk)?;
                chunk.clear();
            }
            let be = u16::from_le_bytes([px[0], px[1]]).to_be_bytes();
            chunk.extend_from_slice(&be).ok();
        }
        if !chunk.is_empty() {
            self.spi.write(&chunk)?;
        }
        Ok(())
    }

    // ---- Low-level helpers ----

    fn ensure_active(&self) -> Result<(), Ili9341Error<SPI::Error, DC::Error>> {
        if self.state == InitState::Active {
            Ok(())
        } else {
            Err(Ili9341Error::NotInitialized)
        }
    }

    // Inclusive bottom-right corner, or None if the rectangle leaves the panel.
    // `w` and `h` must be non-zero.
    fn rect_end(&self, x: u16, y: u16, w: u16, h: u16) -> Option<(u16, u16)> {
        // overflow-safe bounds
        let (pw, ph) = (self.w as u32, self.h as u32);
        let (x0, y0, w32, h32) = (x as u32, y as u32, w as u32, h as u32);
        if x0 + w32 > pw || y0 + h32 > ph {
            return None;
        }
        Some(((x0 + w32 - 1) as u16, (y0 + h32 - 1) as u16))
    }
}

// -------------------- embedded-graphics integration --------------------
impl<SPI, DC, RST> OriginDimensions for Ili9341<SPI, DC, RST>
where
    SPI: SpiDevice<u8>,
    DC: OutputPin,
    RST: OutputPin<Error = DC::Error>,
{
    fn size(&self) -> Size {
        Size::new(self.w as u32, self.h as u32)
    }
}

impl<SPI, DC, RST> DrawTarget for Ili9341<SPI, DC, RST>
where
    SPI: SpiDevice<u8>,
    DC: OutputPin,
    RST: OutputPin<Error = DC::Error>,
{
    type Color = Rgb565;
    type Error = Ili9341Error<SPI::Error, DC::Error>;

    // One window per pixel; slow, but there is no framebuffer to batch into.
    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Rgb565>>,
    {
        for Pixel(p, c) in pixels {
            let (Ok(x), Ok(y)) = (u16::try_from(p.x), u16::try_from(p.y)) else {
                continue;
            };
            self.set_pixel(x, y, c)?;
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Rgb565) -> Result<(), Self::Error> {
        // Clip to panel
        let area = area.intersection(&self.bounding_box());
        if area.size.width == 0 || area.size.height == 0 {
            return Ok(());
        }
        self.fill_rect(
            area.top_left.x as u16,
            area.top_left.y as u16,
            area.size.width as u16,
            area.size.height as u16,
            color,
        )
    }

    fn clear(&mut self, color: Rgb565) -> Result<(), Self::Error> {
        self.fill_rect(0, 0, self.w, self.h, color)
    }
}
