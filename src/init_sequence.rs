// ILI9341 command opcodes and the power-on register table.
//
// The table is vendor tuning (power control, VCOM, gamma, pixel format,
// orientation). Values and order follow the vendor bring-up verbatim and
// must not be reordered.

pub const SWRESET: u8 = 0x01;
pub const SLPOUT: u8 = 0x11;
pub const DISPON: u8 = 0x29;
pub const CASET: u8 = 0x2A;
pub const PASET: u8 = 0x2B;
pub const RAMWR: u8 = 0x2C;
pub const MADCTL: u8 = 0x36;

/// MADCTL value: MX + BGR, portrait.
pub const MADCTL_PORTRAIT_BGR: u8 = 0x48;

/// Ordered (command, parameters) pairs sent between software reset and sleep out.
pub const INIT_SEQUENCE: &[(u8, &[u8])] = &[
    (0xCB, &[0x39, 0x2C, 0x00, 0x34, 0x02]), // power control A
    (0xCF, &[0x00, 0xC1, 0x30]),             // power control B
    (0xE8, &[0x85, 0x00, 0x78]),             // driver timing A
    (0xEA, &[0x00, 0x00]),                   // driver timing B
    (0xED, &[0x64, 0x03, 0x12, 0x81]),       // power-on sequence
    (0xF7, &[0x20]),                         // pump ratio
    (0xC0, &[0x23]),                         // power control 1
    (0xC1, &[0x10]),                         // power control 2
    (0xC5, &[0x3E, 0x28]),                   // VCOM 1
    (0xC7, &[0x86]),                         // VCOM 2
    (MADCTL, &[MADCTL_PORTRAIT_BGR]),
    (0x3A, &[0x55]),                         // 16 bpp
    (0xB1, &[0x00, 0x18]),                   // frame rate
    (0xB6, &[0x08, 0x82, 0x27]),             // display function
    (0xF2, &[0x00]),                         // 3-gamma off
    (0x26, &[0x01]),                         // gamma curve 1
    (
        0xE0, // positive gamma
        &[0x0F, 0x31, 0x2B, 0x0C, 0x0E, 0x08, 0x4E, 0xF1, 0x37, 0x07, 0x10, 0x03, 0x0E, 0x09, 0x00],
    ),
    (
        0xE1, // negative gamma
        &[0x00, 0x0E, 0x14, 0x03, 0x11, 0x07, 0x31, 0xC1, 0x48, 0x08, 0x0F, 0x0C, 0x31, 0x36, 0x0F],
    ),
];

/// Bring-up phase of the controller as seen by the host.
///
/// The phases advance strictly in declaration order; a failure leaves the
/// driver parked in the phase that failed until the next `initialize()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitState {
    Unreset,
    Resetting,
    PoweringUp,
    ConfiguringPanel,
    SleepingOut,
    Active,
}
