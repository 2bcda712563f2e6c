//! GPIO / bus-address / board-ID assignments for the GroundTest core board.
//!
//! Single source of truth — every driver and adapter references this module
//! rather than hard-coding pin numbers or addresses.  Change a value here
//! and it propagates everywhere.

// ---------------------------------------------------------------------------
// I2C buses
// ---------------------------------------------------------------------------

/// Slow bus — shared by the mux, the core I/O expander and (through the mux)
/// every peripheral board's expander.
pub const I2C_SLOW_SDA_GPIO: i32 = 21;
pub const I2C_SLOW_SCL_GPIO: i32 = 22;

/// Fast bus — dedicated point-to-point link, not multiplexed.
pub const I2C_FAST_SDA_GPIO: i32 = 16;
pub const I2C_FAST_SCL_GPIO: i32 = 17;

/// Both buses run at 400 kHz.
pub const I2C_BAUD_HZ: u32 = 400_000;

// ---------------------------------------------------------------------------
// SPI buses
// ---------------------------------------------------------------------------

/// Peripheral SPI bus (HSPI) — shared by the amplifiers on the RTD and
/// thermocouple boards.  Chip selects are emulated on each board's expander,
/// so the bus itself carries no CS line.
pub const SPI_SCK_GPIO: i32 = 14;
pub const SPI_MOSI_GPIO: i32 = 13;
pub const SPI_MISO_GPIO: i32 = 12;

/// Core SPI bus (VSPI) — SD card only.
pub const SPI_CORE_SCK_GPIO: i32 = 18;
pub const SPI_CORE_MOSI_GPIO: i32 = 23;
pub const SPI_CORE_MISO_GPIO: i32 = 19;
pub const SPI_CORE_CS_GPIO: i32 = 5;

// ---------------------------------------------------------------------------
// Board identification ADC inputs
// ---------------------------------------------------------------------------

/// One analog ID line per slot, in slot order 0..=7.
pub const BOARD_ID_GPIOS: [i32; 8] = [36, 39, 34, 35, 32, 33, 0, 2];

// ---------------------------------------------------------------------------
// Discrete lines
// ---------------------------------------------------------------------------

/// Single digital broadcast output to all peripheral boards.
pub const BROADCAST_GPIO: i32 = 25;

/// Core expander interrupt line, active low.  Polled, not handled in an ISR.
pub const EXPANDER_IRQ_GPIO: i32 = 4;

// ---------------------------------------------------------------------------
// I2C addresses
// ---------------------------------------------------------------------------

/// TCA9548A 8-channel bus multiplexer, on the slow bus trunk.
pub const I2C_MUX_ADDRESS: u8 = 0x70;

/// PCF8575 expander on the core board (LEDs + buttons), slow bus trunk.
pub const CORE_EXPANDER_ADDRESS: u8 = 0x20;

/// PCF8575 expanders on the peripheral boards, behind the mux.
pub const IGNITER_EXPANDER_ADDRESS: u8 = 0x21;
pub const RTD_EXPANDER_ADDRESS: u8 = 0x22;
pub const PT_EXPANDER_ADDRESS: u8 = 0x23;
pub const THERMOCOUPLE_EXPANDER_ADDRESS: u8 = 0x24;

// ---------------------------------------------------------------------------
// Board-ID reference values (12-bit ADC counts)
// ---------------------------------------------------------------------------

pub const BOARD_ID_IGNITER: u16 = 430;
pub const BOARD_ID_SOLENOID: u16 = 1018;
pub const BOARD_ID_SERVO: u16 = 1139;
pub const BOARD_ID_THERMOCOUPLE: u16 = 1615;
pub const BOARD_ID_RTD: u16 = 2199;
pub const BOARD_ID_PT_A: u16 = 2812;
pub const BOARD_ID_PT_B: u16 = 3726;

// ---------------------------------------------------------------------------
// PT / load-cell board expander pin map
// ---------------------------------------------------------------------------

/// (clk, data) expander pins per pressure-transducer amplifier channel.
pub const PT_CHANNEL_PINS: [(u8, u8); 6] = [(9, 8), (11, 10), (13, 12), (6, 7), (4, 5), (2, 3)];

/// (clk, data) expander pins per load-cell amplifier channel.
pub const LC_CHANNEL_PINS: [(u8, u8); 2] = [(15, 14), (0, 1)];

// ---------------------------------------------------------------------------
// RTD / thermocouple board chip-select pin maps
// ---------------------------------------------------------------------------

/// Expander pin driving each RTD amplifier's chip select.
pub const RTD_CS_PINS: [u8; 8] = [8, 9, 10, 11, 12, 13, 14, 15];

/// Expander pin driving each thermocouple amplifier's chip select.
pub const THERMOCOUPLE_CS_PINS: [u8; 5] = [8, 10, 12, 14, 7];
