//! GPIO pin assignments.
//!
//! Single source of truth for the firmware's wiring.  The `d1_mini` table
//! documents the WEMOS D1 mini silkscreen labels for boards wired to that
//! layout; nothing enforces it.

// ---------------------------------------------------------------------------
// WEMOS D1 mini reference map (informational)
// ---------------------------------------------------------------------------

/// Silkscreen label → GPIO number.  D8 and D4 have pull-downs on the board.
pub mod d1_mini {
    pub const D0: i32 = 16;
    pub const D1: i32 = 5;
    pub const D2: i32 = 4;
    pub const D3: i32 = 0;
    pub const D4: i32 = 2;
    pub const D5: i32 = 14;
    pub const D6: i32 = 12;
    pub const D7: i32 = 13;
    pub const D8: i32 = 15;

    /// Labels in board order, for diagnostics output.
    pub const ALL: [(&str, i32); 9] = [
        ("D0", D0),
        ("D1", D1),
        ("D2", D2),
        ("D3", D3),
        ("D4", D4),
        ("D5", D5),
        ("D6", D6),
        ("D7", D7),
        ("D8", D8),
    ];

    /// Board label for a GPIO number, if it is broken out.
    pub fn label(gpio: i32) -> Option<&'static str> {
        ALL.iter().find(|(_, g)| *g == gpio).map(|(l, _)| *l)
    }
}

// ---------------------------------------------------------------------------
// Shared I2C bus (BME280, BH1750)
// ---------------------------------------------------------------------------

pub const I2C_SDA_GPIO: i32 = 8;
pub const I2C_SCL_GPIO: i32 = 9;
/// Standard-mode bus clock.
pub const I2C_BAUDRATE_HZ: u32 = 100_000;

// ---------------------------------------------------------------------------
// Ultrasonic ranger (HC-SR04)
// ---------------------------------------------------------------------------

/// Digital output: 10 µs high pulse starts a ping.
pub const HCSR04_TRIGGER_GPIO: i32 = 4;
/// Digital input: high for the echo round-trip time.  Needs a 5 V → 3.3 V divider.
pub const HCSR04_ECHO_GPIO: i32 = 5;

// ---------------------------------------------------------------------------
// Buttons
// ---------------------------------------------------------------------------

/// Button bank inputs in channel order (`b0`, `b1`, ...).
pub const BUTTON_GPIOS: [i32; 2] = [6, 7];
