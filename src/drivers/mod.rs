//! Platform-independent helpers built on `embedded-hal`.

pub mod pulse;
