//! Adapters: concrete implementations of the port traits.
//!
//! | Adapter    | Implements                              | Connects to              |
//! |------------|-----------------------------------------|--------------------------|
//! | `esp`      | MicrosClock                             | ESP-IDF `esp_timer`      |
//! | `log_sink` | SnapshotSink                            | Serial / stderr log      |
//! | `sim`      | embedded-hal GPIO/I2C/delay, all ports  | In-memory state          |

#[cfg(target_os = "espidf")]
pub mod esp;
pub mod log_sink;
pub mod sim;
