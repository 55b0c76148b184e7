//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises a specific subsystem
//! against the simulation adapters.  All tests run on the host (x86_64)
//! with no real hardware required.

mod hub_tests;
mod shared_bus_tests;
mod sensor_contract_tests;
