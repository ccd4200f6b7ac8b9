//! ---
//! courier_section: "03-configuration-logging"
//! courier_subsection: "module"
//! courier_type: "source"
//! courier_scope: "code"
//! courier_description: "Shared configuration and logging utilities."
//! courier_version: "v0.0.0-prealpha"
//! courier_owner: "tbd"
//! ---
//! Configuration loading and tracing initialisation shared by courier
//! binaries and integration tests.

pub mod config;
pub mod logging;

pub use config::{BenchConfig, CourierConfig, LoadedCourierConfig, LoggingConfig};
pub use logging::{init, init_tracing, LogFormat};
