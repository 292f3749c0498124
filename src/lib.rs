pub mod assembler;
pub mod comm;
pub mod config;
pub mod error;
pub mod generators;
pub mod halo;
pub mod labfile;
pub mod maze;
pub mod partition;

pub use config::{GenConfig, SeedSource};
pub use error::{ConfigError, GenError};
pub use generators::{Generated, generate_maze};
pub use maze::{Cell, Grid};
