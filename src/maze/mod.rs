pub mod band;
pub mod cell;
pub mod grid;
pub mod oracle;

pub use band::Band;
pub use cell::Cell;
pub use grid::Grid;
pub use oracle::{is_constructible, reclassify};
