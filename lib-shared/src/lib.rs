/// Module with shared code.
pub mod stats;
