// Parameter state capture and restoration

pub mod guard;

pub use guard::{ParameterSnapshot, ParameterStateGuard};
