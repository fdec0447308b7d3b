mod polling;
pub use polling::*;
