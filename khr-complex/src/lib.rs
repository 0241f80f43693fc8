mod matrix;
mod complex;
mod cob_cx;
mod cleanup;
mod chain;
mod curve;

pub use matrix::*;
pub use complex::*;
pub use cob_cx::*;
pub use cleanup::*;
pub use chain::*;
pub use curve::*;
