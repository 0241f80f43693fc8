mod zmod;
mod frac;

pub use zmod::*;
pub use frac::*;
