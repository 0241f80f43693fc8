mod int_ext;
mod sign;
mod digits;

pub mod bitseq;

pub use int_ext::*;
pub use sign::*;
pub use digits::*;
