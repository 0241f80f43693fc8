mod obj;
mod mor;

pub use obj::*;
pub use mor::*;
