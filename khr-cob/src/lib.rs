mod gr;
mod bn;
mod cob;

pub use gr::*;
pub use bn::*;
pub use cob::*;
