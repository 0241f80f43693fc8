use std::fmt;
use derive_more::Display;
use crate::{Bigr, GrWidths};

/// Idempotent of the Bar-Natan algebra of the 4-ended tangle:
/// `B` (⬮) for the horizontal and `C` (⬯) for the vertical pairing.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Display)]
pub enum Idem {
    #[display("⬮")]
    B,

    #[display("⬯")]
    C
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct BnObj {
    pub idem: Idem,
    pub gr: Bigr
}

impl BnObj {
    pub fn new(idem: Idem, h: i32, q: i32) -> Self {
        Self { idem, gr: Bigr::new(h, q) }
    }

    /// Composability test; gradings are ignored.
    pub fn eq_idem(&self, other: &Self) -> bool {
        self.idem == other.idem
    }

    pub fn gr_string(&self, w: &GrWidths) -> String {
        self.gr.gr_string(w)
    }
}

impl fmt::Display for BnObj {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.idem, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        assert_eq!(BnObj::new(Idem::B, 0, 0).to_string(), "⬮");
        assert_eq!(BnObj::new(Idem::C, 1, 2).to_string(), "⬯");
    }

    #[test]
    fn eq_idem() {
        let a = BnObj::new(Idem::B, 0, 0);
        let b = BnObj::new(Idem::B, 1, 2);
        assert!(a.eq_idem(&b));
        assert_ne!(a, b);
    }
}
