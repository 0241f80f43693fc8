use std::fmt;
use std::fmt::Display;
use khr::Frac;

/// Classified loop-type component: a rational curve `r` (negative
/// `length`) or a special curve `s` (positive `length`), with its slope
/// as a reduced fraction (`slope_q == 0` encodes slope ∞), and the
/// quantum and δ gradings of the underlying chain.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct KhrCurve {
    length: i32,
    slope_p: i64,
    slope_q: i64,
    delta: Frac<i64>,
    q: Frac<i64>
}

impl KhrCurve {
    pub fn new(length: i32, slope_p: i64, slope_q: i64, delta: Frac<i64>, q: Frac<i64>) -> Self {
        assert!(length != 0);
        Self { length, slope_p, slope_q, delta, q }
    }

    pub fn is_rational(&self) -> bool {
        self.length < 0
    }

    pub fn is_special(&self) -> bool {
        self.length > 0
    }

    pub fn length(&self) -> usize {
        self.length.unsigned_abs() as usize
    }

    /// Slope as a reduced fraction, or `None` for slope ∞.
    pub fn slope(&self) -> Option<Frac<i64>> {
        (self.slope_q != 0).then(|| Frac::new(self.slope_p, self.slope_q))
    }

    pub fn delta(&self) -> Frac<i64> {
        self.delta.clone()
    }

    pub fn q(&self) -> Frac<i64> {
        self.q.clone()
    }
}

impl Display for KhrCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.length == -1 {
            write!(f, "r")?;
        } else if self.length < 0 {
            write!(f, "r{}", -self.length)?;
        } else {
            write!(f, "s{}", self.length)?;
        }

        if self.slope_q == 0 {
            write!(f, "(∞) q^{} δ_^{}", self.q, self.delta)
        } else {
            write!(f, "({}) q^{} δ|^{}", Frac::new(self.slope_p, self.slope_q), self.q, self.delta)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rational() {
        let c = KhrCurve::new(-1, -1, 1, Frac::new(1, 2), Frac::new(3, 2));
        assert!(c.is_rational());
        assert_eq!(c.slope(), Some(Frac::new(-1, 1)));
        assert_eq!(c.to_string(), "r(-1) q^3/2 δ|^1/2");

        let c = KhrCurve::new(-2, 1, 2, Frac::from(0), Frac::from(1));
        assert_eq!(c.to_string(), "r2(1/2) q^1 δ|^0");
    }

    #[test]
    fn special() {
        let c = KhrCurve::new(4, 0, 1, Frac::new(-1, 2), Frac::new(5, 3));
        assert!(c.is_special());
        assert_eq!(c.to_string(), "s4(0) q^5/3 δ|^-1/2");
    }

    #[test]
    fn vertical() {
        let c = KhrCurve::new(-1, 1, 0, Frac::from(1), Frac::from(-2));
        assert_eq!(c.slope(), None);
        assert_eq!(c.to_string(), "r(∞) q^-2 δ_^1");
    }
}
