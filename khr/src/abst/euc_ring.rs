use std::ops::{Div, DivAssign, Rem, RemAssign};
use crate::{Ring, RingOps};

// Euclidean rings

pub trait EucRingOps<T = Self>:
    RingOps<T> +
    Div<T, Output = T> +
    for<'a> Div<&'a T, Output = T> +
    Rem<T, Output = T> +
    for<'a> Rem<&'a T, Output = T>
{}

pub trait EucRing:
    Ring +
    EucRingOps +
    DivAssign +
    for<'a> DivAssign<&'a Self> +
    RemAssign +
    for<'a> RemAssign<&'a Self>
where
    for<'a> &'a Self: EucRingOps<Self>
{
    fn divides(&self, y: &Self) -> bool {
        !self.is_zero() && (y % self).is_zero()
    }

    fn gcd(x: &Self, y: &Self) -> Self {
        if x.is_zero() {
            let u = y.normalizing_unit();
            y * &u
        } else {
            Self::gcd(&(y % x), x)
        }
    }

    fn gcdx(x: &Self, y: &Self) -> (Self, Self, Self) {
        if x.is_zero() {
            let u = y.normalizing_unit();
            (y * &u, Self::zero(), u)
        } else {
            let (q, r) = (y / x, y % x);
            let (d, s, t) = Self::gcdx(&r, x);
            (d, t - &s * &q, s)
        }
    }

    fn lcm(x: &Self, y: &Self) -> Self {
        if x.is_zero() || y.is_zero() {
            return Self::zero()
        }
        let g = Self::gcd(x, y);
        x * (y / &g)
    }
}
