#![allow(non_upper_case_globals)]

use std::iter::{Sum, Product};
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign, Mul, MulAssign, Div, DivAssign, Rem, RemAssign};
use std::str::FromStr;
use derive_more::{Display, Debug};
use num_traits::{Zero, One};
use auto_impl_ops::auto_ops;

use crate::{Elem, AddMonOps, AddGrpOps, MonOps, RingOps, FieldOps, EucRingOps, AddMon, AddGrp, Mon, Ring, EucRing, Field};

type I = i64;

/// The ring of integers mod `N`, a field when `N` is prime.
///
/// Composite `N` serves as an "integer simulant": computing over
/// `ZMod<2310>` and projecting via [`ZMod::cast`] recovers the results
/// over each prime factor in a single run.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Display, Debug)]
#[display("{_0}")]
#[debug("{_0}")]
pub struct ZMod<const N: I>(I);

pub type F2 = ZMod<2>;
pub type F3 = ZMod<3>;
pub type F5 = ZMod<5>;
pub type F7 = ZMod<7>;

pub const integer_simulant: I = 2 * 3 * 5 * 7 * 11;
pub type ZSim = ZMod<integer_simulant>;

impl<const N: I> ZMod<N> {
    pub fn new(a: I) -> Self {
        assert!(N > 0);
        Self(a.rem_euclid(N))
    }

    pub fn rep(&self) -> &I {
        &self.0
    }

    /// Projects to the quotient ring mod `M`, which must divide `N`.
    pub fn cast<const M: I>(&self) -> ZMod<M> {
        assert!(N % M == 0);
        ZMod::new(self.0)
    }
}

impl<const N: I> From<I> for ZMod<N> {
    fn from(a: I) -> Self {
        Self::new(a)
    }
}

impl<const N: I> From<i32> for ZMod<N> {
    fn from(a: i32) -> Self {
        Self::new(a as I)
    }
}

impl<const N: I> FromStr for ZMod<N> {
    type Err = <I as FromStr>::Err;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let a = s.parse::<I>()?;
        Ok(Self::new(a))
    }
}

impl<const N: I> Zero for ZMod<N> {
    fn zero() -> Self {
        Self(0)
    }

    fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl<const N: I> One for ZMod<N> {
    fn one() -> Self {
        Self(1)
    }

    fn is_one(&self) -> bool {
        self.0.is_one()
    }
}

macro_rules! impl_unop {
    ($trait:ident, $method:ident) => {
        impl<const N: I> $trait for ZMod<N> {
            type Output = Self;
            fn $method(self) -> Self::Output {
                Self::new(self.0.$method())
            }
        }

        impl<'a, const N: I> $trait for &'a ZMod<N> {
            type Output = ZMod<N>;
            #[inline]
            fn $method(self) -> Self::Output {
                ZMod::new(self.0.$method())
            }
        }
    };
}

impl_unop!(Neg, neg);

macro_rules! impl_binop {
    ($trait:ident, $method:ident) => {
        #[auto_ops]
        impl<'a, 'b, const N: I> $trait<&'b ZMod<N>> for &'a ZMod<N> {
            type Output = ZMod<N>;
            fn $method(self, rhs: &'b ZMod<N>) -> Self::Output {
                ZMod::new(self.0.$method(&rhs.0))
            }
        }
    }
}

impl_binop!(Add, add);
impl_binop!(Sub, sub);
impl_binop!(Mul, mul);

#[auto_ops]
impl<'a, 'b, const N: I> Div<&'b ZMod<N>> for &'a ZMod<N> {
    type Output = ZMod<N>;
    fn div(self, rhs: &'b ZMod<N>) -> Self::Output {
        let inv = rhs.inv().unwrap(); // rhs must be a unit
        self * inv
    }
}

#[auto_ops]
impl<'a, 'b, const N: I> Rem<&'b ZMod<N>> for &'a ZMod<N> {
    type Output = ZMod<N>;
    fn rem(self, rhs: &'b ZMod<N>) -> Self::Output {
        assert!(rhs.is_unit());
        ZMod::zero()
    }
}

macro_rules! impl_accum {
    ($trait:ident, $method:ident, $accum_method:ident, $accum_init:ident) => {
        impl<const N: I> $trait for ZMod<N> {
            fn $method<Iter: Iterator<Item = Self>>(iter: Iter) -> Self {
                iter.fold(Self::$accum_init(), |mut res, r| {
                    Self::$accum_method(&mut res, r);
                    res
                })
            }
        }

        impl<'a, const N: I> $trait<&'a ZMod<N>> for ZMod<N> {
            fn $method<Iter: Iterator<Item = &'a ZMod<N>>>(iter: Iter) -> Self {
                iter.fold(Self::$accum_init(), |mut res, r| {
                    Self::$accum_method(&mut res, r);
                    res
                })
            }
        }
    }
}

impl_accum!(Sum, sum, add_assign, zero);
impl_accum!(Product, product, mul_assign, one);

macro_rules! impl_alg_ops {
    ($trait:ident) => {
        impl<const N: I> $trait for ZMod<N> {}
        impl<'a, const N: I> $trait<ZMod<N>> for &'a ZMod<N> {}
    };
}

impl_alg_ops!(AddMonOps);
impl_alg_ops!(AddGrpOps);
impl_alg_ops!(MonOps);
impl_alg_ops!(RingOps);
impl_alg_ops!(EucRingOps);
impl_alg_ops!(FieldOps);

impl<const N: I> Elem for ZMod<N> {
    fn math_symbol() -> String {
        use crate::util::format::subscript;
        format!("Z{}", subscript(N as isize))
    }
}

impl<const N: I> AddMon for ZMod<N> {}
impl<const N: I> AddGrp for ZMod<N> {}
impl<const N: I> Mon for ZMod<N> {}

impl<const N: I> Ring for ZMod<N> {
    fn inv(&self) -> Option<Self> {
        // 1 = ax + Ny  ->  ax = 1 mod N.
        let (d, x, _y) = I::gcdx(&self.0, &N);
        if d.is_one() {
            Some(Self::new(x))
        } else {
            None
        }
    }

    fn is_unit(&self) -> bool {
        I::gcd(&self.0, &N).is_one()
    }

    fn normalizing_unit(&self) -> Self {
        match self.inv() {
            Some(inv) => inv,
            None => Self::one()
        }
    }
}

impl<const N: I> EucRing for ZMod<N> {}
impl<const N: I> Field for ZMod<N> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init() {
        let a = F3::new(-7);
        assert_eq!(a.0, 2);

        let a = F5::new(-7);
        assert_eq!(a.0, 3);
    }

    #[test]
    fn display() {
        let a = F3::new(-7);
        assert_eq!(format!("{}", a), "2");

        let a = F5::new(-7);
        assert_eq!(format!("{}", a), "3");
    }

    #[test]
    fn add() {
        let a = F5::new(3);
        let b = F5::new(4);
        assert_eq!(a + b, F5::new(2));
    }

    #[test]
    fn neg() {
        let a = F5::new(3);
        assert_eq!(-a, F5::new(2));
    }

    #[test]
    fn sub() {
        let a = F5::new(3);
        let b = F5::new(4);
        assert_eq!(a - b, F5::new(4));
    }

    #[test]
    fn mul() {
        let a = F5::new(3);
        let b = F5::new(4);
        assert_eq!(a * b, F5::new(2));
    }

    #[test]
    fn div() {
        let a = F5::new(4);
        let b = F5::new(3);
        assert_eq!(a / b, F5::new(3));
    }

    #[test]
    fn inv() {
        assert_eq!(F5::new(2).inv(), Some(F5::new(3)));
        assert_eq!(F5::new(0).inv(), None);
    }

    #[test]
    fn simulant_units() {
        assert!(ZSim::new(13).is_unit());
        assert!(!ZSim::new(6).is_unit());
        assert!(!ZSim::new(0).is_unit());

        let a = ZSim::new(13);
        let b = a.inv().unwrap();
        assert!((a * b).is_one());
    }

    #[test]
    fn simulant_cast() {
        let a = ZSim::new(12);
        assert_eq!(a.cast::<2>(), F2::new(0));
        assert_eq!(a.cast::<5>(), F5::new(2));
        assert_eq!(a.cast::<7>(), F7::new(5));
    }
}
