use std::fmt;
use std::fmt::Display;
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg};
use auto_impl_ops::auto_ops;
use num_traits::Zero;
use khr::{Ring, RingOps};
use crate::Idem;

/// The two generating faces of the 4-ended Bar-Natan algebra.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Face {
    D,
    S
}

/// A single algebra generator with coefficient: `ty > 0` is D^ty,
/// `ty < 0` is S^(-ty) and `ty == 0` is the identity.
#[derive(Clone, PartialEq, Eq, Debug)]
struct Label<R> {
    ty: i32,
    coeff: R
}

impl<R> Label<R>
where R: Ring, for<'x> &'x R: RingOps<R> {
    fn matches(&self, face: Face) -> bool {
        match face {
            Face::D => self.ty > 0,
            Face::S => self.ty < 0
        }
    }

    fn to_string(&self, is_4ended: bool) -> String {
        let c = if self.coeff.is_one() {
            String::new()
        } else if (-&self.coeff).is_one() {
            String::from("-")
        } else {
            format!("{}.", self.coeff)
        };

        let body = if self.ty > 0 {
            let gen = if is_4ended { "D" } else { "H" };
            if self.ty == 1 {
                gen.to_string()
            } else {
                format!("{gen}^{}", self.ty)
            }
        } else if self.ty == 0 {
            String::from("id")
        } else {
            assert!(is_4ended);
            if self.ty == -1 {
                String::from("S")
            } else {
                format!("S^{}", -self.ty)
            }
        };

        format!("{c}{body}")
    }
}

/// Morphism in the Bar-Natan algebra: a sum of labels between two
/// idempotents. The zero morphism carries no labels and composes with
/// anything.
#[derive(Clone, Eq, Debug)]
pub struct BnMor<R>
where R: Ring, for<'x> &'x R: RingOps<R> {
    front: Idem,
    back: Idem,
    labels: Vec<Label<R>>
}

impl<R> BnMor<R>
where R: Ring, for<'x> &'x R: RingOps<R> {
    pub fn new(front: Idem, back: Idem, labels: Vec<(i32, R)>) -> Self {
        let labels = labels.into_iter().map(|(ty, coeff)|
            Label { ty, coeff }
        ).collect();

        let mut res = Self { front, back, labels };
        res.simplify();
        res
    }

    pub fn gen(front: Idem, back: Idem, ty: i32, coeff: R) -> Self {
        Self::new(front, back, vec![(ty, coeff)])
    }

    pub fn zero() -> Self {
        Self { front: Idem::B, back: Idem::B, labels: vec![] }
    }

    pub fn is_zero(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn front(&self) -> Idem {
        self.front
    }

    pub fn back(&self) -> Idem {
        self.back
    }

    pub fn num_labels(&self) -> usize {
        self.labels.len()
    }

    /// Sorts labels by type, merges equal types and drops zero
    /// coefficients.
    fn simplify(&mut self) {
        self.labels.sort_by_key(|l| l.ty);

        let mut merged: Vec<Label<R>> = vec![];
        for l in self.labels.drain(..) {
            if let Some(last) = merged.last_mut() {
                if last.ty == l.ty {
                    last.coeff += l.coeff;
                    continue
                }
            }
            merged.push(l);
        }
        merged.retain(|l| !l.coeff.is_zero());

        self.labels = merged;
    }

    pub fn first_type(&self) -> Option<i32> {
        self.labels.first().map(|l| l.ty)
    }

    pub fn first_coeff(&self) -> Option<&R> {
        self.labels.first().map(|l| &l.coeff)
    }

    /// Exponent of the first label on the given face, if any.
    pub fn type_of_face(&self, face: Face) -> Option<i32> {
        self.labels.iter().find(|l| l.matches(face)).map(|l| l.ty)
    }

    pub fn coeff_of_face(&self, face: Face) -> Option<&R> {
        self.labels.iter().find(|l| l.matches(face)).map(|l| &l.coeff)
    }

    /// Number of labels on the given face. A single matrix entry may
    /// carry several arrows of one face, e.g. `D + D²`.
    pub fn num_labels_of_face(&self, face: Face) -> usize {
        self.labels.iter().filter(|l| l.matches(face)).count()
    }

    pub fn set_coeff(&mut self, coeff: R) {
        for l in self.labels.iter_mut() {
            l.coeff = coeff.clone();
        }
    }

    /// One single-label morphism per label, in label order.
    pub fn split(&self) -> Vec<Self> {
        self.labels.iter().map(|l|
            Self::gen(self.front, self.back, l.ty, l.coeff.clone())
        ).collect()
    }

    pub fn is_inv(&self) -> bool {
        self.labels.len() == 1 &&
        self.labels[0].ty == 0 &&
        self.labels[0].coeff.is_unit()
    }

    pub fn inv(&self) -> Option<Self> {
        if !self.is_inv() {
            return None
        }
        let c = self.labels[0].coeff.inv()?;
        Some(Self::gen(self.back, self.front, 0, c))
    }

    pub fn scale(&mut self, r: &R) {
        for l in self.labels.iter_mut() {
            l.coeff *= r;
        }
        self.simplify();
    }

    pub fn map_coeffs<S, F>(&self, f: F) -> BnMor<S>
    where
        S: Ring, for<'x> &'x S: RingOps<S>,
        F: Fn(&R) -> S
    {
        let labels = self.labels.iter().map(|l|
            (l.ty, f(&l.coeff))
        ).collect();
        BnMor::new(self.front, self.back, labels)
    }

    pub fn check(&self, from: Idem, to: Idem) -> bool {
        self.is_zero() || (self.front == from && self.back == to)
    }

    pub fn to_string_mode(&self, is_4ended: bool) -> String {
        if self.is_zero() {
            return String::from("0")
        }

        let mut res = String::new();
        for (k, l) in self.labels.iter().enumerate() {
            let s = l.to_string(is_4ended);
            if k > 0 && !s.starts_with('-') {
                res.push('+');
            }
            res.push_str(&s);
        }
        res
    }
}

impl<R> PartialEq for BnMor<R>
where R: Ring, for<'x> &'x R: RingOps<R> {
    fn eq(&self, other: &Self) -> bool {
        if self.is_zero() && other.is_zero() {
            return true
        }
        self.front == other.front &&
        self.back == other.back &&
        self.labels == other.labels
    }
}

impl<R> Display for BnMor<R>
where R: Ring, for<'x> &'x R: RingOps<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_string_mode(true))
    }
}

// Composition: `m2 * m1` is `m2 ∘ m1`, with `m1` applied first.
// Labels of opposite faces annihilate (D·S = 0), equal faces add
// exponents.
#[auto_ops]
impl<'a, 'b, R> Mul<&'b BnMor<R>> for &'a BnMor<R>
where R: Ring, for<'x> &'x R: RingOps<R> {
    type Output = BnMor<R>;
    fn mul(self, rhs: &'b BnMor<R>) -> BnMor<R> {
        if self.is_zero() || rhs.is_zero() {
            return BnMor::zero()
        }

        assert!(self.front == rhs.back);

        let mut labels = vec![];
        for l1 in rhs.labels.iter() {
            for l2 in self.labels.iter() {
                if l1.ty * l2.ty >= 0 {
                    labels.push((l1.ty + l2.ty, &l1.coeff * &l2.coeff));
                }
            }
        }
        BnMor::new(rhs.front, self.back, labels)
    }
}

#[auto_ops]
impl<R> AddAssign<&BnMor<R>> for BnMor<R>
where R: Ring, for<'x> &'x R: RingOps<R> {
    fn add_assign(&mut self, rhs: &BnMor<R>) {
        if rhs.is_zero() {
            return
        }
        if self.is_zero() {
            *self = rhs.clone();
            return
        }

        assert!(self.front == rhs.front && self.back == rhs.back);

        self.labels.extend(rhs.labels.iter().cloned());
        self.simplify();
    }
}

impl<R> Neg for BnMor<R>
where R: Ring, for<'x> &'x R: RingOps<R> {
    type Output = Self;
    fn neg(mut self) -> Self {
        for l in self.labels.iter_mut() {
            l.coeff = -&l.coeff;
        }
        self
    }
}

impl<R> Neg for &BnMor<R>
where R: Ring, for<'x> &'x R: RingOps<R> {
    type Output = BnMor<R>;
    fn neg(self) -> BnMor<R> {
        -self.clone()
    }
}
