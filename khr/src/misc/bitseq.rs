use core::fmt;
use std::ops::Index;

use derive_more::{Display, Debug};

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, Debug, Default)]
pub enum Bit {
    #[default]
    #[display("0")]
    #[debug("0")]
    Bit0,

    #[display("1")]
    #[debug("1")]
    Bit1
}

impl Bit {
    pub fn is_zero(&self) -> bool {
        self == &Bit::Bit0
    }

    pub fn is_one(&self) -> bool {
        self == &Bit::Bit1
    }

    pub fn as_u64(&self) -> u64 {
        if self.is_zero() { 0 } else { 1 }
    }
}

impl From<bool> for Bit {
    fn from(b: bool) -> Self {
        if b {
            Bit::Bit1
        } else {
            Bit::Bit0
        }
    }
}

macro_rules! impl_bit_from_int {
    ($t:ty) => {
        impl From<$t> for Bit {
            fn from(val: $t) -> Self {
                match val {
                    0 => Bit::Bit0,
                    1 => Bit::Bit1,
                    _ => panic!()
                }
            }
        }
    };
}

impl_bit_from_int!(u8);
impl_bit_from_int!(u32);
impl_bit_from_int!(u64);
impl_bit_from_int!(usize);
impl_bit_from_int!(i32);
impl_bit_from_int!(i64);

#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BitSeq {
    val: u64,
    len: usize
}

impl BitSeq {
    pub const MAX_LEN: usize = 64;

    pub fn new(val: u64, len: usize) -> Self {
        assert!(len <= Self::MAX_LEN);
        assert!(val < (1 << len));
        Self { val, len }
    }

    pub fn empty() -> Self {
        Self::new(0, 0)
    }

    pub fn zeros(len: usize) -> Self {
        Self::new(0, len)
    }

    pub fn ones(len: usize) -> Self {
        let val = (1 << len) - 1;
        Self::new(val, len)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn as_u64(&self) -> u64 {
        self.val
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn weight(&self) -> usize {
        let mut v = self.val;
        (0..self.len).filter(|_| {
            let b = (v & 1) == 1;
            v >>= 1;
            b
        }).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = Bit> {
        let mut val = self.val;

        (0..self.len).map(move |_| {
            let b = val & 1;
            val >>= 1;
            Bit::from(b)
        })
    }

    pub fn set(&mut self, i: usize, b: Bit) {
        assert!(i < self.len);
        if b.is_zero() {
            self.val &= !(1 << i);
        } else {
            self.val |= 1 << i;
        }
    }

    pub fn set_0(&mut self, i: usize) {
        self.set(i, Bit::Bit0)
    }

    pub fn set_1(&mut self, i: usize) {
        self.set(i, Bit::Bit1)
    }

    pub fn push(&mut self, b: Bit) {
        assert!(self.len < Self::MAX_LEN);
        if b.is_one() {
            self.val |= 1 << self.len;
        }
        self.len += 1;
    }

    pub fn push_0(&mut self) {
        self.push(Bit::Bit0)
    }

    pub fn push_1(&mut self) {
        self.push(Bit::Bit1)
    }

    pub fn remove(&mut self, i: usize) {
        assert!(i < self.len);

        let a = self.val & !((1 << (i + 1)) - 1);
        let b = self.val & ((1 << i) - 1);

        self.val = a >> 1 | b;
        self.len -= 1;
    }

    pub fn insert(&mut self, i: usize, b: Bit) {
        assert!(i <= self.len);
        assert!(self.len < Self::MAX_LEN);

        let mask = (1 << i) - 1;
        let a = self.val & !mask;
        let b = b.as_u64() << i;
        let c = self.val & mask;

        self.val = a << 1 | b | c;
        self.len += 1;
    }

    pub fn insert_0(&mut self, i: usize) {
        self.insert(i, Bit::Bit0)
    }

    pub fn insert_1(&mut self, i: usize) {
        self.insert(i, Bit::Bit1)
    }

    pub fn edit<F>(&self, f: F) -> Self
    where F: FnOnce(&mut BitSeq) {
        let mut copy = *self;
        f(&mut copy);
        copy
    }

    pub fn generate(len: usize) -> Vec<BitSeq> {
        assert!(len <= Self::MAX_LEN);
        (0..2_u64.pow(len as u32)).map(|v| Self::new(v, len)).collect()
    }

    /// All sequences of the given length except the all-ones sequence.
    pub fn generate_proper(len: usize) -> Vec<BitSeq> {
        assert!(len > 0);
        let mut v = Self::generate(len);
        v.pop();
        v
    }
}

impl<T> From<T> for BitSeq
where Bit: From<T> {
    fn from(b: T) -> Self {
        let val = if Bit::from(b).is_zero() { 0 } else { 1 };
        Self::new(val, 1)
    }
}

impl<T, const N: usize> From<[T; N]> for BitSeq
where Bit: From<T> {
    fn from(value: [T; N]) -> Self {
        Self::from_iter(value)
    }
}

impl<T> FromIterator<T> for BitSeq
where Bit: From<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut val = 0;
        let mut len = 0;
        for b in iter.into_iter() {
            if Bit::from(b).is_one() {
                val |= 1 << len;
            }
            len += 1;
        }
        Self::new(val, len)
    }
}

impl Index<usize> for BitSeq {
    type Output = Bit;

    fn index(&self, i: usize) -> &Self::Output {
        assert!(i < self.len);
        match (self.val >> i) & 1 {
            0 => &Bit::Bit0,
            1 => &Bit::Bit1,
            _ => panic!()
        }
    }
}

impl fmt::Display for BitSeq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in self.iter() {
            fmt::Display::fmt(&b, f)?;
        }
        Ok(())
    }
}

impl fmt::Debug for BitSeq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl PartialOrd for BitSeq {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BitSeq {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.len().cmp(&other.len()).then_with( ||
            self.weight().cmp(&other.weight())
        ).then_with(||
            self.as_u64().cmp(&other.as_u64())
        )
    }
}
