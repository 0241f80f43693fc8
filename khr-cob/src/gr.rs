use std::ops::{Add, AddAssign};
use auto_impl_ops::auto_ops;
use khr::Frac;
use khr::util::format::fill_front;

/// Bigrading of a generator: homological grading `h` and quantum grading `q`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Debug)]
pub struct Bigr {
    pub h: i32,
    pub q: i32
}

impl Bigr {
    pub fn new(h: i32, q: i32) -> Self {
        Self { h, q }
    }

    /// δ = q/2 − h.
    pub fn delta(&self) -> Frac<i64> {
        Frac::new(self.q as i64 - 2 * self.h as i64, 2)
    }

    pub fn shift(&mut self, dh: i32, dq: i32) {
        self.h += dh;
        self.q += dq;
    }

    pub fn shifted(&self, dh: i32, dq: i32) -> Self {
        Self::new(self.h + dh, self.q + dq)
    }

    pub fn gr_string(&self, w: &GrWidths) -> String {
        format!("h^{} q^{} δ^{}",
            fill_front(self.h, w.h),
            fill_front(self.q, w.q),
            fill_front(self.delta(), w.delta)
        )
    }
}

#[auto_ops]
impl Add<&Bigr> for &Bigr {
    type Output = Bigr;
    fn add(self, rhs: &Bigr) -> Bigr {
        Bigr::new(self.h + rhs.h, self.q + rhs.q)
    }
}

/// Column widths for aligned grading output.
#[derive(Clone, Copy, Default, Debug)]
pub struct GrWidths {
    pub h: usize,
    pub q: usize,
    pub delta: usize
}

impl GrWidths {
    pub fn collect<'a, I>(grs: I) -> Self
    where I: IntoIterator<Item = &'a Bigr> {
        let mut w = Self::default();
        for gr in grs {
            w.h = w.h.max(gr.h.to_string().len());
            w.q = w.q.max(gr.q.to_string().len());
            w.delta = w.delta.max(gr.delta().to_string().len());
        }
        w
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta() {
        assert_eq!(Bigr::new(1, 3).delta(), Frac::new(1, 2));
        assert_eq!(Bigr::new(-1, 2).delta(), Frac::new(2, 1));
    }

    #[test]
    fn add() {
        assert_eq!(Bigr::new(1, 2) + Bigr::new(3, -1), Bigr::new(4, 1));
    }

    #[test]
    fn gr_string() {
        let grs = [Bigr::new(-1, 3), Bigr::new(10, -2)];
        let w = GrWidths::collect(grs.iter());
        assert_eq!(grs[0].gr_string(&w), "h^-1 q^ 3 δ^5/2");
        assert_eq!(grs[1].gr_string(&w), "h^10 q^-2 δ^-11");
    }
}
