use std::fmt::Display;
use num_traits::ToPrimitive;
use crate::IntoDigits;

pub fn paren_expr<S>(s: S) -> String
where S: Display {
    let s = s.to_string();
    if s.contains(' ') {
        format!("({s})")
    } else {
        s
    }
}

/// Right-aligns `s` to `width` by prepending spaces.
pub fn fill_front<S>(s: S, width: usize) -> String
where S: Display {
    let s = s.to_string();
    let n = s.chars().count();
    if n >= width {
        s
    } else {
        format!("{}{s}", " ".repeat(width - n))
    }
}

pub fn subscript<I>(i: I) -> String
where I: ToPrimitive {
    let i = i.to_isize().unwrap();

    if i == 0 {
        return '\u{2080}'.into()
    }

    let (init, i) = if i > 0 {
        (String::new(), i as usize)
    } else {
        ('\u{208B}'.into(), -i as usize)
    };

    i.into_digits().into_iter().fold(init, |mut res, d| {
        let c = char::from_u32( ('\u{2080}' as u32) + (d as u32) ).unwrap();
        res.push(c);
        res
    })
}

pub fn superscript<I>(i: I) -> String
where I: ToPrimitive {
    let i = i.to_isize().unwrap();

    if i == 0 {
        return '\u{2070}'.into()
    }

    let (init, i) = if i > 0 {
        (String::new(), i as usize)
    } else {
        ('\u{207B}'.into(), -i as usize)
    };

    i.into_digits().into_iter().fold(init, |mut res, d| {
        let c = match d {
            1 => '\u{00B9}',
            2 => '\u{00B2}',
            3 => '\u{00B3}',
            _ => char::from_u32(('\u{2070}' as u32) + (d as u32)).unwrap()
        };
        res.push(c);
        res
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscript() {
        assert_eq!(subscript(0), "₀");
        assert_eq!(subscript(1234567890), "₁₂₃₄₅₆₇₈₉₀");
        assert_eq!(subscript(-1234567890), "₋₁₂₃₄₅₆₇₈₉₀");
    }

    #[test]
    fn test_superscript() {
        assert_eq!(superscript(0), "⁰");
        assert_eq!(superscript(1234567890), "¹²³⁴⁵⁶⁷⁸⁹⁰");
        assert_eq!(superscript(-1234567890), "⁻¹²³⁴⁵⁶⁷⁸⁹⁰");
    }

    #[test]
    fn test_fill_front() {
        assert_eq!(fill_front("-1", 4), "  -1");
        assert_eq!(fill_front("-100", 4), "-100");
        assert_eq!(fill_front("-1000", 4), "-1000");
    }
}
