//! Positional argument scanning for command tokens.
//!
//! Each reader consumes a prefix of the argument text and returns the
//! remainder, so readers chain with `?`. Any mismatch yields `None` and the
//! caller treats the whole command as malformed.

/// Read a run of ASCII digits as a number.
pub(crate) fn number(s: &str) -> Option<(f64, &str)> {
    let digits = s.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let value = s[..digits].parse::<f64>().ok()?;
    Some((value, &s[digits..]))
}

/// Consume one `,` delimiter.
pub(crate) fn comma(s: &str) -> Option<&str> {
    s.strip_prefix(',')
}

/// Consume a single uppercase ASCII letter (an orientation such as `N`).
pub(crate) fn upper(s: &str) -> Option<&str> {
    let first = *s.as_bytes().first()?;
    first.is_ascii_uppercase().then(|| &s[1..])
}

/// `<n>,<n>`
pub(crate) fn pair(s: &str) -> Option<(f64, f64)> {
    let (a, rest) = number(s)?;
    let (b, _) = number(comma(rest)?)?;
    Some((a, b))
}

/// `<n>,<n>,<n>`
pub(crate) fn triple(s: &str) -> Option<(f64, f64, f64)> {
    let (a, rest) = number(s)?;
    let (b, rest) = number(comma(rest)?)?;
    let (c, _) = number(comma(rest)?)?;
    Some((a, b, c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_reads_leading_digits() {
        assert_eq!(number("50,60"), Some((50.0, ",60")));
        assert_eq!(number("7"), Some((7.0, "")));
        assert_eq!(number(",7"), None);
        assert_eq!(number("-7"), None);
    }

    #[test]
    fn trailing_text_is_ignored() {
        assert_eq!(pair("50,90,0"), Some((50.0, 90.0)));
        assert_eq!(triple("300,0,3x"), Some((300.0, 0.0, 3.0)));
    }

    #[test]
    fn missing_parts_fail() {
        assert_eq!(pair("50"), None);
        assert_eq!(pair("50,"), None);
        assert_eq!(triple("1,2"), None);
        assert_eq!(upper("n,1"), None);
        assert_eq!(upper(""), None);
    }
}
