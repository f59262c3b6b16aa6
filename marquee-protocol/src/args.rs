//! Argument scanners
//!
//! Command arguments are decimal integers in the forgiving style of C's
//! `scanf("%d")`: leading whitespace is skipped, an optional sign is
//! accepted, and anything after the last expected number is ignored.
//! A literal separator must follow the first number immediately.

/// Whitespace as understood by `%d`
fn is_space(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\r' | 0x0B | 0x0C)
}

/// Scan one signed decimal integer from the front of `input`
///
/// Returns the value and the unconsumed remainder, or `None` if no digits
/// were found or the value does not fit in an `i32`.
pub fn scan_int(input: &[u8]) -> Option<(i32, &[u8])> {
    let start = input.iter().position(|&b| !is_space(b))?;
    let mut rest = &input[start..];

    let negative = match rest.first() {
        Some(b'-') => {
            rest = &rest[1..];
            true
        }
        Some(b'+') => {
            rest = &rest[1..];
            false
        }
        _ => false,
    };

    let digits = rest.iter().take_while(|b| b.is_ascii_digit()).count();
    if digits == 0 {
        return None;
    }

    // Accumulate negatively so i32::MIN is representable
    let mut value: i32 = 0;
    for &d in &rest[..digits] {
        value = value.checked_mul(10)?.checked_sub(i32::from(d - b'0'))?;
    }
    if !negative {
        value = value.checked_neg()?;
    }

    Some((value, &rest[digits..]))
}

/// Scan a single integer argument (`In`)
pub fn scan_single(input: &[u8]) -> Option<i32> {
    scan_int(input).map(|(value, _)| value)
}

/// Scan a `first,second` integer pair (`Acol,row`)
pub fn scan_pair(input: &[u8]) -> Option<(i32, i32)> {
    let (first, rest) = scan_int(input)?;
    let rest = rest.strip_prefix(b",")?;
    let (second, _) = scan_int(rest)?;
    Some((first, second))
}
