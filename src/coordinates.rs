//! Degrees-minutes-seconds conversion for the two FAA coordinate encodings.
//!
//! NASR airport records carry "compact" coordinates such as `35-14-30.0000N`
//! (or the packed `351430N`), while the Digital Obstacle File uses a
//! space-separated `35 14 30.00N` layout. Both converters return `0.0` when
//! the text cannot be read; callers treat `0.0` as "no coordinate".

/// Round to six decimal places (about 0.1 m of latitude).
fn round6(value: f64) -> f64 {
    (value * 1_000_000.0).round() / 1_000_000.0
}

fn is_hemisphere(c: char) -> bool {
    matches!(c, 'N' | 'S' | 'E' | 'W')
}

fn dms(degrees: &str, minutes: &str, seconds: &str) -> Option<f64> {
    let d = degrees.trim().parse::<f64>().ok()?;
    let m = minutes.trim().parse::<f64>().ok()?;
    let s = seconds.trim().parse::<f64>().ok()?;
    let value = d + m / 60.0 + s / 3600.0;
    value.is_finite().then_some(value)
}

/// `DDMMSS[.s]` or `DDDMMSS[.s]` without separators, otherwise plain decimal degrees.
fn packed_or_decimal(clean: &str) -> Option<f64> {
    let (whole, fraction) = match clean.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (clean, None),
    };

    let degree_digits = match whole.len() {
        6 => 2,
        7 => 3,
        _ => 0,
    };

    if degree_digits > 0 && whole.chars().all(|c| c.is_ascii_digit()) {
        let seconds = match fraction {
            Some(f) => format!("{}.{}", &whole[degree_digits + 2..], f),
            None => whole[degree_digits + 2..].to_string(),
        };
        return dms(
            &whole[..degree_digits],
            &whole[degree_digits..degree_digits + 2],
            &seconds,
        );
    }

    let value = clean.trim().parse::<f64>().ok()?;
    value.is_finite().then_some(value)
}

fn try_parse_compact(raw: &str) -> Option<f64> {
    let upper = raw.trim().to_ascii_uppercase();
    if upper.is_empty() {
        return None;
    }

    let sign = if upper.contains(['S', 'W']) { -1.0 } else { 1.0 };
    let clean: String = upper.chars().filter(|c| !is_hemisphere(*c)).collect();
    let parts: Vec<&str> = clean.split('-').collect();

    let degrees = if parts.len() >= 3 {
        dms(parts[0], parts[1], parts[2])?
    } else {
        packed_or_decimal(&clean)?
    };

    Some(round6(degrees * sign))
}

/// Convert a NASR compact coordinate (`35-14-30.0000N`, `0775430W`) to signed
/// decimal degrees rounded to six places.
///
/// A south or west letter anywhere in the text makes the result negative.
/// Empty or malformed input yields `0.0`.
pub fn parse_compact_dms(raw: &str) -> f64 {
    try_parse_compact(raw).unwrap_or(0.0)
}

fn try_parse_spaced(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    let hemisphere = trimmed.chars().last().filter(|c| is_hemisphere(*c))?;
    let body = &trimmed[..trimmed.len() - hemisphere.len_utf8()];

    let parts: Vec<&str> = body.split_whitespace().collect();
    let [degrees, minutes, seconds] = parts.as_slice() else {
        return None;
    };

    let value = dms(degrees, minutes, seconds)?;
    Some(if matches!(hemisphere, 'S' | 'W') {
        -value
    } else {
        value
    })
}

/// Convert an obstacle-file coordinate (`35 14 30.00N`) to signed decimal degrees.
///
/// The text must end in a hemisphere letter preceded by exactly three numeric
/// tokens. Anything else yields `0.0`.
pub fn parse_spaced_dms(raw: &str) -> f64 {
    try_parse_spaced(raw).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_compact_hyphenated() {
        assert!(close(parse_compact_dms("35-14-30.0000N"), 35.241667));
        assert!(close(parse_compact_dms("077-54-30.0000W"), -77.908333));
        assert!(close(parse_compact_dms("33-56-32.9800S"), -33.942494));
        assert!(close(parse_compact_dms("151-10-38.0000E"), 151.177222));
    }

    #[test]
    fn test_compact_packed() {
        assert!(close(parse_compact_dms("351430N"), 35.241667));
        assert!(close(parse_compact_dms("0775430W"), -77.908333));
        assert!(close(parse_compact_dms("351430.5N"), 35.241806));
    }

    #[test]
    fn test_compact_is_rounded_to_six_places() {
        let value = parse_compact_dms("35-14-31.1234N");
        assert_eq!(value, round6(value));
    }

    #[test]
    fn test_compact_lowercase_and_padding() {
        assert!(close(parse_compact_dms("  35-14-30.0000n "), 35.241667));
    }

    #[test]
    fn test_compact_decimal_fallback() {
        assert!(close(parse_compact_dms("35.5N"), 35.5));
        assert!(close(parse_compact_dms("12.25W"), -12.25));
    }

    #[test]
    fn test_compact_malformed_is_zero() {
        assert_eq!(parse_compact_dms(""), 0.0);
        assert_eq!(parse_compact_dms("   "), 0.0);
        assert_eq!(parse_compact_dms("N"), 0.0);
        assert_eq!(parse_compact_dms("35-14N"), 0.0);
        assert_eq!(parse_compact_dms("AB-CD-EFN"), 0.0);
        assert_eq!(parse_compact_dms("35-1X-30N"), 0.0);
    }

    #[test]
    fn test_spaced() {
        assert!(close(parse_spaced_dms("35 14 30.00N"), 35.241667));
        assert!(close(parse_spaced_dms("077 54 30.00W"), -77.908333));
        assert!(close(parse_spaced_dms("33 56 32.98S"), -33.942494));
        assert!(close(parse_spaced_dms("08 05 00.00E"), 8.083333));
    }

    #[test]
    fn test_spaced_malformed_is_zero() {
        assert_eq!(parse_spaced_dms(""), 0.0);
        assert_eq!(parse_spaced_dms("35 14N"), 0.0);
        assert_eq!(parse_spaced_dms("35 14 30 10N"), 0.0);
        assert_eq!(parse_spaced_dms("35 14 30.00"), 0.0);
        assert_eq!(parse_spaced_dms("35 1X 30.00N"), 0.0);
        assert_eq!(parse_spaced_dms("35 14 1.2.3N"), 0.0);
    }
}
