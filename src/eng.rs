// Engineering-notation rendering for exact decimal instrument settings

use crate::dlog::{DlogError, Result};

// SI prefixes for exponents -15 through 12, in steps of 3.
const PREFIXES: [&str; 10] = ["f", "p", "n", "µ", "m", "", "k", "M", "G", "T"];

/// Render a value in engineering notation: trailing insignificant digits
/// stripped, exponent a multiple of 3, SI prefix appended.
///
/// The value's shortest round-trip decimal form is used as the exact
/// digit string, so settings that originate as exact decimals (`1000`,
/// `0.002`) render without floating-point artifacts: `"1k"`, `"2m"`.
/// Exponents outside the prefix table fall back to a bare `e` exponent,
/// e.g. `"1.5e15"`.
pub fn to_eng_string(value: f64) -> Result<String> {
    if !value.is_finite() {
        return Err(DlogError::NonFinite(value));
    }
    if value == 0.0 {
        return Ok("0".to_string());
    }

    // Shortest decimal representation that round-trips; never uses an
    // exponent, so it splits cleanly at the point.
    let text = value.abs().to_string();
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), ""));

    let mut digits = format!("{int_part}{frac_part}");
    let mut exp = -(frac_part.len() as i32);
    while digits.len() > 1 && digits.ends_with('0') {
        digits.pop();
        exp += 1;
    }
    let digits = digits.trim_start_matches('0');

    // Power of ten of the leading digit, then the nearest engineering
    // exponent at or below it.
    let power = digits.len() as i32 - 1 + exp;
    let eng = power.div_euclid(3) * 3;
    let int_len = (power - eng + 1) as usize;

    let mut mantissa = digits.to_string();
    while mantissa.len() < int_len {
        mantissa.push('0');
    }
    if mantissa.len() > int_len {
        mantissa.insert(int_len, '.');
    }

    let sign = if value < 0.0 { "-" } else { "" };
    match prefix_for(eng) {
        Some(prefix) => Ok(format!("{sign}{mantissa}{prefix}")),
        None => Ok(format!("{sign}{mantissa}e{eng}")),
    }
}

fn prefix_for(eng: i32) -> Option<&'static str> {
    if !(-15..=12).contains(&eng) {
        return None;
    }
    Some(PREFIXES[((eng + 15) / 3) as usize])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_decimal_settings() {
        assert_eq!(to_eng_string(1000.0).unwrap(), "1k");
        assert_eq!(to_eng_string(0.002).unwrap(), "2m");
        assert_eq!(to_eng_string(0.2).unwrap(), "200m");
        assert_eq!(to_eng_string(1500.0).unwrap(), "1.5k");
    }

    #[test]
    fn test_no_prefix_band() {
        assert_eq!(to_eng_string(1.0).unwrap(), "1");
        assert_eq!(to_eng_string(12.0).unwrap(), "12");
        assert_eq!(to_eng_string(123.25).unwrap(), "123.25");
        assert_eq!(to_eng_string(0.0).unwrap(), "0");
    }

    #[test]
    fn test_mantissa_splitting() {
        assert_eq!(to_eng_string(123456.0).unwrap(), "123.456k");
        assert_eq!(to_eng_string(1234.5).unwrap(), "1.2345k");
        assert_eq!(to_eng_string(0.15).unwrap(), "150m");
        assert_eq!(to_eng_string(2.5e6).unwrap(), "2.5M");
    }

    #[test]
    fn test_small_magnitudes() {
        assert_eq!(to_eng_string(1e-7).unwrap(), "100n");
        assert_eq!(to_eng_string(0.000004).unwrap(), "4µ");
        assert_eq!(to_eng_string(2e-15).unwrap(), "2f");
    }

    #[test]
    fn test_negative_values() {
        assert_eq!(to_eng_string(-0.0025).unwrap(), "-2.5m");
        assert_eq!(to_eng_string(-1000.0).unwrap(), "-1k");
    }

    #[test]
    fn test_out_of_prefix_range() {
        assert_eq!(to_eng_string(1.5e15).unwrap(), "1.5e15");
        assert_eq!(to_eng_string(1e-18).unwrap(), "1e-18");
    }

    #[test]
    fn test_non_finite_rejected() {
        assert!(matches!(
            to_eng_string(f64::NAN),
            Err(DlogError::NonFinite(_))
        ));
        assert!(matches!(
            to_eng_string(f64::INFINITY),
            Err(DlogError::NonFinite(_))
        ));
    }
}
