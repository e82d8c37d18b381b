use crate::errors::{CoreError, CoreResult};

/// Largest exponent accepted by [`normalize_decimal`]. Anything beyond this
/// would expand into an absurdly long string.
const MAX_EXPONENT: i64 = 1024;

///
/// Convert a decimal string, possibly written in scientific notation, into a
/// plain fixed-point string without going through floating point.
///
/// `1.5e-3` becomes `0.0015`, `2e2` becomes `200` and `1.2e-7` becomes
/// `0.00000012`. Leading zeros of the integer part and trailing zeros of the
/// fraction are removed, so `0.50` becomes `0.5`.
///
pub fn normalize_decimal(raw: &str) -> CoreResult<String> {
    let value = raw.trim();
    let invalid = || CoreError::InvalidDecimal(raw.to_string());

    let (negative, unsigned) = match value.as_bytes().first() {
        Some(b'-') => (true, &value[1..]),
        Some(b'+') => (false, &value[1..]),
        Some(_) => (false, value),
        None => return Err(invalid()),
    };

    let (mantissa, exponent) = match unsigned.find(['e', 'E']) {
        Some(pos) => {
            let exp_str = &unsigned[pos + 1..];
            let exponent = exp_str.parse::<i64>().map_err(|_| invalid())?;
            if exponent.abs() > MAX_EXPONENT {
                return Err(CoreError::ExponentOutOfRange(raw.to_string()));
            }
            (&unsigned[..pos], exponent)
        }
        None => (unsigned, 0),
    };

    let (int_part, frac_part) = match mantissa.split_once('.') {
        Some((int_part, frac_part)) => (int_part, frac_part),
        None => (mantissa, ""),
    };

    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if int_part.is_empty() && frac_part.is_empty() {
        return Err(invalid());
    }
    if !all_digits(int_part) || !all_digits(frac_part) {
        return Err(invalid());
    }

    let digits: String = format!("{}{}", int_part, frac_part);
    let point = int_part.len() as i64 + exponent;

    let (integer, fraction) = if point <= 0 {
        (
            String::from("0"),
            format!("{}{}", "0".repeat((-point) as usize), digits),
        )
    } else if point as usize >= digits.len() {
        (
            format!("{}{}", digits, "0".repeat(point as usize - digits.len())),
            String::new(),
        )
    } else {
        let (i, f) = digits.split_at(point as usize);
        (i.to_string(), f.to_string())
    };

    let integer = match integer.trim_start_matches('0') {
        "" => "0",
        trimmed => trimmed,
    };
    let fraction = fraction.trim_end_matches('0');

    let mut normalized = String::with_capacity(integer.len() + fraction.len() + 2);
    if negative && !(integer == "0" && fraction.is_empty()) {
        normalized.push('-');
    }
    normalized.push_str(integer);
    if !fraction.is_empty() {
        normalized.push('.');
        normalized.push_str(fraction);
    }

    Ok(normalized)
}

///
/// Check whether `gene_id` is an Arabidopsis (AGI) locus identifier such as
/// `At1g01010` or `ATCG00490`, in any letter case.
///
pub fn is_locus(gene_id: &str) -> bool {
    let bytes = gene_id.as_bytes();
    bytes.len() == 9
        && bytes[0].eq_ignore_ascii_case(&b'a')
        && bytes[1].eq_ignore_ascii_case(&b't')
        && matches!(bytes[2].to_ascii_uppercase(), b'1'..=b'5' | b'M' | b'C')
        && bytes[3].eq_ignore_ascii_case(&b'g')
        && bytes[4..].iter().all(u8::is_ascii_digit)
}

///
/// Case-normalize an AGI locus to the canonical `At#g#####` form.
/// Identifiers that are not AGI loci are returned unchanged.
///
pub fn normalize_locus(gene_id: &str) -> String {
    let trimmed = gene_id.trim();
    if !is_locus(trimmed) {
        return trimmed.to_string();
    }
    let bytes = trimmed.as_bytes();
    format!(
        "At{}g{}",
        bytes[2].to_ascii_uppercase() as char,
        &trimmed[4..]
    )
}

///
/// Derive the chromosome label (`1`-`5`, `M` or `C`) that an AGI locus sits on.
///
pub fn chromosome_of(gene_id: &str) -> CoreResult<char> {
    if !is_locus(gene_id) {
        return Err(CoreError::InvalidChromosome(gene_id.to_string()));
    }
    Ok(gene_id.as_bytes()[2].to_ascii_uppercase() as char)
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    #[case("1.5e-3", "0.0015")]
    #[case("2e2", "200")]
    #[case("1.2e-7", "0.00000012")]
    #[case("3", "3")]
    #[case("0.50", "0.5")]
    #[case(".5", "0.5")]
    #[case("-2.5E+1", "-25")]
    #[case("007.250", "7.25")]
    #[case("-0e5", "0")]
    #[case("12.345e1", "123.45")]
    fn test_normalize_decimal(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(normalize_decimal(raw).unwrap(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("NaN")]
    #[case("1.2.3")]
    #[case("e5")]
    #[case("1e")]
    #[case("abc")]
    fn test_normalize_decimal_rejects_garbage(#[case] raw: &str) {
        assert!(normalize_decimal(raw).is_err());
    }

    #[rstest]
    fn test_normalize_decimal_huge_exponent() {
        assert_eq!(
            normalize_decimal("1e99999"),
            Err(CoreError::ExponentOutOfRange("1e99999".to_string()))
        );
    }

    #[rstest]
    fn test_normalized_value_matches_float() {
        let fixed = normalize_decimal("6.02e-5").unwrap();
        assert_eq!(fixed, "0.0000602");
        assert!((fixed.parse::<f64>().unwrap() - 6.02e-5).abs() < 1e-15);
    }

    #[rstest]
    #[case("AT1G01010", "At1g01010")]
    #[case("at5g67890", "At5g67890")]
    #[case("ATCG00490", "AtCg00490")]
    #[case("atmg00010", "AtMg00010")]
    #[case("HopZ1a", "HopZ1a")]
    #[case(" At2g30000 ", "At2g30000")]
    fn test_normalize_locus(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(normalize_locus(raw), expected);
    }

    #[rstest]
    fn test_chromosome_of() {
        assert_eq!(chromosome_of("At3g12345").unwrap(), '3');
        assert_eq!(chromosome_of("AtCg00490").unwrap(), 'C');
        assert!(chromosome_of("At6g12345").is_err());
        assert!(chromosome_of("HopZ1a").is_err());
    }
}
