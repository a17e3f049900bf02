//! Amount input masking and result formatting

/// Currencies displayed without fractional digits.
pub const ZERO_DECIMAL_CURRENCIES: [&str; 6] = ["JPY", "KRW", "UZS", "KZT", "VND", "IDR"];

const MIN_FRACTION_DIGITS: usize = 2;
const MAX_FRACTION_DIGITS: usize = 4;

/// Keeps only the characters an amount may contain: digits and `.`.
pub fn sanitize_amount_input(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect()
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

/// Formats a typed amount with thousands separators, e.g. `1000000.5`
/// becomes `1,000,000.5`. Everything after the first `.` is kept as typed.
pub fn format_with_commas(raw: &str) -> String {
    let cleaned = sanitize_amount_input(raw);
    match cleaned.split_once('.') {
        Some((int_part, rest)) => format!("{}.{}", group_thousands(int_part), rest),
        None => group_thousands(&cleaned),
    }
}

/// Strips thousands separators from a formatted amount.
pub fn parse_formatted_number(formatted: &str) -> String {
    formatted.replace(',', "")
}

/// Parses the numeric prefix of a raw amount. Empty or non-numeric input
/// counts as zero.
pub fn parse_amount(raw: &str) -> f64 {
    let trimmed = raw.trim_start();
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;

    for (i, c) in trimmed.char_indices() {
        match c {
            '+' | '-' if i == 0 => {}
            '0'..='9' => seen_digit = true,
            '.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end = i + c.len_utf8();
    }

    if !seen_digit {
        return 0.0;
    }
    trimmed[..end]
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Formats a conversion result for display in `currency`.
pub fn format_result(value: f64, currency: &str) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    if ZERO_DECIMAL_CURRENCIES.contains(&currency) {
        let rounded = value.round();
        if rounded == 0.0 {
            return "0".to_string();
        }
        let digits = format!("{:.0}", rounded.abs());
        let sign = if rounded < 0.0 { "-" } else { "" };
        return format!("{sign}{}", group_thousands(&digits));
    }

    format_decimal(value)
}

/// Formats with thousands separators and 2 to 4 fraction digits.
pub fn format_decimal(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let fixed = format!("{:.*}", MAX_FRACTION_DIGITS, value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let mut frac = frac_part.trim_end_matches('0').to_string();
    while frac.len() < MIN_FRACTION_DIGITS {
        frac.push('0');
    }

    let is_zero = int_part.bytes().all(|b| b == b'0') && frac.bytes().all(|b| b == b'0');
    let sign = if value < 0.0 && !is_zero { "-" } else { "" };
    format!("{sign}{}.{frac}", group_thousands(int_part))
}
