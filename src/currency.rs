/// Parse a wire or display amount. Tolerates a leading rupee sign and group
/// separators; anything unparsable is zero.
pub fn parse_amount(input: &str) -> f64 {
    let trimmed = input.trim();
    let trimmed = trimmed.strip_prefix('₹').unwrap_or(trimmed).trim();
    let cleaned: String = trimmed.chars().filter(|c| *c != ',').collect();

    match cleaned.parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

/// Format an amount with Indian digit grouping and two decimals: 12,34,567.89
pub fn format_inr(amount: f64) -> String {
    if !amount.is_finite() {
        return "0.00".to_string();
    }

    let cents = round_cents(amount.abs());
    let whole = cents / 100;
    let frac = cents % 100;

    let grouped = group_indian(&whole.to_string());
    if amount < 0.0 && cents > 0 {
        format!("-{grouped}.{frac:02}")
    } else {
        format!("{grouped}.{frac:02}")
    }
}

/// Round a non-negative amount to whole hundredths, half away from zero.
///
/// The fractional part is taken with a fused multiply-add so the decision
/// follows the stored value: 4.355 is stored just above the tie and rounds
/// up, 8.325 just below and rounds down.
fn round_cents(abs: f64) -> u128 {
    let mut whole = (abs * 100.0).floor();
    let mut frac = abs.mul_add(100.0, -whole);
    if frac < 0.0 {
        whole -= 1.0;
        frac += 1.0;
    }
    let cents = if frac >= 0.5 { whole + 1.0 } else { whole };
    cents.max(0.0) as u128
}

/// Whole paise for a payable amount. Negative and non-finite amounts are zero.
pub fn to_paise(amount: f64) -> u64 {
    if !amount.is_finite() || amount <= 0.0 {
        return 0;
    }
    round_cents(amount) as u64
}

/// Format a raw wire string as an amount.
pub fn format_amount(input: &str) -> String {
    format_inr(parse_amount(input))
}

/// Format with the rupee prefix used in tables and summaries.
pub fn rupees(amount: f64) -> String {
    format!("₹{}", format_inr(amount))
}

/// Last three digits form one group, everything before groups in pairs.
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut reversed = String::with_capacity(head.len() + head.len() / 2);
    for (i, ch) in head.chars().rev().enumerate() {
        if i > 0 && i % 2 == 0 {
            reversed.push(',');
        }
        reversed.push(ch);
    }
    let head: String = reversed.chars().rev().collect();

    format!("{head},{tail}")
}
