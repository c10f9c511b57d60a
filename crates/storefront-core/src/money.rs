use rust_decimal::{Decimal, RoundingStrategy};

/// Formats `amount` for display in `currency_code`, e.g. `"$1,234.50"`.
///
/// Known currencies get their symbol; anything else is prefixed with the
/// ISO code (`"CHF 12.00"`). Amounts are rounded half-up to two places.
#[must_use]
pub fn format_money(amount: Decimal, currency_code: &str) -> String {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let digits = rounded.abs().to_string();
    let (whole, fraction) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));
    let body = format!("{}.{fraction}", group_thousands(whole));

    match symbol_for(currency_code) {
        Some(symbol) => format!("{sign}{symbol}{body}"),
        None => format!("{sign}{} {body}", currency_code.to_ascii_uppercase()),
    }
}

fn symbol_for(currency_code: &str) -> Option<&'static str> {
    match currency_code.to_ascii_uppercase().as_str() {
        "USD" | "MXN" => Some("$"),
        "EUR" => Some("€"),
        "GBP" => Some("£"),
        _ => None,
    }
}

fn group_thousands(whole: &str) -> String {
    let len = whole.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
