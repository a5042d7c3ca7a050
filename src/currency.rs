/// Formats a price with the given currency symbol, two fraction digits and
/// comma thousands grouping, e.g. `£150,000.00`.
///
/// Ties round to the even penny. Non-finite values render as zero.
pub fn format_price(value: f64, symbol: &str) -> String {
    if !value.is_finite() {
        return format!("{}0.00", symbol);
    }

    let minor_units = (value.abs() * 100.0).round_ties_even() as u128;
    let whole = (minor_units / 100).to_string();
    let fraction = minor_units % 100;

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 && minor_units > 0 { "-" } else { "" };
    format!("{}{}{}.{:02}", sign, symbol, grouped, fraction)
}
