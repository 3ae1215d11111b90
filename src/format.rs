//! German number formatting for display (`1.305,00 €`, `18,2%`)

/// Insert `.` as thousands separator into a string of ASCII digits
fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push('.');
        }
        out.push(c);
    }
    out
}

/// Format with a fixed number of decimals, German separators
fn format_number(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return "–".to_string();
    }

    // Half away from zero; `{:.*}` alone rounds exact ties to even
    let factor = 10f64.powi(decimals as i32);
    let rounded = (value.abs() * factor).round() / factor;
    let formatted = format!("{:.*}", decimals, rounded);
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };

    // -0,00 reads as a bug
    let is_zero = formatted.chars().all(|c| c == '0' || c == '.');
    let sign = if value < 0.0 && !is_zero { "-" } else { "" };

    match frac_part {
        Some(frac) => format!("{}{},{}", sign, group_thousands(int_part), frac),
        None => format!("{}{}", sign, group_thousands(int_part)),
    }
}

/// Currency with cents: `300.000,00 €`
pub fn format_euro(value: f64) -> String {
    format!("{} €", format_number(value, 2))
}

/// Whole euros: `30.000 €`
pub fn format_euro_ganz(value: f64) -> String {
    format!("{} €", format_number(value, 0))
}

/// Currency with an explicit `+` for non-negative values
pub fn format_euro_signed(value: f64) -> String {
    if value >= 0.0 {
        format!("+{}", format_euro(value))
    } else {
        format_euro(value)
    }
}

/// Percentage with one decimal: `18,2%`
pub fn format_prozent(value: f64) -> String {
    format!("{}%", format_number(value, 1))
}
