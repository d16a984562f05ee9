//! Display formatting shared by the terminal, CSV, and PDF renderers.

/// `$1,234.56`, with a leading minus for negative amounts.
pub fn format_currency(value: f64) -> String {
    let cents = (value.abs() * 100.0).round() as u64;
    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!(
        "{sign}${}.{:02}",
        group_thousands(cents / 100),
        cents % 100
    )
}

/// `$1,235`, rounded to whole currency units for headline figures.
pub fn format_currency_whole(value: f64) -> String {
    let whole = value.abs().round() as u64;
    let sign = if value < 0.0 && whole > 0 { "-" } else { "" };
    format!("{sign}${}", group_thousands(whole))
}

pub fn format_percent(value: f64) -> String {
    format!("{value:.2}%")
}

pub fn format_term(term_years: u32) -> String {
    if term_years == 1 {
        "1 year".to_string()
    } else {
        format!("{term_years} years")
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
