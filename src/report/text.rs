//! Terminal rendering: summary block, yearly breakdown, stacked chart, monthly table.

use crate::core::{LoanParameters, LoanSummary, PeriodRecord, ScheduleWindow, YearlyAggregate};

use super::format::{format_currency, format_currency_whole, format_percent, format_term};

const PRINCIPAL_GLYPH: char = '#';
const INTEREST_GLYPH: char = '=';
const INSURANCE_GLYPH: char = '+';

pub fn format_summary(params: &LoanParameters, summary: &LoanSummary) -> String {
    let mut out = String::new();
    out.push_str("=== Loan Summary ===\n");
    out.push_str(&format!(
        "Principal:           {}\n",
        format_currency(params.principal)
    ));
    out.push_str(&format!(
        "Annual rate:         {}\n",
        format_percent(params.annual_rate_percent)
    ));
    out.push_str(&format!(
        "Term:                {} ({} payments)\n",
        format_term(params.term_years),
        summary.number_of_payments
    ));
    out.push('\n');
    out.push_str(&format!(
        "Monthly installment: {}\n",
        format_currency(summary.monthly_payment)
    ));
    out.push_str(&format!(
        "Monthly insurance:   {}\n",
        format_currency(summary.monthly_insurance)
    ));
    out.push_str(&format!(
        "Monthly total:       {}\n",
        format_currency(summary.monthly_total)
    ));
    out.push('\n');
    out.push_str(&format!(
        "Total installments:  {}\n",
        format_currency(summary.total_installments)
    ));
    out.push_str(&format!(
        "Total interest:      {}\n",
        format_currency(summary.total_interest)
    ));
    out.push_str(&format!(
        "Total insurance:     {}\n",
        format_currency(summary.total_insurance)
    ));
    out.push_str(&format!(
        "Total to pay:        {}\n",
        format_currency(summary.grand_total)
    ));
    out
}

pub fn format_yearly_table(years: &[YearlyAggregate]) -> String {
    let mut out = String::new();
    out.push_str("=== Yearly Breakdown ===\n");
    out.push_str(&format!(
        "{:>4} {:>14} {:>14} {:>12} {:>14}\n",
        "Year", "Principal", "Interest", "Insurance", "Year Total"
    ));
    out.push_str(&format!("{}\n", "-".repeat(62)));
    for year in years {
        out.push_str(&format!(
            "{:>4} {:>14} {:>14} {:>12} {:>14}\n",
            year.year,
            format_currency_whole(year.principal),
            format_currency_whole(year.interest),
            format_currency_whole(year.insurance),
            format_currency_whole(year.total),
        ));
    }
    out
}

/// Horizontal stacked bars, one per year, scaled so the largest year spans `width` cells.
pub fn render_stacked_chart(years: &[YearlyAggregate], width: usize) -> String {
    let mut out = String::new();
    out.push_str("=== Payments per Year ===\n");
    out.push_str(&format!(
        "{PRINCIPAL_GLYPH} principal  {INTEREST_GLYPH} interest  {INSURANCE_GLYPH} insurance\n"
    ));

    let max_total = years.iter().map(|y| y.total).fold(0.0_f64, f64::max);
    if max_total <= 0.0 || width == 0 {
        return out;
    }

    let scale = |amount: f64| {
        let cells = ((amount / max_total) * width as f64).round() as usize;
        cells.min(width)
    };
    for year in years {
        let principal_end = scale(year.principal);
        let interest_end = scale(year.principal + year.interest).max(principal_end);
        let insurance_end = scale(year.total).max(interest_end);

        let mut bar = String::with_capacity(width);
        bar.extend(std::iter::repeat_n(PRINCIPAL_GLYPH, principal_end));
        bar.extend(std::iter::repeat_n(INTEREST_GLYPH, interest_end - principal_end));
        bar.extend(std::iter::repeat_n(INSURANCE_GLYPH, insurance_end - interest_end));

        out.push_str(&format!(
            "Y{:>3} |{:<width$}| {}\n",
            year.year,
            bar,
            format_currency_whole(year.total),
        ));
    }
    out
}

pub fn format_schedule_rows(rows: &[PeriodRecord]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:>5} {:>14} {:>12} {:>14} {:>10} {:>14} {:>16}\n",
        "Month", "Installment", "Interest", "Principal", "Insurance", "Total", "Balance"
    ));
    out.push_str(&format!("{}\n", "-".repeat(91)));
    for row in rows {
        out.push_str(&format!(
            "{:>5} {:>14} {:>12} {:>14} {:>10} {:>14} {:>16}\n",
            row.period_index,
            format_currency(row.payment_principal_interest),
            format_currency(row.interest_component),
            format_currency(row.principal_component),
            format_currency(row.insurance_component),
            format_currency(row.total_payment),
            format_currency(row.remaining_balance),
        ));
    }
    out
}

pub fn format_window(window: &ScheduleWindow) -> String {
    let mut out = format!(
        "=== {} (months {}-{}) ===\n",
        window.label, window.first_period, window.last_period
    );
    out.push_str(&format_schedule_rows(&window.rows));
    let totals = &window.totals;
    out.push_str(&format!(
        "Total paid {} | Interest {} | Principal {} | Insurance {} | Months {}\n",
        format_currency(totals.total_paid),
        format_currency(totals.interest),
        format_currency(totals.principal),
        format_currency(totals.insurance),
        totals.months,
    ));
    out
}
