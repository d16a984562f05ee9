use super::engine::round_to_cents;
use super::types::{
    LoanParameters, LoanSummary, PeriodRecord, Schedule, ScheduleWindow, WindowTotals,
    YearlyAggregate,
};

/// Loan years grouped into one schedule window.
pub const YEARS_PER_WINDOW: u32 = 4;

/// Roll the schedule up into one entry per loan year, in order.
///
/// The final entry covers fewer than 12 periods when the schedule does not end
/// on a year boundary.
pub fn aggregate_by_year(schedule: &Schedule) -> Vec<YearlyAggregate> {
    let mut years: Vec<YearlyAggregate> = Vec::new();

    for record in schedule {
        let year = record.year();
        match years.last_mut() {
            Some(current) if current.year == year => {
                current.principal += record.principal_component;
                current.interest += record.interest_component;
                current.insurance += record.insurance_component;
            }
            _ => years.push(YearlyAggregate {
                year,
                principal: record.principal_component,
                interest: record.interest_component,
                insurance: record.insurance_component,
                total: 0.0,
            }),
        }
    }

    for year in &mut years {
        year.principal = round_to_cents(year.principal);
        year.interest = round_to_cents(year.interest);
        year.insurance = round_to_cents(year.insurance);
        year.total = round_to_cents(year.principal + year.interest + year.insurance);
    }
    years
}

pub fn summarize(params: &LoanParameters) -> LoanSummary {
    let monthly_payment = params.monthly_payment();
    let number_of_payments = params.number_of_payments();
    let payments = f64::from(number_of_payments);
    let total_installments = monthly_payment * payments;
    let total_insurance = params.monthly_insurance * payments;

    LoanSummary {
        monthly_payment,
        monthly_insurance: params.monthly_insurance,
        monthly_total: monthly_payment + params.monthly_insurance,
        number_of_payments,
        total_installments,
        total_interest: total_installments - params.principal,
        total_insurance,
        grand_total: total_installments + total_insurance,
    }
}

/// Split the schedule into consecutive windows of `years_per_window` loan years.
///
/// A `years_per_window` of zero is treated as one year per window.
pub fn schedule_windows(schedule: &Schedule, years_per_window: u32) -> Vec<ScheduleWindow> {
    let span = years_per_window.max(1);
    let Some(last) = schedule.last() else {
        return Vec::new();
    };
    let total_years = last.year();

    let mut windows = Vec::new();
    let mut start_year = 1;
    while start_year <= total_years {
        let end_year = (start_year + span - 1).min(total_years);
        let rows: Vec<PeriodRecord> = schedule
            .iter()
            .filter(|r| (start_year..=end_year).contains(&r.year()))
            .copied()
            .collect();

        let first_period = rows.first().map_or(0, |r| r.period_index);
        let last_period = rows.last().map_or(0, |r| r.period_index);
        windows.push(ScheduleWindow {
            label: format!("Years {start_year}-{end_year}"),
            start_year,
            end_year,
            first_period,
            last_period,
            totals: window_totals(&rows),
            rows,
        });
        start_year = end_year + 1;
    }
    windows
}

pub fn window_totals(rows: &[PeriodRecord]) -> WindowTotals {
    let mut totals = rows.iter().fold(WindowTotals::default(), |mut acc, r| {
        acc.total_paid += r.total_payment;
        acc.interest += r.interest_component;
        acc.principal += r.principal_component;
        acc.insurance += r.insurance_component;
        acc.months += 1;
        acc
    });
    totals.total_paid = round_to_cents(totals.total_paid);
    totals.interest = round_to_cents(totals.interest);
    totals.principal = round_to_cents(totals.principal);
    totals.insurance = round_to_cents(totals.insurance);
    totals
}
