mod aggregate;
mod engine;
mod types;

pub use aggregate::{YEARS_PER_WINDOW, aggregate_by_year, schedule_windows, summarize, window_totals};
pub use engine::{compute_monthly_payment, generate_schedule, round_to_cents};
pub use types::{
    LoanParameters, LoanSummary, PeriodRecord, Schedule, ScheduleWindow, WindowTotals,
    YearlyAggregate,
};
