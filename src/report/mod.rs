mod csv_export;
mod format;
mod pdf;
mod session;
mod text;

use chrono::NaiveDateTime;

pub use csv_export::{CSV_HEADER, schedule_to_csv, write_schedule_csv, write_schedule_csv_file};
pub use format::{format_currency, format_currency_whole, format_percent, format_term};
pub use pdf::render_schedule_pdf;
pub use session::{Session, SessionStore};
pub use text::{
    format_schedule_rows, format_summary, format_window, format_yearly_table, render_stacked_chart,
};

/// Download name such as `amortization_schedule_20261017_093000.csv`.
pub fn export_file_name(extension: &str, at: NaiveDateTime) -> String {
    format!(
        "amortization_schedule_{}.{extension}",
        at.format("%Y%m%d_%H%M%S")
    )
}
