//! Tabular export of the monthly schedule.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::core::{PeriodRecord, Schedule};
use crate::error::{LoanError, Result};

pub const CSV_HEADER: [&str; 7] = [
    "Month",
    "Loan Installment",
    "Interest",
    "Principal Payment",
    "Insurance",
    "Total Payment",
    "Remaining Balance",
];

/// Write one header row plus one row per period. Amounts carry exactly two decimals.
pub fn write_schedule_csv<W: Write>(writer: W, schedule: &Schedule) -> Result<W> {
    let mut wtr = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    wtr.write_record(CSV_HEADER)?;
    for record in schedule {
        wtr.write_record(csv_row(record))?;
    }
    wtr.flush()?;

    wtr.into_inner()
        .map_err(|e| LoanError::Io(e.into_error()))
}

pub fn schedule_to_csv(schedule: &Schedule) -> Result<Vec<u8>> {
    write_schedule_csv(Vec::new(), schedule)
}

pub fn write_schedule_csv_file(path: &Path, schedule: &Schedule) -> Result<()> {
    let file = File::create(path).map_err(|e| {
        LoanError::export(
            "CSV",
            format!("cannot create '{}': {e}", path.display()),
        )
    })?;
    write_schedule_csv(file, schedule)?;
    Ok(())
}

fn csv_row(record: &PeriodRecord) -> [String; 7] {
    [
        record.period_index.to_string(),
        format!("{:.2}", record.payment_principal_interest),
        format!("{:.2}", record.interest_component),
        format!("{:.2}", record.principal_component),
        format!("{:.2}", record.insurance_component),
        format!("{:.2}", record.total_payment),
        format!("{:.2}", record.remaining_balance),
    ]
}
