use serde::Serialize;

/// Inputs for a single loan scenario. Range checks happen before these reach the engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanParameters {
    pub principal: f64,
    pub annual_rate_percent: f64,
    pub term_years: u32,
    pub monthly_insurance: f64,
}

impl LoanParameters {
    pub fn number_of_payments(&self) -> u32 {
        self.term_years * 12
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodRecord {
    pub period_index: u32,
    pub payment_principal_interest: f64,
    pub interest_component: f64,
    pub principal_component: f64,
    pub insurance_component: f64,
    pub total_payment: f64,
    pub remaining_balance: f64,
}

impl PeriodRecord {
    /// 1-based loan year this period falls in.
    pub fn year(&self) -> u32 {
        (self.period_index - 1) / 12 + 1
    }
}

/// Month-by-month amortization rows, ordered by `period_index`.
///
/// Built once by the engine; there is no way to mutate rows afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Schedule {
    records: Vec<PeriodRecord>,
}

impl Schedule {
    pub(crate) fn from_records(records: Vec<PeriodRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[PeriodRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn first(&self) -> Option<&PeriodRecord> {
        self.records.first()
    }

    pub fn last(&self) -> Option<&PeriodRecord> {
        self.records.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PeriodRecord> {
        self.records.iter()
    }
}

impl<'a> IntoIterator for &'a Schedule {
    type Item = &'a PeriodRecord;
    type IntoIter = std::slice::Iter<'a, PeriodRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlyAggregate {
    pub year: u32,
    pub principal: f64,
    pub interest: f64,
    pub insurance: f64,
    pub total: f64,
}

/// Headline figures shown next to the schedule.
///
/// Totals use the nominal installment times the number of payments, so they can
/// differ by a few cents from summing the rounded schedule rows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanSummary {
    pub monthly_payment: f64,
    pub monthly_insurance: f64,
    pub monthly_total: f64,
    pub number_of_payments: u32,
    pub total_installments: f64,
    pub total_interest: f64,
    pub total_insurance: f64,
    pub grand_total: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowTotals {
    pub total_paid: f64,
    pub interest: f64,
    pub principal: f64,
    pub insurance: f64,
    pub months: u32,
}

/// A run of consecutive loan years displayed together.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleWindow {
    pub label: String,
    pub start_year: u32,
    pub end_year: u32,
    pub first_period: u32,
    pub last_period: u32,
    pub totals: WindowTotals,
    pub rows: Vec<PeriodRecord>,
}
