use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Local};

use crate::core::{
    LoanParameters, LoanSummary, Schedule, ScheduleWindow, YEARS_PER_WINDOW, YearlyAggregate,
    aggregate_by_year, schedule_windows, summarize,
};
use crate::error::{LoanError, Result};

use super::csv_export::schedule_to_csv;
use super::pdf::render_schedule_pdf;

/// The most recently calculated scenario and everything derived from it.
#[derive(Debug, Clone)]
pub struct Session {
    pub parameters: LoanParameters,
    pub schedule: Schedule,
    pub summary: LoanSummary,
    pub computed_at: DateTime<Local>,
}

impl Session {
    pub fn compute(parameters: LoanParameters) -> Self {
        let schedule = parameters.schedule();
        let summary = summarize(&parameters);
        log::info!(
            "calculated {} payments of {:.2} for principal {:.2} at {:.2}% over {} years",
            schedule.len(),
            summary.monthly_payment,
            parameters.principal,
            parameters.annual_rate_percent,
            parameters.term_years
        );
        Self {
            parameters,
            schedule,
            summary,
            computed_at: Local::now(),
        }
    }

    pub fn yearly(&self) -> Vec<YearlyAggregate> {
        aggregate_by_year(&self.schedule)
    }

    pub fn windows(&self) -> Vec<ScheduleWindow> {
        schedule_windows(&self.schedule, YEARS_PER_WINDOW)
    }

    pub fn to_csv(&self) -> Result<Vec<u8>> {
        schedule_to_csv(&self.schedule)
    }

    pub fn to_pdf(&self) -> Result<Vec<u8>> {
        render_schedule_pdf(&self.parameters, &self.schedule)
    }
}

/// Holds at most one session; a new calculation replaces it wholesale.
#[derive(Debug, Default)]
pub struct SessionStore {
    current: RwLock<Option<Arc<Session>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(&self, session: Session) -> Arc<Session> {
        let session = Arc::new(session);
        let mut slot = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *slot = Some(Arc::clone(&session));
        session
    }

    pub fn current(&self) -> Result<Arc<Session>> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or(LoanError::NoSession)
    }
}
