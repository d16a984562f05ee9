use super::types::{LoanParameters, PeriodRecord, Schedule};

/// Balances below one cent are treated as fully repaid.
const BALANCE_EPSILON: f64 = 0.01;

/// Fixed monthly installment (principal + interest) for a fully amortizing loan.
///
/// A zero rate amortizes straight-line. A zero term has no installments and
/// yields `0.0`; callers are expected to reject it before getting here.
pub fn compute_monthly_payment(principal: f64, annual_rate_percent: f64, term_years: u32) -> f64 {
    let payments = term_years * 12;
    if payments == 0 {
        return 0.0;
    }
    if annual_rate_percent == 0.0 {
        return principal / f64::from(payments);
    }

    let rate = monthly_rate(annual_rate_percent);
    let growth = (1.0 + rate).powf(f64::from(payments));
    principal * rate * growth / (growth - 1.0)
}

/// Build the full month-by-month schedule in a single pass.
///
/// The last period always absorbs whatever balance is left, so the schedule
/// closes at exactly zero no matter how much floating point drift built up.
/// Every monetary field is rounded to cents on the way out.
pub fn generate_schedule(
    principal: f64,
    annual_rate_percent: f64,
    term_years: u32,
    monthly_insurance: f64,
) -> Schedule {
    let payments = term_years * 12;
    let monthly_payment = compute_monthly_payment(principal, annual_rate_percent, term_years);
    let rate = monthly_rate(annual_rate_percent);
    let interest_free = annual_rate_percent == 0.0;

    let mut records = Vec::with_capacity(payments as usize);
    let mut balance = principal;

    for period_index in 1..=payments {
        let interest = if interest_free { 0.0 } else { balance * rate };
        let mut principal_component = monthly_payment - interest;
        let mut installment = monthly_payment;

        if period_index == payments {
            principal_component = balance;
            installment = interest + principal_component;
        }

        balance -= principal_component;
        if balance < BALANCE_EPSILON {
            balance = 0.0;
        }

        records.push(PeriodRecord {
            period_index,
            payment_principal_interest: round_to_cents(installment),
            interest_component: round_to_cents(interest),
            principal_component: round_to_cents(principal_component),
            insurance_component: round_to_cents(monthly_insurance),
            total_payment: round_to_cents(installment + monthly_insurance),
            remaining_balance: round_to_cents(balance),
        });
    }

    Schedule::from_records(records)
}

impl LoanParameters {
    pub fn monthly_payment(&self) -> f64 {
        compute_monthly_payment(self.principal, self.annual_rate_percent, self.term_years)
    }

    pub fn schedule(&self) -> Schedule {
        generate_schedule(
            self.principal,
            self.annual_rate_percent,
            self.term_years,
            self.monthly_insurance,
        )
    }
}

pub fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn monthly_rate(annual_rate_percent: f64) -> f64 {
    annual_rate_percent / 100.0 / 12.0
}
