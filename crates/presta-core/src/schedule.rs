//! Payment schedule for a confirmed installment plan.

use chrono::{DateTime, Months, NaiveDate, Utc};

use crate::loan::InstallmentPlan;

/// One upcoming installment.
#[derive(Debug, Clone, PartialEq)]
pub struct InstallmentDue {
    /// 1-based installment number.
    pub number: u32,
    pub due_date: NaiveDate,
    pub amount: f64,
}

impl InstallmentDue {
    /// Due date rendered as `dd/MM/yyyy`.
    pub fn display_date(&self) -> String {
        self.due_date.format("%d/%m/%Y").to_string()
    }
}

/// Builds the payment schedule for a plan confirmed at the given instant.
///
/// Each installment falls on the confirmation's day of month, one calendar
/// month apart, starting one month out. When a target month is shorter than
/// the confirmation day the date clamps to that month's last day; later
/// installments still derive from the confirmation date, so a January 31st
/// confirmation yields February 28th followed by March 31st.
pub fn installment_schedule(
    confirmed_at: DateTime<Utc>,
    plan: InstallmentPlan,
    monthly_payment: f64,
) -> Vec<InstallmentDue> {
    let start = confirmed_at.date_naive();
    (1..=plan.months())
        .map(|number| {
            // Adding at most 12 months never leaves chrono's date range
            let due_date = start.checked_add_months(Months::new(number)).unwrap();
            InstallmentDue {
                number,
                due_date,
                amount: monthly_payment,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn confirmation(year: i32, month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, 10, 0, 0).unwrap()
    }

    #[test]
    fn test_schedule_has_one_entry_per_installment() {
        let schedule =
            installment_schedule(confirmation(2026, 3, 10), InstallmentPlan::Twelve, 260.0);
        assert_eq!(schedule.len(), 12);
        let numbers: Vec<u32> = schedule.iter().map(|due| due.number).collect();
        assert_eq!(numbers, (1..=12).collect::<Vec<u32>>());
    }

    #[test]
    fn test_due_dates_advance_one_month_from_confirmation() {
        let schedule =
            installment_schedule(confirmation(2026, 1, 15), InstallmentPlan::Three, 100.0);
        let dates: Vec<NaiveDate> = schedule.iter().map(|due| due.due_date).collect();
        assert_eq!(
            dates,
            vec![
                NaiveDate::from_ymd_opt(2026, 2, 15).unwrap(),
                NaiveDate::from_ymd_opt(2026, 3, 15).unwrap(),
                NaiveDate::from_ymd_opt(2026, 4, 15).unwrap(),
            ]
        );
    }

    #[test]
    fn test_short_months_clamp_without_drifting_later_dates() {
        let schedule =
            installment_schedule(confirmation(2026, 1, 31), InstallmentPlan::Three, 100.0);
        let dates: Vec<NaiveDate> = schedule.iter().map(|due| due.due_date).collect();
        assert_eq!(
            dates,
            vec![
                NaiveDate::from_ymd_opt(2026, 2, 28).unwrap(),
                NaiveDate::from_ymd_opt(2026, 3, 31).unwrap(),
                NaiveDate::from_ymd_opt(2026, 4, 30).unwrap(),
            ]
        );
    }

    #[test]
    fn test_every_installment_carries_the_plan_payment() {
        let schedule =
            installment_schedule(confirmation(2026, 6, 1), InstallmentPlan::Six, 195.0);
        assert!(schedule.iter().all(|due| due.amount == 195.0));
    }

    #[test]
    fn test_display_date_format() {
        let due = InstallmentDue {
            number: 1,
            due_date: NaiveDate::from_ymd_opt(2026, 2, 5).unwrap(),
            amount: 100.0,
        };
        assert_eq!(due.display_date(), "05/02/2026");
    }
}
