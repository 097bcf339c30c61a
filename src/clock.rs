//! Single source of "now" for the valuation pipeline.
//!
//! Age, days-since-sale and the year-built upper bound all depend on the
//! current date. Routing every lookup through one `Clock` lets tests pin
//! time and assert exact derived values.

use chrono::{DateTime, Datelike, NaiveDate, Utc};

#[derive(Debug, Clone, Copy)]
pub enum Clock {
    /// Wall clock
    System,
    /// Pinned date, for tests and reproducible runs
    Fixed(NaiveDate),
}

impl Clock {
    pub fn system() -> Self {
        Clock::System
    }

    pub fn fixed(date: NaiveDate) -> Self {
        Clock::Fixed(date)
    }

    pub fn today(&self) -> NaiveDate {
        match self {
            Clock::System => Utc::now().date_naive(),
            Clock::Fixed(date) => *date,
        }
    }

    pub fn current_year(&self) -> i32 {
        self.today().year()
    }

    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::System => Utc::now(),
            // Midnight UTC on the pinned date; and_hms_opt(0,0,0) cannot fail
            Clock::Fixed(date) => date.and_hms_opt(0, 0, 0).unwrap().and_utc(),
        }
    }
}
