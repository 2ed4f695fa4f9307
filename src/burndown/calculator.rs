use crate::model::{Issue, Snapshot};
use chrono::{Datelike, Days, NaiveDate};

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Granularity {
    /// One snapshot per calendar day.
    Daily,
    /// One snapshot per week, dated on its Sunday.
    Weekly,
}

pub trait BurndownCalculator {
    /// Remaining work per period from the first issue's creation date through `today`,
    /// dropping periods dated before `start`.
    fn burndown(&self, start: NaiveDate, today: NaiveDate, granularity: Granularity) -> Vec<Snapshot>;
}

impl BurndownCalculator for [Issue] {
    fn burndown(&self, start: NaiveDate, today: NaiveDate, granularity: Granularity) -> Vec<Snapshot> {
        let dates = self.iter().map(IssueDates::from).collect::<Vec<_>>();
        let Some(first) = dates.iter().map(|issue| issue.created).min() else {
            return vec![];
        };

        period_ends(first, today, granularity)
            .into_iter()
            .filter(|ds| *ds >= start)
            .map(|ds| Snapshot::new(ds, remaining_at(&dates, ds)))
            .collect()
    }
}

struct IssueDates {
    created: NaiveDate,
    closed: Option<NaiveDate>,
}

impl From<&Issue> for IssueDates {
    fn from(issue: &Issue) -> Self {
        Self {
            created: issue.created_on(),
            closed: issue.closed_on(),
        }
    }
}

/// Created minus closed as of `cutoff`, counted over every issue. Never clamped.
fn remaining_at(dates: &[IssueDates], cutoff: NaiveDate) -> i64 {
    let created = dates.iter().filter(|issue| issue.created <= cutoff).count() as i64;
    let closed = dates
        .iter()
        .filter(|issue| issue.closed.is_some_and(|closed| closed <= cutoff))
        .count() as i64;
    created - closed
}

fn period_ends(first: NaiveDate, today: NaiveDate, granularity: Granularity) -> Vec<NaiveDate> {
    match granularity {
        Granularity::Daily => first.iter_days().take_while(|day| *day <= today).collect(),
        Granularity::Weekly => {
            let monday = first - Days::new(first.weekday().num_days_from_monday() as u64);
            let first_sunday = monday + Days::new(6);
            first_sunday
                .iter_weeks()
                .take_while(|sunday| *sunday <= today)
                .collect()
        }
    }
}
