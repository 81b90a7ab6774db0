// Period bucketing for the tickets-over-time chart
use chrono::{Datelike, Duration, NaiveDate};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeScale {
    #[default]
    Daily,
    Weekly,
    Monthly,
}

/// A time bucket: `sort_key` orders buckets chronologically, `label` is what
/// the axis shows.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct PeriodKey {
    pub sort_key: String,
    pub label: String,
}

impl TimeScale {
    pub fn period_key(&self, date: NaiveDate) -> PeriodKey {
        match self {
            TimeScale::Daily => {
                let key = date.format("%Y-%m-%d").to_string();
                PeriodKey {
                    sort_key: key.clone(),
                    label: key,
                }
            }
            TimeScale::Weekly => {
                let monday =
                    date - Duration::days(date.weekday().num_days_from_monday() as i64);
                let sunday = monday + Duration::days(6);
                let iso = date.iso_week();
                PeriodKey {
                    sort_key: format!("{:04}-W{:02}", iso.year(), iso.week()),
                    // Same rendering as a pandas weekly period: start/end.
                    label: format!(
                        "{}/{}",
                        monday.format("%Y-%m-%d"),
                        sunday.format("%Y-%m-%d")
                    ),
                }
            }
            TimeScale::Monthly => PeriodKey {
                sort_key: date.format("%Y-%m").to_string(),
                label: date.format("%B %Y").to_string(),
            },
        }
    }
}

impl FromStr for TimeScale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(TimeScale::Daily),
            "weekly" => Ok(TimeScale::Weekly),
            "monthly" => Ok(TimeScale::Monthly),
            other => Err(format!("unknown time scale: {other}")),
        }
    }
}
