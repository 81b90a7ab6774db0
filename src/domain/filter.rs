// Row selection: date range, agent/group multi-selects, curated roster
use chrono::{Datelike, Duration, NaiveDate};
use std::collections::HashSet;
use std::str::FromStr;

/// Inclusive date range, both bounds included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Monday through Sunday of the week containing `today`.
    /// The dashboard's default window.
    pub fn current_week(today: NaiveDate) -> Self {
        let monday = today - Duration::days(today.weekday().num_days_from_monday() as i64);
        Self {
            start: monday,
            end: monday + Duration::days(6),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// A multi-select over category names. An untouched widget selects
/// everything.
#[derive(Debug, Clone, Default)]
pub struct Selection(Option<HashSet<String>>);

impl Selection {
    pub fn all() -> Self {
        Selection(None)
    }

    pub fn of<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Selection(Some(names.into_iter().map(Into::into).collect()))
    }

    pub fn allows(&self, name: &str) -> bool {
        match &self.0 {
            None => true,
            Some(set) => set.contains(name),
        }
    }
}

/// The curated list of agents the dashboard reports on. Rows from agents
/// outside the roster never reach a chart, whatever the selection says.
#[derive(Debug, Clone)]
pub struct Roster {
    names: Vec<String>,
    set: HashSet<String>,
}

impl Roster {
    pub fn new(names: Vec<String>) -> Self {
        let set = names.iter().cloned().collect();
        Self { names, set }
    }

    pub fn contains(&self, agent: &str) -> bool {
        self.set.contains(agent)
    }

    /// Roster order is the configured display order.
    pub fn names(&self) -> &[String] {
        &self.names
    }
}

/// Everything a dashboard request filters rows by.
#[derive(Debug, Clone)]
pub struct DashboardFilter {
    pub range: DateRange,
    pub agents: Selection,
    pub groups: Selection,
}

impl DashboardFilter {
    pub fn matches(&self, date: NaiveDate, agent: &str, group: &str) -> bool {
        self.range.contains(date) && self.agents.allows(agent) && self.groups.allows(group)
    }

    /// Group-level rows carry no agent; only the range and group select apply.
    pub fn matches_group(&self, date: NaiveDate, group: &str) -> bool {
        self.range.contains(date) && self.groups.allows(group)
    }
}

/// Metric selector for the trend chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendMetric {
    MeanAnswerTime,
    SlaFirstResponse,
    SlaPercentage,
}

impl TrendMetric {
    pub fn label(&self) -> &'static str {
        match self {
            TrendMetric::MeanAnswerTime => "Mean Answer Time",
            TrendMetric::SlaFirstResponse => "SLA 1st Response",
            TrendMetric::SlaPercentage => "Percentage SLA",
        }
    }
}

impl FromStr for TrendMetric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mean_answer_time" => Ok(TrendMetric::MeanAnswerTime),
            "sla_first_response" => Ok(TrendMetric::SlaFirstResponse),
            "sla_percentage" => Ok(TrendMetric::SlaPercentage),
            other => Err(format!("unknown metric: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_current_week_starts_monday() {
        // 2025-02-05 is a Wednesday
        let week = DateRange::current_week(date("2025-02-05"));
        assert_eq!(week.start, date("2025-02-03"));
        assert_eq!(week.end, date("2025-02-09"));

        // A Monday is its own week start
        let week = DateRange::current_week(date("2025-02-03"));
        assert_eq!(week.start, date("2025-02-03"));
    }

    #[test]
    fn test_range_bounds_inclusive() {
        let range = DateRange::new(date("2025-02-03"), date("2025-02-09"));
        assert!(range.contains(date("2025-02-03")));
        assert!(range.contains(date("2025-02-09")));
        assert!(!range.contains(date("2025-02-02")));
        assert!(!range.contains(date("2025-02-10")));
    }

    #[test]
    fn test_filter_is_idempotent_and_order_independent() {
        let filter = DashboardFilter {
            range: DateRange::new(date("2025-02-03"), date("2025-02-09")),
            agents: Selection::of(["Ada", "Grace"]),
            groups: Selection::of(["Support"]),
        };

        let rows = [
            (date("2025-02-04"), "Ada", "Support"),
            (date("2025-02-04"), "Linus", "Support"),
            (date("2025-02-10"), "Ada", "Support"),
            (date("2025-02-05"), "Grace", "Sales"),
        ];

        let once: Vec<_> = rows
            .iter()
            .filter(|(d, a, g)| filter.matches(*d, a, g))
            .collect();
        let twice: Vec<_> = once
            .iter()
            .filter(|(d, a, g)| filter.matches(*d, a, g))
            .copied()
            .collect();
        assert_eq!(once, twice);
        assert_eq!(once.len(), 1);

        // Applying the agent and group predicates in either order selects
        // the same rows.
        let agents_first: Vec<_> = rows
            .iter()
            .filter(|(_, a, _)| filter.agents.allows(a))
            .filter(|(_, _, g)| filter.groups.allows(g))
            .collect();
        let groups_first: Vec<_> = rows
            .iter()
            .filter(|(_, _, g)| filter.groups.allows(g))
            .filter(|(_, a, _)| filter.agents.allows(a))
            .collect();
        assert_eq!(agents_first, groups_first);
    }

    #[test]
    fn test_roster_membership() {
        let roster = Roster::new(vec!["Ada".into(), "Grace".into()]);
        assert!(roster.contains("Ada"));
        assert!(!roster.contains("Linus"));
        assert_eq!(roster.names(), ["Ada", "Grace"]);
    }

    #[test]
    fn test_trend_metric_from_str() {
        assert_eq!(
            "mean_answer_time".parse::<TrendMetric>().unwrap(),
            TrendMetric::MeanAnswerTime
        );
        assert!("latency".parse::<TrendMetric>().is_err());
    }
}
