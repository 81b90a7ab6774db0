// Ticket metric rows decoded from the reporting views
use chrono::{NaiveDate, NaiveTime};

/// One (date, agent, group) cell of the ticket distribution: how many
/// tickets that agent handled for that group on that day.
#[derive(Debug, Clone)]
pub struct DistributionRow {
    pub date: NaiveDate,
    pub agent: String,
    pub group_name: String,
    pub occurrences: i64,
}

/// Tickets created in one fixed-width clock interval for one group.
#[derive(Debug, Clone)]
pub struct SlotCountRow {
    pub date: NaiveDate,
    pub group_name: String,
    pub slot: NaiveTime,
    pub tickets: i64,
}

/// Agent actions recorded in one clock interval.
#[derive(Debug, Clone)]
pub struct ActionCountRow {
    pub date: NaiveDate,
    pub group_name: String,
    pub agent: String,
    pub slot: NaiveTime,
    pub actions: i64,
}

/// Daily per-group KPI snapshot.
#[derive(Debug, Clone)]
pub struct GroupKpiRow {
    pub date: NaiveDate,
    pub group_name: String,
    pub mean_answer_secs: Option<f64>,
    pub mean_first_answer_secs: Option<f64>,
    pub sla_first_percent: Option<f64>,
    pub sla_solution_percent: Option<f64>,
    pub ticket_count: i64,
}

/// Per (date, agent, group) response metrics used for weighted averages,
/// the heatmaps and the metric trend.
#[derive(Debug, Clone)]
pub struct ResponseMetricRow {
    pub date: NaiveDate,
    pub agent: String,
    pub group_name: String,
    pub occurrences: i64,
    pub mean_answer_secs: Option<f64>,
    pub sla_first_response: Option<f64>,
    pub sla_percent: Option<f64>,
}
