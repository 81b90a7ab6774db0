// MySQL repository implementation over the reporting views
use crate::application::ticket_repository::TicketRepository;
use crate::domain::metrics::{
    ActionCountRow, DistributionRow, GroupKpiRow, ResponseMetricRow, SlotCountRow,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use sqlx::mysql::{MySqlPool, MySqlPoolOptions};

// Numeric columns are cast in SQL so the driver hands back plain integers
// and doubles whatever the views declare.

const DISTRIBUTION_SQL: &str = r#"
SELECT
    DATE(d.date) AS date,
    a.agent AS agent,
    g.`group` AS group_name,
    CAST(d.occurrences AS SIGNED) AS occurrences
FROM v3_tickets_distribution_by_group_and_agent d
LEFT JOIN fd_agent_id a ON d.agent_id = a.agent_id
LEFT JOIN fd_group_id g ON d.group_id = g.group_id
"#;

const CREATED_COUNTS_SQL: &str = r#"
SELECT
    DATE(t.date) AS date,
    g.`group` AS group_name,
    CAST(t.time_slot AS TIME) AS slot,
    CAST(t.ticket_count AS SIGNED) AS tickets
FROM v3_ticket_created_counts t
LEFT JOIN fd_group_id g ON t.group_id = g.group_id
"#;

const ACTION_COUNTS_SQL: &str = r#"
SELECT
    DATE(t.date) AS date,
    g.`group` AS group_name,
    a.agent AS agent,
    CAST(t.time_slot AS TIME) AS slot,
    CAST(t.action_count AS SIGNED) AS actions
FROM v3_agent_action_counts t
LEFT JOIN fd_group_id g ON t.group_id = g.group_id
LEFT JOIN fd_agent_id a ON t.agent_id = a.agent_id
"#;

const GROUP_KPIS_SQL: &str = r#"
SELECT
    DATE(gk.date) AS date,
    g.`group` AS group_name,
    CAST(gk.mean_answer AS DOUBLE) AS mean_answer_secs,
    CAST(gk.mean_first_answer AS DOUBLE) AS mean_first_answer_secs,
    CAST(gk.sla_1st_perc AS DOUBLE) AS sla_first_percent,
    CAST(gk.sla_solution_perc AS DOUBLE) AS sla_solution_percent,
    CAST(gk.nb_tickets AS SIGNED) AS ticket_count
FROM v3_group_kpis gk
LEFT JOIN fd_group_id g ON gk.group_id = g.group_id
"#;

const RESPONSE_METRICS_SQL: &str = r#"
SELECT
    DATE(t.date) AS date,
    a.agent AS agent,
    g.`group` AS group_name,
    CAST(t.occurrences AS SIGNED) AS occurrences,
    CAST(t.mean_answer_time AS DOUBLE) AS mean_answer_secs,
    CAST(t.sla_1st_response AS DOUBLE) AS sla_first_response,
    CAST(t.perc_sla AS DOUBLE) AS sla_percent
FROM v3_tadiplus_tickets_distri t
LEFT JOIN fd_group_id g ON t.group_id = g.group_id
LEFT JOIN fd_agent_id a ON t.agent_id = a.agent_id
"#;

#[derive(Debug, Clone)]
pub struct MysqlTicketRepository {
    pool: MySqlPool,
}

impl MysqlTicketRepository {
    pub async fn connect(url: &str) -> Result<Self, AppError> {
        let pool = MySqlPoolOptions::new()
            .max_connections(5)
            .connect(url)
            .await?;
        Ok(Self { pool })
    }

    pub fn with_pool(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

// Raw records mirror the result sets; every column the LEFT JOINs can NULL
// out is optional and rows missing a key column are dropped on the way to
// the domain type.

#[derive(Debug, sqlx::FromRow)]
struct DistributionRecord {
    date: Option<NaiveDate>,
    agent: Option<String>,
    group_name: Option<String>,
    occurrences: Option<i64>,
}

impl DistributionRecord {
    fn into_domain(self) -> Option<DistributionRow> {
        Some(DistributionRow {
            date: self.date?,
            agent: self.agent?,
            group_name: self.group_name?,
            occurrences: self.occurrences.unwrap_or(0),
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct SlotCountRecord {
    date: Option<NaiveDate>,
    group_name: Option<String>,
    slot: Option<NaiveTime>,
    tickets: Option<i64>,
}

impl SlotCountRecord {
    fn into_domain(self) -> Option<SlotCountRow> {
        Some(SlotCountRow {
            date: self.date?,
            group_name: self.group_name?,
            slot: self.slot?,
            tickets: self.tickets.unwrap_or(0),
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ActionCountRecord {
    date: Option<NaiveDate>,
    group_name: Option<String>,
    agent: Option<String>,
    slot: Option<NaiveTime>,
    actions: Option<i64>,
}

impl ActionCountRecord {
    fn into_domain(self) -> Option<ActionCountRow> {
        Some(ActionCountRow {
            date: self.date?,
            group_name: self.group_name?,
            agent: self.agent?,
            slot: self.slot?,
            actions: self.actions.unwrap_or(0),
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct GroupKpiRecord {
    date: Option<NaiveDate>,
    group_name: Option<String>,
    mean_answer_secs: Option<f64>,
    mean_first_answer_secs: Option<f64>,
    sla_first_percent: Option<f64>,
    sla_solution_percent: Option<f64>,
    ticket_count: Option<i64>,
}

impl GroupKpiRecord {
    fn into_domain(self) -> Option<GroupKpiRow> {
        Some(GroupKpiRow {
            date: self.date?,
            group_name: self.group_name?,
            mean_answer_secs: self.mean_answer_secs,
            mean_first_answer_secs: self.mean_first_answer_secs,
            sla_first_percent: self.sla_first_percent,
            sla_solution_percent: self.sla_solution_percent,
            ticket_count: self.ticket_count.unwrap_or(0),
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ResponseMetricRecord {
    date: Option<NaiveDate>,
    agent: Option<String>,
    group_name: Option<String>,
    occurrences: Option<i64>,
    mean_answer_secs: Option<f64>,
    sla_first_response: Option<f64>,
    sla_percent: Option<f64>,
}

impl ResponseMetricRecord {
    fn into_domain(self) -> Option<ResponseMetricRow> {
        Some(ResponseMetricRow {
            date: self.date?,
            agent: self.agent?,
            group_name: self.group_name?,
            occurrences: self.occurrences.unwrap_or(0),
            mean_answer_secs: self.mean_answer_secs,
            sla_first_response: self.sla_first_response,
            sla_percent: self.sla_percent,
        })
    }
}

#[async_trait]
impl TicketRepository for MysqlTicketRepository {
    async fn distribution(&self) -> Result<Vec<DistributionRow>, AppError> {
        let records = sqlx::query_as::<_, DistributionRecord>(DISTRIBUTION_SQL)
            .fetch_all(&self.pool)
            .await?;
        let fetched = records.len();
        let rows: Vec<DistributionRow> = records
            .into_iter()
            .filter_map(DistributionRecord::into_domain)
            .collect();
        tracing::debug!(fetched, kept = rows.len(), "distribution query");
        Ok(rows)
    }

    async fn created_counts(&self) -> Result<Vec<SlotCountRow>, AppError> {
        let records = sqlx::query_as::<_, SlotCountRecord>(CREATED_COUNTS_SQL)
            .fetch_all(&self.pool)
            .await?;
        let fetched = records.len();
        let rows: Vec<SlotCountRow> = records
            .into_iter()
            .filter_map(SlotCountRecord::into_domain)
            .collect();
        tracing::debug!(fetched, kept = rows.len(), "created counts query");
        Ok(rows)
    }

    async fn action_counts(&self) -> Result<Vec<ActionCountRow>, AppError> {
        let records = sqlx::query_as::<_, ActionCountRecord>(ACTION_COUNTS_SQL)
            .fetch_all(&self.pool)
            .await?;
        let fetched = records.len();
        let rows: Vec<ActionCountRow> = records
            .into_iter()
            .filter_map(ActionCountRecord::into_domain)
            .collect();
        tracing::debug!(fetched, kept = rows.len(), "action counts query");
        Ok(rows)
    }

    async fn group_kpis(&self) -> Result<Vec<GroupKpiRow>, AppError> {
        let records = sqlx::query_as::<_, GroupKpiRecord>(GROUP_KPIS_SQL)
            .fetch_all(&self.pool)
            .await?;
        let fetched = records.len();
        let rows: Vec<GroupKpiRow> = records
            .into_iter()
            .filter_map(GroupKpiRecord::into_domain)
            .collect();
        tracing::debug!(fetched, kept = rows.len(), "group kpis query");
        Ok(rows)
    }

    async fn response_metrics(&self) -> Result<Vec<ResponseMetricRow>, AppError> {
        let records = sqlx::query_as::<_, ResponseMetricRecord>(RESPONSE_METRICS_SQL)
            .fetch_all(&self.pool)
            .await?;
        let fetched = records.len();
        let rows: Vec<ResponseMetricRow> = records
            .into_iter()
            .filter_map(ResponseMetricRecord::into_domain)
            .collect();
        tracing::debug!(fetched, kept = rows.len(), "response metrics query");
        Ok(rows)
    }
}
