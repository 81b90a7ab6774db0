// Repository trait for ticket metric access
use crate::domain::metrics::{
    ActionCountRow, DistributionRow, GroupKpiRow, ResponseMetricRow, SlotCountRow,
};
use crate::error::AppError;
use async_trait::async_trait;

/// The five read-only queries the dashboard is built from. Every request
/// recomputes from these; nothing is cached between page loads.
#[async_trait]
pub trait TicketRepository: Send + Sync {
    /// Ticket distribution per (date, agent, group), with the dimension
    /// names resolved.
    async fn distribution(&self) -> Result<Vec<DistributionRow>, AppError>;

    /// Tickets created per (date, group, time slot).
    async fn created_counts(&self) -> Result<Vec<SlotCountRow>, AppError>;

    /// Agent actions per (date, group, agent, time slot).
    async fn action_counts(&self) -> Result<Vec<ActionCountRow>, AppError>;

    /// Daily KPI rows per group.
    async fn group_kpis(&self) -> Result<Vec<GroupKpiRow>, AppError>;

    /// Response metrics per (date, agent, group) with occurrence weights.
    async fn response_metrics(&self) -> Result<Vec<ResponseMetricRow>, AppError>;
}
