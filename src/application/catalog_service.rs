// Catalog service - Use case for populating the filter widgets
use crate::application::ticket_repository::TicketRepository;
use crate::domain::filter::Roster;
use crate::error::AppError;
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

/// Selectable values for the agent and group multi-selects.
#[derive(Debug, Clone, Serialize)]
pub struct FilterOptions {
    pub agents: Vec<String>,
    pub groups: Vec<String>,
}

#[derive(Clone)]
pub struct CatalogService {
    repository: Arc<dyn TicketRepository>,
    roster: Roster,
}

impl CatalogService {
    pub fn new(repository: Arc<dyn TicketRepository>, roster: Roster) -> Self {
        Self { repository, roster }
    }

    /// Agents come back in roster order, restricted to those with any data;
    /// groups are the distinct values observed for roster agents.
    pub async fn filter_options(&self) -> Result<FilterOptions, AppError> {
        let rows = self.repository.distribution().await?;

        let present: HashSet<&str> = rows.iter().map(|r| r.agent.as_str()).collect();
        let agents: Vec<String> = self
            .roster
            .names()
            .iter()
            .filter(|name| present.contains(name.as_str()))
            .cloned()
            .collect();

        let groups: BTreeSet<String> = rows
            .iter()
            .filter(|r| self.roster.contains(&r.agent))
            .map(|r| r.group_name.clone())
            .collect();

        Ok(FilterOptions {
            agents,
            groups: groups.into_iter().collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::metrics::{
        ActionCountRow, DistributionRow, GroupKpiRow, ResponseMetricRow, SlotCountRow,
    };
    use async_trait::async_trait;

    struct FixedRows(Vec<DistributionRow>);

    #[async_trait]
    impl TicketRepository for FixedRows {
        async fn distribution(&self) -> Result<Vec<DistributionRow>, AppError> {
            Ok(self.0.clone())
        }
        async fn created_counts(&self) -> Result<Vec<SlotCountRow>, AppError> {
            Ok(Vec::new())
        }
        async fn action_counts(&self) -> Result<Vec<ActionCountRow>, AppError> {
            Ok(Vec::new())
        }
        async fn group_kpis(&self) -> Result<Vec<GroupKpiRow>, AppError> {
            Ok(Vec::new())
        }
        async fn response_metrics(&self) -> Result<Vec<ResponseMetricRow>, AppError> {
            Ok(Vec::new())
        }
    }

    fn row(agent: &str, group: &str) -> DistributionRow {
        DistributionRow {
            date: "2025-02-04".parse().unwrap(),
            agent: agent.to_string(),
            group_name: group.to_string(),
            occurrences: 1,
        }
    }

    #[tokio::test]
    async fn test_options_follow_roster_order_and_observed_groups() {
        let repository = Arc::new(FixedRows(vec![
            row("Grace", "Support"),
            row("Ada", "Sales"),
            // Not on the roster; the agent is hidden and so is any group
            // only this agent touches.
            row("Linus", "Escalations"),
        ]));
        let roster = Roster::new(vec!["Ada".into(), "Grace".into(), "Absent".into()]);
        let options = CatalogService::new(repository, roster)
            .filter_options()
            .await
            .unwrap();

        // Roster order, restricted to agents with data.
        assert_eq!(options.agents, ["Ada", "Grace"]);
        assert_eq!(options.groups, ["Sales", "Support"]);
    }
}
