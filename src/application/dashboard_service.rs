// Dashboard service - Builds the page's tile and chart datasets
use crate::application::aggregate::{sum_by, weighted_mean_by, Pivot};
use crate::application::ticket_repository::TicketRepository;
use crate::domain::dashboard::{
    BarChart, BarPoint, CategorySeries, ChartData, Dashboard, GroupedBarChart, HeatmapChart,
    LineChart, LinePoint, LineSeries, SlotChart, SlotSeries, TileData,
};
use crate::domain::filter::{DashboardFilter, Roster, TrendMetric};
use crate::domain::format::{
    seconds_to_hm, seconds_to_hms, shift_slot, slot_label, slot_minutes,
};
use crate::domain::metrics::{
    ActionCountRow, DistributionRow, GroupKpiRow, ResponseMetricRow, SlotCountRow,
};
use crate::domain::timescale::TimeScale;
use crate::error::AppError;
use chrono::NaiveTime;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// One page load's worth of parameters.
#[derive(Debug, Clone)]
pub struct DashboardRequest {
    pub filter: DashboardFilter,
    pub scale: TimeScale,
    pub metric: TrendMetric,
}

#[derive(Clone)]
pub struct DashboardService {
    repository: Arc<dyn TicketRepository>,
    roster: Roster,
    title: String,
}

impl DashboardService {
    pub fn new(repository: Arc<dyn TicketRepository>, roster: Roster, title: String) -> Self {
        Self {
            repository,
            roster,
            title,
        }
    }

    /// Run the five queries, filter in memory and shape every chart. The
    /// chart list is fixed; charts whose rows were all filtered away come
    /// back with empty categories rather than being dropped.
    pub async fn build(&self, request: &DashboardRequest) -> Result<Dashboard, AppError> {
        let filter = &request.filter;

        let distribution = self.repository.distribution().await?;
        let roster_rows: Vec<&DistributionRow> = distribution
            .iter()
            .filter(|r| self.roster.contains(&r.agent))
            .collect();
        let selected: Vec<&DistributionRow> = roster_rows
            .iter()
            .copied()
            .filter(|r| filter.matches(r.date, &r.agent, &r.group_name))
            .collect();
        // Team scope: every roster agent within the date and group bounds,
        // whatever the agent multi-select says.
        let team: Vec<&DistributionRow> = roster_rows
            .iter()
            .copied()
            .filter(|r| filter.matches_group(r.date, &r.group_name))
            .collect();

        let created = self.repository.created_counts().await?;
        let created: Vec<&SlotCountRow> = created
            .iter()
            .filter(|r| filter.matches_group(r.date, &r.group_name))
            .collect();

        let actions = self.repository.action_counts().await?;
        let actions: Vec<&ActionCountRow> = actions
            .iter()
            .filter(|r| {
                self.roster.contains(&r.agent) && filter.matches(r.date, &r.agent, &r.group_name)
            })
            .collect();

        let kpis = self.repository.group_kpis().await?;
        let kpis: Vec<&GroupKpiRow> = kpis
            .iter()
            .filter(|r| filter.matches_group(r.date, &r.group_name))
            .collect();

        let metrics = self.repository.response_metrics().await?;
        let metrics: Vec<&ResponseMetricRow> = metrics
            .iter()
            .filter(|r| {
                self.roster.contains(&r.agent) && filter.matches(r.date, &r.agent, &r.group_name)
            })
            .collect();

        let total_tickets: i64 = selected.iter().map(|r| r.occurrences).sum();
        tracing::debug!(
            total_tickets,
            distribution_rows = selected.len(),
            "dashboard recompute"
        );

        let tiles = vec![TileData::new(
            "total-tickets".to_string(),
            "Total Tickets Processed".to_string(),
            "tickets".to_string(),
            total_tickets as f64,
            0,
        )];

        let charts = vec![
            ChartData::Bar(tickets_by_group(&selected)),
            ChartData::Line(tickets_over_time(&selected, request.scale)),
            ChartData::SlotBreakdown(created_per_slot(&created)),
            ChartData::GroupedBar(group_response_times(&kpis)),
            ChartData::GroupedBar(group_sla(&kpis)),
            ChartData::Line(metric_trend(&metrics, request.metric)),
            ChartData::GroupedBar(tickets_by_agent_group(&selected, &team)),
            ChartData::GroupedBar(response_time_by_agent(&metrics)),
            ChartData::Heatmap(response_time_heatmap(&metrics)),
            ChartData::Heatmap(sla_heatmap(
                "sla-first-response-heatmap",
                "SLA 1st Response Compliance by Agent & Group",
                &metrics,
                |r| r.sla_first_response,
            )),
            ChartData::Heatmap(sla_heatmap(
                "sla-percent-heatmap",
                "Percentage SLA Compliance by Agent & Group",
                &metrics,
                |r| r.sla_percent,
            )),
            ChartData::SlotBreakdown(actions_per_slot(&actions)),
        ];

        Ok(Dashboard::new(self.title.clone(), tiles, charts))
    }
}

fn count_label(value: f64) -> String {
    format!("{}", value as i64)
}

fn tickets_by_group(rows: &[&DistributionRow]) -> BarChart {
    let totals = sum_by(
        rows.iter().copied(),
        |r| r.group_name.clone(),
        |r| r.occurrences as f64,
    );
    let mut bars: Vec<BarPoint> = totals
        .into_iter()
        .map(|(category, value)| BarPoint {
            label: count_label(value),
            category,
            value,
        })
        .collect();
    bars.sort_by(|a, b| {
        b.value
            .total_cmp(&a.value)
            .then_with(|| a.category.cmp(&b.category))
    });
    BarChart {
        id: "tickets-by-group".to_string(),
        title: "Tickets by Group".to_string(),
        x_title: "Groups".to_string(),
        y_title: "Number of Tickets".to_string(),
        bars,
    }
}

fn tickets_over_time(rows: &[&DistributionRow], scale: TimeScale) -> LineChart {
    let totals = sum_by(
        rows.iter().copied(),
        |r| scale.period_key(r.date),
        |r| r.occurrences as f64,
    );
    let points = totals
        .into_iter()
        .map(|(period, value)| LinePoint {
            x: period.label,
            y: value,
            label: count_label(value),
        })
        .collect();
    LineChart {
        id: "tickets-over-time".to_string(),
        title: "Evolution of Tickets Over Time".to_string(),
        x_title: "Time Period".to_string(),
        y_title: "Number of Tickets".to_string(),
        series: vec![LineSeries {
            name: "Tickets".to_string(),
            points,
        }],
    }
}

/// Shared shape for the two slot charts: stacked bars per category plus a
/// total line, slots in display order.
fn slot_breakdown(
    id: &str,
    title: &str,
    y_title: &str,
    observations: impl IntoIterator<Item = (NaiveTime, String, f64)>,
) -> SlotChart {
    let mut slot_labels: BTreeMap<u32, String> = BTreeMap::new();
    let mut per_series: BTreeMap<String, BTreeMap<u32, f64>> = BTreeMap::new();

    for (slot, name, value) in observations {
        let shifted = shift_slot(slot);
        let minutes = slot_minutes(shifted);
        slot_labels.entry(minutes).or_insert_with(|| slot_label(shifted));
        *per_series
            .entry(name)
            .or_default()
            .entry(minutes)
            .or_insert(0.0) += value;
    }

    let minutes: Vec<u32> = slot_labels.keys().copied().collect();
    let slots: Vec<String> = slot_labels.into_values().collect();
    let mut total = vec![0.0; minutes.len()];
    let stacks: Vec<SlotSeries> = per_series
        .into_iter()
        .map(|(name, values_by_slot)| {
            let values: Vec<f64> = minutes
                .iter()
                .map(|m| values_by_slot.get(m).copied().unwrap_or(0.0))
                .collect();
            for (i, v) in values.iter().enumerate() {
                total[i] += v;
            }
            SlotSeries { name, values }
        })
        .collect();

    SlotChart {
        id: id.to_string(),
        title: title.to_string(),
        x_title: "Time Slot".to_string(),
        y_title: y_title.to_string(),
        slots,
        total,
        stacks,
    }
}

fn created_per_slot(rows: &[&SlotCountRow]) -> SlotChart {
    slot_breakdown(
        "created-per-slot",
        "Tickets Created per Time Slot by Group",
        "Number of Tickets Created",
        rows.iter()
            .map(|r| (r.slot, r.group_name.clone(), r.tickets as f64)),
    )
}

fn actions_per_slot(rows: &[&ActionCountRow]) -> SlotChart {
    slot_breakdown(
        "actions-per-slot",
        "Actions per Time Slot by Agent",
        "Number of Actions",
        rows.iter()
            .map(|r| (r.slot, r.agent.clone(), r.actions as f64)),
    )
}

/// Two named series over the union of their category keys.
fn two_series_grouped_bar(
    id: &str,
    title: &str,
    y_title: &str,
    first: (&str, &BTreeMap<String, f64>),
    second: (&str, &BTreeMap<String, f64>),
    label: impl Fn(f64) -> String,
) -> GroupedBarChart {
    let categories: Vec<String> = first
        .1
        .keys()
        .chain(second.1.keys())
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let series = [first, second]
        .into_iter()
        .map(|(name, values_by_key)| {
            let values: Vec<Option<f64>> = categories
                .iter()
                .map(|c| values_by_key.get(c).copied())
                .collect();
            let labels = values
                .iter()
                .map(|v| v.map(&label).unwrap_or_default())
                .collect();
            CategorySeries {
                name: name.to_string(),
                values,
                labels,
            }
        })
        .collect();

    GroupedBarChart {
        id: id.to_string(),
        title: title.to_string(),
        x_title: "Group".to_string(),
        y_title: y_title.to_string(),
        categories,
        series,
    }
}

fn group_response_times(rows: &[&GroupKpiRow]) -> GroupedBarChart {
    let mean_answer = weighted_mean_by(
        rows.iter().copied(),
        |r| r.group_name.clone(),
        |r| r.mean_answer_secs,
        |r| r.ticket_count as f64,
    );
    let mean_first_answer = weighted_mean_by(
        rows.iter().copied(),
        |r| r.group_name.clone(),
        |r| r.mean_first_answer_secs,
        |r| r.ticket_count as f64,
    );
    two_series_grouped_bar(
        "group-response-times",
        "Mean Answer & Mean First Answer by Group",
        "Time (in seconds)",
        ("Mean Answer", &mean_answer),
        ("Mean First Answer", &mean_first_answer),
        seconds_to_hms,
    )
}

fn group_sla(rows: &[&GroupKpiRow]) -> GroupedBarChart {
    let sla_first = weighted_mean_by(
        rows.iter().copied(),
        |r| r.group_name.clone(),
        |r| r.sla_first_percent,
        |r| r.ticket_count as f64,
    );
    let sla_solution = weighted_mean_by(
        rows.iter().copied(),
        |r| r.group_name.clone(),
        |r| r.sla_solution_percent,
        |r| r.ticket_count as f64,
    );
    two_series_grouped_bar(
        "group-sla",
        "SLA 1st Response % & SLA Solution % by Group",
        "Percentage",
        ("SLA 1st Response %", &sla_first),
        ("SLA Solution %", &sla_solution),
        |v| format!("{}%", v as i64),
    )
}

/// Per (group, agent) occurrence-weighted daily values of the selected
/// metric, one line per pair.
fn metric_trend(rows: &[&ResponseMetricRow], metric: TrendMetric) -> LineChart {
    // Rows missing any of the three metrics are dropped up front, so
    // switching the selector never changes which points exist.
    let complete: Vec<&ResponseMetricRow> = rows
        .iter()
        .copied()
        .filter(|r| {
            r.mean_answer_secs.is_some()
                && r.sla_first_response.is_some()
                && r.sla_percent.is_some()
        })
        .collect();

    let metric_value = |r: &&ResponseMetricRow| -> Option<f64> {
        match metric {
            TrendMetric::MeanAnswerTime => r.mean_answer_secs,
            TrendMetric::SlaFirstResponse => r.sla_first_response,
            TrendMetric::SlaPercentage => r.sla_percent,
        }
    };

    let values = weighted_mean_by(
        complete.iter().copied(),
        |r| (r.group_name.clone(), r.agent.clone(), r.date),
        metric_value,
        |r| r.occurrences as f64,
    );

    let mut per_pair: BTreeMap<(String, String), Vec<LinePoint>> = BTreeMap::new();
    for ((group, agent, date), value) in values {
        let label = match metric {
            TrendMetric::MeanAnswerTime => seconds_to_hms(value),
            _ => format!("{value:.1}%"),
        };
        per_pair.entry((group, agent)).or_default().push(LinePoint {
            x: date.format("%Y-%m-%d").to_string(),
            y: value,
            label,
        });
    }

    let series = per_pair
        .into_iter()
        .map(|((group, agent), points)| LineSeries {
            name: format!("{group} - {agent}"),
            points,
        })
        .collect();

    LineChart {
        id: "metric-trend".to_string(),
        title: format!("{} over Time by Group and Agent", metric.label()),
        x_title: "Date".to_string(),
        y_title: "Values".to_string(),
        series,
    }
}

/// Grouped bars per group: the roster-wide team total leads, then each
/// selected agent. Groups order by team total, agents by their own totals.
fn tickets_by_agent_group(
    selected: &[&DistributionRow],
    team: &[&DistributionRow],
) -> GroupedBarChart {
    let team_totals = sum_by(
        team.iter().copied(),
        |r| r.group_name.clone(),
        |r| r.occurrences as f64,
    );
    let mut groups: Vec<(&String, f64)> = team_totals.iter().map(|(g, v)| (g, *v)).collect();
    groups.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    let categories: Vec<String> = groups.into_iter().map(|(g, _)| g.clone()).collect();

    let per_pair = sum_by(
        selected.iter().copied(),
        |r| (r.agent.clone(), r.group_name.clone()),
        |r| r.occurrences as f64,
    );
    let per_agent = sum_by(
        selected.iter().copied(),
        |r| r.agent.clone(),
        |r| r.occurrences as f64,
    );
    let mut agents: Vec<(String, f64)> = per_agent.into_iter().collect();
    agents.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let mut series = Vec::with_capacity(agents.len() + 1);
    let team_values: Vec<Option<f64>> = categories
        .iter()
        .map(|g| team_totals.get(g).copied())
        .collect();
    series.push(CategorySeries {
        name: "Team total".to_string(),
        labels: team_values
            .iter()
            .map(|v| v.map(count_label).unwrap_or_default())
            .collect(),
        values: team_values,
    });
    for (agent, _) in agents {
        let values: Vec<Option<f64>> = categories
            .iter()
            .map(|g| per_pair.get(&(agent.clone(), g.clone())).copied())
            .collect();
        series.push(CategorySeries {
            name: agent,
            labels: values
                .iter()
                .map(|v| v.map(count_label).unwrap_or_default())
                .collect(),
            values,
        });
    }

    GroupedBarChart {
        id: "tickets-by-agent-group".to_string(),
        title: "Tickets by Agent and Group".to_string(),
        x_title: "Groups".to_string(),
        y_title: "Number of Tickets".to_string(),
        categories,
        series,
    }
}

/// Occurrence-weighted mean answer time per agent within each group, plus a
/// TOTAL series across groups. Agents order by their overall mean,
/// slowest first.
fn response_time_by_agent(rows: &[&ResponseMetricRow]) -> GroupedBarChart {
    let per_pair = weighted_mean_by(
        rows.iter().copied(),
        |r| (r.agent.clone(), r.group_name.clone()),
        |r| r.mean_answer_secs,
        |r| r.occurrences as f64,
    );
    let per_agent = weighted_mean_by(
        rows.iter().copied(),
        |r| r.agent.clone(),
        |r| r.mean_answer_secs,
        |r| r.occurrences as f64,
    );

    let mut agents: Vec<(String, f64)> =
        per_agent.iter().map(|(a, v)| (a.clone(), *v)).collect();
    agents.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    let categories: Vec<String> = agents.into_iter().map(|(a, _)| a).collect();

    let groups: BTreeSet<String> = per_pair.keys().map(|(_, g)| g.clone()).collect();
    let mut series: Vec<CategorySeries> = groups
        .into_iter()
        .map(|group| {
            let values: Vec<Option<f64>> = categories
                .iter()
                .map(|a| per_pair.get(&(a.clone(), group.clone())).copied())
                .collect();
            CategorySeries {
                name: group,
                labels: values
                    .iter()
                    .map(|v| v.map(seconds_to_hm).unwrap_or_default())
                    .collect(),
                values,
            }
        })
        .collect();

    let total_values: Vec<Option<f64>> = categories
        .iter()
        .map(|a| per_agent.get(a).copied())
        .collect();
    series.push(CategorySeries {
        name: "TOTAL".to_string(),
        labels: total_values
            .iter()
            .map(|v| v.map(seconds_to_hm).unwrap_or_default())
            .collect(),
        values: total_values,
    });

    GroupedBarChart {
        id: "response-time-by-agent".to_string(),
        title: "Average Response Time by Agent and Group".to_string(),
        x_title: "Agents".to_string(),
        y_title: "Average Response Time (Seconds)".to_string(),
        categories,
        series,
    }
}

fn response_time_heatmap(rows: &[&ResponseMetricRow]) -> HeatmapChart {
    let pivot = Pivot::from_observations(rows.iter().filter_map(|r| {
        r.mean_answer_secs
            .map(|v| (r.agent.clone(), r.group_name.clone(), v))
    }));
    HeatmapChart {
        id: "response-time-heatmap".to_string(),
        title: "Heatmap of Average Response Time by Agent and Group".to_string(),
        x_title: "Groups".to_string(),
        y_title: "Agents".to_string(),
        text: pivot.cell_text(seconds_to_hms),
        columns: pivot.columns,
        rows: pivot.rows,
        values: pivot.cells,
    }
}

fn sla_heatmap(
    id: &str,
    title: &str,
    rows: &[&ResponseMetricRow],
    metric: impl Fn(&ResponseMetricRow) -> Option<f64>,
) -> HeatmapChart {
    let pivot = Pivot::from_observations(
        rows.iter()
            .filter_map(|r| metric(r).map(|v| (r.agent.clone(), r.group_name.clone(), v))),
    );
    HeatmapChart {
        id: id.to_string(),
        title: title.to_string(),
        x_title: "Groups".to_string(),
        y_title: "Agents".to_string(),
        text: pivot.cell_text(|v| format!("{v:.1}")),
        columns: pivot.columns,
        rows: pivot.rows,
        values: pivot.cells,
    }
}
