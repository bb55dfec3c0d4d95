use crate::api::AdminApi;
use crate::chart::{Axes, ChartAdapter, ChartConfig, ChartKind, ChartSlot, Dataset, Rgba};
use crate::errors::DashboardError;
use crate::models::{PeriodKey, StatsResponse};
use tracing::{info, warn};

/// Click counts per bucket. Every series has one entry per label.
#[derive(Debug, Clone, PartialEq)]
pub struct StatisticsSeries {
    pub period: PeriodKey,
    pub labels: Vec<String>,
    pub telegram: Vec<u64>,
    pub compra: Vec<u64>,
    pub total: Vec<u64>,
}

impl StatisticsSeries {
    pub fn from_response(period: PeriodKey, response: StatsResponse) -> Result<Self, DashboardError> {
        let buckets = response.labels.len();
        for (name, series) in [
            ("telegram", &response.telegram),
            ("compra", &response.compra),
            ("total", &response.total),
        ] {
            if series.len() != buckets {
                return Err(DashboardError::InvalidResponse(format!(
                    "series '{name}' has {} values for {buckets} labels",
                    series.len()
                )));
            }
        }

        Ok(Self {
            period,
            labels: response.labels,
            telegram: response.telegram,
            compra: response.compra,
            total: response.total,
        })
    }

    pub fn chart_config(&self) -> ChartConfig {
        ChartConfig {
            kind: ChartKind::Bar,
            labels: self.labels.clone(),
            datasets: vec![
                Dataset {
                    label: "Telegram".into(),
                    data: self.telegram.clone(),
                    color: Rgba(42, 139, 242, 0.8),
                },
                Dataset {
                    label: "Compra".into(),
                    data: self.compra.clone(),
                    color: Rgba(255, 212, 0, 0.9),
                },
                Dataset {
                    label: "Total".into(),
                    data: self.total.clone(),
                    color: Rgba(180, 180, 180, 0.3),
                },
            ],
            axes: Axes {
                x_stacked: true,
                y_stacked: true,
                y_begin_at_zero: true,
            },
        }
    }
}

/// Fetches period statistics and owns the single live chart.
pub struct StatisticsRequestor<C: ChartAdapter> {
    adapter: C,
    slot: ChartSlot<C::Chart>,
    period: PeriodKey,
}

impl<C: ChartAdapter> StatisticsRequestor<C> {
    pub fn new(adapter: C) -> Self {
        Self {
            adapter,
            slot: ChartSlot::default(),
            period: PeriodKey::default(),
        }
    }

    /// Period of the chart currently shown (or about to be shown on first load).
    pub fn period(&self) -> PeriodKey {
        self.period
    }

    pub fn chart(&self) -> Option<&C::Chart> {
        self.slot.current()
    }

    /// Redraws the chart for `period`. A failed fetch changes nothing.
    pub async fn load<A: AdminApi + ?Sized>(&mut self, api: &A, period: PeriodKey) -> bool {
        let series = match api.click_stats(period).await {
            Ok(response) => StatisticsSeries::from_response(period, response),
            Err(err) => Err(err),
        };
        let series = match series {
            Ok(series) => series,
            Err(err) => {
                warn!("statistics for {period} not loaded: {err}");
                return false;
            }
        };

        let config = series.chart_config();
        let adapter = &mut self.adapter;
        self.slot.replace(|| adapter.draw(config));
        self.period = period;
        info!("chart redrawn for {period} ({} buckets)", series.labels.len());
        true
    }
}
