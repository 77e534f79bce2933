//! Forecast engine — remote performance forecast with a synthetic fallback.
//!
//! `forecast` never fails: when the forecasting service is unreachable or
//! rejects the request, a synthetic projection is generated locally and
//! tagged [`ForecastProvenance::Synthetic`].

use crate::geo;
use crate::session::{ApiRequest, SessionManager};
use crate::wire::{self, ForecastRequestBody, RemoteForecast};
use campaign_core::campaign::{CampaignDraft, MAX_FLIGHT_DAYS};
use campaign_core::error::DspResult;
use campaign_core::forecast::{DailyProjection, ForecastProvenance, ForecastResult};
use chrono::Duration;
use rand::Rng;
use std::sync::Arc;
use tracing::{debug, warn};

/// Effective CPM (USD) assumed by the synthetic model.
pub const SYNTHETIC_CPM: f64 = 15.0;
/// Share of daily impressions assumed to reach unique viewers.
const UNIQUE_REACH_RATIO: f64 = 0.7;
/// Share of a day's reach that is new to the cumulative audience.
const INCREMENTAL_REACH_RATIO: f64 = 0.3;
/// Cap on cumulative reach relative to a day's reach times the day index.
const REACH_CEILING_RATIO: f64 = 0.8;

pub struct ForecastEngine {
    session: Arc<SessionManager>,
}

impl ForecastEngine {
    pub fn new(session: Arc<SessionManager>) -> Self {
        Self { session }
    }

    pub async fn forecast(&self, draft: &CampaignDraft) -> ForecastResult {
        match self.remote_forecast(draft).await {
            Ok(result) => {
                debug!(campaign = %draft.name, reach = result.total_reach, "Remote forecast received");
                result
            }
            Err(e) => {
                warn!(
                    campaign = %draft.name,
                    error = %e,
                    "Forecast service unavailable, returning synthetic forecast"
                );
                metrics::counter!("dsp.forecast_fallbacks").increment(1);
                synthesize_fallback(draft)
            }
        }
    }

    /// Remote forecast only, without fallback.
    pub async fn remote_forecast(&self, draft: &CampaignDraft) -> DspResult<ForecastResult> {
        let geographic = geo::expand(&draft.targeting);
        let body = serde_json::to_value(ForecastRequestBody::from_draft(draft, &geographic))?;
        let request = ApiRequest::post(wire::FORECAST_PATH, body).with_scope(draft.advertiser_id.clone());

        let remote: RemoteForecast = self.session.authorized_call(&request).await?;
        Ok(remote.into())
    }
}

fn synthesize_fallback(draft: &CampaignDraft) -> ForecastResult {
    synthesize(draft, &mut rand::thread_rng())
}

/// Approximate a forecast from budget and flight length alone.
///
/// Daily impressions jitter uniformly within ±20% of an even spend; reach
/// accumulates with diminishing returns. Every ratio that divides by
/// cumulative reach defaults to 1 while that reach is still zero.
pub fn synthesize<R: Rng>(draft: &CampaignDraft, rng: &mut R) -> ForecastResult {
    let days = draft.schedule.flight_days().min(MAX_FLIGHT_DAYS);
    let base_impressions = (draft.budget.amount / SYNTHETIC_CPM).floor().max(0.0);

    let mut daily_projections = Vec::with_capacity(days as usize);
    let mut cumulative_reach = 0.0_f64;

    for i in 0..days {
        let day = f64::from(i);
        let jitter = 0.8 + 0.4 * rng.gen::<f64>();
        let daily_impressions = (base_impressions / f64::from(days) * jitter).floor();
        let daily_reach = (daily_impressions * UNIQUE_REACH_RATIO).floor();

        cumulative_reach = (cumulative_reach + daily_reach * INCREMENTAL_REACH_RATIO)
            .min(daily_reach * day * REACH_CEILING_RATIO);

        let frequency = if cumulative_reach > 0.0 {
            daily_impressions * (day + 1.0) / cumulative_reach
        } else {
            1.0
        };

        daily_projections.push(DailyProjection {
            date: draft.schedule.start_date + Duration::days(i64::from(i)),
            impressions: daily_impressions as u64,
            reach: cumulative_reach.floor() as u64,
            frequency,
        });
    }

    let average_frequency = if cumulative_reach > 0.0 {
        base_impressions / cumulative_reach
    } else {
        1.0
    };

    ForecastResult {
        total_reach: cumulative_reach.floor() as u64,
        total_impressions: base_impressions as u64,
        average_frequency,
        estimated_cpm: SYNTHETIC_CPM,
        daily_projections,
        provenance: ForecastProvenance::Synthetic,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campaign_core::campaign::{Budget, BudgetType, Objective, Schedule, Targeting};
    use campaign_core::inventory::InventorySelection;
    use chrono::NaiveDate;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn draft(budget: f64, days: i64) -> CampaignDraft {
        let start = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        CampaignDraft {
            advertiser_id: None,
            name: "Forecast".into(),
            objective: Objective::Awareness,
            budget: Budget {
                amount: budget,
                budget_type: BudgetType::Lifetime,
            },
            schedule: Schedule {
                start_date: start,
                end_date: start + Duration::days(days),
            },
            targeting: Targeting::default(),
            inventory: InventorySelection::default(),
        }
    }

    #[test]
    fn test_synthetic_base_impressions() {
        let mut rng = StdRng::seed_from_u64(7);
        let result = synthesize(&draft(15000.0, 10), &mut rng);

        assert_eq!(result.total_impressions, 1000);
        assert_eq!(result.daily_projections.len(), 10);
        assert_eq!(result.estimated_cpm, 15.0);
        assert!(result.is_synthetic());
        assert!(result.average_frequency.is_finite());
    }

    #[test]
    fn test_synthetic_daily_bounds() {
        let mut rng = StdRng::seed_from_u64(42);
        let result = synthesize(&draft(15000.0, 10), &mut rng);

        for (i, day) in result.daily_projections.iter().enumerate() {
            assert!((80..120).contains(&day.impressions), "day {} out of band: {}", i, day.impressions);
            assert!(day.frequency.is_finite());
            assert_eq!(
                day.date,
                NaiveDate::from_ymd_opt(2026, 3, 1).unwrap() + Duration::days(i as i64)
            );
        }
    }

    #[test]
    fn test_day_zero_reach_is_zero_with_unit_frequency() {
        let mut rng = StdRng::seed_from_u64(1);
        let result = synthesize(&draft(15000.0, 10), &mut rng);
        let first = &result.daily_projections[0];
        assert_eq!(first.reach, 0);
        assert_eq!(first.frequency, 1.0);
    }

    #[test]
    fn test_single_day_flight_has_finite_average() {
        let mut rng = StdRng::seed_from_u64(3);
        let result = synthesize(&draft(15000.0, 1), &mut rng);
        assert_eq!(result.total_reach, 0);
        assert_eq!(result.average_frequency, 1.0);
    }

    #[test]
    fn test_empty_flight_has_no_projections() {
        let mut rng = StdRng::seed_from_u64(3);
        let result = synthesize(&draft(15000.0, 0), &mut rng);
        assert!(result.daily_projections.is_empty());
        assert_eq!(result.total_impressions, 1000);
        assert_eq!(result.average_frequency, 1.0);
    }

    #[test]
    fn test_projection_count_is_capped() {
        let mut rng = StdRng::seed_from_u64(3);
        let result = synthesize(&draft(10_000.0, 3_000_000), &mut rng);
        assert_eq!(result.daily_projections.len(), MAX_FLIGHT_DAYS as usize);
    }

    #[test]
    fn test_reach_accumulates_over_long_flight() {
        let mut rng = StdRng::seed_from_u64(99);
        let result = synthesize(&draft(90000.0, 30), &mut rng);
        assert!(result.daily_projections.iter().all(|d| d.frequency > 0.0));
        assert!(result.total_reach > 0);
        assert!(result.average_frequency.is_finite());
    }
}
