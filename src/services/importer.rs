// SPDX-License-Identifier: MIT

//! Activity import service.
//!
//! Pages through the athlete's full Strava history and upserts each
//! activity into the store, keyed by `(athlete_id, activity_id)`. Partial
//! imports are fine: the upsert key makes a re-run idempotent.

use crate::db::Db;
use crate::error::Result;
use crate::models::{NewActivity, User};
use crate::services::strava::{StravaActivitySummary, StravaService};
use crate::time_utils::now_epoch;

/// Fixed page size for the activities listing.
const PER_PAGE: u32 = 200;

/// Upper bound on pages per run, so a misbehaving account cannot keep the
/// loop alive forever (200 activities/page × 100 pages = 20k activities).
const MAX_PAGES: u32 = 100;

/// What one import run did.
#[derive(Debug, Default)]
pub struct ImportOutcome {
    pub pages_fetched: u32,
    pub activities_imported: u32,
    /// True when the run stopped before exhausting the listing (fetch
    /// failure, missing token, or the page cap). Committed pages stay.
    pub halted: bool,
}

/// Imports an athlete's activity history.
#[derive(Clone)]
pub struct ActivityImporter {
    strava: StravaService,
    db: Db,
}

impl ActivityImporter {
    pub fn new(strava: StravaService, db: Db) -> Self {
        Self { strava, db }
    }

    /// Import the user's complete activity history.
    ///
    /// `before` is frozen at the start of the run and `after` is 0, so
    /// activities recorded externally while the import is in flight are
    /// excluded consistently across pages. Pages advance from 1 until one
    /// comes back empty; any fetch failure halts the run and leaves the
    /// already-committed pages in place.
    pub async fn import_all(&self, user: &User) -> Result<ImportOutcome> {
        let mut outcome = ImportOutcome::default();

        let Some(access_token) = self.strava.get_valid_access_token(user).await? else {
            tracing::warn!(
                athlete_id = user.athlete_id,
                "No usable access token, skipping import"
            );
            outcome.halted = true;
            return Ok(outcome);
        };

        let before = now_epoch();
        let after = 0;
        let mut page = 1;

        loop {
            if page > MAX_PAGES {
                tracing::warn!(
                    athlete_id = user.athlete_id,
                    max_pages = MAX_PAGES,
                    "Import page cap reached, stopping"
                );
                outcome.halted = true;
                break;
            }

            let batch = match self
                .strava
                .list_activities_page(&access_token, before, after, page, PER_PAGE)
                .await
            {
                Ok(batch) => batch,
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        athlete_id = user.athlete_id,
                        page,
                        "Activity fetch failed, halting import"
                    );
                    outcome.halted = true;
                    break;
                }
            };

            if batch.is_empty() {
                break;
            }

            outcome.pages_fetched += 1;
            for summary in &batch {
                self.db
                    .upsert_activity(&map_summary(user.athlete_id, summary))
                    .await?;
                outcome.activities_imported += 1;
            }

            page += 1;
        }

        tracing::info!(
            athlete_id = user.athlete_id,
            pages = outcome.pages_fetched,
            activities = outcome.activities_imported,
            halted = outcome.halted,
            "Import run finished"
        );

        Ok(outcome)
    }
}

/// Normalize a listing entry into the stored shape. Pace is deliberately
/// absent: it is derived at report time, never taken from import data.
fn map_summary(athlete_id: i64, summary: &StravaActivitySummary) -> NewActivity {
    NewActivity {
        athlete_id,
        activity_id: summary.id,
        start_date: summary.start_date.clone(),
        activity_type: summary.activity_type.clone(),
        elapsed_time: summary.elapsed_time,
        moving_time: summary.moving_time,
        distance: summary.distance,
        average_speed: summary.average_speed,
        gear_id: summary.gear_id.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_summary() {
        let summary = StravaActivitySummary {
            id: 555,
            start_date: "2024-03-02T08:15:00Z".to_string(),
            activity_type: "Run".to_string(),
            elapsed_time: 1900,
            moving_time: 1800,
            distance: Some(5000.0),
            average_speed: Some(2.5),
            gear_id: Some("g1".to_string()),
        };

        let activity = map_summary(42, &summary);
        assert_eq!(activity.athlete_id, 42);
        assert_eq!(activity.activity_id, 555);
        assert_eq!(activity.activity_type, "Run");
        assert_eq!(activity.gear_id.as_deref(), Some("g1"));
    }
}
