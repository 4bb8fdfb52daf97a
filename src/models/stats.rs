//! Per-shoe run statistics.
//!
//! The report pipeline, in order: filter stored activities to runs, derive
//! pace from average speed, resolve gear IDs to shoe names, group by shoe,
//! aggregate count/mean, format for display, sort.
//!
//! Every step is total over well-formed stored data: missing or invalid
//! numeric fields become `None` and are excluded from aggregate means, but
//! the affected activity is kept in the per-activity dataset.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::{Activity, GearCatalog};

/// Activity type included in the report; everything else is filtered out.
pub const RUN_ACTIVITY_TYPE: &str = "Run";

/// One run, fully resolved for chart rendering: shoe name instead of gear
/// ID, derived pace, coerced distance.
#[derive(Debug, Clone, Serialize)]
pub struct RunSample {
    pub gear: String,
    /// Seconds per kilometer; `None` when the stored speed is unusable
    pub pace_secs_per_km: Option<i64>,
    /// Meters; `None` when the stored distance is unusable
    pub distance_meters: Option<f64>,
}

/// One row of the aggregated report table.
#[derive(Debug, Clone, Serialize)]
pub struct GearStatsRow {
    pub gear: String,
    pub runs: u32,
    /// Mean pace formatted MM:SS; `None` when no run in the group had a
    /// usable pace (surfaced as null/"n/a", never coerced to zero)
    pub avg_pace: Option<String>,
    /// Mean distance in kilometers, rounded to 2 decimals
    pub avg_distance_km: Option<f64>,
}

/// Aggregated table plus the per-activity dataset that drives the charts.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GearReport {
    pub table: Vec<GearStatsRow>,
    pub samples: Vec<RunSample>,
}

/// Derive pace in seconds per kilometer from an average speed in m/s.
///
/// Truncates toward zero (not rounding). A missing, non-finite, or
/// non-positive speed yields `None`.
pub fn pace_secs_per_km(average_speed: Option<f64>) -> Option<i64> {
    match average_speed {
        Some(speed) if speed.is_finite() && speed > 0.0 => Some((1000.0 / speed) as i64),
        _ => None,
    }
}

/// Format seconds as zero-padded MM:SS, truncating to whole seconds.
///
/// Minutes do not roll over into hours: 3661 seconds formats as "61:01".
pub fn convert_to_mm_ss(seconds: f64) -> String {
    let total = seconds as i64;
    format!("{:02}:{:02}", total / 60, total % 60)
}

/// Convert meters to kilometers rounded to 2 decimals.
///
/// Rounding rule: half away from zero (`f64::round` applied at the
/// centimeter-of-a-kilometer scale), so 1005 m rounds to 1.01 km.
pub fn round_km(meters: f64) -> f64 {
    (meters / 10.0).round() / 100.0
}

#[derive(Default)]
struct GroupAccum {
    runs: u32,
    pace_sum: f64,
    pace_count: u32,
    distance_sum: f64,
    distance_count: u32,
}

/// Compute the per-shoe report for one athlete's stored activities.
///
/// The table is sorted by run count descending, ties broken by shoe name
/// ascending. Samples are sorted by shoe name (stable, so import order is
/// kept within a shoe).
pub fn compute_gear_report(activities: &[Activity], catalog: &GearCatalog) -> GearReport {
    let mut samples: Vec<RunSample> = activities
        .iter()
        .filter(|a| a.activity_type == RUN_ACTIVITY_TYPE)
        .map(|a| RunSample {
            gear: catalog.label_for(a.gear_id.as_deref()),
            pace_secs_per_km: pace_secs_per_km(a.average_speed),
            distance_meters: a.distance.filter(|d| d.is_finite()),
        })
        .collect();

    // BTreeMap gives name-ascending iteration, which the final stable sort
    // preserves among equal run counts.
    let mut groups: BTreeMap<String, GroupAccum> = BTreeMap::new();
    for sample in &samples {
        let group = groups.entry(sample.gear.clone()).or_default();
        group.runs += 1;
        if let Some(pace) = sample.pace_secs_per_km {
            group.pace_sum += pace as f64;
            group.pace_count += 1;
        }
        if let Some(distance) = sample.distance_meters {
            group.distance_sum += distance;
            group.distance_count += 1;
        }
    }

    let mut table: Vec<GearStatsRow> = groups
        .into_iter()
        .map(|(gear, group)| GearStatsRow {
            gear,
            runs: group.runs,
            avg_pace: (group.pace_count > 0)
                .then(|| convert_to_mm_ss(group.pace_sum / group.pace_count as f64)),
            avg_distance_km: (group.distance_count > 0)
                .then(|| round_km(group.distance_sum / group.distance_count as f64)),
        })
        .collect();
    table.sort_by(|a, b| b.runs.cmp(&a.runs));

    samples.sort_by(|a, b| a.gear.cmp(&b.gear));

    GearReport { table, samples }
}
