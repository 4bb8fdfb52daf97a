// SPDX-License-Identifier: MIT

//! Chart artifact rendering.
//!
//! Consumes the fully-resolved report datasets and writes three SVG files
//! into the static directory:
//! - scatter of per-shoe average pace,
//! - box distribution of per-run pace by shoe (outliers hidden from the
//!   drawing only; the box statistics still include them),
//! - scatter of pace vs. distance colored by shoe.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Serialize;

use crate::error::{AppError, Result};
use crate::models::stats::convert_to_mm_ss;
use crate::models::{GearReport, RunSample};

pub const SCATTER_PLOT_FILE: &str = "scatter_plot.svg";
pub const BOX_PLOT_FILE: &str = "box_plot_no_outliers.svg";
pub const PACE_DISTANCE_PLOT_FILE: &str = "pace_distance_scatter_plot.svg";

/// Point color palette, cycled per shoe.
const COLORS: &[&str] = &[
    "#0000ff", "#008000", "#ff0000", "#00bcbc", "#bc00bc", "#bcbc00", "#000000",
];

const WIDTH: f64 = 640.0;
const HEIGHT: f64 = 480.0;
const MARGIN_LEFT: f64 = 70.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 20.0;
const MARGIN_BOTTOM: f64 = 80.0;
/// Extra right margin on the pace/distance chart, for the legend.
const LEGEND_WIDTH: f64 = 150.0;

/// Served locations of the rendered chart files.
#[derive(Debug, Clone, Serialize)]
pub struct ChartArtifacts {
    pub scatter_plot: String,
    pub box_plot: String,
    pub pace_distance_scatter_plot: String,
}

/// Renders report datasets to SVG files under a static directory.
#[derive(Clone)]
pub struct ChartRenderer {
    out_dir: PathBuf,
}

impl ChartRenderer {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }

    /// Render all three charts and return their served locations.
    pub fn render_all(&self, report: &GearReport) -> Result<ChartArtifacts> {
        std::fs::create_dir_all(&self.out_dir).map_err(|e| {
            AppError::Internal(anyhow::anyhow!(
                "Failed to create {}: {}",
                self.out_dir.display(),
                e
            ))
        })?;

        self.write_artifact(SCATTER_PLOT_FILE, render_gear_pace_scatter(report))?;
        self.write_artifact(BOX_PLOT_FILE, render_pace_box_plot(report))?;
        self.write_artifact(PACE_DISTANCE_PLOT_FILE, render_pace_distance_scatter(report))?;

        Ok(ChartArtifacts {
            scatter_plot: format!("/static/{}", SCATTER_PLOT_FILE),
            box_plot: format!("/static/{}", BOX_PLOT_FILE),
            pace_distance_scatter_plot: format!("/static/{}", PACE_DISTANCE_PLOT_FILE),
        })
    }

    fn write_artifact(&self, name: &str, svg: String) -> Result<()> {
        let path = self.out_dir.join(name);
        std::fs::write(&path, svg).map_err(|e| {
            AppError::Internal(anyhow::anyhow!("Failed to write {}: {}", path.display(), e))
        })?;
        tracing::debug!(path = %path.display(), "Chart artifact written");
        Ok(())
    }
}

// ─── Drawing helpers ─────────────────────────────────────────────

fn svg_open(width: f64, height: f64) -> String {
    format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" \
         viewBox=\"0 0 {w} {h}\" font-family=\"sans-serif\" font-size=\"12\">\n\
         <rect width=\"{w}\" height=\"{h}\" fill=\"white\"/>\n",
        w = width,
        h = height
    )
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

/// Map `value` from `[min, max]` onto `[out_start, out_end]`.
fn scale(value: f64, min: f64, max: f64, out_start: f64, out_end: f64) -> f64 {
    if max <= min {
        return (out_start + out_end) / 2.0;
    }
    out_start + (value - min) / (max - min) * (out_end - out_start)
}

/// Pad a degenerate (single-value) range so the scale stays usable.
fn padded_range(values: &[f64], pad: f64) -> (f64, f64) {
    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    if min == max {
        (min - pad, max + pad)
    } else {
        (min, max)
    }
}

/// Left axis with five MM:SS pace ticks plus a rotated label.
fn pace_axis(svg: &mut String, min: f64, max: f64, plot_right: f64) {
    let plot_bottom = HEIGHT - MARGIN_BOTTOM;
    svg.push_str(&format!(
        "<line x1=\"{l}\" y1=\"{t}\" x2=\"{l}\" y2=\"{b}\" stroke=\"black\"/>\n\
         <line x1=\"{l}\" y1=\"{b}\" x2=\"{r}\" y2=\"{b}\" stroke=\"black\"/>\n",
        l = MARGIN_LEFT,
        t = MARGIN_TOP,
        b = plot_bottom,
        r = plot_right,
    ));

    for i in 0..5 {
        let value = min + (max - min) * i as f64 / 4.0;
        let y = scale(value, min, max, plot_bottom, MARGIN_TOP);
        svg.push_str(&format!(
            "<line x1=\"{x0}\" y1=\"{y:.1}\" x2=\"{x1}\" y2=\"{y:.1}\" stroke=\"#cccccc\"/>\n\
             <text x=\"{tx}\" y=\"{ty:.1}\" text-anchor=\"end\">{label}</text>\n",
            x0 = MARGIN_LEFT,
            x1 = plot_right,
            y = y,
            tx = MARGIN_LEFT - 6.0,
            ty = y + 4.0,
            label = convert_to_mm_ss(value),
        ));
    }

    svg.push_str(&format!(
        "<text x=\"14\" y=\"{y:.1}\" text-anchor=\"middle\" \
         transform=\"rotate(-90 14 {y:.1})\">Pace (min/km)</text>\n",
        y = (MARGIN_TOP + plot_bottom) / 2.0,
    ));
}

/// Rotated category label under the x axis.
fn category_label(svg: &mut String, x: f64, label: &str) {
    let y = HEIGHT - MARGIN_BOTTOM + 14.0;
    svg.push_str(&format!(
        "<text x=\"{x:.1}\" y=\"{y}\" text-anchor=\"end\" \
         transform=\"rotate(-45 {x:.1} {y})\">{label}</text>\n",
        x = x,
        y = y,
        label = escape_xml(label),
    ));
}

fn empty_chart(title: &str) -> String {
    let mut svg = svg_open(WIDTH, HEIGHT);
    svg.push_str(&format!(
        "<text x=\"{x}\" y=\"{y}\" text-anchor=\"middle\" fill=\"#666666\">{title}: no data</text>\n",
        x = WIDTH / 2.0,
        y = HEIGHT / 2.0,
        title = escape_xml(title),
    ));
    svg.push_str("</svg>\n");
    svg
}

/// Per-shoe pace values (valid paces only), shoe name ascending.
fn paces_by_gear(samples: &[RunSample]) -> BTreeMap<String, Vec<f64>> {
    let mut groups: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for sample in samples {
        if let Some(pace) = sample.pace_secs_per_km {
            groups.entry(sample.gear.clone()).or_default().push(pace as f64);
        }
    }
    groups
}

// ─── Chart 1: average pace per shoe ──────────────────────────────

fn render_gear_pace_scatter(report: &GearReport) -> String {
    let groups = paces_by_gear(&report.samples);
    let means: Vec<(String, f64)> = groups
        .into_iter()
        .map(|(gear, paces)| {
            let mean = paces.iter().sum::<f64>() / paces.len() as f64;
            (gear, mean)
        })
        .collect();

    if means.is_empty() {
        return empty_chart("Average pace by shoe");
    }

    let values: Vec<f64> = means.iter().map(|(_, m)| *m).collect();
    let (min, max) = padded_range(&values, 60.0);
    let plot_right = WIDTH - MARGIN_RIGHT;
    let plot_bottom = HEIGHT - MARGIN_BOTTOM;

    let mut svg = svg_open(WIDTH, HEIGHT);
    pace_axis(&mut svg, min, max, plot_right);

    let slot = (plot_right - MARGIN_LEFT) / means.len() as f64;
    for (i, (gear, mean)) in means.iter().enumerate() {
        let x = MARGIN_LEFT + slot * (i as f64 + 0.5);
        let y = scale(*mean, min, max, plot_bottom, MARGIN_TOP);
        svg.push_str(&format!(
            "<circle cx=\"{x:.1}\" cy=\"{y:.1}\" r=\"5\" fill=\"#1f4fa0\"/>\n",
        ));
        category_label(&mut svg, x, gear);
    }

    svg.push_str("</svg>\n");
    svg
}

// ─── Chart 2: pace distribution per shoe ─────────────────────────

/// Quartile by linear interpolation over the sorted values.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    if sorted.len() == 1 {
        return sorted[0];
    }
    let pos = q * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let weight = pos - lower as f64;
    sorted[lower] * (1.0 - weight) + sorted[upper] * weight
}

fn render_pace_box_plot(report: &GearReport) -> String {
    let groups = paces_by_gear(&report.samples);
    if groups.is_empty() {
        return empty_chart("Pace distribution by shoe");
    }

    // Whiskers reach the farthest run within 1.5 IQR of the box; runs
    // beyond that are left out of the drawing only.
    struct BoxStats {
        gear: String,
        q1: f64,
        median: f64,
        q3: f64,
        whisker_low: f64,
        whisker_high: f64,
    }

    let boxes: Vec<BoxStats> = groups
        .into_iter()
        .map(|(gear, mut paces)| {
            paces.sort_by(f64::total_cmp);
            let q1 = quantile(&paces, 0.25);
            let median = quantile(&paces, 0.5);
            let q3 = quantile(&paces, 0.75);
            let iqr = q3 - q1;
            let low_fence = q1 - 1.5 * iqr;
            let high_fence = q3 + 1.5 * iqr;
            let whisker_low = paces
                .iter()
                .cloned()
                .filter(|p| *p >= low_fence)
                .fold(f64::INFINITY, f64::min);
            let whisker_high = paces
                .iter()
                .cloned()
                .filter(|p| *p <= high_fence)
                .fold(f64::NEG_INFINITY, f64::max);
            BoxStats {
                gear,
                q1,
                median,
                q3,
                whisker_low,
                whisker_high,
            }
        })
        .collect();

    let mut values: Vec<f64> = Vec::new();
    for b in &boxes {
        values.push(b.whisker_low);
        values.push(b.whisker_high);
    }
    let (min, max) = padded_range(&values, 60.0);
    let plot_right = WIDTH - MARGIN_RIGHT;
    let plot_bottom = HEIGHT - MARGIN_BOTTOM;

    let mut svg = svg_open(WIDTH, HEIGHT);
    pace_axis(&mut svg, min, max, plot_right);

    let slot = (plot_right - MARGIN_LEFT) / boxes.len() as f64;
    let box_width = (slot * 0.5).min(60.0);

    for (i, b) in boxes.iter().enumerate() {
        let x = MARGIN_LEFT + slot * (i as f64 + 0.5);
        let y = |v: f64| scale(v, min, max, plot_bottom, MARGIN_TOP);
        let (x0, x1) = (x - box_width / 2.0, x + box_width / 2.0);

        svg.push_str(&format!(
            "<line x1=\"{x:.1}\" y1=\"{wl:.1}\" x2=\"{x:.1}\" y2=\"{q1:.1}\" stroke=\"black\"/>\n\
             <line x1=\"{x:.1}\" y1=\"{q3:.1}\" x2=\"{x:.1}\" y2=\"{wh:.1}\" stroke=\"black\"/>\n\
             <line x1=\"{cx0:.1}\" y1=\"{wl:.1}\" x2=\"{cx1:.1}\" y2=\"{wl:.1}\" stroke=\"black\"/>\n\
             <line x1=\"{cx0:.1}\" y1=\"{wh:.1}\" x2=\"{cx1:.1}\" y2=\"{wh:.1}\" stroke=\"black\"/>\n\
             <rect x=\"{x0:.1}\" y=\"{q3:.1}\" width=\"{w:.1}\" height=\"{h:.1}\" \
             fill=\"#d6e4f7\" stroke=\"black\"/>\n\
             <line x1=\"{x0:.1}\" y1=\"{m:.1}\" x2=\"{x1:.1}\" y2=\"{m:.1}\" \
             stroke=\"#b03030\" stroke-width=\"2\"/>\n",
            x = x,
            x0 = x0,
            x1 = x1,
            cx0 = x - box_width / 4.0,
            cx1 = x + box_width / 4.0,
            w = box_width,
            wl = y(b.whisker_low),
            wh = y(b.whisker_high),
            q1 = y(b.q1),
            q3 = y(b.q3),
            h = (y(b.q1) - y(b.q3)).abs(),
            m = y(b.median),
        ));
        category_label(&mut svg, x, &b.gear);
    }

    svg.push_str("</svg>\n");
    svg
}

// ─── Chart 3: pace vs. distance ──────────────────────────────────

fn render_pace_distance_scatter(report: &GearReport) -> String {
    let points: Vec<(&RunSample, f64, f64)> = report
        .samples
        .iter()
        .filter_map(|s| match (s.pace_secs_per_km, s.distance_meters) {
            (Some(pace), Some(distance)) => Some((s, pace as f64, distance)),
            _ => None,
        })
        .collect();

    if points.is_empty() {
        return empty_chart("Pace vs distance");
    }

    let paces: Vec<f64> = points.iter().map(|(_, pace, _)| *pace).collect();
    let distances: Vec<f64> = points.iter().map(|(_, _, distance)| *distance).collect();
    let (pace_min, pace_max) = padded_range(&paces, 60.0);
    let (dist_min, dist_max) = padded_range(&distances, 500.0);

    let plot_right = WIDTH - LEGEND_WIDTH;
    let plot_bottom = HEIGHT - MARGIN_BOTTOM;

    // Stable palette assignment: shoe names ascending.
    let mut gears: Vec<&str> = points.iter().map(|(s, _, _)| s.gear.as_str()).collect();
    gears.sort_unstable();
    gears.dedup();

    let mut svg = svg_open(WIDTH, HEIGHT);
    pace_axis(&mut svg, pace_min, pace_max, plot_right);

    // X axis ticks (distance, meters)
    for i in 0..5 {
        let value = dist_min + (dist_max - dist_min) * i as f64 / 4.0;
        let x = scale(value, dist_min, dist_max, MARGIN_LEFT, plot_right);
        svg.push_str(&format!(
            "<text x=\"{x:.1}\" y=\"{y}\" text-anchor=\"middle\">{label:.0}</text>\n",
            x = x,
            y = plot_bottom + 18.0,
            label = value,
        ));
    }
    svg.push_str(&format!(
        "<text x=\"{x:.1}\" y=\"{y}\" text-anchor=\"middle\">Distance (m)</text>\n",
        x = (MARGIN_LEFT + plot_right) / 2.0,
        y = HEIGHT - 16.0,
    ));

    for (sample, pace, distance) in &points {
        let color = gears
            .iter()
            .position(|g| *g == sample.gear)
            .map(|i| COLORS[i % COLORS.len()])
            .unwrap_or("#000000");
        let x = scale(*distance, dist_min, dist_max, MARGIN_LEFT, plot_right);
        let y = scale(*pace, pace_min, pace_max, plot_bottom, MARGIN_TOP);
        svg.push_str(&format!(
            "<circle cx=\"{x:.1}\" cy=\"{y:.1}\" r=\"4\" fill=\"{color}\" fill-opacity=\"0.8\"/>\n",
        ));
    }

    // Legend
    for (i, gear) in gears.iter().enumerate() {
        let y = MARGIN_TOP + 16.0 * i as f64 + 8.0;
        svg.push_str(&format!(
            "<circle cx=\"{x:.1}\" cy=\"{y:.1}\" r=\"4\" fill=\"{color}\"/>\n\
             <text x=\"{tx:.1}\" y=\"{ty:.1}\">{label}</text>\n",
            x = plot_right + 14.0,
            y = y,
            color = COLORS[i % COLORS.len()],
            tx = plot_right + 24.0,
            ty = y + 4.0,
            label = escape_xml(gear),
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(gear: &str, pace: Option<i64>, distance: Option<f64>) -> RunSample {
        RunSample {
            gear: gear.to_string(),
            pace_secs_per_km: pace,
            distance_meters: distance,
        }
    }

    fn report() -> GearReport {
        GearReport {
            table: Vec::new(),
            samples: vec![
                sample("Pegasus 40", Some(400), Some(5000.0)),
                sample("Pegasus 40", Some(333), Some(10000.0)),
                sample("Speedgoat 5", Some(451), Some(12000.0)),
                sample("Speedgoat 5", None, Some(8000.0)),
            ],
        }
    }

    #[test]
    fn test_render_all_writes_three_svg_files() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = ChartRenderer::new(dir.path());

        let artifacts = renderer.render_all(&report()).unwrap();

        assert_eq!(artifacts.scatter_plot, "/static/scatter_plot.svg");
        for name in [SCATTER_PLOT_FILE, BOX_PLOT_FILE, PACE_DISTANCE_PLOT_FILE] {
            let contents = std::fs::read_to_string(dir.path().join(name)).unwrap();
            assert!(contents.starts_with("<svg"), "{} is not an SVG", name);
        }
    }

    #[test]
    fn test_render_all_handles_empty_report() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = ChartRenderer::new(dir.path());

        let artifacts = renderer.render_all(&GearReport::default()).unwrap();

        let contents = std::fs::read_to_string(dir.path().join(BOX_PLOT_FILE)).unwrap();
        assert!(contents.contains("no data"));
        assert_eq!(artifacts.box_plot, "/static/box_plot_no_outliers.svg");
    }

    #[test]
    fn test_quantile_interpolates() {
        let values = [300.0, 400.0, 500.0, 600.0];
        assert_eq!(quantile(&values, 0.5), 450.0);
        assert_eq!(quantile(&values, 0.25), 375.0);
    }

    #[test]
    fn test_gear_names_are_escaped() {
        let report = GearReport {
            table: Vec::new(),
            samples: vec![sample("Fast & Loose <3", Some(400), Some(5000.0))],
        };

        let svg = render_pace_distance_scatter(&report);
        assert!(svg.contains("Fast &amp; Loose &lt;3"));
    }
}
