// SPDX-License-Identifier: MIT

//! HTML views, built from static skeletons and formatted fragments.

use crate::models::GearStatsRow;
use crate::services::ChartArtifacts;

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Wrap a body fragment in the shared page shell.
fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n\
         <style>\n\
         body {{ font-family: sans-serif; max-width: 720px; margin: 2rem auto; padding: 0 1rem; }}\n\
         table {{ border-collapse: collapse; width: 100%; margin: 1rem 0; }}\n\
         th, td {{ border: 1px solid #ccc; padding: 0.4rem 0.6rem; text-align: left; }}\n\
         th {{ background: #f0f0f0; }}\n\
         img {{ max-width: 100%; margin: 1rem 0; }}\n\
         </style>\n</head>\n<body>\n{body}\n</body>\n</html>\n",
        title = escape_html(title),
        body = body,
    )
}

pub fn render_landing_page() -> String {
    include_str!("../templates/landing.html").to_string()
}

pub fn render_authorization_denied() -> String {
    include_str!("../templates/authorization_denied.html").to_string()
}

pub fn render_authorization_success(name: Option<&str>, athlete_id: i64, user_id: i64) -> String {
    let greeting = match name {
        Some(name) => format!("Welcome, {}!", escape_html(name)),
        None => "Welcome!".to_string(),
    };

    let body = format!(
        "<h1>Authorization successful</h1>\n\
         <p>{greeting}</p>\n\
         <p>Your Strava athlete ID is <strong>{athlete_id}</strong>.</p>\n\
         <p><a href=\"/fetch_activities/{user_id}\">Import your activities</a>, then\n\
         <a href=\"/stats/{athlete_id}\">view your shoe statistics</a>.</p>\n",
    );

    page("Authorization successful", &body)
}

pub fn render_stats_page(table: &[GearStatsRow], charts: &ChartArtifacts) -> String {
    let mut body = String::new();
    body.push_str("<h1>Shoe statistics</h1>\n");

    if table.is_empty() {
        body.push_str("<p>No runs imported yet.</p>\n");
    } else {
        body.push_str(
            "<table>\n<thead><tr><th>Gear</th><th>Number of Runs</th>\
             <th>Average Pace</th><th>Average Distance (km)</th></tr></thead>\n<tbody>\n",
        );
        for row in table {
            let pace = row.avg_pace.as_deref().unwrap_or("n/a");
            let distance = row
                .avg_distance_km
                .map(|km| format!("{:.2}", km))
                .unwrap_or_else(|| "n/a".to_string());
            body.push_str(&format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                escape_html(&row.gear),
                row.runs,
                escape_html(pace),
                distance,
            ));
        }
        body.push_str("</tbody>\n</table>\n");
    }

    body.push_str(&format!(
        "<h2>Average pace by shoe</h2>\n<img src=\"{}\" alt=\"Average pace by shoe\">\n\
         <h2>Pace distribution by shoe</h2>\n<img src=\"{}\" alt=\"Pace distribution by shoe\">\n\
         <h2>Pace vs distance</h2>\n<img src=\"{}\" alt=\"Pace vs distance\">\n",
        charts.scatter_plot, charts.box_plot, charts.pace_distance_scatter_plot,
    ));

    page("Shoe statistics", &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn charts() -> ChartArtifacts {
        ChartArtifacts {
            scatter_plot: "/static/scatter_plot.svg".to_string(),
            box_plot: "/static/box_plot_no_outliers.svg".to_string(),
            pace_distance_scatter_plot: "/static/pace_distance_scatter_plot.svg".to_string(),
        }
    }

    #[test]
    fn test_stats_page_renders_rows_and_charts() {
        let table = vec![GearStatsRow {
            gear: "Pegasus 40".to_string(),
            runs: 2,
            avg_pace: Some("06:06".to_string()),
            avg_distance_km: Some(7.5),
        }];

        let html = render_stats_page(&table, &charts());
        assert!(html.contains("Pegasus 40"));
        assert!(html.contains("06:06"));
        assert!(html.contains("7.50"));
        assert!(html.contains("/static/scatter_plot.svg"));
    }

    #[test]
    fn test_stats_page_missing_aggregates_render_na() {
        let table = vec![GearStatsRow {
            gear: "Unknown".to_string(),
            runs: 1,
            avg_pace: None,
            avg_distance_km: None,
        }];

        let html = render_stats_page(&table, &charts());
        assert!(html.contains("n/a"));
        assert!(!html.contains("00:00"));
    }

    #[test]
    fn test_gear_names_are_escaped() {
        let table = vec![GearStatsRow {
            gear: "<script>alert(1)</script>".to_string(),
            runs: 1,
            avg_pace: Some("05:00".to_string()),
            avg_distance_km: Some(5.0),
        }];

        let html = render_stats_page(&table, &charts());
        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_success_page_without_name() {
        let html = render_authorization_success(None, 42, 1);
        assert!(html.contains("Welcome!"));
        assert!(html.contains("/stats/42"));
        assert!(html.contains("/fetch_activities/1"));
    }
}
