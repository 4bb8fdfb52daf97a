// SPDX-License-Identifier: MIT

//! Business logic services.

pub mod charts;
pub mod importer;
pub mod strava;

pub use charts::{ChartArtifacts, ChartRenderer};
pub use importer::ActivityImporter;
pub use strava::StravaService;
