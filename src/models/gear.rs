// SPDX-License-Identifier: MIT

//! Shoe catalog parsing and gear-id resolution.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::User;

/// Label substituted for activities whose gear ID cannot be resolved.
///
/// This is the single fallback policy for unmapped gear: an empty catalog,
/// a missing gear ID, and an ID absent from the catalog all resolve to it.
pub const UNKNOWN_GEAR: &str = "Unknown";

/// One shoe from the athlete's Strava profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Gear {
    pub id: String,
    pub name: String,
}

/// Per-user gear-id → shoe-name mapping, parsed from the stored catalog
/// snapshot. The snapshot is refreshed on every successful athlete-summary
/// fetch, so reports reflect renames going forward only.
#[derive(Debug, Clone, Default)]
pub struct GearCatalog {
    names: HashMap<String, String>,
}

impl GearCatalog {
    /// Parse a serialized catalog (JSON array of `{id, name}`).
    ///
    /// An empty, absent, or malformed catalog yields an empty mapping;
    /// resolution then falls back to [`UNKNOWN_GEAR`] for every activity.
    pub fn parse(serialized: &str) -> Self {
        let shoes: Vec<Gear> = match serde_json::from_str(serialized) {
            Ok(shoes) => shoes,
            Err(err) => {
                if !serialized.trim().is_empty() {
                    tracing::warn!(error = %err, "Malformed shoe catalog, treating as empty");
                }
                Vec::new()
            }
        };

        Self {
            names: shoes.into_iter().map(|g| (g.id, g.name)).collect(),
        }
    }

    /// Parse the catalog stored on a user row.
    pub fn from_user(user: &User) -> Self {
        Self::parse(&user.shoes)
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Resolve a gear ID to a display label, falling back to [`UNKNOWN_GEAR`].
    pub fn label_for(&self, gear_id: Option<&str>) -> String {
        gear_id
            .and_then(|id| self.names.get(id))
            .cloned()
            .unwrap_or_else(|| UNKNOWN_GEAR.to_string())
    }
}
