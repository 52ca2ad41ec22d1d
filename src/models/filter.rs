use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::ValidationErrors;

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Filter {
    pub id: i64,
    pub account_id: i64,
    pub endpoint_id: Option<i64>,
    pub enabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A filter together with the ids of everything it routes.
#[derive(Debug, Clone)]
pub struct FilterWithAssociations {
    pub filter: Filter,
    pub app_ids: Vec<i64>,
    pub event_type_ids: Vec<i64>,
    pub level_ids: Vec<i64>,
}

/// Attributes of a filter about to be created. Id lists are sorted and deduplicated.
#[derive(Debug, Clone, PartialEq)]
pub struct NewFilter {
    pub enabled: bool,
    pub endpoint_id: Option<i64>,
    pub app_ids: Vec<i64>,
    pub event_type_ids: Vec<i64>,
    pub level_ids: Vec<i64>,
}

/// What the database knows about the ids a [`NewFilter`] refers to.
#[derive(Debug, Clone, Default)]
pub struct AssociationCatalog {
    pub app_ids: HashSet<i64>,
    /// event type id -> owning app id
    pub event_type_apps: HashMap<i64, i64>,
    /// (event type id, level id) links
    pub event_type_levels: HashSet<(i64, i64)>,
    pub level_ids: HashSet<i64>,
}

impl NewFilter {
    pub fn new(
        enabled: bool,
        endpoint_id: Option<i64>,
        app_ids: Vec<i64>,
        event_type_ids: Vec<i64>,
        level_ids: Vec<i64>,
    ) -> Self {
        NewFilter {
            enabled,
            endpoint_id,
            app_ids: normalize(app_ids),
            event_type_ids: normalize(event_type_ids),
            level_ids: normalize(level_ids),
        }
    }

    /// Reject unknown ids, event types outside the chosen apps, and levels
    /// not attached to any chosen event type.
    pub fn validate(&self, catalog: &AssociationCatalog) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let unknown_apps: Vec<i64> = self
            .app_ids
            .iter()
            .copied()
            .filter(|id| !catalog.app_ids.contains(id))
            .collect();
        if !unknown_apps.is_empty() {
            errors.add("app_ids", format!("contains unknown ids: {}", join(&unknown_apps)));
        }

        let mut unknown_event_types = Vec::new();
        let mut foreign_event_types = Vec::new();
        for id in &self.event_type_ids {
            match catalog.event_type_apps.get(id) {
                None => unknown_event_types.push(*id),
                Some(app_id) if self.app_ids.binary_search(app_id).is_err() => {
                    foreign_event_types.push(*id)
                }
                Some(_) => {}
            }
        }
        if !unknown_event_types.is_empty() {
            errors.add(
                "event_type_ids",
                format!("contains unknown ids: {}", join(&unknown_event_types)),
            );
        }
        if !foreign_event_types.is_empty() {
            errors.add(
                "event_type_ids",
                format!(
                    "do not belong to the selected apps: {}",
                    join(&foreign_event_types)
                ),
            );
        }

        let mut unknown_levels = Vec::new();
        let mut unused_levels = Vec::new();
        for id in &self.level_ids {
            if !catalog.level_ids.contains(id) {
                unknown_levels.push(*id);
            } else if !self
                .event_type_ids
                .iter()
                .any(|et| catalog.event_type_levels.contains(&(*et, *id)))
            {
                unused_levels.push(*id);
            }
        }
        if !unknown_levels.is_empty() {
            errors.add("levels", format!("contains unknown ids: {}", join(&unknown_levels)));
        }
        if !unused_levels.is_empty() {
            errors.add(
                "levels",
                format!(
                    "are not used by the selected event types: {}",
                    join(&unused_levels)
                ),
            );
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

fn normalize(mut ids: Vec<i64>) -> Vec<i64> {
    ids.sort_unstable();
    ids.dedup();
    ids
}

fn join(ids: &[i64]) -> String {
    ids.iter().map(i64::to_string).collect::<Vec<_>>().join(", ")
}
