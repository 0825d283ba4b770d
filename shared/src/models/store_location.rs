//! Store location models and full path computation

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{EntityId, StoreLocationId, PATH_SEPARATOR};

/// A node of an entity-scoped store location tree
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoreLocation {
    pub id: StoreLocationId,
    pub name: String,
    pub color: Option<String>,
    #[serde(default)]
    pub can_store: bool,
    /// Slash-delimited path from the root location, e.g. "Lab/Fridge/Shelf 1"
    pub full_path: Option<String>,
    pub entity_id: EntityId,
    pub parent_id: Option<StoreLocationId>,
}

impl StoreLocation {
    pub fn new(id: StoreLocationId, name: impl Into<String>, entity_id: EntityId) -> Self {
        Self {
            id,
            name: name.into(),
            color: None,
            can_store: true,
            full_path: None,
            entity_id,
            parent_id: None,
        }
    }

    pub fn with_parent(mut self, parent_id: StoreLocationId) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// Store location tree errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LocationError {
    #[error("store location {0} references missing parent {1}")]
    MissingParent(StoreLocationId, StoreLocationId),

    #[error("store location {0} is part of a parent cycle")]
    Cycle(StoreLocationId),
}

/// Build the full path of `location` by walking its parents in `locations`.
pub fn build_full_path(
    location: &StoreLocation,
    locations: &HashMap<StoreLocationId, StoreLocation>,
) -> Result<String, LocationError> {
    let mut names = vec![location.name.as_str()];
    let mut seen = HashSet::from([location.id]);
    let mut current = location;

    while let Some(parent_id) = current.parent_id {
        if !seen.insert(parent_id) {
            return Err(LocationError::Cycle(location.id));
        }
        let parent = locations
            .get(&parent_id)
            .ok_or(LocationError::MissingParent(current.id, parent_id))?;
        names.push(parent.name.as_str());
        current = parent;
    }

    names.reverse();
    Ok(names.join(&PATH_SEPARATOR.to_string()))
}
