use std::sync::Arc;

use strum::Display;

use crate::error::ErrorInfo;
use crate::model::{Record, RecordId};

/// Lifecycle of a collection's initial fetch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "lowercase")]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed,
}

impl LoadStatus {
    /// Whether `load` may start from this status.
    pub fn can_load(self) -> bool {
        matches!(self, Self::Idle | Self::Failed)
    }
}

/// Published state of one collection.
///
/// Ids are unique within `items`. `version` increases on every change.
#[derive(Debug, Clone, Default)]
pub struct CollectionState {
    pub items: Vec<Arc<Record>>,
    pub status: LoadStatus,
    pub last_error: Option<ErrorInfo>,
    pub version: u64,
}

impl CollectionState {
    pub fn position(&self, id: &RecordId) -> Option<usize> {
        self.items.iter().position(|r| r.id.as_ref() == Some(id))
    }

    pub fn get(&self, id: &RecordId) -> Option<&Arc<Record>> {
        self.items.iter().find(|r| r.id.as_ref() == Some(id))
    }

    /// Look up a record by the id as a user typed it.
    ///
    /// `"1"` finds both `Int(1)` and `Text("1")`. An exact match wins.
    pub fn find_by_display(&self, raw: &str) -> Option<&Arc<Record>> {
        self.get(&RecordId::from(raw)).or_else(|| {
            self.items
                .iter()
                .find(|r| r.id.as_ref().is_some_and(|id| id.to_string() == raw))
        })
    }

    pub fn contains(&self, id: &RecordId) -> bool {
        self.position(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
