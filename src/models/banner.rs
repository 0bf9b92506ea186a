use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Entity, EntityId};

/// An HTML fragment with its lifecycle timestamps.
///
/// Field names are the persisted document contract:
/// `{ _id, html, created, modified }`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Banner {
    #[serde(rename = "_id")]
    pub id: EntityId,
    pub html: String,
    #[serde(default = "epoch")]
    pub created: DateTime<Utc>,
    #[serde(default)]
    pub modified: Option<DateTime<Utc>>,
}

fn epoch() -> DateTime<Utc> {
    DateTime::<Utc>::default()
}

impl Banner {
    /// A banner that has not been persisted yet. `created` is a placeholder
    /// until the repository stamps it.
    pub fn new(id: EntityId, html: impl Into<String>) -> Self {
        Self {
            id,
            html: html.into(),
            created: epoch(),
            modified: None,
        }
    }
}

impl Entity for Banner {
    fn id(&self) -> EntityId {
        self.id
    }
}
