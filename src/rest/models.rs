use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Banner, EntityId};

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub uptime_secs: u64,
}

#[derive(Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct BannerResponse {
    pub id: EntityId,
    pub html: String,
    pub created: DateTime<Utc>,
    pub modified: Option<DateTime<Utc>>,
}

impl From<Banner> for BannerResponse {
    fn from(banner: Banner) -> Self {
        Self {
            id: banner.id,
            html: banner.html,
            created: banner.created,
            modified: banner.modified,
        }
    }
}

/// Body of `POST /banners`. Timestamps sent by the client are ignored.
#[derive(Serialize, Deserialize)]
pub struct CreateBannerRequest {
    pub id: EntityId,
    pub html: String,
}

/// Body of `PUT /banners/:id`. The path id is authoritative.
#[derive(Serialize, Deserialize)]
pub struct UpdateBannerRequest {
    #[serde(default)]
    pub id: Option<EntityId>,
    pub html: String,
}
