use std::sync::Arc;

use serde::Serialize;
use tera::{Context, Tera};

use crate::models::{Banner, EntityId};

// Embedded so the binary needs no template directory at runtime.
const TPL_BANNERS: &str = include_str!("templates/banners.html");

/// One card on the listing page.
#[derive(Serialize)]
struct BannerView<'a> {
    id: EntityId,
    created: String,
    modified: Option<String>,
    html: &'a str,
}

impl<'a> From<&'a Banner> for BannerView<'a> {
    fn from(banner: &'a Banner) -> Self {
        Self {
            id: banner.id,
            created: banner.created.to_rfc3339(),
            modified: banner.modified.map(|m| m.to_rfc3339()),
            html: &banner.html,
        }
    }
}

/// Server-rendered pages. Autoescaping is on for every `.html` template.
#[derive(Clone)]
pub struct Views {
    templates: Arc<Tera>,
}

impl Views {
    pub fn new() -> Result<Self, tera::Error> {
        let mut tera = Tera::default();
        tera.add_raw_template("banners.html", TPL_BANNERS)?;
        Ok(Self {
            templates: Arc::new(tera),
        })
    }

    /// Listing page: each banner's rendered preview next to its escaped source.
    pub fn banner_list_page(&self, banners: &[Banner]) -> Result<String, tera::Error> {
        let cards: Vec<BannerView<'_>> = banners.iter().map(BannerView::from).collect();
        let mut context = Context::new();
        context.insert("banners", &cards);
        self.templates.render("banners.html", &context)
    }
}
