use std::path::PathBuf;

use super::StoreError;

const SQLITE_SCHEME: &str = "sqlite://";
const MEMORY_ENDPOINTS: [&str; 2] = ["sqlite::memory:", ":memory:"];

/// Where a store lives and which collection it serves. Fixed at construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreConfig {
    pub endpoint: String,
    pub database: String,
    pub collection: String,
}

/// Resolved physical location of a database.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Location {
    Memory,
    File(PathBuf),
}

impl StoreConfig {
    pub fn new(
        endpoint: impl Into<String>,
        database: impl Into<String>,
        collection: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            database: database.into(),
            collection: collection.into(),
        }
    }

    /// Private in-memory database, mostly for tests.
    pub fn in_memory(collection: impl Into<String>) -> Self {
        Self::new(MEMORY_ENDPOINTS[0], "memory", collection)
    }

    /// Validates names and resolves the endpoint into a database location.
    pub fn location(&self) -> Result<Location, StoreError> {
        validate_name("database", &self.database)?;
        validate_name("collection", &self.collection)?;

        let endpoint = self.endpoint.trim();
        if MEMORY_ENDPOINTS.contains(&endpoint) {
            return Ok(Location::Memory);
        }

        let dir = match endpoint.strip_prefix(SQLITE_SCHEME) {
            Some(rest) => rest,
            None if endpoint.contains("://") => {
                return Err(StoreError::InvalidEndpoint(format!(
                    "unsupported scheme in {endpoint:?}, expected {SQLITE_SCHEME}<dir>"
                )))
            }
            None => endpoint,
        };
        if dir.is_empty() {
            return Err(StoreError::InvalidEndpoint("empty data directory".to_string()));
        }

        Ok(Location::File(
            PathBuf::from(dir).join(format!("{}.sqlite", self.database)),
        ))
    }
}

/// Collection, database and field names end up in SQL text and JSON paths,
/// so only plain identifiers are accepted.
pub(crate) fn validate_name(kind: &'static str, name: &str) -> Result<(), StoreError> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidName {
            kind,
            name: name.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_endpoints_resolve_to_memory() {
        for endpoint in MEMORY_ENDPOINTS {
            let cfg = StoreConfig::new(endpoint, "db", "banners");
            assert_eq!(cfg.location().unwrap(), Location::Memory);
        }
    }

    #[test]
    fn directory_endpoint_resolves_database_file() {
        let cfg = StoreConfig::new("sqlite://data/dir", "bannerflow", "banners");
        assert_eq!(
            cfg.location().unwrap(),
            Location::File(PathBuf::from("data/dir/bannerflow.sqlite"))
        );

        let bare = StoreConfig::new("/var/lib/banners", "main", "banners");
        assert_eq!(
            bare.location().unwrap(),
            Location::File(PathBuf::from("/var/lib/banners/main.sqlite"))
        );
    }

    #[test]
    fn rejects_foreign_scheme_and_empty_dir() {
        let cfg = StoreConfig::new("mongodb://localhost:27017", "db", "banners");
        assert!(matches!(cfg.location(), Err(StoreError::InvalidEndpoint(_))));

        let cfg = StoreConfig::new("sqlite://", "db", "banners");
        assert!(matches!(cfg.location(), Err(StoreError::InvalidEndpoint(_))));
    }

    #[test]
    fn rejects_non_identifier_names() {
        for bad in ["", "1banners", "ban ners", "banners\";drop", "bänner"] {
            let cfg = StoreConfig::new(":memory:", "db", bad);
            assert!(
                matches!(cfg.location(), Err(StoreError::InvalidName { kind: "collection", .. })),
                "{bad:?} should be rejected"
            );
        }
        let cfg = StoreConfig::new(":memory:", "my-db", "banners");
        assert!(matches!(
            cfg.location(),
            Err(StoreError::InvalidName { kind: "database", .. })
        ));
    }
}
