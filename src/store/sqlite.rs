use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::{params, params_from_iter, types::Value as SqlValue, Connection, OptionalExtension};
use serde_json::{Map, Value};

use super::{
    config::{validate_name, Location, StoreConfig},
    traits::{document_id, DocumentStore},
    StoreError,
};
use crate::models::{EntityId, ID_FIELD};

/// SQLite-backed document store. Each collection is a table holding one JSON
/// document per row, keyed by `_id` as the primary key.
#[derive(Clone)]
pub struct SqliteDocumentStore {
    conn: Arc<Mutex<Connection>>,
    collection: Arc<str>,
}

impl SqliteDocumentStore {
    /// Opens the database eagerly and makes sure the collection table exists.
    pub fn connect(config: &StoreConfig) -> Result<Self, StoreError> {
        let conn = match config.location()? {
            Location::Memory => Connection::open_in_memory()?,
            Location::File(path) => {
                if let Some(dir) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(dir)?;
                }
                let conn = Connection::open(&path)?;
                conn.pragma_update(None, "journal_mode", "WAL")?;
                conn.pragma_update(None, "synchronous", "NORMAL")?;
                conn.busy_timeout(std::time::Duration::from_millis(500))?;
                log::debug!("opened document database {}", path.display());
                conn
            }
        };

        conn.execute_batch(&format!(
            r#"CREATE TABLE IF NOT EXISTS "{}" (
                _id INTEGER PRIMARY KEY,
                doc TEXT NOT NULL
            );"#,
            config.collection
        ))?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            collection: Arc::from(config.collection.as_str()),
        })
    }

    async fn run<F, T>(&self, op: &'static str, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&Connection, &str) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        let collection = Arc::clone(&self.collection);
        tokio::task::spawn_blocking(move || {
            let span = tracing::debug_span!("document_store", op, collection = %collection);
            let _entered = span.enter();
            let guard = conn.lock().map_err(|_| StoreError::Poisoned)?;
            f(&guard, &collection)
        })
        .await?
    }
}

fn parse_doc(text: &str) -> Result<Value, StoreError> {
    Ok(serde_json::from_str(text)?)
}

fn with_id(mut document: Value, id: EntityId) -> Result<Value, StoreError> {
    let object = document
        .as_object_mut()
        .ok_or_else(|| StoreError::InvalidDocument("document must be a JSON object".to_string()))?;
    object.insert(ID_FIELD.to_string(), Value::from(id));
    Ok(document)
}

fn is_primary_key_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
                || e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

fn db_insert(conn: &Connection, table: &str, id: EntityId, doc: &str) -> Result<(), StoreError> {
    let sql = format!(r#"INSERT INTO "{table}" (_id, doc) VALUES (?1, ?2)"#);
    match conn.execute(&sql, params![id, doc]) {
        Ok(_) => Ok(()),
        Err(err) if is_primary_key_violation(&err) => Err(StoreError::DuplicateKey {
            collection: table.to_string(),
            id,
        }),
        Err(err) => Err(err.into()),
    }
}

fn db_find_all(conn: &Connection, table: &str) -> Result<Vec<Value>, StoreError> {
    let mut stmt = conn.prepare(&format!(r#"SELECT doc FROM "{table}""#))?;
    let texts = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    texts.iter().map(|t| parse_doc(t)).collect()
}

fn db_find_one(conn: &Connection, table: &str, id: EntityId) -> Result<Option<Value>, StoreError> {
    let text: Option<String> = conn
        .query_row(
            &format!(r#"SELECT doc FROM "{table}" WHERE _id = ?1"#),
            params![id],
            |row| row.get(0),
        )
        .optional()?;
    text.as_deref().map(parse_doc).transpose()
}

fn db_update_fields(
    conn: &Connection,
    table: &str,
    id: EntityId,
    fields: &Map<String, Value>,
) -> Result<u64, StoreError> {
    if fields.is_empty() {
        let count: i64 = conn.query_row(
            &format!(r#"SELECT COUNT(*) FROM "{table}" WHERE _id = ?1"#),
            params![id],
            |row| row.get(0),
        )?;
        return Ok(count as u64);
    }

    let mut args = Vec::with_capacity(fields.len() * 2 + 1);
    let mut setters = Vec::with_capacity(fields.len());
    for (name, value) in fields {
        args.push(SqlValue::Text(format!("$.\"{name}\"")));
        args.push(SqlValue::Text(serde_json::to_string(value)?));
        let n = args.len();
        setters.push(format!("?{}, json(?{})", n - 1, n));
    }
    args.push(SqlValue::Integer(id));
    let sql = format!(
        r#"UPDATE "{table}" SET doc = json_set(doc, {}) WHERE _id = ?{}"#,
        setters.join(", "),
        args.len()
    );

    let rows = conn.execute(&sql, params_from_iter(args.iter()))?;
    Ok(rows as u64)
}

#[async_trait]
impl DocumentStore for SqliteDocumentStore {
    fn collection(&self) -> &str {
        &self.collection
    }

    async fn insert_one(&self, document: Value) -> Result<(), StoreError> {
        let id = document_id(&document)?;
        let text = serde_json::to_string(&document)?;
        self.run("insert_one", move |conn, table| db_insert(conn, table, id, &text))
            .await
    }

    async fn find_all(&self) -> Result<Vec<Value>, StoreError> {
        self.run("find_all", db_find_all).await
    }

    async fn find_one(&self, id: EntityId) -> Result<Option<Value>, StoreError> {
        self.run("find_one", move |conn, table| db_find_one(conn, table, id))
            .await
    }

    async fn replace_one(&self, id: EntityId, document: Value) -> Result<u64, StoreError> {
        let text = serde_json::to_string(&with_id(document, id)?)?;
        self.run("replace_one", move |conn, table| {
            let rows = conn.execute(
                &format!(r#"UPDATE "{table}" SET doc = ?1 WHERE _id = ?2"#),
                params![text, id],
            )?;
            Ok(rows as u64)
        })
        .await
    }

    async fn update_one(
        &self,
        id: EntityId,
        fields: Map<String, Value>,
    ) -> Result<u64, StoreError> {
        for name in fields.keys() {
            if name == ID_FIELD {
                return Err(StoreError::InvalidDocument(format!(
                    "{ID_FIELD} cannot be updated"
                )));
            }
            validate_name("field", name)?;
        }
        self.run("update_one", move |conn, table| {
            db_update_fields(conn, table, id, &fields)
        })
        .await
    }

    async fn delete_one(&self, id: EntityId) -> Result<u64, StoreError> {
        self.run("delete_one", move |conn, table| {
            let rows = conn.execute(
                &format!(r#"DELETE FROM "{table}" WHERE _id = ?1"#),
                params![id],
            )?;
            Ok(rows as u64)
        })
        .await
    }
}
