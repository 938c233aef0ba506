use anyhow::{anyhow, Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::normalize::RawDocument;
use crate::registry::DocumentSource;

/// Schema-flexible farmer documents, one JSON body per row. The store owns
/// ids and timestamps; everything else lives in the document.
pub struct Database {
    conn: Connection,
    path: PathBuf,
}

impl Database {
    /// Opens the database in the per-user data directory.
    pub fn open() -> Result<Self> {
        Self::open_at(&Self::default_path())
    }

    pub fn open_at(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database at {}", path.display()))?;
        Ok(Self {
            conn,
            path: path.to_path_buf(),
        })
    }

    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self {
            conn,
            path: PathBuf::from(":memory:"),
        };
        db.init()?;
        Ok(db)
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    fn default_path() -> PathBuf {
        // XDG data directory, else the working directory
        match directories::ProjectDirs::from("", "", "farmreg") {
            Some(dirs) => dirs.data_dir().join("farmreg.db"),
            None => PathBuf::from("farmreg.db"),
        }
    }

    pub fn init(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS farmers (
                id TEXT PRIMARY KEY,
                doc TEXT NOT NULL,
                created_at TEXT NOT NULL DEFAULT (datetime('now')),
                updated_at TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE INDEX IF NOT EXISTS idx_farmers_created ON farmers(created_at);
            "#,
        )?;
        Ok(())
    }

    pub fn ensure_initialized(&self) -> Result<()> {
        let tables: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='farmers'",
            [],
            |row| row.get(0),
        )?;
        if tables == 0 {
            return Err(anyhow!(
                "Database not initialized. Run 'farmreg init' first."
            ));
        }
        Ok(())
    }

    // --- Farmer documents ---

    pub fn insert_farmer(&self, doc: &Value) -> Result<String> {
        let id = uuid::Uuid::new_v4().to_string();
        let body = strip_store_fields(doc);
        self.conn.execute(
            "INSERT INTO farmers (id, doc) VALUES (?1, ?2)",
            params![id, body.to_string()],
        )?;
        debug!(%id, "farmer inserted");
        Ok(id)
    }

    /// Replaces a document and bumps `updated_at`. Returns false if the id is unknown.
    pub fn update_farmer(&self, id: &str, doc: &Value) -> Result<bool> {
        let body = strip_store_fields(doc);
        let changed = self.conn.execute(
            "UPDATE farmers
             SET doc = ?1, updated_at = MAX(datetime('now'), created_at)
             WHERE id = ?2",
            params![body.to_string(), id],
        )?;
        Ok(changed > 0)
    }

    pub fn get_document(&self, id: &str) -> Result<Option<RawDocument>> {
        self.conn
            .query_row(
                "SELECT id, doc, created_at, updated_at FROM farmers WHERE id = ?1",
                [id],
                Self::row_to_document,
            )
            .optional()
            .context("Failed to read farmer")
    }

    /// Finds a farmer by full id or by an unambiguous id prefix. The prefix
    /// is matched literally.
    pub fn resolve_id(&self, prefix: &str) -> Result<Option<String>> {
        if prefix.is_empty() {
            return Ok(None);
        }
        let mut stmt = self
            .conn
            .prepare("SELECT id FROM farmers WHERE substr(id, 1, length(?1)) = ?1 LIMIT 2")?;
        let ids = stmt
            .query_map([prefix], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        match ids.as_slice() {
            [one] => Ok(Some(one.clone())),
            [] => Ok(None),
            _ => Err(anyhow!("Id prefix '{}' is ambiguous", prefix)),
        }
    }

    /// Deletes a farmer, returning the image references its document held.
    /// Removing the images themselves is up to whatever stores them.
    pub fn delete_farmer(&self, id: &str) -> Result<Option<Vec<String>>> {
        let Some(doc) = self.get_document(id)? else {
            return Ok(None);
        };
        self.conn.execute("DELETE FROM farmers WHERE id = ?1", [id])?;
        let record = crate::normalize::normalize(&doc);
        Ok(Some(record.image_refs()))
    }

    pub fn count_farmers(&self) -> Result<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM farmers", [], |row| row.get(0))?;
        Ok(count)
    }

    pub fn list_documents(&self) -> Result<Vec<RawDocument>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, doc, created_at, updated_at FROM farmers
             ORDER BY created_at DESC, rowid DESC",
        )?;
        let rows = stmt.query_map([], Self::row_to_document)?;
        rows.collect::<Result<Vec<_>, _>>()
            .context("Failed to list farmers")
    }

    fn row_to_document(row: &rusqlite::Row) -> rusqlite::Result<RawDocument> {
        let id: String = row.get(0)?;
        let body: String = row.get(1)?;
        let created_at: String = row.get(2)?;
        let updated_at: String = row.get(3)?;

        let mut fields = match serde_json::from_str::<Value>(&body) {
            Ok(Value::Object(map)) => Value::Object(map),
            Ok(_) | Err(_) => {
                warn!(%id, "stored document is not a JSON object; loading it empty");
                Value::Object(Default::default())
            }
        };
        if let Some(obj) = fields.as_object_mut() {
            obj.insert("createdAt".into(), Value::String(created_at));
            obj.insert("updatedAt".into(), Value::String(updated_at));
        }
        Ok(RawDocument { id, fields })
    }
}

impl DocumentSource for Database {
    fn fetch_documents(&self) -> Result<Vec<RawDocument>> {
        self.list_documents()
    }
}

fn strip_store_fields(doc: &Value) -> Value {
    let mut doc = doc.clone();
    if let Some(obj) = doc.as_object_mut() {
        obj.remove("id");
        obj.remove("createdAt");
        obj.remove("updatedAt");
    }
    doc
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_init_and_ensure_initialized() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open_at(&dir.path().join("nested/farmreg.db")).unwrap();
        assert!(db.ensure_initialized().is_err());
        db.init().unwrap();
        db.ensure_initialized().unwrap();
        assert_eq!(db.count_farmers().unwrap(), 0);
    }

    #[test]
    fn test_insert_and_fetch_injects_timestamps() {
        let db = Database::open_in_memory().unwrap();
        let id = db
            .insert_farmer(&json!({"name": "김농부", "createdAt": "1999-01-01 00:00:00"}))
            .unwrap();
        let doc = db.get_document(&id).unwrap().unwrap();
        assert_eq!(doc.id, id);
        assert_eq!(doc.fields["name"], "김농부");
        // The store's timestamp wins over whatever the caller sent
        assert_ne!(doc.fields["createdAt"], "1999-01-01 00:00:00");
        assert!(doc.fields["updatedAt"].is_string());
    }

    #[test]
    fn test_list_is_newest_first() {
        let db = Database::open_in_memory().unwrap();
        let first = db.insert_farmer(&json!({"name": "first"})).unwrap();
        let second = db.insert_farmer(&json!({"name": "second"})).unwrap();
        let docs = db.fetch_documents().unwrap();
        let ids: Vec<&str> = docs.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec![second.as_str(), first.as_str()]);
    }

    #[test]
    fn test_update_and_delete() {
        let db = Database::open_in_memory().unwrap();
        let id = db
            .insert_farmer(&json!({"name": "a", "equipments": [{"images": ["x.jpg"]}]}))
            .unwrap();
        let edited = json!({"name": "b", "equipments": [{"images": ["y.jpg"]}]});
        assert!(db.update_farmer(&id, &edited).unwrap());
        assert!(!db.update_farmer("missing", &json!({})).unwrap());
        assert_eq!(db.get_document(&id).unwrap().unwrap().fields["name"], "b");

        let images = db.delete_farmer(&id).unwrap().unwrap();
        assert_eq!(images, vec!["y.jpg"]);
        assert!(db.get_document(&id).unwrap().is_none());
        assert!(db.delete_farmer(&id).unwrap().is_none());
    }

    #[test]
    fn test_corrupt_document_loads_empty() {
        let db = Database::open_in_memory().unwrap();
        db.conn
            .execute("INSERT INTO farmers (id, doc) VALUES ('bad', 'not json')", [])
            .unwrap();
        db.insert_farmer(&json!({"name": "ok"})).unwrap();
        let docs = db.fetch_documents().unwrap();
        assert_eq!(docs.len(), 2);
        let bad = docs.iter().find(|d| d.id == "bad").unwrap();
        assert!(bad.fields.get("name").is_none());
        assert!(bad.fields["createdAt"].is_string());
    }

    #[test]
    fn test_resolve_id_prefix() {
        let db = Database::open_in_memory().unwrap();
        let id = db.insert_farmer(&json!({})).unwrap();
        assert_eq!(db.resolve_id(&id[..8]).unwrap(), Some(id.clone()));
        assert_eq!(db.resolve_id("zzzz").unwrap(), None);
    }

    #[test]
    fn test_resolve_id_treats_wildcards_literally() {
        let db = Database::open_in_memory().unwrap();
        let id = db.insert_farmer(&json!({"name": "only"})).unwrap();
        assert_eq!(db.resolve_id("%").unwrap(), None);
        assert_eq!(db.resolve_id("_").unwrap(), None);
        assert_eq!(db.resolve_id("").unwrap(), None);
        assert_eq!(db.resolve_id(&format!("{}%", &id[..4])).unwrap(), None);

        // Nothing matched, so delete by these inputs removes nothing
        assert_eq!(db.count_farmers().unwrap(), 1);
        db.insert_farmer(&json!({"name": "second"})).unwrap();
        assert_eq!(db.resolve_id("%").unwrap(), None);
        assert_eq!(db.resolve_id(&id).unwrap(), Some(id.clone()));
    }

    #[test]
    fn test_default_path_names_file() {
        assert!(Database::default_path().ends_with("farmreg.db"));
    }
}
