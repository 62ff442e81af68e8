//! Template persistence on top of a simple key-value blob store.

use std::collections::HashMap;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::error::PagemarkError;
use crate::template::Template;

/// Key under which the full template list is stored.
pub const TEMPLATES_KEY: &str = "templates";

/// A string-valued key-value store.
pub trait BlobStore {
    fn get(&self, key: &str) -> Result<Option<String>, PagemarkError>;
    fn set(&self, key: &str, value: &str) -> Result<(), PagemarkError>;
}

/// Keeps each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileBlobStore {
    dir: PathBuf,
}

impl FileBlobStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileBlobStore { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, PagemarkError> {
        if key.is_empty()
            || !key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(PagemarkError::InvalidArgument(format!(
                "invalid store key '{key}'"
            )));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }

    fn store_err(&self, e: std::io::Error) -> PagemarkError {
        PagemarkError::Store {
            path: self.dir.clone(),
            reason: e.to_string(),
        }
    }
}

impl BlobStore for FileBlobStore {
    fn get(&self, key: &str) -> Result<Option<String>, PagemarkError> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(self.store_err(e)),
        }
    }

    /// Writes through a temp file in the same directory, then renames it into place.
    fn set(&self, key: &str, value: &str) -> Result<(), PagemarkError> {
        let path = self.path_for(key)?;
        std::fs::create_dir_all(&self.dir).map_err(|e| self.store_err(e))?;
        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir).map_err(|e| self.store_err(e))?;
        tmp.write_all(value.as_bytes()).map_err(|e| self.store_err(e))?;
        tmp.persist(&path).map_err(|e| self.store_err(e.error))?;
        Ok(())
    }
}

/// In-process store, mostly for tests.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlobStore for MemoryBlobStore {
    fn get(&self, key: &str) -> Result<Option<String>, PagemarkError> {
        let entries = self.entries.lock().map_err(|_| poisoned())?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PagemarkError> {
        let mut entries = self.entries.lock().map_err(|_| poisoned())?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

fn poisoned() -> PagemarkError {
    PagemarkError::Store {
        path: PathBuf::from("<memory>"),
        reason: "lock poisoned".into(),
    }
}

/// All templates, stored as one JSON array under [`TEMPLATES_KEY`].
pub struct TemplateRepository<S: BlobStore> {
    store: S,
}

impl<S: BlobStore> TemplateRepository<S> {
    pub fn new(store: S) -> Self {
        TemplateRepository { store }
    }

    /// Every stored template. A missing, blank or unreadable list yields an empty one.
    pub fn get_all(&self) -> Result<Vec<Template>, PagemarkError> {
        let raw = match self.store.get(TEMPLATES_KEY)? {
            Some(raw) if !raw.trim().is_empty() => raw,
            _ => return Ok(Vec::new()),
        };
        match serde_json::from_str::<Vec<Template>>(&raw) {
            Ok(templates) => Ok(templates),
            Err(e) => {
                tracing::warn!(error = %e, "stored templates are not valid JSON, starting empty");
                Ok(Vec::new())
            }
        }
    }

    pub fn get(&self, id: &str) -> Result<Option<Template>, PagemarkError> {
        Ok(self.get_all()?.into_iter().find(|t| t.id == id))
    }

    /// Like [`get`](Self::get), but a missing template is an error.
    pub fn require(&self, id: &str) -> Result<Template, PagemarkError> {
        self.get(id)?
            .ok_or_else(|| PagemarkError::TemplateNotFound(id.to_string()))
    }

    /// Insert or replace by id. A replaced template keeps its position.
    pub fn save(&self, template: Template) -> Result<Template, PagemarkError> {
        let mut templates = self.get_all()?;
        match templates.iter().position(|t| t.id == template.id) {
            Some(i) => templates[i] = template.clone(),
            None => templates.push(template.clone()),
        }
        self.write_all(&templates)?;
        tracing::debug!(id = %template.id, count = templates.len(), "saved template");
        Ok(template)
    }

    /// Remove by id. Removing an unknown id is not an error.
    pub fn delete(&self, id: &str) -> Result<(), PagemarkError> {
        let mut templates = self.get_all()?;
        templates.retain(|t| t.id != id);
        self.write_all(&templates)
    }

    fn write_all(&self, templates: &[Template]) -> Result<(), PagemarkError> {
        let json = serde_json::to_string(templates)?;
        self.store.set(TEMPLATES_KEY, &json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{DisplayRect, PageHeight};
    use crate::template::NamedSelection;

    fn template(name: &str) -> Template {
        let mut t = Template::new(name);
        t.add_selection(
            NamedSelection::from_display(
                "total",
                DisplayRect::new(10.0, 10.0, 50.0, 20.0).unwrap(),
                PageHeight::new(792.0).unwrap(),
            )
            .unwrap(),
        );
        t
    }

    #[test]
    fn test_empty_store_has_no_templates() {
        let repo = TemplateRepository::new(MemoryBlobStore::new());
        assert!(repo.get_all().unwrap().is_empty());
        assert!(repo.get("nope").unwrap().is_none());
        assert!(matches!(
            repo.require("nope"),
            Err(PagemarkError::TemplateNotFound(_))
        ));
    }

    #[test]
    fn test_save_upserts_in_place() {
        let repo = TemplateRepository::new(MemoryBlobStore::new());
        let a = repo.save(template("A")).unwrap();
        let b = repo.save(template("B")).unwrap();

        let mut renamed = a.clone();
        renamed.name = "A2".into();
        repo.save(renamed).unwrap();

        let all = repo.get_all().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, a.id);
        assert_eq!(all[0].name, "A2");
        assert_eq!(all[1].id, b.id);
        assert_eq!(all[0].selections, a.selections);
    }

    #[test]
    fn test_delete() {
        let repo = TemplateRepository::new(MemoryBlobStore::new());
        let a = repo.save(template("A")).unwrap();
        repo.delete("unknown").unwrap();
        assert_eq!(repo.get_all().unwrap().len(), 1);
        repo.delete(&a.id).unwrap();
        assert!(repo.get_all().unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_json_reads_as_empty() {
        let store = MemoryBlobStore::new();
        store.set(TEMPLATES_KEY, "{not json").unwrap();
        let repo = TemplateRepository::new(store);
        assert!(repo.get_all().unwrap().is_empty());
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store_dir = dir.path().join("nested");
        let repo = TemplateRepository::new(FileBlobStore::new(&store_dir));
        let saved = repo.save(template("Invoice")).unwrap();

        assert!(store_dir.join("templates.json").exists());
        let reopened = TemplateRepository::new(FileBlobStore::new(&store_dir));
        assert_eq!(reopened.get(&saved.id).unwrap(), Some(saved));
    }

    #[test]
    fn test_file_store_rejects_path_like_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileBlobStore::new(dir.path());
        assert!(store.get("../etc/passwd").is_err());
        assert!(store.set("", "x").is_err());
        assert_eq!(store.get("missing").unwrap(), None);
    }
}
