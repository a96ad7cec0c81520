//! A document store guarded by resource-scoped permissions.
//!
//! Documents live at nodes of the resource tree (`/docs/public/welcome`).
//! Every operation is a `ResourceAccess` request on the document's path:
//!
//! | Method   | Operation | Resource            |
//! |----------|-----------|---------------------|
//! | `create` | `create`  | the new path        |
//! | `read`   | `read`    | the document path   |
//! | `update` | `update`  | the document path   |
//! | `delete` | `delete`  | the document path   |
//! | `list`   | `list`    | the listed subtree  |
//!
//! `list` additionally drops documents the caller may not `read`.

use std::{
    collections::BTreeMap,
    sync::{Arc, PoisonError, RwLock},
};

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use warden_core::{Guard, PermissionSource};
use warden_policy::{Permissible, Resource, WardenError};

/// Create a new document.
pub const CREATE: &str = "create";
/// Read a single document.
pub const READ: &str = "read";
/// Replace a document's body.
pub const UPDATE: &str = "update";
/// Remove a document.
pub const DELETE: &str = "delete";
/// List a subtree.
pub const LIST: &str = "list";

/// Every operation the store guards.
pub const ALL_OPERATIONS: [&str; 5] = [CREATE, READ, UPDATE, DELETE, LIST];

#[derive(Debug, Error)]
pub enum DocumentError {
    /// Policy evaluation refused the request.
    #[error(transparent)]
    Policy(#[from] WardenError),

    #[error("no document at '{path}'")]
    NotFound { path: String },

    #[error("a document already exists at '{path}'")]
    AlreadyExists { path: String },
}

impl DocumentError {
    #[must_use]
    pub fn is_denial(&self) -> bool {
        matches!(self, Self::Policy(e) if e.is_denial())
    }
}

/// Result alias for store operations.
pub type DocumentResult<T> = Result<T, DocumentError>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub id: Uuid,
    /// Absolute resource path, e.g. `/docs/public/welcome`.
    pub path: String,
    pub body: Value,
    /// Description of the source that last wrote the document.
    pub author: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// In-memory documents keyed by path. Cloning shares the store.
#[derive(Debug, Clone, Default)]
pub struct DocumentStore {
    documents: Arc<RwLock<BTreeMap<String, Document>>>,
}

impl DocumentStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a new document at `path`.
    ///
    /// Requires `create` on `path`. Returns `AlreadyExists` if the path is
    /// taken. The author is recorded from `source`.
    pub fn create(
        &self,
        source: &PermissionSource,
        path: &Resource,
        body: Value,
    ) -> DocumentResult<Document> {
        Permissible::access(path.clone(), CREATE).try_secure(source, || {
            let key = path.to_string();
            let mut documents = self.documents.write().unwrap_or_else(PoisonError::into_inner);
            if documents.contains_key(&key) {
                return Err(DocumentError::AlreadyExists { path: key });
            }
            let now = Utc::now();
            let document = Document {
                id: Uuid::new_v4(),
                path: key.clone(),
                body,
                author: source.description(),
                created_at: now,
                updated_at: now,
            };
            documents.insert(key, document.clone());
            info!(path = %path, author = %source, "document created");
            Ok(document)
        })
    }

    /// Fetch the document at `path`. Requires `read` on `path`.
    pub fn read(&self, source: &PermissionSource, path: &Resource) -> DocumentResult<Document> {
        Permissible::access(path.clone(), READ).try_secure(source, || self.get(path))
    }

    /// Replace the body of the document at `path`.
    ///
    /// Requires `update` on `path`. Returns `NotFound` if nothing is stored there.
    pub fn update(
        &self,
        source: &PermissionSource,
        path: &Resource,
        body: Value,
    ) -> DocumentResult<Document> {
        Permissible::access(path.clone(), UPDATE).try_secure(source, || {
            let key = path.to_string();
            let mut documents = self.documents.write().unwrap_or_else(PoisonError::into_inner);
            let document = documents
                .get_mut(&key)
                .ok_or(DocumentError::NotFound { path: key })?;
            document.body = body;
            document.author = source.description();
            document.updated_at = Utc::now();
            info!(path = %path, author = %source, "document updated");
            Ok(document.clone())
        })
    }

    /// Remove and return the document at `path`. Requires `delete` on `path`.
    pub fn delete(&self, source: &PermissionSource, path: &Resource) -> DocumentResult<Document> {
        Permissible::access(path.clone(), DELETE).try_secure(source, || {
            let key = path.to_string();
            let removed = self
                .documents
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .remove(&key)
                .ok_or(DocumentError::NotFound { path: key })?;
            info!(path = %path, by = %source, "document deleted");
            Ok(removed)
        })
    }

    /// Documents at or below `under` that `source` may read, in path order.
    pub fn list(&self, source: &PermissionSource, under: &Resource) -> DocumentResult<Vec<Document>> {
        Permissible::access(under.clone(), LIST).try_secure(source, || {
            let documents = self.documents.read().unwrap_or_else(PoisonError::into_inner);
            let visible = documents
                .values()
                .filter_map(|doc| {
                    let path = Resource::parse(&doc.path).ok()?;
                    let readable = path.is_child_of(under)
                        && source.permits(&Permissible::access(path, READ));
                    readable.then(|| doc.clone())
                })
                .collect();
            Ok(visible)
        })
    }

    /// Number of stored documents.
    pub fn len(&self) -> usize {
        self.documents.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// True if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn get(&self, path: &Resource) -> DocumentResult<Document> {
        let key = path.to_string();
        self.documents
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
            .cloned()
            .ok_or(DocumentError::NotFound { path: key })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use warden_policy::{Permission, Role};

    fn path(p: &str) -> Resource {
        Resource::parse(p).unwrap()
    }

    fn role_under(p: &str, ops: &[&str]) -> PermissionSource {
        PermissionSource::from(Role::resource(path(p), ops.iter().copied()))
    }

    fn admin() -> PermissionSource {
        PermissionSource::from(Role::SuperUser)
    }

    #[test]
    fn create_then_read() {
        let store = DocumentStore::new();
        let doc = store
            .create(&admin(), &path("/docs/a"), json!({"title": "A"}))
            .unwrap();
        assert_eq!(doc.path, "/docs/a");

        let reader = role_under("/docs", &[READ]);
        let read = store.read(&reader, &path("/docs/a")).unwrap();
        assert_eq!(read.body["title"], "A");
        assert_eq!(read.id, doc.id);
    }

    #[test]
    fn denied_operations_leave_store_untouched() {
        let store = DocumentStore::new();
        let reader = role_under("/docs", &[READ]);

        let err = store
            .create(&reader, &path("/docs/a"), json!({}))
            .unwrap_err();
        assert!(err.is_denial());
        assert!(store.is_empty());
    }

    #[test]
    fn access_is_scoped_to_the_subtree() {
        let store = DocumentStore::new();
        store.create(&admin(), &path("/docs/public/a"), json!(1)).unwrap();
        store.create(&admin(), &path("/docs/private/b"), json!(2)).unwrap();

        let reader = role_under("/docs/public", &[READ]);
        assert!(store.read(&reader, &path("/docs/public/a")).is_ok());
        assert!(store.read(&reader, &path("/docs/private/b")).unwrap_err().is_denial());
    }

    #[test]
    fn missing_and_duplicate_documents() {
        let store = DocumentStore::new();
        let missing = store.read(&admin(), &path("/docs/none")).unwrap_err();
        assert!(matches!(missing, DocumentError::NotFound { .. }));
        assert!(!missing.is_denial());

        store.create(&admin(), &path("/docs/a"), json!(1)).unwrap();
        let dup = store.create(&admin(), &path("/docs/a"), json!(2)).unwrap_err();
        assert!(matches!(dup, DocumentError::AlreadyExists { .. }));
    }

    #[test]
    fn update_and_delete() {
        let store = DocumentStore::new();
        let editor = role_under("/docs", &[CREATE, UPDATE, DELETE, READ]);
        store.create(&editor, &path("/docs/a"), json!({"v": 1})).unwrap();

        let updated = store.update(&editor, &path("/docs/a"), json!({"v": 2})).unwrap();
        assert_eq!(updated.body["v"], 2);
        assert!(updated.updated_at >= updated.created_at);

        store.delete(&editor, &path("/docs/a")).unwrap();
        assert!(matches!(
            store.read(&editor, &path("/docs/a")),
            Err(DocumentError::NotFound { .. })
        ));
    }

    #[test]
    fn list_filters_unreadable_documents() {
        let store = DocumentStore::new();
        store.create(&admin(), &path("/docs/public/a"), json!(1)).unwrap();
        store.create(&admin(), &path("/docs/drafts/b"), json!(2)).unwrap();
        store.create(&admin(), &path("/other/c"), json!(3)).unwrap();

        let docs = path("/docs");
        let auditor = PermissionSource::from(
            Permission::resource(docs.clone(), [READ, LIST])
                - Permission::resource(path("/docs/drafts"), [READ]),
        );

        let listed = store.list(&auditor, &docs).unwrap();
        let paths: Vec<&str> = listed.iter().map(|d| d.path.as_str()).collect();
        assert_eq!(paths, vec!["/docs/public/a"]);

        let no_list = role_under("/docs", &[READ]);
        assert!(store.list(&no_list, &docs).unwrap_err().is_denial());
    }
}
