use super::{Collection, Document, DocumentId, ID_FIELD};
use crate::errors::NosqlError;
use crate::Result;
use sled::{Db, Tree};
use slog::Logger;
use std::fs;
use std::path::PathBuf;

const SLED_DIR: &str = ".nosql-docs";

/// A directory of named document collections, stored with `sled`.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    log: Logger,
    db: Db,
}

impl DocumentStore {
    /// Open the document store inside the given `path` directory.
    pub fn open(log: Logger, path: impl Into<PathBuf>) -> Result<DocumentStore> {
        let path_dir = path.into();
        if !path_dir.is_dir() {
            return Err(NosqlError::NotADirectory.into());
        }
        let sled_dir = path_dir.join(SLED_DIR);

        fs::create_dir_all(&sled_dir)?;

        debug!(log, "Opening document store"; "path" => %sled_dir.display());
        let db = Db::open(sled_dir)?;

        Ok(DocumentStore { log, db })
    }

    /// The collection called `name`, created if it does not exist yet.
    pub fn collection(&self, name: &str) -> Result<SledCollection> {
        let tree = self.db.open_tree(name)?;

        Ok(SledCollection {
            log: self.log.new(o!("collection" => name.to_owned())),
            db: self.db.clone(),
            tree,
        })
    }
}

/// A named collection inside a [`DocumentStore`].
///
/// Documents are keyed by the big-endian bytes of their identifier, so they
/// are listed in insertion order.
#[derive(Debug, Clone)]
#[allow(clippy::module_name_repetitions)]
pub struct SledCollection {
    log: Logger,
    db: Db,
    tree: Tree,
}

impl Collection for SledCollection {
    fn find(&self) -> Result<Vec<Document>> {
        self.tree
            .iter()
            .values()
            .map(|buf| -> Result<Document> { Ok(serde_json::from_slice(&buf?)?) })
            .collect()
    }

    fn find_one(&self, id: DocumentId) -> Result<Option<Document>> {
        match self.tree.get(id.0.to_be_bytes())? {
            None => Ok(None),
            Some(buf) => Ok(Some(serde_json::from_slice(&buf)?)),
        }
    }

    fn insert_one(&self, mut document: Document) -> Result<DocumentId> {
        if document.contains_key(ID_FIELD) {
            return Err(NosqlError::ReservedField {
                field: ID_FIELD.to_owned(),
            }
            .into());
        }

        let id = DocumentId(self.db.generate_id()?);
        document.insert(ID_FIELD.to_owned(), id.to_string().into());

        self.tree
            .insert(id.0.to_be_bytes(), serde_json::to_vec(&document)?)?;
        self.tree.flush()?;

        debug!(self.log, "Inserted document"; "id" => %id);
        Ok(id)
    }
}
