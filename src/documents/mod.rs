//! Listing and inserting documents in a collection.

mod sled;

pub use self::sled::{DocumentStore, SledCollection};
use crate::Result;
use serde::Serialize;
use std::fmt;
use std::fmt::Display;
use std::str::FromStr;

/// A schema-free document: field names mapped to JSON values.
pub type Document = serde_json::Map<String, serde_json::Value>;

/// Field holding a document's identifier once it has been inserted.
pub const ID_FIELD: &str = "_id";

/// Identifier generated by the store for an inserted document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocumentId(pub u64);

impl Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

impl FromStr for DocumentId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        u64::from_str_radix(s, 16).map(DocumentId)
    }
}

/// Interface for a collection of documents.
pub trait Collection {
    /// Every document in the collection, in the order the store yields them.
    fn find(&self) -> Result<Vec<Document>>;
    /// The document with the given identifier, if it exists.
    fn find_one(&self, id: DocumentId) -> Result<Option<Document>>;
    /// Insert one document, returning its new identifier.
    ///
    /// The identifier is assigned by the store, so documents which already
    /// have an [`ID_FIELD`] are rejected.
    fn insert_one(&self, document: Document) -> Result<DocumentId>;
}

/// List all documents in `collection`. An empty collection gives an empty `Vec`.
pub fn list_all<C: Collection + ?Sized>(collection: &C) -> Result<Vec<Document>> {
    collection.find()
}

/// Insert a document made of exactly the given fields and return its identifier.
///
/// Fails if a value cannot be represented as JSON, or if one of the fields is
/// [`ID_FIELD`].
///
/// # Examples
///
/// ```
/// # use nosql::{insert_document, Collection, DocumentStore};
/// # let temp_dir = tempfile::TempDir::new()?;
/// # let log = slog::Logger::root(slog::Discard, slog::o!());
/// let school = DocumentStore::open(log, temp_dir.path())?.collection("school")?;
///
/// let id = insert_document(&school, vec![("name", "UCSF"), ("address", "505 Parnassus Ave")])?;
///
/// let document = school.find_one(id)?.unwrap();
/// assert_eq!(document["name"], "UCSF");
/// # Ok::<(), failure::Error>(())
/// ```
pub fn insert_document<C, I, K, V>(collection: &C, fields: I) -> Result<DocumentId>
where
    C: Collection + ?Sized,
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Serialize,
{
    let mut document = Document::new();
    for (name, value) in fields {
        document.insert(name.into(), serde_json::to_value(value)?);
    }
    collection.insert_one(document)
}
