//! Document records and the persisted record set

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashSet;
use std::fmt;

/// An insertion-ordered mapping of extracted field name → string value.
///
/// Field schemas are discovered at runtime from whatever the assistant
/// returns, so this is deliberately open-ended. Order is the order fields
/// were first seen; it seeds the table's column order for the first record.
/// Inserting an existing name overwrites its value in place (last wins).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSet(Vec<(String, String)>);

impl FieldSet {
    /// Create an empty field set
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Insert a field, overwriting a previous value for the same name
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.0.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.0.push((name, value)),
        }
    }

    /// Look up a field value by name
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Field names in discovery order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(n, _)| n.as_str())
    }

    /// Iterate over (name, value) pairs in discovery order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no fields are present
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, String)> for FieldSet {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        let mut set = Self::new();
        for (name, value) in iter {
            set.insert(name, value);
        }
        set
    }
}

/// One intaken document: the filename (unique within the set, the
/// de-duplication key) plus its extracted fields.
///
/// Serializes as a flat JSON object: `filename` first, then each extracted
/// field, so the stored key set is exactly what seeds the column order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRecord {
    /// Original filename; unique across the persisted set
    pub filename: String,

    /// Extracted fields in discovery order
    pub fields: FieldSet,
}

impl DocumentRecord {
    /// Create a record for a filename with the given fields
    pub fn new(filename: impl Into<String>, fields: FieldSet) -> Self {
        Self {
            filename: filename.into(),
            fields,
        }
    }

    /// The record's key set in order: "filename" followed by field names.
    /// This is what a freshly seeded column order contains.
    pub fn column_keys(&self) -> Vec<String> {
        let mut keys = Vec::with_capacity(1 + self.fields.len());
        keys.push("filename".to_string());
        keys.extend(self.fields.names().map(str::to_string));
        keys
    }

    /// Value for a display column: the filename itself or a field lookup
    pub fn column_value(&self, key: &str) -> Option<&str> {
        if key == "filename" {
            Some(&self.filename)
        } else {
            self.fields.get(key)
        }
    }
}

impl Serialize for DocumentRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1 + self.fields.len()))?;
        map.serialize_entry("filename", &self.filename)?;
        for (name, value) in self.fields.iter() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for DocumentRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RecordVisitor;

        impl<'de> Visitor<'de> for RecordVisitor {
            type Value = DocumentRecord;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a document record object with a filename key")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut filename: Option<String> = None;
                let mut fields = FieldSet::new();

                while let Some((key, value)) = access.next_entry::<String, String>()? {
                    if key == "filename" {
                        filename = Some(value);
                    } else {
                        fields.insert(key, value);
                    }
                }

                Ok(DocumentRecord {
                    filename: filename
                        .ok_or_else(|| serde::de::Error::missing_field("filename"))?,
                    fields,
                })
            }
        }

        deserializer.deserialize_map(RecordVisitor)
    }
}

/// Auxiliary external references for one record, stored in a parallel array
/// (positional correspondence with `RecordSet::documents`). Optional metadata
/// unrelated to display, so it is not embedded in the record itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalRef {
    /// Opaque file identifier issued by the assistant service's file store
    #[serde(rename = "openaiId")]
    pub file_id: String,

    /// Blob-store download URL for the original file, when a blob store
    /// was configured for the batch
    #[serde(rename = "fileBlobUrl")]
    pub download_url: Option<String>,
}

/// The full persisted collection: records, parallel external references,
/// and the display column order.
///
/// The set is replaced atomically as a whole on save (load-merge-save); the
/// merge itself happens in memory via [`RecordSet::merge_batch`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordSet {
    /// All document records, oldest first
    #[serde(default)]
    pub documents: Vec<DocumentRecord>,

    /// Parallel external references (same ordering as `documents`)
    #[serde(default, rename = "externalInfo")]
    pub external_info: Vec<ExternalRef>,

    /// Display ordering of column keys; independent of record content
    #[serde(default, rename = "columnOrder")]
    pub column_order: Vec<String>,
}

impl RecordSet {
    /// Create an empty record set
    pub fn new() -> Self {
        Self::default()
    }

    /// Filenames currently in the set. Taken as a snapshot at batch start
    /// for duplicate skipping; never updated mid-batch.
    pub fn filenames(&self) -> HashSet<String> {
        self.documents.iter().map(|d| d.filename.clone()).collect()
    }

    /// Append a batch's new records and references after the existing ones.
    /// Existing records are never touched; column order is seeded afterwards
    /// only if it was empty.
    pub fn merge_batch(&mut self, records: Vec<DocumentRecord>, refs: Vec<ExternalRef>) {
        self.documents.extend(records);
        self.external_info.extend(refs);
        self.seed_column_order();
    }

    /// Seed the column order from the first record's key set, only when no
    /// order exists yet. A non-empty order is never recomputed: field names
    /// discovered by later batches are not inserted automatically.
    pub fn seed_column_order(&mut self) {
        if self.column_order.is_empty() {
            if let Some(first) = self.documents.first() {
                self.column_order = first.column_keys();
            }
        }
    }

    /// Move a column from one position to another (user reordering).
    /// Out-of-range indices leave the order unchanged and return false.
    pub fn move_column(&mut self, from: usize, to: usize) -> bool {
        if from >= self.column_order.len() || to >= self.column_order.len() {
            return false;
        }
        let key = self.column_order.remove(from);
        self.column_order.insert(to, key);
        true
    }
}
