//! # Content-Type Registry
//!
//! The set of content types a service knows, keyed by uid. Built once at
//! startup and then only read; entries are `Arc`-shared into request
//! handlers.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::content_type::ContentType;
use crate::error::SchemaError;

/// Immutable uid → content type mapping.
#[derive(Debug, Clone, Default)]
pub struct ContentTypeRegistry {
    types: BTreeMap<String, Arc<ContentType>>,
}

impl ContentTypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every content type, rejecting duplicate uids.
    pub fn from_content_types(
        content_types: impl IntoIterator<Item = ContentType>,
    ) -> Result<Self, SchemaError> {
        let mut types = BTreeMap::new();
        for content_type in content_types {
            let uid = content_type.uid().to_string();
            if types.contains_key(&uid) {
                return Err(SchemaError::DuplicateContentType(uid));
            }
            types.insert(uid, Arc::new(content_type));
        }
        Ok(Self { types })
    }

    pub fn get(&self, uid: &str) -> Option<Arc<ContentType>> {
        self.types.get(uid).cloned()
    }

    pub fn contains(&self, uid: &str) -> bool {
        self.types.contains_key(uid)
    }

    /// Content types in uid order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<ContentType>> {
        self.types.values()
    }

    pub fn uids(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
