//! Namespace and object references.
//!
//! These are lightweight names, not live metadata: the metadata cache that
//! backs them belongs to the surrounding application and is reached through
//! [`SchemaResolver`].

use std::collections::HashMap;
use std::fmt;
use std::sync::{PoisonError, RwLock};

use serde::{Deserialize, Serialize};

/// A catalog (database) known to a connection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CatalogRef {
    pub name: String,
}

impl CatalogRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A schema, optionally inside a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SchemaRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<String>,
    pub name: String,
}

impl SchemaRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            catalog: None,
            name: name.into(),
        }
    }

    /// Place the schema inside `catalog`.
    pub fn in_catalog(mut self, catalog: impl Into<String>) -> Self {
        self.catalog = Some(catalog.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A table or other data container addressed by (catalog, schema, name).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DatabaseObjectRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    pub name: String,
}

impl DatabaseObjectRef {
    /// An unqualified object; resolved against a context's defaults.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            catalog: None,
            schema: None,
            name: name.into(),
        }
    }

    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    pub fn with_catalog(mut self, catalog: impl Into<String>) -> Self {
        self.catalog = Some(catalog.into());
        self
    }

    /// Whether the object names its schema explicitly.
    pub fn is_qualified(&self) -> bool {
        self.schema.is_some()
    }

    /// Fill in missing catalog/schema from the given defaults.
    ///
    /// Explicit parts always win over defaults.
    pub fn qualified_with(&self, catalog: Option<&str>, schema: Option<&str>) -> Self {
        Self {
            catalog: self.catalog.clone().or_else(|| catalog.map(str::to_string)),
            schema: self.schema.clone().or_else(|| schema.map(str::to_string)),
            name: self.name.clone(),
        }
    }

    /// Dot-joined name of the parts that are present.
    pub fn full_name(&self) -> String {
        let mut parts: Vec<&str> = Vec::with_capacity(3);
        if let Some(catalog) = &self.catalog {
            parts.push(catalog);
        }
        if let Some(schema) = &self.schema {
            parts.push(schema);
        }
        parts.push(&self.name);
        parts.join(".")
    }
}

impl fmt::Display for DatabaseObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_name())
    }
}

/// Read-only lookup into a connection's schema cache.
///
/// Implementations must be safe to share across contexts and threads.
pub trait SchemaResolver: Send + Sync {
    /// Find a cached schema by name. Never performs I/O.
    fn resolve_schema(&self, name: &str) -> Option<SchemaRef>;

    /// Find a cached catalog by name. Never performs I/O.
    fn resolve_catalog(&self, _name: &str) -> Option<CatalogRef> {
        None
    }
}

/// Simple in-memory [`SchemaResolver`].
#[derive(Debug, Default)]
pub struct SchemaCache {
    schemas: RwLock<HashMap<String, SchemaRef>>,
    catalogs: RwLock<HashMap<String, CatalogRef>>,
}

impl SchemaCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cache holding the given schema names.
    pub fn with_schemas<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let cache = Self::new();
        for name in names {
            cache.insert_schema(SchemaRef::new(name));
        }
        cache
    }

    pub fn insert_schema(&self, schema: SchemaRef) {
        self.schemas
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(schema.name.clone(), schema);
    }

    pub fn insert_catalog(&self, catalog: CatalogRef) {
        self.catalogs
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(catalog.name.clone(), catalog);
    }

    pub fn len(&self) -> usize {
        self.schemas
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SchemaResolver for SchemaCache {
    fn resolve_schema(&self, name: &str) -> Option<SchemaRef> {
        self.schemas
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    fn resolve_catalog(&self, name: &str) -> Option<CatalogRef> {
        self.catalogs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_name_skips_missing_parts() {
        assert_eq!(DatabaseObjectRef::new("ORDERS").full_name(), "ORDERS");
        assert_eq!(
            DatabaseObjectRef::new("ORDERS").with_schema("SALES").full_name(),
            "SALES.ORDERS"
        );
        assert_eq!(
            DatabaseObjectRef::new("orders")
                .with_schema("public")
                .with_catalog("shop")
                .to_string(),
            "shop.public.orders"
        );
    }

    #[test]
    fn test_qualified_with_keeps_explicit_parts() {
        let explicit = DatabaseObjectRef::new("ORDERS").with_schema("SALES");
        let resolved = explicit.qualified_with(Some("DB"), Some("OTHER"));
        assert_eq!(resolved.schema.as_deref(), Some("SALES"));
        assert_eq!(resolved.catalog.as_deref(), Some("DB"));

        let bare = DatabaseObjectRef::new("ORDERS");
        assert!(!bare.is_qualified());
        assert_eq!(bare.qualified_with(None, Some("STAGE")).full_name(), "STAGE.ORDERS");
        assert_eq!(bare.qualified_with(None, None), bare);
    }

    #[test]
    fn test_schema_cache_lookup() {
        let cache = SchemaCache::with_schemas(["SALES", "STAGE"]);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.resolve_schema("SALES"), Some(SchemaRef::new("SALES")));
        assert!(cache.resolve_schema("MISSING").is_none());
        assert!(cache.resolve_catalog("shop").is_none());

        cache.insert_catalog(CatalogRef::new("shop"));
        assert_eq!(cache.resolve_catalog("shop"), Some(CatalogRef::new("shop")));
    }
}
