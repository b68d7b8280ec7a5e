//! Table and field lookups used to derive [`DataSource`] property sets.
//!
//! The provider may be remote, so lookups are asynchronous request/response
//! calls rather than direct reads.

use crate::catalog::{DataSource, DataSourceKind};
use crate::error::SchemaError;
use ahash::AHashMap;
use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One column of a table, as reported by a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
}

impl FieldInfo {
    pub fn new(name: &str, field_type: &str) -> Self {
        Self {
            name: name.to_string(),
            field_type: field_type.to_string(),
        }
    }
}

/// Supplies the ordered field list of a table.
#[async_trait]
pub trait SchemaProvider: Send + Sync {
    async fn fields(&self, table: &str) -> Result<Vec<FieldInfo>, SchemaError>;
}

/// An in-memory table catalog.
#[derive(Debug, Clone, Default)]
pub struct StaticSchemaProvider {
    tables: AHashMap<String, Vec<FieldInfo>>,
}

impl StaticSchemaProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(mut self, table: &str, fields: Vec<FieldInfo>) -> Self {
        self.tables.insert(table.to_string(), fields);
        self
    }
}

#[async_trait]
impl SchemaProvider for StaticSchemaProvider {
    async fn fields(&self, table: &str) -> Result<Vec<FieldInfo>, SchemaError> {
        self.tables
            .get(table)
            .cloned()
            .ok_or_else(|| SchemaError::UnknownTable(table.to_string()))
    }
}

/// Memoises successful responses of another provider. Failures are not cached.
pub struct CachingSchemaProvider<P> {
    inner: P,
    cache: RwLock<AHashMap<String, Vec<FieldInfo>>>,
}

impl<P: SchemaProvider> CachingSchemaProvider<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            cache: RwLock::new(AHashMap::new()),
        }
    }

    pub fn cached_tables(&self) -> usize {
        self.cache.read().len()
    }

    pub fn invalidate(&self, table: &str) {
        self.cache.write().remove(table);
    }
}

#[async_trait]
impl<P: SchemaProvider> SchemaProvider for CachingSchemaProvider<P> {
    async fn fields(&self, table: &str) -> Result<Vec<FieldInfo>, SchemaError> {
        // The guard is dropped at the end of this statement, before any await.
        let cached = self.cache.read().get(table).cloned();
        if let Some(fields) = cached {
            debug!(table, "schema cache hit");
            return Ok(fields);
        }
        let fields = self.inner.fields(table).await?;
        self.cache.write().insert(table.to_string(), fields.clone());
        Ok(fields)
    }
}

/// Asks `provider` for `table` and builds a data source from the answer.
pub async fn data_source_for(
    provider: &dyn SchemaProvider,
    table: &str,
    kind: DataSourceKind,
) -> Result<DataSource, SchemaError> {
    let fields = provider.fields(table).await?;
    let names: Vec<&str> = fields.iter().map(|f| f.name.as_str()).collect();
    Ok(DataSource::new(table, table, kind, &names))
}
