//! Qdrant-backed vector store.
//!
//! The configured collection name is an *alias*. Every publish writes a
//! fresh physical collection (`<alias>-<8 hex chars>`), upserts all points
//! into it, and then re-points the alias in a single aliases update. Readers
//! always see one complete index generation: a failed upload leaves the
//! previous generation visible, and concurrent uploads cannot interleave
//! because the last alias swap wins wholesale. Superseded generations are
//! pruned after the swap.

use anyhow::{bail, Result};
use qdrant_client::qdrant::value::Kind;
use qdrant_client::qdrant::{
    alias_operations::Action, AliasOperations, ChangeAliases, CreateAlias,
    CreateCollectionBuilder, DeleteAlias, Distance, PointStruct, ScoredPoint,
    SearchPointsBuilder, UpsertPointsBuilder, VectorParamsBuilder,
};
use qdrant_client::{Payload, Qdrant};
use uuid::Uuid;

use crate::config::QdrantConfig;
use crate::models::{Chunk, ScoredChunk};

pub struct VectorStore {
    client: Qdrant,
    alias: String,
    dims: u64,
}

impl VectorStore {
    /// Build the Qdrant client from config. `QDRANT_API_KEY` is picked up
    /// from the environment when set.
    pub fn connect(config: &QdrantConfig, dims: usize) -> Result<Self> {
        let client = Qdrant::from_url(&config.url)
            .api_key(std::env::var("QDRANT_API_KEY"))
            .build()?;

        Ok(Self {
            client,
            alias: config.collection.clone(),
            dims: dims as u64,
        })
    }

    /// The physical collection the alias currently points at, or `None`
    /// when nothing has been published yet.
    pub async fn generation(&self) -> Result<Option<String>> {
        let aliases = self.client.list_aliases().await?;
        Ok(aliases
            .aliases
            .into_iter()
            .find(|a| a.alias_name == self.alias)
            .map(|a| a.collection_name))
    }

    /// Number of points in the current generation.
    pub async fn point_count(&self) -> Result<u64> {
        let info = self.client.collection_info(self.alias.as_str()).await?;
        Ok(info.result.and_then(|r| r.points_count).unwrap_or(0))
    }

    /// Publish a new index generation: create a versioned collection,
    /// upsert every chunk, atomically swap the alias, prune the rest.
    /// Returns the new physical collection name.
    pub async fn publish(&self, chunks: &[Chunk], vectors: Vec<Vec<f32>>) -> Result<String> {
        if chunks.len() != vectors.len() {
            bail!(
                "chunk/vector count mismatch: {} chunks, {} vectors",
                chunks.len(),
                vectors.len()
            );
        }

        let collection = generation_name(&self.alias);

        self.client
            .create_collection(
                CreateCollectionBuilder::new(collection.as_str())
                    .vectors_config(VectorParamsBuilder::new(self.dims, Distance::Cosine)),
            )
            .await?;

        let points: Vec<PointStruct> = chunks
            .iter()
            .zip(vectors)
            .map(|(chunk, vector)| {
                let payload: Payload = serde_json::json!({
                    "text": chunk.text,
                    "chunk_index": chunk.index as i64,
                })
                .try_into()?;
                Ok(PointStruct::new(
                    Uuid::new_v4().to_string(),
                    vector,
                    payload,
                ))
            })
            .collect::<Result<_>>()?;

        if !points.is_empty() {
            self.client
                .upsert_points(UpsertPointsBuilder::new(collection.as_str(), points))
                .await?;
        }

        let had_alias = self.generation().await?.is_some();
        self.swap_alias(&collection, had_alias).await?;

        tracing::info!(collection = %collection, "published new index generation");

        self.prune_superseded(&collection).await;

        Ok(collection)
    }

    /// Top-k nearest chunks by cosine similarity, in similarity order.
    pub async fn search(&self, vector: Vec<f32>, limit: u64) -> Result<Vec<ScoredChunk>> {
        let response = self
            .client
            .search_points(
                SearchPointsBuilder::new(self.alias.as_str(), vector, limit).with_payload(true),
            )
            .await?;

        Ok(response
            .result
            .into_iter()
            .map(|point| ScoredChunk {
                text: payload_str(&point, "text").unwrap_or_default(),
                chunk_index: payload_int(&point, "chunk_index").unwrap_or(-1),
                score: point.score,
            })
            .collect())
    }

    /// Re-point the alias at `target` in one aliases update. The delete and
    /// create land in the same request, so readers never see a missing alias.
    async fn swap_alias(&self, target: &str, had_alias: bool) -> Result<()> {
        let mut actions: Vec<AliasOperations> = Vec::new();

        if had_alias {
            actions.push(AliasOperations {
                action: Some(Action::DeleteAlias(DeleteAlias {
                    alias_name: self.alias.clone(),
                })),
            });
        }

        actions.push(AliasOperations {
            action: Some(Action::CreateAlias(CreateAlias {
                collection_name: target.to_string(),
                alias_name: self.alias.clone(),
            })),
        });

        self.client
            .update_collection_aliases(ChangeAliases {
                actions,
                timeout: None,
            })
            .await?;

        Ok(())
    }

    /// Delete every versioned collection except `keep`. Failures are
    /// non-fatal: a stray generation costs storage, not correctness, and
    /// the next publish will try again.
    async fn prune_superseded(&self, keep: &str) {
        let prefix = format!("{}-", self.alias);

        let collections = match self.client.list_collections().await {
            Ok(response) => response.collections,
            Err(e) => {
                tracing::warn!(error = %e, "failed to list collections for pruning");
                return;
            }
        };

        for description in collections {
            let name = description.name;
            if name != keep && name.starts_with(&prefix) {
                if let Err(e) = self.client.delete_collection(name.as_str()).await {
                    tracing::warn!(collection = %name, error = %e, "failed to prune old generation");
                }
            }
        }
    }
}

/// Physical collection name for a new index generation.
fn generation_name(alias: &str) -> String {
    let version = Uuid::new_v4().simple().to_string();
    format!("{}-{}", alias, &version[..8])
}

fn payload_str(point: &ScoredPoint, key: &str) -> Option<String> {
    match point.payload.get(key).and_then(|v| v.kind.as_ref()) {
        Some(Kind::StringValue(s)) => Some(s.clone()),
        _ => None,
    }
}

fn payload_int(point: &ScoredPoint, key: &str) -> Option<i64> {
    match point.payload.get(key).and_then(|v| v.kind.as_ref()) {
        Some(Kind::IntegerValue(i)) => Some(*i),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qdrant_client::qdrant::Value;
    use std::collections::HashMap;

    #[test]
    fn generation_names_are_prefixed_and_unique() {
        let a = generation_name("documents");
        let b = generation_name("documents");
        assert!(a.starts_with("documents-"));
        assert_eq!(a.len(), "documents-".len() + 8);
        assert_ne!(a, b);
    }

    #[test]
    fn payload_helpers_read_typed_values() {
        let mut payload = HashMap::new();
        payload.insert(
            "text".to_string(),
            Value {
                kind: Some(Kind::StringValue("a chunk".to_string())),
            },
        );
        payload.insert(
            "chunk_index".to_string(),
            Value {
                kind: Some(Kind::IntegerValue(3)),
            },
        );
        let point = ScoredPoint {
            payload,
            ..Default::default()
        };

        assert_eq!(payload_str(&point, "text").as_deref(), Some("a chunk"));
        assert_eq!(payload_int(&point, "chunk_index"), Some(3));
        assert_eq!(payload_str(&point, "missing"), None);
        assert_eq!(payload_int(&point, "text"), None);
    }
}
