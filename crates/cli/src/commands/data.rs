//! Seed and reset the marketplace collections.
//!
//! Both commands write through the storefront's local repository, so the
//! files they produce are exactly what the running storefront reads.

use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tracing::info;

use blife_core::fixtures::Dataset;
use blife_storefront::repository::{LocalRepository, RepositoryError};
use blife_storefront::storage::{FileKv, StorageError};

/// Errors that can occur while seeding or resetting.
#[derive(Debug, Error)]
pub enum DataError {
    /// The data directory could not be opened.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// A collection could not be written or removed.
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// The fixture file could not be read.
    #[error("Could not read {path}: {source}")]
    ReadFixture {
        path: String,
        source: std::io::Error,
    },

    /// The fixture file is not a valid dataset.
    #[error("Invalid fixture {path}: {source}")]
    ParseFixture {
        path: String,
        source: serde_yaml::Error,
    },
}

fn open(dir: &Path) -> Result<LocalRepository, DataError> {
    let kv = FileKv::open(dir)?;
    Ok(LocalRepository::new(Arc::new(kv)))
}

/// Load a dataset from a YAML fixture. Collections the file leaves out are
/// written empty.
///
/// # Errors
///
/// Returns `DataError` if the file cannot be read or parsed.
pub async fn load_fixture(path: &Path) -> Result<Dataset, DataError> {
    let display = path.display().to_string();
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| DataError::ReadFixture {
            path: display.clone(),
            source,
        })?;
    serde_yaml::from_str(&content).map_err(|source| DataError::ParseFixture {
        path: display,
        source,
    })
}

/// Write the default dataset, or `fixture`, into `dir`, replacing what is
/// there.
///
/// # Errors
///
/// Returns `DataError` if the fixture is unusable or a write fails.
pub async fn seed(dir: &Path, fixture: Option<&Path>) -> Result<Dataset, DataError> {
    let dataset = match fixture {
        Some(path) => {
            info!(path = %path.display(), "Loading fixture");
            load_fixture(path).await?
        }
        None => Dataset::defaults(Utc::now()),
    };

    let repository = open(dir)?;
    repository.import(&dataset).await?;

    info!(data_dir = %dir.display(), "Seeding complete!");
    info!("  Products: {}", dataset.products.len());
    info!("  Users: {}", dataset.users.len());
    info!("  Stores: {}", dataset.stores.len());
    info!("  Reviews: {}", dataset.reviews.len());
    info!("  Orders: {}", dataset.orders.len());
    info!("  Log entries: {}", dataset.logs.len());

    Ok(dataset)
}

/// Remove every collection in `dir`.
///
/// # Errors
///
/// Returns `DataError` if the directory cannot be opened or a key removed.
pub async fn reset(dir: &Path) -> Result<(), DataError> {
    open(dir)?.clear().await?;
    info!(data_dir = %dir.display(), "All collections removed");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_seed_defaults_then_reset() {
        let dir = tempfile::tempdir().unwrap();

        let dataset = seed(dir.path(), None).await.unwrap();
        assert_eq!(dataset.products.len(), 6);

        let repository = open(dir.path()).unwrap();
        assert_eq!(repository.products().await.len(), 6);

        reset(dir.path()).await.unwrap();
        assert!(!dir.path().join("blife_products.json").exists());
    }

    #[tokio::test]
    async fn test_seed_from_partial_fixture() {
        let dir = tempfile::tempdir().unwrap();
        let fixture = dir.path().join("fixture.yaml");
        std::fs::write(
            &fixture,
            "products:\n  - id: 42\n    storeId: STORE-MOCK-123\n    name: Matcha\n    name_th: มัทฉะ\n    price: 420\n    imageUrl: https://example.com/matcha.jpg\n    description: Stone-ground\n",
        )
        .unwrap();

        let data = dir.path().join("data");
        let dataset = seed(&data, Some(&fixture)).await.unwrap();
        assert_eq!(dataset.products.len(), 1);
        assert!(dataset.users.is_empty());

        let repository = open(&data).unwrap();
        let products = repository.products().await;
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].name, "Matcha");
    }

    #[tokio::test]
    async fn test_seed_rejects_bad_fixture() {
        let dir = tempfile::tempdir().unwrap();
        let fixture = dir.path().join("broken.yaml");
        std::fs::write(&fixture, "products: 7\n").unwrap();

        let err = seed(dir.path(), Some(&fixture)).await.unwrap_err();
        assert!(matches!(err, DataError::ParseFixture { .. }));
    }
}
