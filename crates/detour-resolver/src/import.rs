use std::path::Path;

use detour_core::{RedirectRecord, RedirectStore, StorageError, WriteMode};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

/// What to do when an imported row's key already exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ImportPolicy {
    /// Replace the stored record.
    #[default]
    Overwrite,
    /// Keep the stored record and count the row as skipped.
    Skip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportOutcome {
    Created,
    Updated,
    Skipped,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub created: usize,
    pub updated: usize,
    pub skipped: usize,
}

impl ImportReport {
    fn count(&mut self, outcome: ImportOutcome) {
        match outcome {
            ImportOutcome::Created => self.created += 1,
            ImportOutcome::Updated => self.updated += 1,
            ImportOutcome::Skipped => self.skipped += 1,
        }
    }
}

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("line {line}: {message}")]
    Row { line: usize, message: String },
    #[error("line {line}: storage operation failed: {source}")]
    Storage {
        line: usize,
        #[source]
        source: StorageError,
    },
    #[error("failed to read import source: {0}")]
    Io(#[from] std::io::Error),
}

/// Bulk loader for redirects.
///
/// Input is JSON lines, one redirect per line:
///
/// ```text
/// {"from": "/about-us.html", "to": "/about"}
/// {"from": "/page?page=1&num=5", "to": "/about?something=5", "locale": "en_NZ", "site": 2}
/// ```
///
/// Blank lines are ignored. Rows are applied in order and the import stops
/// at the first malformed row; rows before it stay applied.
#[derive(Debug)]
pub struct Importer<'a, S> {
    store: &'a S,
    policy: ImportPolicy,
}

impl<'a, S: RedirectStore> Importer<'a, S> {
    pub fn new(store: &'a S, policy: ImportPolicy) -> Self {
        Self { store, policy }
    }

    /// Stores a single record according to the import policy.
    pub async fn import_record(
        &self,
        record: RedirectRecord,
    ) -> Result<ImportOutcome, StorageError> {
        let existing = self.store.find_exact(record.site(), record.from_path()).await?;

        match (existing, self.policy) {
            (Some(_), ImportPolicy::Skip) => Ok(ImportOutcome::Skipped),
            (Some(_), ImportPolicy::Overwrite) => {
                self.store.put(record, WriteMode::Overwrite).await?;
                Ok(ImportOutcome::Updated)
            }
            (None, policy) => match self.store.put(record.clone(), WriteMode::Create).await {
                Ok(()) => Ok(ImportOutcome::Created),
                // Another writer created the key between the lookup and the put.
                Err(StorageError::DuplicateKey(_)) if policy == ImportPolicy::Skip => {
                    Ok(ImportOutcome::Skipped)
                }
                Err(StorageError::DuplicateKey(_)) => {
                    self.store.put(record, WriteMode::Overwrite).await?;
                    Ok(ImportOutcome::Updated)
                }
                Err(err) => Err(err),
            },
        }
    }

    pub async fn import_str(&self, input: &str) -> Result<ImportReport, ImportError> {
        let mut report = ImportReport::default();

        for (index, row) in input.lines().enumerate() {
            let line = index + 1;
            if row.trim().is_empty() {
                continue;
            }

            let record: RedirectRecord =
                serde_json::from_str(row).map_err(|e| ImportError::Row {
                    line,
                    message: e.to_string(),
                })?;
            let key = record.key();

            let outcome = self
                .import_record(record)
                .await
                .map_err(|source| ImportError::Storage { line, source })?;
            debug!(line, key = %key, ?outcome, "imported redirect");
            report.count(outcome);
        }

        info!(
            created = report.created,
            updated = report.updated,
            skipped = report.skipped,
            "import finished"
        );
        Ok(report)
    }

    pub async fn import_file(&self, path: impl AsRef<Path>) -> Result<ImportReport, ImportError> {
        let input = tokio::fs::read_to_string(path.as_ref()).await?;
        self.import_str(&input).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use detour_core::{FromPath, ReadStore, SiteScope};
    use detour_storage::InMemoryRedirectStore;

    const ROWS: &str = r#"
{"from": "/about-us.html", "to": "/about"}
{"from": "page?page=1&num=5", "to": "/about?something=5", "locale": "en_NZ"}

{"from": "/promo/", "to": "/site-promo", "site": 2}
"#;

    async fn to_of(store: &InMemoryRedirectStore, site: SiteScope, from: &str) -> Option<String> {
        store
            .find_exact(site, &FromPath::parse(from).unwrap())
            .await
            .unwrap()
            .map(|r| r.to().to_string())
    }

    #[tokio::test]
    async fn imports_rows() {
        let store = InMemoryRedirectStore::new();
        let importer = Importer::new(&store, ImportPolicy::Overwrite);

        let report = importer.import_str(ROWS).await.unwrap();
        assert_eq!(
            report,
            ImportReport {
                created: 3,
                updated: 0,
                skipped: 0
            }
        );

        assert_eq!(
            to_of(&store, SiteScope::Global, "/page?page=1&num=5").await,
            Some("/about?something=5".to_string())
        );
        assert_eq!(
            to_of(&store, SiteScope::from_raw(2), "/promo").await,
            Some("/site-promo".to_string())
        );
        assert_eq!(to_of(&store, SiteScope::Global, "/promo").await, None);
    }

    #[tokio::test]
    async fn overwrite_policy_updates_existing() {
        let store = InMemoryRedirectStore::new();
        let importer = Importer::new(&store, ImportPolicy::Overwrite);
        importer.import_str(ROWS).await.unwrap();

        let report = importer
            .import_str(r#"{"from": "/about-us.html/", "to": "/company"}"#)
            .await
            .unwrap();
        assert_eq!(report.updated, 1);
        assert_eq!(store.len(), 3);
        assert_eq!(
            to_of(&store, SiteScope::Global, "/about-us.html").await,
            Some("/company".to_string())
        );
    }

    #[tokio::test]
    async fn skip_policy_keeps_existing() {
        let store = InMemoryRedirectStore::new();
        Importer::new(&store, ImportPolicy::Overwrite)
            .import_str(ROWS)
            .await
            .unwrap();

        let report = Importer::new(&store, ImportPolicy::Skip)
            .import_str(ROWS)
            .await
            .unwrap();
        assert_eq!(
            report,
            ImportReport {
                created: 0,
                updated: 0,
                skipped: 3
            }
        );
    }

    #[tokio::test]
    async fn malformed_row_reports_line() {
        let store = InMemoryRedirectStore::new();
        let importer = Importer::new(&store, ImportPolicy::Overwrite);

        let input = "{\"from\": \"/a\", \"to\": \"/b\"}\n\n{\"from\": \"\", \"to\": \"/c\"}\n";
        let err = importer.import_str(input).await.unwrap_err();
        assert!(matches!(err, ImportError::Row { line: 3, .. }));

        // Rows before the failure stay applied.
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn missing_file_is_io_error() {
        let store = InMemoryRedirectStore::new();
        let importer = Importer::new(&store, ImportPolicy::Overwrite);

        let err = importer
            .import_file("/nonexistent/detour/redirects.jsonl")
            .await
            .unwrap_err();
        assert!(matches!(err, ImportError::Io(_)));
    }
}
