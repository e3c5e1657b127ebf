use std::collections::HashSet;
use std::sync::Arc;

use tracing::info;

use crate::models::{Article, ArticleInput};
use crate::services::CatalogService;

/// What happened to one import row.
#[derive(Debug, Clone)]
pub enum RowOutcome {
    Created(Article),
    /// The row never reached the server (missing code or description).
    Invalid(String),
    /// The code already exists in the loaded catalog.
    SkippedDuplicate,
    /// The server refused the row (conflict or storage error).
    Rejected(String),
}

#[derive(Debug, Default)]
pub struct ImportReport {
    pub outcomes: Vec<RowOutcome>,
    pub created: usize,
    pub invalid: usize,
    pub skipped_duplicate: usize,
    pub rejected: usize,
}

impl ImportReport {
    fn record(&mut self, outcome: RowOutcome) {
        match &outcome {
            RowOutcome::Created(_) => self.created += 1,
            RowOutcome::Invalid(_) => self.invalid += 1,
            RowOutcome::SkippedDuplicate => self.skipped_duplicate += 1,
            RowOutcome::Rejected(_) => self.rejected += 1,
        }
        self.outcomes.push(outcome);
    }
}

/// Pushes parsed rows into the catalog one at a time, in input order. A bad
/// row never aborts the batch; every row gets an outcome.
pub struct BatchImporter {
    catalog: Arc<dyn CatalogService>,
}

impl BatchImporter {
    #[must_use]
    pub fn new(catalog: Arc<dyn CatalogService>) -> Self {
        Self { catalog }
    }

    /// `known_codes` is the code column of the catalog as currently loaded;
    /// collisions with it are skipped without a server call. Collisions
    /// created inside the batch itself surface as `Rejected` conflicts.
    ///
    /// The importer never touches the projection. After a run the caller
    /// must refresh its [`CatalogView`](crate::console::CatalogView) via
    /// `reload` for the created rows to become visible.
    pub async fn run(&self, rows: Vec<ArticleInput>, known_codes: &[String]) -> ImportReport {
        let known: HashSet<String> = known_codes.iter().map(|c| c.to_lowercase()).collect();
        let mut report = ImportReport::default();

        for row in rows {
            let row = row.normalized();

            if row.code.is_empty() || row.description.is_empty() {
                report.record(RowOutcome::Invalid(
                    "Code et description sont requis".to_string(),
                ));
                continue;
            }

            if known.contains(&row.code.to_lowercase()) {
                report.record(RowOutcome::SkippedDuplicate);
                continue;
            }

            match self.catalog.create(row).await {
                Ok(article) => report.record(RowOutcome::Created(article)),
                Err(e) => report.record(RowOutcome::Rejected(e.to_string())),
            }
        }

        info!(
            "Import finished: {} created, {} invalid, {} skipped, {} rejected",
            report.created, report.invalid, report.skipped_duplicate, report.rejected
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    use crate::services::CatalogError;

    /// Minimal in-memory catalog that enforces the case-insensitive code
    /// uniqueness rule.
    #[derive(Default)]
    struct FakeCatalog {
        created: Mutex<Vec<Article>>,
    }

    #[async_trait]
    impl CatalogService for FakeCatalog {
        async fn list(&self) -> Result<Vec<Article>, CatalogError> {
            Ok(self.created.lock().unwrap().clone())
        }

        async fn search(&self, _term: &str) -> Result<Vec<Article>, CatalogError> {
            Ok(Vec::new())
        }

        async fn create(&self, input: ArticleInput) -> Result<Article, CatalogError> {
            let mut created = self.created.lock().unwrap();
            if created
                .iter()
                .any(|a| a.code.eq_ignore_ascii_case(&input.code))
            {
                return Err(CatalogError::Conflict(input.code));
            }
            let article = Article {
                id: i32::try_from(created.len()).unwrap() + 1,
                code: input.code,
                description: input.description,
                demar: input.demar,
                prix_vente: input.prix_vente,
                achat_minimum: input.achat_minimum,
                unite: input.unite,
                article_type: input.article_type,
            };
            created.push(article.clone());
            Ok(article)
        }

        async fn update(&self, id: i32, _input: ArticleInput) -> Result<Article, CatalogError> {
            Err(CatalogError::NotFound(id))
        }

        async fn delete(&self, id: i32) -> Result<(), CatalogError> {
            Err(CatalogError::NotFound(id))
        }
    }

    fn row(code: &str, description: &str) -> ArticleInput {
        ArticleInput {
            code: code.to_string(),
            description: description.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_mixed_batch_yields_created_invalid_rejected() {
        let catalog = Arc::new(FakeCatalog::default());
        let importer = BatchImporter::new(catalog.clone());

        let rows = vec![row("A1", "first"), row("A2", ""), row("a1", "collides")];
        let report = importer.run(rows, &[]).await;

        assert_eq!(report.created, 1);
        assert_eq!(report.invalid, 1);
        assert_eq!(report.rejected, 1);
        assert_eq!(report.skipped_duplicate, 0);
        assert!(matches!(report.outcomes[0], RowOutcome::Created(_)));
        assert!(matches!(report.outcomes[1], RowOutcome::Invalid(_)));
        assert!(matches!(report.outcomes[2], RowOutcome::Rejected(_)));

        // Exactly one row was persisted.
        assert_eq!(catalog.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_known_codes_are_skipped_without_a_server_call() {
        let catalog = Arc::new(FakeCatalog::default());
        let importer = BatchImporter::new(catalog.clone());

        let report = importer
            .run(vec![row("W0110", "already loaded")], &["w0110".to_string()])
            .await;

        assert_eq!(report.skipped_duplicate, 1);
        assert!(catalog.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_code_is_invalid_and_siblings_continue() {
        let catalog = Arc::new(FakeCatalog::default());
        let importer = BatchImporter::new(catalog.clone());

        let report = importer
            .run(vec![row("  ", "no code"), row("B1", "fine")], &[])
            .await;

        assert_eq!(report.invalid, 1);
        assert_eq!(report.created, 1);
    }

    #[tokio::test]
    async fn test_blank_amounts_default_to_zero() {
        let catalog = Arc::new(FakeCatalog::default());
        let importer = BatchImporter::new(catalog.clone());

        let report = importer.run(vec![row("C1", "cheap")], &[]).await;

        let RowOutcome::Created(article) = &report.outcomes[0] else {
            panic!("expected Created");
        };
        assert!(article.prix_vente.abs() < f64::EPSILON);
        assert!(article.achat_minimum.abs() < f64::EPSILON);
    }
}
