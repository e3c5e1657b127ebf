use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::models::Article;
use crate::services::{CatalogError, CatalogService};

/// Column a sort can be anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Code,
    Description,
    Demar,
    PrixVente,
    AchatMinimum,
    Unite,
    Type,
    Valeur,
}

impl SortKey {
    const fn is_numeric(self) -> bool {
        matches!(self, Self::PrixVente | Self::AchatMinimum | Self::Valeur)
    }
}

/// Optional predicates combined with AND. All matching is case-insensitive;
/// `search` is a substring match over code, description, type and demar.
#[derive(Debug, Clone, Default)]
pub struct FilterCriteria {
    pub search: Option<String>,
    pub article_type: Option<String>,
    pub demar: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CatalogStats {
    pub count: usize,
    pub avg_prix_vente: f64,
    pub total_valeur: f64,
    pub avg_valeur: f64,
}

/// Distinct tag values present in the loaded catalog, for filter dropdowns
/// and form autocompletion.
#[derive(Debug, Clone, Default)]
pub struct FilterOptions {
    pub types: Vec<String>,
    pub demars: Vec<String>,
    pub unites: Vec<String>,
}

/// The loaded catalog projection. `reload` is the only entry point that does
/// I/O; everything else is a pure transform over the held list.
pub struct CatalogView {
    catalog: Arc<dyn CatalogService>,
    articles: Vec<Article>,
    sort: Option<(SortKey, bool)>,
}

impl CatalogView {
    #[must_use]
    pub fn new(catalog: Arc<dyn CatalogService>) -> Self {
        Self {
            catalog,
            articles: Vec::new(),
            sort: None,
        }
    }

    /// Replaces the projection with the current server state.
    pub async fn reload(&mut self) -> Result<(), CatalogError> {
        self.articles = self.catalog.list().await?;
        Ok(())
    }

    #[must_use]
    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    /// Anchors the sort to `key`, ascending. Selecting the same key again
    /// flips the direction.
    pub fn select_sort(&mut self, key: SortKey) {
        self.sort = match self.sort {
            Some((current, descending)) if current == key => Some((key, !descending)),
            _ => Some((key, false)),
        };
    }

    pub fn clear_sort(&mut self) {
        self.sort = None;
    }

    /// Runs the filter/sort pipeline and returns the display list. Without a
    /// sort key the input order is preserved.
    #[must_use]
    pub fn apply(&self, criteria: &FilterCriteria) -> Vec<Article> {
        let mut display: Vec<Article> = self
            .articles
            .iter()
            .filter(|a| Self::matches(a, criteria))
            .cloned()
            .collect();

        if let Some((key, descending)) = self.sort {
            // sort_by is stable, ties keep their input order.
            display.sort_by(|a, b| {
                let ord = compare_by(a, b, key);
                if descending { ord.reverse() } else { ord }
            });
        }

        display
    }

    /// Aggregates over a display list. An empty list yields all zeroes
    /// rather than NaN averages.
    #[must_use]
    pub fn stats(display: &[Article]) -> CatalogStats {
        if display.is_empty() {
            return CatalogStats {
                count: 0,
                avg_prix_vente: 0.0,
                total_valeur: 0.0,
                avg_valeur: 0.0,
            };
        }

        let count = display.len();
        let total_prix: f64 = display.iter().map(|a| a.prix_vente).sum();
        let total_valeur: f64 = display.iter().map(Article::valeur).sum();

        #[allow(clippy::cast_precision_loss)]
        let n = count as f64;
        CatalogStats {
            count,
            avg_prix_vente: total_prix / n,
            total_valeur,
            avg_valeur: total_valeur / n,
        }
    }

    /// Sorted distinct `type`, `demar` and `unite` values over the full
    /// projection, ignoring the active filters.
    #[must_use]
    pub fn filter_options(&self) -> FilterOptions {
        let collect = |get: fn(&Article) -> Option<&String>| {
            self.articles
                .iter()
                .filter_map(get)
                .cloned()
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect::<Vec<_>>()
        };

        FilterOptions {
            types: collect(|a| a.article_type.as_ref()),
            demars: collect(|a| a.demar.as_ref()),
            unites: collect(|a| a.unite.as_ref()),
        }
    }

    fn matches(article: &Article, criteria: &FilterCriteria) -> bool {
        // An empty criterion means "no filter", like a cleared form field.
        fn active(s: Option<&str>) -> Option<&str> {
            s.filter(|v| !v.is_empty())
        }
        let eq_ci = |field: Option<&str>, wanted: &str| {
            field.is_some_and(|v| v.eq_ignore_ascii_case(wanted))
        };

        if let Some(wanted) = active(criteria.article_type.as_deref()) {
            if !eq_ci(article.article_type.as_deref(), wanted) {
                return false;
            }
        }
        if let Some(wanted) = active(criteria.demar.as_deref()) {
            if !eq_ci(article.demar.as_deref(), wanted) {
                return false;
            }
        }
        if let Some(term) = active(criteria.search.as_deref()) {
            let term = term.to_lowercase();
            let haystacks = [
                Some(article.code.as_str()),
                Some(article.description.as_str()),
                article.article_type.as_deref(),
                article.demar.as_deref(),
            ];
            if !haystacks
                .iter()
                .flatten()
                .any(|h| h.to_lowercase().contains(&term))
            {
                return false;
            }
        }
        true
    }
}

fn compare_by(a: &Article, b: &Article, key: SortKey) -> Ordering {
    if key.is_numeric() {
        let value = |article: &Article| match key {
            SortKey::PrixVente => article.prix_vente,
            SortKey::AchatMinimum => article.achat_minimum,
            _ => article.valeur(),
        };
        return value(a).total_cmp(&value(b));
    }

    fn text(article: &Article, key: SortKey) -> &str {
        match key {
            SortKey::Code => &article.code,
            SortKey::Description => &article.description,
            SortKey::Demar => article.demar.as_deref().unwrap_or(""),
            SortKey::Unite => article.unite.as_deref().unwrap_or(""),
            _ => article.article_type.as_deref().unwrap_or(""),
        }
    }
    natural_cmp(text(a, key), text(b, key))
}

/// Case-insensitive comparison where digit runs compare as numbers, so
/// "item2" sorts before "item10".
fn natural_cmp(a: &str, b: &str) -> Ordering {
    let a: Vec<char> = a.to_lowercase().chars().collect();
    let b: Vec<char> = b.to_lowercase().chars().collect();
    let (mut i, mut j) = (0, 0);

    while i < a.len() && j < b.len() {
        if a[i].is_ascii_digit() && b[j].is_ascii_digit() {
            let run = |s: &[char], mut k: usize| {
                let start = k;
                while k < s.len() && s[k].is_ascii_digit() {
                    k += 1;
                }
                (start, k)
            };
            let (sa, ea) = run(&a, i);
            let (sb, eb) = run(&b, j);

            let strip = |s: &[char]| -> Vec<char> {
                let trimmed: Vec<char> =
                    s.iter().skip_while(|c| **c == '0').copied().collect();
                if trimmed.is_empty() { vec!['0'] } else { trimmed }
            };
            let na = strip(&a[sa..ea]);
            let nb = strip(&b[sb..eb]);

            let ord = na.len().cmp(&nb.len()).then_with(|| na.cmp(&nb));
            if ord != Ordering::Equal {
                return ord;
            }
            i = ea;
            j = eb;
        } else {
            let ord = a[i].cmp(&b[j]);
            if ord != Ordering::Equal {
                return ord;
            }
            i += 1;
            j += 1;
        }
    }

    (a.len() - i).cmp(&(b.len() - j))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use crate::models::ArticleInput;

    struct FakeCatalog {
        articles: Vec<Article>,
    }

    #[async_trait]
    impl CatalogService for FakeCatalog {
        async fn list(&self) -> Result<Vec<Article>, CatalogError> {
            Ok(self.articles.clone())
        }

        async fn search(&self, _term: &str) -> Result<Vec<Article>, CatalogError> {
            Ok(Vec::new())
        }

        async fn create(&self, _input: ArticleInput) -> Result<Article, CatalogError> {
            Err(CatalogError::Database("not supported".to_string()))
        }

        async fn update(&self, id: i32, _input: ArticleInput) -> Result<Article, CatalogError> {
            Err(CatalogError::NotFound(id))
        }

        async fn delete(&self, id: i32) -> Result<(), CatalogError> {
            Err(CatalogError::NotFound(id))
        }
    }

    fn article(id: i32, code: &str, prix: f64, minimum: f64) -> Article {
        Article {
            id,
            code: code.to_string(),
            description: format!("Article {code}"),
            demar: None,
            prix_vente: prix,
            achat_minimum: minimum,
            unite: None,
            article_type: None,
        }
    }

    async fn view_with(articles: Vec<Article>) -> CatalogView {
        let mut view = CatalogView::new(Arc::new(FakeCatalog { articles }));
        view.reload().await.unwrap();
        view
    }

    #[tokio::test]
    async fn test_no_criteria_passes_everything_through_in_order() {
        let view = view_with(vec![
            article(1, "B2", 1.0, 1.0),
            article(2, "A1", 1.0, 1.0),
        ])
        .await;

        let display = view.apply(&FilterCriteria::default());
        let codes: Vec<&str> = display.iter().map(|a| a.code.as_str()).collect();
        assert_eq!(codes, ["B2", "A1"]);

        // Cleared form fields behave like no criteria at all.
        let cleared = FilterCriteria {
            search: Some(String::new()),
            article_type: Some(String::new()),
            demar: Some(String::new()),
        };
        assert_eq!(view.apply(&cleared).len(), 2);
    }

    #[tokio::test]
    async fn test_type_and_search_filters_are_anded() {
        let mut tagged = article(1, "A1", 1.0, 1.0);
        tagged.article_type = Some("Tools".to_string());
        let mut other = article(2, "A2", 1.0, 1.0);
        other.article_type = Some("Paint".to_string());
        let view = view_with(vec![tagged, other]).await;

        let criteria = FilterCriteria {
            search: Some("a".to_string()),
            article_type: Some("tools".to_string()),
            demar: None,
        };
        let display = view.apply(&criteria);
        assert_eq!(display.len(), 1);
        assert_eq!(display[0].code, "A1");
    }

    #[tokio::test]
    async fn test_numeric_sort_is_by_value_not_lexicographic() {
        let mut view = view_with(vec![
            article(1, "A", 10.0, 1.0),
            article(2, "B", 2.0, 1.0),
            article(3, "C", 9.0, 1.0),
        ])
        .await;

        view.select_sort(SortKey::PrixVente);
        let codes: Vec<String> = view
            .apply(&FilterCriteria::default())
            .into_iter()
            .map(|a| a.code)
            .collect();
        assert_eq!(codes, ["B", "C", "A"]);
    }

    #[tokio::test]
    async fn test_reselecting_key_toggles_direction() {
        let mut view = view_with(vec![
            article(1, "A", 1.0, 1.0),
            article(2, "B", 2.0, 1.0),
        ])
        .await;

        view.select_sort(SortKey::PrixVente);
        view.select_sort(SortKey::PrixVente);
        let display = view.apply(&FilterCriteria::default());
        assert_eq!(display[0].code, "B");

        // A new key resets to ascending.
        view.select_sort(SortKey::Code);
        let display = view.apply(&FilterCriteria::default());
        assert_eq!(display[0].code, "A");
    }

    #[tokio::test]
    async fn test_sort_by_valeur_uses_derived_value() {
        let mut view = view_with(vec![
            article(1, "A", 5.0, 10.0),
            article(2, "B", 100.0, 0.1),
        ])
        .await;

        view.select_sort(SortKey::Valeur);
        let display = view.apply(&FilterCriteria::default());
        assert_eq!(display[0].code, "B");
    }

    #[tokio::test]
    async fn test_natural_ordering_on_text_keys() {
        let mut view = view_with(vec![
            article(1, "item10", 1.0, 1.0),
            article(2, "item2", 1.0, 1.0),
            article(3, "ITEM1", 1.0, 1.0),
        ])
        .await;

        view.select_sort(SortKey::Code);
        let codes: Vec<String> = view
            .apply(&FilterCriteria::default())
            .into_iter()
            .map(|a| a.code)
            .collect();
        assert_eq!(codes, ["ITEM1", "item2", "item10"]);
    }

    #[test]
    fn test_natural_cmp_details() {
        assert_eq!(natural_cmp("a2", "a10"), Ordering::Less);
        assert_eq!(natural_cmp("A2", "a2"), Ordering::Equal);
        assert_eq!(natural_cmp("a02", "a2"), Ordering::Equal);
        assert_eq!(natural_cmp("b", "a10"), Ordering::Greater);
        assert_eq!(natural_cmp("", "a"), Ordering::Less);
    }

    #[tokio::test]
    async fn test_stats_over_display_list() {
        let view = view_with(vec![
            article(1, "A", 2.0, 3.0),
            article(2, "B", 4.0, 1.0),
        ])
        .await;

        let stats = CatalogView::stats(view.articles());
        assert_eq!(stats.count, 2);
        assert!((stats.avg_prix_vente - 3.0).abs() < f64::EPSILON);
        assert!((stats.total_valeur - 10.0).abs() < f64::EPSILON);
        assert!((stats.avg_valeur - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_stats_of_empty_display_are_zero() {
        let stats = CatalogView::stats(&[]);
        assert_eq!(stats.count, 0);
        assert!(stats.avg_prix_vente.abs() < f64::EPSILON);
        assert!(stats.avg_valeur.abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_filter_options_are_sorted_and_distinct() {
        let mut a = article(1, "A", 1.0, 1.0);
        a.article_type = Some("Tools".to_string());
        a.unite = Some("kg".to_string());
        let mut b = article(2, "B", 1.0, 1.0);
        b.article_type = Some("Paint".to_string());
        b.unite = Some("kg".to_string());
        let view = view_with(vec![a, b]).await;

        let options = view.filter_options();
        assert_eq!(options.types, ["Paint", "Tools"]);
        assert_eq!(options.unites, ["kg"]);
        assert!(options.demars.is_empty());
    }
}
