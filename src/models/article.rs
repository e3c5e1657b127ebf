use serde::{Deserialize, Serialize};

use crate::entities::articles;

/// A priced catalog article as exposed over the API and held by the console
/// projection. `valeur` is derived on demand and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: i32,
    pub code: String,
    pub description: String,
    pub demar: Option<String>,
    pub prix_vente: f64,
    pub achat_minimum: f64,
    pub unite: Option<String>,
    #[serde(rename = "type")]
    pub article_type: Option<String>,
}

impl Article {
    /// Stock value of the article: unit price times minimum purchase.
    #[must_use]
    pub fn valeur(&self) -> f64 {
        self.prix_vente * self.achat_minimum
    }
}

impl From<articles::Model> for Article {
    fn from(model: articles::Model) -> Self {
        Self {
            id: model.id,
            code: model.code,
            description: model.description,
            demar: model.demar,
            prix_vente: model.prix_vente,
            achat_minimum: model.achat_minimum,
            unite: model.unite,
            article_type: model.article_type,
        }
    }
}

/// Fields accepted when creating or updating an article. Price and minimum
/// default to 0 when absent, matching the form behavior of the console.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArticleInput {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub demar: Option<String>,
    #[serde(default)]
    pub prix_vente: f64,
    #[serde(default)]
    pub achat_minimum: f64,
    #[serde(default)]
    pub unite: Option<String>,
    #[serde(default, rename = "type")]
    pub article_type: Option<String>,
}

impl ArticleInput {
    /// Trims text fields and drops empty optional tags.
    #[must_use]
    pub fn normalized(self) -> Self {
        let clean = |s: Option<String>| {
            s.map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        Self {
            code: self.code.trim().to_string(),
            description: self.description.trim().to_string(),
            demar: clean(self.demar),
            prix_vente: self.prix_vente,
            achat_minimum: self.achat_minimum,
            unite: clean(self.unite),
            article_type: clean(self.article_type),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valeur_is_price_times_minimum() {
        let article = Article {
            id: 1,
            code: "W0110".to_string(),
            description: "Widget".to_string(),
            demar: None,
            prix_vente: 2.5,
            achat_minimum: 4.0,
            unite: None,
            article_type: None,
        };
        assert!((article.valeur() - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_normalized_drops_empty_tags() {
        let input = ArticleInput {
            code: "  A1 ".to_string(),
            description: " desc ".to_string(),
            demar: Some("  ".to_string()),
            unite: Some(" kg ".to_string()),
            ..Default::default()
        };
        let input = input.normalized();
        assert_eq!(input.code, "A1");
        assert_eq!(input.description, "desc");
        assert_eq!(input.demar, None);
        assert_eq!(input.unite.as_deref(), Some("kg"));
    }

    #[test]
    fn test_type_field_renames_on_the_wire() {
        let json = r#"{"code":"A1","description":"d","type":"tools"}"#;
        let input: ArticleInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.article_type.as_deref(), Some("tools"));
        assert!((input.prix_vente - 0.0).abs() < f64::EPSILON);
    }
}
