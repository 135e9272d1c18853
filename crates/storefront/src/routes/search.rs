//! Search route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use serde::Deserialize;
use tokoku_core::search::suggestions;
use tracing::instrument;

use crate::error::Result;
use crate::state::AppState;

/// Suggestions shown under the search box.
const SUGGESTION_LIMIT: usize = 5;

/// Search suggestions query parameters.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SuggestQuery {
    pub q: String,
}

/// A suggestion and the listing it links to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub text: String,
    pub href: String,
}

impl Suggestion {
    fn new(text: String) -> Self {
        let href = format!(
            "/products?{}",
            url::form_urlencoded::Serializer::new(String::new())
                .append_pair("q", &text)
                .finish()
        );
        Self { text, href }
    }
}

/// Search suggestions fragment (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/suggestions.html")]
pub struct SuggestionsTemplate {
    pub suggestions: Vec<Suggestion>,
}

/// Titles and categories matching a partial query.
#[instrument(skip(state))]
pub async fn suggest(
    State(state): State<AppState>,
    Query(query): Query<SuggestQuery>,
) -> Result<SuggestionsTemplate> {
    let catalog = state.catalog().await?;
    let suggestions = suggestions(catalog.all(), &query.q, SUGGESTION_LIMIT)
        .into_iter()
        .map(Suggestion::new)
        .collect();
    Ok(SuggestionsTemplate { suggestions })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suggestion_links_to_listing() {
        let suggestion = Suggestion::new("men's clothing".to_string());
        assert_eq!(suggestion.href, "/products?q=men%27s+clothing");
    }
}
