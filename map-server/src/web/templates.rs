//! Askama templates for the web frontend.

use askama::Template;

// ============================================================================
// Page Templates (extend base.html)
// ============================================================================

/// The map page with the sidebar.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate;

/// About page.
#[derive(Template)]
#[template(path = "about.html")]
pub struct AboutTemplate;

// ============================================================================
// Fragment Templates (AJAX responses, no base.html)
// ============================================================================

/// Search results fragment for the sidebar list.
#[derive(Template)]
#[template(path = "search_results.html")]
pub struct SearchResultsTemplate {
    pub count: usize,
    pub message: Option<String>,
    pub items: Vec<SearchItemView>,
}

/// One search result entry.
#[derive(Debug, Clone)]
pub struct SearchItemView {
    pub id: String,
    pub name: String,
}
