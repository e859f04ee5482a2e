//! Page shells. Their scripts talk to the JSON API and keep the token client-side.

use axum::response::Html;

const CATALOG_PAGE: &str = include_str!("../templates/catalog.html");
const SEARCH_PAGE: &str = include_str!("../templates/search.html");
const TOKEN_PAGE: &str = include_str!("../templates/token.html");

pub async fn catalog() -> Html<&'static str> {
	Html(CATALOG_PAGE)
}

pub async fn search() -> Html<&'static str> {
	Html(SEARCH_PAGE)
}

pub async fn token() -> Html<&'static str> {
	Html(TOKEN_PAGE)
}
