//! Form page handler

use axum::response::Html;

use crate::views;

pub async fn index() -> Html<String> {
    Html(views::form_page())
}
