//! Page handlers: list, view, edit, save, delete

use crate::error::ApiError;
use crate::render::escape_html;
use crate::AppState;
use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;
use tracing::debug;
use wiki_core::Page;

fn page_path(action: &str, title: &str) -> String {
    format!("/{}/{}", action, urlencoding::encode(title))
}

pub async fn list(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    let titles = state.pages.list_all().await?;

    let mut html = String::from(
        r#"<form action="/edit/new" method="get">
<input type="submit" value="Create note"/>
</form>
<ul>"#,
    );
    for title in &titles {
        html.push_str(&format!(
            r#"<li>{} - <a href="{}">View</a> | <a href="{}">Delete</a></li>"#,
            escape_html(title),
            page_path("view", title),
            page_path("delete", title),
        ));
    }
    html.push_str("</ul>");

    Ok(Html(html))
}

pub async fn view(
    State(state): State<AppState>,
    Path(title): Path<String>,
) -> Result<Response, ApiError> {
    match state.pages.load(&title).await {
        Ok(page) => {
            let html = state.templates.render("view", &page).await?;
            Ok(Html(html).into_response())
        }
        Err(e) if e.is_storage() => Err(e.into()),
        Err(e) => {
            debug!("Cannot view {}: {}, redirecting to editor", title, e);
            Ok(Redirect::to(&page_path("edit", &title)).into_response())
        }
    }
}

pub async fn edit(
    State(state): State<AppState>,
    Path(title): Path<String>,
) -> Result<Html<String>, ApiError> {
    let page = match state.pages.load(&title).await {
        Ok(page) => page,
        Err(e) if e.is_storage() => return Err(e.into()),
        Err(_) => Page::empty(title),
    };

    let html = state.templates.render("edit", &page).await?;
    Ok(Html(html))
}

#[derive(Debug, Deserialize)]
pub struct SaveForm {
    #[serde(default)]
    name: String,
    #[serde(default)]
    body: String,
}

pub async fn save(
    State(state): State<AppState>,
    Path(title): Path<String>,
    Form(form): Form<SaveForm>,
) -> Result<Redirect, ApiError> {
    state.pages.save(&title, &form.name, form.body).await?;
    Ok(Redirect::to(&page_path("view", &form.name)))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(title): Path<String>,
) -> Result<Redirect, ApiError> {
    state.pages.remove(&title).await?;
    Ok(Redirect::to("/"))
}
