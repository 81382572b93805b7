//! HTML template rendering
//!
//! Templates live in `<dir>/<view>.html` and are read on every render.
//! Supported placeholders are `{{title}}`, `{{title_url}}` and `{{body}}`.

use std::path::PathBuf;
use thiserror::Error;
use wiki_core::Page;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Template {view}.html could not be read: {source}")]
    Missing {
        view: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Template {view}.html is malformed: {reason}")]
    Malformed { view: String, reason: String },
}

pub struct Templates {
    dir: PathBuf,
}

impl Templates {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub async fn render(&self, view: &str, page: &Page) -> Result<String, RenderError> {
        let path = self.dir.join(format!("{view}.html"));
        let source = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| RenderError::Missing {
                view: view.to_string(),
                source,
            })?;

        fill(view, &source, page)
    }
}

fn fill(view: &str, source: &str, page: &Page) -> Result<String, RenderError> {
    let malformed = |reason: String| RenderError::Malformed {
        view: view.to_string(),
        reason,
    };

    let mut out = String::with_capacity(source.len() + page.body.len());
    let mut rest = source;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let end = after
            .find("}}")
            .ok_or_else(|| malformed("unterminated placeholder".to_string()))?;

        match after[..end].trim() {
            "title" => out.push_str(&escape_html(&page.title)),
            "title_url" => out.push_str(&urlencoding::encode(&page.title)),
            "body" => out.push_str(&escape_html(&page.body_text())),
            other => return Err(malformed(format!("unknown placeholder '{}'", other))),
        }
        rest = &after[end + 2..];
    }
    out.push_str(rest);

    Ok(out)
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}
