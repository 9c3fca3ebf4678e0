//! The HTML document served at `/`.

use axum::{body::Bytes, extract::State, response::Html};
use std::path::Path;

const BUNDLED_INDEX: &str = include_str!("../../views/index.html");

/// Index document, read once at startup.
#[derive(Debug, Clone)]
pub struct IndexPage {
    html: Bytes,
}

impl IndexPage {
    /// The page shipped with the binary.
    pub fn bundled() -> Self {
        Self {
            html: Bytes::from_static(BUNDLED_INDEX.as_bytes()),
        }
    }

    /// Read the page from `path`, or fall back to the bundled one.
    pub fn load(path: Option<&Path>) -> std::io::Result<Self> {
        match path {
            Some(path) => Ok(Self {
                html: Bytes::from(std::fs::read(path)?),
            }),
            None => Ok(Self::bundled()),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.html
    }
}

pub async fn index_handler(State(page): State<IndexPage>) -> Html<Bytes> {
    Html(page.html)
}
