use crate::error::{CatalogError, Result};
use crate::services::encoding;
use crate::source::cab::CabClient;

use scraper::{Html, Selector};
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::info;

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct Department {
    pub code: String,
    pub name: String,
}

/// Options of the `#crit-subject` dropdown that carry a value.
pub fn parse(html: &str) -> Result<Vec<Department>> {
    let selector = Selector::parse("#crit-subject > option")
        .map_err(|e| CatalogError::UnexpectedResponse(format!("bad selector: {e}")))?;

    let doc = Html::parse_document(html);
    let depts = doc
        .select(&selector)
        .filter_map(|opt| {
            let code = opt.value().attr("value")?.trim();
            if code.is_empty() {
                return None;
            }
            Some(Department {
                code: code.to_string(),
                name: opt.text().collect::<String>().trim().to_string(),
            })
        })
        .collect();

    Ok(depts)
}

pub fn fetch(client: &CabClient) -> Result<Vec<Department>> {
    let html = client.home_page()?;
    let depts = parse(&html)?;
    if depts.is_empty() {
        return Err(CatalogError::UnexpectedResponse(
            "no departments in #crit-subject".into(),
        ));
    }
    info!("found {} departments", depts.len());
    Ok(depts)
}

/// Writes `CODE Name` lines.
pub fn save(path: &Path, depts: &[Department]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let body: String = depts
        .iter()
        .map(|d| format!("{} {}\n", d.code, d.name))
        .collect();
    fs::write(path, body)?;
    Ok(())
}

/// First token of every non-blank line.
pub fn load(path: &Path) -> Result<Vec<String>> {
    let text = encoding::read_text(path)?;
    Ok(text
        .lines()
        .filter_map(|l| l.split_whitespace().next())
        .map(str::to_string)
        .collect())
}
