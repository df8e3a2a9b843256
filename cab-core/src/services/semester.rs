use crate::error::{CatalogError, Result};
use crate::model::course::Semester;

/// Maps a srcdb/term code to its semester via the trailing two characters.
pub fn resolve(term_code: &str) -> Result<Semester> {
    let suffix = term_code
        .len()
        .checked_sub(2)
        .and_then(|start| term_code.get(start..))
        .ok_or_else(|| CatalogError::UnknownTerm(term_code.to_string()))?;

    match suffix {
        "10" => Ok(Semester::Fall),
        "15" => Ok(Semester::Winter),
        "20" => Ok(Semester::Spring),
        "00" => Ok(Semester::Summer),
        _ => Err(CatalogError::UnknownTerm(term_code.to_string())),
    }
}
