pub mod cab;
pub mod cache;
pub mod departments;
pub mod payload;

use crate::error::Result;
use crate::model::course::RawResult;

use serde_json::{Map, Value};

/// Where course listings and per-section details come from.
pub trait CatalogSource {
    /// Every search row for one department.
    fn search(&self, dept_code: &str) -> Result<Vec<RawResult>>;

    /// Raw detail payload for one section.
    fn details(&self, dept_code: &str, crn: &str) -> Result<Map<String, Value>>;
}
