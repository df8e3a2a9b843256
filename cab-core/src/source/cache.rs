use crate::error::Result;
use crate::services::store;

use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::PathBuf;

/// Detail payloads on disk, one file per (term, department, CRN).
pub struct DetailCache {
    dir: PathBuf,
}

pub fn key(term: &str, dept_code: &str, crn: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(term.as_bytes());
    hasher.update(b"|");
    hasher.update(dept_code.as_bytes());
    hasher.update(b"|");
    hasher.update(crn.as_bytes());
    hex::encode(hasher.finalize())
}

impl DetailCache {
    pub fn new(dir: PathBuf) -> Self {
        DetailCache { dir }
    }

    fn path(&self, term: &str, dept_code: &str, crn: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key(term, dept_code, crn)))
    }

    /// Unreadable or corrupt entries count as misses.
    pub fn get(&self, term: &str, dept_code: &str, crn: &str) -> Option<Map<String, Value>> {
        let data = fs::read_to_string(self.path(term, dept_code, crn)).ok()?;
        match serde_json::from_str(&data) {
            Ok(Value::Object(map)) => Some(map),
            _ => None,
        }
    }

    pub fn put(&self, term: &str, dept_code: &str, crn: &str, details: &Map<String, Value>) -> Result<()> {
        let json = serde_json::to_string(details)?;
        store::write_atomic(&self.path(term, dept_code, crn), json.as_bytes())
    }
}
