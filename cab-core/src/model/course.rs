use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::fmt;

/// Keys kept from a detail payload. Anything else the catalog returns is dropped.
pub const DETAIL_KEYS: &[&str] = &[
    "description",
    "seats",
    "registration_restrictions",
    "clssnotes",
    "cart_opts",
    "attr_html",
    "exam_html",
    "meeting_html",
    "instructordetail_html",
    "regdemog_json",
    "all_sections",
    "resources_critical_review_html",
    "resources_syllabus_html",
    "resources_materials_html",
];

/// One row of the catalog search endpoint. A course appears once per section.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct RawResult {
    pub code: String,

    #[serde(default)]
    pub title: String,

    pub crn: String,

    #[serde(alias = "term_code")]
    pub srcdb: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Semester {
    Fall,
    Winter,
    Spring,
    Summer,
}

impl Semester {
    pub fn label(self) -> &'static str {
        match self {
            Semester::Fall => "Fall",
            Semester::Winter => "Winter",
            Semester::Spring => "Spring",
            Semester::Summer => "Summer",
        }
    }
}

impl fmt::Display for Semester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A course consolidated from every section sharing its code.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Course {
    pub code: String,

    #[serde(default)]
    pub title: String,

    pub semesters: BTreeSet<Semester>,

    pub crns: BTreeSet<String>,
}

impl Course {
    /// First whitespace-delimited token of the code, e.g. `CSCI` for `CSCI 0150`.
    pub fn department(&self) -> &str {
        self.code.split_whitespace().next().unwrap_or("")
    }

    /// The CRN used to look up details: the first in canonical order.
    pub fn representative_crn(&self) -> Option<&str> {
        self.crns.iter().next().map(String::as_str)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(transparent)]
pub struct CourseDetails(Map<String, Value>);

impl CourseDetails {
    /// Keeps only allow-listed keys, in allow-list order. Missing keys stay missing.
    pub fn from_payload(payload: &Map<String, Value>) -> Self {
        let mut kept = Map::new();
        for key in DETAIL_KEYS {
            if let Some(v) = payload.get(*key) {
                kept.insert((*key).to_string(), v.clone());
            }
        }
        CourseDetails(kept)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }
}

/// Snapshot record: a consolidated course plus its fetched details.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct EnrichedCourse {
    #[serde(flatten)]
    pub course: Course,

    #[serde(default)]
    pub details: CourseDetails,
}
