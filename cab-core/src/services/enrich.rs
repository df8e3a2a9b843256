use crate::error::{CatalogError, Result};
use crate::model::course::{Course, CourseDetails, EnrichedCourse};
use crate::source::CatalogSource;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// A course whose details could not be fetched. The course is kept whole so it
/// can be passed back to [`enrich`] later.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct EnrichmentFailure {
    #[serde(flatten)]
    pub course: Course,
    pub crn: Option<String>,
    pub error: String,
}

#[derive(Debug, Serialize, Default)]
pub struct EnrichmentOutcome {
    pub courses: Vec<EnrichedCourse>,
    pub failures: Vec<EnrichmentFailure>,
}

/// Attaches details fetched through the course's representative CRN.
pub fn enrich(course: Course, source: &dyn CatalogSource) -> Result<EnrichedCourse> {
    let crn = course
        .representative_crn()
        .ok_or_else(|| CatalogError::MissingCrn(course.code.clone()))?;

    let payload = source.details(course.department(), crn)?;
    let details = CourseDetails::from_payload(&payload);

    Ok(EnrichedCourse { course, details })
}

/// Enriches every course in order. A failed fetch is recorded and the run continues.
pub fn enrich_all(courses: Vec<Course>, source: &dyn CatalogSource) -> EnrichmentOutcome {
    let total = courses.len();
    let mut outcome = EnrichmentOutcome::default();

    for (done, course) in courses.into_iter().enumerate() {
        let crn = course.representative_crn().map(str::to_string);

        match enrich(course.clone(), source) {
            Ok(enriched) => outcome.courses.push(enriched),
            Err(e) => {
                warn!(code = %course.code, ?crn, error = %e, "enrichment failed");
                outcome.failures.push(EnrichmentFailure {
                    course,
                    crn,
                    error: e.to_string(),
                });
            }
        }

        debug!("enriched {} of {} courses", done + 1, total);
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::course::{RawResult, Semester};
    use serde_json::{json, Map, Value};
    use std::cell::{Cell, RefCell};
    use std::collections::BTreeSet;

    #[derive(Default)]
    struct FakeSource {
        calls: RefCell<Vec<(String, String)>>,
    }

    impl CatalogSource for FakeSource {
        fn search(&self, _dept_code: &str) -> Result<Vec<RawResult>> {
            Ok(Vec::new())
        }

        fn details(&self, dept_code: &str, crn: &str) -> Result<Map<String, Value>> {
            self.calls
                .borrow_mut()
                .push((dept_code.to_string(), crn.to_string()));
            if crn == "999" {
                return Err(CatalogError::Http {
                    status: 500,
                    message: "boom".into(),
                });
            }
            let v = json!({
                "description": format!("details for {crn}"),
                "seats": "",
                "srcdb": "202410",
            });
            Ok(v.as_object().cloned().unwrap_or_default())
        }
    }

    fn course(code: &str, crns: &[&str]) -> Course {
        Course {
            code: code.into(),
            title: "t".into(),
            semesters: BTreeSet::from([Semester::Fall]),
            crns: crns.iter().map(|c| c.to_string()).collect(),
        }
    }

    #[test]
    fn uses_department_and_smallest_crn() {
        let source = FakeSource::default();
        let enriched = enrich(course("MATH 0100", &["300", "120", "250"]), &source).unwrap();

        assert_eq!(
            source.calls.borrow().as_slice(),
            &[("MATH".to_string(), "120".to_string())]
        );
        assert_eq!(enriched.details.get("description"), Some(&json!("details for 120")));
        assert_eq!(enriched.details.get("seats"), Some(&json!("")));
        assert!(enriched.details.get("srcdb").is_none());
    }

    #[test]
    fn failures_are_recorded_and_order_kept() {
        let source = FakeSource::default();
        let courses = vec![
            course("A 1", &["1"]),
            course("B 2", &["999"]),
            course("C 3", &["3"]),
        ];
        let outcome = enrich_all(courses, &source);

        let codes: Vec<_> = outcome.courses.iter().map(|c| c.course.code.as_str()).collect();
        assert_eq!(codes, vec!["A 1", "C 3"]);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].course.code, "B 2");
        assert_eq!(outcome.failures[0].crn.as_deref(), Some("999"));
        assert!(outcome.failures[0].error.contains("500"));
    }

    /// Fails every lookup until switched back up.
    struct FlakySource {
        down: Cell<bool>,
    }

    impl CatalogSource for FlakySource {
        fn search(&self, _dept_code: &str) -> Result<Vec<RawResult>> {
            Ok(Vec::new())
        }

        fn details(&self, _dept_code: &str, crn: &str) -> Result<Map<String, Value>> {
            if self.down.get() {
                return Err(CatalogError::Transport("down".into()));
            }
            let v = json!({ "description": format!("details for {crn}") });
            Ok(v.as_object().cloned().unwrap_or_default())
        }
    }

    #[test]
    fn failed_course_can_be_retried() {
        let mut failing = course("CSCI 0150", &["2", "1"]);
        failing.semesters.insert(Semester::Spring);

        let source = FlakySource { down: Cell::new(true) };
        let outcome = enrich_all(vec![failing.clone()], &source);
        assert!(outcome.courses.is_empty());
        let failure = outcome.failures[0].clone();
        assert_eq!(failure.course, failing);
        assert_eq!(failure.crn.as_deref(), Some("1"));

        // the failure list is persisted as JSON and read back before retrying
        let saved = serde_json::to_value(&failure).unwrap();
        assert_eq!(saved["code"], "CSCI 0150");
        assert_eq!(saved["title"], "t");
        assert_eq!(saved["semesters"], json!(["Fall", "Spring"]));
        assert_eq!(saved["crns"], json!(["1", "2"]));
        let restored: EnrichmentFailure = serde_json::from_value(saved).unwrap();
        assert_eq!(restored, failure);

        source.down.set(false);
        let retried = enrich(restored.course, &source).unwrap();
        assert_eq!(retried.course, failing);
        assert_eq!(retried.details.get("description"), Some(&json!("details for 1")));
    }
}
