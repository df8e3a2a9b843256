use crate::error::{CatalogError, Result};
use crate::model::course::{Course, RawResult};
use crate::services::semester;

use std::collections::{BTreeSet, HashMap};

/// Folds per-section search rows into one course per code.
///
/// Courses come out in first-seen order of their codes. A row whose term code
/// has no known semester aborts consolidation, naming that row's course and CRN.
pub fn consolidate(results: &[RawResult]) -> Result<Vec<Course>> {
    let mut courses: Vec<Course> = Vec::new();

    // code -> index in `courses`
    let mut seen: HashMap<&str, usize> = HashMap::new();

    for r in results {
        let sem = semester::resolve(&r.srcdb).map_err(|_| CatalogError::UnknownCourseTerm {
            code: r.code.clone(),
            crn: r.crn.clone(),
            srcdb: r.srcdb.clone(),
        })?;

        match seen.get(r.code.as_str()) {
            Some(&idx) => {
                let course = &mut courses[idx];
                course.semesters.insert(sem);
                course.crns.insert(r.crn.clone());
            }
            None => {
                seen.insert(r.code.as_str(), courses.len());
                courses.push(Course {
                    code: r.code.clone(),
                    title: r.title.clone(),
                    semesters: BTreeSet::from([sem]),
                    crns: BTreeSet::from([r.crn.clone()]),
                });
            }
        }
    }

    Ok(courses)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CatalogError;
    use crate::model::course::Semester;

    fn raw(code: &str, crn: &str, srcdb: &str) -> RawResult {
        RawResult {
            code: code.into(),
            title: format!("{code} title"),
            crn: crn.into(),
            srcdb: srcdb.into(),
        }
    }

    fn sample() -> Vec<RawResult> {
        vec![
            raw("CSCI 0150", "100", "202410"),
            raw("AFRI 0090", "300", "202420"),
            raw("CSCI 0150", "200", "202420"),
            raw("CSCI 0150", "100", "202410"),
            raw("AFRI 0090", "301", "202420"),
        ]
    }

    #[test]
    fn merges_sections_in_first_seen_order() {
        let courses = consolidate(&sample()).unwrap();

        assert_eq!(courses.len(), 2);
        assert_eq!(courses[0].code, "CSCI 0150");
        assert_eq!(courses[1].code, "AFRI 0090");

        let csci = &courses[0];
        assert_eq!(
            csci.semesters.iter().copied().collect::<Vec<_>>(),
            vec![Semester::Fall, Semester::Spring]
        );
        assert_eq!(csci.crns.iter().collect::<Vec<_>>(), vec!["100", "200"]);

        let afri = &courses[1];
        assert_eq!(afri.semesters.len(), 1);
        assert_eq!(afri.crns.len(), 2);
    }

    #[test]
    fn is_deterministic() {
        let input = sample();
        assert_eq!(consolidate(&input).unwrap(), consolidate(&input).unwrap());
    }

    #[test]
    fn codes_unique_and_sets_non_empty() {
        let courses = consolidate(&sample()).unwrap();
        let mut codes: Vec<_> = courses.iter().map(|c| c.code.as_str()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), courses.len());
        assert!(courses.iter().all(|c| !c.crns.is_empty() && !c.semesters.is_empty()));
    }

    #[test]
    fn empty_input() {
        assert!(consolidate(&[]).unwrap().is_empty());
    }

    #[test]
    fn bad_term_code_is_surfaced() {
        let input = vec![raw("CSCI 0150", "100", "202410"), raw("CSCI 0150", "101", "202499")];
        match consolidate(&input) {
            Err(CatalogError::UnknownCourseTerm { code, crn, srcdb }) => {
                assert_eq!((code.as_str(), crn.as_str(), srcdb.as_str()), ("CSCI 0150", "101", "202499"));
            }
            other => panic!("expected UnknownCourseTerm, got {other:?}"),
        }
    }
}
