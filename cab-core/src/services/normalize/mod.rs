pub mod fields;
pub mod html;

use crate::error::Result;
use crate::model::course::{CourseDetails, EnrichedCourse};
use crate::model::normalized::NormalizedCourse;

use serde_json::Value;
use tracing::info_span;

/// Raw detail value as text. Blank strings and `null` are absent.
fn raw_text(details: &CourseDetails, key: &str) -> Option<String> {
    match details.get(key)? {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Last step for every field: markup to text, empty to absent.
fn finish(value: Option<String>) -> Option<String> {
    let value = value.filter(|v| !v.is_empty())?;
    let text = html::html_to_text(&value);
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

pub fn normalize_course(entry: &EnrichedCourse) -> Result<NormalizedCourse> {
    let course = &entry.course;
    let details = &entry.details;
    let _span = info_span!("normalize", code = %course.code).entered();

    let field = |key: &str| finish(raw_text(details, key));

    let demographics =
        fields::registration_demographics(raw_text(details, "regdemog_json").as_deref())?;

    Ok(NormalizedCourse {
        code: finish(non_empty(&course.code)),
        title: finish(non_empty(&course.title)),
        semesters: finish(Some(fields::join_list(
            course.semesters.iter().map(|s| s.label()),
        ))),
        crns: finish(Some(fields::join_list(&course.crns))),

        description: field("description"),
        enrollment_limit: field("seats"),
        registration_restrictions: field("registration_restrictions"),
        additional_information: field("clssnotes"),
        curricular_programs: field("attr_html"),
        exam_info: finish(fields::exam_date(raw_text(details, "exam_html").as_deref())),
        meeting_times: field("meeting_html"),
        instructor_information: field("instructordetail_html"),
        registration_demographics: finish(demographics),
        grade_modes: finish(fields::grade_modes(raw_text(details, "cart_opts").as_deref())),
        all_sections: finish(fields::sections(raw_text(details, "all_sections").as_deref())),

        critical_review: field("resources_critical_review_html"),
        syllabus: field("resources_syllabus_html"),
        materials: field("resources_materials_html"),
    })
}

/// Normalizes in order; the first hard data error stops the run.
pub fn normalize_all(courses: &[EnrichedCourse]) -> Result<Vec<NormalizedCourse>> {
    courses.iter().map(normalize_course).collect()
}
