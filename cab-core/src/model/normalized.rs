use serde::{Deserialize, Serialize};

/// A course flattened to display text. `None` stands for a field with no value.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct NormalizedCourse {
    pub code: Option<String>,
    pub title: Option<String>,
    pub semesters: Option<String>,
    pub crns: Option<String>,

    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub enrollment_limit: Option<String>,
    #[serde(default)]
    pub registration_restrictions: Option<String>,
    #[serde(default)]
    pub additional_information: Option<String>,
    #[serde(default)]
    pub curricular_programs: Option<String>,
    #[serde(default)]
    pub exam_info: Option<String>,
    #[serde(default)]
    pub meeting_times: Option<String>,
    #[serde(default)]
    pub instructor_information: Option<String>,
    #[serde(default)]
    pub registration_demographics: Option<String>,
    #[serde(default)]
    pub grade_modes: Option<String>,
    #[serde(default)]
    pub all_sections: Option<String>,

    #[serde(default)]
    pub critical_review: Option<String>,
    #[serde(default)]
    pub syllabus: Option<String>,
    #[serde(default)]
    pub materials: Option<String>,
}
