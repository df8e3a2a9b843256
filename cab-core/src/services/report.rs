use crate::model::normalized::NormalizedCourse;

pub const SEPARATOR: &str = "\n\n --- \n\n";

fn or_blank(v: &Option<String>) -> &str {
    v.as_deref().unwrap_or("")
}

/// One course as a block of labeled lines. Absent values leave the label with nothing after it;
/// only the curricular-programs line is dropped when empty.
pub fn render_course(c: &NormalizedCourse) -> String {
    let mut s = String::new();

    s.push_str(&format!("{} - {}\n", or_blank(&c.code), or_blank(&c.title)));
    s.push_str(&format!("Course Description: {}\n", or_blank(&c.description)));
    s.push_str(&format!(
        "This course will be offered in the {}\n",
        or_blank(&c.semesters)
    ));
    s.push_str(&format!(
        "This course will be taught by {}\n",
        or_blank(&c.instructor_information)
    ));
    s.push_str(&format!(
        "This course will meet on {}\n",
        or_blank(&c.meeting_times)
    ));
    s.push_str(&format!(
        "The final exam for this course will be on {}\n",
        or_blank(&c.exam_info)
    ));
    if let Some(programs) = &c.curricular_programs {
        s.push_str(&format!(
            "This course belongs to the following curricular programs: {programs}\n"
        ));
    }

    s.push_str("Enrollment info: \n");
    s.push_str(&format!(" - {}\n", or_blank(&c.enrollment_limit)));
    s.push_str(&format!(
        " - Enrollment demographics: {}\n",
        or_blank(&c.registration_demographics)
    ));

    s.push_str("Registration info: \n");
    s.push_str(&format!(
        " - Registration requirements: {}\n",
        or_blank(&c.registration_restrictions)
    ));
    s.push_str(&format!(
        " - Grade Mode Options: {}\n",
        or_blank(&c.grade_modes)
    ));
    s.push_str(&format!(
        " - Additional registration information: {}",
        or_blank(&c.additional_information)
    ));

    s
}

pub fn render(courses: &[NormalizedCourse]) -> String {
    courses
        .iter()
        .map(render_course)
        .collect::<Vec<_>>()
        .join(SEPARATOR)
}
