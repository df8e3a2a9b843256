use crate::error::{CatalogError, Result};

use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use std::sync::OnceLock;
use tracing::warn;

const SECTIONS_HEADER: &str = "Section # CRN Meets Instructor ";
const SECTIONS_TRAILER: &str = " VIEW CALENDAR";

fn exam_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(Exam Date: .*?) Exam Group: ").expect("exam date pattern"))
}

/// `[]` -> "", `[A]` -> "A", `[A, B]` -> "A and B", `[A, B, C]` -> "A, B, and C".
pub fn join_list<I, S>(items: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let items: Vec<S> = items.into_iter().collect();
    match items.as_slice() {
        [] => String::new(),
        [one] => one.as_ref().to_string(),
        [a, b] => format!("{} and {}", a.as_ref(), b.as_ref()),
        [head @ .., last] => {
            let head: Vec<&str> = head.iter().map(|s| s.as_ref()).collect();
            format!("{}, and {}", head.join(", "), last.as_ref())
        }
    }
}

#[derive(Deserialize)]
struct CartOpts {
    grade_mode: GradeModeField,
}

#[derive(Deserialize)]
struct GradeModeField {
    options: Vec<GradeModeOption>,
}

#[derive(Deserialize)]
struct GradeModeOption {
    label: String,
}

/// Comma-joined grade mode labels out of the embedded `cart_opts` JSON.
///
/// JSON that does not parse, or lacks `grade_mode.options[].label`, yields `None`.
pub fn grade_modes(raw: Option<&str>) -> Option<String> {
    let raw = raw?;
    match serde_json::from_str::<CartOpts>(raw) {
        Ok(opts) => Some(
            opts.grade_mode
                .options
                .iter()
                .map(|o| o.label.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        ),
        Err(e) => {
            warn!(field = "grade_modes", error = %e, "malformed embedded JSON");
            None
        }
    }
}

fn demographic_label(code: &str) -> Option<&'static str> {
    match code {
        "FY" => Some("First Year"),
        "So" => Some("Sophomore"),
        "Jr" => Some("Junior"),
        "Sr" => Some("Senior"),
        "Gr" => Some("Graduate Level"),
        "Oth" => Some("Other"),
        _ => None,
    }
}

/// `{"FY": 10, "Jr": 5}` -> `First Year: 10, Junior: 5`, keeping source key order.
///
/// An unknown code means the upstream schema moved and is an error.
/// Unparseable JSON yields `None`.
pub fn registration_demographics(raw: Option<&str>) -> Result<Option<String>> {
    let Some(raw) = raw else {
        return Ok(None);
    };

    let counts = match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => map,
        Ok(other) => {
            warn!(field = "registration_demographics", value = %other, "expected a JSON object");
            return Ok(None);
        }
        Err(e) => {
            warn!(field = "registration_demographics", error = %e, "malformed embedded JSON");
            return Ok(None);
        }
    };

    let mut parts = Vec::with_capacity(counts.len());
    for (code, count) in &counts {
        let label =
            demographic_label(code).ok_or_else(|| CatalogError::UnknownDemographic(code.clone()))?;
        let count = match count {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        parts.push(format!("{label}: {count}"));
    }

    Ok(Some(parts.join(", ")))
}

/// Drops the listing's column header and calendar link text.
pub fn sections(raw: Option<&str>) -> Option<String> {
    let raw = raw?.trim();
    Some(raw.replace(SECTIONS_HEADER, "").replace(SECTIONS_TRAILER, ""))
}

/// `... Exam Date: X Exam Group: ...` -> `Exam Date: X`.
pub fn exam_date(raw: Option<&str>) -> Option<String> {
    let text = raw?.replace("&#160;", " ");
    exam_re()
        .captures(&text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_list_cases() {
        assert_eq!(join_list(Vec::<String>::new()), "");
        assert_eq!(join_list(["A"]), "A");
        assert_eq!(join_list(["A", "B"]), "A and B");
        assert_eq!(join_list(["A", "B", "C"]), "A, B, and C");
        assert_eq!(join_list(["Fall", "Winter", "Spring", "Summer"]), "Fall, Winter, Spring, and Summer");
    }

    #[test]
    fn grade_modes_labels() {
        let raw = r#"{"grade_mode":{"options":[{"value":"","label":"Letter Grade","selected":true},{"value":"S","label":"Satisfactory/No Credit"}]}}"#;
        assert_eq!(
            grade_modes(Some(raw)).as_deref(),
            Some("Letter Grade, Satisfactory/No Credit")
        );
        assert_eq!(grade_modes(None), None);
    }

    #[test]
    fn grade_modes_malformed_is_absent() {
        assert_eq!(grade_modes(Some("{not json")), None);
        assert_eq!(grade_modes(Some(r#"{"other": 1}"#)), None);
    }

    #[test]
    fn demographics_keep_key_order() {
        let out = registration_demographics(Some(r#"{"FY": 10, "Jr": 5}"#)).unwrap();
        assert_eq!(out.as_deref(), Some("First Year: 10, Junior: 5"));

        let out = registration_demographics(Some(r#"{"Oth": "2", "Gr": 1, "So": 0}"#)).unwrap();
        assert_eq!(out.as_deref(), Some("Other: 2, Graduate Level: 1, Sophomore: 0"));
    }

    #[test]
    fn demographics_unknown_code_is_error() {
        match registration_demographics(Some(r#"{"ZZ": 1}"#)) {
            Err(CatalogError::UnknownDemographic(code)) => assert_eq!(code, "ZZ"),
            other => panic!("expected UnknownDemographic, got {other:?}"),
        }
    }

    #[test]
    fn demographics_absent_or_malformed() {
        assert_eq!(registration_demographics(None).unwrap(), None);
        assert_eq!(registration_demographics(Some("[1,2]")).unwrap(), None);
        assert_eq!(registration_demographics(Some("nope")).unwrap(), None);
    }

    #[test]
    fn sections_strip_boilerplate() {
        let raw = " Section # CRN Meets Instructor S01 25150 MWF 10-10:50a J. Doe VIEW CALENDAR ";
        assert_eq!(sections(Some(raw)).as_deref(), Some("S01 25150 MWF 10-10:50a J. Doe"));
        assert_eq!(sections(Some("S01 only")).as_deref(), Some("S01 only"));
        assert_eq!(sections(None), None);
    }

    #[test]
    fn exam_date_extraction() {
        assert_eq!(
            exam_date(Some("foo Exam Date: May 5 2024 Exam Group: 3 bar")).as_deref(),
            Some("Exam Date: May 5 2024")
        );
        assert_eq!(
            exam_date(Some("Exam Date: Dec 12&#160;2pm Exam Group: 7")).as_deref(),
            Some("Exam Date: Dec 12 2pm")
        );
        assert_eq!(exam_date(Some("no exam scheduled")), None);
        assert_eq!(exam_date(Some("Exam Date: May 5 only")), None);
        assert_eq!(exam_date(None), None);
    }
}
