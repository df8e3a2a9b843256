use serde_json::json;

/// Search criteria for one department, URL-encoded JSON as the catalog expects.
pub fn search(term: &str, dept_code: &str, include_ind_study: bool, include_canc: bool) -> String {
    let mut criteria = vec![json!({ "field": "subject", "value": dept_code })];
    if !include_ind_study {
        criteria.push(json!({ "field": "is_ind_study", "value": "N" }));
    }
    if !include_canc {
        criteria.push(json!({ "field": "is_canc", "value": "N" }));
    }

    let body = json!({
        "other": { "srcdb": term },
        "criteria": criteria,
    });
    urlencoding::encode(&body.to_string()).into_owned()
}

/// Detail lookup for one section.
pub fn details(term: &str, dept_code: &str, crn: &str) -> String {
    let body = json!({
        "group": format!("code:{dept_code}"),
        "key": format!("crn:{crn}"),
        "srcdb": term,
        "matched": format!("crn:{crn}"),
    });
    urlencoding::encode(&body.to_string()).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn decode(s: &str) -> Value {
        let raw = urlencoding::decode(s).unwrap();
        serde_json::from_str(&raw).unwrap()
    }

    #[test]
    fn search_excludes_ind_study_and_cancelled_by_default() {
        let v = decode(&search("999999", "AFRI", false, false));
        assert_eq!(v["other"]["srcdb"], "999999");
        let criteria = v["criteria"].as_array().unwrap();
        assert_eq!(criteria.len(), 3);
        assert_eq!(criteria[0]["value"], "AFRI");
        assert_eq!(criteria[1]["field"], "is_ind_study");
        assert_eq!(criteria[2]["field"], "is_canc");
    }

    #[test]
    fn search_with_everything_included() {
        let v = decode(&search("202410", "CSCI", true, true));
        assert_eq!(v["criteria"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn details_payload_shape() {
        let encoded = details("999999", "CSCI", "25150");
        assert!(!encoded.contains('"'));
        let v = decode(&encoded);
        assert_eq!(v["group"], "code:CSCI");
        assert_eq!(v["key"], "crn:25150");
        assert_eq!(v["matched"], "crn:25150");
        assert_eq!(v["srcdb"], "999999");
    }
}
