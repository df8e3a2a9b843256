use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::info;

use crate::config::Settings;
use crate::error::CatalogError;
use crate::model::course::{EnrichedCourse, RawResult};
use crate::model::normalized::NormalizedCourse;
use crate::services::{consolidate, normalize, pipeline, report, semester, store};
use crate::source::cab::CabClient;
use crate::source::departments;

mod command;
use command::Command;

fn get_cmd(req: &Value) -> &str {
    req.get("cmd").and_then(|v| v.as_str()).unwrap_or("")
}

fn get_id(req: &Value) -> Value {
    req.get("id").cloned().unwrap_or(Value::Null)
}

fn get_payload(req: &Value) -> &Value {
    static EMPTY: Value = Value::Null;
    req.get("payload").unwrap_or(&EMPTY)
}

fn ok(id: Value, payload: Value) -> String {
    json!({
        "id": id,
        "status": "ok",
        "payload": payload
    })
    .to_string()
}

fn err(id: Value, message: impl Into<String>) -> String {
    json!({
        "id": id,
        "status": "error",
        "message": message.into()
    })
    .to_string()
}

fn parse_array<T: DeserializeOwned>(payload: &Value, key: &str) -> Result<Vec<T>, String> {
    let arr = payload
        .get(key)
        .and_then(|v| v.as_array())
        .ok_or_else(|| format!("payload.{key} must be an array"))?;

    let mut out: Vec<T> = Vec::with_capacity(arr.len());
    for (i, v) in arr.iter().cloned().enumerate() {
        match serde_json::from_value::<T>(v) {
            Ok(item) => out.push(item),
            Err(e) => return Err(format!("invalid {key} item at index {i}: {e}")),
        }
    }

    Ok(out)
}

/// Departments from the payload, else the saved list, else the live catalog.
fn resolve_departments(
    payload: &Value,
    settings: &Settings,
    client: &CabClient,
) -> Result<Vec<String>, CatalogError> {
    if let Some(list) = payload.get("departments").and_then(|v| v.as_array()) {
        return Ok(list
            .iter()
            .filter_map(|v| v.as_str())
            .map(str::to_string)
            .collect());
    }

    let path = settings.departments_path();
    if path.exists() {
        return departments::load(&path);
    }

    let depts = departments::fetch(client)?;
    departments::save(&path, &depts)?;
    Ok(depts.into_iter().map(|d| d.code).collect())
}

pub fn handle(input: &str, settings: &Settings) -> String {
    let req: Value = match serde_json::from_str(input) {
        Ok(v) => v,
        Err(_) => {
            return json!({
                "status": "error",
                "message": "invalid json"
            })
            .to_string();
        }
    };

    let id = get_id(&req);
    let payload = get_payload(&req);

    match Command::from(get_cmd(&req)) {
        Command::Ping => ok(id, json!({ "message": "cab-core alive" })),

        Command::ResolveSemester => {
            let term = payload.get("term_code").and_then(|v| v.as_str()).unwrap_or("");
            match semester::resolve(term) {
                Ok(s) => ok(id, json!({ "semester": s })),
                Err(e) => err(id, e.to_string()),
            }
        }

        Command::Consolidate => {
            let results = match parse_array::<RawResult>(payload, "results") {
                Ok(v) => v,
                Err(e) => return err(id, e),
            };
            match consolidate::consolidate(&results) {
                Ok(courses) => ok(id, json!({ "courses": courses })),
                Err(e) => err(id, e.to_string()),
            }
        }

        Command::Normalize => {
            let courses = match parse_array::<EnrichedCourse>(payload, "courses") {
                Ok(v) => v,
                Err(e) => return err(id, e),
            };
            match normalize::normalize_all(&courses) {
                Ok(normalized) => ok(id, json!({ "courses": normalized })),
                Err(e) => err(id, e.to_string()),
            }
        }

        Command::Render => {
            let courses = match parse_array::<NormalizedCourse>(payload, "courses") {
                Ok(v) => v,
                Err(e) => return err(id, e),
            };
            ok(id, json!({ "text": report::render(&courses) }))
        }

        Command::FetchDepartments => {
            let result = CabClient::new(settings).and_then(|client| {
                let depts = departments::fetch(&client)?;
                departments::save(&settings.departments_path(), &depts)?;
                Ok(depts)
            });
            match result {
                Ok(depts) => ok(id, json!({ "departments": depts })),
                Err(e) => err(id, e.to_string()),
            }
        }

        Command::Scrape => {
            let clear = payload.get("clear").and_then(|v| v.as_bool()).unwrap_or(false);

            let result = CabClient::new(settings).and_then(|client| {
                if clear {
                    let removed = store::clear_directory(&settings.details_cache_dir())?;
                    info!("cleared {removed} cached detail files");
                }
                let depts = resolve_departments(payload, settings, &client)?;
                pipeline::scrape_to_disk(settings, &client, &depts)
            });
            match result {
                Ok(summary) => ok(id, json!(summary)),
                Err(e) => err(id, e.to_string()),
            }
        }

        Command::Format => match pipeline::format_from_disk(settings) {
            Ok(summary) => ok(id, json!(summary)),
            Err(e) => err(id, e.to_string()),
        },

        Command::Unknown => err(id, "unknown command"),
    }
}
