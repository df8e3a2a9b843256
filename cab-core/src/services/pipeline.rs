use crate::config::Settings;
use crate::error::Result;
use crate::model::course::{EnrichedCourse, RawResult};
use crate::model::normalized::NormalizedCourse;
use crate::services::enrich::{self, EnrichmentFailure};
use crate::services::{consolidate, normalize, report, store};
use crate::source::CatalogSource;

use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Serialize)]
pub struct ScrapeReport {
    pub departments: usize,
    pub raw_results: usize,
    pub courses: Vec<EnrichedCourse>,
    pub failures: Vec<EnrichmentFailure>,
}

/// Searches every department, consolidates the rows and fetches course details.
///
/// A search failure aborts the run; a detail failure only drops that course.
pub fn scrape(source: &dyn CatalogSource, departments: &[String]) -> Result<ScrapeReport> {
    let mut raw: Vec<RawResult> = Vec::new();
    for dept in departments {
        raw.extend(source.search(dept)?);
    }

    let courses = consolidate::consolidate(&raw)?;
    info!(
        "consolidated {} rows into {} courses",
        raw.len(),
        courses.len()
    );

    let outcome = enrich::enrich_all(courses, source);

    Ok(ScrapeReport {
        departments: departments.len(),
        raw_results: raw.len(),
        courses: outcome.courses,
        failures: outcome.failures,
    })
}

pub struct Formatted {
    pub courses: Vec<NormalizedCourse>,
    pub text: String,
}

pub fn format(courses: &[EnrichedCourse]) -> Result<Formatted> {
    let courses = normalize::normalize_all(courses)?;
    let text = report::render(&courses);
    Ok(Formatted { courses, text })
}

#[derive(Debug, Serialize)]
pub struct ScrapeSummary {
    pub departments: usize,
    pub courses: usize,
    pub failures: Vec<EnrichmentFailure>,
    pub path: PathBuf,
}

/// `scrape` plus persistence of the snapshot and the failure list.
pub fn scrape_to_disk(
    settings: &Settings,
    source: &dyn CatalogSource,
    departments: &[String],
) -> Result<ScrapeSummary> {
    let report = scrape(source, departments)?;

    let path = settings.snapshot_path();
    store::save_json(&path, &report.courses)?;
    store::save_json(&settings.failures_path(), &report.failures)?;

    info!(
        "saved data for {} departments and {} courses to {}",
        report.departments,
        report.courses.len(),
        path.display()
    );

    Ok(ScrapeSummary {
        departments: report.departments,
        courses: report.courses.len(),
        failures: report.failures,
        path,
    })
}

#[derive(Debug, Serialize)]
pub struct FormatSummary {
    pub courses: usize,
    pub json_path: PathBuf,
    pub text_path: PathBuf,
}

/// Reads the saved snapshot and writes the formatted JSON and the text report.
pub fn format_from_disk(settings: &Settings) -> Result<FormatSummary> {
    let courses: Vec<EnrichedCourse> = store::load_json(&settings.snapshot_path())?;
    let formatted = format(&courses)?;

    let json_path = settings.formatted_path();
    let text_path = settings.report_path();
    store::save_json(&json_path, &formatted.courses)?;
    store::save_text(&text_path, &formatted.text)?;

    Ok(FormatSummary {
        courses: formatted.courses.len(),
        json_path,
        text_path,
    })
}
