//! Where the project registry comes from.
//!
//! A [`ProjectSource`] is resolved to a plain list before validation runs.
//! Resolution never fails: a broken source is logged and treated as an empty
//! list, which switches the `owner_project` check off.
//!
//! ```rust,ignore
//! use oli::{validate_bulk_async, ProjectClient, ProjectSource, ValidationOptions};
//!
//! let source = ProjectSource::Remote(ProjectClient::default());
//! let result = validate_bulk_async(&rows, &ValidationOptions::default(), &source).await?;
//! ```

use futures::future::{BoxFuture, FutureExt};
use serde_json::{Map, Value};
use std::env;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::api::logs::{log_info, log_warning};
use crate::cache::{ProjectCache, ProjectList, DEFAULT_PROJECT_CACHE};
use crate::error::{ProjectsError, ProjectsResult, ValidationResult};
use crate::models::{AttestationRow, ProjectRecord};
use crate::parser::{parse_csv, CsvParseResult};
use crate::validation::{
    validate_bulk, validate_row, BulkValidationResult, RowValidationResult, ValidationOptions,
};

/// Public project registry maintained by growthepie.
pub const DEFAULT_PROJECTS_URL: &str = "https://api.growthepie.xyz/v1/labels/projects.json";

/// Default number of attempts per fetch
const DEFAULT_MAX_RETRIES: u32 = 2;

/// Delay between attempts in milliseconds
const RETRY_DELAY_MS: u64 = 500;

pub type ProjectResolverFn =
    Arc<dyn Fn() -> BoxFuture<'static, ProjectsResult<Vec<ProjectRecord>>> + Send + Sync>;

// =============================================================================
// Source
// =============================================================================

#[derive(Clone, Default)]
pub enum ProjectSource {
    /// Keep whatever `ValidationOptions::projects` already holds.
    #[default]
    None,
    List(Vec<ProjectRecord>),
    /// Caller-supplied async loader.
    Resolver(ProjectResolverFn),
    /// Fetch over HTTP, cached per client.
    Remote(ProjectClient),
}

impl ProjectSource {
    pub fn resolver<F, Fut>(load: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ProjectsResult<Vec<ProjectRecord>>> + Send + 'static,
    {
        Self::Resolver(Arc::new(move || load().boxed()))
    }
}

impl std::fmt::Debug for ProjectSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "ProjectSource::None"),
            Self::List(list) => write!(f, "ProjectSource::List({} projects)", list.len()),
            Self::Resolver(_) => write!(f, "ProjectSource::Resolver"),
            Self::Remote(client) => write!(f, "ProjectSource::Remote({})", client.url()),
        }
    }
}

// =============================================================================
// HTTP client
// =============================================================================

/// Project registry HTTP client
#[derive(Clone, Debug)]
pub struct ProjectClient {
    url: String,
    http: reqwest::Client,
    max_retries: u32,
    cache: Arc<ProjectCache>,
}

impl ProjectClient {
    /// Client with its own cache.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            http: reqwest::Client::new(),
            max_retries: DEFAULT_MAX_RETRIES,
            cache: Arc::new(ProjectCache::new()),
        }
    }

    /// Client for `OLI_PROJECTS_URL`, or the public registry when unset.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        match env::var("OLI_PROJECTS_URL") {
            Ok(url) if !url.trim().is_empty() && url.trim() != DEFAULT_PROJECTS_URL => Self::new(url.trim()),
            _ => Self::default(),
        }
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries.max(1);
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn cache(&self) -> &ProjectCache {
        &self.cache
    }

    /// Fetch through the cache.
    pub async fn projects(&self) -> ProjectsResult<ProjectList> {
        let client = self.clone();
        self.cache.get_or_fetch(move || async move { client.fetch().await }).await
    }

    /// Fetch, bypassing the cache, retrying transport errors and 5xx answers.
    pub async fn fetch(&self) -> ProjectsResult<Vec<ProjectRecord>> {
        let mut last_error = None;

        for attempt in 1..=self.max_retries {
            match self.try_fetch().await {
                Ok(projects) => {
                    log_info(format!("Loaded {} projects from {}", projects.len(), self.url));
                    return Ok(projects);
                }
                Err(e) => {
                    let retryable = matches!(e, ProjectsError::Http(_))
                        || matches!(e, ProjectsError::Status(code) if code >= 500);
                    log_warning(format!(
                        "Project fetch attempt {}/{} failed: {}",
                        attempt, self.max_retries, e
                    ));
                    last_error = Some(e);

                    if !retryable {
                        break;
                    }
                    if attempt < self.max_retries {
                        tokio::time::sleep(Duration::from_millis(RETRY_DELAY_MS)).await;
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| ProjectsError::Http("no attempt made".to_string())))
    }

    async fn try_fetch(&self) -> ProjectsResult<Vec<ProjectRecord>> {
        let response = self
            .http
            .get(&self.url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| ProjectsError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProjectsError::Status(status.as_u16()));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| ProjectsError::Decode(e.to_string()))?;
        decode_projects(&body)
    }
}

impl Default for ProjectClient {
    /// Public registry, sharing the process-wide cache.
    fn default() -> Self {
        Self {
            url: DEFAULT_PROJECTS_URL.to_string(),
            http: reqwest::Client::new(),
            max_retries: DEFAULT_MAX_RETRIES,
            cache: DEFAULT_PROJECT_CACHE.clone(),
        }
    }
}

/// Accept a plain array of records, `{ "projects": [...] }`, or the tabular
/// `{ "data": { "types": [...], "data": [[...], ...] } }` export.
pub fn decode_projects(body: &Value) -> ProjectsResult<Vec<ProjectRecord>> {
    let records: Vec<Value> = if let Some(list) = body.as_array() {
        list.clone()
    } else if let Some(list) = body.get("projects").and_then(Value::as_array) {
        list.clone()
    } else if let Some(table) = body.get("data") {
        table_to_records(table)?
    } else {
        return Err(ProjectsError::Decode(
            "expected an array of projects or a { data: { types, data } } table".to_string(),
        ));
    };

    // records without a usable owner_project are skipped
    Ok(records
        .into_iter()
        .filter_map(|record| serde_json::from_value::<ProjectRecord>(record).ok())
        .filter(|project| !project.owner_project.trim().is_empty())
        .collect())
}

fn table_to_records(table: &Value) -> ProjectsResult<Vec<Value>> {
    let types: Vec<&str> = table
        .get("types")
        .and_then(Value::as_array)
        .ok_or_else(|| ProjectsError::Decode("table has no 'types' column list".to_string()))?
        .iter()
        .map(|t| t.as_str().unwrap_or_default())
        .collect();
    let rows = table
        .get("data")
        .and_then(Value::as_array)
        .ok_or_else(|| ProjectsError::Decode("table has no 'data' rows".to_string()))?;

    Ok(rows
        .iter()
        .filter_map(Value::as_array)
        .map(|cells| {
            let object: Map<String, Value> = types
                .iter()
                .zip(cells)
                .filter(|(name, value)| !name.is_empty() && !value.is_null())
                .map(|(name, value)| (name.to_string(), value.clone()))
                .collect();
            Value::Object(object)
        })
        .collect())
}

// =============================================================================
// Resolution
// =============================================================================

/// Turn a source into a list. Errors are logged and become an empty list.
pub async fn resolve_projects(source: &ProjectSource) -> Vec<ProjectRecord> {
    let outcome = match source {
        ProjectSource::None => return Vec::new(),
        ProjectSource::List(list) => return list.clone(),
        ProjectSource::Resolver(load) => load().await,
        ProjectSource::Remote(client) => client.projects().await.map(|list| list.as_ref().clone()),
    };

    outcome.unwrap_or_else(|e| {
        log_warning(format!("Project list unavailable, skipping project checks: {}", e));
        Vec::new()
    })
}

/// Copy of `options` with the source's projects filled in.
/// [`ProjectSource::None`] keeps `options.projects` as is.
pub async fn options_with_source(options: &ValidationOptions, source: &ProjectSource) -> ValidationOptions {
    match source {
        ProjectSource::None => options.clone(),
        other => options.clone().with_projects(resolve_projects(other).await),
    }
}

pub async fn validate_row_async(
    row: &AttestationRow,
    options: &ValidationOptions,
    source: &ProjectSource,
) -> RowValidationResult {
    validate_row(row, &options_with_source(options, source).await)
}

pub async fn validate_bulk_async(
    rows: &[AttestationRow],
    options: &ValidationOptions,
    source: &ProjectSource,
) -> ValidationResult<BulkValidationResult> {
    validate_bulk(rows, &options_with_source(options, source).await)
}

pub async fn parse_csv_async(
    text: &str,
    options: &ValidationOptions,
    source: &ProjectSource,
) -> CsvParseResult {
    parse_csv(text, &options_with_source(options, source).await)
}
