//! Read-only repositories backed by the learning platform's HTTP API.

mod dto;

use std::env;

use async_trait::async_trait;
use dashboard_core::model::{Course, ProgressRecord, Student, StudentId, UserId};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use storage::repository::{CourseRepository, ProgressRepository, StorageError, StudentRepository};
use url::Url;

use crate::Clock;
use dto::{CourseDto, ProgressDto, StudentDto};

#[derive(Clone, Debug)]
pub struct RemoteConfig {
    pub base_url: Url,
    pub api_key: Option<String>,
}

impl RemoteConfig {
    /// # Errors
    ///
    /// Returns `url::ParseError` if `base_url` is not an absolute URL.
    pub fn new(base_url: &str, api_key: Option<String>) -> Result<Self, url::ParseError> {
        // A trailing slash keeps `Url::join` from replacing the last segment.
        let mut normalized = base_url.trim().trim_end_matches('/').to_owned();
        normalized.push('/');
        Ok(Self {
            base_url: Url::parse(&normalized)?,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        })
    }

    /// Reads `LEARN_API_URL` and the optional `LEARN_API_KEY`.
    ///
    /// Returns `Ok(None)` when no API is configured.
    ///
    /// # Errors
    ///
    /// Returns `url::ParseError` if `LEARN_API_URL` is set but malformed.
    pub fn from_env() -> Result<Option<Self>, url::ParseError> {
        let Some(base_url) = env::var("LEARN_API_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
        else {
            return Ok(None);
        };
        Self::new(&base_url, env::var("LEARN_API_KEY").ok()).map(Some)
    }
}

/// HTTP client for the course, student, and progress endpoints.
///
/// Writes are not part of the API; every upsert fails with
/// `StorageError::ReadOnly`.
#[derive(Clone)]
pub struct RemoteBackend {
    client: Client,
    config: RemoteConfig,
    clock: Clock,
}

impl RemoteBackend {
    #[must_use]
    pub fn new(config: RemoteConfig, clock: Clock) -> Self {
        Self {
            client: Client::new(),
            config,
            clock,
        }
    }

    #[must_use]
    pub fn config(&self) -> &RemoteConfig {
        &self.config
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, StorageError> {
        let mut url = self.config.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| StorageError::Connection("api url cannot be a base".into()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// GET `url` as JSON. A 404 is `Ok(None)`.
    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<Option<T>, StorageError> {
        tracing::debug!(%url, "remote request");
        let mut request = self.client.get(url);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(StorageError::Connection(format!(
                "unexpected status {}",
                response.status()
            )));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        serde_json::from_slice(&body)
            .map(Some)
            .map_err(|e| StorageError::Serialization(e.to_string()))
    }
}

#[async_trait]
impl CourseRepository for RemoteBackend {
    async fn list_courses(&self) -> Result<Vec<Course>, StorageError> {
        let url = self.endpoint(&["courses"])?;
        let courses: Vec<CourseDto> = self.get_json(url).await?.ok_or(StorageError::NotFound)?;
        let now = self.clock.now();
        Ok(courses
            .into_iter()
            .filter_map(|dto| dto.into_course(now))
            .collect())
    }

    async fn upsert_course(&self, _course: &Course) -> Result<(), StorageError> {
        Err(StorageError::ReadOnly)
    }
}

#[async_trait]
impl StudentRepository for RemoteBackend {
    async fn find_by_user(&self, user_id: &UserId) -> Result<Option<Student>, StorageError> {
        let url = self.endpoint(&["students", "by-user", user_id.as_str()])?;
        let student: Option<StudentDto> = self.get_json(url).await?;
        Ok(student.and_then(|dto| dto.into_student(user_id)))
    }

    async fn upsert_student(&self, _student: &Student) -> Result<(), StorageError> {
        Err(StorageError::ReadOnly)
    }
}

#[async_trait]
impl ProgressRepository for RemoteBackend {
    async fn list_for_student(
        &self,
        student_id: &StudentId,
    ) -> Result<Vec<ProgressRecord>, StorageError> {
        let url = self.endpoint(&["progress", "by-student", student_id.as_str()])?;
        let records: Option<Vec<ProgressDto>> = self.get_json(url).await?;
        Ok(records
            .unwrap_or_default()
            .into_iter()
            .map(ProgressDto::into_record)
            .collect())
    }

    async fn upsert_progress(
        &self,
        _student_id: &StudentId,
        _record: &ProgressRecord,
    ) -> Result<(), StorageError> {
        Err(StorageError::ReadOnly)
    }
}
