use std::sync::Arc;

use async_trait::async_trait;
use dashboard_core::launch::course_launch_url;
use dashboard_core::model::CourseId;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::LaunchError;

/// Turns an email into the opaque token the learning environment expects.
#[async_trait]
pub trait EmailSealer: Send + Sync {
    /// # Errors
    ///
    /// Returns `LaunchError` if the token cannot be produced.
    async fn seal(&self, email: &str) -> Result<String, LaunchError>;
}

/// Seals emails through the backend's `POST /auth/seal-email` endpoint.
#[derive(Clone)]
pub struct RemoteEmailSealer {
    client: Client,
    endpoint: Url,
    api_key: Option<String>,
}

impl RemoteEmailSealer {
    /// # Errors
    ///
    /// Returns `url::ParseError` if the api base cannot take a path.
    pub fn new(api_base: &Url, api_key: Option<String>) -> Result<Self, url::ParseError> {
        let endpoint = api_base.join("auth/seal-email")?;
        Ok(Self {
            client: Client::new(),
            endpoint,
            api_key,
        })
    }
}

#[derive(Debug, Serialize)]
struct SealRequest<'a> {
    email: &'a str,
}

#[derive(Debug, Deserialize)]
struct SealResponse {
    token: Option<String>,
}

#[async_trait]
impl EmailSealer for RemoteEmailSealer {
    async fn seal(&self, email: &str) -> Result<String, LaunchError> {
        let mut request = self
            .client
            .post(self.endpoint.clone())
            .json(&SealRequest { email });
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(LaunchError::HttpStatus(response.status()));
        }

        let body: SealResponse = response.json().await?;
        body.token
            .map(|t| t.trim().to_owned())
            .filter(|t| !t.is_empty())
            .ok_or(LaunchError::EmptyToken)
    }
}

/// Where "Continue" on an activity entry should take the student.
#[derive(Clone)]
pub struct LaunchUrlBuilder {
    base: Url,
    sealer: Arc<dyn EmailSealer>,
}

impl LaunchUrlBuilder {
    #[must_use]
    pub fn new(base: Url, sealer: Arc<dyn EmailSealer>) -> Self {
        Self { base, sealer }
    }

    #[must_use]
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Seal the email and compose the course link.
    ///
    /// # Errors
    ///
    /// Returns `LaunchError::MissingEmail` for a blank email, or whatever the
    /// sealer or URL composition reports.
    pub async fn build(&self, course_id: &CourseId, email: &str) -> Result<Url, LaunchError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(LaunchError::MissingEmail);
        }
        let token = self.sealer.seal(email).await?;
        Ok(course_launch_url(&self.base, course_id, &token)?)
    }
}
