use std::env;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use edupath_core::model::{
    AuthToken, ChapterId, CourseId, CourseOutline, LessonId, QuizSheet, Score, SessionId,
};

use crate::dto::{CourseResponse, QuizResponse, SessionCheckResponse};
use crate::providers::{
    ApiError, CatalogProvider, QuestionProvider, ScoreSubmitter, SessionCheck, SessionHeartbeat,
};

#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub base_url: String,
}

impl ApiConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    #[must_use]
    pub fn from_env() -> Option<Self> {
        let base_url = env::var("EDUPATH_API_BASE_URL").ok()?;
        if base_url.trim().is_empty() {
            return None;
        }
        Some(Self { base_url })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }
}

/// REST implementation of the provider contracts.
#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    config: ApiConfig,
}

impl HttpBackend {
    #[must_use]
    pub fn new(config: ApiConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    async fn get_json<T>(&self, path: &str, auth: &AuthToken) -> Result<T, ApiError>
    where
        T: serde::de::DeserializeOwned,
    {
        let response = self
            .client
            .get(self.config.endpoint(path))
            .bearer_auth(auth.expose())
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound);
        }
        if !status.is_success() {
            return Err(ApiError::HttpStatus(status));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Schema(e.to_string()))
    }

    async fn post_json<B>(&self, path: &str, body: &B, auth: &AuthToken) -> Result<(), ApiError>
    where
        B: Serialize + Sync,
    {
        let response = self
            .client
            .post(self.config.endpoint(path))
            .bearer_auth(auth.expose())
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound);
        }
        if !status.is_success() {
            return Err(ApiError::HttpStatus(status));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ScorePayload {
    score: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TimeReportPayload {
    elapsed_seconds: u32,
}

#[async_trait]
impl QuestionProvider for HttpBackend {
    async fn fetch_quiz(
        &self,
        chapter_id: ChapterId,
        auth: &AuthToken,
    ) -> Result<QuizSheet, ApiError> {
        let response: QuizResponse = self
            .get_json(&format!("chapters/{chapter_id}/quiz"), auth)
            .await?;
        Ok(response.into_domain()?)
    }
}

#[async_trait]
impl ScoreSubmitter for HttpBackend {
    async fn submit_score(
        &self,
        chapter_id: ChapterId,
        score: Score,
        auth: &AuthToken,
    ) -> Result<(), ApiError> {
        let payload = ScorePayload {
            score: score.value(),
        };
        self.post_json(&format!("chapters/{chapter_id}/score"), &payload, auth)
            .await
    }
}

#[async_trait]
impl SessionHeartbeat for HttpBackend {
    async fn check_session(
        &self,
        session_id: &SessionId,
        auth: &AuthToken,
    ) -> Result<SessionCheck, ApiError> {
        let response: SessionCheckResponse = self
            .get_json(&format!("sessions/{session_id}/check"), auth)
            .await?;
        Ok(response.into_domain())
    }

    async fn report_time(
        &self,
        lesson_id: LessonId,
        elapsed_secs: u32,
        auth: &AuthToken,
    ) -> Result<(), ApiError> {
        let payload = TimeReportPayload {
            elapsed_seconds: elapsed_secs,
        };
        self.post_json(
            &format!("lessons/{lesson_id}/learning-time"),
            &payload,
            auth,
        )
        .await
    }
}

#[async_trait]
impl CatalogProvider for HttpBackend {
    async fn fetch_course(
        &self,
        course_id: CourseId,
        auth: &AuthToken,
    ) -> Result<CourseOutline, ApiError> {
        let response: CourseResponse = self.get_json(&format!("courses/{course_id}"), auth).await?;
        Ok(response.into_domain())
    }
}
