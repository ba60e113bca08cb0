use std::sync::Arc;

use api::CatalogProvider;
use edupath_core::model::{ChapterAccess, CourseId, CourseOutline};

use crate::context::SessionContext;
use crate::error::ProgressionError;

/// A course outline paired with its computed unlock state.
#[derive(Debug, Clone, PartialEq)]
pub struct CourseBoard {
    pub outline: CourseOutline,
    /// Access per chapter, same order as `outline.chapters`.
    pub access: Vec<ChapterAccess>,
}

/// Fetches course outlines and applies lock-step gating for course screens.
#[derive(Clone)]
pub struct CourseProgressService {
    catalog: Arc<dyn CatalogProvider>,
}

impl CourseProgressService {
    #[must_use]
    pub fn new(catalog: Arc<dyn CatalogProvider>) -> Self {
        Self { catalog }
    }

    /// Load a course and compute which chapters and lessons are reachable.
    ///
    /// # Errors
    ///
    /// Returns `ProgressionError::Api` when the outline cannot be fetched.
    pub async fn outline(
        &self,
        course_id: CourseId,
        ctx: &SessionContext,
    ) -> Result<CourseBoard, ProgressionError> {
        let outline = self
            .catalog
            .fetch_course(course_id, ctx.auth_token())
            .await?;
        let access = outline.unlock_state();
        Ok(CourseBoard { outline, access })
    }
}
