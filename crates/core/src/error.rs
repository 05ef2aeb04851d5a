use thiserror::Error;

use crate::model::{CompletionError, CourseError, ParseIdError};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Course(#[from] CourseError),
    #[error(transparent)]
    Completion(#[from] CompletionError),
    #[error(transparent)]
    Id(#[from] ParseIdError),
}
