use async_trait::async_trait;
use dashboard_core::model::{Course, ProgressRecord, Student, StudentId, UserId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("backend is read-only")]
    ReadOnly,
}

/// Read access to the course catalog.
#[async_trait]
pub trait CourseRepository: Send + Sync {
    /// List every course in catalog order, active or not.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the catalog cannot be read.
    async fn list_courses(&self) -> Result<Vec<Course>, StorageError>;

    /// Persist or update a course.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the course cannot be stored.
    async fn upsert_course(&self, course: &Course) -> Result<(), StorageError>;
}

#[async_trait]
pub trait StudentRepository: Send + Sync {
    /// Resolve the student record for an authenticated user.
    ///
    /// Returns `Ok(None)` when the user has no student record.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn find_by_user(&self, user_id: &UserId) -> Result<Option<Student>, StorageError>;

    /// Persist or update a student.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` if another student already owns the user id.
    async fn upsert_student(&self, student: &Student) -> Result<(), StorageError>;
}

#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// List a student's progress records in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn list_for_student(
        &self,
        student_id: &StudentId,
    ) -> Result<Vec<ProgressRecord>, StorageError>;

    /// Persist or update a progress record for a student.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the record cannot be stored.
    async fn upsert_progress(
        &self,
        student_id: &StudentId,
        record: &ProgressRecord,
    ) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    courses: Arc<Mutex<Vec<Course>>>,
    students: Arc<Mutex<HashMap<UserId, Student>>>,
    progress: Arc<Mutex<HashMap<StudentId, Vec<ProgressRecord>>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<E: std::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

#[async_trait]
impl CourseRepository for InMemoryRepository {
    async fn list_courses(&self) -> Result<Vec<Course>, StorageError> {
        let guard = self.courses.lock().map_err(poisoned)?;
        Ok(guard.clone())
    }

    async fn upsert_course(&self, course: &Course) -> Result<(), StorageError> {
        let mut guard = self.courses.lock().map_err(poisoned)?;
        match guard.iter_mut().find(|c| c.id() == course.id()) {
            Some(existing) => *existing = course.clone(),
            None => guard.push(course.clone()),
        }
        Ok(())
    }
}

#[async_trait]
impl StudentRepository for InMemoryRepository {
    async fn find_by_user(&self, user_id: &UserId) -> Result<Option<Student>, StorageError> {
        let guard = self.students.lock().map_err(poisoned)?;
        Ok(guard.get(user_id).cloned())
    }

    async fn upsert_student(&self, student: &Student) -> Result<(), StorageError> {
        let mut guard = self.students.lock().map_err(poisoned)?;
        if let Some(existing) = guard.get(student.user_id()) {
            if existing.id() != student.id() {
                return Err(StorageError::Conflict);
            }
        }
        guard.insert(student.user_id().clone(), student.clone());
        Ok(())
    }
}

#[async_trait]
impl ProgressRepository for InMemoryRepository {
    async fn list_for_student(
        &self,
        student_id: &StudentId,
    ) -> Result<Vec<ProgressRecord>, StorageError> {
        let guard = self.progress.lock().map_err(poisoned)?;
        Ok(guard.get(student_id).cloned().unwrap_or_default())
    }

    async fn upsert_progress(
        &self,
        student_id: &StudentId,
        record: &ProgressRecord,
    ) -> Result<(), StorageError> {
        let mut guard = self.progress.lock().map_err(poisoned)?;
        let records = guard.entry(student_id.clone()).or_default();
        match records.iter_mut().find(|r| r.id() == record.id()) {
            Some(existing) => *existing = record.clone(),
            None => records.push(record.clone()),
        }
        Ok(())
    }
}

/// Aggregates the repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub courses: Arc<dyn CourseRepository>,
    pub students: Arc<dyn StudentRepository>,
    pub progress: Arc<dyn ProgressRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_repo(InMemoryRepository::new())
    }

    /// Wire all three repositories to one backend value.
    #[must_use]
    pub fn from_repo<R>(repo: R) -> Self
    where
        R: CourseRepository + StudentRepository + ProgressRepository + Clone + 'static,
    {
        let courses: Arc<dyn CourseRepository> = Arc::new(repo.clone());
        let students: Arc<dyn StudentRepository> = Arc::new(repo.clone());
        let progress: Arc<dyn ProgressRepository> = Arc::new(repo);
        Self {
            courses,
            students,
            progress,
        }
    }
}
