mod activity;
mod course;
pub mod defaults;
mod ids;
mod progress;
mod student;
mod subscription;

pub use ids::{CourseId, ParseIdError, ProgressId, StudentId, UserId};

pub use activity::ActivityEntry;
pub use course::{Course, CourseError, CourseStatus, MAX_RATING};
pub use defaults::CourseDraft;
pub use progress::{Completion, CompletionError, CourseRef, EmbeddedCourse, ProgressRecord};
pub use student::Student;
pub use subscription::PlanTier;
