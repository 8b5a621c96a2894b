//! # Schoolyard Models
//!
//! Domain models and DTOs for the Schoolyard API.
//!
//! # Modules
//!
//! - [`ids`]: Typed UUID newtypes for every entity
//! - [`users`]: User accounts and roles
//! - [`students`]: Student records and directory entries
//! - [`academic_years`]: Academic years and assessment weights
//! - [`terms`]: Terms and their resolved date ranges
//! - [`content`]: Announcements, assignments, quizzes and targeting
//! - [`questions`]: Quiz questions
//! - [`submissions`]: Submissions and answer records
//!
//! # Example
//!
//! ```ignore
//! use schoolyard_models::content::{Targeting, TargetingDto};
//!
//! let targeting: Targeting = TargetingDto {
//!     grades: Some(vec!["grade5".into()]),
//!     ..Default::default()
//! }
//! .into();
//! ```

pub mod academic_years;
pub mod content;
pub mod ids;
pub mod questions;
pub mod students;
pub mod submissions;
pub mod terms;
pub mod users;

pub use academic_years::{
    AcademicYear, AcademicYearWithTerms, AssessmentWeights, CreateAcademicYearDto,
    CurrentAcademicYearResponse, PaginatedAcademicYearsResponse, UpdateAcademicYearDto,
};
pub use content::{
    ContentFilterParams, ContentItem, ContentKind, ContentRecipientsResponse, CreateContentDto,
    PaginatedContentResponse, PublishedContent, Targeting, TargetingDto, TargetingRequest,
};
pub use questions::{CreateQuestionDto, Question, QuestionType, QuestionView};
pub use students::{
    CreateStudentDto, DirectoryEntry, PaginatedStudentsResponse, Student, StudentFilterParams,
    UpdateStudentDto,
};
pub use submissions::{
    AnswerRecord, Correctness, CreateSubmissionDto, GradeSubmissionDto,
    PaginatedSubmissionsResponse, Submission, SubmissionStatus, SubmittedAnswer,
};
pub use terms::{ReplaceTermsDto, ResolvedTerm, Term, TermInput};
pub use users::{CreateUserDto, User, UserRole};
