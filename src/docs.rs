use serde::Serialize;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, ToSchema};

use schoolyard_core::{PaginationMeta, PaginationParams};
use schoolyard_models::ids::{AcademicYearId, ContentId, QuestionId, SubmissionId, TermId, UserId};

use crate::modules::academic_years::model::{
    AcademicYear, AcademicYearWithTerms, AssessmentWeights, CreateAcademicYearDto,
    CurrentAcademicYearResponse, PaginatedAcademicYearsResponse, ReplaceTermsDto, ResolvedTerm,
    Term, TermInput, UpdateAcademicYearDto,
};
use crate::modules::content::model::{
    ContentFilterParams, ContentItem, ContentKind, ContentRecipientsResponse, CreateContentDto,
    PaginatedContentResponse, PublishedContent, Targeting, TargetingDto, TargetingRequest,
};
use crate::modules::questions::model::{
    CreateQuestionDto, Question, QuestionList, QuestionType, QuestionView,
};
use crate::modules::students::model::{
    CreateStudentDto, PaginatedStudentsResponse, Student, StudentFilterParams, UpdateStudentDto,
};
use crate::modules::submissions::model::{
    AnswerRecord, Correctness, CreateSubmissionDto, GradeSubmissionDto,
    PaginatedSubmissionsResponse, Submission, SubmissionStatus, SubmittedAnswer,
};

/// Body of every error response.
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::academic_years::controller::create_academic_year,
        crate::modules::academic_years::controller::get_academic_years,
        crate::modules::academic_years::controller::get_current_academic_year,
        crate::modules::academic_years::controller::get_academic_year,
        crate::modules::academic_years::controller::update_academic_year,
        crate::modules::academic_years::controller::set_current_academic_year,
        crate::modules::academic_years::controller::get_terms,
        crate::modules::academic_years::controller::replace_terms,
        crate::modules::students::controller::create_student,
        crate::modules::students::controller::get_students,
        crate::modules::students::controller::get_student,
        crate::modules::students::controller::update_student,
        crate::modules::students::controller::delete_student,
        crate::modules::content::controller::create_content,
        crate::modules::content::controller::get_content,
        crate::modules::content::controller::get_my_content,
        crate::modules::content::controller::get_content_item,
        crate::modules::content::controller::get_recipients,
        crate::modules::content::controller::delete_content,
        crate::modules::questions::controller::add_question,
        crate::modules::questions::controller::get_questions,
        crate::modules::submissions::controller::create_submission,
        crate::modules::submissions::controller::get_submissions,
        crate::modules::submissions::controller::get_my_submission,
        crate::modules::submissions::controller::get_submission,
        crate::modules::submissions::controller::grade_submission,
    ),
    components(
        schemas(
            ErrorResponse,
            PaginationMeta,
            PaginationParams,
            AcademicYearId,
            TermId,
            UserId,
            ContentId,
            QuestionId,
            SubmissionId,
            AcademicYear,
            AcademicYearWithTerms,
            AssessmentWeights,
            CreateAcademicYearDto,
            UpdateAcademicYearDto,
            CurrentAcademicYearResponse,
            PaginatedAcademicYearsResponse,
            Term,
            TermInput,
            ReplaceTermsDto,
            ResolvedTerm,
            Student,
            CreateStudentDto,
            UpdateStudentDto,
            StudentFilterParams,
            PaginatedStudentsResponse,
            ContentKind,
            Targeting,
            TargetingDto,
            TargetingRequest,
            ContentItem,
            CreateContentDto,
            ContentFilterParams,
            PublishedContent,
            PaginatedContentResponse,
            ContentRecipientsResponse,
            QuestionType,
            Question,
            QuestionView,
            QuestionList,
            CreateQuestionDto,
            SubmissionStatus,
            Correctness,
            SubmittedAnswer,
            AnswerRecord,
            Submission,
            CreateSubmissionDto,
            GradeSubmissionDto,
            PaginatedSubmissionsResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Academic Years", description = "Academic years, terms and the current term"),
        (name = "Students", description = "Student directory"),
        (name = "Content", description = "Announcements, assignments and quizzes"),
        (name = "Questions", description = "Quiz questions"),
        (name = "Submissions", description = "Submissions and grading")
    ),
    info(
        title = "Schoolyard API",
        version = "0.1.0",
        description = "School calendar, content targeting and quiz grading API built with Rust, Axum, and PostgreSQL.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_route_is_documented() {
        let doc = ApiDoc::openapi();
        let paths: Vec<_> = doc.paths.paths.keys().cloned().collect();

        for expected in [
            "/api/academic-years",
            "/api/academic-years/current",
            "/api/academic-years/{id}/terms",
            "/api/students/{id}",
            "/api/content/mine",
            "/api/content/{id}/questions",
            "/api/content/{id}/submissions/mine",
            "/api/submissions/{id}/grade",
        ] {
            assert!(paths.iter().any(|p| p == expected), "{} missing", expected);
        }
    }

    #[test]
    fn test_bearer_scheme_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
