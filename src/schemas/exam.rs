use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::{format_date, format_primitive};
use crate::db::models::Exam;
use crate::db::types::ExamStatus;
use crate::schemas::class::ClassSummary;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct ExamCreate {
    #[serde(default)]
    pub(crate) name: Option<String>,
    #[serde(default)]
    pub(crate) date: Option<String>,
    #[serde(default)]
    #[validate(range(min = 1, max = 3, message = "term must be between 1 and 3"))]
    pub(crate) term: Option<i32>,
    #[serde(default)]
    #[validate(range(min = 2000, message = "year must be a four-digit year"))]
    pub(crate) year: Option<i32>,
    #[serde(default)]
    pub(crate) status: Option<ExamStatus>,
    #[serde(default)]
    #[serde(alias = "classIds")]
    pub(crate) class_ids: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ExamResponse {
    pub(crate) exam_id: String,
    pub(crate) name: String,
    pub(crate) date: String,
    pub(crate) term: i32,
    pub(crate) year: i32,
    pub(crate) status: ExamStatus,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
    pub(crate) classes: Vec<ClassSummary>,
}

impl ExamResponse {
    pub(crate) fn from_db(exam: Exam, classes: Vec<ClassSummary>) -> Self {
        Self {
            exam_id: exam.exam_id,
            name: exam.name,
            date: format_date(exam.date),
            term: exam.term,
            year: exam.year,
            status: exam.status,
            created_at: format_primitive(exam.created_at),
            updated_at: format_primitive(exam.updated_at),
            classes,
        }
    }
}
