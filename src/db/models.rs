use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::{Date, PrimitiveDateTime};

use crate::db::types::{ExamStatus, ResultStatus, UserRole};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct School {
    pub(crate) school_id: String,
    pub(crate) name: String,
    pub(crate) location: Option<String>,
    pub(crate) username: String,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct User {
    pub(crate) user_id: String,
    pub(crate) first_name: String,
    pub(crate) last_name: String,
    pub(crate) phone_number: String,
    pub(crate) email: String,
    pub(crate) dob: Date,
    pub(crate) username: String,
    pub(crate) hashed_password: String,
    pub(crate) role: UserRole,
    pub(crate) school_id: Option<String>,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Class {
    pub(crate) class_id: String,
    pub(crate) class_level: i32,
    pub(crate) class_stream: String,
    pub(crate) school_id: Option<String>,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Student {
    pub(crate) student_adm_no: String,
    pub(crate) students_name: String,
    pub(crate) kcse_entry: f64,
    pub(crate) class_id: String,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Subject {
    pub(crate) subject_id: String,
    pub(crate) subject_name: String,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct StudentSubject {
    pub(crate) student_adm_no: String,
    pub(crate) subject_id: String,
    pub(crate) created_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Exam {
    pub(crate) exam_id: String,
    pub(crate) name: String,
    pub(crate) date: Date,
    pub(crate) term: i32,
    pub(crate) year: i32,
    pub(crate) status: ExamStatus,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

/// Publication state of one (class, exam, subject) results sheet. Created
/// lazily on the first publishing write; `version` increments on every
/// effective status change.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct ClassExamSubject {
    pub(crate) class_id: String,
    pub(crate) exam_id: String,
    pub(crate) subject_id: String,
    pub(crate) status: ResultStatus,
    pub(crate) version: i32,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct ExamResult {
    pub(crate) result_id: String,
    pub(crate) student_adm_no: String,
    pub(crate) exam_id: String,
    pub(crate) subject_id: String,
    pub(crate) class_id: String,
    pub(crate) marks: Option<f64>,
    pub(crate) percentage: Option<f64>,
    pub(crate) grade: Option<String>,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}
