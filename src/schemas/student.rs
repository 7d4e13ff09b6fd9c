use serde::{Deserialize, Serialize};

use crate::core::time::format_primitive;
use crate::db::models::Student;
use crate::repositories::students::StudentWithClassRow;
use crate::schemas::class::ClassSummary;

#[derive(Debug, Deserialize)]
pub(crate) struct StudentCreate {
    #[serde(default)]
    #[serde(alias = "studentAdmNo")]
    pub(crate) student_adm_no: Option<String>,
    #[serde(default)]
    #[serde(alias = "studentsName")]
    pub(crate) students_name: Option<String>,
    #[serde(default)]
    #[serde(alias = "kcseEntry")]
    pub(crate) kcse_entry: Option<f64>,
    #[serde(default)]
    #[serde(alias = "classId")]
    pub(crate) class_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct StudentResponse {
    pub(crate) student_adm_no: String,
    pub(crate) students_name: String,
    pub(crate) kcse_entry: f64,
    pub(crate) class_id: String,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl StudentResponse {
    pub(crate) fn from_db(student: Student) -> Self {
        Self {
            student_adm_no: student.student_adm_no,
            students_name: student.students_name,
            kcse_entry: student.kcse_entry,
            class_id: student.class_id,
            created_at: format_primitive(student.created_at),
            updated_at: format_primitive(student.updated_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct StudentWithClassResponse {
    pub(crate) student_adm_no: String,
    pub(crate) students_name: String,
    pub(crate) kcse_entry: f64,
    pub(crate) class_id: String,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
    pub(crate) class: ClassSummary,
}

impl StudentWithClassResponse {
    pub(crate) fn from_row(row: StudentWithClassRow) -> Self {
        Self {
            student_adm_no: row.student_adm_no,
            students_name: row.students_name,
            kcse_entry: row.kcse_entry,
            class_id: row.class_id.clone(),
            created_at: format_primitive(row.created_at),
            updated_at: format_primitive(row.updated_at),
            class: ClassSummary {
                class_id: row.class_id,
                class_level: row.class_level,
                class_stream: row.class_stream,
                school_id: row.school_id,
            },
        }
    }
}

/// Short student embed carried on subject enrolment payloads.
#[derive(Debug, Serialize)]
pub(crate) struct StudentSummary {
    pub(crate) student_adm_no: String,
    pub(crate) students_name: String,
    pub(crate) kcse_entry: f64,
    pub(crate) class_id: String,
}
