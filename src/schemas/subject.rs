use serde::{Deserialize, Serialize};

use crate::core::time::format_primitive;
use crate::db::models::{StudentSubject, Subject};
use crate::schemas::student::StudentSummary;

#[derive(Debug, Deserialize)]
pub(crate) struct SubjectCreate {
    #[serde(default)]
    #[serde(alias = "subjectName")]
    pub(crate) subject_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SubjectResponse {
    pub(crate) subject_id: String,
    pub(crate) subject_name: String,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl SubjectResponse {
    pub(crate) fn from_db(subject: Subject) -> Self {
        Self {
            subject_id: subject.subject_id,
            subject_name: subject.subject_name,
            created_at: format_primitive(subject.created_at),
            updated_at: format_primitive(subject.updated_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct SubjectWithStudentsResponse {
    pub(crate) subject_id: String,
    pub(crate) subject_name: String,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
    pub(crate) students: Vec<StudentSummary>,
}

impl SubjectWithStudentsResponse {
    pub(crate) fn from_db(subject: Subject, students: Vec<StudentSummary>) -> Self {
        Self {
            subject_id: subject.subject_id,
            subject_name: subject.subject_name,
            created_at: format_primitive(subject.created_at),
            updated_at: format_primitive(subject.updated_at),
            students,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct AssignSubject {
    #[serde(default)]
    #[serde(alias = "studentAdmNo")]
    pub(crate) student_adm_no: Option<String>,
    #[serde(default)]
    #[serde(alias = "subjectId")]
    pub(crate) subject_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct AssignmentResponse {
    pub(crate) student_adm_no: String,
    pub(crate) subject_id: String,
    pub(crate) created_at: String,
}

impl AssignmentResponse {
    pub(crate) fn from_db(assignment: StudentSubject) -> Self {
        Self {
            student_adm_no: assignment.student_adm_no,
            subject_id: assignment.subject_id,
            created_at: format_primitive(assignment.created_at),
        }
    }
}
