use serde::{Deserialize, Serialize};

use crate::core::time::format_primitive;
use crate::db::models::ExamResult;
use crate::db::types::ResultStatus;

#[derive(Debug, Deserialize)]
pub(crate) struct ResultsQuery {
    #[serde(default)]
    #[serde(alias = "classId")]
    pub(crate) class_id: Option<String>,
    #[serde(default)]
    #[serde(alias = "subjectId")]
    pub(crate) subject_id: Option<String>,
    #[serde(default)]
    #[serde(alias = "examId")]
    pub(crate) exam_id: Option<String>,
}

/// One marks entry in a bulk save. `percentage` may be omitted; the handler
/// derives it from `marks` and the batch-level `out_of` in that case.
#[derive(Debug, Deserialize)]
pub(crate) struct ResultEntry {
    #[serde(alias = "studentAdmNo")]
    pub(crate) student_adm_no: String,
    #[serde(default)]
    pub(crate) marks: Option<f64>,
    #[serde(default)]
    pub(crate) percentage: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BulkUpdatePayload {
    #[serde(default)]
    #[serde(alias = "examId")]
    pub(crate) exam_id: Option<String>,
    #[serde(default)]
    #[serde(alias = "subjectId")]
    pub(crate) subject_id: Option<String>,
    #[serde(default)]
    #[serde(alias = "classId")]
    pub(crate) class_id: Option<String>,
    #[serde(default)]
    #[serde(alias = "outOf")]
    pub(crate) out_of: Option<f64>,
    #[serde(default)]
    pub(crate) updates: Option<Vec<ResultEntry>>,
    #[serde(default)]
    pub(crate) publish: Option<bool>,
    #[serde(default)]
    #[serde(alias = "statusVersion")]
    pub(crate) status_version: Option<i32>,
}

#[derive(Debug, Serialize)]
pub(crate) struct StudentRef {
    pub(crate) student_adm_no: String,
    pub(crate) student_name: String,
}

/// One editable sheet row. Students without a stored result appear with a
/// null `result_id` and null marks.
#[derive(Debug, Serialize)]
pub(crate) struct ResultRow {
    pub(crate) result_id: Option<String>,
    pub(crate) student_adm_no: String,
    pub(crate) student: StudentRef,
    pub(crate) marks: Option<f64>,
    pub(crate) percentage: Option<f64>,
    pub(crate) grade: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SheetMetadata {
    #[serde(rename = "classExamStatus")]
    pub(crate) class_exam_status: ResultStatus,
    #[serde(rename = "statusVersion")]
    pub(crate) status_version: i32,
}

#[derive(Debug, Serialize)]
pub(crate) struct ResultsForEditingResponse {
    pub(crate) results: Vec<ResultRow>,
    pub(crate) metadata: SheetMetadata,
}

#[derive(Debug, Serialize)]
pub(crate) struct ExamResultResponse {
    pub(crate) result_id: String,
    pub(crate) student_adm_no: String,
    pub(crate) exam_id: String,
    pub(crate) subject_id: String,
    pub(crate) class_id: String,
    pub(crate) marks: Option<f64>,
    pub(crate) percentage: Option<f64>,
    pub(crate) grade: Option<String>,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl ExamResultResponse {
    pub(crate) fn from_db(result: ExamResult) -> Self {
        Self {
            result_id: result.result_id,
            student_adm_no: result.student_adm_no,
            exam_id: result.exam_id,
            subject_id: result.subject_id,
            class_id: result.class_id,
            marks: result.marks,
            percentage: result.percentage,
            grade: result.grade,
            created_at: format_primitive(result.created_at),
            updated_at: format_primitive(result.updated_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct BulkUpdateResponse {
    pub(crate) message: String,
    #[serde(rename = "updatedResults")]
    pub(crate) updated_results: Vec<ExamResultResponse>,
}
