use serde::{Deserialize, Serialize};

use crate::core::time::format_primitive;
use crate::db::models::Class;

#[derive(Debug, Deserialize)]
pub(crate) struct ClassCreate {
    #[serde(default)]
    #[serde(alias = "classLevel")]
    pub(crate) class_level: Option<i32>,
    #[serde(default)]
    #[serde(alias = "classStream")]
    pub(crate) class_stream: Option<String>,
    #[serde(default)]
    #[serde(alias = "schoolId")]
    pub(crate) school_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ClassResponse {
    pub(crate) class_id: String,
    pub(crate) class_level: i32,
    pub(crate) class_stream: String,
    pub(crate) school_id: Option<String>,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl ClassResponse {
    pub(crate) fn from_db(class: Class) -> Self {
        Self {
            class_id: class.class_id,
            class_level: class.class_level,
            class_stream: class.class_stream,
            school_id: class.school_id,
            created_at: format_primitive(class.created_at),
            updated_at: format_primitive(class.updated_at),
        }
    }
}

/// Short class embed carried on student payloads.
#[derive(Debug, Serialize)]
pub(crate) struct ClassSummary {
    pub(crate) class_id: String,
    pub(crate) class_level: i32,
    pub(crate) class_stream: String,
    pub(crate) school_id: Option<String>,
}
