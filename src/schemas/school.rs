use serde::{Deserialize, Serialize};

use crate::core::time::format_primitive;
use crate::db::models::School;
use crate::schemas::class::ClassResponse;

#[derive(Debug, Deserialize)]
pub(crate) struct SchoolCreate {
    #[serde(default)]
    pub(crate) name: Option<String>,
    #[serde(default)]
    pub(crate) location: Option<String>,
    #[serde(default)]
    #[serde(alias = "schoolUsername")]
    pub(crate) school_username: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SchoolUpdate {
    #[serde(default)]
    pub(crate) school_id: Option<String>,
    #[serde(default)]
    pub(crate) name: Option<String>,
    #[serde(default)]
    pub(crate) location: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SchoolResponse {
    pub(crate) school_id: String,
    pub(crate) name: String,
    pub(crate) location: Option<String>,
    pub(crate) username: String,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl SchoolResponse {
    pub(crate) fn from_db(school: School) -> Self {
        Self {
            school_id: school.school_id,
            name: school.name,
            location: school.location,
            username: school.username,
            created_at: format_primitive(school.created_at),
            updated_at: format_primitive(school.updated_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct SchoolWithClassesResponse {
    pub(crate) school_id: String,
    pub(crate) name: String,
    pub(crate) location: Option<String>,
    pub(crate) username: String,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
    pub(crate) classes: Vec<ClassResponse>,
}

impl SchoolWithClassesResponse {
    pub(crate) fn from_db(school: School, classes: Vec<ClassResponse>) -> Self {
        Self {
            school_id: school.school_id,
            name: school.name,
            location: school.location,
            username: school.username,
            created_at: format_primitive(school.created_at),
            updated_at: format_primitive(school.updated_at),
            classes,
        }
    }
}

/// Short school embed carried on user payloads.
#[derive(Debug, Serialize)]
pub(crate) struct SchoolSummary {
    pub(crate) school_id: String,
    pub(crate) name: String,
    pub(crate) location: Option<String>,
    pub(crate) username: String,
}
