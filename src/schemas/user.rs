use serde::{Deserialize, Serialize};

use crate::core::time::{format_date, format_primitive};
use crate::db::models::User;
use crate::db::types::UserRole;
use crate::repositories::users::UserWithSchoolRow;
use crate::schemas::school::SchoolSummary;

#[derive(Debug, Deserialize)]
pub(crate) struct UserCreate {
    #[serde(default)]
    #[serde(alias = "firstName")]
    pub(crate) first_name: Option<String>,
    #[serde(default)]
    #[serde(alias = "lastName")]
    pub(crate) last_name: Option<String>,
    #[serde(default)]
    #[serde(alias = "phoneNumber")]
    pub(crate) phone_number: Option<String>,
    #[serde(default)]
    pub(crate) email: Option<String>,
    #[serde(default)]
    pub(crate) dob: Option<String>,
    #[serde(default)]
    #[serde(alias = "userName")]
    pub(crate) username: Option<String>,
    #[serde(default)]
    pub(crate) password: Option<String>,
    #[serde(default)]
    pub(crate) role: Option<UserRole>,
    #[serde(default)]
    #[serde(alias = "schoolId")]
    pub(crate) school_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct UserResponse {
    pub(crate) user_id: String,
    pub(crate) first_name: String,
    pub(crate) last_name: String,
    pub(crate) phone_number: String,
    pub(crate) email: String,
    pub(crate) dob: String,
    pub(crate) username: String,
    pub(crate) role: UserRole,
    pub(crate) school_id: Option<String>,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl UserResponse {
    pub(crate) fn from_db(user: User) -> Self {
        Self {
            user_id: user.user_id,
            first_name: user.first_name,
            last_name: user.last_name,
            phone_number: user.phone_number,
            email: user.email,
            dob: format_date(user.dob),
            username: user.username,
            role: user.role,
            school_id: user.school_id,
            created_at: format_primitive(user.created_at),
            updated_at: format_primitive(user.updated_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct UserWithSchoolResponse {
    pub(crate) user_id: String,
    pub(crate) first_name: String,
    pub(crate) last_name: String,
    pub(crate) phone_number: String,
    pub(crate) email: String,
    pub(crate) dob: String,
    pub(crate) username: String,
    pub(crate) role: UserRole,
    pub(crate) school_id: Option<String>,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
    pub(crate) school: Option<SchoolSummary>,
}

impl UserWithSchoolResponse {
    pub(crate) fn from_row(row: UserWithSchoolRow) -> Self {
        // The left join yields school columns only for attached users.
        let school = match (&row.school_id, row.school_name, row.school_username) {
            (Some(school_id), Some(name), Some(username)) => Some(SchoolSummary {
                school_id: school_id.clone(),
                name,
                location: row.school_location,
                username,
            }),
            _ => None,
        };
        Self {
            user_id: row.user_id,
            first_name: row.first_name,
            last_name: row.last_name,
            phone_number: row.phone_number,
            email: row.email,
            dob: format_date(row.dob),
            username: row.username,
            role: row.role,
            school_id: row.school_id,
            created_at: format_primitive(row.created_at),
            updated_at: format_primitive(row.updated_at),
            school,
        }
    }
}
