use serde::{Deserialize, Serialize};

use crate::schemas::user::UserResponse;

#[derive(Debug, Deserialize)]
pub(crate) struct LoginRequest {
    #[serde(default)]
    #[serde(alias = "userName")]
    pub(crate) username: Option<String>,
    #[serde(default)]
    pub(crate) password: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct LoginResponse {
    pub(crate) success: bool,
    pub(crate) message: String,
    pub(crate) token: String,
    pub(crate) user: UserResponse,
}
