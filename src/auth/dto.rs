use serde::{Deserialize, Serialize};

/// Registration form fields.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default, rename = "confirmPassword")]
    pub confirm_password: String,
}

/// Login form fields.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Query for `GET /availability`.
#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub username: Option<String>,
    pub email: Option<String>,
}

/// Payload for `GET /availability`. The username fields only appear when a
/// username was supplied; neither reveals which account owns a taken value.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResponse {
    pub username_available: bool,
    pub email_available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username_valid: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username_message: Option<String>,
}
