use serde::{Deserialize, Serialize};

use crate::domain::{RegistrationForm, SearchResultItem};

pub const REGISTER_PATH: &str = "/api/auth/register";
pub const SEARCH_PATH: &str = "/api/search";

/// Body of `POST /api/auth/register`. The confirmation field never leaves the client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl From<&RegistrationForm> for RegisterRequest {
    fn from(form: &RegistrationForm) -> Self {
        Self {
            username: form.username.clone(),
            email: form.email.clone(),
            password: form.password.clone(),
        }
    }
}

/// Body of a successful `GET /api/search`. `results` is optional on the wire;
/// absence and emptiness are both reported to the caller as "no results".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Option<Vec<SearchResultItem>>,
}
