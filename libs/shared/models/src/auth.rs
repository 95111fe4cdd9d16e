use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Access/refresh pair as issued by `POST /auth/jwt/create/`.
///
/// Tokens are opaque to the client; expiry is discovered through 401s,
/// never by decoding the JWT locally.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub dni: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RefreshRequest {
    pub refresh: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RefreshResponse {
    pub access: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[serde(alias = "nutritionist")]
    Nutricionista,
    #[serde(alias = "patient")]
    Paciente,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: i64,
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    pub role: Option<Role>,
    #[serde(default)]
    pub date_joined: Option<DateTime<Utc>>,
}

impl CurrentUser {
    pub fn full_name(&self) -> String {
        match (self.first_name.as_deref(), self.last_name.as_deref()) {
            (Some(first), Some(last)) => format!("{first} {last}"),
            (Some(first), None) => first.to_string(),
            (None, Some(last)) => last.to_string(),
            (None, None) => String::new(),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Some(Role::Admin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_accepts_spanish_and_english_spellings() {
        let role: Role = serde_json::from_str(r#""nutricionista""#).unwrap();
        assert_eq!(role, Role::Nutricionista);
        let role: Role = serde_json::from_str(r#""patient""#).unwrap();
        assert_eq!(role, Role::Paciente);
    }

    #[test]
    fn full_name_handles_missing_parts() {
        let user = CurrentUser {
            id: 1,
            email: Some("ana@example.com".to_string()),
            first_name: Some("Ana".to_string()),
            last_name: None,
            role: Some(Role::Paciente),
            date_joined: None,
        };
        assert_eq!(user.full_name(), "Ana");
    }
}
