use std::collections::BTreeMap;

use serde_json::Value;
use thiserror::Error;

/// Client-side error taxonomy for every API-calling operation.
///
/// Callers translate these into user-visible text via [`ApiError::user_message`];
/// nothing is allowed to propagate past a rendering boundary unhandled.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Field-level validation rejection (DRF-style 400/422 body).
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field_errors: BTreeMap<String, Vec<String>>,
    },

    /// Domain/policy rejection. The server's message is carried verbatim.
    #[error("{0}")]
    Domain(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Unexpected response ({status}): {body}")]
    Unexpected { status: u16, body: String },
}

impl ApiError {
    /// Classify a non-2xx response from its status and raw body.
    ///
    /// Mirrors the message extraction order the server's clients rely on:
    /// `error`, then `detail`, then `non_field_errors[0]`, then field maps.
    pub fn from_response(status: u16, body: &str) -> Self {
        let parsed: Option<Value> = serde_json::from_str(body).ok();

        if status == 401 {
            let msg = parsed
                .as_ref()
                .and_then(extract_message)
                .unwrap_or_else(|| "Authentication required".to_string());
            return ApiError::Auth(msg);
        }

        if let Some(value) = parsed {
            if let Some(msg) = extract_message(&value) {
                return ApiError::Domain(msg);
            }

            if matches!(status, 400 | 422) {
                if let Some(field_errors) = extract_field_errors(&value) {
                    let message = field_errors
                        .iter()
                        .next()
                        .map(|(field, errors)| match errors.first() {
                            Some(e) => format!("{field}: {e}"),
                            None => field.clone(),
                        })
                        .unwrap_or_else(|| "Invalid request".to_string());
                    return ApiError::Validation {
                        message,
                        field_errors,
                    };
                }
            }
        }

        ApiError::Unexpected {
            status,
            body: body.to_string(),
        }
    }

    /// First available human-readable message, regardless of variant.
    pub fn first_message(&self) -> String {
        match self {
            ApiError::Validation { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    /// Text suitable for direct display to the user.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Auth(_) => "Tu sesión expiró. Iniciá sesión nuevamente.".to_string(),
            ApiError::Validation { message, .. } => message.clone(),
            ApiError::Domain(msg) => msg.clone(),
            ApiError::Network(_) => {
                "Error de conexión. Por favor intenta nuevamente.".to_string()
            }
            ApiError::Unexpected { .. } => {
                "Ocurrió un error inesperado. Por favor intenta nuevamente.".to_string()
            }
        }
    }

    pub fn is_auth(&self) -> bool {
        matches!(self, ApiError::Auth(_))
    }
}

fn extract_message(value: &Value) -> Option<String> {
    for key in ["error", "detail"] {
        if let Some(msg) = value.get(key).and_then(Value::as_str) {
            return Some(msg.to_string());
        }
    }
    value
        .get("non_field_errors")
        .and_then(Value::as_array)
        .and_then(|errors| errors.first())
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn extract_field_errors(value: &Value) -> Option<BTreeMap<String, Vec<String>>> {
    let object = value.as_object()?;
    let mut field_errors = BTreeMap::new();

    for (field, errors) in object {
        match errors {
            Value::String(msg) => {
                field_errors.insert(field.clone(), vec![msg.clone()]);
            }
            Value::Array(messages) => {
                let messages: Vec<String> = messages
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect();
                if !messages.is_empty() {
                    field_errors.insert(field.clone(), messages);
                }
            }
            _ => {}
        }
    }

    if field_errors.is_empty() {
        None
    } else {
        Some(field_errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_401_as_auth() {
        let err = ApiError::from_response(401, r#"{"detail": "Token inválido"}"#);
        match err {
            ApiError::Auth(msg) => assert_eq!(msg, "Token inválido"),
            other => panic!("expected Auth, got {other:?}"),
        }
    }

    #[test]
    fn domain_message_is_carried_verbatim() {
        let body = r#"{"error": "Se requiere reservar con al menos 2 horas de anticipación."}"#;
        let err = ApiError::from_response(400, body);
        match err {
            ApiError::Domain(msg) => {
                assert_eq!(msg, "Se requiere reservar con al menos 2 horas de anticipación.")
            }
            other => panic!("expected Domain, got {other:?}"),
        }
    }

    #[test]
    fn non_field_errors_take_first_entry() {
        let body = r#"{"non_field_errors": ["El horario seleccionado no está disponible."]}"#;
        let err = ApiError::from_response(400, body);
        match err {
            ApiError::Domain(msg) => {
                assert_eq!(msg, "El horario seleccionado no está disponible.")
            }
            other => panic!("expected Domain, got {other:?}"),
        }
    }

    #[test]
    fn field_map_becomes_validation() {
        let body = r#"{"email": ["Enter a valid email address."], "nombre_completo": ["This field is required."]}"#;
        let err = ApiError::from_response(400, body);
        match err {
            ApiError::Validation {
                message,
                field_errors,
            } => {
                assert_eq!(message, "email: Enter a valid email address.");
                assert_eq!(field_errors.len(), 2);
                assert_eq!(
                    field_errors["nombre_completo"],
                    vec!["This field is required.".to_string()]
                );
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn unparseable_body_is_unexpected() {
        let err = ApiError::from_response(500, "<html>gateway</html>");
        match err {
            ApiError::Unexpected { status, .. } => assert_eq!(status, 500),
            other => panic!("expected Unexpected, got {other:?}"),
        }
    }
}
