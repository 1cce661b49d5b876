//! SendGrid wire types

use serde::Deserialize;

/// Error body returned by the v3 API.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct SendgridErrorBody {
    #[serde(default)]
    pub errors: Vec<SendgridErrorItem>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SendgridErrorItem {
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default)]
    pub message: String,
}

impl SendgridErrorBody {
    /// First error message, prefixed with its field when one is named.
    pub fn summary(&self) -> Option<String> {
        self.errors.first().map(|e| match e.field.as_deref() {
            Some(field) if !field.is_empty() => format!("{field}: {}", e.message),
            _ => e.message.clone(),
        })
    }

    /// Field of the first error, if any.
    pub fn first_field(&self) -> Option<&str> {
        self.errors.first().and_then(|e| e.field.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_with_field() {
        let body: SendgridErrorBody = serde_json::from_str(
            r#"{"errors":[{"field":"domain","message":"is invalid"},{"field":null,"message":"x"}]}"#,
        )
        .unwrap();
        assert_eq!(body.summary().as_deref(), Some("domain: is invalid"));
        assert_eq!(body.first_field(), Some("domain"));
    }

    #[test]
    fn summary_without_field() {
        let body: SendgridErrorBody =
            serde_json::from_str(r#"{"errors":[{"message":"authorization required"}]}"#).unwrap();
        assert_eq!(body.summary().as_deref(), Some("authorization required"));
    }

    #[test]
    fn empty_body() {
        let body: SendgridErrorBody = serde_json::from_str("{}").unwrap();
        assert_eq!(body.summary(), None);
    }
}
