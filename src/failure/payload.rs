use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Structured error body as servers send it.
///
/// `{"message": "...", "errors": {"email": ["..."], "userId": ["..."]}}`
///
/// Entries under `errors` are kept as raw JSON; only string items of array
/// entries ever count as field messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub errors: Option<Map<String, Value>>,
}

impl ErrorBody {
    #[must_use]
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            errors: None,
        }
    }

    #[must_use]
    pub fn with_field_error(mut self, field: impl Into<String>, message: impl Into<String>) -> Self {
        let entry = self
            .errors
            .get_or_insert_with(Map::new)
            .entry(field.into())
            .or_insert_with(|| Value::Array(Vec::new()));
        match entry {
            Value::Array(items) => items.push(Value::String(message.into())),
            other => *other = Value::Array(vec![Value::String(message.into())]),
        }
        self
    }

    /// String messages listed under `field`; `null`, scalars and objects yield nothing.
    pub fn field_messages<'a>(&'a self, field: &str) -> impl Iterator<Item = &'a str> + 'a {
        self.errors
            .as_ref()
            .and_then(|errors| errors.get(field))
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(Value::as_str)
    }

    /// Parses a raw body; anything that is not a JSON object of this shape is `None`.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        serde_json::from_str(raw).ok()
    }
}

/// A rejected transport response: status code plus the body, if one parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawErrorPayload {
    pub status: u16,
    pub body: Option<ErrorBody>,
}

impl RawErrorPayload {
    #[must_use]
    pub fn from_raw(status: u16, raw_body: Option<&str>) -> Self {
        Self {
            status,
            body: raw_body.and_then(ErrorBody::parse),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_messages_skip_non_string_and_non_array_entries() {
        let body = ErrorBody::parse(
            r#"{"errors": {"email": null, "avatar": "too large", "meta": {"trace": 1},
                "id": [3, "Жалоба на данный проект уже отправлена", null]}}"#,
        )
        .unwrap_or_default();

        assert_eq!(body.field_messages("email").count(), 0);
        assert_eq!(body.field_messages("avatar").count(), 0);
        assert_eq!(body.field_messages("meta").count(), 0);
        assert_eq!(
            body.field_messages("id").collect::<Vec<_>>(),
            vec!["Жалоба на данный проект уже отправлена"]
        );
    }

    #[test]
    fn errors_set_to_null_parse_as_absent() {
        let body = ErrorBody::parse(r#"{"message": "teapot", "errors": null}"#);
        assert_eq!(
            body,
            Some(ErrorBody {
                message: Some("teapot".to_string()),
                errors: None,
            })
        );
    }
}
