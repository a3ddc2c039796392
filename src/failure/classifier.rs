use super::payload::{ErrorBody, RawErrorPayload};
use super::rules::{lookup, FIELD_RULES, MESSAGE_RULES, STATUS_RULES};
use super::ErrorKind;
use tracing::trace;

/// Maps a rejected response to exactly one `ErrorKind`.
///
/// Order: status overrides, then the top-level message, then the per-field
/// lists in table order. Anything unrecognised is `UnknownServerError`.
#[must_use]
pub fn classify(status: u16, body: Option<&ErrorBody>) -> ErrorKind {
    let kind = classify_status(status)
        .or_else(|| body.and_then(classify_body))
        .unwrap_or(ErrorKind::UnknownServerError);
    trace!(status, kind = kind.code(), "classified rejected response");
    kind
}

/// Same as [`classify`] but starts from the raw response text.
#[must_use]
pub fn classify_raw(status: u16, raw_body: Option<&str>) -> ErrorKind {
    let payload = RawErrorPayload::from_raw(status, raw_body);
    classify_payload(&payload)
}

#[must_use]
pub fn classify_payload(payload: &RawErrorPayload) -> ErrorKind {
    classify(payload.status, payload.body.as_ref())
}

fn classify_status(status: u16) -> Option<ErrorKind> {
    STATUS_RULES
        .iter()
        .find(|(code, _)| *code == status)
        .map(|(_, kind)| *kind)
}

fn classify_body(body: &ErrorBody) -> Option<ErrorKind> {
    body.message
        .as_deref()
        .and_then(|message| lookup(MESSAGE_RULES, message))
        .or_else(|| classify_fields(body))
}

fn classify_fields(body: &ErrorBody) -> Option<ErrorKind> {
    FIELD_RULES.iter().find_map(|field| {
        body.field_messages(field.field)
            .find_map(|message| lookup(field.rules, message))
    })
}
