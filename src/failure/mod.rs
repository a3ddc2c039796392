#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

pub mod classifier;
pub mod payload;
pub mod rules;


pub use classifier::{classify, classify_payload, classify_raw};
pub use payload::{ErrorBody, RawErrorPayload};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Closed set of domain-level failure categories.
///
/// Compared by variant; display text is for logs, not for end users.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    #[error("network is not reachable")]
    NoConnectivity,
    #[error("unknown server error")]
    UnknownServerError,
    #[error("token expired or invalid")]
    TokenExpired,
    #[error("invalid credentials")]
    AuthError,
    #[error("email already exists")]
    EmailAlreadyExists,
    #[error("nickname already exists")]
    NicknameAlreadyExists,
    #[error("contact is already a friend")]
    AlreadyFriendError,
    #[error("friend request already sent")]
    AlreadyRequestedFriendError,
    #[error("contact not found")]
    ContactNotFoundError,
    #[error("comment already reported")]
    AlreadyReportCommentError,
    #[error("project already reported")]
    AlreadyReportProjectError,
    #[error("email already confirmed")]
    EmailAlreadyConfirmedError,
    #[error("email confirmation failed")]
    EmailConfirmationError,
}

impl ErrorKind {
    pub const ALL: [Self; 13] = [
        Self::NoConnectivity,
        Self::UnknownServerError,
        Self::TokenExpired,
        Self::AuthError,
        Self::EmailAlreadyExists,
        Self::NicknameAlreadyExists,
        Self::AlreadyFriendError,
        Self::AlreadyRequestedFriendError,
        Self::ContactNotFoundError,
        Self::AlreadyReportCommentError,
        Self::AlreadyReportProjectError,
        Self::EmailAlreadyConfirmedError,
        Self::EmailConfirmationError,
    ];

    /// Stable machine-readable code, used in log fields.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::NoConnectivity => "NO_CONNECTIVITY",
            Self::UnknownServerError => "UNKNOWN_SERVER_ERROR",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::AuthError => "AUTH_ERROR",
            Self::EmailAlreadyExists => "EMAIL_ALREADY_EXISTS",
            Self::NicknameAlreadyExists => "NICKNAME_ALREADY_EXISTS",
            Self::AlreadyFriendError => "ALREADY_FRIEND",
            Self::AlreadyRequestedFriendError => "ALREADY_REQUESTED_FRIEND",
            Self::ContactNotFoundError => "CONTACT_NOT_FOUND",
            Self::AlreadyReportCommentError => "ALREADY_REPORTED_COMMENT",
            Self::AlreadyReportProjectError => "ALREADY_REPORTED_PROJECT",
            Self::EmailAlreadyConfirmedError => "EMAIL_ALREADY_CONFIRMED",
            Self::EmailConfirmationError => "EMAIL_CONFIRMATION_FAILED",
        }
    }

    /// True when the server was never reached.
    #[must_use]
    pub const fn is_connectivity(&self) -> bool {
        matches!(self, Self::NoConnectivity)
    }
}
