//! Phrase tables used by the classifier.
//!
//! Extending the taxonomy means adding rows here; the classifier walks the
//! tables in order and never branches on individual phrases.

use super::ErrorKind;

/// A server phrase and the kind it maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhraseRule {
    pub phrase: &'static str,
    pub kind: ErrorKind,
}

impl PhraseRule {
    const fn new(phrase: &'static str, kind: ErrorKind) -> Self {
        Self { phrase, kind }
    }

    #[must_use]
    pub fn matches(&self, message: &str) -> bool {
        self.phrase == message
    }
}

/// Phrases recognised for one field of the per-field error map.
#[derive(Debug, Clone, Copy)]
pub struct FieldRules {
    pub field: &'static str,
    pub rules: &'static [PhraseRule],
}

/// Status codes that classify ahead of any body inspection.
pub const STATUS_RULES: &[(u16, ErrorKind)] = &[(401, ErrorKind::TokenExpired)];

pub const MESSAGE_RULES: &[PhraseRule] = &[
    PhraseRule::new("there is a user has this email", ErrorKind::EmailAlreadyExists),
    PhraseRule::new("email already exists", ErrorKind::EmailAlreadyExists),
    PhraseRule::new("error in email or password", ErrorKind::AuthError),
    PhraseRule::new("invalid_token", ErrorKind::TokenExpired),
    PhraseRule::new(
        "this contact is already in your friends list",
        ErrorKind::AlreadyFriendError,
    ),
    PhraseRule::new(
        "already found in your friend requests",
        ErrorKind::AlreadyRequestedFriendError,
    ),
    PhraseRule::new(
        "you requested adding this friend before",
        ErrorKind::AlreadyRequestedFriendError,
    ),
    PhraseRule::new("No Contact has this email", ErrorKind::ContactNotFoundError),
];

const DUPLICATE_EMAIL: &str = "Данный email уже занят";
const DUPLICATE_NICKNAME: &str = "Данный Никнейм уже занят";

/// Scanned in this order; the first field with a matching message decides.
pub const FIELD_RULES: &[FieldRules] = &[
    FieldRules {
        field: "email",
        rules: &[PhraseRule::new(DUPLICATE_EMAIL, ErrorKind::EmailAlreadyExists)],
    },
    FieldRules {
        field: "nickname",
        rules: &[PhraseRule::new(
            DUPLICATE_NICKNAME,
            ErrorKind::NicknameAlreadyExists,
        )],
    },
    FieldRules {
        field: "id",
        rules: &[
            PhraseRule::new(
                "Жалоба на данный комментарий уже отправлена",
                ErrorKind::AlreadyReportCommentError,
            ),
            PhraseRule::new(DUPLICATE_NICKNAME, ErrorKind::NicknameAlreadyExists),
            PhraseRule::new(
                "Жалоба на данный проект уже отправлена",
                ErrorKind::AlreadyReportProjectError,
            ),
        ],
    },
    FieldRules {
        field: "userId",
        rules: &[PhraseRule::new(
            "Email пользователя уже подтверждён",
            ErrorKind::EmailAlreadyConfirmedError,
        )],
    },
    FieldRules {
        field: "code",
        rules: &[PhraseRule::new(
            "Ошибка подтверждения email",
            ErrorKind::EmailConfirmationError,
        )],
    },
];

#[must_use]
pub fn lookup(rules: &[PhraseRule], message: &str) -> Option<ErrorKind> {
    rules
        .iter()
        .find(|rule| rule.matches(message))
        .map(|rule| rule.kind)
}
