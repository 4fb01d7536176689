//! Ordered classification rules
//!
//! Several predicates can hold for the same error (a `ConflictError` that
//! also carries `statusCode: 400` is a validation error). The table is
//! evaluated top to bottom and the first match wins, so the order below is
//! part of the contract. The last rule always matches.

use super::{ErrorKind, RawError};
use crate::driver::DRIVER_CODE_PREFIX;

/// One row of the decision table
pub(crate) struct Rule {
    pub kind: ErrorKind,
    pub matches: fn(&RawError) -> bool,
}

pub(crate) const RULES: &[Rule] = &[
    Rule {
        kind: ErrorKind::Validation,
        matches: is_validation,
    },
    Rule {
        kind: ErrorKind::Authentication,
        matches: is_authentication,
    },
    Rule {
        kind: ErrorKind::TokenExpired,
        matches: is_token_expired,
    },
    Rule {
        kind: ErrorKind::Authorization,
        matches: is_authorization,
    },
    Rule {
        kind: ErrorKind::NotFound,
        matches: is_not_found,
    },
    Rule {
        kind: ErrorKind::Conflict,
        matches: is_conflict,
    },
    Rule {
        kind: ErrorKind::Database,
        matches: is_database,
    },
    Rule {
        kind: ErrorKind::Operational,
        matches: is_operational,
    },
    Rule {
        kind: ErrorKind::Unknown,
        matches: always,
    },
];

/// First matching kind for `error`.
pub(crate) fn first_match(error: &RawError) -> ErrorKind {
    RULES
        .iter()
        .find(|rule| (rule.matches)(error))
        .map_or(ErrorKind::Unknown, |rule| rule.kind)
}

// Rule 2 also catches anything that merely carries status 400.
fn is_validation(e: &RawError) -> bool {
    e.has_name("ValidationError") || e.incoming_status() == 400
}

fn is_authentication(e: &RawError) -> bool {
    e.has_name("AuthenticationError") || e.has_name("JsonWebTokenError")
}

fn is_token_expired(e: &RawError) -> bool {
    e.has_name("TokenExpiredError")
}

fn is_authorization(e: &RawError) -> bool {
    e.has_name("AuthorizationError") || e.incoming_status() == 403
}

fn is_not_found(e: &RawError) -> bool {
    e.has_name("NotFoundError") || e.incoming_status() == 404
}

fn is_conflict(e: &RawError) -> bool {
    e.has_name("ConflictError") || e.incoming_status() == 409
}

fn is_database(e: &RawError) -> bool {
    e.is_database
        || e
            .code
            .as_deref()
            .is_some_and(|code| code.starts_with(DRIVER_CODE_PREFIX))
}

fn is_operational(e: &RawError) -> bool {
    e.is_operational
}

fn always(_: &RawError) -> bool {
    true
}
