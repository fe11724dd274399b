// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Checks run before anything is sent to the backend.

use crate::session::SignupDraft;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

pub const PASSWORD_SPECIALS: &str = "!@#$%^&*-+";

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("static email pattern"));

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Password must be at least 8 characters long.")]
    PasswordTooShort,
    #[error("Password must contain at least one lowercase letter.")]
    PasswordNoLowercase,
    #[error("Password can only contain the following special characters: !@#$%^&*-+")]
    PasswordBadCharacter,
    #[error("Password must contain at least one number.")]
    PasswordNoDigit,
    #[error("Please enter a valid email format.")]
    BadEmail,
    #[error("The input does not match the branch name.")]
    ConfirmationMismatch,
    #[error("Please verify your email first.")]
    EmailNotVerified,
    #[error("Passwords do not match.")]
    PasswordMismatch,
}

/// Reports only the first rule that fails.
pub fn validate_password(pw: &str) -> Result<(), ValidationError> {
    if pw.chars().count() < 8 {
        return Err(ValidationError::PasswordTooShort);
    }
    if !pw.chars().any(|c| c.is_ascii_lowercase()) {
        return Err(ValidationError::PasswordNoLowercase);
    }
    if !pw
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || PASSWORD_SPECIALS.contains(c))
    {
        return Err(ValidationError::PasswordBadCharacter);
    }
    if !pw.chars().any(|c| c.is_ascii_digit()) {
        return Err(ValidationError::PasswordNoDigit);
    }
    Ok(())
}

pub fn validate_new_password(pw: &str, confirm: &str) -> Result<(), ValidationError> {
    validate_password(pw)?;
    if pw != confirm {
        return Err(ValidationError::PasswordMismatch);
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if EMAIL_RE.is_match(email) {
        Ok(())
    } else {
        Err(ValidationError::BadEmail)
    }
}

/// Deletion goes ahead only when the typed name matches exactly.
pub fn confirm_deletion(input: &str, branch_name: &str) -> Result<(), ValidationError> {
    if input == branch_name {
        Ok(())
    } else {
        Err(ValidationError::ConfirmationMismatch)
    }
}

pub fn ensure_verified(draft: &SignupDraft, email: &str) -> Result<(), ValidationError> {
    if draft.verified && draft.email.as_deref() == Some(email) {
        Ok(())
    } else {
        Err(ValidationError::EmailNotVerified)
    }
}
