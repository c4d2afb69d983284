//! Name validation.
//!
//! Raw text (one name per line) is turned into [`NameString`]s here. A name is
//! trimmed, optionally upper-cased, and must then consist solely of `A-Z`,
//! `0-9`, spaces and hyphens, with at most [`MAX_NAME_LENGTH`] characters.

use crate::error::{ValidationError, ValidationReason};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Default maximum number of characters in one name.
pub const MAX_NAME_LENGTH: usize = 14;

/// Whether `ch` may appear in a [`NameString`].
pub fn is_allowed_char(ch: char) -> bool {
    ch.is_ascii_uppercase() || ch.is_ascii_digit() || ch == ' ' || ch == '-'
}

/// A validated, immutable tag name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NameString(String);

impl NameString {
    /// Validate a single name against `max_length`.
    ///
    /// The text is trimmed but not upper-cased; use [`NameValidator`] for that.
    pub fn parse(text: &str, max_length: usize) -> Result<Self, ValidationReason> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ValidationReason::Empty);
        }

        let length = trimmed.chars().count();
        if length > max_length {
            return Err(ValidationReason::TooLong {
                length,
                max: max_length,
            });
        }

        let mut invalid = Vec::new();
        for ch in trimmed.chars().filter(|c| !is_allowed_char(*c)) {
            if !invalid.contains(&ch) {
                invalid.push(ch);
            }
        }
        if !invalid.is_empty() {
            return Err(ValidationReason::InvalidChars { invalid });
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn chars(&self) -> std::str::Chars<'_> {
        self.0.chars()
    }

    /// Number of characters.
    pub fn len(&self) -> usize {
        self.0.chars().count()
    }

    /// Always false; kept for clippy's `len_without_is_empty`.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// File-name friendly form: spaces become underscores.
    pub fn file_stem(&self) -> String {
        self.0.replace(' ', "_")
    }
}

impl fmt::Display for NameString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NameString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for NameString {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NameString::parse(&raw, MAX_NAME_LENGTH).map_err(serde::de::Error::custom)
    }
}

/// Every accepted name and every rejected line of one input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    pub names: Vec<NameString>,
    pub errors: Vec<ValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty() && !self.names.is_empty()
    }
}

/// Turns raw multi-line input into names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NameValidator {
    /// Maximum characters per name
    pub max_length: usize,
    /// Upper-case each line before checking the character set
    pub auto_uppercase: bool,
}

impl Default for NameValidator {
    fn default() -> Self {
        Self {
            max_length: MAX_NAME_LENGTH,
            auto_uppercase: true,
        }
    }
}

impl NameValidator {
    pub fn new(max_length: usize, auto_uppercase: bool) -> Self {
        Self {
            max_length,
            auto_uppercase,
        }
    }

    /// Validate one name.
    pub fn validate_name(&self, text: &str) -> Result<NameString, ValidationReason> {
        if self.auto_uppercase {
            NameString::parse(&text.to_uppercase(), self.max_length)
        } else {
            NameString::parse(text, self.max_length)
        }
    }

    /// Validate every non-blank line and stop at the first rejected one.
    ///
    /// Input with no names at all is rejected as `Empty` on line 1.
    pub fn validate(&self, raw: &str) -> Result<Vec<NameString>, ValidationError> {
        let mut names = Vec::new();
        for (index, line) in raw.split('\n').enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match self.validate_name(line) {
                Ok(name) => names.push(name),
                Err(reason) => return Err(ValidationError::new(index + 1, reason, line)),
            }
        }

        if names.is_empty() {
            return Err(ValidationError::new(1, ValidationReason::Empty, ""));
        }

        debug!("Validated {} names", names.len());
        Ok(names)
    }

    /// Validate every non-blank line and collect all problems.
    pub fn validate_all(&self, raw: &str) -> ValidationReport {
        let mut report = ValidationReport::default();
        for (index, line) in raw.split('\n').enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match self.validate_name(line) {
                Ok(name) => report.names.push(name),
                Err(reason) => report
                    .errors
                    .push(ValidationError::new(index + 1, reason, line)),
            }
        }

        if report.names.is_empty() && report.errors.is_empty() {
            report
                .errors
                .push(ValidationError::new(1, ValidationReason::Empty, ""));
        }
        report
    }

    /// Validate names that are already split, e.g. command-line arguments.
    pub fn validate_list<S: AsRef<str>>(
        &self,
        items: &[S],
    ) -> Result<Vec<NameString>, ValidationError> {
        let joined: Vec<&str> = items.iter().map(|s| s.as_ref()).collect();
        self.validate(&joined.join("\n"))
    }
}
