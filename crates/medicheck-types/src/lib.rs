//! Validated value types shared by the MediCheck crates.
//!
//! Patient records are typed in by hand at a console prompt and stored one per line in CSV
//! files, so free text is trimmed and kept to a single line, and ages are bounded before they
//! ever reach a record.

use std::fmt;
use std::str::FromStr;

/// Maximum number of characters accepted for a single text field.
pub const MAX_TEXT_LEN: usize = 200;

/// Largest age accepted for a patient, in whole years.
pub const MAX_AGE: u8 = 150;

/// Errors that can occur when creating validated text types.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("text cannot be empty")]
    Empty,

    /// The input text spans more than one line
    #[error("text must be a single line")]
    MultiLine,

    /// The trimmed input is longer than [`MAX_TEXT_LEN`] characters
    #[error("text exceeds maximum length of {max} characters", max = MAX_TEXT_LEN)]
    TooLong,
}

/// Errors that can occur when creating an [`Age`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AgeError {
    #[error("age must be a whole number, got '{0}'")]
    NotANumber(String),

    #[error("age must be between 0 and {max}, got {0}", max = MAX_AGE)]
    OutOfRange(u32),
}

/// A string type that guarantees non-empty, single-line content.
///
/// The input is trimmed of leading and trailing whitespace during construction. Interior
/// whitespace is preserved, so `"Jane  Smith"` stays as typed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText` from the given input.
    ///
    /// # Errors
    ///
    /// - [`TextError::Empty`] if the trimmed input is empty,
    /// - [`TextError::MultiLine`] if it contains a line break,
    /// - [`TextError::TooLong`] if it exceeds [`MAX_TEXT_LEN`] characters.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        if trimmed.contains(['\n', '\r']) {
            return Err(TextError::MultiLine);
        }
        if trimmed.chars().count() > MAX_TEXT_LEN {
            return Err(TextError::TooLong);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for NonEmptyText {
    type Err = TextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl serde::Serialize for NonEmptyText {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for NonEmptyText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NonEmptyText::new(&s).map_err(serde::de::Error::custom)
    }
}

/// A patient age in whole years, between 0 and [`MAX_AGE`] inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Age(u8);

impl Age {
    /// Creates an age from a number of years.
    ///
    /// # Errors
    ///
    /// Returns [`AgeError::OutOfRange`] if `years` is greater than [`MAX_AGE`].
    pub fn new(years: u32) -> Result<Self, AgeError> {
        match u8::try_from(years) {
            Ok(y) if y <= MAX_AGE => Ok(Self(y)),
            _ => Err(AgeError::OutOfRange(years)),
        }
    }

    pub fn years(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Age {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Age {
    type Err = AgeError;

    /// Parses a trimmed decimal number of years, as typed at a prompt.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let years: u32 = trimmed
            .parse()
            .map_err(|_| AgeError::NotANumber(trimmed.to_owned()))?;
        Self::new(years)
    }
}

impl serde::Serialize for Age {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u8(self.0)
    }
}

impl<'de> serde::Deserialize<'de> for Age {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let years = u32::deserialize(deserializer)?;
        Age::new(years).map_err(serde::de::Error::custom)
    }
}
