//! Person records and identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Stable identity of a person record.
///
/// Opaque to the store: any string works, UUIDs are generated when the
/// caller does not supply one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonId(String);

impl PersonId {
    /// Creates a new person ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates a fresh random (v4) ID.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Returns the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for PersonId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for PersonId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl PartialEq<str> for PersonId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for PersonId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// A person record.
///
/// Values are compared structurally: two records with the same `id` but a
/// different email are different values. The store still keeps at most one
/// record per `id`.
///
/// Serialized with camelCase keys (`firstName`, `imagePath`, ...). Unknown
/// keys are ignored when reading; `firstName`, `lastName` and `id` are
/// required, the optional fields default to `None`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Optional email address.
    #[serde(default)]
    pub email: Option<String>,
    /// Optional phone number.
    #[serde(default)]
    pub phone: Option<String>,
    /// Optional reference to an externally stored image.
    #[serde(default)]
    pub image_path: Option<String>,
    /// Unique identifier.
    pub id: PersonId,
}

impl Person {
    /// Creates a person with a freshly generated id and trimmed names.
    #[must_use]
    pub fn new(first_name: impl AsRef<str>, last_name: impl AsRef<str>) -> Self {
        Self::with_id(PersonId::generate(), first_name, last_name)
    }

    /// Creates a person with an explicit id and trimmed names.
    #[must_use]
    pub fn with_id(
        id: impl Into<PersonId>,
        first_name: impl AsRef<str>,
        last_name: impl AsRef<str>,
    ) -> Self {
        Self {
            first_name: first_name.as_ref().trim().to_string(),
            last_name: last_name.as_ref().trim().to_string(),
            email: None,
            phone: None,
            image_path: None,
            id: id.into(),
        }
    }

    /// Sets the email address (trimmed; blank clears it).
    #[must_use]
    pub fn with_email(mut self, email: impl AsRef<str>) -> Self {
        self.email = non_blank(email.as_ref());
        self
    }

    /// Sets the phone number (trimmed; blank clears it).
    #[must_use]
    pub fn with_phone(mut self, phone: impl AsRef<str>) -> Self {
        self.phone = non_blank(phone.as_ref());
        self
    }

    /// Sets the image reference (trimmed; blank clears it).
    #[must_use]
    pub fn with_image_path(mut self, image_path: impl AsRef<str>) -> Self {
        self.image_path = non_blank(image_path.as_ref());
        self
    }

    /// Returns `true` when both names are non-blank after trimming.
    ///
    /// The store does not enforce this; form validation happens upstream.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.first_name.trim().is_empty() && !self.last_name.trim().is_empty()
    }

    /// Full display name, `"first last"`.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
