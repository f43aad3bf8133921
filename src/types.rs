//! Common types used throughout userdir-sync
//!
//! Domain records exchanged with the users API plus a few small
//! configuration enums shared by several modules.

use crate::pagination::Identified;
use serde::{Deserialize, Serialize};

// ============================================================================
// Users
// ============================================================================

/// A user as listed by `GET /users`
///
/// Records are immutable once received; the engine only ever appends them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Server-assigned id (absent on older API revisions)
    #[serde(default)]
    pub id: Option<u64>,
    /// Display name
    pub name: String,
    /// Email address, unique server-side
    pub email: String,
    /// Phone number
    pub phone: String,
    /// Position label
    pub position: String,
    /// Position id
    #[serde(default)]
    pub position_id: Option<u32>,
    /// Registration time, unix seconds
    #[serde(default)]
    pub registration_timestamp: Option<i64>,
    /// Photo URL
    pub photo: String,
}

/// De-duplication key of a [`User`]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IdentityKey {
    /// Server id
    Id(u64),
    /// Email, used when no id was supplied
    Email(String),
}

impl User {
    /// Identity key: server id when present, email otherwise
    pub fn identity_key(&self) -> IdentityKey {
        match self.id {
            Some(id) => IdentityKey::Id(id),
            None => IdentityKey::Email(self.email.clone()),
        }
    }
}

impl Identified for User {
    type Key = IdentityKey;

    fn identity(&self) -> IdentityKey {
        self.identity_key()
    }
}

/// One page of users together with the total the server reported alongside it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsersPage {
    /// Remote total at the time the page was served
    pub total_count: u64,
    /// Users on this page, in server order
    pub items: Vec<User>,
}

impl UsersPage {
    /// Create a page
    pub fn new(total_count: u64, items: Vec<User>) -> Self {
        Self { total_count, items }
    }
}

// ============================================================================
// Registration
// ============================================================================

/// An open position a new user can register for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub id: u32,
    pub name: String,
}

/// Payload for `POST /users`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub position_id: u32,
    /// Raw photo bytes
    pub photo: Vec<u8>,
    /// File name sent with the photo part
    pub photo_file_name: String,
    /// MIME type of the photo part
    pub photo_mime: String,
}

impl NewUser {
    /// Create a registration payload with a JPEG photo
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        position_id: u32,
        photo: Vec<u8>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
            position_id,
            photo,
            photo_file_name: "photo.jpg".to_string(),
            photo_mime: "image/jpeg".to_string(),
        }
    }

    /// Override the photo file name and MIME type
    #[must_use]
    pub fn with_photo_type(
        mut self,
        file_name: impl Into<String>,
        mime: impl Into<String>,
    ) -> Self {
        self.photo_file_name = file_name.into();
        self.photo_mime = mime.into();
        self
    }
}

// ============================================================================
// Backoff Type
// ============================================================================

/// Type of backoff for retries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackoffType {
    /// Constant delay between retries
    Constant,
    /// Linear increase in delay
    Linear,
    /// Exponential increase in delay
    #[default]
    Exponential,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_deserialize_full() {
        let user: User = serde_json::from_value(json!({
            "id": 42,
            "name": "Salvador",
            "email": "salvador@example.com",
            "phone": "+380971234567",
            "position": "Designer",
            "position_id": 4,
            "registration_timestamp": 1_537_777_441,
            "photo": "https://example.com/images/users/42.jpg"
        }))
        .unwrap();

        assert_eq!(user.id, Some(42));
        assert_eq!(user.position_id, Some(4));
        assert_eq!(user.identity_key(), IdentityKey::Id(42));
    }

    #[test]
    fn test_user_without_id_uses_email() {
        let user: User = serde_json::from_value(json!({
            "name": "Ann",
            "email": "ann@example.com",
            "phone": "+380501112233",
            "position": "QA",
            "photo": "p.jpg"
        }))
        .unwrap();

        assert!(user.id.is_none());
        assert_eq!(
            user.identity_key(),
            IdentityKey::Email("ann@example.com".to_string())
        );
    }

    #[test]
    fn test_new_user_defaults_to_jpeg() {
        let user = NewUser::new("Ann", "ann@example.com", "+380501112233", 1, vec![1, 2]);
        assert_eq!(user.photo_mime, "image/jpeg");

        let user = user.with_photo_type("me.png", "image/png");
        assert_eq!(user.photo_file_name, "me.png");
        assert_eq!(user.photo_mime, "image/png");
    }

    #[test]
    fn test_backoff_type_serde() {
        let backoff: BackoffType = serde_json::from_str("\"linear\"").unwrap();
        assert_eq!(backoff, BackoffType::Linear);
        assert_eq!(BackoffType::default(), BackoffType::Exponential);
    }
}
