//! User entity - a registered author/reader

use chrono::{DateTime, Utc};

use crate::value_objects::UserId;

/// A registered account. The password hash is never loaded into this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub name: Option<String>,
    pub bio: Option<String>,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Whether `viewer` is this user
    #[inline]
    pub fn is(&self, viewer: Option<UserId>) -> bool {
        viewer == Some(self.id)
    }
}

/// Data required to insert a user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Partial update of a user; `None` leaves the column untouched
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub name: Option<String>,
    pub bio: Option<String>,
    pub image: Option<String>,
}

impl UserChanges {
    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.email.is_none()
            && self.password_hash.is_none()
            && self.name.is_none()
            && self.bio.is_none()
            && self.image.is_none()
    }

    /// Apply the changes to an in-memory copy of the user
    pub fn apply(&self, user: &mut User, now: DateTime<Utc>) {
        if let Some(username) = &self.username {
            user.username.clone_from(username);
        }
        if let Some(email) = &self.email {
            user.email.clone_from(email);
        }
        if let Some(name) = &self.name {
            user.name = Some(name.clone());
        }
        if let Some(bio) = &self.bio {
            user.bio = Some(bio.clone());
        }
        if let Some(image) = &self.image {
            user.image = Some(image.clone());
        }
        user.updated_at = now;
    }
}
