//! The authenticated Twitter user.
//!
//! This module provides the [`User`] type returned by the
//! `account/verify_credentials` call that completes a login.
//!
//! # Example
//!
//! ```rust
//! use twitter_login::User;
//!
//! let user: User = serde_json::from_str(r#"{
//!     "id": 6253282,
//!     "id_str": "6253282",
//!     "name": "Twitter API",
//!     "screen_name": "TwitterAPI",
//!     "email": "api@example.com"
//! }"#).unwrap();
//!
//! assert_eq!(user.screen_name, "TwitterAPI");
//! assert_eq!(user.email.as_deref(), Some("api@example.com"));
//! ```

use serde::{Deserialize, Serialize};

/// The user who authorized the app.
///
/// Only the fields a login flow typically needs are typed; everything else
/// the API returns is kept in [`extra`](Self::extra).
///
/// # Serialization
///
/// Unknown fields round-trip through `extra`, so a `User` can be stored and
/// restored without losing data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// The numeric user ID.
    #[serde(default)]
    pub id: u64,

    /// The user ID as a string, safe for languages without 64-bit integers.
    #[serde(default)]
    pub id_str: String,

    /// The display name.
    #[serde(default)]
    pub name: String,

    /// The handle, without the leading `@`.
    #[serde(default)]
    pub screen_name: String,

    /// The email address, present only when the app is allowed to request it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// HTTPS URL of the profile image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image_url_https: Option<String>,

    /// Every other field of the API response.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
