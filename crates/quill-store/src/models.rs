// File: src/models.rs
// Purpose: Entities mirrored from backend tables (profiles, posts, comments)
//
// Rows are owned by the backend; stores keep cached, possibly stale copies.

use chrono::{DateTime, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;

// ============================================================================
// ROW DECODING
// ============================================================================

fn scalar_text(value: JsonValue) -> Result<Option<String>, String> {
    match value {
        JsonValue::Null => Ok(None),
        JsonValue::String(s) => Ok(Some(s)),
        JsonValue::Number(n) => Ok(Some(n.to_string())),
        other => Err(format!("invalid id: expected a string or number, got {}", other)),
    }
}

/// Primary key: text or integer column, always held as text
fn primary_key<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    scalar_text(JsonValue::deserialize(deserializer)?)
        .map_err(D::Error::custom)?
        .ok_or_else(|| D::Error::custom("invalid id: null"))
}

/// Foreign key that may be null; null reads as an empty id
fn ref_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(scalar_text(JsonValue::deserialize(deserializer)?)
        .map_err(D::Error::custom)?
        .unwrap_or_default())
}

fn optional_ref_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    scalar_text(JsonValue::deserialize(deserializer)?).map_err(D::Error::custom)
}

/// Nullable column decoded into its type's default
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ============================================================================
// PROFILES
// ============================================================================

/// Role stored on a profile row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    User,
}

/// Profile row (`profiles` table), keyed by the auth user id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(deserialize_with = "primary_key")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub role: Role,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Profile {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

// ============================================================================
// POSTS
// ============================================================================

/// Post row (`posts` table)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    #[serde(deserialize_with = "primary_key")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub excerpt: String,
    #[serde(default, deserialize_with = "optional_ref_id")]
    pub category_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub published: bool,
    #[serde(default, deserialize_with = "ref_id")]
    pub author_id: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Insert payload for a post; the backend assigns id and timestamps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub author_id: String,
    pub published: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl NewPost {
    /// Unpublished post with only the required columns
    pub fn draft(
        title: impl Into<String>,
        content: impl Into<String>,
        author_id: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            author_id: author_id.into(),
            published: false,
            excerpt: None,
            category_id: None,
            tags: None,
        }
    }
}

/// Partial post update - only `Some` fields are sent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published: Option<bool>,
}

impl PostPatch {
    pub fn published(published: bool) -> Self {
        Self {
            published: Some(published),
            ..Default::default()
        }
    }
}

// ============================================================================
// COMMENTS
// ============================================================================

/// Comment row (`comments` table)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    #[serde(deserialize_with = "primary_key")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(default, deserialize_with = "ref_id")]
    pub post_id: String,
    #[serde(default, deserialize_with = "ref_id")]
    pub author_id: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Insert payload for a comment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewComment {
    pub content: String,
    pub post_id: String,
    pub author_id: String,
}

/// Comment update: new content plus an explicit modification time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentPatch {
    pub content: String,
    pub updated_at: DateTime<Utc>,
}
