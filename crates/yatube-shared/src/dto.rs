//! Data Transfer Objects - request/response types for the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request to register a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

/// Request to login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordChangeRequest {
    pub old_password: String,
    pub new_password: String,
}

/// Response containing a user's public information.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    /// First and last name, or the username when both are blank.
    pub full_name: String,
}

/// Response containing authentication tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub user: UserResponse,
}

/// An uploaded image, base64-encoded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImagePayload {
    pub content_type: String,
    pub data: String,
}

/// The post form, used for both creating and editing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostForm {
    pub text: String,
    /// Group slug. Absent or blank leaves the post outside any group.
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub image: Option<ImagePayload>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentForm {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupForm {
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GroupResponse {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: i64,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub author: UserResponse,
    pub group: Option<GroupResponse>,
    /// Path of the image relative to the media root.
    pub image: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentResponse {
    pub id: i64,
    pub post_id: i64,
    pub text: String,
    pub created: DateTime<Utc>,
    pub author: UserResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDetailResponse {
    pub post: PostResponse,
    pub author_post_count: u64,
    pub comments: Vec<CommentResponse>,
}

/// One page of a feed plus the navigation a template needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResponse<T> {
    pub items: Vec<T>,
    pub number: usize,
    pub num_pages: usize,
    pub count: u64,
    pub per_page: usize,
    pub has_next: bool,
    pub has_previous: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_page: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_page: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupFeedResponse {
    pub group: GroupResponse,
    pub page: PageResponse<PostResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub author: UserResponse,
    pub post_count: u64,
    pub following: bool,
    pub page: PageResponse<PostResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FollowResponse {
    pub author: String,
    pub following: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_form_defaults_optional_fields() {
        let form: PostForm = serde_json::from_str(r#"{"text":"hello"}"#).unwrap();
        assert_eq!(form.text, "hello");
        assert!(form.group.is_none());
        assert!(form.image.is_none());
    }

    #[test]
    fn page_response_omits_missing_neighbours() {
        let page = PageResponse::<i64> {
            items: vec![1, 2],
            number: 1,
            num_pages: 1,
            count: 2,
            per_page: 10,
            has_next: false,
            has_previous: false,
            next_page: None,
            previous_page: None,
        };

        let json = serde_json::to_value(&page).unwrap();
        assert!(json.get("next_page").is_none());
        assert_eq!(json["count"], 2);
    }
}
