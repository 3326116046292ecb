//! User request and response bodies

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use sv_core::domain::entities::UserProfile;
use sv_core::services::CreateUser;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UserCreateRequest {
    #[validate(length(min = 1, max = 100, message = "must be between 1 and 100 characters"))]
    pub name: String,
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, max = 100, message = "must be between 1 and 100 characters"))]
    pub domain: String,
    #[validate(length(min = 3, max = 50, message = "must be between 3 and 50 characters"))]
    pub username: String,
    #[validate(length(max = 20, message = "must be at most 20 characters"))]
    pub status: Option<String>,
}

impl From<UserCreateRequest> for CreateUser {
    fn from(request: UserCreateRequest) -> Self {
        CreateUser {
            name: request.name,
            email: request.email,
            domain: request.domain,
            username: request.username,
            status: request.status,
        }
    }
}

/// Public view of a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRead {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<UserProfile> for UserRead {
    fn from(user: UserProfile) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> UserCreateRequest {
        UserCreateRequest {
            name: "Test User".to_string(),
            email: "testuser@example.com".to_string(),
            domain: "example.com".to_string(),
            username: "testuser".to_string(),
            status: Some("active".to_string()),
        }
    }

    #[test]
    fn test_valid_request_passes() {
        assert!(request().validate().is_ok());
    }

    #[test]
    fn test_each_constraint_names_its_field() {
        let mut bad = request();
        bad.name = String::new();
        bad.email = "not-an-email".to_string();
        bad.username = "ab".to_string();
        bad.status = Some("x".repeat(21));

        let errors = bad.validate().unwrap_err();
        let fields = errors.field_errors();
        for field in ["name", "email", "username", "status"] {
            assert!(fields.contains_key(field), "missing {}", field);
        }
        assert!(!fields.contains_key("domain"));
    }
}
