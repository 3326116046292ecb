//! User service implementation

use uuid::Uuid;

use crate::domain::entities::user::UserProfile;
use crate::errors::{DomainError, DomainResult};
use crate::repositories::{Filters, ListQuery, Repository, Session};

use super::types::CreateUser;

/// User operations over one request's session
pub struct UserService<'s, S: Session> {
    session: &'s mut S,
}

impl<'s, S: Session> UserService<'s, S> {
    pub fn new(session: &'s mut S) -> Self {
        Self { session }
    }

    fn users(&mut self) -> Repository<'_, S, UserProfile> {
        Repository::new(self.session)
    }

    /// Register a new user
    ///
    /// Email and username uniqueness is not checked here.
    pub async fn create_user(&mut self, input: CreateUser) -> DomainResult<UserProfile> {
        tracing::info!(email = %input.email, "Creating user");

        let mut user = UserProfile::new(input.name, input.email, input.domain, input.username);
        if let Some(status) = input.status {
            user = user.with_status(status);
        }

        let created = self.users().add(&user).await?;
        tracing::info!(user_id = %created.id, "User created");
        Ok(created)
    }

    /// Every non-deleted user, newest first
    pub async fn list_users(&mut self) -> DomainResult<Vec<UserProfile>> {
        tracing::info!("Listing all users");
        let users = self
            .users()
            .list_by(Filters::new().eq("is_deleted", false))
            .await?;
        tracing::info!(count = users.len(), "Users found");
        Ok(users)
    }

    /// Fetch one user; soft-deleted users count as missing
    pub async fn get_user(&mut self, id: Uuid) -> DomainResult<UserProfile> {
        match self.users().get_by_id(id).await? {
            Some(user) if !user.audit.is_deleted => Ok(user),
            _ => Err(DomainError::not_found("User", id)),
        }
    }

    pub async fn find_user_by_email(&mut self, email: &str) -> DomainResult<Option<UserProfile>> {
        self.users()
            .get_by(Filters::new().eq("email", email).eq("is_deleted", false))
            .await
    }

    /// Operator-based search, always restricted to non-deleted users
    pub async fn search_users(&mut self, query: ListQuery) -> DomainResult<Vec<UserProfile>> {
        let query = query.eq("is_deleted", false);
        let users = self.users().find(&query).await?;
        tracing::debug!(count = users.len(), "User search finished");
        Ok(users)
    }
}
