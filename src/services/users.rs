//! User (patron) management service

use validator::Validate;

use crate::{
    config::LoansConfig,
    error::{AppError, AppResult},
    models::user::{validation_error, CreateUser, UpdateUser, User},
    repository::Repository,
};

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
    config: LoansConfig,
}

impl UsersService {
    pub fn new(repository: Repository, config: LoansConfig) -> Self {
        Self { repository, config }
    }

    pub async fn list_users(&self) -> AppResult<Vec<User>> {
        let mut conn = self.repository.pool.acquire().await?;
        self.repository.users.list(&mut conn).await
    }

    pub async fn get_by_id(&self, id: i64) -> AppResult<User> {
        let mut conn = self.repository.pool.acquire().await?;
        self.repository.users.get_by_id(&mut conn, id).await
    }

    /// Register a new user; the email must not be in use
    pub async fn create_user(&self, user: CreateUser) -> AppResult<User> {
        let user = user.trimmed();
        user.validate().map_err(validation_error)?;
        let email = user.email.as_str();

        let mut conn = self.repository.pool.acquire().await?;
        // The unique index settles races between concurrent registrations
        let created = match self
            .repository
            .users
            .create(&mut conn, &user.name, email)
            .await
        {
            Err(AppError::Conflict(_)) => {
                tracing::info!("Email {} already registered", email);
                return Err(AppError::EmailConflict(email.to_string()));
            }
            other => other?,
        };

        tracing::info!("Added user {}", created.id);
        Ok(created)
    }

    /// Update name and/or email. A new email must not belong to another user.
    pub async fn update_user(&self, id: i64, update: UpdateUser) -> AppResult<User> {
        let update = update.normalized()?;

        let mut tx = self.repository.begin().await?;
        if !self.repository.users.claim(&mut tx, id).await? {
            tracing::warn!("User {} not found", id);
            return Err(AppError::NotFound(format!("User with id {} not found", id)));
        }

        let email = update.email.as_deref().map(str::trim);
        if let Some(email) = email {
            if self.repository.users.email_exists(&mut tx, email, Some(id)).await? {
                tracing::warn!("Email {} already in use by another user", email);
                return Err(AppError::EmailConflict(email.to_string()));
            }
        }

        let user = self
            .repository
            .users
            .update(&mut tx, id, update.name.as_deref().map(str::trim), email)
            .await?;
        tx.commit().await?;

        tracing::info!("User with ID {} updated successfully", id);
        Ok(user)
    }

    /// Delete a user together with every loan they hold
    pub async fn delete_user(&self, id: i64) -> AppResult<()> {
        let mut tx = self.repository.begin().await?;

        // Children first, then the parent, in one transaction
        let removed = self.repository.loans.delete_for_user(&mut tx, id).await?;
        if self.config.restore_copies_on_return {
            for loan in &removed {
                self.repository.books.restore_copy(&mut tx, loan.book_id).await?;
            }
        }
        self.repository.users.delete(&mut tx, id).await.inspect_err(|_| {
            tracing::warn!("User {} not found", id);
        })?;

        tx.commit().await?;

        tracing::info!("User {} and {} associated loans deleted successfully", id, removed.len());
        Ok(())
    }
}
