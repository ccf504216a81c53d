//! Staff user endpoints.
//!
//! Thin typed wrappers over `/users/`; all of them require a session.
//! Editing the signed-in account here does not touch the session copy,
//! use [`PlexidentClient::update_profile`] for that.

use plexident_core::User;

use crate::{ClientError, PlexidentClient, UserCreate, UserUpdatePayload};

impl PlexidentClient {
    /// List all staff users. `GET /users/`.
    pub async fn list_users(&self) -> Result<Vec<User>, ClientError> {
        self.get("/users/").await
    }

    /// Fetch one user by id. `GET /users/{id}/`.
    pub async fn get_user(&self, id: &str) -> Result<User, ClientError> {
        self.get(&format!("/users/{}/", id)).await
    }

    /// Create a staff user. `POST /users/`.
    pub async fn create_user(&self, user: &UserCreate) -> Result<User, ClientError> {
        self.post("/users/", user).await
    }

    /// Update a user. `PUT /users/{id}/`.
    pub async fn update_user(
        &self,
        id: &str,
        payload: &UserUpdatePayload,
    ) -> Result<User, ClientError> {
        self.put(&format!("/users/{}/", id), payload).await
    }

    /// Delete a user. `DELETE /users/{id}/`.
    pub async fn delete_user(&self, id: &str) -> Result<(), ClientError> {
        self.delete(&format!("/users/{}/", id)).await
    }
}
