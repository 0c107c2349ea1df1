//! User administration: role cycling, activation, creation, deletion.

use crate::api::{ApiClient, ApiError};
use crate::model::{User, UserDraft, UserUpdate};
use crate::view::{Form, FormError};

#[derive(Clone)]
pub struct UserAdmin {
    client: ApiClient,
}

impl UserAdmin {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Move `user` to the next role in the USER → MODERATOR → ADMIN cycle.
    pub async fn cycle_role(&self, user: &User) -> Result<User, ApiError> {
        let role = user.role.next();
        let update = UserUpdate {
            role: Some(role),
            ..UserUpdate::default()
        };
        let updated = self.client.update::<User, _>(user.id, &update).await?;
        tracing::info!(user_id = user.id, role = role.as_str(), "User role changed");
        Ok(updated)
    }

    pub async fn set_active(&self, user: &User, active: bool) -> Result<User, ApiError> {
        let update = UserUpdate {
            is_active: Some(active),
            ..UserUpdate::default()
        };
        let updated = self.client.update::<User, _>(user.id, &update).await?;
        tracing::info!(user_id = user.id, active, "User activation changed");
        Ok(updated)
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.client.delete::<User>(id).await?;
        tracing::info!(user_id = id, "User deleted");
        Ok(())
    }

    /// Submit the user-creation form; the draft survives a failure.
    pub async fn create(&self, form: &mut Form<UserDraft>) -> Result<User, FormError> {
        let client = &self.client;
        form.submit(|draft| async move { client.create::<User, _>(&draft).await })
            .await
    }
}
