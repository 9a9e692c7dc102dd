use crate::clients::crud;
use crate::model::{User, UserCreate, UserStatus, UserUpdate};
use crate::user_slice::UserError;
use slice_framework::SliceClient;
use tracing::{debug, instrument};

/// Client for user administration.
#[derive(Clone)]
pub struct UserClient {
    inner: SliceClient<User>,
}

crate::impl_admin_client!(UserClient, User, UserError, UserCreate, UserUpdate, user, users);

impl UserClient {
    pub async fn block_user(&self, id: &str) -> Result<User, UserError> {
        self.set_user_status(id, UserStatus::Blocked).await
    }

    pub async fn activate_user(&self, id: &str) -> Result<User, UserError> {
        self.set_user_status(id, UserStatus::Active).await
    }

    #[instrument(skip(self))]
    async fn set_user_status(&self, id: &str, status: UserStatus) -> Result<User, UserError> {
        debug!("Sending request");
        let operation = crud::change_status(&self.inner.current(), id, status)?;
        self.inner
            .dispatch(operation)
            .await
            .map_err(UserError::from)?
            .into_entity()
            .ok_or_else(|| UserError::NotFound(id.to_string()))
    }
}
