use crate::category_slice::CategoryError;
use crate::clients::crud;
use crate::model::{Category, CategoryCreate, CategoryUpdate};
use slice_framework::{SliceClient, SliceState};
use tracing::{debug, instrument};

#[derive(Clone)]
pub struct CategoryClient {
    inner: SliceClient<Category>,
}

crate::impl_admin_client!(
    CategoryClient,
    Category,
    CategoryError,
    CategoryCreate,
    CategoryUpdate,
    category,
    categories,
);

impl CategoryClient {
    /// Loads every category at once, for navigation menus.
    #[instrument(skip(self))]
    pub async fn fetch_all_categories(&self) -> Result<SliceState<Category>, CategoryError> {
        debug!("Sending request");
        self.inner
            .dispatch(crud::fetch_all())
            .await
            .map(|outcome| outcome.state)
            .map_err(CategoryError::from)
    }
}
