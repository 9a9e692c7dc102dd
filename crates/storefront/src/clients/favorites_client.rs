use crate::api::{decode, ApiRequest, Listing, ResourceApi};
use crate::favorites_slice::FavoritesError;
use crate::model::{Favorite, FavoriteAdd, Product};
use async_trait::async_trait;
use serde::Deserialize;
use slice_framework::{
    ApiError, Fold, FrameworkError, Operation, SliceClient, SliceState, StorePort, Target,
};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FavoriteReply {
    One(Favorite),
    All(Listing<Favorite>),
}

async fn list_favorites(api: Arc<ResourceApi<Favorite>>) -> Result<Fold<Favorite>, ApiError> {
    Ok(Fold::replace_all(api.list_all().await?))
}

async fn post_favorite(
    api: Arc<ResourceApi<Favorite>>,
    snapshot: Favorite,
) -> Result<Fold<Favorite>, ApiError> {
    let body = FavoriteAdd {
        product_id: snapshot.id.clone(),
    };
    let request = ApiRequest::post(api.base()).json(&body)?;
    let reply = api.api().execute(request).await?;
    if reply.is_null() {
        return Ok(Fold::Merge(snapshot));
    }
    // Anything else that is not a favorite or a list still means the add went through.
    Ok(match decode::<FavoriteReply>(reply) {
        Ok(FavoriteReply::One(favorite)) => Fold::Merge(favorite),
        Ok(FavoriteReply::All(listing)) => Fold::replace_all(listing.into_page().items),
        Err(e) => {
            warn!(
                product = %snapshot.id,
                error = %e,
                "Unexpected favorite reply, keeping local copy"
            );
            Fold::Merge(snapshot)
        }
    })
}

async fn delete_favorite(
    api: Arc<ResourceApi<Favorite>>,
    id: String,
) -> Result<Fold<Favorite>, ApiError> {
    api.delete(&id).await?;
    Ok(Fold::Keep)
}

/// Client for the favorites slice.
///
/// Adding is idempotent: a product already in the list is not sent again. Removal is
/// optimistic and rolls back if the server refuses it.
#[derive(Clone)]
pub struct FavoritesClient {
    inner: SliceClient<Favorite>,
}

impl FavoritesClient {
    pub fn new(inner: SliceClient<Favorite>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self))]
    pub async fn fetch_favorites(&self) -> Result<SliceState<Favorite>, FavoritesError> {
        debug!("Sending request");
        self.dispatch(Operation::new("fetch_favorites", Target::Collection, list_favorites))
            .await
    }

    #[instrument(skip(self, product), fields(product = %product.id))]
    pub async fn add_favorite(
        &self,
        product: &Product,
    ) -> Result<SliceState<Favorite>, FavoritesError> {
        let current = self.inner.current();
        if current.contains(&product.id) {
            debug!("Already a favorite");
            return Ok(current);
        }
        let snapshot = Favorite::from_product(product);
        let operation = Operation::new("add_favorite", Target::Independent, move |api| {
            post_favorite(api, snapshot)
        });
        self.dispatch(operation).await
    }

    #[instrument(skip(self))]
    pub async fn remove_favorite(&self, id: &str) -> Result<SliceState<Favorite>, FavoritesError> {
        debug!("Sending request");
        let id = id.to_string();
        let operation = Operation::new("remove_favorite", Target::Entity(id.clone()), {
            let id = id.clone();
            move |api| delete_favorite(api, id)
        })
        .optimistic(Fold::Remove(id));
        self.dispatch(operation).await
    }

    /// Adds `product` if it is not a favorite yet, removes it otherwise.
    /// Returns whether it is a favorite afterwards.
    #[instrument(skip(self, product), fields(product = %product.id))]
    pub async fn toggle_favorite(&self, product: &Product) -> Result<bool, FavoritesError> {
        if self.is_favorite(&product.id) {
            self.remove_favorite(&product.id).await?;
            Ok(false)
        } else {
            self.add_favorite(product).await?;
            Ok(true)
        }
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.inner.current().contains(&id.to_string())
    }

    async fn dispatch(
        &self,
        operation: Operation<Favorite>,
    ) -> Result<SliceState<Favorite>, FavoritesError> {
        self.inner
            .dispatch(operation)
            .await
            .map(|outcome| outcome.state)
            .map_err(FavoritesError::from)
    }
}

#[async_trait]
impl StorePort<Favorite> for FavoritesClient {
    type Error = FavoritesError;

    fn inner(&self) -> &SliceClient<Favorite> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        FavoritesError::from(e)
    }
}
