/// Maps [`FrameworkError`](slice_framework::FrameworkError) into a slice error enum.
///
/// The enum needs `NotFound(String)`, `Api(ApiError)`, `Superseded(u64)` and
/// `SliceCommunicationError(String)` variants. A 404 from the server becomes `NotFound`
/// carrying the server's message.
#[macro_export]
macro_rules! impl_from_framework_error {
    ($error:ty) => {
        impl From<slice_framework::FrameworkError> for $error {
            fn from(e: slice_framework::FrameworkError) -> Self {
                match e {
                    slice_framework::FrameworkError::Api(api) if api.is_not_found() => {
                        Self::NotFound(api.user_message())
                    }
                    slice_framework::FrameworkError::Api(api) => Self::Api(api),
                    slice_framework::FrameworkError::Superseded(tag) => Self::Superseded(tag),
                    other => Self::SliceCommunicationError(other.to_string()),
                }
            }
        }
    };
}

/// Generates the admin CRUD surface of a REST-backed slice client:
/// `new`, `fetch_<plural>`, `fetch_<one>`, `create_<one>`, `update_<one>`,
/// `delete_<one>` and the [`StorePort`](slice_framework::StorePort) impl.
#[macro_export]
macro_rules! impl_admin_client {
    (
        $client_name:ident,
        $entity:ty,
        $error:ty,
        $create:ty,
        $update:ty,
        $one:ident,
        $plural:ident $(,)?
    ) => {
        paste::paste! {
            impl $client_name {
                pub fn new(inner: slice_framework::SliceClient<$entity>) -> Self {
                    Self { inner }
                }

                /// Loads one page. Filters, search and sort go to the server untouched.
                #[tracing::instrument(skip(self))]
                pub async fn [<fetch_ $plural>](
                    &self,
                    query: $crate::api::ListQuery,
                ) -> Result<slice_framework::SliceState<$entity>, $error> {
                    tracing::debug!("Sending request");
                    self.inner.set_filters(query.criteria()).await.map_err(<$error>::from)?;
                    self.inner
                        .dispatch($crate::clients::crud::fetch_page(query))
                        .await
                        .map(|outcome| outcome.state)
                        .map_err(<$error>::from)
                }

                /// Loads one entity into `selected`.
                #[tracing::instrument(skip(self))]
                pub async fn [<fetch_ $one>](&self, id: &str) -> Result<$entity, $error> {
                    tracing::debug!("Sending request");
                    self.inner
                        .dispatch($crate::clients::crud::fetch_one(id))
                        .await
                        .map_err(<$error>::from)?
                        .into_entity()
                        .ok_or_else(|| <$error>::NotFound(id.to_string()))
                }

                #[tracing::instrument(skip(self))]
                pub async fn [<create_ $one>](&self, body: $create) -> Result<$entity, $error> {
                    tracing::debug!("Sending request");
                    self.inner
                        .dispatch($crate::clients::crud::create(body))
                        .await
                        .map_err(<$error>::from)?
                        .into_entity()
                        .ok_or_else(|| {
                            <$error>::SliceCommunicationError(
                                "create returned no entity".to_string(),
                            )
                        })
                }

                #[tracing::instrument(skip(self))]
                pub async fn [<update_ $one>](
                    &self,
                    id: &str,
                    body: $update,
                ) -> Result<$entity, $error> {
                    tracing::debug!("Sending request");
                    self.inner
                        .dispatch($crate::clients::crud::update(id, body))
                        .await
                        .map_err(<$error>::from)?
                        .into_entity()
                        .ok_or_else(|| <$error>::NotFound(id.to_string()))
                }

                #[tracing::instrument(skip(self))]
                pub async fn [<delete_ $one>](&self, id: &str) -> Result<(), $error> {
                    tracing::debug!("Sending request");
                    self.inner
                        .dispatch($crate::clients::crud::delete(id))
                        .await
                        .map(|_| ())
                        .map_err(<$error>::from)
                }
            }

            #[async_trait::async_trait]
            impl slice_framework::StorePort<$entity> for $client_name {
                type Error = $error;

                fn inner(&self) -> &slice_framework::SliceClient<$entity> {
                    &self.inner
                }

                fn map_error(e: slice_framework::FrameworkError) -> Self::Error {
                    <$error>::from(e)
                }
            }
        }
    };
}
