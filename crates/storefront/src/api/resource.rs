//! Typed REST helper for one collection route.

use super::{ApiClient, ApiRequest};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use slice_framework::{ApiError, Pagination};
use std::collections::BTreeMap;
use std::marker::PhantomData;
use tracing::instrument;

/// Collection routes of the backend.
pub mod routes {
    pub const CART: &str = "/api/cart";
    pub const FAVORITES: &str = "/api/favorites";
    pub const PRODUCTS: &str = "/api/products";
    pub const CATEGORIES: &str = "/api/categories";
    pub const ORDERS: &str = "/api/orders";
    pub const USERS: &str = "/api/users";
    pub const REVIEWS: &str = "/api/reviews";
    pub const PROMO_CODES: &str = "/api/promo-codes";
}

/// Parameters of a list request, passed through to the server verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
    pub sort: Option<String>,
    pub filters: BTreeMap<String, String>,
}

impl ListQuery {
    pub fn page(page: u32, limit: u32) -> Self {
        Self {
            page: Some(page),
            limit: Some(limit),
            ..Self::default()
        }
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    pub fn filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.insert(key.into(), value.into());
        self
    }

    /// Everything that narrows the list: filters plus the search term.
    pub fn criteria(&self) -> BTreeMap<String, String> {
        let mut criteria = self.filters.clone();
        if let Some(search) = &self.search {
            criteria.insert("search".to_string(), search.clone());
        }
        criteria
    }

    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(page) = self.page {
            pairs.push(("page".to_string(), page.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(search) = &self.search {
            pairs.push(("search".to_string(), search.clone()));
        }
        if let Some(sort) = &self.sort {
            pairs.push(("sort".to_string(), sort.clone()));
        }
        pairs.extend(self.filters.iter().map(|(k, v)| (k.clone(), v.clone())));
        pairs
    }
}

/// One page of a server-paginated list.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    #[serde(alias = "data", alias = "results")]
    pub items: Vec<T>,
    #[serde(default, alias = "total")]
    pub total_items: Option<u64>,
    #[serde(default)]
    pub total_pages: Option<u32>,
    #[serde(default, alias = "currentPage")]
    pub page: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
}

impl<T> Page<T> {
    /// Paging info, falling back to the request and to the page itself for whatever the
    /// server left out.
    pub fn pagination(&self, query: &ListQuery) -> Pagination {
        let total_items = self.total_items.unwrap_or(self.items.len() as u64);
        let limit = self
            .limit
            .or(query.limit)
            .unwrap_or_else(|| u32::try_from(self.items.len()).unwrap_or(u32::MAX));
        let page = self.page.or(query.page).unwrap_or(1);
        let mut pagination = Pagination::new(page, limit, total_items);
        if let Some(total_pages) = self.total_pages {
            pagination.total_pages = total_pages;
        }
        pagination
    }
}

/// A list response: paginated object or bare array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Listing<T> {
    Paged(Page<T>),
    Bare(Vec<T>),
}

impl<T> Listing<T> {
    pub fn into_page(self) -> Page<T> {
        match self {
            Listing::Paged(page) => page,
            Listing::Bare(items) => Page {
                items,
                total_items: None,
                total_pages: None,
                page: None,
                limit: None,
            },
        }
    }
}

#[derive(Serialize)]
struct StatusBody<'a, S> {
    status: &'a S,
}

/// REST operations on one collection route, e.g. `/api/products`.
///
/// Each slice gets one as its context.
pub struct ResourceApi<T> {
    api: ApiClient,
    base: String,
    _entity: PhantomData<fn() -> T>,
}

impl<T> Clone for ResourceApi<T> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            base: self.base.clone(),
            _entity: PhantomData,
        }
    }
}

impl<T: DeserializeOwned> ResourceApi<T> {
    pub fn new(api: ApiClient, base: impl Into<String>) -> Self {
        Self {
            api,
            base: base.into(),
            _entity: PhantomData,
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn path(&self, id: &str) -> String {
        format!("{}/{}", self.base, id)
    }

    #[instrument(skip(self), fields(base = %self.base))]
    pub async fn list(&self, query: &ListQuery) -> Result<Page<T>, ApiError> {
        let request = ApiRequest::get(self.base.as_str()).with_query(query.to_pairs());
        let listing: Listing<T> = self.api.fetch(request).await?;
        Ok(listing.into_page())
    }

    /// The whole, unpaginated collection.
    #[instrument(skip(self), fields(base = %self.base))]
    pub async fn list_all(&self) -> Result<Vec<T>, ApiError> {
        let listing: Listing<T> = self.api.fetch(ApiRequest::get(self.base.as_str())).await?;
        Ok(listing.into_page().items)
    }

    #[instrument(skip(self), fields(base = %self.base))]
    pub async fn get(&self, id: &str) -> Result<T, ApiError> {
        self.api.fetch(ApiRequest::get(self.path(id))).await
    }

    pub async fn create<B>(&self, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + Sync + ?Sized,
    {
        let request = ApiRequest::post(self.base.as_str()).json(body)?;
        self.api.fetch(request).await
    }

    pub async fn update<B>(&self, id: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + Sync + ?Sized,
    {
        let request = ApiRequest::put(self.path(id)).json(body)?;
        self.api.fetch(request).await
    }

    /// `PATCH <base>/:id/status` with `{ "status": ... }`.
    pub async fn set_status<S>(&self, id: &str, status: &S) -> Result<T, ApiError>
    where
        S: Serialize + Sync,
    {
        let request =
            ApiRequest::patch(format!("{}/status", self.path(id))).json(&StatusBody { status })?;
        self.api.fetch(request).await
    }

    #[instrument(skip(self), fields(base = %self.base))]
    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.api.execute(ApiRequest::delete(self.path(id))).await?;
        Ok(())
    }

    /// Deletes the whole collection (`DELETE <base>`).
    pub async fn clear(&self) -> Result<(), ApiError> {
        self.api.execute(ApiRequest::delete(self.base.as_str())).await?;
        Ok(())
    }

    /// `POST <base>/<suffix>` with a reply of any shape.
    pub async fn post_to<B, R>(&self, suffix: &str, body: &B) -> Result<R, ApiError>
    where
        B: Serialize + Sync + ?Sized,
        R: DeserializeOwned,
    {
        let request = ApiRequest::post(format!("{}/{}", self.base, suffix)).json(body)?;
        self.api.fetch(request).await
    }
}
