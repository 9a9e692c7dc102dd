//! Operations shared by every REST-backed slice.
//!
//! Each builder returns an [`Operation`] with its target and fold already chosen: lists
//! replace the collection, fetch-by-id selects, create prepends, update and status
//! changes splice, delete removes.

use crate::api::{ListQuery, ResourceApi};
use crate::model::{HasStatus, InvalidTransition, StatusTransition};
use serde::de::DeserializeOwned;
use serde::Serialize;
use slice_framework::{ApiError, Fold, Operation, SliceEntity, SliceState, Target};
use std::sync::Arc;

/// An entity served by a REST collection route.
pub trait RestEntity:
    SliceEntity<Id = String, Context = ResourceApi<Self>> + DeserializeOwned
{
}

impl<T> RestEntity for T where
    T: SliceEntity<Id = String, Context = ResourceApi<T>> + DeserializeOwned
{
}

/// Any request body the clients send.
pub trait Body: Serialize + std::fmt::Debug + Send + Sync + 'static {}

impl<B> Body for B where B: Serialize + std::fmt::Debug + Send + Sync + 'static {}

async fn list_page<T: RestEntity>(
    api: Arc<ResourceApi<T>>,
    query: ListQuery,
) -> Result<Fold<T>, ApiError> {
    let page = api.list(&query).await?;
    let pagination = page.pagination(&query);
    Ok(Fold::page(page.items, pagination))
}

async fn list_all<T: RestEntity>(api: Arc<ResourceApi<T>>) -> Result<Fold<T>, ApiError> {
    Ok(Fold::replace_all(api.list_all().await?))
}

async fn get_one<T: RestEntity>(api: Arc<ResourceApi<T>>, id: String) -> Result<Fold<T>, ApiError> {
    Ok(Fold::Select(Some(api.get(&id).await?)))
}

async fn create_one<T: RestEntity, B: Body>(
    api: Arc<ResourceApi<T>>,
    body: B,
) -> Result<Fold<T>, ApiError> {
    Ok(Fold::Prepend(api.create(&body).await?))
}

async fn update_one<T: RestEntity, B: Body>(
    api: Arc<ResourceApi<T>>,
    id: String,
    body: B,
) -> Result<Fold<T>, ApiError> {
    Ok(Fold::Splice(api.update(&id, &body).await?))
}

async fn patch_status<T: RestEntity, S: Body>(
    api: Arc<ResourceApi<T>>,
    id: String,
    status: S,
) -> Result<Fold<T>, ApiError> {
    Ok(Fold::Splice(api.set_status(&id, &status).await?))
}

async fn delete_one<T: RestEntity>(
    api: Arc<ResourceApi<T>>,
    id: String,
) -> Result<Fold<T>, ApiError> {
    api.delete(&id).await?;
    Ok(Fold::Remove(id))
}

/// One server-side page, replacing the list and its pagination.
pub fn fetch_page<T: RestEntity>(query: ListQuery) -> Operation<T> {
    Operation::new("fetch_page", Target::Collection, move |api| list_page(api, query))
}

/// The whole unpaginated collection.
pub fn fetch_all<T: RestEntity>() -> Operation<T> {
    Operation::new("fetch_all", Target::Collection, list_all::<T>)
}

pub fn fetch_one<T: RestEntity>(id: &str) -> Operation<T> {
    let id = id.to_string();
    Operation::new("fetch_one", Target::Selection, move |api| get_one(api, id))
}

pub fn create<T: RestEntity, B: Body>(body: B) -> Operation<T> {
    Operation::new("create", Target::Independent, move |api| create_one(api, body))
}

pub fn update<T: RestEntity, B: Body>(id: &str, body: B) -> Operation<T> {
    let id = id.to_string();
    Operation::new("update", Target::Entity(id.clone()), move |api| {
        update_one(api, id, body)
    })
}

pub fn delete<T: RestEntity>(id: &str) -> Operation<T> {
    let id = id.to_string();
    Operation::new("delete", Target::Entity(id.clone()), move |api| delete_one(api, id))
}

/// `PATCH <base>/:id/status` without any local check.
pub fn set_status<T: RestEntity, S: Body>(id: &str, status: S) -> Operation<T> {
    let id = id.to_string();
    Operation::new("set_status", Target::Entity(id.clone()), move |api| {
        patch_status(api, id, status)
    })
}

/// Refuses `next` when the entity is known locally and its lifecycle forbids the change.
/// Unknown entities pass; the server decides.
pub fn check_transition<T>(
    state: &SliceState<T>,
    id: &str,
    next: T::Status,
) -> Result<(), InvalidTransition>
where
    T: RestEntity + HasStatus,
{
    match state.find(&id.to_string()) {
        Some(entity) if !entity.status().can_transition_to(next) => {
            Err(InvalidTransition::new(entity.status(), next))
        }
        _ => Ok(()),
    }
}

/// [`check_transition`] followed by [`set_status`].
pub fn change_status<T>(
    state: &SliceState<T>,
    id: &str,
    next: T::Status,
) -> Result<Operation<T>, InvalidTransition>
where
    T: RestEntity + HasStatus,
{
    check_transition(state, id, next)?;
    Ok(set_status(id, next))
}
