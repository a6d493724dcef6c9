use shared::models::MasterData;
use shared::types::EntityId;
use shared::{ListQuery, PaginatedResponse};
use std::marker::PhantomData;

use crate::error::ClientResult;
use crate::http::{HttpClient, NetworkHttpClient};

/// CRUD over one master-data collection
pub struct CatalogApi<'a, T, C = NetworkHttpClient> {
    http: &'a C,
    _entity: PhantomData<fn() -> T>,
}

impl<'a, T: MasterData, C: HttpClient> CatalogApi<'a, T, C> {
    pub fn new(http: &'a C) -> Self {
        Self {
            http,
            _entity: PhantomData,
        }
    }

    pub async fn list(&self, query: &ListQuery) -> ClientResult<PaginatedResponse<T>> {
        self.http.get_query(T::RESOURCE, &query.to_pairs()).await
    }

    pub async fn get(&self, id: EntityId) -> ClientResult<T> {
        self.http.get(&format!("{}/{}", T::RESOURCE, id)).await
    }

    #[tracing::instrument(skip_all, fields(resource = T::RESOURCE))]
    pub async fn create(&self, data: &T::Create) -> ClientResult<T> {
        self.http.post(T::RESOURCE, data).await
    }

    #[tracing::instrument(skip(self, data), fields(resource = T::RESOURCE))]
    pub async fn update(&self, id: EntityId, data: &T::Update) -> ClientResult<T> {
        self.http.put(&format!("{}/{}", T::RESOURCE, id), data).await
    }

    #[tracing::instrument(skip(self), fields(resource = T::RESOURCE))]
    pub async fn delete(&self, id: EntityId) -> ClientResult<()> {
        self.http.delete(&format!("{}/{}", T::RESOURCE, id)).await
    }
}
