//! The generic resource endpoint.
//!
//! [`ResourceEndpoint`] pairs a [`RequestExecutor`] with a
//! [`ResourceDescriptor`]. Every operation first checks the descriptor's
//! capabilities and fails with [`ResourceError::Unsupported`] without
//! touching the network when the operation is not offered.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::clients::{ReqwestTransport, RequestExecutor, Transport};
use crate::jsonapi::{Document, ListParams, Page, Resource};
use crate::pagination::{
    BoxFuture, ItemIterator, PageIterator, PageRequest, PaginationOptions,
};
use crate::rest::descriptor::{ResourceDescriptor, ResourceOperation};
use crate::rest::errors::ResourceError;

/// Future produced by the page fetcher behind [`ResourceEndpoint::iter`] and
/// [`ResourceEndpoint::pages`].
pub type PageFuture<'a> = BoxFuture<'a, Result<Page<Resource>, ResourceError>>;

/// Operations on one resource, checked against its descriptor.
///
/// Obtain one from [`ApiClient::resource`](crate::rest::ApiClient::resource).
///
/// # Example
///
/// ```rust,ignore
/// use jsonapi_client::jsonapi::ListParams;
/// use jsonapi_client::pagination::PaginationOptions;
///
/// let projects = client.resource(&PROJECTS);
///
/// let mut items = projects.iter(ListParams::new().sort("-updated-at"), PaginationOptions::new())?;
/// while let Some(project) = items.next().await {
///     println!("{}", project?.id);
/// }
/// ```
#[derive(Debug)]
pub struct ResourceEndpoint<'a, T = ReqwestTransport> {
    executor: &'a RequestExecutor<T>,
    descriptor: &'a ResourceDescriptor,
}

impl<T> Clone for ResourceEndpoint<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ResourceEndpoint<'_, T> {}

impl<'a, T: Transport> ResourceEndpoint<'a, T> {
    /// Creates an endpoint for `descriptor` on `executor`.
    #[must_use]
    pub const fn new(executor: &'a RequestExecutor<T>, descriptor: &'a ResourceDescriptor) -> Self {
        Self {
            executor,
            descriptor,
        }
    }

    /// Returns the descriptor this endpoint serves.
    #[must_use]
    pub const fn descriptor(&self) -> &'a ResourceDescriptor {
        self.descriptor
    }

    fn ensure(&self, operation: ResourceOperation) -> Result<(), ResourceError> {
        if self.descriptor.supports(operation) {
            Ok(())
        } else {
            tracing::debug!(
                resource = self.descriptor.name,
                operation = %operation,
                "Rejected unsupported resource operation"
            );
            Err(ResourceError::Unsupported {
                resource: self.descriptor.name,
                operation,
            })
        }
    }

    /// Fetches one page of the collection.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Unsupported`] if listing is not offered, or
    /// [`ResourceError::Api`] if the request fails.
    pub async fn list(&self, params: &ListParams) -> Result<Page<Resource>, ResourceError> {
        self.ensure(ResourceOperation::List)?;
        Ok(self
            .executor
            .list(self.descriptor.collection_path(), params)
            .await?)
    }

    /// Fetches one resource by ID. `params` may carry `include` and sparse
    /// parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Unsupported`] if finding is not offered, or
    /// [`ResourceError::Api`] if the request fails.
    pub async fn find(
        &self,
        id: &str,
        params: &ListParams,
    ) -> Result<Document<Resource>, ResourceError> {
        self.ensure(ResourceOperation::Find)?;
        Ok(self
            .executor
            .get(&self.descriptor.member_path(id), params)
            .await?)
    }

    /// Fetches one resource and converts it into `D`.
    ///
    /// # Errors
    ///
    /// As [`find`](Self::find), plus [`ResourceError::Serialization`] if
    /// the resource does not fit `D`.
    pub async fn find_as<D: DeserializeOwned>(
        &self,
        id: &str,
        params: &ListParams,
    ) -> Result<D, ResourceError> {
        let document = self.find(id, params).await?;
        Ok(document.data.into_typed()?)
    }

    /// Creates a resource from internal-form attributes.
    ///
    /// Returns `None` when the service answers without a body.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Unsupported`] if creating is not offered, or
    /// [`ResourceError::Api`] if the request fails.
    pub async fn create(
        &self,
        data: &Map<String, Value>,
    ) -> Result<Option<Document<Resource>>, ResourceError> {
        self.ensure(ResourceOperation::Create)?;
        Ok(self
            .executor
            .create(
                self.descriptor.collection_path(),
                self.descriptor.resource_type,
                data,
            )
            .await?)
    }

    /// Creates a resource from any value that serializes to an object with
    /// internal (camelCase) keys.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Serialization`] if `value` does not
    /// serialize to an object, otherwise as [`create`](Self::create).
    pub async fn create_from<S: Serialize + Sync>(
        &self,
        value: &S,
    ) -> Result<Option<Document<Resource>>, ResourceError> {
        let data = attributes_of(value)?;
        self.create(&data).await
    }

    /// Updates a resource with internal-form attributes.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Unsupported`] if updating is not offered, or
    /// [`ResourceError::Api`] if the request fails.
    pub async fn update(
        &self,
        id: &str,
        data: &Map<String, Value>,
    ) -> Result<Option<Document<Resource>>, ResourceError> {
        self.ensure(ResourceOperation::Update)?;
        Ok(self
            .executor
            .update(
                &self.descriptor.member_path(id),
                self.descriptor.resource_type,
                id,
                data,
            )
            .await?)
    }

    /// Updates a resource from any value that serializes to an object.
    ///
    /// # Errors
    ///
    /// As [`create_from`](Self::create_from).
    pub async fn update_from<S: Serialize + Sync>(
        &self,
        id: &str,
        value: &S,
    ) -> Result<Option<Document<Resource>>, ResourceError> {
        let data = attributes_of(value)?;
        self.update(id, &data).await
    }

    /// Deletes a resource.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Unsupported`] if deleting is not offered, or
    /// [`ResourceError::Api`] if the request fails.
    pub async fn delete(&self, id: &str) -> Result<(), ResourceError> {
        self.ensure(ResourceOperation::Delete)?;
        Ok(self.executor.delete(&self.descriptor.member_path(id)).await?)
    }

    /// Returns a lazy iterator over every item of the collection.
    ///
    /// Any page descriptor already present in `params` is replaced by the
    /// iterator's own. Passing `None` for `options` uses the client's
    /// configured page size.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Unsupported`] if listing is not offered.
    #[allow(clippy::iter_not_returning_iterator)]
    pub fn iter(
        &self,
        params: ListParams,
        options: impl Into<Option<PaginationOptions>>,
    ) -> Result<ItemIterator<Resource, impl FnMut(PageRequest) -> PageFuture<'a> + 'a>, ResourceError>
    {
        self.ensure(ResourceOperation::List)?;
        Ok(ItemIterator::new(
            self.page_fetcher(params),
            self.resolve_options(options.into()),
        ))
    }

    /// Returns a lazy iterator over whole pages of the collection.
    ///
    /// `None` for `options` uses the client's configured page size.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Unsupported`] if listing is not offered.
    pub fn pages(
        &self,
        params: ListParams,
        options: impl Into<Option<PaginationOptions>>,
    ) -> Result<PageIterator<impl FnMut(PageRequest) -> PageFuture<'a> + 'a>, ResourceError> {
        self.ensure(ResourceOperation::List)?;
        Ok(PageIterator::new(
            self.page_fetcher(params),
            self.resolve_options(options.into()),
        ))
    }

    /// Fetches every item of the collection.
    ///
    /// # Errors
    ///
    /// Returns the first error encountered.
    pub async fn collect_all(
        &self,
        params: ListParams,
        options: impl Into<Option<PaginationOptions>>,
    ) -> Result<Vec<Resource>, ResourceError> {
        self.iter(params, options)?.to_vec().await
    }

    /// Fetches at most `n` items, requesting only the pages needed.
    ///
    /// # Errors
    ///
    /// Returns the first error encountered.
    pub async fn take(
        &self,
        params: ListParams,
        n: usize,
        options: impl Into<Option<PaginationOptions>>,
    ) -> Result<Vec<Resource>, ResourceError> {
        let options = self.resolve_options(options.into()).max_items(n);
        self.iter(params, options)?.to_vec().await
    }

    fn resolve_options(&self, options: Option<PaginationOptions>) -> PaginationOptions {
        options.unwrap_or_else(|| self.executor.config().pagination_options())
    }

    fn page_fetcher(
        &self,
        params: ListParams,
    ) -> impl FnMut(PageRequest) -> PageFuture<'a> + 'a {
        let executor = self.executor;
        let descriptor: &'a ResourceDescriptor = self.descriptor;
        move |page| -> PageFuture<'a> {
            let params = params.clone().page(page);
            Box::pin(async move {
                executor
                    .list(descriptor.collection_path(), &params)
                    .await
                    .map_err(ResourceError::from)
            })
        }
    }
}

fn attributes_of<S: Serialize>(value: &S) -> Result<Map<String, Value>, ResourceError> {
    let value = serde_json::to_value(value)?;
    Ok(serde_json::from_value(value)?)
}
