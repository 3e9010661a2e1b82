use serde::{Serialize, de::DeserializeOwned};
use std::fmt::{Debug, Display};
use std::hash::Hash;
use std::sync::Arc;

pub mod load;
pub mod result;

pub use load::{LoadState, StoreFailure};
pub use result::{ErrorKind, GatewayError, GatewayResult};

/// Where a freshly created entity lands in the client-held collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertPosition {
    Prepend,
    Append,
}

/// What a single-entity refresh does when the row is not already held.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshPolicy {
    /// Replace the row in place if present, otherwise leave the collection
    /// structurally unchanged. List views only ever refresh what they show.
    ReplaceExisting,
    /// Replace in place, inserting per `CREATED_ENTITY` when absent.
    InsertIfAbsent,
}

/// One server-owned record kind the dashboard synchronizes. Identity is by
/// `Id`, never by structural equality; nothing beyond the id is assumed about
/// the shape except the fields a resource declares searchable.
pub trait Resource: Clone + Debug + Serialize + DeserializeOwned + Send + Sync + 'static {
    type Id: Debug + Display + Clone + Eq + Hash + Send + Sync;
    /// Scope key disambiguating which collection a list call targets
    /// (e.g. the parent hotel). `()` for unscoped resources.
    type Scope: Debug + Clone + PartialEq + Send + Sync;
    /// Input to `Gateway::create`.
    type New: Send;
    /// Input to `Gateway::update`.
    type Patch: Send;

    /// Lowercase singular name, used in default notification messages.
    const NAME: &'static str;
    /// Fields `search_field` answers for. Stores validate their configured
    /// search fields against this list once, at construction.
    const SEARCH_FIELDS: &'static [&'static str] = &[];
    const CREATED_ENTITY: InsertPosition = InsertPosition::Prepend;
    const REFRESH: RefreshPolicy = RefreshPolicy::ReplaceExisting;

    fn id(&self) -> &Self::Id;

    /// The value of one declared searchable field, `None` for undeclared names.
    fn search_field(&self, _field: &str) -> Option<&str> {
        None
    }
}

/// The remote source of truth for one resource kind. Implementations own the
/// transport entirely; the store only sees settled results. Timeouts are the
/// gateway's problem and surface as ordinary failures.
pub trait Gateway<R: Resource>: Send + Sync {
    fn list(&self, scope: &R::Scope) -> impl Future<Output = GatewayResult<Vec<R>>> + Send;

    fn get(&self, id: &R::Id) -> impl Future<Output = GatewayResult<R>> + Send;

    fn create(&self, new: R::New) -> impl Future<Output = GatewayResult<R>> + Send;

    fn update(&self, id: &R::Id, patch: R::Patch) -> impl Future<Output = GatewayResult<R>> + Send;

    fn delete(&self, id: &R::Id) -> impl Future<Output = GatewayResult<()>> + Send;
}

impl<R, T> Gateway<R> for Arc<T>
where
    R: Resource,
    T: Gateway<R> + Send + Sync,
{
    async fn list(&self, scope: &R::Scope) -> GatewayResult<Vec<R>> {
        (**self).list(scope).await
    }

    async fn get(&self, id: &R::Id) -> GatewayResult<R> {
        (**self).get(id).await
    }

    async fn create(&self, new: R::New) -> GatewayResult<R> {
        (**self).create(new).await
    }

    async fn update(&self, id: &R::Id, patch: R::Patch) -> GatewayResult<R> {
        (**self).update(id, patch).await
    }

    async fn delete(&self, id: &R::Id) -> GatewayResult<()> {
        (**self).delete(id).await
    }
}
