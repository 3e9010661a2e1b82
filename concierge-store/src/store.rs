use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use concierge_core::{
    Gateway, GatewayError, InsertPosition, LoadState, RefreshPolicy, Resource, StoreFailure,
};
use error_stack::Report;
use itertools::Itertools;
use tokio::sync::{RwLock, watch};
use tracing::{debug, error, instrument};

use crate::error::StoreConfigError;
use crate::notify::NotificationSink;
use crate::search;

/// What a consumer reads off the store in one go.
#[derive(Debug, Clone)]
pub struct StoreView<R: Resource> {
    pub collection: Vec<R>,
    pub load: LoadState,
    pub failure: Option<StoreFailure>,
}

struct StoreState<R: Resource> {
    collection: Vec<R>,
    scope: Option<R::Scope>,
    load: LoadState,
    failure: Option<StoreFailure>,
}

/// The authoritative client-side collection for one resource kind.
///
/// Owns the rows, the load state and the settled failure; every change goes
/// through the gateway and nothing else may touch the collection. Gateway
/// failures never escape: they settle into [`StoreFailure`] plus one error
/// notification, and the previous collection stays as it was.
///
/// List responses are guarded by a monotonically increasing fetch token, so
/// when fetches overlap (same scope or a scope change) only the response to
/// the latest issued request is applied; everything earlier is dropped
/// silently regardless of completion order.
pub struct EntityStore<R: Resource, G> {
    gateway: G,
    sink: NotificationSink,
    state: Arc<RwLock<StoreState<R>>>,
    fetch_seq: Arc<AtomicU64>,
    changed: watch::Sender<u64>,
    search_fields: Vec<&'static str>,
}

impl<R: Resource, G: Clone> Clone for EntityStore<R, G> {
    fn clone(&self) -> Self {
        Self {
            gateway: self.gateway.clone(),
            sink: self.sink.clone(),
            state: Arc::clone(&self.state),
            fetch_seq: Arc::clone(&self.fetch_seq),
            changed: self.changed.clone(),
            search_fields: self.search_fields.clone(),
        }
    }
}

impl<R, G> EntityStore<R, G>
where
    R: Resource,
    G: Gateway<R>,
{
    /// Store searching across every field the resource declares.
    pub fn new(gateway: G, sink: NotificationSink) -> Self {
        Self::build(gateway, sink, R::SEARCH_FIELDS.to_vec())
    }

    /// Store searching a subset of the declared fields. Unknown names are a
    /// construction error; nothing is re-checked per call.
    pub fn with_search_fields(
        gateway: G,
        sink: NotificationSink,
        fields: &[&'static str],
    ) -> Result<Self, StoreConfigError> {
        for field in fields {
            if !R::SEARCH_FIELDS.contains(field) {
                return Err(StoreConfigError::UnknownSearchField {
                    resource: R::NAME,
                    field,
                });
            }
        }
        Ok(Self::build(gateway, sink, fields.to_vec()))
    }

    fn build(gateway: G, sink: NotificationSink, search_fields: Vec<&'static str>) -> Self {
        let (changed, _) = watch::channel(0);
        Self {
            gateway,
            sink,
            state: Arc::new(RwLock::new(StoreState {
                collection: Vec::new(),
                scope: None,
                load: LoadState::Idle,
                failure: None,
            })),
            fetch_seq: Arc::new(AtomicU64::new(0)),
            changed,
            search_fields,
        }
    }

    /// Replace the collection with the server's rows for `scope`.
    #[instrument(skip_all, name = "store#fetch_all", fields(resource = R::NAME))]
    pub async fn fetch_all(&self, scope: R::Scope) {
        let token = self.fetch_seq.fetch_add(1, Ordering::SeqCst) + 1;
        self.begin().await;

        let outcome = self.gateway.list(&scope).await;

        let mut state = self.state.write().await;
        if token != self.fetch_seq.load(Ordering::SeqCst) {
            debug!("dropping list response superseded by a newer fetch");
            return;
        }
        match outcome {
            Ok(rows) => {
                state.collection = rows.into_iter().unique_by(|row| row.id().clone()).collect();
                state.scope = Some(scope);
                state.load = LoadState::Success;
                debug!(rows = state.collection.len(), "collection replaced");
            }
            Err(report) => {
                self.fail(&mut state, report, format!("failed to load {}s", R::NAME));
            }
        }
        drop(state);
        self.publish();
    }

    /// Refresh one entity from the server. Whether a row the collection does
    /// not hold gets inserted is the resource's call (`R::REFRESH`).
    #[instrument(skip_all, name = "store#get_by_id", fields(resource = R::NAME))]
    pub async fn get_by_id(&self, id: &R::Id) -> Option<R> {
        self.begin().await;

        let outcome = self.gateway.get(id).await;

        let mut state = self.state.write().await;
        let fetched = match outcome {
            Ok(entity) => {
                let held = state.collection.iter().position(|row| row.id() == entity.id());
                match held {
                    Some(at) => state.collection[at] = entity.clone(),
                    None if R::REFRESH == RefreshPolicy::InsertIfAbsent => {
                        insert(&mut state.collection, entity.clone());
                    }
                    None => {}
                }
                state.load = LoadState::Success;
                Some(entity)
            }
            Err(report) => {
                self.fail(&mut state, report, format!("failed to load {}", R::NAME));
                None
            }
        };
        drop(state);
        self.publish();
        fetched
    }

    #[instrument(skip_all, name = "store#create", fields(resource = R::NAME))]
    pub async fn create(&self, new: R::New) -> Option<R> {
        self.begin().await;

        let outcome = self.gateway.create(new).await;

        let mut state = self.state.write().await;
        let created = match outcome {
            Ok(entity) => {
                let held = state.collection.iter().position(|row| row.id() == entity.id());
                match held {
                    // the server answered with a row we already hold; one
                    // entity per id, so refresh it in place
                    Some(at) => state.collection[at] = entity.clone(),
                    None => insert(&mut state.collection, entity.clone()),
                }
                state.load = LoadState::Success;
                self.sink.notify_success(format!("{} created", R::NAME));
                Some(entity)
            }
            Err(report) => {
                self.fail(&mut state, report, format!("failed to create {}", R::NAME));
                None
            }
        };
        drop(state);
        self.publish();
        created
    }

    #[instrument(skip_all, name = "store#update", fields(resource = R::NAME))]
    pub async fn update(&self, id: &R::Id, patch: R::Patch) -> Option<R> {
        self.begin().await;

        let outcome = self.gateway.update(id, patch).await;

        let mut state = self.state.write().await;
        let updated = match outcome {
            Ok(entity) => {
                if let Some(at) = state.collection.iter().position(|row| row.id() == id) {
                    state.collection[at] = entity.clone();
                }
                state.load = LoadState::Success;
                self.sink.notify_success(format!("{} updated", R::NAME));
                Some(entity)
            }
            Err(report) => {
                self.fail(&mut state, report, format!("failed to update {}", R::NAME));
                None
            }
        };
        drop(state);
        self.publish();
        updated
    }

    #[instrument(skip_all, name = "store#delete", fields(resource = R::NAME))]
    pub async fn delete(&self, id: &R::Id) -> bool {
        self.begin().await;

        let outcome = self.gateway.delete(id).await;

        let mut state = self.state.write().await;
        let deleted = match outcome {
            Ok(()) => {
                state.collection.retain(|row| row.id() != id);
                state.load = LoadState::Success;
                self.sink.notify_success(format!("{} deleted", R::NAME));
                true
            }
            Err(report) => {
                self.fail(&mut state, report, format!("failed to delete {}", R::NAME));
                false
            }
        };
        drop(state);
        self.publish();
        deleted
    }

    /// Filter the held collection; no network call, order preserved, blank
    /// query returns everything.
    pub async fn search(&self, query: &str) -> Vec<R> {
        let state = self.state.read().await;
        search::filter(&state.collection, &self.search_fields, query)
    }

    pub async fn snapshot(&self) -> StoreView<R> {
        let state = self.state.read().await;
        StoreView {
            collection: state.collection.clone(),
            load: state.load,
            failure: state.failure.clone(),
        }
    }

    pub async fn collection(&self) -> Vec<R> {
        self.state.read().await.collection.clone()
    }

    pub async fn load(&self) -> LoadState {
        self.state.read().await.load
    }

    pub async fn failure(&self) -> Option<StoreFailure> {
        self.state.read().await.failure.clone()
    }

    pub async fn scope(&self) -> Option<R::Scope> {
        self.state.read().await.scope.clone()
    }

    /// Version counter bumped on every applied change; await it to re-render.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.changed.subscribe()
    }

    async fn begin(&self) {
        let mut state = self.state.write().await;
        state.load = LoadState::Loading;
        state.failure = None;
        drop(state);
        self.publish();
    }

    fn fail(&self, state: &mut StoreState<R>, report: Report<GatewayError>, fallback: String) {
        error!("gateway call failed: {report:?}");
        let context = report.current_context();
        let message = context.message.clone().unwrap_or(fallback);
        state.load = LoadState::Failed;
        state.failure = Some(StoreFailure::new(context.kind, message.clone()));
        self.sink.notify_error(message);
    }

    fn publish(&self) {
        self.changed.send_modify(|version| *version += 1);
    }
}

fn insert<R: Resource>(collection: &mut Vec<R>, entity: R) {
    match R::CREATED_ENTITY {
        InsertPosition::Prepend => collection.insert(0, entity),
        InsertPosition::Append => collection.push(entity),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::Notification;
    use concierge_core::{ErrorKind, GatewayResult};
    use serde::{Deserialize, Serialize};
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use tokio::sync::mpsc::UnboundedReceiver;
    use tokio::sync::oneshot;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Booking {
        id: u32,
        guest_name: String,
    }

    fn booking(id: u32, guest_name: &str) -> Booking {
        Booking {
            id,
            guest_name: guest_name.to_string(),
        }
    }

    impl Resource for Booking {
        type Id = u32;
        type Scope = u32;
        type New = String;
        type Patch = String;

        const NAME: &'static str = "booking";
        const SEARCH_FIELDS: &'static [&'static str] = &["guest_name"];

        fn id(&self) -> &u32 {
            &self.id
        }

        fn search_field(&self, field: &str) -> Option<&str> {
            match field {
                "guest_name" => Some(&self.guest_name),
                _ => None,
            }
        }
    }

    enum ListReply {
        Now(GatewayResult<Vec<Booking>>),
        AfterGate(oneshot::Receiver<()>, GatewayResult<Vec<Booking>>),
    }

    /// Gateway answering from scripted queues, so tests control both the
    /// results and (via gates) the completion order.
    #[derive(Default)]
    struct ScriptedGateway {
        lists: Mutex<VecDeque<ListReply>>,
        gets: Mutex<VecDeque<GatewayResult<Booking>>>,
        creates: Mutex<VecDeque<GatewayResult<Booking>>>,
        updates: Mutex<VecDeque<GatewayResult<Booking>>>,
        deletes: Mutex<VecDeque<GatewayResult<()>>>,
    }

    impl ScriptedGateway {
        fn push_list(&self, result: GatewayResult<Vec<Booking>>) {
            self.lists.lock().unwrap().push_back(ListReply::Now(result));
        }

        fn push_gated_list(&self, gate: oneshot::Receiver<()>, result: GatewayResult<Vec<Booking>>) {
            self.lists
                .lock()
                .unwrap()
                .push_back(ListReply::AfterGate(gate, result));
        }

        fn push_get(&self, result: GatewayResult<Booking>) {
            self.gets.lock().unwrap().push_back(result);
        }

        fn push_create(&self, result: GatewayResult<Booking>) {
            self.creates.lock().unwrap().push_back(result);
        }

        fn push_update(&self, result: GatewayResult<Booking>) {
            self.updates.lock().unwrap().push_back(result);
        }

        fn push_delete(&self, result: GatewayResult<()>) {
            self.deletes.lock().unwrap().push_back(result);
        }
    }

    impl Gateway<Booking> for ScriptedGateway {
        async fn list(&self, _scope: &u32) -> GatewayResult<Vec<Booking>> {
            let reply = self
                .lists
                .lock()
                .unwrap()
                .pop_front()
                .expect("unscripted list call");
            match reply {
                ListReply::Now(result) => result,
                ListReply::AfterGate(gate, result) => {
                    let _ = gate.await;
                    result
                }
            }
        }

        async fn get(&self, _id: &u32) -> GatewayResult<Booking> {
            self.gets.lock().unwrap().pop_front().expect("unscripted get call")
        }

        async fn create(&self, _new: String) -> GatewayResult<Booking> {
            self.creates
                .lock()
                .unwrap()
                .pop_front()
                .expect("unscripted create call")
        }

        async fn update(&self, _id: &u32, _patch: String) -> GatewayResult<Booking> {
            self.updates
                .lock()
                .unwrap()
                .pop_front()
                .expect("unscripted update call")
        }

        async fn delete(&self, _id: &u32) -> GatewayResult<()> {
            self.deletes
                .lock()
                .unwrap()
                .pop_front()
                .expect("unscripted delete call")
        }
    }

    type TestStore = EntityStore<Booking, Arc<ScriptedGateway>>;

    fn harness() -> (TestStore, Arc<ScriptedGateway>, UnboundedReceiver<Notification>) {
        let gateway = Arc::new(ScriptedGateway::default());
        let (sink, notifications) = NotificationSink::channel();
        let store = EntityStore::new(Arc::clone(&gateway), sink);
        (store, gateway, notifications.into_inner())
    }

    fn drain(notifications: &mut UnboundedReceiver<Notification>) -> Vec<Notification> {
        let mut seen = Vec::new();
        while let Ok(notification) = notifications.try_recv() {
            seen.push(notification);
        }
        seen
    }

    #[tokio::test]
    async fn fetch_all_replaces_the_collection() {
        let (store, gateway, mut notifications) = harness();
        gateway.push_list(Ok(vec![booking(1, "John"), booking(2, "Amy")]));

        store.fetch_all(7).await;

        let view = store.snapshot().await;
        assert_eq!(view.collection, vec![booking(1, "John"), booking(2, "Amy")]);
        assert_eq!(view.load, LoadState::Success);
        assert_eq!(view.failure, None);
        assert_eq!(store.scope().await, Some(7));
        assert!(drain(&mut notifications).is_empty(), "reads do not notify");
    }

    #[tokio::test]
    async fn fetch_all_drops_duplicate_ids_keeping_the_first() {
        let (store, gateway, _notifications) = harness();
        gateway.push_list(Ok(vec![
            booking(1, "John"),
            booking(2, "Amy"),
            booking(1, "John again"),
        ]));

        store.fetch_all(7).await;

        assert_eq!(
            store.collection().await,
            vec![booking(1, "John"), booking(2, "Amy")]
        );
    }

    #[tokio::test]
    async fn failed_fetch_keeps_the_previous_collection() {
        let (store, gateway, mut notifications) = harness();
        gateway.push_list(Ok(vec![booking(1, "John")]));
        store.fetch_all(7).await;

        gateway.push_list(Err(Report::new(GatewayError::network())));
        store.fetch_all(7).await;

        let view = store.snapshot().await;
        assert_eq!(view.collection, vec![booking(1, "John")]);
        assert_eq!(view.load, LoadState::Failed);
        let failure = view.failure.expect("failure must be recorded");
        assert_eq!(failure.kind, ErrorKind::Network);
        assert_eq!(failure.message, "failed to load bookings");
        assert_eq!(
            drain(&mut notifications),
            vec![Notification::Error("failed to load bookings".into())]
        );
    }

    #[tokio::test]
    async fn superseded_fetch_response_is_dropped_even_if_it_completes_last() {
        let (store, gateway, _notifications) = harness();
        let (release, gate) = oneshot::channel();
        // scope A's response is held open until after scope B settles
        gateway.push_gated_list(gate, Ok(vec![booking(1, "stale scope A")]));
        gateway.push_list(Ok(vec![booking(2, "scope B")]));

        let first = store.fetch_all(1);
        let second = async {
            store.fetch_all(2).await;
            release.send(()).unwrap();
        };
        tokio::join!(first, second);

        let view = store.snapshot().await;
        assert_eq!(view.collection, vec![booking(2, "scope B")]);
        assert_eq!(view.load, LoadState::Success);
        assert_eq!(store.scope().await, Some(2));
    }

    #[tokio::test]
    async fn create_prepends_and_notifies_success() {
        let (store, gateway, mut notifications) = harness();
        gateway.push_list(Ok(vec![booking(1, "John")]));
        store.fetch_all(7).await;

        gateway.push_create(Ok(booking(2, "Amy")));
        let created = store.create("Amy".into()).await;

        assert_eq!(created, Some(booking(2, "Amy")));
        assert_eq!(
            store.collection().await,
            vec![booking(2, "Amy"), booking(1, "John")]
        );
        assert_eq!(
            drain(&mut notifications),
            vec![Notification::Success("booking created".into())]
        );
    }

    #[tokio::test]
    async fn create_never_duplicates_an_id_already_held() {
        let (store, gateway, _notifications) = harness();
        gateway.push_list(Ok(vec![booking(1, "John")]));
        store.fetch_all(7).await;

        gateway.push_create(Ok(booking(1, "John refreshed")));
        store.create("John".into()).await;

        assert_eq!(store.collection().await, vec![booking(1, "John refreshed")]);
    }

    #[tokio::test]
    async fn failed_create_leaves_the_collection_alone() {
        let (store, gateway, mut notifications) = harness();
        gateway.push_list(Ok(vec![booking(1, "John")]));
        store.fetch_all(7).await;

        gateway.push_create(Err(Report::new(GatewayError::validation("name required"))));
        let created = store.create("".into()).await;

        assert_eq!(created, None);
        assert_eq!(store.collection().await, vec![booking(1, "John")]);
        let failure = store.failure().await.expect("failure must be recorded");
        assert_eq!(failure.kind, ErrorKind::Validation);
        assert_eq!(
            failure.message, "name required",
            "the gateway's structured message wins over the default"
        );
        assert_eq!(
            drain(&mut notifications),
            vec![Notification::Error("name required".into())]
        );
    }

    #[tokio::test]
    async fn update_replaces_in_place_preserving_position() {
        let (store, gateway, _notifications) = harness();
        gateway.push_list(Ok(vec![booking(1, "John"), booking(2, "Amy")]));
        store.fetch_all(7).await;

        gateway.push_update(Ok(booking(1, "Johnny")));
        let updated = store.update(&1, "Johnny".into()).await;

        assert_eq!(updated, Some(booking(1, "Johnny")));
        assert_eq!(
            store.collection().await,
            vec![booking(1, "Johnny"), booking(2, "Amy")]
        );
    }

    #[tokio::test]
    async fn failed_update_returns_none_and_changes_nothing() {
        let (store, gateway, _notifications) = harness();
        gateway.push_list(Ok(vec![booking(1, "John")]));
        store.fetch_all(7).await;

        gateway.push_update(Err(Report::new(GatewayError::not_found())));
        let updated = store.update(&9, "ghost".into()).await;

        assert_eq!(updated, None);
        assert_eq!(store.collection().await, vec![booking(1, "John")]);
    }

    #[tokio::test]
    async fn delete_removes_exactly_the_targeted_row() {
        let (store, gateway, _notifications) = harness();
        gateway.push_list(Ok(vec![booking(1, "John"), booking(2, "Amy")]));
        store.fetch_all(7).await;

        gateway.push_delete(Ok(()));
        assert!(store.delete(&1).await);
        assert_eq!(store.collection().await, vec![booking(2, "Amy")]);
    }

    #[tokio::test]
    async fn failed_delete_reports_not_found_and_changes_nothing() {
        let (store, gateway, mut notifications) = harness();
        gateway.push_list(Ok(vec![booking(1, "John")]));
        store.fetch_all(7).await;

        gateway.push_delete(Err(Report::new(GatewayError::not_found())));
        assert!(!store.delete(&9).await);

        assert_eq!(store.collection().await, vec![booking(1, "John")]);
        let failure = store.failure().await.expect("failure must be recorded");
        assert!(failure.is_not_found());
        assert_eq!(drain(&mut notifications).len(), 1);
    }

    #[tokio::test]
    async fn get_by_id_refreshes_a_held_row_in_place() {
        let (store, gateway, _notifications) = harness();
        gateway.push_list(Ok(vec![booking(1, "John"), booking(2, "Amy")]));
        store.fetch_all(7).await;

        gateway.push_get(Ok(booking(2, "Amy B.")));
        let fetched = store.get_by_id(&2).await;

        assert_eq!(fetched, Some(booking(2, "Amy B.")));
        assert_eq!(
            store.collection().await,
            vec![booking(1, "John"), booking(2, "Amy B.")]
        );
    }

    #[tokio::test]
    async fn get_by_id_does_not_insert_unheld_rows_by_default() {
        let (store, gateway, _notifications) = harness();
        gateway.push_list(Ok(vec![booking(1, "John")]));
        store.fetch_all(7).await;

        gateway.push_get(Ok(booking(5, "walk-in")));
        let fetched = store.get_by_id(&5).await;

        assert_eq!(fetched, Some(booking(5, "walk-in")));
        assert_eq!(
            store.collection().await,
            vec![booking(1, "John")],
            "list views only refresh rows they already show"
        );
    }

    #[tokio::test]
    async fn get_by_id_failure_is_distinguishable_as_not_found() {
        let (store, gateway, _notifications) = harness();
        gateway.push_get(Err(Report::new(GatewayError::not_found())));

        assert_eq!(store.get_by_id(&5).await, None);

        let failure = store.failure().await.expect("failure must be recorded");
        assert!(failure.is_not_found());
        assert_eq!(store.load().await, LoadState::Failed);
    }

    #[tokio::test]
    async fn search_uses_the_configured_fields() {
        let (store, gateway, _notifications) = harness();
        gateway.push_list(Ok(vec![booking(1, "John"), booking(2, "Amy")]));
        store.fetch_all(7).await;

        assert_eq!(store.search("jo").await, vec![booking(1, "John")]);
        assert_eq!(store.search("").await.len(), 2);
    }

    #[tokio::test]
    async fn unknown_search_field_is_rejected_at_construction() {
        let gateway = Arc::new(ScriptedGateway::default());
        let (sink, _notifications) = NotificationSink::channel();

        let result: Result<TestStore, _> =
            EntityStore::with_search_fields(gateway, sink, &["room_number"]);

        assert!(matches!(
            result,
            Err(StoreConfigError::UnknownSearchField {
                resource: "booking",
                field: "room_number",
            })
        ));
    }

    #[tokio::test]
    async fn successful_mutations_keep_net_count_and_unique_ids() {
        let (store, gateway, mut notifications) = harness();
        gateway.push_create(Ok(booking(1, "John")));
        gateway.push_create(Ok(booking(2, "Amy")));
        gateway.push_create(Ok(booking(3, "Joan")));
        gateway.push_update(Ok(booking(2, "Amy B.")));
        gateway.push_delete(Ok(()));

        store.create("John".into()).await;
        store.create("Amy".into()).await;
        store.create("Joan".into()).await;
        store.update(&2, "Amy B.".into()).await;
        store.delete(&3).await;

        let collection = store.collection().await;
        // three creates minus one delete
        assert_eq!(collection.len(), 2);
        let ids: Vec<u32> = collection.iter().map(|row| *row.id()).collect();
        assert_eq!(ids.iter().collect::<std::collections::HashSet<_>>().len(), 2);
        // one notification per settled mutation
        assert_eq!(drain(&mut notifications).len(), 5);
    }

    #[tokio::test]
    async fn subscribers_see_a_version_bump_per_applied_change() {
        let (store, gateway, _notifications) = harness();
        let mut changes = store.subscribe();
        assert!(!changes.has_changed().unwrap());

        gateway.push_list(Ok(vec![booking(1, "John")]));
        store.fetch_all(7).await;

        assert!(changes.has_changed().unwrap());
        changes.mark_unchanged();

        gateway.push_delete(Ok(()));
        store.delete(&1).await;
        assert!(changes.has_changed().unwrap());
    }
}
