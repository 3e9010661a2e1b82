use concierge_core::GatewayResult;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;
use tracing::{debug, error};

/// What a consumer reads off a [`Query`] in one go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryView<T> {
    pub data: Option<T>,
    pub is_loading: bool,
    pub error: Option<String>,
}

struct QueryState<T> {
    data: Option<T>,
    loading: bool,
    error: Option<String>,
}

/// Single-shot async fetch with loading/error bookkeeping, for read-only
/// views that don't warrant a full [`EntityStore`](crate::EntityStore).
///
/// `run` is the fetch and the refetch; overlapping runs are safe, only the
/// newest invocation settles into the view. A failed run keeps the last
/// successful `data` and records the error instead.
pub struct Query<T, F, Fut>
where
    F: Fn() -> Fut,
    Fut: Future<Output = GatewayResult<T>>,
{
    producer: F,
    state: RwLock<QueryState<T>>,
    generation: AtomicU64,
}

impl<T, F, Fut> Query<T, F, Fut>
where
    T: Clone,
    F: Fn() -> Fut,
    Fut: Future<Output = GatewayResult<T>>,
{
    pub fn new(producer: F) -> Self {
        Self {
            producer,
            state: RwLock::new(QueryState {
                data: None,
                loading: false,
                error: None,
            }),
            generation: AtomicU64::new(0),
        }
    }

    pub async fn run(&self) {
        let token = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        {
            let mut state = self.state.write().await;
            state.loading = true;
            state.error = None;
        }

        let outcome = (self.producer)().await;

        let mut state = self.state.write().await;
        if token != self.generation.load(Ordering::SeqCst) {
            debug!("dropping query result superseded by a newer run");
            return;
        }
        state.loading = false;
        match outcome {
            Ok(data) => {
                state.data = Some(data);
            }
            Err(report) => {
                error!("query producer failed: {report:?}");
                let context = report.current_context();
                state.error = Some(
                    context
                        .message
                        .clone()
                        .unwrap_or_else(|| context.kind.to_string()),
                );
            }
        }
    }

    pub async fn snapshot(&self) -> QueryView<T> {
        let state = self.state.read().await;
        QueryView {
            data: state.data.clone(),
            is_loading: state.loading,
            error: state.error.clone(),
        }
    }
}
