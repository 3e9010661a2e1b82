use concierge_memory::MemoryGateway;
use concierge_resources::{
    Guest, GuestPatch, HotelId, NewGuest, NewRoom, Room, RoomCategory, RoomId,
};
use concierge_store::{EntityStore, Notification, NotificationSink, PaginationTracker};
use error_stack::{Report, ResultExt, fmt::ColorMode};
use optional_field::Field;
use tokio_stream::StreamExt;
use tracing::{error, info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Debug, thiserror::Error)]
#[error("the concierge demo exited with an error")]
struct AppError;

type AppResult<T> = Result<T, Report<AppError>>;

#[tokio::main]
async fn main() {
    match try_main().await {
        Ok(_) => info!("concierge demo shutting down"),
        Err(e) => {
            error!("concierge demo exited with error: {e:?}");
        }
    }
}

fn init_logging() {
    Report::set_color_mode(ColorMode::None);

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_env("CONCIERGE_LOG"))
        .init();
}

async fn try_main() -> AppResult<()> {
    init_logging();

    let (sink, mut notifications) = NotificationSink::channel();
    tokio::spawn(async move {
        while let Some(notification) = notifications.next().await {
            match notification {
                Notification::Success(message) => info!("{message}"),
                Notification::Error(message) => error!("{message}"),
            }
        }
    });

    run_guest_directory(&sink).await?;
    run_room_board(&sink).await;

    Ok(())
}

async fn run_guest_directory(sink: &NotificationSink) -> AppResult<()> {
    let store: EntityStore<Guest, _> = EntityStore::with_search_fields(
        MemoryGateway::new(),
        sink.clone(),
        &["first_name", "last_name"],
    )
    .change_context(AppError)?;

    store.fetch_all(()).await;

    let john = store
        .create(NewGuest {
            first_name: "John".into(),
            last_name: "Smith".into(),
            email: "john@example.com".into(),
            phone: Some("555-0100".into()),
        })
        .await;
    store
        .create(NewGuest {
            first_name: "Amy".into(),
            last_name: "Jones".into(),
            email: "amy@example.com".into(),
            phone: None,
        })
        .await;

    let hits = store.search("jo").await;
    info!(hits = hits.len(), "searched the guest directory for \"jo\"");

    if let Some(john) = john {
        store
            .update(
                &john.id,
                GuestPatch {
                    first_name: None,
                    last_name: None,
                    email: None,
                    phone: Field::Present(None),
                },
            )
            .await;
    } else {
        warn!("guest create did not settle successfully");
    }

    let mut pages = PaginationTracker::new(10);
    pages.update_total_elements(store.collection().await.len() as u64);
    info!(
        page = pages.current_page(),
        total_pages = ?pages.total_pages(),
        "guest directory paged"
    );

    Ok(())
}

async fn run_room_board(sink: &NotificationSink) {
    let hotel = HotelId::generate();
    let seeded = vec![
        Room::create(
            RoomId::generate(),
            NewRoom {
                hotel_id: hotel,
                number: "101".into(),
                category: RoomCategory::Double,
                nightly_rate_cents: 12_500,
                capacity: 2,
            },
        ),
        Room::create(
            RoomId::generate(),
            NewRoom {
                hotel_id: hotel,
                number: "102".into(),
                category: RoomCategory::Suite,
                nightly_rate_cents: 27_000,
                capacity: 4,
            },
        ),
    ];
    let store: EntityStore<Room, _> = EntityStore::new(MemoryGateway::seeded(seeded), sink.clone());

    store.fetch_all(hotel).await;
    store
        .create(NewRoom {
            hotel_id: hotel,
            number: "103".into(),
            category: RoomCategory::Single,
            nightly_rate_cents: 9_500,
            capacity: 1,
        })
        .await;

    info!(
        rooms = store.collection().await.len(),
        hotel = %hotel,
        "room board loaded"
    );
}
