//! End-to-end tests: loader → display service → surface pump → memory surface.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use menu_core::render::{CAROUSEL_CLASS, CARD_CLASS, FOCUSED_CLASS, OFFLINE_INDICATOR_ID};
use menu_core::{static_snapshot, Dish, DisplayType, MenuDocument, WeatherSnapshot, WeeklyHours};
use menu_display::application::autoplay::AutoplayConfig;
use menu_display::application::display_service::{DisplayEvent, DisplayOptions, DisplayService};
use menu_display::application::menu_source::{LoadError, LoadedMenu, MenuLoader, MenuSource};
use menu_display::application::network_status::Connectivity;
use menu_display::application::surface::spawn_surface_pump;
use menu_display::application::weather::WeatherProvider;
use menu_display::infrastructure::surface::MemorySurface;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

// ── Test doubles ──────────────────────────────────────────────────────────────

struct CountingLoader {
    document: Arc<MenuDocument>,
    calls: AtomicUsize,
}

impl CountingLoader {
    fn new(document: MenuDocument) -> Self {
        Self {
            document: Arc::new(document),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl MenuLoader for CountingLoader {
    async fn load(&self) -> Result<LoadedMenu, LoadError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(LoadedMenu {
            document: Arc::clone(&self.document),
            source: MenuSource::Fresh,
        })
    }
}

struct StaticWeather;

#[async_trait]
impl WeatherProvider for StaticWeather {
    async fn current(&self, _online: bool) -> WeatherSnapshot {
        static_snapshot(12)
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn document(display_type: DisplayType, dishes: u32) -> MenuDocument {
    let mut document = MenuDocument::with_dishes(
        (1..=dishes)
            .map(|id| Dish {
                name: format!("Plat {id}"),
                price: 9.5,
                ..Dish::blank(id)
            })
            .collect(),
    );
    document.display.display_type = display_type;
    document.weekly_hours = WeeklyHours::lunch_service();
    document
}

fn start(
    loader: Arc<CountingLoader>,
    initial: Connectivity,
) -> (DisplayService, MemorySurface, JoinHandle<()>) {
    let surface = MemorySurface::new();
    let (commands, pump) = spawn_surface_pump(Box::new(surface.clone()));
    let service = DisplayService::new(
        loader,
        Arc::new(StaticWeather),
        commands,
        AutoplayConfig::default(),
        initial,
        DisplayOptions::default(),
    );
    (service, surface, pump)
}

/// Drops the service (and with it every command sender) and waits for the
/// pump to drain.
async fn finish(service: DisplayService, pump: JoinHandle<()>) {
    drop(service);
    pump.await.unwrap();
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn test_offline_to_online_triggers_exactly_one_reload_and_rerender() {
    // Arrange
    let loader = Arc::new(CountingLoader::new(document(DisplayType::Grid, 3)));
    let (mut service, surface, pump) = start(Arc::clone(&loader), Connectivity::Offline);
    let (events_tx, events_rx) = mpsc::channel(16);

    // Act: the probe reports online three times in a row
    for online in [true, true, true] {
        events_tx.send(DisplayEvent::Connectivity(online)).await.unwrap();
    }
    events_tx.send(DisplayEvent::Shutdown).await.unwrap();
    service.run(events_rx).await.unwrap();
    finish(service, pump).await;

    // Assert
    assert_eq!(loader.calls.load(Ordering::SeqCst), 1);
    let record = surface.record();
    assert_eq!(record.mounts.len(), 1);
    let indicator = record.tree.as_ref().unwrap().find_by_id(OFFLINE_INDICATOR_ID).unwrap();
    assert_eq!(indicator.style_value("display"), Some("none"));
}

#[tokio::test(start_paused = true)]
async fn test_grid_rotation_moves_focus_on_mounted_page() {
    // Arrange
    let loader = Arc::new(CountingLoader::new(document(DisplayType::Grid, 3)));
    let (mut service, surface, pump) = start(loader, Connectivity::Online);

    // Act
    service.reload().await.unwrap();
    tokio::time::sleep(Duration::from_secs(16)).await;
    finish(service, pump).await;

    // Assert
    let record = surface.record();
    let tree = record.tree.as_ref().unwrap();
    let focused: Vec<bool> = tree
        .all_by_class(CARD_CLASS)
        .iter()
        .map(|card| card.has_class(FOCUSED_CLASS))
        .collect();
    assert_eq!(focused, vec![false, true, false]);
    assert!(record.skipped.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_carousel_slides_after_settle_delay() {
    // Arrange
    let loader = Arc::new(CountingLoader::new(document(DisplayType::Carousel, 10)));
    let (mut service, surface, pump) = start(loader, Connectivity::Online);

    // Act
    service.reload().await.unwrap();
    tokio::time::sleep(Duration::from_millis(11_500)).await;
    finish(service, pump).await;

    // Assert: two slides happened, at 6 s and 11 s
    let record = surface.record();
    let carousel = record.tree.as_ref().unwrap().find_by_class(CAROUSEL_CLASS).unwrap();
    assert_eq!(carousel.style_value("transform"), Some("translateX(-50%)"));
}

#[tokio::test(start_paused = true)]
async fn test_switching_to_sandwich_stops_previous_animation() {
    // Arrange: start on a carousel
    let loader = Arc::new(CountingLoader::new(document(DisplayType::Carousel, 10)));
    let (mut service, surface, pump) = start(loader, Connectivity::Online);
    service.reload().await.unwrap();

    // Act: a new week's document arrives with the sandwich layout
    service
        .render(Arc::new(document(DisplayType::Sandwich, 6)))
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_secs(60)).await;
    finish(service, pump).await;

    // Assert: nothing patched the sandwich page
    let record = surface.record();
    assert_eq!(record.mounts.len(), 2);
    assert!(record.tree.as_ref().unwrap().find_by_class(CAROUSEL_CLASS).is_none());
    assert!(record.skipped.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_single_dish_grid_is_stable() {
    let loader = Arc::new(CountingLoader::new(document(DisplayType::Grid, 1)));
    let (mut service, surface, pump) = start(loader, Connectivity::Online);

    service.reload().await.unwrap();
    tokio::time::sleep(Duration::from_secs(120)).await;
    finish(service, pump).await;

    let record = surface.record();
    assert_eq!(record.patches.len(), 1);
    let tree = record.tree.as_ref().unwrap();
    assert!(tree.find_by_class(CARD_CLASS).unwrap().has_class(FOCUSED_CLASS));
}
