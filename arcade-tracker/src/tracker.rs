use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use arcade_shared::{tags, TrackPayload};

use crate::click::{click_target, Element};
use crate::config::TrackerConfig;
use crate::error::TrackerError;
use crate::scroll::{ScrollDepth, ScrollPosition};
use crate::session::{round_secs, Session};
use crate::storage::SessionStorage;
use crate::transport::{HttpTransport, Transport};

/// Instrumentation for one open page. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct Tracker {
    inner: Arc<Inner>,
}

struct Inner {
    transport: Arc<dyn Transport>,
    config: TrackerConfig,
    session: Session,
    path: String,
    opened_at: Instant,
    scroll: Mutex<ScrollDepth>,
    scroll_pending: AtomicBool,
}

impl Tracker {
    /// Open a page at `path`, posting to `config.endpoint` over HTTP.
    pub fn open(
        config: TrackerConfig,
        storage: &dyn SessionStorage,
        path: impl Into<String>,
    ) -> Result<Self, TrackerError> {
        let transport = HttpTransport::new(config.endpoint.clone(), config.request_timeout)?;
        Self::with_transport(config, storage, path, Arc::new(transport))
    }

    pub fn with_transport(
        config: TrackerConfig,
        storage: &dyn SessionStorage,
        path: impl Into<String>,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, TrackerError> {
        let session = Session::restore_or_create(
            storage,
            config.id_source,
            Utc::now().timestamp_millis(),
        )?;
        let path = path.into();
        tracing::debug!(session_id = %session.id, path = %path, "page opened");

        Ok(Self {
            inner: Arc::new(Inner {
                transport,
                config,
                session,
                path,
                opened_at: Instant::now(),
                scroll: Mutex::new(ScrollDepth::new()),
                scroll_pending: AtomicBool::new(false),
            }),
        })
    }

    pub fn session(&self) -> &Session {
        &self.inner.session
    }

    pub fn path(&self) -> &str {
        &self.inner.path
    }

    /// Send one event on its own task. Failures are logged and dropped.
    pub fn track(&self, event: &str, value: impl Into<String>) -> JoinHandle<()> {
        let payload = TrackPayload::new(
            self.inner.session.id.clone(),
            event,
            self.inner.path.clone(),
            value,
        );
        let transport = Arc::clone(&self.inner.transport);

        tokio::spawn(async move {
            if let Err(e) = transport.deliver(&payload).await {
                tracing::warn!(error = %e, event = %payload.event, "failed to track event");
            }
        })
    }

    /// Call once per page open.
    pub fn page_view(&self, title: impl Into<String>) -> JoinHandle<()> {
        self.track(tags::PAGE_VIEW, title)
    }

    /// `path` runs from the clicked element up to the root. Clicks outside
    /// any trackable element are ignored.
    pub fn click(&self, path: &[Element]) -> Option<JoinHandle<()>> {
        let target = click_target(path)?;
        Some(self.track(tags::CLICK, target.label()))
    }

    /// Scroll notification. Starts the throttle timer unless one is pending,
    /// in which case the notification is dropped and `None` is returned.
    /// `sample` is read when the timer fires.
    pub fn scroll<F>(&self, sample: F) -> Option<JoinHandle<()>>
    where
        F: FnOnce() -> ScrollPosition + Send + 'static,
    {
        if self.inner.scroll_pending.swap(true, Ordering::AcqRel) {
            return None;
        }

        let tracker = self.clone();
        Some(tokio::spawn(async move {
            tokio::time::sleep(tracker.inner.config.scroll_throttle).await;
            let position = sample();
            tracker.inner.scroll_pending.store(false, Ordering::Release);

            let checkpoint = tracker
                .inner
                .scroll
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .observe(position);
            if let Some(depth) = checkpoint {
                if let Err(e) = tracker.track(tags::SCROLL_DEPTH, depth.to_string()).await {
                    tracing::warn!(error = %e, event = tags::SCROLL_DEPTH, "delivery task failed");
                }
            }
        }))
    }

    pub fn max_scroll_depth(&self) -> u32 {
        self.inner
            .scroll
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .max_depth()
    }

    pub fn page_time(&self) -> JoinHandle<()> {
        let millis = self.inner.opened_at.elapsed().as_millis() as i64;
        self.track(tags::PAGE_TIME, round_secs(millis).to_string())
    }

    pub fn session_time(&self) -> JoinHandle<()> {
        let secs = self
            .inner
            .session
            .elapsed_secs(Utc::now().timestamp_millis());
        self.track(tags::SESSION_TIME, secs.to_string())
    }

    /// Page is going away: report time on page and time in session.
    pub fn unload(&self) -> [JoinHandle<()>; 2] {
        [self.page_time(), self.session_time()]
    }

    /// Report `session_time` every `heartbeat_interval`, starting one period
    /// from now. Abort the handle when the page unloads.
    pub fn spawn_heartbeat(&self) -> JoinHandle<()> {
        let tracker = self.clone();
        let period = self.inner.config.heartbeat_interval;

        tokio::spawn(async move {
            let mut ticks = tokio::time::interval_at(Instant::now() + period, period);
            loop {
                ticks.tick().await;
                tracker.session_time();
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::time::Duration;

    use crate::session::{SESSION_ID_KEY, SESSION_START_KEY};
    use crate::storage::MemoryStorage;

    #[derive(Default)]
    struct RecordingTransport {
        sent: Mutex<Vec<TrackPayload>>,
    }

    impl RecordingTransport {
        fn sent(&self) -> Vec<TrackPayload> {
            self.sent.lock().unwrap().clone()
        }

        fn tagged(&self, tag: &str) -> Vec<String> {
            self.sent()
                .into_iter()
                .filter(|p| p.event == tag)
                .map(|p| p.value)
                .collect()
        }
    }

    #[async_trait]
    impl Transport for RecordingTransport {
        async fn deliver(&self, payload: &TrackPayload) -> Result<(), TrackerError> {
            self.sent.lock().unwrap().push(payload.clone());
            Ok(())
        }
    }

    struct BrokenTransport;

    #[async_trait]
    impl Transport for BrokenTransport {
        async fn deliver(&self, _payload: &TrackPayload) -> Result<(), TrackerError> {
            Err(std::io::Error::other("connection refused").into())
        }
    }

    struct PanickingTransport;

    #[async_trait]
    impl Transport for PanickingTransport {
        async fn deliver(&self, _payload: &TrackPayload) -> Result<(), TrackerError> {
            panic!("transport bug");
        }
    }

    fn tracker() -> (Tracker, Arc<RecordingTransport>) {
        let transport = Arc::new(RecordingTransport::default());
        let tracker = Tracker::with_transport(
            TrackerConfig::default(),
            &MemoryStorage::new(),
            "/store",
            transport.clone(),
        )
        .unwrap();
        (tracker, transport)
    }

    fn at(pct: f64) -> ScrollPosition {
        ScrollPosition::new(pct * 10.0 - 100.0, 100.0, 1000.0)
    }

    #[tokio::test]
    async fn page_view_carries_session_path_and_title() {
        let (tracker, transport) = tracker();
        tracker.page_view("Arcade Store").await.unwrap();

        let sent = transport.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].session_id, tracker.session().id);
        assert_eq!(sent[0].event, "page_view");
        assert_eq!(sent[0].path, "/store");
        assert_eq!(sent[0].value, "Arcade Store");
    }

    #[tokio::test]
    async fn pages_on_the_same_storage_share_a_session() {
        let storage = MemoryStorage::new();
        let transport = Arc::new(RecordingTransport::default());
        let first =
            Tracker::with_transport(TrackerConfig::default(), &storage, "/", transport.clone())
                .unwrap();
        let second =
            Tracker::with_transport(TrackerConfig::default(), &storage, "/games", transport)
                .unwrap();

        assert_eq!(first.session(), second.session());
        assert_eq!(storage.get(SESSION_ID_KEY), Some(first.session().id.clone()));
        assert!(storage.get(SESSION_START_KEY).is_some());
    }

    #[tokio::test]
    async fn click_reports_label_of_trackable_ancestor() {
        let (tracker, transport) = tracker();
        let path = [
            Element::new("img"),
            Element::new("button").with_id("buy-now"),
        ];
        tracker.click(&path).unwrap().await.unwrap();

        assert!(tracker.click(&[Element::new("p")]).is_none());
        assert_eq!(transport.tagged("click"), vec!["buy-now"]);
    }

    #[tokio::test]
    async fn delivery_failure_is_swallowed() {
        let tracker = Tracker::with_transport(
            TrackerConfig::default(),
            &MemoryStorage::new(),
            "/",
            Arc::new(BrokenTransport),
        )
        .unwrap();

        assert!(tracker.page_view("Home").await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn scroll_is_throttled_and_sampled_when_the_timer_fires() {
        let (tracker, transport) = tracker();
        let position = Arc::new(Mutex::new(at(10.0)));

        let sampled = position.clone();
        let first = tracker
            .scroll(move || *sampled.lock().unwrap())
            .expect("timer starts");
        assert!(tracker.scroll(|| at(100.0)).is_none());
        assert!(tracker.scroll(|| at(100.0)).is_none());

        // The reader keeps scrolling before the timer fires.
        *position.lock().unwrap() = at(50.0);
        first.await.unwrap();

        assert_eq!(transport.tagged("scroll_depth"), vec!["50"]);
        assert_eq!(tracker.max_scroll_depth(), 50);

        // Pending flag is cleared once the sample is taken.
        tracker.scroll(|| at(75.0)).unwrap().await.unwrap();
        tracker.scroll(|| at(60.0)).unwrap().await.unwrap();
        assert_eq!(transport.tagged("scroll_depth"), vec!["50", "75"]);
    }

    #[tokio::test(start_paused = true)]
    async fn scroll_waits_for_the_throttle_period() {
        let (tracker, transport) = tracker();
        let handle = tracker.scroll(|| at(25.0)).unwrap();

        tokio::time::sleep(Duration::from_millis(99)).await;
        assert!(transport.sent().is_empty());

        handle.await.unwrap();
        assert_eq!(transport.tagged("scroll_depth"), vec!["25"]);
    }

    #[tokio::test(start_paused = true)]
    async fn scroll_outlives_a_panicking_delivery() {
        let tracker = Tracker::with_transport(
            TrackerConfig::default(),
            &MemoryStorage::new(),
            "/",
            Arc::new(PanickingTransport),
        )
        .unwrap();

        assert!(tracker.scroll(|| at(25.0)).unwrap().await.is_ok());
        assert_eq!(tracker.max_scroll_depth(), 25);
    }

    #[tokio::test]
    async fn session_time_counts_from_session_start_not_page_open() {
        let storage = MemoryStorage::new();
        let started = Utc::now().timestamp_millis() - 120_000;
        storage.set(SESSION_START_KEY, &started.to_string()).unwrap();

        let transport = Arc::new(RecordingTransport::default());
        let tracker =
            Tracker::with_transport(TrackerConfig::default(), &storage, "/", transport.clone())
                .unwrap();
        assert_eq!(tracker.session().started_at_ms, started);

        for handle in tracker.unload() {
            handle.await.unwrap();
        }

        assert_eq!(transport.tagged("page_time"), vec!["0"]);
        let session_secs: i64 = transport.tagged("session_time")[0].parse().unwrap();
        assert!((120..=121).contains(&session_secs), "{session_secs}");
    }

    #[tokio::test(start_paused = true)]
    async fn unload_reports_rounded_page_time() {
        let (tracker, transport) = tracker();
        tokio::time::sleep(Duration::from_millis(12_600)).await;

        for handle in tracker.unload() {
            handle.await.unwrap();
        }

        assert_eq!(transport.tagged("page_time"), vec!["13"]);
        assert_eq!(transport.tagged("session_time").len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn heartbeat_starts_one_period_after_open() {
        let (tracker, transport) = tracker();
        let heartbeat = tracker.spawn_heartbeat();

        tokio::time::sleep(Duration::from_secs(59)).await;
        assert!(transport.tagged("session_time").is_empty());

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(transport.tagged("session_time").len(), 1);

        tokio::time::sleep(Duration::from_secs(120)).await;
        assert_eq!(transport.tagged("session_time").len(), 3);

        heartbeat.abort();
    }
}
