use ::std::sync::Arc;
use ::std::time::Duration;
use ::std::time::UNIX_EPOCH;

use ::domain::AdCreative;
use ::domain::Channel;
use ::domain::ChannelMetadata;
use ::domain::Quality;
use ::domain::Rendition;
use ::domain::Video;
use ::domain::VideoMetadata;
use ::domain::Viewer;
use ::domain::Visibility;
use ::infrastructures::boundaries::RecordingView;
use ::infrastructures::gateways::catalogs::FixtureCatalog;
use ::infrastructures::gateways::clocks::ManualClock;
use ::infrastructures::gateways::ledgers::RecordingHistoryLedger;
use ::infrastructures::gateways::navigators::InMemoryNavigator;
use ::infrastructures::gateways::pipelines::PipelineCommand;
use ::infrastructures::gateways::pipelines::SimulatedPipeline;
use ::use_cases::availability::Availability;
use ::use_cases::boundaries::Accept;
use ::use_cases::boundaries::SurfaceCommand;
use ::use_cases::boundaries::WatchRequestModel;
use ::use_cases::boundaries::WatchView;
use ::use_cases::gateways::Catalog;
use ::use_cases::gateways::Clock;
use ::use_cases::gateways::HistoryLedger;
use ::use_cases::gateways::MediaPipeline;
use ::use_cases::gateways::Navigator;
use ::use_cases::interactors::WatchSurfaceInteractor;
use ::use_cases::models::events::SurfaceEvent;
use ::use_cases::queue::PlayQueue;
use ::use_cases::session::SessionStore;

const TICK: Duration = Duration::from_millis(10);

/// Long enough for every timer and pump to run a few rounds.
const SETTLE: Duration = Duration::from_millis(120);

fn clock_start() -> ::domain::Timestamp {
    UNIX_EPOCH + Duration::from_secs(1_000_000)
}

fn vod(id: &'static str, channel: &'static str, duration_seconds: f64) -> Video {
    Video {
        id: id.into(),
        channel: channel.into(),
        metadata: VideoMetadata { title: id.into() },
        renditions: vec![
            Rendition { quality: Quality::Q1080, url: format!("cdn/{id}-1080.mp4").into() },
            Rendition { quality: Quality::Q480, url: format!("cdn/{id}-480.mp4").into() },
        ]
        .into(),
        duration_seconds,
        is_live: false,
        visibility: Visibility::Public,
        premiere_time: None,
    }
}

fn channel(id: &'static str) -> Channel {
    Channel {
        id: id.into(),
        metadata: ChannelMetadata { title: id.into(), handle: format!("@{id}").into() },
    }
}

fn creative() -> AdCreative {
    AdCreative { id: "house-ad".into(), url: "ads/house.mp4".into(), duration_seconds: 15.0 }
}

fn base_catalog() -> FixtureCatalog {
    FixtureCatalog::new()
        .with_channel(channel("workshop"))
        .with_channel(channel("garage"))
        .with_video(vod("trailer", "workshop", 120.0))
        .with_video(vod("second", "garage", 60.0))
        .with_ad(creative())
}

struct Harness {
    interactor: Arc<WatchSurfaceInteractor>,
    view: Arc<RecordingView>,
    pipeline: Arc<SimulatedPipeline>,
    clock: Arc<ManualClock>,
    navigator: Arc<InMemoryNavigator>,
    history: Arc<RecordingHistoryLedger>,
    sessions: Arc<::tokio::sync::Mutex<SessionStore>>,
}

fn make_harness(catalog: FixtureCatalog, pipeline: SimulatedPipeline, viewer: Viewer) -> Harness {
    let view = Arc::new(RecordingView::new());
    let catalog = Arc::new(catalog);
    let history = Arc::new(RecordingHistoryLedger::new());
    let pipeline = Arc::new(pipeline);
    let navigator = Arc::new(InMemoryNavigator::starting_at("/".into()));
    let clock = Arc::new(ManualClock::starting_at(clock_start()));
    let sessions = Arc::new(::tokio::sync::Mutex::new(SessionStore::new()));
    let queue = Arc::new(::tokio::sync::Mutex::new(PlayQueue::new()));

    let interactor = Arc::new(WatchSurfaceInteractor::new(
        Arc::clone(&view) as Arc<dyn WatchView>,
        Arc::clone(&catalog) as Arc<dyn Catalog>,
        Arc::clone(&history) as Arc<dyn HistoryLedger>,
        Arc::clone(&pipeline) as Arc<dyn MediaPipeline>,
        Arc::clone(&navigator) as Arc<dyn Navigator>,
        Arc::clone(&clock) as Arc<dyn Clock>,
        viewer,
        Arc::clone(&sessions),
        Arc::clone(&queue),
        TICK,
    ));

    Harness { interactor, view, pipeline, clock, navigator, history, sessions }
}

fn member_of_nothing(id: &'static str) -> Viewer {
    Viewer { id: id.into(), is_premium: false }
}

fn premium(id: &'static str) -> Viewer {
    Viewer { id: id.into(), is_premium: true }
}

async fn watch(harness: &Harness, id: &'static str) {
    let request = WatchRequestModel { video_id: id.into(), route: format!("/watch/{id}").into() };
    Arc::clone(&harness.interactor).accept(request).await.unwrap();
    ::tokio::time::sleep(SETTLE).await;
}

fn progress_updates(view: &RecordingView) -> usize {
    view.surface_events()
        .iter()
        .filter(|event| matches!(event, SurfaceEvent::ProgressUpdated { .. }))
        .count()
}

#[tokio::test]
async fn ad_gates_content_until_skipped_then_queue_advances() {
    let harness = make_harness(base_catalog(), SimulatedPipeline::new(), member_of_nothing("vera"));

    let queued = vod("second", "garage", 60.0);
    Arc::clone(&harness.interactor)
        .accept(SurfaceCommand::Enqueue { video: queued })
        .await
        .unwrap();

    watch(&harness, "trailer").await;

    // The gate holds the element: not a single content command yet.
    assert!(harness.view.contains(&SurfaceEvent::AdStarted { creative: creative() }));
    assert!(harness.pipeline.commands().is_empty());

    // Skip eligibility opens five seconds in, on the next tick.
    harness.clock.advance_ms(5_000);
    ::tokio::time::sleep(SETTLE).await;
    assert!(harness.view.contains(&SurfaceEvent::AdSkippable));

    harness.clock.advance_ms(1_000);
    Arc::clone(&harness.interactor).accept(SurfaceCommand::SkipAd).await.unwrap();
    ::tokio::time::sleep(SETTLE).await;

    assert!(harness.view.contains(&SurfaceEvent::AdEnded));
    let commands = harness.pipeline.commands();
    assert!(commands.contains(&PipelineCommand::Load("cdn/trailer-1080.mp4".into())));
    assert!(commands.contains(&PipelineCommand::Play));

    // Content runs out; the queue supplies the next session target.
    harness.pipeline.advance(120.0);
    ::tokio::time::sleep(SETTLE).await;

    assert!(harness
        .view
        .contains(&SurfaceEvent::AvailabilityChanged { availability: Availability::Ended }));
    assert!(harness.view.contains(&SurfaceEvent::AutoAdvanced { video_id: "second".into() }));
    assert!(harness.navigator.visited().contains(&"/watch/second".into()));
    assert_eq!(harness.sessions.lock().await.current().unwrap().video.id, "second");

    let watched: Vec<_> = harness.history.entries().into_iter().map(|(_, video)| video).collect();
    assert!(watched.contains(&"trailer".into()));
    assert!(watched.contains(&"second".into()));
}

#[tokio::test]
async fn premium_viewers_are_never_shown_the_gate() {
    let harness = make_harness(base_catalog(), SimulatedPipeline::new(), premium("pat"));

    watch(&harness, "trailer").await;

    let events = harness.view.surface_events();
    assert!(!events.iter().any(|event| matches!(event, SurfaceEvent::AdStarted { .. })));
    assert!(harness.pipeline.commands().contains(&PipelineCommand::Play));
}

#[tokio::test]
async fn ad_outage_fails_open_to_content() {
    let harness =
        make_harness(base_catalog().with_ad_outage(), SimulatedPipeline::new(), member_of_nothing("vera"));

    watch(&harness, "trailer").await;

    assert!(!harness
        .view
        .surface_events()
        .iter()
        .any(|event| matches!(event, SurfaceEvent::AdStarted { .. })));
    assert!(harness.pipeline.commands().contains(&PipelineCommand::Play));
    assert!(!harness.view.diagnostics().is_empty());
}

#[tokio::test]
async fn premiere_locks_then_ticks_out_once_reached() {
    let mut premiere = vod("launch", "workshop", 90.0);
    premiere.premiere_time = Some(clock_start() + Duration::from_secs(90));
    let catalog = base_catalog().with_video(premiere);
    let harness = make_harness(catalog, SimulatedPipeline::new(), premium("pat"));

    watch(&harness, "launch").await;

    assert!(harness.view.contains(&SurfaceEvent::AvailabilityChanged {
        availability: Availability::LockedPremiere { remaining_seconds: 90 },
    }));
    assert!(harness.view.contains(&SurfaceEvent::PremiereCountdown { remaining_seconds: 90 }));
    assert!(harness.pipeline.commands().is_empty());

    // Still short of the instant: locked, counting down.
    harness.clock.advance(Duration::from_secs(50));
    ::tokio::time::sleep(SETTLE).await;
    assert!(harness.view.contains(&SurfaceEvent::PremiereCountdown { remaining_seconds: 40 }));
    assert!(harness.pipeline.commands().is_empty());

    // Past it: the very next tick unlocks into on-demand playback.
    harness.clock.advance(Duration::from_secs(40));
    ::tokio::time::sleep(SETTLE).await;

    assert!(harness
        .view
        .contains(&SurfaceEvent::AvailabilityChanged { availability: Availability::Vod }));
    assert!(harness.pipeline.commands().contains(&PipelineCommand::Play));
}

#[tokio::test]
async fn members_only_content_fails_closed() {
    let mut backstage = vod("backstage", "workshop", 30.0);
    backstage.visibility = Visibility::MembersOnly;

    // Not a member: locked even though the record is otherwise playable.
    let harness =
        make_harness(base_catalog().with_video(backstage.clone()), SimulatedPipeline::new(), premium("pat"));
    watch(&harness, "backstage").await;
    assert!(harness
        .view
        .contains(&SurfaceEvent::AvailabilityChanged { availability: Availability::LockedMembership }));
    assert!(harness.pipeline.commands().is_empty());

    // A member of the owning channel is let through.
    let catalog = base_catalog()
        .with_video(backstage.clone())
        .with_membership("pat".into(), "workshop".into());
    let harness = make_harness(catalog, SimulatedPipeline::new(), premium("pat"));
    watch(&harness, "backstage").await;
    assert!(harness
        .view
        .contains(&SurfaceEvent::AvailabilityChanged { availability: Availability::Vod }));

    // Membership service down: locked for the member too, never open.
    let catalog = base_catalog()
        .with_video(backstage)
        .with_membership("pat".into(), "workshop".into())
        .with_membership_outage();
    let harness = make_harness(catalog, SimulatedPipeline::new(), premium("pat"));
    watch(&harness, "backstage").await;
    assert!(harness
        .view
        .contains(&SurfaceEvent::AvailabilityChanged { availability: Availability::LockedMembership }));
}

#[tokio::test]
async fn membership_lock_precedes_live() {
    let mut show = vod("show", "workshop", 0.0);
    show.visibility = Visibility::MembersOnly;
    show.is_live = true;

    let harness = make_harness(base_catalog().with_video(show), SimulatedPipeline::new(), premium("pat"));
    watch(&harness, "show").await;

    assert!(harness
        .view
        .contains(&SurfaceEvent::AvailabilityChanged { availability: Availability::LockedMembership }));
    assert!(!harness
        .view
        .contains(&SurfaceEvent::AvailabilityChanged { availability: Availability::Live }));
}

#[tokio::test]
async fn miniplayer_follows_route_changes_and_close_ends_the_session() {
    let harness = make_harness(base_catalog(), SimulatedPipeline::new(), premium("pat"));
    watch(&harness, "trailer").await;

    assert!(harness.view.contains(&SurfaceEvent::MiniplayerVisibility { visible: false }));

    Arc::clone(&harness.interactor)
        .accept(SurfaceCommand::RouteChanged { route: "/".into() })
        .await
        .unwrap();
    assert!(harness.view.contains(&SurfaceEvent::MiniplayerVisibility { visible: true }));

    // Back on the owning route the floating view must disappear.
    Arc::clone(&harness.interactor)
        .accept(SurfaceCommand::RouteChanged { route: "/watch/trailer".into() })
        .await
        .unwrap();
    let visibilities: Vec<_> = harness
        .view
        .surface_events()
        .iter()
        .filter_map(|event| match event {
            SurfaceEvent::MiniplayerVisibility { visible } => Some(*visible),
            _ => None,
        })
        .collect();
    assert_eq!(visibilities.last(), Some(&false));

    Arc::clone(&harness.interactor).accept(SurfaceCommand::CloseMiniplayer).await.unwrap();
    assert!(harness.view.contains(&SurfaceEvent::SessionClosed));
    assert!(harness.sessions.lock().await.current().is_none());
    assert!(harness.pipeline.commands().contains(&PipelineCommand::Pause));
}

#[tokio::test]
async fn transient_fetch_gets_one_retry() {
    let catalog = base_catalog().with_transient_failures("trailer".into(), 1);
    let harness = make_harness(catalog, SimulatedPipeline::new(), premium("pat"));
    watch(&harness, "trailer").await;
    assert!(harness.view.contains(&SurfaceEvent::SessionReplaced { video_id: "trailer".into() }));

    let catalog = base_catalog().with_transient_failures("trailer".into(), 2);
    let harness = make_harness(catalog, SimulatedPipeline::new(), premium("pat"));
    watch(&harness, "trailer").await;
    assert!(harness.view.contains(&SurfaceEvent::LoadFailed { video_id: "trailer".into() }));
}

#[tokio::test]
async fn unknown_video_is_terminal_not_found() {
    let harness = make_harness(base_catalog(), SimulatedPipeline::new(), premium("pat"));
    watch(&harness, "ghost").await;

    assert!(harness.view.contains(&SurfaceEvent::ContentNotFound { video_id: "ghost".into() }));
    assert!(harness.sessions.lock().await.current().is_none());
}

#[tokio::test]
async fn undecodable_source_falls_back_one_rung_then_surfaces_inline() {
    let pipeline = SimulatedPipeline::new().with_failing_url("cdn/trailer-1080.mp4".into());
    let harness = make_harness(base_catalog(), pipeline, premium("pat"));
    watch(&harness, "trailer").await;

    harness.pipeline.advance(1.0);
    ::tokio::time::sleep(SETTLE).await;

    let commands = harness.pipeline.commands();
    assert!(commands.contains(&PipelineCommand::Load("cdn/trailer-480.mp4".into())));
    assert_eq!(harness.sessions.lock().await.current().unwrap().quality, Some(Quality::Q480));

    harness.pipeline.advance(1.0);
    ::tokio::time::sleep(SETTLE).await;
    assert!(progress_updates(&harness.view) > 0);
    assert!(!harness
        .view
        .surface_events()
        .iter()
        .any(|event| matches!(event, SurfaceEvent::InlinePlaybackError { .. })));

    // Both rungs bad: a single fallback, then a non-fatal inline error.
    let pipeline = SimulatedPipeline::new()
        .with_failing_url("cdn/trailer-1080.mp4".into())
        .with_failing_url("cdn/trailer-480.mp4".into());
    let harness = make_harness(base_catalog(), pipeline, premium("pat"));
    watch(&harness, "trailer").await;

    harness.pipeline.advance(1.0);
    ::tokio::time::sleep(SETTLE).await;
    harness.pipeline.advance(1.0);
    ::tokio::time::sleep(SETTLE).await;

    assert!(harness
        .view
        .surface_events()
        .iter()
        .any(|event| matches!(event, SurfaceEvent::InlinePlaybackError { .. })));
    assert!(!harness.view.contains(&SurfaceEvent::PlaybackStopped));
}

#[tokio::test]
async fn history_failures_never_reach_playback() {
    let view = Arc::new(RecordingView::new());
    let catalog = Arc::new(base_catalog());
    let pipeline = Arc::new(SimulatedPipeline::new());
    let navigator = Arc::new(InMemoryNavigator::starting_at("/".into()));
    let clock = Arc::new(ManualClock::starting_at(clock_start()));
    let sessions = Arc::new(::tokio::sync::Mutex::new(SessionStore::new()));
    let queue = Arc::new(::tokio::sync::Mutex::new(PlayQueue::new()));

    let interactor = Arc::new(WatchSurfaceInteractor::new(
        Arc::clone(&view) as Arc<dyn WatchView>,
        Arc::clone(&catalog) as Arc<dyn Catalog>,
        Arc::new(::infrastructures::gateways::ledgers::FailingHistoryLedger::new())
            as Arc<dyn HistoryLedger>,
        Arc::clone(&pipeline) as Arc<dyn MediaPipeline>,
        Arc::clone(&navigator) as Arc<dyn Navigator>,
        Arc::clone(&clock) as Arc<dyn Clock>,
        premium("pat"),
        Arc::clone(&sessions),
        Arc::clone(&queue),
        TICK,
    ));

    interactor
        .accept(WatchRequestModel { video_id: "trailer".into(), route: "/watch/trailer".into() })
        .await
        .unwrap();
    ::tokio::time::sleep(SETTLE).await;

    assert!(pipeline.commands().contains(&PipelineCommand::Play));
    assert!(!view.contains(&SurfaceEvent::LoadFailed { video_id: "trailer".into() }));
}

#[tokio::test]
async fn scrubbing_suppresses_progress_snapping_until_commit() {
    let harness = make_harness(base_catalog(), SimulatedPipeline::new(), premium("pat"));
    watch(&harness, "trailer").await;

    harness.pipeline.advance(1.0);
    ::tokio::time::sleep(SETTLE).await;
    assert!(progress_updates(&harness.view) > 0);

    Arc::clone(&harness.interactor).accept(SurfaceCommand::SeekStart).await.unwrap();
    let before = progress_updates(&harness.view);

    harness.pipeline.advance(1.0);
    ::tokio::time::sleep(SETTLE).await;
    assert_eq!(progress_updates(&harness.view), before);

    Arc::clone(&harness.interactor)
        .accept(SurfaceCommand::SeekCommit { position_seconds: 50.0 })
        .await
        .unwrap();

    assert!(harness.pipeline.commands().contains(&PipelineCommand::Seek(50.0)));
    let last_progress = harness
        .view
        .surface_events()
        .iter()
        .rev()
        .find_map(|event| match event {
            SurfaceEvent::ProgressUpdated { progress } => Some(*progress),
            _ => None,
        })
        .unwrap();
    assert_eq!(last_progress.played_seconds, 50.0);
}

#[tokio::test]
async fn controls_hide_after_idle_and_return_on_pointer_motion() {
    let harness = make_harness(base_catalog(), SimulatedPipeline::new(), premium("pat"));
    watch(&harness, "trailer").await;

    harness.clock.advance_ms(3_000);
    ::tokio::time::sleep(SETTLE).await;
    assert!(harness.view.contains(&SurfaceEvent::ControlsVisibility { visible: false }));

    Arc::clone(&harness.interactor).accept(SurfaceCommand::PointerMoved).await.unwrap();
    assert!(harness.view.contains(&SurfaceEvent::ControlsVisibility { visible: true }));
}

#[tokio::test]
async fn seeding_up_next_feeds_auto_advance() {
    let catalog = base_catalog().with_up_next("trailer".into(), vec!["second".into()]);
    let harness = make_harness(catalog, SimulatedPipeline::new(), premium("pat"));
    watch(&harness, "trailer").await;

    Arc::clone(&harness.interactor).accept(SurfaceCommand::SeedUpNext).await.unwrap();

    harness.pipeline.advance(120.0);
    ::tokio::time::sleep(SETTLE).await;

    assert!(harness.view.contains(&SurfaceEvent::AutoAdvanced { video_id: "second".into() }));
    assert_eq!(harness.sessions.lock().await.current().unwrap().video.id, "second");
}

#[tokio::test]
async fn live_chat_tab_is_refused_for_on_demand_content() {
    let harness = make_harness(base_catalog(), SimulatedPipeline::new(), premium("pat"));
    watch(&harness, "trailer").await;

    Arc::clone(&harness.interactor)
        .accept(SurfaceCommand::SelectTab { tab: ::use_cases::models::descriptors::TabMode::LiveChat })
        .await
        .unwrap();
    assert!(!harness
        .view
        .surface_events()
        .iter()
        .any(|event| matches!(event, SurfaceEvent::TabChanged { .. })));

    Arc::clone(&harness.interactor)
        .accept(SurfaceCommand::SelectTab { tab: ::use_cases::models::descriptors::TabMode::Transcript })
        .await
        .unwrap();
    assert!(harness.view.contains(&SurfaceEvent::TabChanged {
        tab: ::use_cases::models::descriptors::TabMode::Transcript,
    }));
}
