pub(crate) mod utils;

use ::domain::AdCreative;
use ::domain::Channel;
use ::domain::ChannelMetadata;
use ::domain::Quality;
use ::domain::Rendition;
use ::domain::Timestamp;
use ::domain::Video;
use ::domain::VideoMetadata;
use ::domain::Viewer;
use ::domain::Visibility;
use ::infrastructures::boundaries::ConsoleWatchView;
use ::infrastructures::gateways::catalogs::FixtureCatalog;
use ::infrastructures::gateways::clocks::ManualClock;
use ::infrastructures::gateways::ledgers::TracingHistoryLedger;
use ::infrastructures::gateways::navigators::InMemoryNavigator;
use ::infrastructures::gateways::pipelines::SimulatedPipeline;
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
use ::use_cases::queue::PlayQueue;
use ::use_cases::session::SessionStore;

use crate::utils::aliases::Fallible;
use crate::utils::extensions::OptionExt;

#[tokio::main]
async fn main() -> Fallible<()> {
    let writer = ::tracing_appender::rolling::minutely("logs", "cli.log");
    let (writer, _guard) = ::tracing_appender::non_blocking(writer);

    ::tracing_subscriber::fmt()
        .with_writer(writer)
        .with_env_filter(
            ::tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| ::tracing_subscriber::EnvFilter::new("info")),
        )
        .with_ansi(false)
        .init();

    let command = ::clap::Command::new("kinescope")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            ::clap::Command::new("watch").arg(
                ::clap::Arg::new("id")
                    .short('i')
                    .required(true)
                    .value_parser(::clap::value_parser!(::std::string::String)),
            ),
        )
        .subcommand(
            ::clap::Command::new("queue").arg(
                ::clap::Arg::new("ids")
                    .short('i')
                    .required(true)
                    .action(::clap::ArgAction::Append)
                    .value_parser(::clap::value_parser!(::std::string::String)),
            ),
        )
        .subcommand(::clap::Command::new("fixtures"))
        .arg(
            ::clap::Arg::new("viewer")
                .long("viewer")
                .default_value("local-viewer")
                .value_parser(::clap::value_parser!(::std::string::String)),
        )
        .arg(::clap::Arg::new("premium").long("premium").action(::clap::ArgAction::SetTrue))
        .arg(
            ::clap::Arg::new("member-of")
                .long("member-of")
                .action(::clap::ArgAction::Append)
                .value_parser(::clap::value_parser!(::std::string::String)),
        )
        .arg(
            ::clap::Arg::new("step-ms")
                .long("step-ms")
                .default_value("250")
                .value_parser(::clap::value_parser!(u64)),
        )
        .arg(::clap::Arg::new("auto-skip-ad").long("auto-skip-ad").action(::clap::ArgAction::SetTrue));

    let matches = command.get_matches();

    let viewer_id = matches.get_one::<::std::string::String>("viewer").ok()?.to_owned();
    let viewer = Viewer { id: viewer_id.clone().into(), is_premium: matches.get_flag("premium") };

    let clock = ::std::sync::Arc::new(ManualClock::starting_at(::std::time::SystemTime::now()));

    let mut catalog = demo_catalog(clock.wall());
    for channel in matches.get_many::<::std::string::String>("member-of").into_iter().flatten() {
        catalog = catalog.with_membership(viewer_id.clone().into(), channel.clone().into());
    }

    if let Some(("fixtures", _)) = matches.subcommand() {
        for video in catalog.videos() {
            println!(
                "{:<16} {:>6.0}s  live={} visibility={:?} premiere={}",
                video.id,
                video.duration_seconds,
                video.is_live,
                video.visibility,
                video.premiere_time.is_some(),
            );
        }
        return Ok(());
    }

    let mut pipeline = SimulatedPipeline::new();
    for video in catalog.videos() {
        for rendition in video.renditions.iter() {
            pipeline = pipeline.with_duration(rendition.url.clone(), video.duration_seconds);
        }
    }

    let view = ::std::sync::Arc::new(ConsoleWatchView::new());
    let catalog = ::std::sync::Arc::new(catalog);
    let pipeline = ::std::sync::Arc::new(pipeline);
    let navigator = ::std::sync::Arc::new(InMemoryNavigator::starting_at("/".into()));
    let sessions = ::std::sync::Arc::new(::tokio::sync::Mutex::new(SessionStore::new()));
    let queue = ::std::sync::Arc::new(::tokio::sync::Mutex::new(PlayQueue::new()));

    let interactor = ::std::sync::Arc::new(WatchSurfaceInteractor::new(
        ::std::sync::Arc::clone(&view) as ::std::sync::Arc<dyn WatchView>,
        ::std::sync::Arc::clone(&catalog) as ::std::sync::Arc<dyn Catalog>,
        ::std::sync::Arc::new(TracingHistoryLedger::new()) as ::std::sync::Arc<dyn HistoryLedger>,
        ::std::sync::Arc::clone(&pipeline) as ::std::sync::Arc<dyn MediaPipeline>,
        ::std::sync::Arc::clone(&navigator) as ::std::sync::Arc<dyn Navigator>,
        ::std::sync::Arc::clone(&clock) as ::std::sync::Arc<dyn Clock>,
        viewer,
        ::std::sync::Arc::clone(&sessions),
        ::std::sync::Arc::clone(&queue),
        ::std::time::Duration::from_millis(50),
    ));

    let first = match matches.subcommand() {
        Some(("watch", matches)) => matches.get_one::<::std::string::String>("id").ok()?.to_owned(),

        Some(("queue", matches)) => {
            let mut ids = matches.get_many::<::std::string::String>("ids").ok()?;
            let first = ids.next().ok()?.to_owned();

            for id in ids {
                let video = catalog.video(&id.clone().into()).await?;
                ::std::sync::Arc::clone(&interactor)
                    .accept(SurfaceCommand::Enqueue { video })
                    .await?;
            }

            first
        }

        _ => unreachable!(),
    };

    let route: ::domain::Route = format!("/watch/{first}").into();
    navigator.navigate(route.clone()).await?;

    let request = WatchRequestModel { video_id: first.clone().into(), route };
    ::std::sync::Arc::clone(&interactor).accept(request).await?;

    let step = ::std::time::Duration::from_millis(*matches.get_one::<u64>("step-ms").ok()?);
    run_session(interactor, view, clock, pipeline, step, matches.get_flag("auto-skip-ad")).await
}

/// Drives the simulated clock and media element until the session reaches a
/// terminal state, standing in for the browser's event loop.
async fn run_session(
    interactor: ::std::sync::Arc<WatchSurfaceInteractor>,
    view: ::std::sync::Arc<ConsoleWatchView>,
    clock: ::std::sync::Arc<ManualClock>,
    pipeline: ::std::sync::Arc<SimulatedPipeline>,
    step: ::std::time::Duration,
    auto_skip_ad: bool,
) -> Fallible<()> {
    let mut ad_elapsed_ms: u64 = 0;
    let mut skipped = false;

    for _ in 0..4_000u32 {
        ::tokio::time::sleep(::std::time::Duration::from_millis(20)).await;

        clock.advance(step);
        pipeline.advance(step.as_secs_f64());

        if view.ad_showing() {
            ad_elapsed_ms += step.as_millis() as u64;

            if auto_skip_ad && !skipped && view.ad_skippable() {
                skipped = true;
                ::std::sync::Arc::clone(&interactor).accept(SurfaceCommand::SkipAd).await?;
            } else if ad_elapsed_ms >= view.ad_duration_ms() {
                ::std::sync::Arc::clone(&interactor).accept(SurfaceCommand::AdFinished).await?;
            }
        } else {
            ad_elapsed_ms = 0;
            skipped = false;
        }

        if view.is_terminal() {
            break;
        }
    }

    Ok(())
}

fn demo_catalog(now: Timestamp) -> FixtureCatalog {
    FixtureCatalog::new()
        .with_channel(channel("workshop", "The Workshop"))
        .with_channel(channel("garage", "Garage Sessions"))
        .with_video(vod("rust-in-90s", "workshop", 120.0))
        .with_video(vod("second-feature", "garage", 60.0))
        .with_video({
            let mut video = vod("backstage", "workshop", 45.0);
            video.visibility = Visibility::MembersOnly;
            video
        })
        .with_video({
            let mut video = vod("launch-party", "workshop", 90.0);
            video.premiere_time = Some(now + ::std::time::Duration::from_secs(15));
            video
        })
        .with_video({
            let mut video = vod("live-rig", "garage", 3_600.0);
            video.is_live = true;
            video
        })
        .with_ad(AdCreative {
            id: "house-ad".into(),
            url: "ads/house.mp4".into(),
            duration_seconds: 15.0,
        })
        .with_up_next("rust-in-90s".into(), vec!["second-feature".into(), "live-rig".into()])
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

fn channel(id: &'static str, title: &'static str) -> Channel {
    Channel {
        id: id.into(),
        metadata: ChannelMetadata { title: title.into(), handle: format!("@{id}").into() },
    }
}
