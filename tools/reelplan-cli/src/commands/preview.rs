//! Real-time preview: drive a playback session at the composition frame
//! rate and print the positions it publishes.

use std::path::PathBuf;
use std::time::Duration;

use reelplan_common::config::AppConfig;
use reelplan_render_engine::{PlanOptions, PlaybackSession};

pub async fn run(
    path: PathBuf,
    config: &AppConfig,
    from_ms: f64,
    duration_ms: Option<u64>,
) -> anyhow::Result<()> {
    let composition = super::load_composition(&path)?;
    let mut session = PlaybackSession::new(
        &composition,
        &config.playback,
        PlanOptions::from_config(&config.planning),
    )?;
    let mut positions = session.subscribe();

    let fps = session.plan().fps;
    let total_frames = session.plan().duration_in_frames;
    let stop_after = duration_ms.map(|ms| ms * u64::from(fps) / 1000);

    let printer = tokio::spawn(async move {
        while positions.changed().await.is_ok() {
            let position = *positions.borrow_and_update();
            println!(
                "{:>8.3}s  frame {:>6}  {:?}",
                position.timestamp_secs, position.frame, position.state
            );
        }
    });

    session.seek_ms(from_ms);
    session.play();
    tracing::info!(frames = total_frames, fps, "Preview started");

    let mut ticker = tokio::time::interval(Duration::from_nanos(1_000_000_000 / u64::from(fps)));
    let mut advanced = 0u64;
    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Preview interrupted");
                break;
            }
        }

        if !session.advance() {
            break;
        }
        advanced += 1;
        if stop_after.is_some_and(|limit| advanced >= limit) {
            break;
        }
    }

    if session.is_playing() {
        session.pause();
    }
    // closing the channel ends the printer
    drop(session);
    printer.await?;

    Ok(())
}
