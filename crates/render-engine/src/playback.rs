//! Playback session state.
//!
//! One [`PlaybackSession`] per open preview. It owns the playhead and the
//! memoized plan, and publishes position changes to listeners through a
//! `watch` channel. Regular advances are coalesced to the configured
//! notification rate; pause and seek always publish.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use reelplan_common::{PlaybackDefaults, RateController, ReelplanResult, SessionClock};
use reelplan_project_model::Composition;

use crate::cache::PlanCache;
use crate::compositor::{active_layers, layers_premounted_at, ActiveLayer};
use crate::planner::{CompositionPlan, PlanOptions};
use crate::sequencer::SequencedLayer;
use crate::timebase::{frame_to_ms, ms_to_frame};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackState {
    Paused,
    Playing,
}

/// Snapshot published to listeners.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackPosition {
    pub frame: u64,
    pub timestamp_secs: f64,
    pub state: PlaybackState,
}

pub struct PlaybackSession {
    cache: PlanCache,
    plan: Arc<CompositionPlan>,
    frame: u64,
    state: PlaybackState,
    clock: SessionClock,
    rate: RateController,
    premount_frames: u64,
    notify: watch::Sender<PlaybackPosition>,
}

impl PlaybackSession {
    /// Open a paused session at frame 0.
    pub fn new(
        composition: &Composition,
        defaults: &PlaybackDefaults,
        options: PlanOptions,
    ) -> ReelplanResult<Self> {
        let mut cache = PlanCache::new(options);
        let plan = cache.get_or_plan(composition)?;
        let premount_frames = ms_to_frame(defaults.premount_ms as f64, plan.fps);

        let (notify, _) = watch::channel(PlaybackPosition {
            frame: 0,
            timestamp_secs: 0.0,
            state: PlaybackState::Paused,
        });

        let clock = SessionClock::start();
        tracing::debug!(
            project = %plan.project_id,
            started_at = clock.epoch_wall(),
            notify_hz = defaults.notify_hz,
            premount_frames,
            "Opened playback session"
        );

        Ok(Self {
            cache,
            plan,
            frame: 0,
            state: PlaybackState::Paused,
            clock,
            rate: RateController::new(defaults.notify_hz),
            premount_frames,
            notify,
        })
    }

    pub fn subscribe(&self) -> watch::Receiver<PlaybackPosition> {
        self.notify.subscribe()
    }

    pub fn plan(&self) -> &CompositionPlan {
        &self.plan
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    pub fn position(&self) -> PlaybackPosition {
        PlaybackPosition {
            frame: self.frame,
            timestamp_secs: frame_to_ms(self.frame, self.plan.fps) / 1000.0,
            state: self.state,
        }
    }

    /// Swap in a new snapshot. Replans only when its content changed;
    /// the playhead is clamped into the new duration. Returns whether the
    /// plan changed.
    pub fn load(&mut self, composition: &Composition) -> ReelplanResult<bool> {
        let plan = self.cache.get_or_plan(composition)?;
        if Arc::ptr_eq(&plan, &self.plan) {
            return Ok(false);
        }

        self.plan = plan;
        let last = self.last_frame();
        if self.frame > last {
            self.frame = last;
            self.publish_now();
        }
        Ok(true)
    }

    /// Start playing. A playhead parked on the last frame rewinds first.
    pub fn play(&mut self) {
        if self.frame >= self.last_frame() {
            self.frame = 0;
        }
        self.state = PlaybackState::Playing;
        self.publish_now();
    }

    pub fn pause(&mut self) {
        self.state = PlaybackState::Paused;
        self.publish_now();
    }

    /// Move the playhead, clamped to the composition.
    pub fn seek(&mut self, frame: u64) {
        self.frame = frame.min(self.last_frame());
        self.publish_now();
    }

    pub fn seek_ms(&mut self, ms: f64) {
        self.seek(ms_to_frame(ms, self.plan.fps));
    }

    /// Advance one frame on the session clock. See [`Self::advance_at`].
    pub fn advance(&mut self) -> bool {
        let now = self.clock.elapsed_ns();
        self.advance_at(now)
    }

    /// Advance one frame if playing. Reaching the last frame pauses the
    /// session. Returns whether the playhead moved.
    pub fn advance_at(&mut self, now_ns: u64) -> bool {
        if !self.is_playing() {
            return false;
        }

        if self.frame + 1 >= self.plan.duration_in_frames {
            self.state = PlaybackState::Paused;
            self.publish_forced(now_ns);
            return false;
        }

        self.frame += 1;
        self.publish_throttled(now_ns);
        true
    }

    /// Playhead reported by an external player, e.g. after decoding a
    /// frame. Published at the coalesced rate.
    pub fn update_at(&mut self, frame: u64, now_ns: u64) {
        self.frame = frame.min(self.last_frame());
        self.publish_throttled(now_ns);
    }

    /// Layers live at the playhead, back to front.
    pub fn active_layers(&self) -> Vec<ActiveLayer<'_>> {
        active_layers(&self.plan, self.frame).collect()
    }

    /// Layers starting within the premount window ahead of the playhead.
    pub fn premounted_layers(&self) -> Vec<&SequencedLayer> {
        layers_premounted_at(&self.plan, self.frame, self.premount_frames).collect()
    }

    fn last_frame(&self) -> u64 {
        self.plan.duration_in_frames.saturating_sub(1)
    }

    fn publish_now(&mut self) {
        let now = self.clock.elapsed_ns();
        self.publish_forced(now);
    }

    fn publish_forced(&mut self, now_ns: u64) {
        self.rate.mark(now_ns);
        self.notify.send_replace(self.position());
    }

    fn publish_throttled(&mut self, now_ns: u64) {
        if self.rate.should_tick(now_ns) {
            self.notify.send_replace(self.position());
        }
    }
}
