//! Reelplan Render Engine
//!
//! Turns a composition snapshot into a frame-indexed rendering schedule
//! and answers "what is on screen at frame N" for previews and exports.
//!
//! # Pipeline Architecture
//!
//! ```text
//! CompositionSource ──► assemble_composition ──► Composition
//!                                                    │
//!                          resolver (url, duration)  │
//!                                    │               ▼
//!                                    └────► sequencer (per track)
//!                                                    │
//!                                                    ▼
//!                                    planner (track priority, duration)
//!                                                    │
//!                                                    ▼
//!                                             CompositionPlan
//!                                              │           │
//!                               compositor (frame N)    PlanCache / PlaybackSession
//!
//! Composition ──► export (ExportRequest) ──► RenderDispatcher
//! ```

pub mod cache;
pub mod compositor;
pub mod export;
pub mod planner;
pub mod playback;
pub mod resolver;
pub mod sequencer;
pub mod snapshot;
pub mod timebase;

pub use cache::{fingerprint, fnv1a_64, PlanCache};
pub use compositor::{
    active_layers, compose_frame, compute_compositions, layers_premounted_at, ActiveLayer,
    FrameComposition,
};
pub use export::{
    export_composition, DispatchReceipt, ExportRequest, ExportSummary, JsonFileDispatcher,
    RenderDispatcher,
};
pub use planner::{
    plan_composition, plan_composition_with, CompositionPlan, OverlapPolicy, PlanOptions,
};
pub use playback::{PlaybackPosition, PlaybackSession, PlaybackState};
pub use resolver::{preload_urls, resolve_duration, resolve_url, FALLBACK_DURATION_MS};
pub use sequencer::{LayerPayload, SequencedLayer, VisualKind};
pub use snapshot::{assemble_composition, CompositionSource, InMemorySource};
pub use timebase::{frame_to_ms, ms_to_frame, FPS};
