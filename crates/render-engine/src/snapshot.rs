//! Composition snapshot assembly.
//!
//! A persistence layer answers four queries. Tracks, media and the project
//! row are fetched together, then every track's keyframes are fetched
//! concurrently and grouped by the track id each keyframe declares. The
//! order in which those fetches complete does not matter: the sequencer
//! sorts by timestamp and `from_parts` keeps each track's arrival order.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use futures::future::try_join_all;

use reelplan_common::{ReelplanError, ReelplanResult};
use reelplan_project_model::{Composition, KeyFrame, MediaItem, Project, Track};

/// Read-side of the project store.
#[async_trait]
pub trait CompositionSource: Send + Sync {
    /// Project row, or `None` if it does not exist.
    async fn project(&self, project_id: &str) -> ReelplanResult<Option<Project>>;

    async fn tracks_by_project(&self, project_id: &str) -> ReelplanResult<Vec<Track>>;

    async fn keyframes_by_track(&self, track_id: &str) -> ReelplanResult<Vec<KeyFrame>>;

    async fn media_by_project(&self, project_id: &str) -> ReelplanResult<Vec<MediaItem>>;
}

/// Fetch and assemble a full snapshot for `project_id`.
///
/// Keyframes that declare a track outside the fetched set are dropped
/// with a warning. Any query failure fails the whole assembly.
#[tracing::instrument(skip(source))]
pub async fn assemble_composition(
    source: &dyn CompositionSource,
    project_id: &str,
) -> ReelplanResult<Composition> {
    let (project, tracks, media) = futures::try_join!(
        source.project(project_id),
        source.tracks_by_project(project_id),
        source.media_by_project(project_id)
    )?;

    let project = project
        .ok_or_else(|| ReelplanError::snapshot(format!("project `{project_id}` not found")))?;

    let keyframes: Vec<KeyFrame> = try_join_all(
        tracks
            .iter()
            .map(|track| source.keyframes_by_track(&track.id)),
    )
    .await?
    .into_iter()
    .flatten()
    .collect();

    let (composition, orphans) = Composition::from_parts(project, tracks, keyframes, media);
    if !orphans.is_empty() {
        tracing::warn!(
            orphans = orphans.len(),
            "Dropped keyframes that reference tracks outside the project"
        );
    }

    tracing::info!(
        tracks = composition.tracks.len(),
        keyframes = composition.keyframe_count(),
        media = composition.media_items.len(),
        "Assembled composition snapshot"
    );

    Ok(composition)
}

/// In-memory store, used by tests and for replaying saved snapshots.
#[derive(Debug, Default, Clone)]
pub struct InMemorySource {
    projects: BTreeMap<String, Project>,
    tracks: Vec<Track>,
    keyframes: Vec<KeyFrame>,
    media: Vec<MediaItem>,
    latency: BTreeMap<String, Duration>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store holding exactly the contents of one snapshot.
    pub fn from_composition(composition: &Composition) -> Self {
        let mut source = Self::new();
        source.insert_project(composition.project.clone());
        for track in &composition.tracks {
            source.insert_track(track.clone());
        }
        for keyframe in composition.frames.values().flatten() {
            source.insert_keyframe(keyframe.clone());
        }
        for item in composition.media_items.values() {
            let mut item = item.clone();
            if item.project_id.is_empty() {
                item.project_id = composition.project.id.clone();
            }
            source.insert_media(item);
        }
        source
    }

    pub fn insert_project(&mut self, project: Project) {
        self.projects.insert(project.id.clone(), project);
    }

    pub fn insert_track(&mut self, track: Track) {
        self.tracks.push(track);
    }

    pub fn insert_keyframe(&mut self, keyframe: KeyFrame) {
        self.keyframes.push(keyframe);
    }

    pub fn insert_media(&mut self, item: MediaItem) {
        self.media.push(item);
    }

    /// Delay answers for one track's keyframe query.
    pub fn set_track_latency(&mut self, track_id: impl Into<String>, latency: Duration) {
        self.latency.insert(track_id.into(), latency);
    }
}

#[async_trait]
impl CompositionSource for InMemorySource {
    async fn project(&self, project_id: &str) -> ReelplanResult<Option<Project>> {
        Ok(self.projects.get(project_id).cloned())
    }

    async fn tracks_by_project(&self, project_id: &str) -> ReelplanResult<Vec<Track>> {
        Ok(self
            .tracks
            .iter()
            .filter(|track| track.project_id == project_id)
            .cloned()
            .collect())
    }

    async fn keyframes_by_track(&self, track_id: &str) -> ReelplanResult<Vec<KeyFrame>> {
        if let Some(latency) = self.latency.get(track_id) {
            tokio::time::sleep(*latency).await;
        }
        Ok(self
            .keyframes
            .iter()
            .filter(|keyframe| keyframe.track_id == track_id)
            .cloned()
            .collect())
    }

    async fn media_by_project(&self, project_id: &str) -> ReelplanResult<Vec<MediaItem>> {
        Ok(self
            .media
            .iter()
            .filter(|item| item.project_id == project_id)
            .cloned()
            .collect())
    }
}
