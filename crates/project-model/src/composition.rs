//! Composition snapshots.
//!
//! A [`Composition`] is the read-only aggregate of a project, its tracks,
//! their keyframes, and the media those keyframes reference. It is built
//! fresh for every resolution request and never mutated by the planner.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::keyframe::{KeyFrame, KeyFrameData, TextOverlay};
use crate::media::MediaItem;
use crate::project::Project;
use crate::track::{Track, TrackType};
use crate::validation::{ValidationIssue, ValidationReport};

/// Full snapshot consumed by the planner.
///
/// Maps are ordered so that serialization, fingerprints and plans are
/// deterministic for a given snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Composition {
    pub project: Project,

    #[serde(default)]
    pub tracks: Vec<Track>,

    /// Keyframes grouped by track id.
    #[serde(default)]
    pub frames: BTreeMap<String, Vec<KeyFrame>>,

    /// Media items keyed by media id.
    #[serde(default)]
    pub media_items: BTreeMap<String, MediaItem>,
}

/// Shared empty composition over the placeholder project.
pub fn empty_composition() -> &'static Composition {
    static EMPTY: OnceLock<Composition> = OnceLock::new();
    EMPTY.get_or_init(Composition::empty)
}

impl Composition {
    /// Empty composition over [`Project::placeholder`].
    pub fn empty() -> Self {
        Self::with_project(Project::placeholder())
    }

    /// A composition with no tracks.
    pub fn with_project(project: Project) -> Self {
        Self {
            project,
            tracks: Vec::new(),
            frames: BTreeMap::new(),
            media_items: BTreeMap::new(),
        }
    }

    /// Assemble a snapshot from independently fetched parts.
    ///
    /// Keyframes are grouped by `track_id`; each group keeps the order in
    /// which its keyframes arrived. Every track gets an entry, possibly
    /// empty. Keyframes whose track is not in `tracks` are returned
    /// separately instead of being filed.
    pub fn from_parts(
        project: Project,
        tracks: Vec<Track>,
        keyframes: impl IntoIterator<Item = KeyFrame>,
        media: impl IntoIterator<Item = MediaItem>,
    ) -> (Self, Vec<KeyFrame>) {
        let mut frames: BTreeMap<String, Vec<KeyFrame>> = tracks
            .iter()
            .map(|track| (track.id.clone(), Vec::new()))
            .collect();

        let mut orphans = Vec::new();
        for keyframe in keyframes {
            match frames.get_mut(&keyframe.track_id) {
                Some(group) => group.push(keyframe),
                None => orphans.push(keyframe),
            }
        }

        let media_items = media
            .into_iter()
            .map(|item| (item.id.clone(), item))
            .collect();

        (
            Self {
                project,
                tracks,
                frames,
                media_items,
            },
            orphans,
        )
    }

    pub fn track(&self, id: &str) -> Option<&Track> {
        self.tracks.iter().find(|track| track.id == id)
    }

    /// Keyframes filed under a track (empty when none).
    pub fn frames_for(&self, track_id: &str) -> &[KeyFrame] {
        self.frames.get(track_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn media(&self, id: &str) -> Option<&MediaItem> {
        self.media_items.get(id)
    }

    /// Add a text overlay after the last keyframe on a text track.
    pub fn append_text_overlay(
        &mut self,
        track_id: &str,
        keyframe_id: impl Into<String>,
        overlay: TextOverlay,
    ) -> Result<&KeyFrame, ProjectError> {
        match self.track(track_id) {
            Some(track) if track.track_type == TrackType::Text => {}
            _ => return Err(ProjectError::NoTextTrack(track_id.to_string())),
        }

        let group = self.frames.entry(track_id.to_string()).or_default();
        let keyframe = KeyFrame::appended_text(keyframe_id, track_id, group, overlay);
        group.push(keyframe);
        let index = group.len() - 1;
        Ok(&group[index])
    }

    pub fn keyframe_count(&self) -> usize {
        self.frames.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Check structural consistency.
    ///
    /// Collects every fault: duplicate track ids, keyframe groups under
    /// unknown tracks, keyframes filed under a track they do not declare,
    /// and negative or non-finite timestamps/durations.
    pub fn validate(&self) -> Result<(), ValidationReport> {
        let mut report = ValidationReport::new();

        let mut seen = HashSet::new();
        for track in &self.tracks {
            if !seen.insert(track.id.as_str()) {
                report.push(ValidationIssue::DuplicateTrack {
                    track_id: track.id.clone(),
                });
            }
        }

        for (track_id, frames) in &self.frames {
            if !seen.contains(track_id.as_str()) {
                report.push(ValidationIssue::UnknownTrack {
                    track_id: track_id.clone(),
                });
            }

            for frame in frames {
                if &frame.track_id != track_id {
                    report.push(ValidationIssue::TrackMismatch {
                        keyframe_id: frame.id.clone(),
                        listed_under: track_id.clone(),
                        declared: frame.track_id.clone(),
                    });
                }
                if !frame.timestamp.is_finite() || frame.timestamp < 0.0 {
                    report.push(ValidationIssue::InvalidTimestamp {
                        keyframe_id: frame.id.clone(),
                        value: frame.timestamp,
                    });
                }
                if !frame.duration.is_finite() || frame.duration < 0.0 {
                    report.push(ValidationIssue::InvalidDuration {
                        keyframe_id: frame.id.clone(),
                        value: frame.duration,
                    });
                }
            }
        }

        report.into_result()
    }

    /// Media references that do not resolve to any item in the snapshot.
    ///
    /// Not a planning fault (generation may still be registering the item),
    /// but a snapshot handed to an out-of-process renderer must not carry
    /// them.
    pub fn dangling_media(&self) -> ValidationReport {
        let mut report = ValidationReport::new();
        for frames in self.frames.values() {
            for frame in frames {
                if let KeyFrameData::Media(media) = &frame.data {
                    if !self.media_items.contains_key(&media.media_id) {
                        report.push(ValidationIssue::DanglingMedia {
                            keyframe_id: frame.id.clone(),
                            media_id: media.media_id.clone(),
                        });
                    }
                }
            }
        }
        report
    }

    /// Structural validation plus media reference closure.
    pub fn validate_for_export(&self) -> Result<(), ValidationReport> {
        let mut report = match self.validate() {
            Ok(()) => ValidationReport::new(),
            Err(report) => report,
        };
        report.extend(self.dangling_media());
        report.into_result()
    }

    /// Load a snapshot from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ProjectError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ProjectError::IoError {
            path: path.to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&content).map_err(|e| ProjectError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Write the snapshot as pretty JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ProjectError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| ProjectError::IoError {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }
        let json = serde_json::to_string_pretty(self).map_err(|e| ProjectError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;
        std::fs::write(path, json).map_err(|e| ProjectError::IoError {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

impl Default for Composition {
    fn default() -> Self {
        Self::empty()
    }
}

/// Errors that can occur when loading or checking snapshots.
#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    #[error("I/O error at {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Parse error in {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Invalid composition: {0}")]
    Invalid(#[from] ValidationReport),

    #[error("No text track `{0}` in composition")]
    NoTextTrack(String),
}
