//! Export hand-off.
//!
//! Rendering the final video happens out of process. This module checks
//! that a snapshot is self-consistent, packages it as an
//! [`ExportRequest`] and passes it to a [`RenderDispatcher`].

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use reelplan_common::{ExportDefaults, ReelplanError, ReelplanResult};
use reelplan_project_model::{Composition, TrackType};

/// Payload accepted by a render job. Carries the raw composition, not the
/// plan; the renderer plans for itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRequest {
    pub project_id: String,
    pub composition_data: Composition,
}

impl ExportRequest {
    /// Package a snapshot for export.
    ///
    /// Fails unless every keyframe sits under a declared track and every
    /// media reference resolves to an item in the snapshot.
    pub fn new(composition: Composition) -> ReelplanResult<Self> {
        if composition.project.is_placeholder() {
            return Err(ReelplanError::export("no project loaded"));
        }
        composition
            .validate_for_export()
            .map_err(|report| ReelplanError::validation(report.messages()))?;

        Ok(Self {
            project_id: composition.project.id.clone(),
            composition_data: composition,
        })
    }

    pub fn summary(&self) -> ExportSummary {
        let composition = &self.composition_data;
        ExportSummary {
            tracks: composition.tracks.len(),
            keyframes: composition.keyframe_count(),
            media_items: composition.media_items.len(),
            text_tracks: composition
                .tracks
                .iter()
                .filter(|track| track.track_type == TrackType::Text)
                .count(),
        }
    }
}

/// Counts reported when a request is dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportSummary {
    pub tracks: usize,
    pub keyframes: usize,
    pub media_items: usize,
    pub text_tracks: usize,
}

/// What a dispatcher did with a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchReceipt {
    pub dispatcher: String,
    pub project_id: String,
    /// Where the job went: a file path, job id or URL.
    pub location: String,
    pub summary: ExportSummary,
}

/// Render job hand-off target.
pub trait RenderDispatcher: Send {
    /// Hand the request to the renderer.
    fn dispatch(&mut self, request: &ExportRequest) -> ReelplanResult<DispatchReceipt>;

    /// Check if this dispatcher can accept jobs right now.
    fn is_available(&self) -> bool;

    /// Dispatcher name.
    fn name(&self) -> &str;
}

/// Writes the composition to `composition-<projectId>.json` for a render
/// workflow to pick up.
#[derive(Debug, Clone)]
pub struct JsonFileDispatcher {
    output_dir: PathBuf,
    pretty: bool,
}

impl JsonFileDispatcher {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            pretty: true,
        }
    }

    pub fn from_defaults(defaults: &ExportDefaults) -> Self {
        Self {
            output_dir: defaults.output_dir.clone(),
            pretty: defaults.pretty_json,
        }
    }

    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Payload path for a project.
    pub fn payload_path(&self, project_id: &str) -> PathBuf {
        let safe: String = project_id
            .chars()
            .map(|c| if matches!(c, '/' | '\\' | ':') { '_' } else { c })
            .collect();
        self.output_dir.join(format!("composition-{safe}.json"))
    }
}

impl RenderDispatcher for JsonFileDispatcher {
    fn dispatch(&mut self, request: &ExportRequest) -> ReelplanResult<DispatchReceipt> {
        std::fs::create_dir_all(&self.output_dir)?;

        let path = self.payload_path(&request.project_id);
        let json = if self.pretty {
            serde_json::to_string_pretty(&request.composition_data)?
        } else {
            serde_json::to_string(&request.composition_data)?
        };
        std::fs::write(&path, json)?;

        tracing::info!(path = %path.display(), "Wrote composition payload");

        Ok(DispatchReceipt {
            dispatcher: self.name().to_string(),
            project_id: request.project_id.clone(),
            location: path.display().to_string(),
            summary: request.summary(),
        })
    }

    fn is_available(&self) -> bool {
        !self.output_dir.exists() || self.output_dir.is_dir()
    }

    fn name(&self) -> &str {
        "json-file"
    }
}

/// Validate a snapshot and hand it to `dispatcher`.
///
/// This is the main entry point for exporting.
pub fn export_composition(
    composition: Composition,
    dispatcher: &mut dyn RenderDispatcher,
) -> ReelplanResult<DispatchReceipt> {
    if !dispatcher.is_available() {
        return Err(ReelplanError::export(format!(
            "dispatcher `{}` is not available",
            dispatcher.name()
        )));
    }

    let request = ExportRequest::new(composition)?;
    let summary = request.summary();
    tracing::info!(
        project = %request.project_id,
        dispatcher = dispatcher.name(),
        tracks = summary.tracks,
        keyframes = summary.keyframes,
        media = summary.media_items,
        text_tracks = summary.text_tracks,
        "Dispatching export"
    );

    dispatcher.dispatch(&request)
}
