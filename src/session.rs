//! The conversion session: staged files, processing guard, result lifecycle.
//!
//! One session drives one tool. Files enter through the intake filter, each
//! image input acquires a preview reference, `convert()` dispatches the whole
//! staged set to the codec matching the tool, and the resulting artifact is
//! registered for download. Every temporary reference the session creates is
//! released exactly once — on explicit removal, on reset, or on teardown,
//! whichever comes first.
//!
//! ## State machine
//!
//! ```text
//! Empty ──intake──▶ Staged ──convert──▶ Converting ──ok──▶ Completed
//!   ▲                 │  ▲                   │                  │
//!   │   remove last   │  └──────── err ──────┘                  │
//!   └─────────────────┴───────────── reset ─────────────────────┘
//! ```
//!
//! `reset()` is safe from every state. A reset requested while a conversion
//! is in flight is deferred and applied when the operation resolves, so
//! in-flight work is never cancelled and cleanup still runs exactly once.

use crate::artifact::SourceFile;
use crate::codec;
use crate::config::{EngineConfig, ToolKind};
use crate::error::ConvertError;
use crate::intake;
use crate::store::{ObjectRef, ObjectStore, StoredObject};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Opaque identifier for a staged file, stable for the item's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileId(u64);

/// Per-item lifecycle status.
///
/// The batch flow transitions the session as a whole, so staged items stay
/// `Pending` today; `Processing` and `Error` are part of the model for
/// per-item flows and host UIs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Pending,
    Processing,
    Completed,
    Error,
}

/// A user-selected input awaiting conversion.
#[derive(Debug)]
pub struct StagedFile {
    id: FileId,
    source: SourceFile,
    preview: Option<ObjectRef>,
    status: FileStatus,
}

impl StagedFile {
    pub fn id(&self) -> FileId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.source.name
    }

    pub fn source(&self) -> &SourceFile {
        &self.source
    }

    /// Preview reference, present only for image-type inputs.
    pub fn preview(&self) -> Option<ObjectRef> {
        self.preview
    }

    pub fn status(&self) -> FileStatus {
        self.status
    }
}

/// Coarse session state derived from the aggregate's fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Empty,
    Staged,
    Converting,
    Completed,
}

/// A successful conversion's artifact as held by the session: a live object
/// reference plus download metadata.
#[derive(Debug, Clone)]
pub struct StoredArtifact {
    reference: ObjectRef,
    file_name: String,
    mime: &'static str,
}

impl StoredArtifact {
    pub fn reference(&self) -> ObjectRef {
        self.reference
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn mime(&self) -> &'static str {
        self.mime
    }
}

/// The stateful aggregate driving one conversion tool.
#[derive(Debug)]
pub struct ConversionSession {
    tool: ToolKind,
    config: EngineConfig,
    files: Vec<StagedFile>,
    result: Option<StoredArtifact>,
    store: ObjectStore,
    is_processing: bool,
    reset_pending: bool,
    next_file_id: u64,
}

impl ConversionSession {
    /// Create a session for `tool` with the default engine configuration.
    pub fn new(tool: ToolKind) -> Self {
        Self::with_config(tool, EngineConfig::default())
    }

    pub fn with_config(tool: ToolKind, config: EngineConfig) -> Self {
        Self {
            tool,
            config,
            files: Vec::new(),
            result: None,
            store: ObjectStore::new(),
            is_processing: false,
            reset_pending: false,
            next_file_id: 0,
        }
    }

    pub fn tool(&self) -> ToolKind {
        self.tool
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn state(&self) -> SessionState {
        if self.is_processing {
            SessionState::Converting
        } else if self.result.is_some() {
            SessionState::Completed
        } else if self.files.is_empty() {
            SessionState::Empty
        } else {
            SessionState::Staged
        }
    }

    /// Currently staged files, in intake order.
    pub fn files(&self) -> &[StagedFile] {
        &self.files
    }

    /// The last successful conversion's artifact, if any.
    pub fn result(&self) -> Option<&StoredArtifact> {
        self.result.as_ref()
    }

    /// Resolve a live object reference (preview or result) for display or
    /// download. `None` once revoked.
    pub fn resolve(&self, reference: ObjectRef) -> Option<&StoredObject> {
        self.store.resolve(reference)
    }

    /// Number of live temporary references the session currently owns.
    pub fn live_reference_count(&self) -> usize {
        self.store.live_count()
    }

    /// Stage a raw selection after filtering it through the tool's
    /// allow-list and cap. Returns the number of files actually staged.
    ///
    /// The combined staged total is clamped to the tool's cap: when the user
    /// adds more files than remaining room, the excess newest are dropped.
    pub fn intake(&mut self, candidates: Vec<SourceFile>) -> usize {
        let accepted = intake::accept(
            candidates,
            self.tool.allowed_extensions(),
            self.tool.max_files(),
        );
        let room = self.tool.max_files().saturating_sub(self.files.len());
        let admitted = accepted.len().min(room);

        for source in accepted.into_iter().take(room) {
            let preview = if self.tool.stages_image_inputs() {
                Some(
                    self.store
                        .register(Arc::clone(&source.bytes), preview_mime(&source.name)),
                )
            } else {
                None
            };
            let id = FileId(self.next_file_id);
            self.next_file_id += 1;
            self.files.push(StagedFile {
                id,
                source,
                preview,
                status: FileStatus::Pending,
            });
        }

        info!(
            tool = self.tool.slug(),
            staged = admitted,
            total = self.files.len(),
            "files staged"
        );
        admitted
    }

    /// Remove one staged file, releasing its preview reference immediately.
    /// A second call with the same id is a no-op.
    pub fn remove_file(&mut self, id: FileId) -> bool {
        let Some(pos) = self.files.iter().position(|f| f.id == id) else {
            return false;
        };
        let removed = self.files.remove(pos);
        if let Some(preview) = removed.preview {
            self.store.revoke(preview);
        }
        debug!(name = %removed.source.name, "staged file removed");
        true
    }

    /// Clear every staged file (releasing previews) without touching an
    /// existing result.
    pub fn clear_files(&mut self) {
        for file in self.files.drain(..) {
            if let Some(preview) = file.preview {
                self.store.revoke(preview);
            }
        }
    }

    /// Run the conversion for the staged files.
    ///
    /// Guarded: returns `Ok(false)` without doing anything when no files are
    /// staged or a conversion is already in flight. On success the artifact
    /// replaces any previous result (whose reference is released) and
    /// `Ok(true)` is returned. On failure the staged files are untouched and
    /// the error is returned for the host to surface — the session is back
    /// in `Staged`.
    pub async fn convert(&mut self) -> Result<bool, ConvertError> {
        if self.files.is_empty() || self.is_processing {
            return Ok(false);
        }

        self.is_processing = true;
        info!(tool = self.tool.slug(), files = self.files.len(), "conversion started");

        let inputs: Vec<SourceFile> = self.files.iter().map(|f| f.source.clone()).collect();
        let outcome = codec::run(self.tool, &inputs, &self.config).await;
        self.is_processing = false;

        let outcome = match outcome {
            Ok(artifact) => {
                if let Some(previous) = self.result.take() {
                    self.store.revoke(previous.reference);
                }
                let reference = self
                    .store
                    .register(Arc::new(artifact.bytes), artifact.mime);
                info!(name = %artifact.file_name, "conversion completed");
                self.result = Some(StoredArtifact {
                    reference,
                    file_name: artifact.file_name,
                    mime: artifact.mime,
                });
                Ok(true)
            }
            Err(e) => {
                warn!(tool = self.tool.slug(), error = %e, "conversion failed");
                Err(e)
            }
        };

        if self.reset_pending {
            debug!("applying deferred reset");
            self.apply_reset();
        }

        outcome
    }

    /// Return the session to `Empty`, releasing every outstanding temporary
    /// reference. Safe to call from any state; calling it on an already
    /// empty session is a no-op. While a conversion is in flight the reset
    /// is deferred and applied when the operation resolves.
    pub fn reset(&mut self) {
        if self.is_processing {
            self.reset_pending = true;
            debug!("reset deferred until in-flight conversion resolves");
            return;
        }
        self.apply_reset();
    }

    fn apply_reset(&mut self) {
        self.reset_pending = false;
        if let Some(result) = self.result.take() {
            self.store.revoke(result.reference);
        }
        self.clear_files();
    }
}

impl Drop for ConversionSession {
    fn drop(&mut self) {
        // Teardown is a terminal transition: same cleanup as reset.
        self.is_processing = false;
        self.apply_reset();
    }
}

/// MIME type for an image preview, from the file extension.
fn preview_mime(name: &str) -> &'static str {
    let lower = name.to_lowercase();
    if lower.ends_with(".png") {
        "image/png"
    } else if lower.ends_with(".webp") {
        "image/webp"
    } else if lower.ends_with(".jpg") || lower.ends_with(".jpeg") {
        "image/jpeg"
    } else {
        "application/octet-stream"
    }
}
