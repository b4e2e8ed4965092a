//! Single-session workflow state.
//!
//! At most one source image and one generated image are live at a time.
//! A generated image always belongs to the source that was active when
//! generation began; selecting a new source or resetting clears it
//! atomically. Staleness is tracked with a ticket so a result that arrives
//! after a reset is discarded instead of repopulating the session.

use crate::error::{Result, XmasifyError};
use crate::image::{GeneratedImage, SourceImage};

/// The workflow phase driving what the UI shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkflowPhase {
    /// Waiting for user input.
    #[default]
    Idle,
    /// Exactly one orchestrator call is in flight.
    Generating,
    /// The last generation produced an image.
    Succeeded,
    /// The last generation failed; an error message is set.
    Failed,
}

/// Proof that a generation was started; required to apply its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationTicket(u64);

/// Holds the in-memory artifacts and the current phase.
#[derive(Debug, Default)]
pub struct Session {
    phase: WorkflowPhase,
    source: Option<SourceImage>,
    generated: Option<GeneratedImage>,
    error: Option<String>,
    // Bumped whenever the session moves on; stale tickets no longer match.
    epoch: u64,
}

impl Session {
    /// Creates an empty session in the idle phase.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current workflow phase.
    pub fn phase(&self) -> WorkflowPhase {
        self.phase
    }

    /// The active source image, if one was selected.
    pub fn source(&self) -> Option<&SourceImage> {
        self.source.as_ref()
    }

    /// The generated image of the last successful run, if any.
    pub fn generated(&self) -> Option<&GeneratedImage> {
        self.generated.as_ref()
    }

    /// The error message of the last failed run, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether the generate trigger should be enabled.
    pub fn can_generate(&self) -> bool {
        self.phase != WorkflowPhase::Generating && self.source.is_some()
    }

    /// Replaces the source image. Forces the idle phase from any state and
    /// clears the previous result and error in the same step.
    pub fn select_source(&mut self, image: SourceImage) {
        self.source = Some(image);
        self.generated = None;
        self.error = None;
        self.phase = WorkflowPhase::Idle;
        self.epoch += 1;
    }

    /// Clears everything and returns to idle. Honored even while a call is
    /// in flight; the abandoned call's result will fail the ticket check.
    pub fn reset(&mut self) {
        self.source = None;
        self.generated = None;
        self.error = None;
        self.phase = WorkflowPhase::Idle;
        self.epoch += 1;
    }

    /// Marks the start of a generation and hands out the ticket its result
    /// must present. Illegal while another call is in flight or without a
    /// source image.
    pub fn begin_generation(&mut self) -> Result<GenerationTicket> {
        if self.phase == WorkflowPhase::Generating {
            return Err(XmasifyError::InvalidRequest(
                "a generation is already in flight".into(),
            ));
        }
        if self.source.is_none() {
            return Err(XmasifyError::InvalidRequest(
                "no source image selected".into(),
            ));
        }

        self.generated = None;
        self.error = None;
        self.phase = WorkflowPhase::Generating;
        self.epoch += 1;
        Ok(GenerationTicket(self.epoch))
    }

    /// Applies a generation outcome. Ignored when the ticket is stale,
    /// i.e. the session was reset or got a new source in the meantime.
    pub fn finish_generation(
        &mut self,
        ticket: GenerationTicket,
        result: Result<GeneratedImage>,
    ) {
        if ticket.0 != self.epoch {
            tracing::debug!("discarding result of an abandoned generation");
            return;
        }

        match result {
            Ok(image) => {
                self.generated = Some(image);
                self.phase = WorkflowPhase::Succeeded;
            }
            Err(e) => {
                self.error = Some(e.to_string());
                self.phase = WorkflowPhase::Failed;
            }
        }
    }
}
