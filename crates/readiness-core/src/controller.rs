//! Wizard controller
//!
//! Orchestrates one session:
//! - advance: stage check, validation gate, resolver, merge, move
//! - terminal arrival: render the report, append the record once
//! - back: pop the history stack
//! - reset: start over on stage 1

use crate::catalog;
use crate::collaborator::{PersistenceSink, ReportRenderer};
use crate::error::{PersistenceError, RenderError, WizardError};
use crate::gate;
use crate::resolver;
use crate::session::{Session, Submission};
use crate::stage::{Classification, Stage};

/// What an accepted advance did
#[derive(Debug)]
pub enum AdvanceOutcome {
    /// Moved to another question stage
    Moved {
        /// Stage that was completed
        from: Stage,
        /// Stage now shown
        to: Stage,
        /// Classification after the move
        classification: Classification,
    },
    /// Reached the terminal stage
    Completed(Completion),
}

impl AdvanceOutcome {
    /// Stage the session is on after the advance
    #[inline]
    #[must_use]
    pub fn stage(&self) -> Stage {
        match self {
            Self::Moved { to, .. } => *to,
            Self::Completed(_) => Stage::Complete,
        }
    }
}

/// Terminal arrival summary
///
/// Collaborator failures never undo the arrival; they are reported here.
#[derive(Debug)]
pub struct Completion {
    /// Branch the respondent finished
    pub classification: Classification,
    /// Whether a report is waiting in the session
    pub artifact_ready: bool,
    /// Set when the report could not be produced
    pub render_error: Option<RenderError>,
    /// Set when the record could not be persisted (warning only)
    pub persistence_error: Option<PersistenceError>,
}

impl Completion {
    /// Whether both collaborators succeeded
    #[inline]
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.render_error.is_none() && self.persistence_error.is_none()
    }
}

/// Drives sessions through the question stages
#[derive(Debug)]
pub struct WizardController<R, S> {
    renderer: R,
    sink: S,
}

impl<R: ReportRenderer, S: PersistenceSink> WizardController<R, S> {
    /// Create a controller over the given collaborators
    #[inline]
    #[must_use]
    pub fn new(renderer: R, sink: S) -> Self {
        Self { renderer, sink }
    }

    /// Report renderer
    #[inline]
    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Persistence sink
    #[inline]
    #[must_use]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Submit the current stage's answers.
    ///
    /// On success the answers are merged and the session moves on; reaching
    /// the terminal stage renders the report and persists the record.
    ///
    /// # Errors
    /// - [`WizardError::SessionFinalized`] on the terminal stage
    /// - [`WizardError::StaleSubmission`] when `submission` names another stage
    /// - [`WizardError::Validation`] when the gate fails; the session is untouched
    /// - [`WizardError::Transition`] when the session state has no transition
    pub fn advance(
        &self,
        session: &mut Session,
        submission: &Submission,
    ) -> Result<AdvanceOutcome, WizardError> {
        let current = session.stage();
        let set = session.question_set().ok_or(WizardError::SessionFinalized)?;

        if submission.stage != current {
            tracing::warn!(
                "Rejecting submission for stage {} while on stage {}",
                submission.stage,
                current
            );
            return Err(WizardError::StaleSubmission {
                current,
                submitted: submission.stage,
            });
        }

        gate::check(set, &submission.answers)?;

        let transition = resolver::resolve(current, session.classification(), &submission.answers)?;
        session.record_mut().merge(&transition.merge);
        session.advance_to(transition.next, transition.classification);
        prune_abandoned(session);

        tracing::info!(
            "Stage {} -> {} (classification: {})",
            current,
            transition.next,
            transition.classification
        );

        if transition.next.is_terminal() {
            Ok(AdvanceOutcome::Completed(self.finalize(session)))
        } else {
            Ok(AdvanceOutcome::Moved {
                from: current,
                to: transition.next,
                classification: transition.classification,
            })
        }
    }

    /// Return to the previously visited stage.
    ///
    /// A no-op on stage 1. Returns the stage now current.
    ///
    /// # Errors
    /// [`WizardError::SessionFinalized`] on the terminal stage.
    pub fn back(&self, session: &mut Session) -> Result<Stage, WizardError> {
        if session.stage().is_terminal() {
            return Err(WizardError::SessionFinalized);
        }

        let from = session.stage();
        match session.step_back() {
            Some(to) => tracing::info!("Back {} -> {}", from, to),
            None => tracing::debug!("Back requested on first stage, staying on {}", from),
        }
        Ok(session.stage())
    }

    /// Clear everything and return to stage 1
    pub fn reset(&self, session: &mut Session) {
        tracing::info!(
            "Resetting session on stage {} ({} answers dropped)",
            session.stage(),
            session.record().len()
        );
        session.reset();
    }

    /// Render the report again for a finished session, without persisting.
    ///
    /// # Errors
    /// - [`WizardError::NotFinished`] before the terminal stage
    /// - [`WizardError::Render`] when the renderer fails
    pub fn regenerate_report(&self, session: &mut Session) -> Result<(), WizardError> {
        if !session.stage().is_terminal() {
            return Err(WizardError::NotFinished(session.stage()));
        }
        let artifact = self
            .renderer
            .render(session.record(), session.classification())?;
        tracing::debug!("Regenerated report {}", artifact.filename);
        session.store_artifact(artifact);
        Ok(())
    }

    fn finalize(&self, session: &mut Session) -> Completion {
        let classification = session.classification();

        let render_error = match self.renderer.render(session.record(), classification) {
            Ok(artifact) => {
                tracing::info!("Report rendered: {} ({} bytes)", artifact.filename, artifact.len());
                session.store_artifact(artifact);
                None
            }
            Err(e) => {
                tracing::error!("Report rendering failed: {}", e);
                Some(e)
            }
        };

        let persistence_error = if session.is_submitted() {
            tracing::debug!("Record already submitted for this terminal arrival");
            None
        } else {
            session.mark_submitted();
            match self.sink.append(session.record()) {
                Ok(()) => {
                    tracing::info!("Record persisted ({} fields)", session.record().len());
                    None
                }
                Err(e) => {
                    tracing::warn!("Failed to persist record: {}", e);
                    Some(e)
                }
            }
        };

        Completion {
            classification,
            artifact_ready: session.has_artifact(),
            render_error,
            persistence_error,
        }
    }
}

/// Drop answers recorded on stages that are no longer on the traversed path
fn prune_abandoned(session: &mut Session) {
    let path: Vec<Stage> = session.path().collect();
    let before = session.record().len();
    session
        .record_mut()
        .retain(|key| catalog::stage_of(key).map_or(true, |stage| path.contains(&stage)));
    let dropped = before - session.record().len();
    if dropped > 0 {
        tracing::debug!("Dropped {} answers from abandoned stages", dropped);
    }
}
