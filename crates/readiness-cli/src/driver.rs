//! Session driver
//!
//! Pulls [`Action`]s from an [`AnswerSource`] and feeds them to the
//! [`WizardController`] until the source quits. Reports produced on terminal
//! arrival are written to the output directory; a report that cannot be
//! written stays in the session and is reported as a warning.

use readiness_core::{
    AdvanceOutcome, Classification, Completion, PersistenceSink, ReportRenderer, Session, Stage,
    Submission, WizardController, WizardError,
};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Driver errors
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    /// Reading input or writing output failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The wizard rejected an operation that cannot be retried
    #[error("wizard error: {0}")]
    Wizard(#[from] WizardError),

    /// Script file is malformed
    #[error("invalid script: {0}")]
    ScriptFormat(#[from] serde_yaml::Error),

    /// A scripted step was rejected while running in strict mode
    #[error("script step {step} rejected: {message}")]
    StepRejected {
        /// 1-based step number
        step: usize,
        /// Rejection reason
        message: String,
    },
}

/// Next thing the respondent wants to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Submit answers for a stage
    Submit(Submission),
    /// Go back one stage
    Back,
    /// Start over
    Reset,
    /// Stop driving the session
    Quit,
}

/// What happened in response to an action
#[derive(Debug)]
pub enum Event<'a> {
    /// Now showing `stage`
    Showing(Stage),
    /// The action was refused; the session is unchanged
    Rejected(&'a WizardError),
    /// Terminal stage reached
    Completed {
        /// Collaborator results
        completion: &'a Completion,
        /// Where the report was written, if one was produced
        report: Option<&'a Path>,
    },
    /// Session cleared back to stage 1
    Restarted,
}

/// Supplies actions and receives feedback
pub trait AnswerSource {
    /// Decide the next action for `session`
    ///
    /// # Errors
    /// Returns [`DriverError`] when input cannot be obtained.
    fn next_action(&mut self, session: &Session) -> Result<Action, DriverError>;

    /// Observe the outcome of the last action
    ///
    /// # Errors
    /// Sources may abort the run by returning an error.
    fn notify(&mut self, _event: &Event<'_>) -> Result<(), DriverError> {
        Ok(())
    }
}

/// Outcome of one driven run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Stage the session ended on
    pub final_stage: Stage,
    /// Classification the session ended with
    pub classification: Classification,
    /// Terminal arrivals during the run
    pub completed: usize,
    /// Actions refused by the wizard
    pub rejected: usize,
    /// Report files written
    pub reports: Vec<PathBuf>,
    /// Non-fatal collaborator failures
    pub warnings: Vec<String>,
}

/// Drives sessions against a controller
#[derive(Debug)]
pub struct Driver<R, S> {
    controller: WizardController<R, S>,
    output_dir: PathBuf,
}

impl<R: ReportRenderer, S: PersistenceSink> Driver<R, S> {
    /// Create a driver writing reports under `output_dir`
    #[must_use]
    pub fn new(controller: WizardController<R, S>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            controller,
            output_dir: output_dir.into(),
        }
    }

    /// Underlying controller
    #[inline]
    #[must_use]
    pub fn controller(&self) -> &WizardController<R, S> {
        &self.controller
    }

    /// Run `session` until `source` quits
    ///
    /// # Errors
    /// Returns [`DriverError`] on I/O failure, a source abort, or a
    /// non-recoverable wizard error.
    pub fn run(
        &self,
        session: &mut Session,
        source: &mut impl AnswerSource,
    ) -> Result<RunSummary, DriverError> {
        let mut summary = RunSummary::default();

        loop {
            match source.next_action(session)? {
                Action::Quit => break,
                Action::Reset => {
                    self.controller.reset(session);
                    source.notify(&Event::Restarted)?;
                }
                Action::Back => match self.controller.back(session) {
                    Ok(stage) => source.notify(&Event::Showing(stage))?,
                    Err(e) => {
                        summary.rejected += 1;
                        source.notify(&Event::Rejected(&e))?;
                    }
                },
                Action::Submit(submission) => {
                    match self.controller.advance(session, &submission) {
                        Ok(AdvanceOutcome::Moved { to, .. }) => {
                            source.notify(&Event::Showing(to))?;
                        }
                        Ok(AdvanceOutcome::Completed(completion)) => {
                            summary.completed += 1;
                            collect_warnings(&completion, &mut summary.warnings);
                            let report = match self.save_report(session) {
                                Ok(report) => report,
                                Err(e) => {
                                    tracing::error!("Report not written: {}", e);
                                    summary.warnings.push(format!("report not written: {e}"));
                                    None
                                }
                            };
                            source.notify(&Event::Completed {
                                completion: &completion,
                                report: report.as_deref(),
                            })?;
                            summary.reports.extend(report);
                        }
                        Err(e) if e.is_recoverable() || matches!(e, WizardError::SessionFinalized) => {
                            tracing::debug!("Action rejected: {}", e);
                            summary.rejected += 1;
                            source.notify(&Event::Rejected(&e))?;
                        }
                        Err(e) => return Err(e.into()),
                    }
                }
            }
        }

        summary.final_stage = session.stage();
        summary.classification = session.classification();
        Ok(summary)
    }

    /// The artifact leaves the session only once it is on disk.
    fn save_report(&self, session: &mut Session) -> std::io::Result<Option<PathBuf>> {
        let Some(artifact) = session.artifact() else {
            return Ok(None);
        };
        std::fs::create_dir_all(&self.output_dir)?;
        let path = self.output_dir.join(&artifact.filename);
        std::fs::write(&path, &artifact.bytes)?;
        session.take_artifact();
        tracing::info!("Report written to {}", path.display());
        Ok(Some(path))
    }
}

fn collect_warnings(completion: &Completion, warnings: &mut Vec<String>) {
    if let Some(e) = &completion.render_error {
        warnings.push(format!("report not generated: {e}"));
    }
    if let Some(e) = &completion.persistence_error {
        warnings.push(format!("record not saved: {e}"));
    }
}
