//! Readiness Core - branching questionnaire wizard
//!
//! The state machine behind the Business Personality & Readiness Assessment:
//! - Answer record accumulating one respondent's answers
//! - Fixed question catalog with explicit sentinels
//! - Validation gate run before any merge
//! - Pure stage resolver with a history stack for back navigation
//! - Controller that renders and persists once on terminal arrival
//!
//! # Example
//!
//! ```rust,ignore
//! use readiness_core::{Session, StageAnswers, Submission, Stage, WizardController};
//!
//! let controller = WizardController::new(renderer, sink);
//! let mut session = Session::new();
//!
//! let answers = StageAnswers::new()
//!     .with("Registration Code", "REG-001")
//!     .with("Age Group", "Below 18")
//!     .with("Gender", "Female")
//!     .with("KK Number", "2");
//! controller.advance(&mut session, &Submission::new(Stage::Basics, answers))?;
//! assert_eq!(session.stage(), Stage::FutureAssessment);
//! ```

#![warn(unreachable_pub)]

// Core modules
pub mod catalog;
pub mod collaborator;
pub mod controller;
pub mod error;
pub mod gate;
pub mod record;
pub mod registry;
pub mod resolver;
pub mod session;
pub mod stage;

// Re-exports for convenience
pub use catalog::{question_set, Input, Question, QuestionSet, CATALOG_VERSION};
pub use collaborator::{DocumentArtifact, PersistenceSink, ReportRenderer};
pub use controller::{AdvanceOutcome, Completion, WizardController};
pub use error::{PersistenceError, RenderError, ResolveError, ValidationError, WizardError};
pub use record::{AnswerRecord, StageAnswers};
pub use registry::SessionRegistry;
pub use resolver::{resolve, Transition};
pub use session::{Session, SessionId, Submission};
pub use stage::{Classification, Stage, UnknownStage};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for driving the wizard
    pub use crate::{
        AdvanceOutcome, AnswerRecord, Classification, DocumentArtifact, PersistenceSink,
        ReportRenderer, Session, Stage, StageAnswers, Submission, WizardController, WizardError,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
