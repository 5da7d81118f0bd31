//! Readiness CLI - drivers for the assessment wizard
//!
//! - [`config`]: TOML configuration with environment overrides
//! - [`driver`]: feeds actions from an [`AnswerSource`] to the controller
//! - [`prompt`]: interactive terminal source
//! - [`script`]: YAML scripted source

pub mod config;
pub mod driver;
pub mod prompt;
pub mod script;

pub use config::{AppConfig, ConfigError, SinkConfig};
pub use driver::{Action, AnswerSource, Driver, DriverError, Event, RunSummary};
pub use prompt::PromptSource;
pub use script::{Script, ScriptSource, Step};

use readiness_core::{PersistenceSink, WizardController};
use readiness_report::PdfReportRenderer;

/// Driver wired to the PDF renderer and the configured sink
pub type ConfiguredDriver = Driver<PdfReportRenderer, Box<dyn PersistenceSink>>;

/// Build the production driver from `config`
#[must_use]
pub fn build_driver(config: &AppConfig) -> ConfiguredDriver {
    let sink = readiness_sink::open(config.sink.format, &config.sink.path);
    Driver::new(
        WizardController::new(PdfReportRenderer::new(), sink),
        &config.output_dir,
    )
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
