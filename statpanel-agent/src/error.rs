//! Agent error and per-tick report types
//!
//! Startup failures are fatal and returned as [`AgentError`]. Failures
//! during a tick never stop the loop; they are logged and collected in the
//! tick's [`TickReport`].

use std::fmt;

use log::warn;
use statpanel_core::scheduler::PowerCommand;

use crate::config::ConfigLoadError;

/// Startup step that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitStage {
    /// Applying I2C/SPI modes to the adapter
    Bus,
    /// Display reset and init sequence
    Display,
    /// Opening the interface statistics channel
    Stats,
}

impl fmt::Display for InitStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            InitStage::Bus => "bus setup",
            InitStage::Display => "display init",
            InitStage::Stats => "interface statistics",
        })
    }
}

/// Fatal agent errors
#[derive(Debug)]
pub enum AgentError {
    /// A startup step failed; the agent must not run
    Initialization(InitStage, String),
    /// Configuration could not be loaded or is invalid
    Config(ConfigLoadError),
    /// Display power-off or channel release failed on the way out
    Shutdown(String),
}

impl AgentError {
    pub(crate) fn init<E: fmt::Debug>(stage: InitStage, error: E) -> Self {
        AgentError::Initialization(stage, format!("{error:?}"))
    }
}

impl From<ConfigLoadError> for AgentError {
    fn from(e: ConfigLoadError) -> Self {
        AgentError::Config(e)
    }
}

impl fmt::Display for AgentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentError::Initialization(stage, detail) => write!(f, "{stage} failed: {detail}"),
            AgentError::Config(e) => e.fmt(f),
            AgentError::Shutdown(detail) => write!(f, "shutdown: {detail}"),
        }
    }
}

impl std::error::Error for AgentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AgentError::Config(e) => Some(e),
            _ => None,
        }
    }
}

/// Part of a tick that can fail without stopping the loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subsystem {
    /// Interface counters
    Stats,
    /// Temperature/humidity sensor
    Climate,
    /// Frame push or display power command
    Display,
    /// Ambient light sensor
    Light,
}

impl fmt::Display for Subsystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Subsystem::Stats => "stats",
            Subsystem::Climate => "climate",
            Subsystem::Display => "display",
            Subsystem::Light => "lux",
        })
    }
}

/// A failure skipped for one tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransientRead {
    pub subsystem: Subsystem,
    pub detail: String,
}

/// What happened during one tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// Failures logged this tick
    pub transient: Vec<TransientRead>,
    /// A full frame was pushed to the display
    pub rendered: bool,
    /// Lux reading, if the check was active and the read succeeded
    pub lux: Option<f32>,
    /// Display power commands sent successfully
    pub power: Vec<PowerCommand>,
}

impl TickReport {
    /// Log and remember a per-tick failure
    pub(crate) fn record<E: fmt::Debug>(&mut self, subsystem: Subsystem, error: &E) {
        warn!("{subsystem} err: {error:?}");
        self.transient.push(TransientRead {
            subsystem,
            detail: format!("{error:?}"),
        });
    }

    /// Check if nothing failed this tick
    pub fn is_clean(&self) -> bool {
        self.transient.is_empty()
    }

    /// Check if the given subsystem failed this tick
    pub fn failed(&self, subsystem: Subsystem) -> bool {
        self.transient.iter().any(|t| t.subsystem == subsystem)
    }
}
