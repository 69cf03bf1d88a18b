use crate::ui::theme;
use ratatui::style::Color;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warn,
    Info,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warn => "warning",
            Severity::Info => "info",
        }
    }

    pub fn color(&self) -> Color {
        match self {
            Severity::Error => theme::ERROR_FG,
            Severity::Warn => theme::WARN_FG,
            Severity::Info => theme::ACCENT,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Severity::Error)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub level: Severity,
}

impl Notice {
    pub fn new(level: Severity, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Severity::Info, message)
    }

    pub fn warn(message: impl Into<String>) -> Self {
        Self::new(Severity::Warn, message)
    }

    pub fn emit(&self) {
        match self.level {
            Severity::Error => tracing::error!("{}", self.message),
            Severity::Warn => tracing::warn!("{}", self.message),
            Severity::Info => tracing::info!("{}", self.message),
        }
        eprintln!("{self}");
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.level.label(), self.message)
    }
}

impl From<&crate::error::GhcloneError> for Notice {
    fn from(err: &crate::error::GhcloneError) -> Self {
        Notice::new(err.severity(), err.to_string())
    }
}
