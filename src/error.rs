// SPDX-License-Identifier: MPL-2.0
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    Io(String),
    Config(String),
    Contract(ContractViolation),
}

/// Required descriptor fields that were missing or inconsistent at construction.
///
/// These are rejected when a [`Crouton`](crate::crouton::Crouton) is built,
/// never later at display time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractViolation {
    /// No host window was supplied.
    MissingWindow,

    /// Neither text nor custom content was supplied.
    MissingContent,

    /// Both text and custom content were supplied.
    ConflictingContent,
}

impl fmt::Display for ContractViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContractViolation::MissingWindow => write!(f, "a host window is required"),
            ContractViolation::MissingContent => {
                write!(f, "either text or custom content is required")
            }
            ContractViolation::ConflictingContent => {
                write!(f, "text and custom content are mutually exclusive")
            }
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O Error: {}", e),
            Error::Config(e) => write!(f, "Config Error: {}", e),
            Error::Contract(e) => write!(f, "Contract Violation: {}", e),
        }
    }
}

impl std::error::Error for Error {}

impl From<ContractViolation> for Error {
    fn from(violation: ContractViolation) -> Self {
        Error::Contract(violation)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Io(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
