//! Error types of the FSR embedding library
//!
//! Configuration errors are raised while loading a producer configuration,
//! before any event is processed. Input-mismatch errors abort the processing
//! of the current event. Photons or leptons failing a selection are not
//! errors at all: they are simply left out, and only show up in the counters.

use thiserror::Error;

/// Errors that can occur while configuring or running an FSR producer.
#[derive(Debug, Error)]
pub enum FsrError {
    /// A required option is absent from the configuration.
    #[error("missing configuration of {0}")]
    MissingOption(&'static str),

    /// An option's value could not be parsed.
    #[error("could not parse configuration of {name} from {value:?}: {reason}")]
    InvalidOption {
        /// Option name.
        name: String,
        /// Raw value, as written in the configuration.
        value: String,
        /// Parser diagnostic.
        reason: String,
    },

    /// An option that no producer recognizes.
    #[error("unknown configuration option {0}")]
    UnknownOption(String),

    /// An option given more than once.
    #[error("configuration option {0} is set more than once")]
    DuplicateOption(String),

    /// Individually valid options which do not make sense together.
    #[error("inconsistent configuration: {0}")]
    Inconsistent(String),

    /// A named attribute is absent from an object.
    #[error("{object} #{index} has no attribute {name:?}")]
    MissingAttribute {
        /// Kind of object (electron, muon, photon).
        object: &'static str,
        /// Index of the object in its collection.
        index: usize,
        /// Attribute name.
        name: String,
    },

    /// A tagged collection is absent from the event.
    #[error("event has no {kind} collection tagged {tag:?}")]
    MissingCollection {
        /// Kind of collection.
        kind: &'static str,
        /// Collection tag.
        tag: String,
    },

    /// An impact parameter was requested but the vertex collection is empty.
    #[error("vertex collection {0:?} is empty, no primary vertex to cut against")]
    NoPrimaryVertex(String),

    /// Processing of an event failed.
    #[error("failed to process event #{index} with producer {producer}")]
    InEvent {
        /// Index of the event in the input
        index: usize,
        /// Name of the failing producer
        producer: String,
        /// What went wrong
        #[source]
        source: Box<FsrError>,
    },

    /// A producer's output could not be converted to JSON.
    #[error("could not serialize producer output")]
    Serialization(#[from] serde_json::Error),
}

impl FsrError {
    /// Creates an inconsistent configuration error.
    #[must_use]
    pub fn inconsistent(reason: impl Into<String>) -> Self {
        Self::Inconsistent(reason.into())
    }

    /// Creates a missing collection error.
    #[must_use]
    pub fn missing_collection(kind: &'static str, tag: impl Into<String>) -> Self {
        Self::MissingCollection {
            kind,
            tag: tag.into(),
        }
    }

    /// Whether this error stems from the configuration rather than the event
    /// being processed.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::MissingOption(_)
                | Self::InvalidOption { .. }
                | Self::UnknownOption(_)
                | Self::DuplicateOption(_)
                | Self::Inconsistent(_)
        )
    }
}

/// Result type of the FSR embedding library
pub type Result<T> = std::result::Result<T, FsrError>;
