use thiserror::Error;

/// Result type alias using the canonical error facility
pub type Result<T> = std::result::Result<T, ExError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that can be used for programmatic
/// error handling, testing, and CLI exit reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExErrorKind {
    // Caller input
    InvalidInput,

    // Snapshot validation against the network
    UnknownHaplotype,
    InvalidWeightRange,
    UnknownAttribute,
    UnknownAttributeValue,

    // Version store
    NoChange,
    DuplicateTag,
    NotFound,
    /// A stored payload blob failed to decode (integrity fault, never retried)
    CorruptPayload,

    // Integration/IO
    Io,
    Serialization,
    /// Storage engine failure, propagated unchanged
    Persistence,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::UnknownHaplotype => "ERR_UNKNOWN_HAPLOTYPE",
            ExErrorKind::InvalidWeightRange => "ERR_INVALID_WEIGHT_RANGE",
            ExErrorKind::UnknownAttribute => "ERR_UNKNOWN_ATTRIBUTE",
            ExErrorKind::UnknownAttributeValue => "ERR_UNKNOWN_ATTRIBUTE_VALUE",
            ExErrorKind::NoChange => "ERR_NO_CHANGE",
            ExErrorKind::DuplicateTag => "ERR_DUPLICATE_TAG",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::CorruptPayload => "ERR_CORRUPT_PAYLOAD",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }

    /// Whether this kind is one of the snapshot validation failures
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ExErrorKind::UnknownHaplotype
                | ExErrorKind::InvalidWeightRange
                | ExErrorKind::UnknownAttribute
                | ExErrorKind::UnknownAttributeValue
        )
    }
}

/// Canonical structured error type
///
/// Carries a classification kind for programmatic handling and optional
/// context (operation, entity, message) for debugging.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_id: Option<String>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity ID context (version tag/id, haplotype id, attribute name)
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the entity ID context, if any
    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }

    /// Whether this error is one of the snapshot validation failures
    pub fn is_validation(&self) -> bool {
        self.kind.is_validation()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(entity_id) = &self.entity_id {
            write!(f, " (entity_id: {})", entity_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Snapshot validation failures
///
/// Raised when a candidate payload does not agree with the network it
/// describes. These are caller-input problems: nothing is retried.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Topology references a haplotype that is not in the network
    #[error("Unknown haplotype: {hap_id}")]
    UnknownHaplotype { hap_id: String },

    /// Topology position has a NaN or infinite coordinate
    #[error("Haplotype {hap_id} has a non-finite position")]
    NonFinitePosition { hap_id: String },

    /// Weight range is inverted or lies outside the network's edge weights
    #[error("Invalid weight range: ({min}, {max})")]
    InvalidWeightRange { min: f64, max: f64 },

    /// Environment names a fact attribute the network does not know
    #[error("Invalid fact attribute: '{name}'")]
    UnknownAttribute { name: String },

    /// Environment value is outside the attribute's value domain
    #[error("Invalid value '{value}' for fact attribute '{name}'")]
    UnknownAttributeValue { name: String, value: String },
}

/// Version store failures
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VersionError {
    /// Tag is empty or whitespace-only
    #[error("Version tag cannot be empty")]
    EmptyTag,

    /// Candidate payload equals the latest stored payload
    #[error("Nothing changed from the last version '{latest_tag}'")]
    NoChange { latest_tag: String },

    /// Another version already carries this tag
    #[error("Version tag already exists: {tag}")]
    DuplicateTag { tag: String },

    /// Lookup matched no row
    #[error("Version not found: {matcher}")]
    NotFound { matcher: String },

    /// Stored payload blob failed to decode
    #[error("Corrupt payload in version {version}: {reason}")]
    CorruptPayload { version: String, reason: String },

    /// Serialization error (payload encoding)
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl From<ValidationError> for ExError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::UnknownHaplotype { hap_id } => {
                ExError::new(ExErrorKind::UnknownHaplotype)
                    .with_op("validate_snapshot")
                    .with_message(format!("Unknown haplotype '{}'", hap_id))
                    .with_entity_id(hap_id)
            }

            ValidationError::NonFinitePosition { hap_id } => {
                ExError::new(ExErrorKind::InvalidInput)
                    .with_op("validate_snapshot")
                    .with_message("Position coordinates must be finite")
                    .with_entity_id(hap_id)
            }

            ValidationError::InvalidWeightRange { min, max } => {
                ExError::new(ExErrorKind::InvalidWeightRange)
                    .with_op("validate_snapshot")
                    .with_message(format!("Invalid range: ({}, {})", min, max))
            }

            ValidationError::UnknownAttribute { name } => {
                ExError::new(ExErrorKind::UnknownAttribute)
                    .with_op("validate_snapshot")
                    .with_message(format!("Invalid fact attribute: '{}'", name))
                    .with_entity_id(name)
            }

            ValidationError::UnknownAttributeValue { name, value } => {
                ExError::new(ExErrorKind::UnknownAttributeValue)
                    .with_op("validate_snapshot")
                    .with_message(format!(
                        "Invalid value '{}' for fact attribute '{}'",
                        value, name
                    ))
                    .with_entity_id(name)
            }
        }
    }
}

impl From<VersionError> for ExError {
    fn from(err: VersionError) -> Self {
        match err {
            VersionError::EmptyTag => ExError::new(ExErrorKind::InvalidInput)
                .with_op("create_version")
                .with_message("Version tag cannot be empty"),

            VersionError::NoChange { latest_tag } => ExError::new(ExErrorKind::NoChange)
                .with_op("create_version")
                .with_message(format!(
                    "Nothing changed from the last version '{}'",
                    latest_tag
                ))
                .with_entity_id(latest_tag),

            VersionError::DuplicateTag { tag } => ExError::new(ExErrorKind::DuplicateTag)
                .with_op("create_version")
                .with_message("Version tag already exists")
                .with_entity_id(tag),

            VersionError::NotFound { matcher } => ExError::new(ExErrorKind::NotFound)
                .with_op("get_version")
                .with_message("Version not found")
                .with_entity_id(matcher),

            VersionError::CorruptPayload { version, reason } => {
                ExError::new(ExErrorKind::CorruptPayload)
                    .with_op("decode_payload")
                    .with_message(reason)
                    .with_entity_id(version)
            }

            VersionError::Serialization { message } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }
        }
    }
}
