//! Parser limits and request-target policy.

use serde::Deserialize;

use crate::parser::error::ConfigError;
use crate::parser::method::Method;
use crate::parser::request_line::TargetForm;

/// Resource limits enforced while scanning a request head.
///
/// There is deliberately no `Default`: every limit must be chosen by the
/// embedding server. Line lengths include the CRLF terminator.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParserLimits {
    /// Maximum request-line length in bytes.
    pub max_request_line_len: usize,
    /// Maximum length of a single header line in bytes.
    pub max_header_line_len: usize,
    /// Maximum size of the whole header block, including the blank line.
    pub max_header_bytes: usize,
    /// Maximum number of header fields.
    pub max_header_count: usize,
}

impl ParserLimits {
    pub fn new(
        max_request_line_len: usize,
        max_header_line_len: usize,
        max_header_bytes: usize,
        max_header_count: usize,
    ) -> Result<Self, ConfigError> {
        let limits = Self {
            max_request_line_len,
            max_header_line_len,
            max_header_bytes,
            max_header_count,
        };
        limits.validate()?;
        Ok(limits)
    }

    /// Loads limits from a JSON document. All four fields are required.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let limits: ParserLimits = serde_json::from_str(json)?;
        limits.validate()?;
        Ok(limits)
    }

    /// Rejects zero byte limits and a per-line header limit larger than the
    /// whole header block. A header count of zero is allowed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("max_request_line_len", self.max_request_line_len),
            ("max_header_line_len", self.max_header_line_len),
            ("max_header_bytes", self.max_header_bytes),
        ] {
            if value == 0 {
                return Err(ConfigError::ZeroLimit(name));
            }
        }
        if self.max_header_line_len > self.max_header_bytes {
            return Err(ConfigError::InconsistentHeaderLimits {
                line: self.max_header_line_len,
                total: self.max_header_bytes,
            });
        }
        Ok(())
    }
}

/// A set of methods, stored as a bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "Vec<Method>")]
pub struct MethodSet(u16);

impl MethodSet {
    pub const fn empty() -> Self {
        MethodSet(0)
    }

    pub const fn all() -> Self {
        MethodSet((1 << Method::COUNT) - 1)
    }

    pub fn only(method: Method) -> Self {
        Self::empty().with(method)
    }

    #[must_use]
    pub fn with(self, method: Method) -> Self {
        MethodSet(self.0 | 1 << method.index())
    }

    pub fn contains(&self, method: Method) -> bool {
        self.0 & (1 << method.index()) != 0
    }
}

impl From<Vec<Method>> for MethodSet {
    fn from(methods: Vec<Method>) -> Self {
        methods.into_iter().fold(MethodSet::empty(), MethodSet::with)
    }
}

/// Which methods may use each non-origin target form.
///
/// Origin-form (`/path`) is accepted for every method except CONNECT when
/// `connect_requires_authority` is set.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TargetPolicy {
    /// Methods allowed to use `*`.
    pub asterisk_form: MethodSet,
    /// Methods allowed to use `host:port`.
    pub authority_form: MethodSet,
    /// Methods allowed to use `scheme://authority/path`.
    pub absolute_form: MethodSet,
    /// CONNECT must name an authority.
    pub connect_requires_authority: bool,
}

impl Default for TargetPolicy {
    fn default() -> Self {
        Self {
            asterisk_form: MethodSet::only(Method::OPTIONS),
            authority_form: MethodSet::only(Method::CONNECT),
            absolute_form: MethodSet::all(),
            connect_requires_authority: true,
        }
    }
}

impl TargetPolicy {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Whether `method` may be combined with a target of `form`.
    pub fn permits(&self, method: Method, form: TargetForm) -> bool {
        if method == Method::CONNECT
            && self.connect_requires_authority
            && form != TargetForm::Authority
        {
            return false;
        }
        match form {
            TargetForm::Origin => true,
            TargetForm::Asterisk => self.asterisk_form.contains(method),
            TargetForm::Authority => self.authority_form.contains(method),
            TargetForm::Absolute => self.absolute_form.contains(method),
        }
    }
}
