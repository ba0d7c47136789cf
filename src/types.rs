/// A result type that can contain warnings alongside the successful result.
///
/// Grid resolution uses this to hand back a usable time grid together with
/// the corrections it had to make (clamped step sizes, flipped signs,
/// overflowing step counts) instead of failing outright.
///
/// # Type Parameters
///
/// * `T` - The success result type
/// * `W` - The warning type
///
/// # Examples
///
/// ```rust
/// use trajectory::types::WithWarnings;
///
/// let result = WithWarnings::Warning(0.5, vec!["step size sign corrected".to_string()]);
/// assert!(result.is_warning());
/// assert_eq!(result.clone().unwrap(), 0.5);
///
/// let warnings = result.warnings();
/// assert_eq!(warnings.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum WithWarnings<T, W> {
    /// Successful result without warnings
    Ok(T),
    /// Successful result with warnings
    Warning(T, Vec<W>),
}

impl<T, W> WithWarnings<T, W> {
    /// Wraps a value, choosing the variant from whether `warnings` is empty.
    pub fn from_parts(data: T, warnings: Vec<W>) -> Self {
        if warnings.is_empty() {
            WithWarnings::Ok(data)
        } else {
            WithWarnings::Warning(data, warnings)
        }
    }

    /// Checks if the result is successful without warnings.
    pub fn is_ok(&self) -> bool {
        matches!(self, WithWarnings::Ok(_))
    }

    /// Checks if the result has warnings.
    pub fn is_warning(&self) -> bool {
        matches!(self, WithWarnings::Warning(_, _))
    }

    /// Borrows the result value.
    pub fn value(&self) -> &T {
        match self {
            WithWarnings::Ok(data) => data,
            WithWarnings::Warning(data, _) => data,
        }
    }

    /// Extracts the result value, discarding any warnings.
    ///
    /// This consumes the `WithWarnings` and returns the contained value,
    /// regardless of whether there were warnings.
    pub fn unwrap(self) -> T {
        match self {
            WithWarnings::Ok(data) => data,
            WithWarnings::Warning(data, _) => data,
        }
    }

    /// Extracts the warnings, discarding the result value.
    ///
    /// Returns an empty vector if there were no warnings.
    pub fn warnings(self) -> Vec<W> {
        match self {
            WithWarnings::Ok(_) => Vec::new(),
            WithWarnings::Warning(_, warnings) => warnings,
        }
    }

    /// Maps the contained value, keeping the warnings.
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> WithWarnings<U, W> {
        match self {
            WithWarnings::Ok(data) => WithWarnings::Ok(f(data)),
            WithWarnings::Warning(data, warnings) => WithWarnings::Warning(f(data), warnings),
        }
    }
}

impl<T, W> From<WithWarnings<T, W>> for (T, Vec<W>) {
    /// Converts `WithWarnings` into a tuple of (result, warnings).
    ///
    /// This provides a convenient way to destructure the result and
    /// warnings simultaneously.
    fn from(value: WithWarnings<T, W>) -> Self {
        match value {
            WithWarnings::Ok(data) => (data, Vec::new()),
            WithWarnings::Warning(data, warnings) => (data, warnings),
        }
    }
}

/// The outcome of validating a structure.
///
/// Validation accumulates every problem it finds rather than stopping at
/// the first one. Warnings never make a structure invalid on their own.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationResult<T = ()> {
    /// No problems were found.
    Valid(T),
    /// The structure is usable but some values are suspicious.
    Warnings(T, Vec<String>),
    /// The structure is unusable. Holds (warnings, errors).
    Invalid(Vec<String>, Vec<String>),
}

impl<T> ValidationResult<T> {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid(_))
    }

    pub fn has_warnings(&self) -> bool {
        match self {
            ValidationResult::Valid(_) => false,
            ValidationResult::Warnings(_, warnings) => !warnings.is_empty(),
            ValidationResult::Invalid(warnings, _) => !warnings.is_empty(),
        }
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, ValidationResult::Invalid(_, _))
    }

    /// All warnings, whatever the variant.
    pub fn warnings(&self) -> &[String] {
        match self {
            ValidationResult::Valid(_) => &[],
            ValidationResult::Warnings(_, warnings) => warnings,
            ValidationResult::Invalid(warnings, _) => warnings,
        }
    }

    /// All errors; empty unless invalid.
    pub fn errors(&self) -> &[String] {
        match self {
            ValidationResult::Invalid(_, errors) => errors,
            _ => &[],
        }
    }
}

impl ValidationResult<()> {
    /// Builds a result from collected messages.
    pub fn from_messages(warnings: Vec<String>, errors: Vec<String>) -> Self {
        if !errors.is_empty() {
            ValidationResult::Invalid(warnings, errors)
        } else if !warnings.is_empty() {
            ValidationResult::Warnings((), warnings)
        } else {
            ValidationResult::Valid(())
        }
    }
}

/// Structures that can check their own consistency.
pub trait Validate {
    fn validate(&self) -> ValidationResult;
}
