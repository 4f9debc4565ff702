use std::error::Error;
use std::fmt::{Display, Formatter};

/// Common error type for anatomical data structures.
///
/// Raised by the constructors of the data model when an identifier, laminar
/// code or measured value violates the model invariants.
///
/// # Examples
/// ```
/// use corticonv_structures::{AreaId, StructuresError};
///
/// assert!(matches!(AreaId::new(""), Err(StructuresError::InvalidAreaId(_))));
/// assert!(AreaId::new("V1").is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum StructuresError {
    /// Area identifier is empty or contains a reserved character
    InvalidAreaId(String),
    /// Laminar code not in the fixed layer vocabulary
    UnknownLaminarCode(String),
    /// Measured value is negative, NaN or infinite
    InvalidMeasure(String),
    /// Parameters violate a model invariant
    BadParameters(String),
}

impl Display for StructuresError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StructuresError::InvalidAreaId(msg) => write!(f, "Invalid area identifier: {}", msg),
            StructuresError::UnknownLaminarCode(msg) => {
                write!(f, "Unknown laminar code: {}", msg)
            }
            StructuresError::InvalidMeasure(msg) => write!(f, "Invalid measure: {}", msg),
            StructuresError::BadParameters(msg) => write!(f, "Bad Parameters: {}", msg),
        }
    }
}
impl Error for StructuresError {}
