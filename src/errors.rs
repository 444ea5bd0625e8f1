use failure;
use std::result;

/// Convenience Result type.
pub type Result<T> = result::Result<T, failure::Error>;

/// Errors
#[derive(Debug, failure::Fail, Clone, PartialEq, Eq)]
pub enum NosqlError {
    /// An attempt was made to open a store in a non-directory file path
    #[fail(display = "Not a directory")]
    NotADirectory,

    /// An increment was attempted on a value which is not an integer
    #[fail(display = "Value is not an integer or out of range")]
    NotAnInteger,

    /// A list operation was used on a plain value, or the other way around
    #[fail(display = "Operation against a key holding the wrong kind of value")]
    WrongType,

    /// A thread panicked while holding the store lock
    #[fail(display = "Store lock poisoned")]
    LockPoisoned,

    /// A document supplied a field which the store assigns itself
    #[fail(display = "Field is assigned by the store: {}", field)]
    ReservedField {
        /// Name of the field
        field: String,
    },

    /// An engine name which does not match any known engine
    #[fail(display = "Unknown engine: {}", name)]
    UnknownEngine {
        /// The name which was given
        name: String,
    },
}
