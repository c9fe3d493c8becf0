//! Error types for dropdown binding and panel mutation.

use thiserror::Error;

/// Errors that can occur while binding or driving a dropdown.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DropdownError {
    /// No element with the given id exists in the document
    #[error("Element not found: #{id}")]
    MissingElement {
        /// The id that was looked up
        id: String,
    },

    /// A DOM mutation or registration call was rejected by the host
    #[error("DOM operation '{operation}' failed: {message}")]
    Dom {
        /// Name of the operation that failed
        operation: String,
        /// Description reported by the host
        message: String,
    },

    /// An operation was attempted on a dropdown that is not mounted
    #[error("Dropdown is not mounted")]
    NotMounted,
}

impl DropdownError {
    /// Create a missing element error.
    pub fn missing_element(id: impl Into<String>) -> Self {
        Self::MissingElement { id: id.into() }
    }

    /// Create a DOM operation error.
    pub fn dom(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Dom {
            operation: operation.into(),
            message: message.into(),
        }
    }
}
