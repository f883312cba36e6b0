// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Registration errors.

use alloc::string::String;
use core::fmt;

/// Error returned when a zone registration cannot be completed.
///
/// Registration resolves every element of a batch before touching the
/// registry, so a failed call leaves the coordinator unchanged.
#[derive(Clone, PartialEq, Eq)]
pub enum RegisterError {
    /// The document could not resolve an element id for a node.
    UnresolvedElement {
        /// Debug rendering of the offending node.
        node: String,
    },
}

impl fmt::Debug for RegisterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnresolvedElement { node } => {
                write!(f, "RegisterError::UnresolvedElement {{ node: {node} }}")
            }
        }
    }
}

impl fmt::Display for RegisterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnresolvedElement { node } => {
                write!(f, "node {node} has no element id and cannot become a zone")
            }
        }
    }
}

impl core::error::Error for RegisterError {}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;

    #[test]
    fn display_names_the_node() {
        let err = RegisterError::UnresolvedElement {
            node: format!("{:?}", 7_u32),
        };
        assert_eq!(
            format!("{err}"),
            "node 7 has no element id and cannot become a zone"
        );
    }
}
