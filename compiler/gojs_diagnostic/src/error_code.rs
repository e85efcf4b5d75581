//! Error codes for all compiler diagnostics.
//!
//! Each error code is a unique identifier (e.g., `E1001`) with the first digit
//! indicating the phase that reports it.

use std::fmt;

/// Error codes for all compiler diagnostics.
///
/// Format: E#### where first digit indicates phase:
/// - E1xxx: Syntax errors reported by the front end
/// - E2xxx: Type errors reported by the checker
/// - E3xxx: Import resolution errors
/// - E4xxx: Declaration lowering errors
/// - E5xxx: Driver I/O errors
/// - E9xxx: Internal compiler errors
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    /// Malformed input
    E1001,
    /// Type error reported by the checker
    E2001,
    /// Import path cannot be located
    E3001,
    /// Import graph contains a cycle
    E3002,
    /// Global initializer dependency cycle
    E4001,
    /// Method promoted by two embedded fields at the same depth
    E4002,
    /// Input or output file could not be read or written
    E5001,
    /// Checked package file is malformed
    E5002,
    /// Unsupported type or declaration kind
    E9001,
}

impl ErrorCode {
    pub const ALL: &'static [ErrorCode] = &[
        ErrorCode::E1001,
        ErrorCode::E2001,
        ErrorCode::E3001,
        ErrorCode::E3002,
        ErrorCode::E4001,
        ErrorCode::E4002,
        ErrorCode::E5001,
        ErrorCode::E5002,
        ErrorCode::E9001,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E1001 => "E1001",
            ErrorCode::E2001 => "E2001",
            ErrorCode::E3001 => "E3001",
            ErrorCode::E3002 => "E3002",
            ErrorCode::E4001 => "E4001",
            ErrorCode::E4002 => "E4002",
            ErrorCode::E5001 => "E5001",
            ErrorCode::E5002 => "E5002",
            ErrorCode::E9001 => "E9001",
        }
    }

    /// Check if this is an internal compiler error (E9xxx).
    pub fn is_internal(&self) -> bool {
        matches!(self, ErrorCode::E9001)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parse an error code string like `"E4001"`. Case-insensitive.
impl std::str::FromStr for ErrorCode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ErrorCode::ALL
            .iter()
            .copied()
            .find(|code| code.as_str().eq_ignore_ascii_case(s))
            .ok_or(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_through_str() {
        for code in ErrorCode::ALL {
            assert_eq!(code.as_str().parse::<ErrorCode>(), Ok(*code));
        }
        assert_eq!("e4002".parse::<ErrorCode>(), Ok(ErrorCode::E4002));
        assert_eq!("E0000".parse::<ErrorCode>(), Err(()));
    }

    #[test]
    fn test_internal() {
        assert!(ErrorCode::E9001.is_internal());
        assert!(!ErrorCode::E4001.is_internal());
    }
}
