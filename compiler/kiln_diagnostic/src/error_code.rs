//! Error codes for evaluator diagnostics.
//!
//! All codes live in the `E6xxx` (runtime) range.

use std::fmt;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    /// Wrong number of arguments for a top-level call
    E6001,
    /// Argument name does not match any parameter
    E6002,
    /// Parameter has no matching argument
    E6003,
    /// Argument type incompatible with its parameter
    E6004,
    /// Unhandled exception terminated the program
    E6005,
    /// Unhandled exception during module or class initialization
    E6006,
    /// Assignment to a read-only location
    E6007,
    /// Module has no entry point
    E6010,
    /// Package has no default module
    E6011,
}

impl ErrorCode {
    /// All codes, in numeric order.
    pub const ALL: &'static [ErrorCode] = &[
        ErrorCode::E6001,
        ErrorCode::E6002,
        ErrorCode::E6003,
        ErrorCode::E6004,
        ErrorCode::E6005,
        ErrorCode::E6006,
        ErrorCode::E6007,
        ErrorCode::E6010,
        ErrorCode::E6011,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E6001 => "E6001",
            ErrorCode::E6002 => "E6002",
            ErrorCode::E6003 => "E6003",
            ErrorCode::E6004 => "E6004",
            ErrorCode::E6005 => "E6005",
            ErrorCode::E6006 => "E6006",
            ErrorCode::E6007 => "E6007",
            ErrorCode::E6010 => "E6010",
            ErrorCode::E6011 => "E6011",
        }
    }

    /// One-line summary shown next to the code.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E6001 => "incorrect argument count",
            ErrorCode::E6002 => "unrecognized argument",
            ErrorCode::E6003 => "missing argument",
            ErrorCode::E6004 => "incorrect argument type",
            ErrorCode::E6005 => "unhandled exception",
            ErrorCode::E6006 => "unhandled exception during initialization",
            ErrorCode::E6007 => "illegal read-only l-value",
            ErrorCode::E6010 => "missing entry point",
            ErrorCode::E6011 => "missing default module",
        }
    }

    /// Whether this code reports a bad call from the host rather than a
    /// failure inside the evaluated program.
    pub fn is_argument_error(&self) -> bool {
        matches!(
            self,
            ErrorCode::E6001 | ErrorCode::E6002 | ErrorCode::E6003 | ErrorCode::E6004
        )
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests;
