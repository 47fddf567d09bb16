use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// A punch-clock operation the backend can execute.
/// Codes mirror the raw punch types: 0 clock-in/return, 1 lunch, 2 exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Operation {
    ClockIn,
    Lunch,
    ClockOut,
}

impl Operation {
    /// Convert enum → bridge code
    pub fn code(&self) -> u8 {
        match self {
            Operation::ClockIn => 0,
            Operation::Lunch => 1,
            Operation::ClockOut => 2,
        }
    }

    /// Convert bridge code → enum
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Operation::ClockIn),
            1 => Some(Operation::Lunch),
            2 => Some(Operation::ClockOut),
            _ => None,
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            Operation::ClockIn => "entrada",
            Operation::Lunch => "almoco",
            Operation::ClockOut => "saida",
        }
    }
}

impl From<Operation> for u8 {
    fn from(op: Operation) -> u8 {
        op.code()
    }
}

impl TryFrom<u8> for Operation {
    type Error = AppError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Operation::from_code(code).ok_or(AppError::InvalidOperation(code))
    }
}
