//! Emission Error Taxonomy
//!
//! Every registry or emitter operation is synchronous and either fully
//! applies (instruction word appended, type state updated) or reports one
//! of these variants to the immediate caller. There is no recovery path
//! inside the emitter; the front-end decides whether to abort code
//! generation or substitute a fallback sequence.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for emitter operations
pub type Result<T> = std::result::Result<T, EmitError>;

/// Conditions that abort a single emission operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum EmitError {
    // Capacity
    #[error("too many classes loaded")]
    CapacityExceeded,
    #[error("no more than 4096 nested arrays allowed")]
    ArrayTooDeep,
    #[error("object over maximum size")]
    ObjectTooLarge,
    #[error("exceeded maximum frame size")]
    FrameTooLarge,
    #[error("exceeded maximum parameter count")]
    TooManyParams,
    #[error("branch target out of range")]
    BranchTargetOutOfRange,

    // Protocol / state misuse
    #[error("class fields are already frozen")]
    ClassFrozen,
    #[error("class is not finished")]
    ClassNotFinished,
    #[error("frame is already open")]
    FrameAlreadyOpen,
    #[error("frame is not open")]
    FrameNotOpen,
    #[error("label is already bound")]
    LabelAlreadyBound,
    #[error("label was never bound")]
    UnboundLabel,

    // Type violations
    #[error("illegal register number")]
    IllegalRegister,
    #[error("banned register")]
    BannedRegister,
    #[error("expected integer type")]
    ExpectedInteger,
    #[error("pointer has wrong type")]
    TypeMismatch,
    #[error("value incompatible with field type")]
    FieldTypeMismatch,
    #[error("value incompatible with element type")]
    ArrayElementTypeMismatch,
    #[error("expected array type")]
    ExpectedArray,
    #[error("demotion target is not an ancestor")]
    IllegalDemotion,
    #[error("illegal primitive type")]
    IllegalPrimitive,
    #[error("index out of range")]
    IndexOutOfRange,
    #[error("branch type state does not match target")]
    IncompatibleBranchTypeState,
}

impl EmitError {
    /// Taxonomy group, for batch reporting by a front-end.
    pub fn category(&self) -> &'static str {
        match self {
            EmitError::CapacityExceeded
            | EmitError::ArrayTooDeep
            | EmitError::ObjectTooLarge
            | EmitError::FrameTooLarge
            | EmitError::TooManyParams
            | EmitError::BranchTargetOutOfRange => "capacity error",
            EmitError::ClassFrozen
            | EmitError::ClassNotFinished
            | EmitError::FrameAlreadyOpen
            | EmitError::FrameNotOpen
            | EmitError::LabelAlreadyBound
            | EmitError::UnboundLabel => "state error",
            EmitError::IllegalRegister
            | EmitError::BannedRegister
            | EmitError::ExpectedInteger
            | EmitError::TypeMismatch
            | EmitError::FieldTypeMismatch
            | EmitError::ArrayElementTypeMismatch
            | EmitError::ExpectedArray
            | EmitError::IllegalDemotion
            | EmitError::IllegalPrimitive
            | EmitError::IndexOutOfRange
            | EmitError::IncompatibleBranchTypeState => "type error",
        }
    }
}
