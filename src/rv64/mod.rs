//! RV64 Typed Code Emission Backend
//!
//! Direct RV64 machine code generation with emission-time type checking.
//!
//! ## Architecture
//!
//! ```text
//! ClassRegistry + Rv64Function ops → TypeState checks → words → raw binary
//! ```
//!
//! ## Modules
//!
//! - `registers`: RV64 register numbers and ABI roles
//! - `encoding`: instruction encoding (fixed 32-bit words)
//! - `typestate`: per-register and per-frame-slot static types
//! - `codegen`: the checked function emitter

pub mod codegen;
pub mod encoding;
pub mod registers;
pub mod typestate;

pub use codegen::{Label, Rv64Function};
pub use encoding::CodeBuffer;
pub use typestate::TypeState;
