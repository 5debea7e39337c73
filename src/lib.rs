//! # tasm — type-checked RV64 machine code emission
//!
//! An emitter that doubles as a lightweight verifier: every instruction
//! updates a static type recorded per register and per frame slot, and
//! any operation that would treat a pointer as an integer, read past a
//! frozen layout, store the wrong class into a field, or index outside a
//! declared array shape is rejected when the instruction is formed, not
//! when it runs.
//!
//! ## Pipeline
//!
//! | Stage     | Component                        | Checked at        |
//! |-----------|----------------------------------|-------------------|
//! | Describe  | [`ClassRegistry`]                | freeze time       |
//! | Emit      | [`Rv64Function`]                 | per instruction   |
//! | Execute   | inlined bounds checks            | run time          |
//!
//! A front-end first builds and freezes its class descriptors, then
//! drives one [`Rv64Function`] per function in program order, and
//! finally serializes the word stream with
//! [`Rv64Function::to_bytes`]. Everything is synchronous and
//! single-threaded; class identities come from the registry the caller
//! owns, so independent registries never contend.

pub mod error;
pub mod rv64;
pub mod types;

pub use error::{EmitError, Result};
pub use rv64::{Label, Rv64Function};
pub use types::{ClassId, ClassRegistry, Primitive, TypeWord};
