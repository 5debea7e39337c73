//! Per-Function Static Type Tracking
//!
//! One [`TypeState`] per function emitter: a [`TypeWord`] for each of the
//! 32 registers plus one per declared frame slot. Every emission
//! operation reads and updates exactly the entries it touches; this table
//! is the only place register and slot types ever change.

use crate::error::{EmitError, Result};
use crate::types::TypeWord;

use super::registers::{self, NUM_REGS};

/// Static types of the 32 registers and the frame slots
#[derive(Debug)]
pub struct TypeState {
    /// Registers first, then frame slots
    entries: Vec<TypeWord>,
    slots: u32,
}

impl TypeState {
    /// Registers 0..=4 start as unknown integers, 5..=31 as their own
    /// original-value token, and every frame slot as an unknown integer.
    pub fn new(frame_slots: u32) -> Self {
        let mut entries = Vec::with_capacity(NUM_REGS as usize + frame_slots as usize);
        for _ in 0..5 {
            entries.push(TypeWord::INT);
        }
        for r in 5..NUM_REGS {
            entries.push(TypeWord::token(r));
        }
        for _ in 0..frame_slots {
            entries.push(TypeWord::INT);
        }
        TypeState {
            entries,
            slots: frame_slots,
        }
    }

    pub fn read(&self, r: u8) -> Result<TypeWord> {
        if r >= NUM_REGS {
            return Err(EmitError::IllegalRegister);
        }
        Ok(self.entries[r as usize])
    }

    /// Register 0 is hard-wired to zero and re-pins to the unknown
    /// integer on every write, whatever was requested.
    pub fn write(&mut self, r: u8, ty: TypeWord) -> Result<()> {
        if r >= NUM_REGS {
            return Err(EmitError::IllegalRegister);
        }
        self.entries[r as usize] = ty;
        self.entries[0] = TypeWord::INT;
        Ok(())
    }

    /// Usable as an arithmetic operand: not one of the reserved
    /// registers, and not currently holding a reference type. Tokens
    /// count as integers; reading a register never written since entry
    /// behaves as an unknown integer.
    pub fn assert_integer(&self, r: u8) -> Result<()> {
        if registers::is_reserved(r) {
            return Err(EmitError::BannedRegister);
        }
        if !self.read(r)?.is_integer_like() {
            return Err(EmitError::ExpectedInteger);
        }
        Ok(())
    }

    pub fn slot_count(&self) -> u32 {
        self.slots
    }

    pub fn read_slot(&self, slot: u32) -> Result<TypeWord> {
        if slot >= self.slots {
            return Err(EmitError::IndexOutOfRange);
        }
        Ok(self.entries[NUM_REGS as usize + slot as usize])
    }

    pub fn write_slot(&mut self, slot: u32, ty: TypeWord) -> Result<()> {
        if slot >= self.slots {
            return Err(EmitError::IndexOutOfRange);
        }
        self.entries[NUM_REGS as usize + slot as usize] = ty;
        Ok(())
    }

    /// The whole table, registers then slots, for branch bookkeeping
    pub fn snapshot(&self) -> Vec<TypeWord> {
        self.entries.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Primitive;

    #[test]
    fn test_initial_state() {
        let state = TypeState::new(2);
        for r in 0..5 {
            assert_eq!(state.read(r).unwrap(), TypeWord::INT);
        }
        for r in 5..32 {
            assert_eq!(state.read(r).unwrap(), TypeWord::token(r));
        }
        assert_eq!(state.read_slot(0).unwrap(), TypeWord::INT);
        assert_eq!(state.read_slot(1).unwrap(), TypeWord::INT);
    }

    #[test]
    fn test_register_zero_pinned() {
        let mut state = TypeState::new(0);
        state.write(0, TypeWord::from_raw(40)).unwrap();
        assert_eq!(state.read(0).unwrap(), TypeWord::INT);
        // writes to other registers also keep x0 pinned
        state.write(6, TypeWord::from_raw(40)).unwrap();
        assert_eq!(state.read(0).unwrap(), TypeWord::INT);
        assert_eq!(state.read(6).unwrap(), TypeWord::from_raw(40));
    }

    #[test]
    fn test_illegal_register() {
        let mut state = TypeState::new(0);
        assert_eq!(state.read(32), Err(EmitError::IllegalRegister));
        assert_eq!(
            state.write(32, TypeWord::INT),
            Err(EmitError::IllegalRegister)
        );
    }

    #[test]
    fn test_banned_registers() {
        let state = TypeState::new(0);
        for r in 1..=4 {
            assert_eq!(state.assert_integer(r), Err(EmitError::BannedRegister));
        }
        assert!(state.assert_integer(0).is_ok());
        assert!(state.assert_integer(5).is_ok());
    }

    #[test]
    fn test_expected_integer() {
        let mut state = TypeState::new(0);
        state.write(6, TypeWord::from_raw(40)).unwrap();
        assert_eq!(state.assert_integer(6), Err(EmitError::ExpectedInteger));
        // an array of bytes is a reference, not an integer
        state
            .write(7, TypeWord::array(1, Primitive::Byte.code()).unwrap())
            .unwrap();
        assert_eq!(state.assert_integer(7), Err(EmitError::ExpectedInteger));
        // an untouched register reads as its token, which is an integer
        assert!(state.assert_integer(20).is_ok());
    }

    #[test]
    fn test_slot_bounds() {
        let mut state = TypeState::new(1);
        state.write_slot(0, TypeWord::from_raw(40)).unwrap();
        assert_eq!(state.read_slot(0).unwrap(), TypeWord::from_raw(40));
        assert_eq!(state.read_slot(1), Err(EmitError::IndexOutOfRange));
        assert_eq!(
            state.write_slot(1, TypeWord::INT),
            Err(EmitError::IndexOutOfRange)
        );
    }

    #[test]
    fn test_snapshot_covers_slots() {
        let mut state = TypeState::new(1);
        state.write_slot(0, TypeWord::from_raw(40)).unwrap();
        let snap = state.snapshot();
        assert_eq!(snap.len(), 33);
        assert_eq!(snap[32], TypeWord::from_raw(40));
    }
}
