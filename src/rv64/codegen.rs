//! RV64 Function Emission
//!
//! One [`Rv64Function`] per emitted function. Every operation consults
//! and updates the function's [`TypeState`], packs a word through
//! [`encoding`], and appends it to the owned [`CodeBuffer`] — or fails
//! without touching either. Always generates position independent code.
//!
//! ## Checked emission
//!
//! Arithmetic sources must be integer-typed; destinations become unknown
//! integers. `mv` is the one operation that propagates a class, array or
//! token type verbatim. Field and array access verify the pointer's
//! recorded class or shape before any word is formed, and array indexing
//! emits an inline bounds check that traps on an illegal-instruction
//! word rather than calling into a runtime.
//!
//! ## Branches
//!
//! Branch targets are [`Label`] handles. The register/slot type table is
//! snapshotted at every branch site and at the label's definition site;
//! resolution requires the two snapshots to be compatible before the
//! real displacement is patched in.

use crate::error::{EmitError, Result};
use crate::types::{ClassId, ClassRegistry, TypeWord};

use super::encoding::{self, CodeBuffer};
use super::registers::{self, A0, MAX_PARAMS, RA, SP, T0};
use super::typestate::TypeState;

/// Frame slots are bounded so the whole frame (slots plus the return
/// address word) stays within the signed 12-bit load/store offset range.
pub const MAX_FRAME_SLOTS: u32 = 254;

/// Stable handle for a branch target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Label(usize);

#[derive(Debug)]
struct LabelState {
    /// Byte offset and type snapshot once bound
    bound: Option<(u32, Vec<TypeWord>)>,
    /// Branch sites waiting on this label: (word index, site snapshot)
    pending: Vec<(usize, Vec<TypeWord>)>,
}

/// Emitter for a single function
#[derive(Debug)]
pub struct Rv64Function {
    frame_slots: u32,
    use_x5_ret: bool,
    return_type: TypeWord,
    state: TypeState,
    code: CodeBuffer,
    frame_open: bool,
    labels: Vec<LabelState>,
}

impl Rv64Function {
    /// `frame_slots` 64-bit spill slots, at most [`MAX_PARAMS`] parameter
    /// types bound to a0.., and the declared return type. Leaf functions
    /// may set `use_x5_ret` to return through x5 instead of x1.
    ///
    /// The return type is recorded for the future `ret` contract (return
    /// value must match, callee-saved registers must carry their
    /// original-value tokens) but is not yet enforced anywhere.
    pub fn new(
        frame_slots: u32,
        use_x5_ret: bool,
        params: &[TypeWord],
        return_type: TypeWord,
    ) -> Result<Self> {
        if frame_slots > MAX_FRAME_SLOTS {
            return Err(EmitError::FrameTooLarge);
        }
        if params.len() > MAX_PARAMS {
            return Err(EmitError::TooManyParams);
        }
        let mut state = TypeState::new(frame_slots);
        for (i, &param) in params.iter().enumerate() {
            state.write(A0 + i as u8, param)?;
        }
        Ok(Rv64Function {
            frame_slots,
            use_x5_ret,
            return_type,
            state,
            code: CodeBuffer::new(),
            frame_open: false,
            labels: Vec::new(),
        })
    }

    pub fn return_type(&self) -> TypeWord {
        self.return_type
    }

    pub fn frame_slots(&self) -> u32 {
        self.frame_slots
    }

    /// Byte offset of the next instruction
    pub fn offset(&self) -> u32 {
        self.code.offset()
    }

    pub fn words(&self) -> &[u32] {
        self.code.words()
    }

    /// Static type currently recorded for a register
    pub fn reg_type(&self, r: u8) -> Result<TypeWord> {
        self.state.read(r)
    }

    /// The word stream as little-endian bytes. Fails while any label
    /// still has unresolved branches pointing at it.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        if self.labels.iter().any(|l| !l.pending.is_empty()) {
            return Err(EmitError::UnboundLabel);
        }
        Ok(self.code.to_le_bytes())
    }

    fn ra_reg(&self) -> u8 {
        if self.use_x5_ret {
            T0
        } else {
            RA
        }
    }

    fn frame_bytes(&self) -> u32 {
        self.frame_slots * 8 + 8
    }

    // ---------------------------------------------------------------
    // Frame management
    // ---------------------------------------------------------------

    /// Reserve the frame: move the stack pointer down by the slot area
    /// plus one word, and save the return-address register in that word.
    /// The stack pointer is written here and nowhere else.
    pub fn open_frame(&mut self) -> Result<()> {
        if self.frame_open {
            return Err(EmitError::FrameAlreadyOpen);
        }
        let bytes = self.frame_bytes() as i32;
        self.code
            .push(encoding::itype(-bytes, SP, 0, SP, encoding::OP_IMM));
        self.code.push(encoding::store(
            (self.frame_slots * 8) as i32,
            self.ra_reg(),
            SP,
            3,
        ));
        self.frame_open = true;
        Ok(())
    }

    /// Restore the return-address register and release the frame.
    pub fn close_frame(&mut self) -> Result<()> {
        if !self.frame_open {
            return Err(EmitError::FrameNotOpen);
        }
        self.code.push(encoding::load(
            (self.frame_slots * 8) as i32,
            SP,
            3,
            self.ra_reg(),
        ));
        self.code
            .push(encoding::itype(self.frame_bytes() as i32, SP, 0, SP, encoding::OP_IMM));
        self.frame_open = false;
        Ok(())
    }

    // ---------------------------------------------------------------
    // Spill and reload
    // ---------------------------------------------------------------

    /// Store `rs` into a frame slot. The slot records `rs`'s static type
    /// so a later reload recovers it; the type travels out-of-band, not
    /// through memory.
    pub fn spill_reg(&mut self, slot: u32, rs: u8) -> Result<()> {
        let ty = self.state.read(rs)?;
        self.state.write_slot(slot, ty)?;
        self.code
            .push(encoding::store((slot * 8) as i32, rs, SP, 3));
        Ok(())
    }

    /// Reload a frame slot into `rd`, which takes the slot's recorded
    /// type. A slot never spilled to reads as an unknown integer, so no
    /// reload can coin a pointer.
    pub fn unspill_reg(&mut self, rd: u8, slot: u32) -> Result<()> {
        let ty = self.state.read_slot(slot)?;
        self.state.write(rd, ty)?;
        self.code
            .push(encoding::load((slot * 8) as i32, SP, 3, rd));
        Ok(())
    }

    // ---------------------------------------------------------------
    // Labels and branches
    // ---------------------------------------------------------------

    /// A fresh, unbound label for a forward branch target.
    pub fn new_label(&mut self) -> Label {
        self.labels.push(LabelState {
            bound: None,
            pending: Vec::new(),
        });
        Label(self.labels.len() - 1)
    }

    /// A label bound at the current offset, capturing the current type
    /// state; the usual way to form a backward branch target.
    pub fn make_target(&mut self) -> Label {
        self.labels.push(LabelState {
            bound: Some((self.code.offset(), self.state.snapshot())),
            pending: Vec::new(),
        });
        Label(self.labels.len() - 1)
    }

    /// Bind an unbound label here. Every branch already recorded against
    /// it is checked for type-state compatibility and patched with its
    /// real displacement; on any failure nothing is patched or bound.
    pub fn bind(&mut self, label: Label) -> Result<()> {
        let here = self.code.offset();
        let snapshot = self.state.snapshot();
        let state = self
            .labels
            .get_mut(label.0)
            .ok_or(EmitError::IndexOutOfRange)?;
        if state.bound.is_some() {
            return Err(EmitError::LabelAlreadyBound);
        }
        for (word_index, site) in &state.pending {
            if !states_compatible(site, &snapshot) {
                return Err(EmitError::IncompatibleBranchTypeState);
            }
            branch_displacement(*word_index, here)?;
        }
        for (word_index, _) in &state.pending {
            let word = self.code.words()[*word_index];
            let rs2 = ((word >> 20) & 31) as u8;
            let rs1 = ((word >> 15) & 31) as u8;
            let funct3 = (word >> 12) & 7;
            let disp = branch_displacement(*word_index, here)?;
            self.code
                .patch(*word_index, encoding::btype(disp, rs2, rs1, funct3));
        }
        state.pending.clear();
        state.bound = Some((here, snapshot));
        Ok(())
    }

    fn branch(&mut self, rs1: u8, rs2: u8, funct3: u32, target: Label) -> Result<()> {
        let site = self.state.snapshot();
        let word_index = self.code.len();
        let state = self
            .labels
            .get_mut(target.0)
            .ok_or(EmitError::IndexOutOfRange)?;
        match &state.bound {
            Some((offset, taken)) => {
                if !states_compatible(&site, taken) {
                    return Err(EmitError::IncompatibleBranchTypeState);
                }
                let disp = branch_displacement(word_index, *offset)?;
                self.code.push(encoding::btype(disp, rs2, rs1, funct3));
            }
            None => {
                state.pending.push((word_index, site));
                self.code.push(encoding::branch_placeholder(rs2, rs1, funct3));
            }
        }
        Ok(())
    }

    pub fn beq(&mut self, rs1: u8, rs2: u8, target: Label) -> Result<()> {
        self.branch(rs1, rs2, 0, target)
    }

    pub fn bne(&mut self, rs1: u8, rs2: u8, target: Label) -> Result<()> {
        self.branch(rs1, rs2, 1, target)
    }

    pub fn blt(&mut self, rs1: u8, rs2: u8, target: Label) -> Result<()> {
        self.branch(rs1, rs2, 4, target)
    }

    pub fn bge(&mut self, rs1: u8, rs2: u8, target: Label) -> Result<()> {
        self.branch(rs1, rs2, 5, target)
    }

    pub fn bltu(&mut self, rs1: u8, rs2: u8, target: Label) -> Result<()> {
        self.branch(rs1, rs2, 6, target)
    }

    pub fn bgeu(&mut self, rs1: u8, rs2: u8, target: Label) -> Result<()> {
        self.branch(rs1, rs2, 7, target)
    }

    // ---------------------------------------------------------------
    // Object access
    // ---------------------------------------------------------------

    /// Load a field of the object `rptr` points at. The pointer must
    /// carry exactly the class's identity type; `rd` takes the field's
    /// declared type.
    pub fn load_field(
        &mut self,
        rd: u8,
        rptr: u8,
        classes: &ClassRegistry,
        cls: ClassId,
        field: usize,
    ) -> Result<()> {
        let desc = classes.desc(cls)?;
        if !desc.is_finished() {
            return Err(EmitError::ClassNotFinished);
        }
        if self.state.read(rptr)? != desc.type_word() {
            return Err(EmitError::TypeMismatch);
        }
        let ty = desc.field_type(field)?;
        let offset = desc.field_offset(field)?;
        self.state.write(rd, ty)?;
        self.code
            .push(encoding::load(offset as i32, rptr, ty.access_size_code(), rd));
        Ok(())
    }

    /// Store `rs` into a field. A reference-typed field only accepts a
    /// source carrying exactly the declared type; a primitive field
    /// accepts any integer-typed source, since no pointer can be coined
    /// that way. Stores never change the source's type.
    pub fn store_field(
        &mut self,
        rptr: u8,
        rs: u8,
        classes: &ClassRegistry,
        cls: ClassId,
        field: usize,
    ) -> Result<()> {
        let desc = classes.desc(cls)?;
        if !desc.is_finished() {
            return Err(EmitError::ClassNotFinished);
        }
        let ty = desc.field_type(field)?;
        let offset = desc.field_offset(field)?;
        if self.state.read(rs)? != ty && ty.is_reference() {
            return Err(EmitError::FieldTypeMismatch);
        }
        if self.state.read(rptr)? != desc.type_word() {
            return Err(EmitError::TypeMismatch);
        }
        self.code
            .push(encoding::store(offset as i32, rs, rptr, ty.access_size_code()));
        Ok(())
    }

    /// Narrow the class recorded for `r` from `oldtype` to an ancestor
    /// `newtype`, keeping its array depth. Emits nothing: it documents
    /// that the value is from here on only known to be a `newtype`.
    pub fn demote_class(
        &mut self,
        r: u8,
        classes: &ClassRegistry,
        oldtype: ClassId,
        newtype: ClassId,
    ) -> Result<()> {
        let current = self.state.read(r)?;
        if current.base() != oldtype.raw() {
            return Err(EmitError::TypeMismatch);
        }
        if !classes.is_a(oldtype, newtype) {
            return Err(EmitError::IllegalDemotion);
        }
        self.state.write(r, current.with_base(newtype.raw()))
    }

    // ---------------------------------------------------------------
    // Array access
    // ---------------------------------------------------------------
    //
    // Array objects reserve an 8-byte header: a 4-byte signed length,
    // then padding. Indexed access loads the length and compares the
    // index unsigned against it, executing an illegal-instruction word
    // when out of range; the trap policy is the execution environment's.

    /// Load the array length into `rd`.
    pub fn array_length(&mut self, rd: u8, rs: u8) -> Result<()> {
        if self.state.read(rs)?.depth() == 0 {
            return Err(EmitError::ExpectedArray);
        }
        self.state.write(rd, TypeWord::INT)?;
        self.code.push(encoding::load(0, rs, 2, rd));
        Ok(())
    }

    /// Bounds-checked indexed load. `rd` doubles as the scratch for the
    /// length and the scaled index, so it must differ from `rptr` and
    /// `ri`; its final type is one array level below `rptr`'s.
    pub fn array_get(&mut self, rd: u8, rptr: u8, ri: u8) -> Result<()> {
        let arr = self.state.read(rptr)?;
        if arr.depth() == 0 {
            return Err(EmitError::ExpectedArray);
        }
        if self.state.read(ri)?.is_reference() {
            return Err(EmitError::ExpectedInteger);
        }
        let element = arr.element();
        let size = element.access_size_code();
        self.state.write(rd, element)?;
        self.code.push(encoding::load(0, rptr, 2, rd));
        self.code.push(encoding::btype(8, rd, ri, 6));
        self.code.push(encoding::TRAP);
        self.code
            .push(encoding::itype(size as i32, ri, 1, rd, encoding::OP_IMM));
        self.code
            .push(encoding::rtype(0, rptr, rd, 0, rd, encoding::OP_REG));
        self.code.push(encoding::load(8, rd, size, rd));
        Ok(())
    }

    /// Bounds-checked indexed store. `rs` must carry exactly the element
    /// type; `rtmp` is clobbered as the scratch and ends as an unknown
    /// integer.
    pub fn array_put(&mut self, rptr: u8, ri: u8, rs: u8, rtmp: u8) -> Result<()> {
        let arr = self.state.read(rptr)?;
        if arr.depth() == 0 {
            return Err(EmitError::ExpectedArray);
        }
        if self.state.read(ri)?.is_reference() {
            return Err(EmitError::ExpectedInteger);
        }
        let element = arr.element();
        if self.state.read(rs)? != element {
            return Err(EmitError::ArrayElementTypeMismatch);
        }
        if registers::is_reserved(rtmp) {
            return Err(EmitError::BannedRegister);
        }
        let size = element.access_size_code();
        self.state.write(rtmp, TypeWord::INT)?;
        self.code.push(encoding::load(0, rptr, 2, rtmp));
        self.code.push(encoding::btype(8, rtmp, ri, 6));
        self.code.push(encoding::TRAP);
        self.code
            .push(encoding::itype(size as i32, ri, 1, rtmp, encoding::OP_IMM));
        self.code
            .push(encoding::rtype(0, rptr, rtmp, 0, rtmp, encoding::OP_REG));
        self.code.push(encoding::store(8, rs, rtmp, size));
        Ok(())
    }

    // ---------------------------------------------------------------
    // Checked encoding helpers
    // ---------------------------------------------------------------

    fn emit_rtype(
        &mut self,
        funct7: u32,
        rs2: u8,
        rs1: u8,
        funct3: u32,
        rd: u8,
        opcode: u32,
    ) -> Result<()> {
        self.state.assert_integer(rs2)?;
        self.state.assert_integer(rs1)?;
        self.state.write(rd, TypeWord::INT)?;
        self.code
            .push(encoding::rtype(funct7, rs2, rs1, funct3, rd, opcode));
        Ok(())
    }

    fn emit_itype(
        &mut self,
        imm12: i32,
        rs1: u8,
        funct3: u32,
        rd: u8,
        opcode: u32,
    ) -> Result<()> {
        self.state.assert_integer(rs1)?;
        self.state.write(rd, TypeWord::INT)?;
        self.code.push(encoding::itype(imm12, rs1, funct3, rd, opcode));
        Ok(())
    }

    fn emit_utype(&mut self, imm20: i32, rd: u8, opcode: u32) -> Result<()> {
        self.state.write(rd, TypeWord::INT)?;
        self.code.push(encoding::utype(imm20, rd, opcode));
        Ok(())
    }

    // ---------------------------------------------------------------
    // Pseudoinstructions
    // ---------------------------------------------------------------

    pub fn nop(&mut self) -> Result<()> {
        self.addi(0, 0, 0)
    }

    /// Register copy. The one operation that propagates the source's
    /// static type verbatim, pointer and token types included; encodes
    /// as `addi rd, rs, 0`.
    pub fn mv(&mut self, rd: u8, rs: u8) -> Result<()> {
        let ty = self.state.read(rs)?;
        self.state.write(rd, ty)?;
        self.code.push(encoding::itype(0, rs, 0, rd, encoding::OP_IMM));
        Ok(())
    }

    // ---------------------------------------------------------------
    // RV64I
    // ---------------------------------------------------------------

    pub fn lui(&mut self, rd: u8, imm20: i32) -> Result<()> {
        self.emit_utype(imm20, rd, encoding::OP_LUI)
    }

    pub fn addi(&mut self, rd: u8, rs1: u8, imm12: i32) -> Result<()> {
        self.emit_itype(imm12, rs1, 0, rd, encoding::OP_IMM)
    }

    pub fn slti(&mut self, rd: u8, rs1: u8, imm12: i32) -> Result<()> {
        self.emit_itype(imm12, rs1, 2, rd, encoding::OP_IMM)
    }

    pub fn sltiu(&mut self, rd: u8, rs1: u8, imm12: i32) -> Result<()> {
        self.emit_itype(imm12, rs1, 3, rd, encoding::OP_IMM)
    }

    pub fn xori(&mut self, rd: u8, rs1: u8, imm12: i32) -> Result<()> {
        self.emit_itype(imm12, rs1, 4, rd, encoding::OP_IMM)
    }

    pub fn ori(&mut self, rd: u8, rs1: u8, imm12: i32) -> Result<()> {
        self.emit_itype(imm12, rs1, 6, rd, encoding::OP_IMM)
    }

    pub fn andi(&mut self, rd: u8, rs1: u8, imm12: i32) -> Result<()> {
        self.emit_itype(imm12, rs1, 7, rd, encoding::OP_IMM)
    }

    // shifts take 6-bit immediates

    pub fn slli(&mut self, rd: u8, rs1: u8, shamt: u32) -> Result<()> {
        self.emit_itype((shamt & 63) as i32, rs1, 1, rd, encoding::OP_IMM)
    }

    pub fn srli(&mut self, rd: u8, rs1: u8, shamt: u32) -> Result<()> {
        self.emit_itype((shamt & 63) as i32, rs1, 5, rd, encoding::OP_IMM)
    }

    pub fn srai(&mut self, rd: u8, rs1: u8, shamt: u32) -> Result<()> {
        self.emit_itype(((1 << 10) | (shamt & 63)) as i32, rs1, 5, rd, encoding::OP_IMM)
    }

    pub fn add(&mut self, rd: u8, rs1: u8, rs2: u8) -> Result<()> {
        self.emit_rtype(0, rs2, rs1, 0, rd, encoding::OP_REG)
    }

    pub fn sub(&mut self, rd: u8, rs1: u8, rs2: u8) -> Result<()> {
        self.emit_rtype(1 << 5, rs2, rs1, 0, rd, encoding::OP_REG)
    }

    pub fn sll(&mut self, rd: u8, rs1: u8, rs2: u8) -> Result<()> {
        self.emit_rtype(0, rs2, rs1, 1, rd, encoding::OP_REG)
    }

    pub fn slt(&mut self, rd: u8, rs1: u8, rs2: u8) -> Result<()> {
        self.emit_rtype(0, rs2, rs1, 2, rd, encoding::OP_REG)
    }

    pub fn sltu(&mut self, rd: u8, rs1: u8, rs2: u8) -> Result<()> {
        self.emit_rtype(0, rs2, rs1, 3, rd, encoding::OP_REG)
    }

    pub fn xor(&mut self, rd: u8, rs1: u8, rs2: u8) -> Result<()> {
        self.emit_rtype(0, rs2, rs1, 4, rd, encoding::OP_REG)
    }

    pub fn srl(&mut self, rd: u8, rs1: u8, rs2: u8) -> Result<()> {
        self.emit_rtype(0, rs2, rs1, 5, rd, encoding::OP_REG)
    }

    pub fn sra(&mut self, rd: u8, rs1: u8, rs2: u8) -> Result<()> {
        self.emit_rtype(1 << 5, rs2, rs1, 5, rd, encoding::OP_REG)
    }

    pub fn or(&mut self, rd: u8, rs1: u8, rs2: u8) -> Result<()> {
        self.emit_rtype(0, rs2, rs1, 6, rd, encoding::OP_REG)
    }

    pub fn and(&mut self, rd: u8, rs1: u8, rs2: u8) -> Result<()> {
        self.emit_rtype(0, rs2, rs1, 7, rd, encoding::OP_REG)
    }

    // ---------------------------------------------------------------
    // M extension
    // ---------------------------------------------------------------

    pub fn mul(&mut self, rd: u8, rs1: u8, rs2: u8) -> Result<()> {
        self.emit_rtype(1, rs2, rs1, 0, rd, encoding::OP_REG)
    }

    pub fn mulh(&mut self, rd: u8, rs1: u8, rs2: u8) -> Result<()> {
        self.emit_rtype(1, rs2, rs1, 1, rd, encoding::OP_REG)
    }

    pub fn mulhsu(&mut self, rd: u8, rs1: u8, rs2: u8) -> Result<()> {
        self.emit_rtype(1, rs2, rs1, 2, rd, encoding::OP_REG)
    }

    pub fn mulhu(&mut self, rd: u8, rs1: u8, rs2: u8) -> Result<()> {
        self.emit_rtype(1, rs2, rs1, 3, rd, encoding::OP_REG)
    }

    pub fn div(&mut self, rd: u8, rs1: u8, rs2: u8) -> Result<()> {
        self.emit_rtype(1, rs2, rs1, 4, rd, encoding::OP_REG)
    }

    pub fn divu(&mut self, rd: u8, rs1: u8, rs2: u8) -> Result<()> {
        self.emit_rtype(1, rs2, rs1, 5, rd, encoding::OP_REG)
    }

    pub fn rem(&mut self, rd: u8, rs1: u8, rs2: u8) -> Result<()> {
        self.emit_rtype(1, rs2, rs1, 6, rd, encoding::OP_REG)
    }

    pub fn remu(&mut self, rd: u8, rs1: u8, rs2: u8) -> Result<()> {
        self.emit_rtype(1, rs2, rs1, 7, rd, encoding::OP_REG)
    }

    // ---------------------------------------------------------------
    // RV64-specific word forms
    // ---------------------------------------------------------------

    pub fn addiw(&mut self, rd: u8, rs1: u8, imm12: i32) -> Result<()> {
        self.emit_itype(imm12, rs1, 0, rd, encoding::OP_IMM32)
    }

    pub fn slliw(&mut self, rd: u8, rs1: u8, shamt: u32) -> Result<()> {
        self.emit_itype((shamt & 31) as i32, rs1, 1, rd, encoding::OP_IMM32)
    }

    pub fn srliw(&mut self, rd: u8, rs1: u8, shamt: u32) -> Result<()> {
        self.emit_itype((shamt & 31) as i32, rs1, 5, rd, encoding::OP_IMM32)
    }

    pub fn sraiw(&mut self, rd: u8, rs1: u8, shamt: u32) -> Result<()> {
        self.emit_itype(((1 << 10) | (shamt & 31)) as i32, rs1, 5, rd, encoding::OP_IMM32)
    }

    pub fn addw(&mut self, rd: u8, rs1: u8, rs2: u8) -> Result<()> {
        self.emit_rtype(0, rs2, rs1, 0, rd, encoding::OP_REG32)
    }

    pub fn subw(&mut self, rd: u8, rs1: u8, rs2: u8) -> Result<()> {
        self.emit_rtype(1 << 5, rs2, rs1, 0, rd, encoding::OP_REG32)
    }

    pub fn sllw(&mut self, rd: u8, rs1: u8, rs2: u8) -> Result<()> {
        self.emit_rtype(0, rs2, rs1, 1, rd, encoding::OP_REG32)
    }

    pub fn srlw(&mut self, rd: u8, rs1: u8, rs2: u8) -> Result<()> {
        self.emit_rtype(0, rs2, rs1, 5, rd, encoding::OP_REG32)
    }

    pub fn sraw(&mut self, rd: u8, rs1: u8, rs2: u8) -> Result<()> {
        self.emit_rtype(1 << 5, rs2, rs1, 5, rd, encoding::OP_REG32)
    }

    pub fn mulw(&mut self, rd: u8, rs1: u8, rs2: u8) -> Result<()> {
        self.emit_rtype(1, rs2, rs1, 0, rd, encoding::OP_REG32)
    }

    pub fn divw(&mut self, rd: u8, rs1: u8, rs2: u8) -> Result<()> {
        self.emit_rtype(1, rs2, rs1, 4, rd, encoding::OP_REG32)
    }

    pub fn divuw(&mut self, rd: u8, rs1: u8, rs2: u8) -> Result<()> {
        self.emit_rtype(1, rs2, rs1, 5, rd, encoding::OP_REG32)
    }

    pub fn remw(&mut self, rd: u8, rs1: u8, rs2: u8) -> Result<()> {
        self.emit_rtype(1, rs2, rs1, 6, rd, encoding::OP_REG32)
    }

    pub fn remuw(&mut self, rd: u8, rs1: u8, rs2: u8) -> Result<()> {
        self.emit_rtype(1, rs2, rs1, 7, rd, encoding::OP_REG32)
    }
}

/// A branch may only jump where every register and slot it carries is
/// usable as the target expects: exactly the same type, or any integer
/// where the target expects an unknown integer.
fn states_compatible(site: &[TypeWord], target: &[TypeWord]) -> bool {
    site.len() == target.len()
        && site
            .iter()
            .zip(target)
            .all(|(s, t)| s == t || (*t == TypeWord::INT && s.is_integer_like()))
}

/// Byte displacement from the branch word to the target offset, checked
/// against the signed 13-bit B-type range.
fn branch_displacement(word_index: usize, target_offset: u32) -> Result<i32> {
    let disp = target_offset as i64 - (word_index as i64 * 4);
    if !(-4096..=4094).contains(&disp) {
        return Err(EmitError::BranchTargetOutOfRange);
    }
    Ok(disp as i32)
}
