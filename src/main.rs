//! tasm CLI
//!
//! Drives the typed RV64 emitter over three fixed exercise programs and
//! dumps the resulting word stream to a file. The output is the raw
//! little-endian binary; there is no header or relocation information.

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use tasm::{ClassRegistry, Result, Rv64Function, TypeWord};

#[derive(Parser)]
#[command(name = "tasmc")]
#[command(version)]
#[command(about = "Typed RV64 machine-code emitter", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Emit the arithmetic exercise program (no memory access)
    Arith {
        /// Output file for the raw word stream
        #[arg(value_name = "FILE")]
        output: PathBuf,
    },
    /// Emit the object field access exercise program
    Objects {
        #[arg(value_name = "FILE")]
        output: PathBuf,
    },
    /// Emit the array access exercise program
    Arrays {
        #[arg(value_name = "FILE")]
        output: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let (output, built) = match cli.command {
        Commands::Arith { output } => (output, build_arith()),
        Commands::Objects { output } => (output, build_objects()),
        Commands::Arrays { output } => (output, build_arrays()),
    };

    let bytes = match built {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("{} {} ({})", "error:".red().bold(), e, e.category());
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = fs::write(&output, &bytes) {
        eprintln!(
            "{} cannot write {}: {}",
            "error:".red().bold(),
            output.display(),
            e
        );
        return ExitCode::FAILURE;
    }

    println!(
        "{} {} instructions ({} bytes) -> {}",
        "Emitted".green().bold(),
        bytes.len() / 4,
        bytes.len(),
        output.display()
    );
    ExitCode::SUCCESS
}

/// Every arithmetic and logic instruction once over, leaf frame.
fn build_arith() -> Result<Vec<u8>> {
    let mut f = Rv64Function::new(0, true, &[], TypeWord::INT)?;
    f.nop()?;
    f.mv(5, 6)?;
    f.lui(5, -100_000)?;
    f.addi(5, 6, -100)?;
    f.slti(5, 6, -100)?;
    f.sltiu(5, 6, -100)?;
    f.xori(5, 6, -100)?;
    f.ori(5, 6, -100)?;
    f.andi(5, 6, -100)?;
    f.slli(5, 6, 33)?;
    f.srli(5, 6, 33)?;
    f.srai(5, 6, 33)?;
    f.add(5, 6, 7)?;
    f.sub(5, 6, 7)?;
    f.sll(5, 6, 7)?;
    f.slt(5, 6, 7)?;
    f.sltu(5, 6, 7)?;
    f.xor(5, 6, 7)?;
    f.srl(5, 6, 7)?;
    f.sra(5, 6, 7)?;
    f.or(5, 6, 7)?;
    f.and(5, 6, 7)?;
    f.mul(5, 6, 7)?;
    f.mulh(5, 6, 7)?;
    f.mulhsu(5, 6, 7)?;
    f.mulhu(5, 6, 7)?;
    f.div(5, 6, 7)?;
    f.divu(5, 6, 7)?;
    f.rem(5, 6, 7)?;
    f.remu(5, 6, 7)?;
    f.addiw(5, 6, -100)?;
    f.slliw(5, 6, 17)?;
    f.srliw(5, 6, 17)?;
    f.sraiw(5, 6, 17)?;
    f.addw(5, 6, 7)?;
    f.subw(5, 6, 7)?;
    f.sllw(5, 6, 7)?;
    f.srlw(5, 6, 7)?;
    f.sraw(5, 6, 7)?;
    f.mulw(5, 6, 7)?;
    f.divw(5, 6, 7)?;
    f.divuw(5, 6, 7)?;
    f.remw(5, 6, 7)?;
    f.remuw(5, 6, 7)?;
    f.to_bytes()
}

/// Two classes, a frame, field traffic and a spill round trip.
fn build_objects() -> Result<Vec<u8>> {
    let mut classes = ClassRegistry::new();
    let base = classes.create_root()?;
    classes.add_primitive_field(base, 0, 2)?; // int
    classes.add_primitive_field(base, 0, 1)?; // short
    classes.add_primitive_field(base, 0, 0)?; // byte
    classes.add_primitive_field(base, 0, 0)?;
    classes.finish(base)?;
    let wide = classes.derive(base)?;
    classes.add_primitive_field(wide, 0, 3)?; // long
    classes.finish(wide)?;

    let params = [base.type_word(), wide.type_word()];
    let mut f = Rv64Function::new(100, false, &params, TypeWord::INT)?;
    f.open_frame()?;
    f.load_field(15, 10, &classes, base, 1)?;
    f.store_field(11, 15, &classes, wide, 4)?;
    f.load_field(16, 10, &classes, base, 2)?;
    f.spill_reg(70, 16)?;
    f.unspill_reg(17, 70)?;
    f.store_field(11, 17, &classes, wide, 0)?;
    f.close_frame()?;
    f.to_bytes()
}

/// Length, bounds-checked get and put over a nested array parameter.
fn build_arrays() -> Result<Vec<u8>> {
    let params = [TypeWord::array(2, 4)?, TypeWord::INT];
    let mut f = Rv64Function::new(0, false, &params, TypeWord::INT)?;
    f.array_length(5, 10)?;
    f.array_get(6, 10, 11)?;
    f.array_put(10, 11, 6, 7)?;
    f.to_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drivers_build() {
        assert_eq!(build_arith().unwrap().len(), 44 * 4);
        // frame open/close are two words each around four memory ops
        assert_eq!(build_objects().unwrap().len(), 10 * 4);
        // one length load, then two 5/6-word bounds-checked sequences
        assert_eq!(build_arrays().unwrap().len(), 12 * 4);
    }

    #[test]
    fn test_dump_writes_raw_words() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("arith.bin");
        let bytes = build_arith().unwrap();
        fs::write(&path, &bytes).unwrap();
        let back = fs::read(&path).unwrap();
        assert_eq!(back, bytes);
        // the first word is the canonical nop, stored little-endian
        assert_eq!(&back[0..4], &[0x13, 0x00, 0x00, 0x00]);
    }
}
