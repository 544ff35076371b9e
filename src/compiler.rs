use std::fs::{read_to_string, write};
use std::path::Path;
use std::process::Command;

use crate::backend::ir::IRModule;
use crate::backend::{self, Target};
use crate::error::{CompileError, ErrorKind};
use crate::eval;
use crate::parser::{self, Program};

// The stages of the compiler, every stage stops at the first error

pub fn open(filename: &str) -> Result<String, CompileError> {
    read_to_string(filename)
        .map_err(|error| CompileError::io(format!("Failed to open file {}: {}", filename, error)))
}

pub fn save(filename: &str, contents: &str) -> Result<(), CompileError> {
    write(filename, contents)
        .map_err(|error| CompileError::io(format!("Failed to write file {}: {}", filename, error)))
}

pub fn parse(source: &str) -> Result<Program, CompileError> {
    parser::parse_program(source)
}

pub fn generate_ir(source: &str) -> Result<IRModule, CompileError> {
    let program = parse(source)?;
    eval::evaluate(&program)
}

pub fn generate_assembly(source: &str, target: &Target) -> Result<String, CompileError> {
    let module = generate_ir(source)?;
    let mut backend = backend::get_backend(target)
        .map_err(|message| CompileError::new(ErrorKind::Target, None, message))?;
    Ok(backend::generate_code(backend.as_mut(), &module))
}

// Assembles with nasm, the assembly is kept next to the object file
pub fn assemble(assembly: &str, output: &str) -> Result<(), CompileError> {
    let assembly_filename = Path::new(output)
        .with_extension("asm")
        .to_string_lossy()
        .to_string();
    let assembly_filename = if assembly_filename == output {
        format!("{}.s", output)
    } else {
        assembly_filename
    };
    save(&assembly_filename, assembly)?;

    log::info!("Assembler started on {}", assembly_filename);
    let result = Command::new("nasm")
        .args(["-felf64", "-o", output, assembly_filename.as_str()])
        .output()
        .map_err(|error| CompileError::io(format!("Failed to run nasm: {}", error)))?;
    log::info!(
        "status {}\nstdout: {}\nstderr: {}",
        result.status,
        String::from_utf8_lossy(&result.stdout),
        String::from_utf8_lossy(&result.stderr)
    );
    if !result.status.success() {
        return Err(CompileError::io(format!(
            "nasm failed ({}): {}",
            result.status,
            String::from_utf8_lossy(&result.stderr).trim()
        )));
    }
    Ok(())
}
