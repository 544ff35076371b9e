mod amd64;
pub mod ir;

use std::collections::HashSet;
use std::fmt::{self, Display};

use self::ir::*;

// Generates the complete assembly of a module for the specific backend specified
pub fn generate_code(backend: &mut dyn Backend, module: &IRModule) -> String {
    log::info!("Generating code with the {} backend", backend.backend_type());
    let function_names: HashSet<String> = module
        .functions
        .iter()
        .map(|function| function.name.clone())
        .collect();

    let mut assembly = backend.generate_global_prologue();
    for function in &module.functions {
        assembly.push_str(&backend.generate(function, &function_names));
    }
    assembly.push_str(&backend.generate_globals(module));
    assembly
}

/// The machine a module is compiled for, in target triple form
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Target {
    pub arch: String,
    pub vendor: String,
    pub os: String,
    pub env: String,
}

impl Target {
    pub fn host() -> Target {
        let os = std::env::consts::OS;
        let vendor = match os {
            "macos" | "ios" => "apple",
            "windows" => "pc",
            _ => "unknown",
        };
        let env = if cfg!(target_env = "gnu") {
            "gnu"
        } else if cfg!(target_env = "musl") {
            "musl"
        } else if cfg!(target_env = "msvc") {
            "msvc"
        } else {
            ""
        };
        Target {
            arch: std::env::consts::ARCH.to_string(),
            vendor: vendor.to_string(),
            os: os.to_string(),
            env: env.to_string(),
        }
    }
}

impl Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.arch, self.vendor, self.os)?;
        if !self.env.is_empty() {
            write!(f, "-{}", self.env)?;
        }
        Ok(())
    }
}

pub fn get_backend(target: &Target) -> Result<Box<dyn Backend>, String> {
    let backend: Box<dyn Backend> = match (target.arch.as_str(), target.os.as_str()) {
        ("x86_64", "linux") => Box::new(amd64::BackendAMD64::new()),
        _ => {
            log::error!("There is no backend implemented for {}", target);
            return Err(format!("can't lookup target (triple: {})", target));
        }
    };
    Ok(backend)
}

pub trait Backend {
    // Gives the backend type for processing
    fn backend_type(&self) -> &'static str;

    // Generates the assembly for a function
    // function_names contains every function defined in the module
    fn generate(&mut self, function: &IRFunction, function_names: &HashSet<String>) -> String;

    // Emitted once before all functions
    fn generate_global_prologue(&mut self) -> String {
        String::new()
    }

    // Emitted once after all functions: external declarations and string constants
    fn generate_globals(&mut self, module: &IRModule) -> String;
}
