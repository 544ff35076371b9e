use crate::backend::Target;
use crate::compiler;
use crate::error::CompileError;
use crate::options::Options;

// The last stage the compiler runs before writing its output
#[derive(PartialEq, Clone, Copy, Debug)]
pub enum Stage {
    Ast,
    Ir,
    Obj,
}

impl Options {
    pub fn stage(&self) -> Stage {
        if self.last_stage.ast {
            Stage::Ast
        } else if self.last_stage.ir {
            Stage::Ir
        } else {
            Stage::Obj
        }
    }
}

// Runs the compiler as described by the options
// The first error is printed to stderr and ends the compilation
pub fn drive(options: Options) -> Result<(), ()> {
    log::info!("driver started");
    match run(&options) {
        Ok(()) => {
            log::info!("driver finished, output written to {}", options.output);
            Ok(())
        }
        Err(error) => {
            match error.span {
                Some(_) => eprintln!("{}:{}", options.input, error),
                None => eprintln!("{}", error),
            }
            Err(())
        }
    }
}

fn run(options: &Options) -> Result<(), CompileError> {
    let source = compiler::open(&options.input)?;
    let stage = options.stage();
    log::debug!("Compiling {} until {:?}", options.input, stage);
    match stage {
        Stage::Ast => {
            let program = compiler::parse(&source)?;
            compiler::save(&options.output, &program.to_string())
        }
        Stage::Ir => {
            let module = compiler::generate_ir(&source)?;
            compiler::save(&options.output, &module.to_string())
        }
        Stage::Obj => {
            let target = Target::host();
            log::debug!("Host target is {}", target);
            let assembly = compiler::generate_assembly(&source, &target)?;
            compiler::assemble(&assembly, &options.output)
        }
    }
}
