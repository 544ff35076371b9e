use std::{
    fs, io,
    path::{Path, PathBuf},
    process::Command,
};
use hinac_lib as hinac;
use hinac::driver::Stage;
use hinac::options::{OptionStage, Options};

fn get_options(path: &Path, stage: Stage) -> Options {
    let stage_name = path
        .parent()
        .and_then(Path::parent)
        .and_then(Path::file_name)
        .and_then(|name| name.to_str())
        .unwrap_or("programs");
    let extension = match stage {
        Stage::Ast => "ast",
        Stage::Ir => "ir",
        Stage::Obj => "o",
    };
    let output = std::env::temp_dir().join(format!(
        "hinac-{}-{}.{}",
        stage_name,
        path.file_stem().unwrap().to_str().unwrap(),
        extension
    ));
    Options {
        input: path.to_str().unwrap().to_string(),
        output: output.to_str().unwrap().to_string(),
        last_stage: OptionStage {
            ast: stage == Stage::Ast,
            ir: stage == Stage::Ir,
        },
        verbose: false,
    }
}

fn is_source_file(path: &Path) -> bool {
    matches!(path.extension().and_then(|s| s.to_str()), Some("hina"))
}

fn empty_test(_path: PathBuf, _failures: &mut Vec<String>, _error_count: &mut i32) {}

fn test_stage<F, G>(
    dir: PathBuf,
    failures: &mut Vec<String>,
    valid: &F,
    invalid: &G,
) -> io::Result<i32>
where
    F: Fn(PathBuf, &mut Vec<String>, &mut i32),
    G: Fn(PathBuf, &mut Vec<String>, &mut i32),
{
    let mut valid_dir = dir.clone();
    let mut invalid_dir = dir;
    valid_dir.push("valid/");
    invalid_dir.push("invalid/");
    let fail_count = test_files(valid_dir.as_path(), failures, valid)?
        + test_files(invalid_dir.as_path(), failures, invalid)?;
    Ok(fail_count)
}

fn test_files<F>(dir: &Path, failures: &mut Vec<String>, test: &F) -> io::Result<i32>
where
    F: Fn(PathBuf, &mut Vec<String>, &mut i32),
{
    let mut fail_count = 0;
    if !dir.is_dir() {
        return Ok(0);
    }
    for file in fs::read_dir(dir)? {
        let file = file?;
        let path = file.path();
        if is_source_file(&path) {
            eprintln!("Testing {}", path.to_str().unwrap());
            test(path, failures, &mut fail_count);
        }
    }
    Ok(fail_count)
}

fn test_valid(path: PathBuf, stage: Stage, failures: &mut Vec<String>, fail_count: &mut i32) {
    let options = get_options(&path, stage);
    match hinac::driver::drive(options.clone()) {
        Err(()) => {
            failures.push(format!("{}: driver failed in {:?} mode", options.input, stage));
            *fail_count += 1;
        }
        Ok(()) => {
            if fs::metadata(&options.output).is_err() {
                failures.push(format!("{}: no output written", options.input));
                *fail_count += 1;
            }
        }
    }
}

fn test_invalid(path: PathBuf, stage: Stage, failures: &mut Vec<String>, fail_count: &mut i32) {
    let options = get_options(&path, stage);
    match hinac::driver::drive(options.clone()) {
        Err(()) => (),
        Ok(()) => {
            failures.push(format!(
                "Invalid example did not produce error in {:?} mode: {}",
                stage, options.input
            ));
            *fail_count += 1;
        }
    }
}

fn test_valid_ast(path: PathBuf, failures: &mut Vec<String>, fail_count: &mut i32) {
    test_valid(path, Stage::Ast, failures, fail_count)
}

fn test_valid_ir(path: PathBuf, failures: &mut Vec<String>, fail_count: &mut i32) {
    test_valid(path, Stage::Ir, failures, fail_count)
}

fn test_invalid_ast(path: PathBuf, failures: &mut Vec<String>, fail_count: &mut i32) {
    test_invalid(path, Stage::Ast, failures, fail_count)
}

fn test_invalid_ir(path: PathBuf, failures: &mut Vec<String>, fail_count: &mut i32) {
    test_invalid(path, Stage::Ir, failures, fail_count)
}

// Object files can only be produced on x86_64 linux with nasm installed
fn native_toolchain_available() -> bool {
    cfg!(all(target_arch = "x86_64", target_os = "linux"))
        && Command::new("nasm").arg("-v").output().is_ok()
}

fn test_valid_native(path: PathBuf, failures: &mut Vec<String>, fail_count: &mut i32) {
    if !native_toolchain_available() {
        eprintln!("Skipping native compilation of {}", path.to_str().unwrap());
        return;
    }
    test_valid(path, Stage::Obj, failures, fail_count)
}

macro_rules! tests {
    ($($name:ident: ($file:literal, $valid:ident, $invalid:ident))*) => {
        $(
            #[test]
            fn $name() {
                let mut failures = Vec::<String>::new();
                let home_dir = env!("CARGO_MANIFEST_DIR");
                let test_dir = format!("{}/tests/{}", home_dir, $file);
                let test_path = Path::new(&test_dir);
                let fail_count = test_stage(
                    test_path.to_path_buf(),
                    &mut failures,
                    &$valid,
                    &$invalid,
                )
                .expect("File error");
                let mut string = String::new();
                for failure in failures {
                    string.push_str(&format!("{}\n", failure));
                }
                assert_eq!(
                    fail_count, 0,
                    "Failures occured during testing\n {}",
                    string
                );
            }
        )*
    };
}

tests! {
    lexer_ast: ("programs/lexer", test_valid_ast, test_invalid_ast)
    lexer_ir: ("programs/lexer", test_valid_ir, test_invalid_ir)
    parser_ast: ("programs/parser", test_valid_ast, test_invalid_ast)
    parser_ir: ("programs/parser", test_valid_ir, test_invalid_ir)
    semantic_ast: ("programs/semantic", test_valid_ast, empty_test)
    semantic_ir: ("programs/semantic", test_valid_ir, test_invalid_ir)
    codegen_ir: ("programs/codegen", test_valid_ir, test_invalid_ir)
    codegen_native: ("programs/codegen", test_valid_native, empty_test)
}

fn compile_to_ir(file: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/programs").join(file);
    let mut options = get_options(&path, Stage::Ir);
    options.output.push_str(".check");
    hinac::driver::drive(options.clone()).expect("driver failed");
    fs::read_to_string(&options.output).expect("reading IR output")
}

#[test]
fn arguments_are_passed_in_source_order() {
    let ir = compile_to_ir("codegen/valid/add.hina");
    assert!(ir.contains("define i32 @add(i32, i32) {"), "{}", ir);
    assert!(ir.contains("\t%0 = loadi i32 #2\n"), "{}", ir);
    assert!(ir.contains("\t%1 = loadi i32 #3\n"), "{}", ir);
    assert!(ir.contains("\t%2 = call i32 @add(i32 %0, i32 %1)\n"), "{}", ir);
}

#[test]
fn extern_functions_are_declared() {
    let ir = compile_to_ir("codegen/valid/hello.hina");
    assert!(ir.contains("declare i32 @puts(ptr)\n"), "{}", ir);
    assert!(ir.contains("@str0 = \"Hello, world!\"\n"), "{}", ir);
}

#[test]
fn ast_dump_is_written() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/programs/parser/valid/precedence.hina");
    let mut options = get_options(&path, Stage::Ast);
    options.output.push_str(".check");
    hinac::driver::drive(options.clone()).expect("driver failed");
    let ast = fs::read_to_string(&options.output).expect("reading AST output");
    assert!(ast.starts_with("Program("), "{}", ast);
}

#[test]
fn missing_input_fails() {
    let options = get_options(Path::new("tests/programs/does_not_exist.hina"), Stage::Ir);
    assert_eq!(hinac::driver::drive(options), Err(()));
}
