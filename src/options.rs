use clap::{Args, Parser};

#[derive(Clone, Debug, Parser)]
#[clap(author, version, about)]
pub struct Options {
    /// Input source file
    pub input: String,

    /// Output file
    #[clap(short, long, default_value_t = String::from("out.o"))]
    pub output: String,

    #[clap(flatten)]
    pub last_stage: OptionStage,

    /// Log the work of every compiler stage to stderr
    #[clap(short, long)]
    pub verbose: bool,
}

// When both stages are given the earlier one, --ast, wins
#[derive(Clone, Debug, Default, Args)]
pub struct OptionStage {
    /// Only parse, writes the syntax tree to the output
    #[clap(long)]
    pub ast: bool,

    /// Compile to IR, writes the IR text to the output
    #[clap(long)]
    pub ir: bool,
}

/// Gets command line options and input using clap.
/// Returns an Options struct representing the fully parsed options
pub fn get() -> Options {
    Options::parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::Stage;

    #[test]
    fn defaults() {
        let options = Options::try_parse_from(["hinac", "main.hina"]).unwrap();
        assert_eq!(options.input, "main.hina");
        assert_eq!(options.output, "out.o");
        assert!(!options.last_stage.ast && !options.last_stage.ir);
        assert!(!options.verbose);
    }

    #[test]
    fn stages() {
        let options =
            Options::try_parse_from(["hinac", "main.hina", "-o", "main.ir", "--ir", "-v"]).unwrap();
        assert_eq!(options.output, "main.ir");
        assert!(options.last_stage.ir);
        assert!(options.verbose);

        assert_eq!(options.stage(), Stage::Ir);
        assert!(Options::try_parse_from(["hinac"]).is_err());
    }

    #[test]
    fn ast_takes_precedence_over_ir() {
        let options = Options::try_parse_from(["hinac", "main.hina", "--ast", "--ir"]).unwrap();
        assert!(options.last_stage.ast && options.last_stage.ir);
        assert_eq!(options.stage(), Stage::Ast);
    }
}
