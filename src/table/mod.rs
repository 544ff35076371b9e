mod symbol_table;
mod r#type;

pub use self::r#type::{FunctionSignature, Type};
pub use self::symbol_table::*;
