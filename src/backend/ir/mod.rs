pub mod builder;
pub mod control_flow_graph;
pub mod ir;
pub mod print_ir;

pub use self::builder::{IRBuilder, ModuleBuilder};
pub use self::ir::*;
