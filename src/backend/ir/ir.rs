use smallvec::{smallvec, SmallVec};

use super::control_flow_graph::ControlFlowGraph;

/// A complete translation unit: the string constants, the external functions and the defined functions
#[derive(Clone, Debug, PartialEq, Default)]
pub struct IRModule {
    pub strings: Vec<String>,
    pub declarations: Vec<IRSignature>,
    pub functions: Vec<IRFunction>,
}

/// The calling interface of a function, used for declarations
#[derive(Clone, Debug, PartialEq)]
pub struct IRSignature {
    pub name: String,
    pub return_size: IRSize,
    pub arguments: Vec<IRSize>,
}

/// Stores a function and all the associated information
// The label of a block is its index in blocks, block 0 is the entry
#[derive(Clone, Debug, PartialEq)]
pub struct IRFunction {
    pub name: String,
    pub return_size: IRSize,
    pub arguments: Vec<IRSize>,
    pub variables: Vec<IRVariable>,
    pub blocks: Vec<IRBlock>,
    pub vreg_count: u32,
}

/// A stack slot, addressed with AddrL
#[derive(Clone, Debug, PartialEq)]
pub struct IRVariable {
    pub size: IRSize,
    pub name: String,
}

/// A basic block. Only its last instruction may transfer control.
#[derive(Clone, Debug, PartialEq)]
pub struct IRBlock {
    pub label: IRLabel,
    pub name: String,
    pub instructions: Vec<IRInstruction>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct IRArguments {
    pub sizes: Vec<IRSize>,
    pub arguments: Vec<IRReg>,
}

/// All instructions that are available in the Immediate representation
#[derive(Clone, Debug, PartialEq)]
pub enum IRInstruction {
    Imm(IRSize, IRReg, i128),
    Str(IRReg, usize),           // Result string-index
    Arg(IRSize, IRReg, usize),   // Result argument-index
    AddrL(IRSize, IRReg, usize), // Result variable-index

    Load(IRSize, IRReg, IRReg),  // Result address
    Store(IRSize, IRReg, IRReg), // From address

    Add(IRSize, IRReg, IRReg, IRReg),
    Sub(IRSize, IRReg, IRReg, IRReg),
    Mul(IRSize, IRReg, IRReg, IRReg),
    Div(IRSize, IRReg, IRReg, IRReg),

    Eq(IRSize, IRReg, IRReg, IRReg),
    Ne(IRSize, IRReg, IRReg, IRReg),
    Lt(IRSize, IRReg, IRReg, IRReg),
    Le(IRSize, IRReg, IRReg, IRReg),
    Gt(IRSize, IRReg, IRReg, IRReg),
    Ge(IRSize, IRReg, IRReg, IRReg),

    Call(IRSize, Option<IRReg>, String, Box<IRArguments>),

    Jmp(IRLabel),
    Jcc(IRSize, IRReg, IRLabel, IRLabel), // Condition true-label false-label
    Ret(IRSize, Option<IRReg>),
}

// This is a copy of IRInstruction without the inputs used to simplify generation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IRType {
    Imm,
    Str,
    Arg,
    AddrL,

    Load,
    Store,

    Add,
    Sub,
    Mul,
    Div,

    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,

    Call,

    Jmp,
    Jcc,
    Ret,
}

pub type IRReg = u32;
pub type IRLabel = u32;

// Stores the size of a particular operation
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum IRSize {
    S32,
    P,
    V,
}

impl IRInstruction {
    pub fn to_type(&self) -> IRType {
        use IRInstruction::*;
        match self {
            Imm(..) => IRType::Imm,
            Str(..) => IRType::Str,
            Arg(..) => IRType::Arg,
            AddrL(..) => IRType::AddrL,
            Load(..) => IRType::Load,
            Store(..) => IRType::Store,
            Add(..) => IRType::Add,
            Sub(..) => IRType::Sub,
            Mul(..) => IRType::Mul,
            Div(..) => IRType::Div,
            Eq(..) => IRType::Eq,
            Ne(..) => IRType::Ne,
            Lt(..) => IRType::Lt,
            Le(..) => IRType::Le,
            Gt(..) => IRType::Gt,
            Ge(..) => IRType::Ge,
            Call(..) => IRType::Call,
            Jmp(..) => IRType::Jmp,
            Jcc(..) => IRType::Jcc,
            Ret(..) => IRType::Ret,
        }
    }

    pub fn is_terminator(&self) -> bool {
        matches!(self.to_type(), IRType::Jmp | IRType::Jcc | IRType::Ret)
    }

    // Get the register defined by this instruction if it exists
    pub fn get_result(&self) -> Option<IRReg> {
        use IRInstruction::*;
        match self {
            Imm(_, result, _)
            | Str(result, _)
            | Arg(_, result, _)
            | AddrL(_, result, _)
            | Load(_, result, _)
            | Add(_, result, ..)
            | Sub(_, result, ..)
            | Mul(_, result, ..)
            | Div(_, result, ..)
            | Eq(_, result, ..)
            | Ne(_, result, ..)
            | Lt(_, result, ..)
            | Le(_, result, ..)
            | Gt(_, result, ..)
            | Ge(_, result, ..) => Some(*result),
            Call(_, result, ..) => *result,
            Store(..) | Jmp(_) | Jcc(..) | Ret(..) => None,
        }
    }

    // Get all registers read by this instruction
    pub fn get_used_vreg(&self) -> SmallVec<[IRReg; 4]> {
        use IRInstruction::*;
        match self {
            Imm(..) | Str(..) | Arg(..) | AddrL(..) | Jmp(_) => SmallVec::new(),
            Load(_, _, address) => smallvec![*address],
            Store(_, from, address) => smallvec![*from, *address],
            Add(_, _, left, right)
            | Sub(_, _, left, right)
            | Mul(_, _, left, right)
            | Div(_, _, left, right)
            | Eq(_, _, left, right)
            | Ne(_, _, left, right)
            | Lt(_, _, left, right)
            | Le(_, _, left, right)
            | Gt(_, _, left, right)
            | Ge(_, _, left, right) => smallvec![*left, *right],
            Call(_, _, _, arguments) => arguments.arguments.iter().copied().collect(),
            Jcc(_, condition, ..) => smallvec![*condition],
            Ret(_, Some(value)) => smallvec![*value],
            Ret(_, None) => SmallVec::new(),
        }
    }

    // The blocks control may continue in after this instruction
    pub fn successors(&self) -> SmallVec<[IRLabel; 2]> {
        match self {
            IRInstruction::Jmp(next) => smallvec![*next],
            IRInstruction::Jcc(_, _, then, otherwise) => smallvec![*then, *otherwise],
            _ => SmallVec::new(),
        }
    }
}

impl IRBlock {
    pub fn new(label: IRLabel, name: &str) -> IRBlock {
        IRBlock {
            label,
            name: name.to_string(),
            instructions: Vec::new(),
        }
    }

    pub fn terminator(&self) -> Option<&IRInstruction> {
        self.instructions.last().filter(|ins| ins.is_terminator())
    }

    pub fn is_terminated(&self) -> bool {
        self.terminator().is_some()
    }
}

impl IRFunction {
    pub fn new(signature: IRSignature) -> IRFunction {
        IRFunction {
            name: signature.name,
            return_size: signature.return_size,
            arguments: signature.arguments,
            variables: Vec::new(),
            blocks: Vec::new(),
            vreg_count: 0,
        }
    }

    pub fn signature(&self) -> IRSignature {
        IRSignature {
            name: self.name.clone(),
            return_size: self.return_size,
            arguments: self.arguments.clone(),
        }
    }

    pub fn block(&self, label: IRLabel) -> &IRBlock {
        &self.blocks[label as usize]
    }

    pub fn block_named(&self, name: &str) -> Option<&IRBlock> {
        self.blocks.iter().find(|block| block.name == name)
    }

    pub fn instructions(&self) -> impl Iterator<Item = &IRInstruction> + '_ {
        self.blocks.iter().flat_map(|block| block.instructions.iter())
    }

    // Checks the structural rules every generated function must follow
    // Every block ends in exactly one terminator, branch targets exist,
    // every register is defined once and before any use within its block order
    pub fn verify(&self) -> Result<(), String> {
        let mut defined = vec![false; self.vreg_count as usize];
        for (block, i) in self.blocks.iter().zip(0..) {
            if block.label != i {
                return Err(format!(
                    "{}: block {} is stored at index {}",
                    self.name, block.label, i
                ));
            }
            let (last, body) = match block.instructions.split_last() {
                Some(split) => split,
                None => return Err(format!("{}: block {} is empty", self.name, block.label)),
            };
            if !last.is_terminator() {
                return Err(format!(
                    "{}: block {} does not end in a terminator",
                    self.name, block.label
                ));
            }
            if let Some(ins) = body.iter().find(|ins| ins.is_terminator()) {
                return Err(format!(
                    "{}: terminator {:?} in the middle of block {}",
                    self.name, ins, block.label
                ));
            }
            for target in last.successors() {
                if target as usize >= self.blocks.len() {
                    return Err(format!(
                        "{}: branch to unknown block {}",
                        self.name, target
                    ));
                }
            }
            for ins in &block.instructions {
                if let Some(result) = ins.get_result() {
                    match defined.get_mut(result as usize) {
                        Some(slot) => {
                            if *slot {
                                return Err(format!(
                                    "{}: %{} is defined twice",
                                    self.name, result
                                ));
                            }
                            *slot = true;
                        }
                        None => {
                            return Err(format!(
                                "{}: %{} is out of range ({} registers)",
                                self.name, result, self.vreg_count
                            ))
                        }
                    }
                }
            }
        }
        let reachable = ControlFlowGraph::construct(self).reachable();
        if let Some(label) = reachable.iter_zeros().next() {
            return Err(format!(
                "{}: block {} can not be reached from the entry block",
                self.name, label
            ));
        }
        // Uses are checked after all definitions are known, a loop may use a register defined in an earlier block
        for ins in self.instructions() {
            for reg in ins.get_used_vreg() {
                if !defined.get(reg as usize).copied().unwrap_or(false) {
                    return Err(format!("{}: %{} is used but never defined", self.name, reg));
                }
            }
        }
        Ok(())
    }
}

impl IRModule {
    pub fn function(&self, name: &str) -> Option<&IRFunction> {
        self.functions.iter().find(|function| function.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn function(blocks: Vec<IRBlock>, vreg_count: u32) -> IRFunction {
        IRFunction {
            name: "f".to_string(),
            return_size: IRSize::S32,
            arguments: Vec::new(),
            variables: Vec::new(),
            blocks,
            vreg_count,
        }
    }

    fn block(label: IRLabel, instructions: Vec<IRInstruction>) -> IRBlock {
        IRBlock {
            label,
            name: "block".to_string(),
            instructions,
        }
    }

    #[test]
    fn terminators() {
        use IRInstruction::*;
        assert!(Jmp(0).is_terminator());
        assert!(Jcc(IRSize::S32, 0, 1, 2).is_terminator());
        assert!(Ret(IRSize::V, None).is_terminator());
        assert!(!Imm(IRSize::S32, 0, 1).is_terminator());
        assert_eq!(Jcc(IRSize::S32, 0, 1, 2).successors().as_slice(), &[1, 2]);
        assert!(Ret(IRSize::S32, Some(0)).successors().is_empty());
    }

    #[test]
    fn used_registers() {
        use IRInstruction::*;
        let call = Call(
            IRSize::S32,
            Some(3),
            "add".to_string(),
            Box::new(IRArguments {
                sizes: vec![IRSize::S32, IRSize::S32],
                arguments: vec![1, 2],
            }),
        );
        assert_eq!(call.get_used_vreg().as_slice(), &[1, 2]);
        assert_eq!(call.get_result(), Some(3));
        assert_eq!(Store(IRSize::S32, 4, 5).get_result(), None);
        assert_eq!(Store(IRSize::S32, 4, 5).get_used_vreg().as_slice(), &[4, 5]);
    }

    #[test]
    fn verify_accepts_well_formed_function() {
        use IRInstruction::*;
        let f = function(
            vec![
                block(0, vec![Imm(IRSize::S32, 0, 1), Jcc(IRSize::S32, 0, 1, 1)]),
                block(1, vec![Ret(IRSize::S32, Some(0))]),
            ],
            1,
        );
        assert_eq!(f.verify(), Ok(()));
    }

    #[test]
    fn verify_rejects_malformed_functions() {
        use IRInstruction::*;
        let unterminated = function(vec![block(0, vec![Imm(IRSize::S32, 0, 1)])], 1);
        assert!(unterminated.verify().is_err());

        let middle = function(
            vec![block(0, vec![Ret(IRSize::V, None), Ret(IRSize::V, None)])],
            0,
        );
        assert!(middle.verify().is_err());

        let unknown_target = function(vec![block(0, vec![Jmp(4)])], 0);
        assert!(unknown_target.verify().is_err());

        let undefined = function(vec![block(0, vec![Ret(IRSize::S32, Some(0))])], 1);
        assert!(undefined.verify().is_err());

        let twice = function(
            vec![block(
                0,
                vec![
                    Imm(IRSize::S32, 0, 1),
                    Imm(IRSize::S32, 0, 2),
                    Ret(IRSize::S32, Some(0)),
                ],
            )],
            1,
        );
        assert!(twice.verify().is_err());

        let unreachable = function(
            vec![
                block(0, vec![Ret(IRSize::V, None)]),
                block(1, vec![Jmp(0)]),
            ],
            0,
        );
        assert_eq!(
            unreachable.verify(),
            Err("f: block 1 can not be reached from the entry block".to_string())
        );
    }
}
