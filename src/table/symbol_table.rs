use super::r#type::{FunctionSignature, Type};
use std::collections::HashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeclarationType {
    Declaration,
    Definition,
}

/// A local variable. The number is the stack slot of the variable.
#[derive(Clone, Debug, PartialEq)]
pub struct Symbol {
    pub number: usize,
    pub symbol_type: Type,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FunctionSymbol {
    pub signature: FunctionSignature,
    pub declaration_type: DeclarationType,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FunctionConflict {
    Signature,
    Redefinition,
}

// Functions live in the global table, variables in the stack of local scopes
// Lookups of variables search from the innermost scope outwards
#[derive(Clone, Debug, Default)]
pub struct SymbolTable {
    local_table: Vec<HashMap<String, Symbol>>,
    pub global_table: HashMap<String, FunctionSymbol>,
}

impl SymbolTable {
    pub fn new() -> SymbolTable {
        SymbolTable {
            local_table: Vec::new(),
            global_table: HashMap::new(),
        }
    }

    pub fn enter_scope(&mut self) {
        self.local_table.push(HashMap::new());
    }

    pub fn leave_scope(&mut self) {
        self.local_table.pop();
    }

    // Inserts the variable into the innermost scope
    // Fails if the name is already declared in that same scope
    pub fn try_insert(&mut self, key: &str, symbol: Symbol) -> Result<(), ()> {
        let map = match self.local_table.last_mut() {
            Some(map) => map,
            None => {
                log::error!("Variable {} inserted without a local scope", key);
                return Err(());
            }
        };
        if map.contains_key(key) {
            return Err(());
        }
        log::trace!("Local insertion of {} with type {}", key, symbol.symbol_type);
        map.insert(key.to_string(), symbol);
        Ok(())
    }

    pub fn get<'a>(&'a self, key: &str) -> Option<&'a Symbol> {
        for map in self.local_table.iter().rev() {
            let result = map.get(key);
            if result.is_some() {
                return result;
            }
        }
        None
    }

    // Registers a function signature
    // A declaration may be repeated and followed by one definition, as long as the types agree
    pub fn try_insert_function(
        &mut self,
        signature: FunctionSignature,
        declaration_type: DeclarationType,
    ) -> Result<(), FunctionConflict> {
        if let Some(existing) = self.global_table.get_mut(&signature.name) {
            if !existing.signature.same_types(&signature) {
                return Err(FunctionConflict::Signature);
            }
            if existing.declaration_type == DeclarationType::Definition
                && declaration_type == DeclarationType::Definition
            {
                return Err(FunctionConflict::Redefinition);
            }
            if declaration_type == DeclarationType::Definition {
                existing.declaration_type = DeclarationType::Definition;
                existing.signature = signature;
            }
            return Ok(());
        }
        log::trace!("Global insertion of {}", signature);
        self.global_table.insert(
            signature.name.clone(),
            FunctionSymbol {
                signature,
                declaration_type,
            },
        );
        Ok(())
    }

    pub fn get_function<'a>(&'a self, key: &str) -> Option<&'a FunctionSymbol> {
        self.global_table.get(key)
    }

    // Hides all local scopes, used while a function is generated in the middle of another one
    pub fn suspend_locals(&mut self) -> Vec<HashMap<String, Symbol>> {
        std::mem::take(&mut self.local_table)
    }

    pub fn resume_locals(&mut self, locals: Vec<HashMap<String, Symbol>>) {
        self.local_table = locals;
    }
}
