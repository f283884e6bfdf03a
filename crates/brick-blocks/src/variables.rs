//! The variable-scope collaborator: named variables with a declared type.
//!
//! The change propagator retypes variables here when a class is renamed;
//! nothing else in the engine touches this store.

use brick_identity::VarId;
use rustc_hash::FxHashMap;

use crate::naming::NameMatcher;

#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub name: String,
    pub type_name: String,
}

#[derive(Debug, Default, Clone)]
pub struct VariableStore {
    vars: Vec<Variable>,
    by_name: FxHashMap<String, VarId>,
}

impl VariableStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare(&mut self, name: impl Into<String>, type_name: impl Into<String>) -> VarId {
        let id = VarId::new(self.vars.len() as u32);
        let name = name.into();
        self.vars.push(Variable {
            name: name.clone(),
            type_name: type_name.into(),
        });
        self.by_name.insert(name, id);
        id
    }

    pub fn get(&self, id: VarId) -> Option<&Variable> {
        self.vars.get(id.index() as usize)
    }

    pub fn by_name(&self, name: &str) -> Option<&Variable> {
        self.by_name.get(name).and_then(|id| self.get(*id))
    }

    pub fn iter(&self) -> impl Iterator<Item = (VarId, &Variable)> {
        self.vars
            .iter()
            .enumerate()
            .map(|(i, v)| (VarId::new(i as u32), v))
    }

    /// Retype every variable whose declared type is `old`. Returns how many
    /// variables were touched.
    pub fn rename_type(&mut self, old: &str, new: &str, matcher: &dyn NameMatcher) -> usize {
        let mut touched = 0;
        for var in &mut self.vars {
            if matcher.eq(&var.type_name, old) {
                var.type_name = new.to_string();
                touched += 1;
            }
        }
        if touched > 0 {
            tracing::debug!(old, new, touched, "retyped variables after class rename");
        }
        touched
    }
}
