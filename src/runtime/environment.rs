use crate::language::types::DeclaredType;
use crate::runtime::{
    error::{RuntimeError, RuntimeResult},
    value::Value,
};
use std::collections::{BTreeSet, HashMap};

pub const CONST_FLAG: &str = "const";
pub const LOOP_FLAG: &str = "loop";
pub const SYSTEM_FLAG: &str = "system";

/// Name of the reserved cell holding the most recent `?if` result (`$?`).
pub const CONDITION_CELL: &str = "?";

pub const AUX_UPPER: &str = "upper";
pub const AUX_LOOPBACK: &str = "loopback";

#[derive(Clone, Debug, PartialEq)]
pub struct Variable {
    pub name: String,
    pub ty: DeclaredType,
    pub flags: BTreeSet<String>,
    pub data: Option<Value>,
    pub auxiliary: HashMap<String, Value>,
}

impl Variable {
    fn new(name: &str, ty: DeclaredType) -> Self {
        Self {
            name: name.to_string(),
            ty,
            flags: BTreeSet::new(),
            data: None,
            auxiliary: HashMap::new(),
        }
    }

    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.contains(flag)
    }

    fn coerced(&self, value: &Value) -> RuntimeResult<Value> {
        value.coerce(self.ty).ok_or_else(|| RuntimeError::TypeMismatch {
            message: format!(
                "cannot store {} \"{}\" in {} variable \"{}\"",
                value.type_name(),
                value,
                self.ty,
                self.name
            ),
        })
    }

    fn aux_int(&self, key: &str) -> RuntimeResult<i64> {
        match self.auxiliary.get(key) {
            Some(Value::Int(value)) => Ok(*value),
            _ => Err(RuntimeError::NotALoop {
                name: self.name.clone(),
            }),
        }
    }
}

/// Flat, program-wide variable store. Variables live until the run ends.
#[derive(Clone, Debug)]
pub struct Environment {
    variables: HashMap<String, Variable>,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment {
    pub fn new() -> Self {
        let mut condition = Variable::new(CONDITION_CELL, DeclaredType::Boolean);
        condition.flags.insert(SYSTEM_FLAG.to_string());
        condition.data = Some(Value::Bool(false));
        let mut variables = HashMap::new();
        variables.insert(CONDITION_CELL.to_string(), condition);
        Self { variables }
    }

    pub fn get(&self, name: &str) -> Option<&Variable> {
        self.variables.get(name)
    }

    /// Current value of `name`.
    pub fn read(&self, name: &str) -> RuntimeResult<Value> {
        let variable = self
            .variables
            .get(name)
            .ok_or_else(|| RuntimeError::UnknownVariable {
                name: name.to_string(),
            })?;
        variable
            .data
            .clone()
            .ok_or_else(|| RuntimeError::UnresolvedValue {
                name: name.to_string(),
            })
    }

    /// Runs an assignment statement: creates the variable on first sight,
    /// appends `flags`, then defines its value.
    pub fn assign(
        &mut self,
        name: &str,
        ty: DeclaredType,
        flags: &[String],
        value: Value,
    ) -> RuntimeResult<()> {
        let variable = self
            .variables
            .entry(name.to_string())
            .or_insert_with(|| Variable::new(name, ty));
        if variable.ty != ty {
            return Err(RuntimeError::TypeMismatch {
                message: format!(
                    "variable \"{name}\" is declared as {}, not {ty}",
                    variable.ty
                ),
            });
        }
        let becomes_const =
            variable.has_flag(CONST_FLAG) || flags.iter().any(|flag| flag == CONST_FLAG);
        if becomes_const && variable.data.is_some() {
            return Err(RuntimeError::ConstantRedefinition {
                name: name.to_string(),
            });
        }
        let stored = variable.coerced(&value)?;
        variable.flags.extend(flags.iter().cloned());
        variable.data = Some(stored);
        Ok(())
    }

    /// Overwrites the reserved conditional cell.
    pub fn record_condition(&mut self, result: bool) {
        if let Some(cell) = self.variables.get_mut(CONDITION_CELL) {
            cell.data = Some(Value::Bool(result));
        }
    }

    /// Defines `name` as an integer loop counter starting at `lower`.
    pub fn open_loop(
        &mut self,
        name: &str,
        lower: i64,
        upper: i64,
        resume_line: usize,
    ) -> RuntimeResult<()> {
        let variable = self
            .variables
            .entry(name.to_string())
            .or_insert_with(|| Variable::new(name, DeclaredType::Integer));
        if variable.ty != DeclaredType::Integer {
            return Err(RuntimeError::TypeMismatch {
                message: format!(
                    "loop counter \"{name}\" must be integer, found {}",
                    variable.ty
                ),
            });
        }
        if variable.has_flag(CONST_FLAG) && variable.data.is_some() {
            return Err(RuntimeError::ConstantRedefinition {
                name: name.to_string(),
            });
        }
        variable.data = Some(Value::Int(lower));
        variable.flags.insert(LOOP_FLAG.to_string());
        variable
            .auxiliary
            .insert(AUX_UPPER.to_string(), Value::Int(upper));
        variable.auxiliary.insert(
            AUX_LOOPBACK.to_string(),
            Value::Int(resume_line as i64),
        );
        Ok(())
    }

    /// Advances the loop counter when it is still below its upper bound and
    /// returns the line the loop body resumes at. `None` means the loop is done.
    pub fn loop_back(&mut self, name: &str) -> RuntimeResult<Option<usize>> {
        let variable = self
            .variables
            .get_mut(name)
            .ok_or_else(|| RuntimeError::UnknownVariable {
                name: name.to_string(),
            })?;
        if !variable.has_flag(LOOP_FLAG) {
            return Err(RuntimeError::NotALoop {
                name: name.to_string(),
            });
        }
        let upper = variable.aux_int(AUX_UPPER)?;
        let resume = variable.aux_int(AUX_LOOPBACK)?;
        let current = match variable.data {
            Some(Value::Int(current)) => current,
            _ => {
                return Err(RuntimeError::UnresolvedValue {
                    name: name.to_string(),
                });
            }
        };
        if current < upper {
            variable.data = Some(Value::Int(current + 1));
            Ok(usize::try_from(resume).ok())
        } else {
            Ok(None)
        }
    }
}
