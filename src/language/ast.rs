use crate::language::types::DeclaredType;

/// Module used when a call omits its module prefix.
pub const DEFAULT_MODULE: &str = "program";

/// One parsed source line.
#[derive(Clone, Debug, PartialEq)]
pub enum Statement {
    FunctionCall(CallSite),
    Assignment(Assignment),
    NumericLoopOpen {
        name: String,
        lower: String,
        upper: String,
    },
    Loopback {
        name: String,
    },
    ConditionalOpen {
        name: String,
        condition: String,
    },
    NoOp,
}

/// `![module] name: (arg1), (arg2),`
///
/// Arguments are kept as raw tokens with their enclosing parentheses removed;
/// conversion to values happens at dispatch time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallSite {
    pub module: String,
    pub name: String,
    pub args: Vec<String>,
}

impl CallSite {
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.module, self.name)
    }
}

/// `$name type[flag1/flag2] = value`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Assignment {
    pub name: String,
    pub ty: DeclaredType,
    pub flags: Vec<String>,
    pub value: String,
}
