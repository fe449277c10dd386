use std::fmt;

/// The type a variable is pinned to when it is first assigned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeclaredType {
    String,
    Integer,
    Decimal,
    Boolean,
}

impl DeclaredType {
    pub const NAMES: [&'static str; 4] = ["string", "integer", "decimal", "boolean"];

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "string" => Some(DeclaredType::String),
            "integer" => Some(DeclaredType::Integer),
            "decimal" => Some(DeclaredType::Decimal),
            "boolean" => Some(DeclaredType::Boolean),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DeclaredType::String => "string",
            DeclaredType::Integer => "integer",
            DeclaredType::Decimal => "decimal",
            DeclaredType::Boolean => "boolean",
        }
    }
}

impl fmt::Display for DeclaredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_resolve_to_their_types() {
        for name in DeclaredType::NAMES {
            let ty = DeclaredType::from_name(name).expect("known type");
            assert_eq!(ty.name(), name);
        }
        assert_eq!(DeclaredType::from_name("int"), None);
        assert_eq!(DeclaredType::from_name("Integer"), None);
    }
}
