//! Package model produced by reflecting on an interface type.
//!
//! The generated reflection program builds this model on the Go side and
//! streams it back as CBOR. [`Type`] is a closed sum type: each node is
//! encoded externally tagged (`{"pointer": {...}}`), so the decoder always
//! recovers the exact variant the producer wrote.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A package-level description holding the reflected interfaces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    pub name: String,
    #[serde(default)]
    pub interfaces: Vec<Interface>,
}

impl Package {
    /// Look up an interface by name.
    pub fn interface(&self, name: &str) -> Option<&Interface> {
        self.interfaces.iter().find(|iface| iface.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interface {
    pub name: String,
    /// Methods in the order reflection reported them.
    #[serde(default)]
    pub methods: Vec<Method>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Method {
    pub name: String,
    #[serde(default)]
    pub params: Vec<Parameter>,
    #[serde(default)]
    pub results: Vec<Parameter>,
    /// Trailing `...T` parameter, if any. Its type is the element type `T`.
    #[serde(default)]
    pub variadic: Option<Parameter>,
}

impl Method {
    /// Number of declared parameters, counting a variadic one.
    pub fn arity(&self) -> usize {
        self.params.len() + usize::from(self.variadic.is_some())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    /// Empty when reflection has no name for the parameter.
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub ty: Type,
}

impl Parameter {
    pub fn unnamed(ty: Type) -> Self {
        Self {
            name: String::new(),
            ty,
        }
    }
}

/// Direction of a channel type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChanDir {
    Both,
    Recv,
    Send,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuncType {
    #[serde(default)]
    pub params: Vec<Parameter>,
    #[serde(default)]
    pub results: Vec<Parameter>,
    #[serde(default)]
    pub variadic: Option<Box<Parameter>>,
}

/// A reflected Go type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Type {
    /// A declared type. `package` is the full import path, empty for
    /// universe-scope names such as `error`.
    Named { package: String, name: String },
    Pointer(Box<Type>),
    /// Fixed-length array, or a slice when `len` is `None`.
    Array { len: Option<u64>, elem: Box<Type> },
    Map { key: Box<Type>, value: Box<Type> },
    Chan { dir: ChanDir, elem: Box<Type> },
    Func(FuncType),
    /// Builtin type such as `string`, `int64` or `bool`.
    Predeclared(String),
}

impl Type {
    pub fn named(package: impl Into<String>, name: impl Into<String>) -> Self {
        Self::Named {
            package: package.into(),
            name: name.into(),
        }
    }

    pub fn predeclared(name: impl Into<String>) -> Self {
        Self::Predeclared(name.into())
    }

    pub fn pointer(elem: Type) -> Self {
        Self::Pointer(Box::new(elem))
    }

    pub fn slice(elem: Type) -> Self {
        Self::Array {
            len: None,
            elem: Box::new(elem),
        }
    }

    /// Short variant name, handy in logs and assertions.
    pub fn variant(&self) -> &'static str {
        match self {
            Self::Named { .. } => "named",
            Self::Pointer(_) => "pointer",
            Self::Array { .. } => "array",
            Self::Map { .. } => "map",
            Self::Chan { .. } => "chan",
            Self::Func(_) => "func",
            Self::Predeclared(_) => "predeclared",
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named { package, name } if package.is_empty() => f.write_str(name),
            Self::Named { package, name } => write!(f, "{package}.{name}"),
            Self::Pointer(elem) => write!(f, "*{elem}"),
            Self::Array { len: Some(len), elem } => write!(f, "[{len}]{elem}"),
            Self::Array { len: None, elem } => write!(f, "[]{elem}"),
            Self::Map { key, value } => write!(f, "map[{key}]{value}"),
            Self::Chan { dir, elem } => match dir {
                ChanDir::Both => write!(f, "chan {elem}"),
                ChanDir::Recv => write!(f, "<-chan {elem}"),
                ChanDir::Send => write!(f, "chan<- {elem}"),
            },
            Self::Func(func) => {
                f.write_str("func")?;
                write_signature(f, &func.params, func.variadic.as_deref(), &func.results)
            }
            Self::Predeclared(name) => f.write_str(name),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        write_signature(f, &self.params, self.variadic.as_ref(), &self.results)
    }
}

fn write_signature(
    f: &mut fmt::Formatter<'_>,
    params: &[Parameter],
    variadic: Option<&Parameter>,
    results: &[Parameter],
) -> fmt::Result {
    let mut rendered: Vec<String> = params.iter().map(|p| p.ty.to_string()).collect();
    if let Some(v) = variadic {
        rendered.push(format!("...{}", v.ty));
    }
    write!(f, "({})", rendered.join(", "))?;

    match results {
        [] => Ok(()),
        [single] if !matches!(single.ty, Type::Func(_)) => write!(f, " {}", single.ty),
        many => {
            let rendered: Vec<String> = many.iter().map(|p| p.ty.to_string()).collect();
            write!(f, " ({})", rendered.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_go_type_syntax() {
        let cases = [
            (Type::predeclared("string"), "string"),
            (Type::named("", "error"), "error"),
            (
                Type::pointer(Type::named("example.com/widget", "Item")),
                "*example.com/widget.Item",
            ),
            (Type::slice(Type::predeclared("byte")), "[]byte"),
            (
                Type::Array {
                    len: Some(4),
                    elem: Box::new(Type::predeclared("int")),
                },
                "[4]int",
            ),
            (
                Type::Map {
                    key: Box::new(Type::predeclared("string")),
                    value: Box::new(Type::predeclared("int")),
                },
                "map[string]int",
            ),
            (
                Type::Chan {
                    dir: ChanDir::Recv,
                    elem: Box::new(Type::named("", "error")),
                },
                "<-chan error",
            ),
            (
                Type::Func(FuncType {
                    params: vec![Parameter::unnamed(Type::predeclared("int"))],
                    results: vec![Parameter::unnamed(Type::named("", "error"))],
                    variadic: None,
                }),
                "func(int) error",
            ),
        ];

        for (ty, expected) in cases {
            assert_eq!(ty.to_string(), expected, "variant {}", ty.variant());
        }
    }

    #[test]
    fn method_display_includes_variadic_and_result_list() {
        let method = Method {
            name: "Log".to_string(),
            params: vec![Parameter::unnamed(Type::predeclared("string"))],
            results: vec![
                Parameter::unnamed(Type::predeclared("int")),
                Parameter::unnamed(Type::named("", "error")),
            ],
            variadic: Some(Parameter::unnamed(Type::named("", "any"))),
        };
        assert_eq!(method.to_string(), "Log(string, ...any) (int, error)");
        assert_eq!(method.arity(), 2);
    }

    #[test]
    fn interface_lookup_by_name() {
        let pkg = Package {
            name: "widget".to_string(),
            interfaces: vec![Interface {
                name: "Fetcher".to_string(),
                methods: Vec::new(),
            }],
        };
        assert!(pkg.interface("Fetcher").is_some());
        assert!(pkg.interface("Missing").is_none());
    }
}
