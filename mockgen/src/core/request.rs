//! The immutable input of one reflection invocation.

/// Names the single interface type to reflect on.
///
/// Values are used as given. A bad import path or symbol surfaces later,
/// when the generated program fails to compile or run.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReflectRequest {
    import_path: String,
    symbol: String,
}

impl ReflectRequest {
    pub fn new(import_path: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            import_path: import_path.into(),
            symbol: symbol.into(),
        }
    }

    pub fn import_path(&self) -> &str {
        &self.import_path
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }
}
