//! Synthesizes the throwaway Go program that performs the reflection.

use std::fmt::Write as _;
use std::sync::LazyLock;

use minijinja::{Environment, context};
use tracing::debug;

use crate::core::request::ReflectRequest;
use crate::error::ReflectError;

/// File name the program is written under inside the workspace.
pub const PROGRAM_FILE: &str = "prog.go";

const PROGRAM_TEMPLATE: &str = include_str!("templates/reflect_program.go");

static ENGINE: LazyLock<Environment<'static>> = LazyLock::new(|| {
    let mut env = Environment::new();
    env.add_filter("go_quote", go_quote);
    env.add_template("reflect_program", PROGRAM_TEMPLATE)
        .expect("reflect program template should be valid");
    env
});

/// Render the reflection program for `request`.
///
/// The program imports `model_import_path` and calls its
/// `PackageFromInterfaceType` and `EncodeCBOR` functions.
pub fn render_program(
    request: &ReflectRequest,
    model_import_path: &str,
) -> Result<String, ReflectError> {
    let template = ENGINE
        .get_template("reflect_program")
        .map_err(ReflectError::Synthesis)?;
    let source = template
        .render(context! {
            import_path => request.import_path(),
            symbol => request.symbol(),
            model_import_path => model_import_path,
        })
        .map_err(ReflectError::Synthesis)?;
    debug!(bytes = source.len(), "rendered reflection program");
    Ok(source)
}

/// Quote `value` as a Go interpreted string literal.
fn go_quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(out, "\\u{:04x}", u32::from(c));
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const MODEL: &str = "example.org/mockgen/model";

    fn fetcher() -> ReflectRequest {
        ReflectRequest::new("example.com/widget", "Fetcher")
    }

    #[test]
    fn program_imports_target_and_model_packages() {
        let source = render_program(&fetcher(), MODEL).expect("render");
        assert!(source.starts_with("// Code generated by mockgen. DO NOT EDIT."));
        assert!(source.contains("package main"));
        assert!(source.contains("pkg_ \"example.com/widget\""));
        assert!(source.contains("model \"example.org/mockgen/model\""));
    }

    #[test]
    fn program_reflects_on_the_symbol() {
        let source = render_program(&fetcher(), MODEL).expect("render");
        assert!(source.contains("reflect.TypeOf((*pkg_.Fetcher)(nil)).Elem()"));
        assert!(source.contains("model.PackageFromInterfaceType(it)"));
        assert!(source.contains("model.EncodeCBOR(os.Stdout, pkg)"));
    }

    #[test]
    fn reflection_and_encode_failures_exit_with_distinct_codes() {
        let source = render_program(&fetcher(), MODEL).expect("render");
        let reflection = source.find("Reflection: %v").expect("reflection diagnostic");
        let encode = source.find("cbor encode: %v").expect("encode diagnostic");
        assert!(reflection < encode);
        assert!(source.contains("os.Exit(1)"));
        assert!(source.contains("os.Exit(2)"));
    }

    #[test]
    fn model_import_path_is_configurable() {
        let source = render_program(&fetcher(), "example.org/fork/model").expect("render");
        assert!(source.contains("model \"example.org/fork/model\""));
    }

    #[test]
    fn rendering_is_deterministic() {
        let first = render_program(&fetcher(), MODEL).expect("render");
        let second = render_program(&fetcher(), MODEL).expect("render");
        assert_eq!(first, second);
    }

    #[test]
    fn go_quote_escapes_literal_breakers() {
        assert_eq!(go_quote("example.com/widget"), "\"example.com/widget\"");
        assert_eq!(go_quote("a\"b\\c"), "\"a\\\"b\\\\c\"");
        assert_eq!(go_quote("line\nbreak"), "\"line\\nbreak\"");
        assert_eq!(go_quote("\u{7}"), "\"\\u0007\"");
    }
}
