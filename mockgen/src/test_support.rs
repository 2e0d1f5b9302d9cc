//! Test-only helpers: sample models and scripted stand-ins for `go run`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing_subscriber::fmt::MakeWriter;

use crate::core::codec;
use crate::io::config::ReflectConfig;
use crate::io::toolchain::Toolchain;
use crate::model::{ChanDir, FuncType, Interface, Method, Package, Parameter, Type};

/// Model package named in test configs; scripted toolchains never build it.
pub const TEST_MODEL_IMPORT_PATH: &str = "example.org/mockgen/model";

/// A valid config creating workspaces under `temp_root`.
pub fn test_config(temp_root: &Path) -> ReflectConfig {
    ReflectConfig {
        model_import_path: Some(TEST_MODEL_IMPORT_PATH.to_string()),
        temp_root: Some(temp_root.to_path_buf()),
        ..ReflectConfig::default()
    }
}

/// `example.com/widget` with `Fetcher { Get(id string) (*Item, error) }`.
pub fn fetcher_package() -> Package {
    Package {
        name: "widget".to_string(),
        interfaces: vec![Interface {
            name: "Fetcher".to_string(),
            methods: vec![Method {
                name: "Get".to_string(),
                params: vec![Parameter {
                    name: "id".to_string(),
                    ty: Type::predeclared("string"),
                }],
                results: vec![
                    Parameter::unnamed(Type::pointer(Type::named("example.com/widget", "Item"))),
                    Parameter::unnamed(Type::named("", "error")),
                ],
                variadic: None,
            }],
        }],
    }
}

/// A package whose single method takes one parameter of every type variant,
/// in the order named, pointer, array, map, chan, func, predeclared.
pub fn every_variant_package() -> Package {
    let params = vec![
        Type::named("example.com/widget", "Item"),
        Type::pointer(Type::named("example.com/widget", "Item")),
        Type::slice(Type::predeclared("byte")),
        Type::Map {
            key: Box::new(Type::predeclared("string")),
            value: Box::new(Type::Array {
                len: Some(3),
                elem: Box::new(Type::predeclared("int")),
            }),
        },
        Type::Chan {
            dir: ChanDir::Send,
            elem: Box::new(Type::named("", "error")),
        },
        Type::Func(FuncType {
            params: vec![Parameter::unnamed(Type::predeclared("int"))],
            results: vec![Parameter::unnamed(Type::named("", "error"))],
            variadic: Some(Box::new(Parameter::unnamed(Type::predeclared("string")))),
        }),
        Type::predeclared("uint64"),
    ];

    Package {
        name: "widget".to_string(),
        interfaces: vec![Interface {
            name: "Everything".to_string(),
            methods: vec![Method {
                name: "Take".to_string(),
                params: params
                    .into_iter()
                    .enumerate()
                    .map(|(i, ty)| Parameter {
                        name: format!("p{i}"),
                        ty,
                    })
                    .collect(),
                results: Vec::new(),
                variadic: Some(Parameter::unnamed(Type::named("", "any"))),
            }],
        }],
    }
}

/// A toolchain that runs `script` with `sh -c`; `$1` is the program file.
pub fn shell_toolchain(script: &str) -> Toolchain {
    Toolchain {
        command: vec![
            "sh".to_string(),
            "-c".to_string(),
            script.to_string(),
            "sh".to_string(),
        ],
        timeout: None,
    }
}

/// A toolchain standing in for a package that declares only `symbol`.
///
/// Programs reflecting on `symbol` print `bytes`; any other symbol fails
/// with a reflection diagnostic and exit status 1.
pub fn fixture_toolchain(dir: &Path, symbol: &str, bytes: &[u8]) -> Toolchain {
    let fixture = dir.join("fixture.cbor");
    fs::write(&fixture, bytes).expect("write fixture");
    shell_toolchain(&format!(
        "grep -q 'pkg_.{symbol})' \"$1\" || {{ echo 'Reflection: missing symbol' >&2; exit 1; }}; cat '{}'",
        fixture.display()
    ))
}

/// A toolchain that serves `pkg` as the reflection output.
pub fn model_toolchain(dir: &Path, symbol: &str, pkg: &Package) -> Toolchain {
    let bytes = codec::encode(pkg).expect("encode fixture");
    fixture_toolchain(dir, symbol, &bytes)
}

/// Wrap `inner` so it first appends its working directory to `record`.
pub fn recording(record: &Path, inner: &Toolchain) -> Toolchain {
    let script = inner.command.get(2).cloned().unwrap_or_default();
    shell_toolchain(&format!("pwd >> '{}'; {script}", record.display()))
}

/// Working directories recorded by [`recording`] toolchains.
pub fn recorded_dirs(record: &Path) -> Vec<PathBuf> {
    fs::read_to_string(record)
        .unwrap_or_default()
        .lines()
        .map(PathBuf::from)
        .collect()
}

/// In-memory sink for formatted tracing output.
#[derive(Debug, Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    pub fn contents(&self) -> String {
        let buf = self.0.lock().expect("log capture lock");
        String::from_utf8_lossy(&buf).into_owned()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.0.lock().expect("log capture lock").extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = LogCapture;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
