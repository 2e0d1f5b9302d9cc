//! Reflect on a Go interface and print its package model.
//!
//! Builds and runs a throwaway program with the Go toolchain; the target
//! package's source is never parsed.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use mockgen::core::codec;
use mockgen::exit_codes;
use mockgen::io::config::load_config;
use mockgen::model::Package;
use mockgen::{ReflectError, ReflectRequest, Reflector, logging};

#[derive(Parser)]
#[command(
    name = "mockgen",
    version,
    about = "Describe Go interfaces by reflection"
)]
struct Cli {
    /// Path to a TOML config file. Defaults apply when it does not exist.
    #[arg(long, global = true, default_value = "mockgen.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Reflect on SYMBOL in IMPORT_PATH and print the package model.
    Reflect {
        /// Import path of the package declaring the interface.
        import_path: String,
        /// Name of the interface type.
        symbol: String,
        /// Output format.
        #[arg(short, long, value_enum, default_value_t = Format::Summary)]
        format: Format,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Go-like method signatures.
    Summary,
    /// Pretty-printed JSON.
    Json,
    /// Raw CBOR, as produced by the reflection program.
    Cbor,
}

fn main() {
    logging::init();
    if let Err(err) = run() {
        eprintln!("{:#}", err);
        let code = err
            .downcast_ref::<ReflectError>()
            .map_or(exit_codes::INVALID, |e| exit_codes::for_kind(e.kind()));
        std::process::exit(code);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Reflect {
            import_path,
            symbol,
            format,
        } => cmd_reflect(&cli.config, ReflectRequest::new(import_path, symbol), format),
    }
}

fn cmd_reflect(config_path: &Path, request: ReflectRequest, format: Format) -> Result<()> {
    let config = load_config(config_path)?;
    let pkg = Reflector::new(&config)?.reflect(&request)?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    write_package(&mut out, &pkg, format).context("write output")?;
    out.flush().context("flush output")?;
    Ok(())
}

fn write_package(out: &mut impl Write, pkg: &Package, format: Format) -> Result<()> {
    match format {
        Format::Summary => out.write_all(render_summary(pkg).as_bytes())?,
        Format::Json => {
            let mut payload = serde_json::to_string_pretty(pkg).context("serialize json")?;
            payload.push('\n');
            out.write_all(payload.as_bytes())?;
        }
        Format::Cbor => {
            let bytes = codec::encode(pkg).context("serialize cbor")?;
            out.write_all(&bytes)?;
        }
    }
    Ok(())
}

/// Render each interface as a Go interface declaration.
fn render_summary(pkg: &Package) -> String {
    let mut lines = vec![format!("package {}", pkg.name)];
    for iface in &pkg.interfaces {
        lines.push(String::new());
        lines.push(format!("type {} interface {{", iface.name));
        for method in &iface.methods {
            lines.push(format!("\t{method}"));
        }
        lines.push("}".to_string());
    }
    lines.push(String::new());
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockgen::test_support::fetcher_package;

    #[test]
    fn parse_reflect_defaults_to_summary() {
        let cli = Cli::parse_from(["mockgen", "reflect", "example.com/widget", "Fetcher"]);
        let Command::Reflect {
            import_path,
            symbol,
            format,
        } = cli.command;
        assert_eq!(import_path, "example.com/widget");
        assert_eq!(symbol, "Fetcher");
        assert_eq!(format, Format::Summary);
        assert_eq!(cli.config, PathBuf::from("mockgen.toml"));
    }

    #[test]
    fn parse_reflect_json_with_config() {
        let cli = Cli::parse_from([
            "mockgen",
            "reflect",
            "--format",
            "json",
            "--config",
            "ci.toml",
            "example.com/widget",
            "Fetcher",
        ]);
        assert!(matches!(
            cli.command,
            Command::Reflect {
                format: Format::Json,
                ..
            }
        ));
        assert_eq!(cli.config, PathBuf::from("ci.toml"));
    }

    #[test]
    fn summary_renders_interface_declaration() {
        let summary = render_summary(&fetcher_package());
        assert_eq!(
            summary,
            "package widget\n\ntype Fetcher interface {\n\tGet(string) (*example.com/widget.Item, error)\n}\n"
        );
    }

    #[test]
    fn cbor_output_decodes_back() {
        let mut buf = Vec::new();
        write_package(&mut buf, &fetcher_package(), Format::Cbor).expect("write");
        assert_eq!(codec::decode(&buf).expect("decode"), fetcher_package());
    }

    #[test]
    fn json_output_keeps_variant_tags() {
        let mut buf = Vec::new();
        write_package(&mut buf, &fetcher_package(), Format::Json).expect("write");
        let json: serde_json::Value = serde_json::from_slice(&buf).expect("json");
        let result = &json["interfaces"][0]["methods"][0]["results"][0]["type"];
        assert_eq!(
            result["pointer"]["named"]["name"],
            serde_json::Value::from("Item")
        );
    }
}
