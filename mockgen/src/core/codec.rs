//! CBOR codec for the package model exchanged with the reflection program.
//!
//! CBOR is self-describing, and [`Type`](crate::model::Type) is encoded
//! externally tagged, so every type node keeps its variant across the
//! process boundary.

use tracing::debug;

use crate::error::ReflectError;
use crate::model::Package;

/// Decode exactly one CBOR-encoded [`Package`] from captured stdout.
///
/// Empty input, malformed CBOR, a value that does not match the model, and
/// trailing bytes after the value are all decode failures.
pub fn decode(bytes: &[u8]) -> Result<Package, ReflectError> {
    if bytes.is_empty() {
        return Err(ReflectError::decode("empty output"));
    }

    let mut remaining = bytes;
    let pkg: Package = ciborium::de::from_reader(&mut remaining)
        .map_err(|e| ReflectError::decode(e.to_string()))?;
    if !remaining.is_empty() {
        return Err(ReflectError::decode(format!(
            "{} trailing bytes after package",
            remaining.len()
        )));
    }

    debug!(
        package = %pkg.name,
        interfaces = pkg.interfaces.len(),
        "decoded package model"
    );
    Ok(pkg)
}

/// Encode a [`Package`] the way the reflection program does.
pub fn encode(pkg: &Package) -> Result<Vec<u8>, ciborium::ser::Error<std::io::Error>> {
    let mut bytes = Vec::new();
    ciborium::ser::into_writer(pkg, &mut bytes)?;
    Ok(bytes)
}
