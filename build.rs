//! Build script for infuzu-rs.
//!
//! Captures toolchain and HTTP-client versions for the User-Agent string.

use std::process::Command;

fn main() {
    let rust_version = get_rust_version().unwrap_or_else(|| "unknown".to_string());
    println!("cargo:rustc-env=INFUZU_RUSTC_VERSION={}", rust_version);

    let reqwest_version = get_locked_version("reqwest").unwrap_or_else(|| "unknown".to_string());
    println!("cargo:rustc-env=INFUZU_REQWEST_VERSION={}", reqwest_version);

    println!("cargo:rerun-if-changed=Cargo.toml");
    println!("cargo:rerun-if-changed=Cargo.lock");
}

/// Get the Rust compiler version, e.g. "1.79.0".
fn get_rust_version() -> Option<String> {
    let output = Command::new("rustc").args(["--version"]).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let version_string = String::from_utf8(output.stdout).ok()?;
    // "rustc 1.79.0 (129f3b996 2024-06-10)" -> "1.79.0"
    version_string
        .split_whitespace()
        .nth(1)
        .map(|v| v.to_string())
}

/// Get the resolved version of a dependency from Cargo.lock.
fn get_locked_version(name: &str) -> Option<String> {
    let lockfile = std::fs::read_to_string("Cargo.lock").ok()?;
    let needle = format!("name = \"{}\"", name);
    let mut lines = lockfile.lines();
    while let Some(line) = lines.next() {
        if line.trim() == needle {
            let version_line = lines.next()?.trim().to_string();
            return version_line
                .strip_prefix("version = \"")
                .and_then(|rest| rest.strip_suffix('"'))
                .map(|v| v.to_string());
        }
    }
    None
}
