//! Build script stamping the parking-system binary with its git revision
//!
//! Exposes `GIT_HASH` (short hash, or "unknown" outside a checkout) to
//! `env!` so the startup log names the build.

use std::process::Command;

fn main() {
    let output = Command::new("git").args(["rev-parse", "--short", "HEAD"]).output();

    let git_hash = match output {
        Ok(output) if output.status.success() => {
            String::from_utf8_lossy(&output.stdout).trim().to_string()
        }
        _ => String::from("unknown"),
    };

    println!("cargo:rustc-env=GIT_HASH={}", git_hash);

    // Branch switches and new commits both move HEAD
    println!("cargo:rerun-if-changed=.git/HEAD");
}
