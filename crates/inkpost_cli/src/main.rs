//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `inkpost_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

fn main() {
    println!("inkpost_core ping={}", inkpost_core::ping());
    println!("inkpost_core version={}", inkpost_core::core_version());
    println!(
        "inkpost_core schema_latest={}",
        inkpost_core::db::migrations::latest_version()
    );
}
