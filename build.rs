use std::env;
use std::process::Command;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=.git/HEAD");

    let commit = match git(&["rev-parse", "--short", "HEAD"]) {
        Some(hash) if git(&["status", "--porcelain"]).is_some_and(|s| !s.is_empty()) => {
            format!("{hash}-dirty")
        }
        Some(hash) => hash,
        None => "unknown".to_string(),
    };
    let rustc = env::var("RUSTC").unwrap_or_else(|_| "rustc".to_string());

    let vars = [
        ("COMMIT", commit),
        (
            "BUILT_AT",
            chrono::Utc::now().format("%Y-%m-%d %H:%M UTC").to_string(),
        ),
        ("TARGET", env::var("TARGET").unwrap_or_default()),
        ("RUSTC", stdout_of(&rustc, &["--version"]).unwrap_or_default()),
    ];
    for (name, value) in vars {
        println!("cargo:rustc-env=FLOWCAST_{name}={value}");
    }
}

fn git(args: &[&str]) -> Option<String> {
    stdout_of("git", args)
}

/// Trimmed stdout of a successful run, `None` if it could not start or failed.
fn stdout_of(program: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(program).args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8(output.stdout)
        .ok()
        .map(|text| text.trim().to_string())
}
