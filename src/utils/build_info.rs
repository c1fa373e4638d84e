/// Compile-time build metadata produced by `build.rs`.
#[derive(Debug, Clone, Copy)]
pub struct BuildMetadata {
    pub version: &'static str,
    /// Short commit hash, suffixed `-dirty` for uncommitted changes.
    pub commit: &'static str,
    pub built_at: &'static str,
    pub target: &'static str,
    pub rustc: &'static str,
}

/// CLI semantic version derived from the crate metadata.
pub const CLI_VERSION: &str = env!("CARGO_PKG_VERSION");

fn or_unknown(value: Option<&'static str>) -> &'static str {
    value.filter(|v| !v.is_empty()).unwrap_or("unknown")
}

/// Returns the statically-embedded build metadata.
pub fn current() -> BuildMetadata {
    BuildMetadata {
        version: CLI_VERSION,
        commit: or_unknown(option_env!("FLOWCAST_COMMIT")),
        built_at: or_unknown(option_env!("FLOWCAST_BUILT_AT")),
        target: or_unknown(option_env!("FLOWCAST_TARGET")),
        rustc: or_unknown(option_env!("FLOWCAST_RUSTC")),
    }
}

impl BuildMetadata {
    /// `(label, value)` pairs in display order.
    pub fn rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Version", self.version.to_string()),
            ("Commit", self.commit.to_string()),
            ("Built at", self.built_at.to_string()),
            ("Target", self.target.to_string()),
            ("Rustc", self.rustc.to_string()),
        ]
    }
}
