//! Registry of the custom build targets this distribution publishes.
//!
//! Each target pairs a short operator-facing name with the rustc target
//! triple used in manifests and artifact filenames, plus the toolchain
//! details a cross build needs. The registry is the single source of truth;
//! other modules look targets up here rather than hard-coding triples.

use std::fmt;

/// A custom build target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Target {
    /// Short name used on the command line (e.g. `x86_64-win7`).
    pub name: &'static str,

    /// Rustc target triple (e.g. `x86_64-win7-windows-msvc`).
    pub rust_target: &'static str,

    /// Clang target triple used by the compiler wrapper.
    pub clang_target: &'static str,

    /// Windows SDK architecture for toolchain wrapper naming, if this is a
    /// Windows cross target.
    pub sdk_arch: Option<&'static str>,
}

/// 64-bit Windows 7 target.
pub const WIN7_X86_64: Target = Target {
    name: "x86_64-win7",
    rust_target: "x86_64-win7-windows-msvc",
    clang_target: "x86_64-pc-windows-msvc",
    sdk_arch: Some("x86_64"),
};

/// 32-bit Windows 7 target.
pub const WIN7_I686: Target = Target {
    name: "i686-win7",
    rust_target: "i686-win7-windows-msvc",
    clang_target: "i686-pc-windows-msvc",
    sdk_arch: Some("x86"),
};

/// All known targets, in publication order.
const ALL_TARGETS: &[Target] = &[WIN7_X86_64, WIN7_I686];

impl Target {
    /// All known custom targets.
    pub fn all() -> &'static [Target] {
        ALL_TARGETS
    }

    /// Look up a target by its short name.
    ///
    /// Returns `None` for unknown names; callers report the error with
    /// [`Target::known_names`] so the operator sees what is accepted.
    pub fn from_name(name: &str) -> Option<&'static Target> {
        ALL_TARGETS.iter().find(|t| t.name == name)
    }

    /// Short names of every known target.
    pub fn known_names() -> Vec<&'static str> {
        ALL_TARGETS.iter().map(|t| t.name).collect()
    }

    /// Whether this target cross-compiles against the Windows SDK.
    pub fn is_windows(&self) -> bool {
        self.sdk_arch.is_some()
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
