//! Build environment for the external build driver.
//!
//! The cross build needs per-target compiler and archiver wrappers plus
//! linker flags. Rather than mutating the process environment, everything
//! is computed once into an immutable [`BuildEnv`] value and handed to the
//! driver by parameter; the driver decides how to apply it to whatever
//! process it spawns.
//!
//! The build itself is an external collaborator: [`BuildDriver`] is the
//! seam, implemented outside this crate (tests use recording stubs).

use std::path::{Path, PathBuf};

use crate::publish::PublishResult;
use crate::target::Target;

/// Immutable build configuration for one target.
///
/// Windows cross targets get `CC_<triple>` and `AR_<triple>` pointing at
/// the SDK's wrapper scripts plus the rpath linker flag for the build
/// tree's bundled libraries; native targets need no extra variables.
#[derive(Debug, Clone)]
pub struct BuildEnv {
    rust_repo: PathBuf,
    sdk_dir: PathBuf,
    vars: Vec<(String, String)>,
}

impl BuildEnv {
    /// Compute the build environment for a target.
    ///
    /// # Arguments
    ///
    /// * `rust_repo` - Checkout of the upstream project being built
    /// * `sdk_dir` - Directory holding the SDK and its wrapper scripts
    /// * `target` - Target being built
    pub fn for_target(rust_repo: &Path, sdk_dir: &Path, target: &Target) -> Self {
        let mut vars = Vec::new();

        if let Some(arch) = target.sdk_arch {
            let triple_key = target.rust_target.replace('-', "_");
            vars.push((
                format!("CC_{}", triple_key),
                sdk_dir.join(format!("clang-cl-{}", arch)).display().to_string(),
            ));
            vars.push((format!("AR_{}", triple_key), "llvm-lib".to_string()));
            vars.push((
                "RUSTFLAGS".to_string(),
                format!(
                    "-Clink-args=-Wl,-rpath,{}/build/.nix-deps/lib",
                    rust_repo.display()
                ),
            ));
        }

        Self {
            rust_repo: rust_repo.to_path_buf(),
            sdk_dir: sdk_dir.to_path_buf(),
            vars,
        }
    }

    /// Checkout of the upstream project.
    pub fn rust_repo(&self) -> &Path {
        &self.rust_repo
    }

    /// SDK directory.
    pub fn sdk_dir(&self) -> &Path {
        &self.sdk_dir
    }

    /// Environment variables the driver must apply, in `(key, value)` form.
    pub fn vars(&self) -> &[(String, String)] {
        &self.vars
    }
}

/// External build driver seam.
///
/// Implementations run the upstream build system's dist step for one
/// target and report failure through the publisher's error type.
pub trait BuildDriver {
    /// Build the dist archive for `target` under `env`.
    fn dist(&self, env: &BuildEnv, target: &Target) -> PublishResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::{WIN7_I686, WIN7_X86_64};

    #[test]
    fn test_windows_target_vars() {
        let env = BuildEnv::for_target(Path::new("/work/rust"), Path::new("/work/xwin"), &WIN7_X86_64);

        let vars: std::collections::HashMap<_, _> = env
            .vars()
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();

        assert_eq!(
            vars.get("CC_x86_64_win7_windows_msvc"),
            Some(&"/work/xwin/clang-cl-x86_64")
        );
        assert_eq!(vars.get("AR_x86_64_win7_windows_msvc"), Some(&"llvm-lib"));
        assert!(vars
            .get("RUSTFLAGS")
            .unwrap()
            .contains("/work/rust/build/.nix-deps/lib"));
    }

    #[test]
    fn test_i686_uses_x86_wrapper() {
        let env = BuildEnv::for_target(Path::new("/r"), Path::new("/sdk"), &WIN7_I686);

        let cc = env
            .vars()
            .iter()
            .find(|(k, _)| k == "CC_i686_win7_windows_msvc")
            .map(|(_, v)| v.clone())
            .unwrap();
        assert_eq!(cc, "/sdk/clang-cl-x86");
    }

    #[test]
    fn test_env_is_reusable() {
        let env = BuildEnv::for_target(Path::new("/r"), Path::new("/sdk"), &WIN7_X86_64);
        let first: Vec<_> = env.vars().to_vec();
        let second: Vec<_> = env.vars().to_vec();
        assert_eq!(first, second);
    }
}
