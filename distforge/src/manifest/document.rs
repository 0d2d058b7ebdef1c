//! Comment-preserving channel manifest document model.
//!
//! Wraps a TOML document and exposes exactly the accessors and mutation
//! primitives the patch engine needs. Everything the model does not touch
//! (comments, ordering, formatting of unrelated entries) round-trips
//! byte-for-byte through load and serialize.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use toml_edit::{value, DocumentMut, Item, Table};

/// Errors from loading, mutating or writing a channel manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// Failed to read the manifest file.
    #[error("failed to read manifest {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The manifest is not valid TOML. Fatal: no patch is attempted on a
    /// manifest that cannot be parsed.
    #[error("failed to parse manifest {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml_edit::TomlError,
    },

    /// Failed to write the manifest, its sidecar or its backup.
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Per-target availability record of a package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetRecord {
    /// Whether the component is available for this target.
    pub available: bool,

    /// Download URL of the xz artifact.
    pub xz_url: String,

    /// SHA-256 hash of the xz artifact.
    pub xz_hash: String,
}

/// A loaded channel manifest.
///
/// Loaded once, mutated in place, then persisted through
/// [`persist_manifest`](super::persist_manifest); never partially written.
#[derive(Debug, Clone)]
pub struct ChannelManifest {
    doc: DocumentMut,
}

impl ChannelManifest {
    /// Parse a manifest from TOML text.
    pub fn parse(text: &str) -> Result<Self, toml_edit::TomlError> {
        let doc = text.parse::<DocumentMut>()?;
        Ok(Self { doc })
    }

    /// Load a manifest from disk.
    ///
    /// # Errors
    ///
    /// [`ManifestError::Read`] if the file cannot be read,
    /// [`ManifestError::Parse`] if it is not valid TOML.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let text = fs::read_to_string(path).map_err(|e| ManifestError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&text).map_err(|e| ManifestError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Serialize the document, preserving untouched formatting and comments.
    pub fn serialize(&self) -> String {
        self.doc.to_string()
    }

    /// Insert or overwrite the availability record of `package` for
    /// `triple`.
    ///
    /// Overwriting (rather than appending) is what makes repeated
    /// registration of the same target idempotent.
    pub fn set_target_record(&mut self, package: &str, triple: &str, record: &TargetRecord) {
        let mut table = Table::new();
        table["available"] = value(record.available);
        table["xz_url"] = value(record.xz_url.as_str());
        table["xz_hash"] = value(record.xz_hash.as_str());

        self.doc["pkg"][package]["target"][triple] = Item::Table(table);
    }

    /// Read the availability record of `package` for `triple`, if present.
    pub fn target_record(&self, package: &str, triple: &str) -> Option<TargetRecord> {
        let entry = self
            .doc
            .get("pkg")?
            .get(package)?
            .get("target")?
            .get(triple)?;

        Some(TargetRecord {
            available: entry.get("available")?.as_bool()?,
            xz_url: entry.get("xz_url")?.as_str()?.to_string(),
            xz_hash: entry.get("xz_hash")?.as_str()?.to_string(),
        })
    }

    /// Target triples that have an entry under `package`.
    pub fn host_triples(&self, package: &str) -> Vec<String> {
        self.doc
            .get("pkg")
            .and_then(|i| i.get(package))
            .and_then(|i| i.get("target"))
            .and_then(Item::as_table)
            .map(|t| t.iter().map(|(key, _)| key.to_string()).collect())
            .unwrap_or_default()
    }

    /// Whether the extension list of `package`'s `host` entry contains
    /// `{component, target}`.
    ///
    /// Hosts without an `extensions` array never contain anything.
    pub fn extension_exists(
        &self,
        package: &str,
        host: &str,
        component: &str,
        target: &str,
    ) -> bool {
        let extensions = self
            .doc
            .get("pkg")
            .and_then(|i| i.get(package))
            .and_then(|i| i.get("target"))
            .and_then(|i| i.get(host))
            .and_then(|i| i.get("extensions"))
            .and_then(Item::as_array_of_tables);

        match extensions {
            Some(entries) => entries
                .iter()
                .any(|e| extension_entry_matches(e, component, target)),
            None => false,
        }
    }

    /// Append `{component, target}` to the extension list of `package`'s
    /// `host` entry unless an equal entry is already present.
    ///
    /// Returns `true` if an entry was appended. Hosts that do not carry an
    /// `extensions` array are left untouched (they describe packages the
    /// installer cannot extend).
    pub fn add_extension(
        &mut self,
        package: &str,
        host: &str,
        component: &str,
        target: &str,
    ) -> bool {
        // Explicit membership test before any mutation; the append below
        // must never run for an entry that already exists.
        if self.extension_exists(package, host, component, target) {
            return false;
        }

        let extensions = self
            .doc
            .get_mut("pkg")
            .and_then(|i| i.get_mut(package))
            .and_then(|i| i.get_mut("target"))
            .and_then(|i| i.get_mut(host))
            .and_then(|i| i.get_mut("extensions"))
            .and_then(Item::as_array_of_tables_mut);

        match extensions {
            Some(entries) => {
                let mut entry = Table::new();
                entry["pkg"] = value(component);
                entry["target"] = value(target);
                entries.push(entry);
                true
            }
            None => false,
        }
    }
}

/// Whether an extension entry names the given component and target.
fn extension_entry_matches(entry: &Table, component: &str, target: &str) -> bool {
    entry.get("pkg").and_then(Item::as_str) == Some(component)
        && entry.get("target").and_then(Item::as_str) == Some(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SAMPLE: &str = r#"# Channel manifest for testing.
manifest-version = "2"
date = "2024-05-01"

[pkg.rust]
version = "1.78.0"

[pkg.rust.target.x86_64-unknown-linux-gnu]
available = true
xz_url = "https://static.rust-lang.org/dist/rust-1.78.0-x86_64-unknown-linux-gnu.tar.xz"
xz_hash = "1111"

[[pkg.rust.target.x86_64-unknown-linux-gnu.extensions]]
pkg = "rust-std"
target = "x86_64-unknown-linux-gnu"

[pkg.rust.target.aarch64-apple-darwin]
available = true
xz_url = "https://static.rust-lang.org/dist/rust-1.78.0-aarch64-apple-darwin.tar.xz"
xz_hash = "2222"

[[pkg.rust.target.aarch64-apple-darwin.extensions]]
pkg = "rust-std"
target = "aarch64-apple-darwin"

[pkg.rust-std]
version = "1.78.0"

[pkg.rust-std.target.x86_64-unknown-linux-gnu]
available = true
xz_url = "https://static.rust-lang.org/dist/rust-std-1.78.0-x86_64-unknown-linux-gnu.tar.xz"
xz_hash = "3333"
"#;

    #[test]
    fn test_parse_and_serialize_roundtrip() {
        let manifest = ChannelManifest::parse(SAMPLE).unwrap();
        assert_eq!(manifest.serialize(), SAMPLE);
    }

    #[test]
    fn test_load_missing_file() {
        let result = ChannelManifest::load(Path::new("/nonexistent/channel.toml"));
        assert!(matches!(result, Err(ManifestError::Read { .. })));
    }

    #[test]
    fn test_load_invalid_toml() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("channel.toml");
        fs::write(&path, "pkg = [broken").unwrap();

        let result = ChannelManifest::load(&path);
        assert!(matches!(result, Err(ManifestError::Parse { .. })));
    }

    #[test]
    fn test_target_record_read() {
        let manifest = ChannelManifest::parse(SAMPLE).unwrap();

        let record = manifest
            .target_record("rust-std", "x86_64-unknown-linux-gnu")
            .unwrap();
        assert!(record.available);
        assert_eq!(record.xz_hash, "3333");
    }

    #[test]
    fn test_set_target_record_inserts_new_target() {
        let mut manifest = ChannelManifest::parse(SAMPLE).unwrap();

        let record = TargetRecord {
            available: true,
            xz_url: "https://example.invalid/custom/a.tar.xz".to_string(),
            xz_hash: "abcd".to_string(),
        };
        manifest.set_target_record("rust-std", "x86_64-win7-windows-msvc", &record);

        assert_eq!(
            manifest.target_record("rust-std", "x86_64-win7-windows-msvc"),
            Some(record)
        );
    }

    #[test]
    fn test_set_target_record_overwrites() {
        let mut manifest = ChannelManifest::parse(SAMPLE).unwrap();

        let first = TargetRecord {
            available: true,
            xz_url: "https://example.invalid/a.tar.xz".to_string(),
            xz_hash: "aaaa".to_string(),
        };
        let second = TargetRecord {
            available: true,
            xz_url: "https://example.invalid/b.tar.xz".to_string(),
            xz_hash: "bbbb".to_string(),
        };

        manifest.set_target_record("rust-std", "t", &first);
        manifest.set_target_record("rust-std", "t", &second);

        assert_eq!(manifest.target_record("rust-std", "t"), Some(second));
    }

    #[test]
    fn test_set_target_record_twice_is_byte_identical() {
        let record = TargetRecord {
            available: true,
            xz_url: "https://example.invalid/a.tar.xz".to_string(),
            xz_hash: "aaaa".to_string(),
        };

        let mut once = ChannelManifest::parse(SAMPLE).unwrap();
        once.set_target_record("rust-std", "t", &record);

        let mut twice = ChannelManifest::parse(SAMPLE).unwrap();
        twice.set_target_record("rust-std", "t", &record);
        twice.set_target_record("rust-std", "t", &record);

        assert_eq!(once.serialize(), twice.serialize());
    }

    #[test]
    fn test_host_triples() {
        let manifest = ChannelManifest::parse(SAMPLE).unwrap();

        let hosts = manifest.host_triples("rust");
        assert_eq!(hosts.len(), 2);
        assert!(hosts.contains(&"x86_64-unknown-linux-gnu".to_string()));
        assert!(hosts.contains(&"aarch64-apple-darwin".to_string()));
    }

    #[test]
    fn test_host_triples_unknown_package() {
        let manifest = ChannelManifest::parse(SAMPLE).unwrap();
        assert!(manifest.host_triples("cargo").is_empty());
    }

    #[test]
    fn test_extension_exists() {
        let manifest = ChannelManifest::parse(SAMPLE).unwrap();

        assert!(manifest.extension_exists(
            "rust",
            "x86_64-unknown-linux-gnu",
            "rust-std",
            "x86_64-unknown-linux-gnu"
        ));
        assert!(!manifest.extension_exists(
            "rust",
            "x86_64-unknown-linux-gnu",
            "rust-std",
            "x86_64-win7-windows-msvc"
        ));
    }

    #[test]
    fn test_add_extension_appends_once() {
        let mut manifest = ChannelManifest::parse(SAMPLE).unwrap();

        let added = manifest.add_extension(
            "rust",
            "x86_64-unknown-linux-gnu",
            "rust-std",
            "x86_64-win7-windows-msvc",
        );
        assert!(added);

        let again = manifest.add_extension(
            "rust",
            "x86_64-unknown-linux-gnu",
            "rust-std",
            "x86_64-win7-windows-msvc",
        );
        assert!(!again);

        // Exactly one entry for the new target.
        let text = manifest.serialize();
        assert_eq!(text.matches("x86_64-win7-windows-msvc").count(), 1);
    }

    #[test]
    fn test_add_extension_skips_hosts_without_extension_list() {
        let mut manifest = ChannelManifest::parse(SAMPLE).unwrap();

        // rust-std targets carry no extensions array.
        let added = manifest.add_extension(
            "rust-std",
            "x86_64-unknown-linux-gnu",
            "rust-std",
            "x86_64-win7-windows-msvc",
        );
        assert!(!added);
    }

    #[test]
    fn test_mutation_preserves_comments() {
        let mut manifest = ChannelManifest::parse(SAMPLE).unwrap();

        manifest.add_extension(
            "rust",
            "aarch64-apple-darwin",
            "rust-std",
            "x86_64-win7-windows-msvc",
        );

        assert!(manifest
            .serialize()
            .starts_with("# Channel manifest for testing."));
    }
}
