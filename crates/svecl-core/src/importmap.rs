//! Import map resolution for bare module specifiers.
//!
//! Supports the top-level `imports` section of an
//! [import map](https://github.com/WICG/import-maps): exact entries and
//! prefix entries (keys ending in `/`). `scopes` are rejected.

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};

/// Import map as written on disk.
#[derive(Debug, Deserialize)]
struct RawImportMap {
    #[serde(default)]
    imports: BTreeMap<String, String>,
    #[serde(default)]
    scopes: BTreeMap<String, BTreeMap<String, String>>,
}

/// An import map with targets resolved against its base directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportMap {
    imports: BTreeMap<String, PathBuf>,
}

impl ImportMap {
    /// Load an import map; targets are relative to the file's directory.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let dir = path.parent().unwrap_or(Path::new("."));
        let base = std::path::absolute(dir).map_err(|e| {
            Error::ImportMap(format!("unable to determine base path: {}", e))
        })?;

        Self::from_json(&content, &base)
    }

    /// Parse an import map with targets relative to `base`.
    pub fn from_json(content: &str, base: &Path) -> Result<Self> {
        let raw: RawImportMap = serde_json::from_str(content)
            .map_err(|e| Error::ImportMap(e.to_string()))?;

        if !raw.scopes.is_empty() {
            return Err(Error::ImportMap("scopes are not supported".to_string()));
        }

        let imports = raw
            .imports
            .into_iter()
            .map(|(specifier, target)| (specifier, join_slash_path(base, &target)))
            .collect();

        Ok(Self { imports })
    }

    /// Resolve a bare specifier to a file system path.
    ///
    /// An exact entry wins; otherwise the longest matching prefix entry.
    pub fn resolve(&self, specifier: &str) -> Result<PathBuf> {
        if let Some(target) = self.imports.get(specifier) {
            return Ok(clean_path(target));
        }

        self.imports
            .iter()
            .filter(|(key, _)| key.ends_with('/') && specifier.starts_with(key.as_str()))
            .max_by_key(|(key, _)| key.len())
            .map(|(key, target)| clean_path(&join_slash_path(target, &specifier[key.len()..])))
            .ok_or_else(|| Error::UnresolvedSpecifier(specifier.to_string()))
    }

    /// Whether `specifier` is left to regular path resolution.
    pub fn is_relative_or_absolute(specifier: &str) -> bool {
        specifier.starts_with("./")
            || specifier.starts_with("../")
            || Path::new(specifier).is_absolute()
    }

    pub fn len(&self) -> usize {
        self.imports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.imports.is_empty()
    }
}

/// Resolves import specifiers for a build using an import map.
#[derive(Debug, Clone)]
pub struct Resolver {
    map: ImportMap,
}

impl Resolver {
    pub fn new(map: ImportMap) -> Self {
        Self { map }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        Ok(Self::new(ImportMap::from_file(path)?))
    }

    /// Resolve an import.
    ///
    /// Returns `None` for relative and absolute specifiers. Targets without
    /// an extension are taken to be packages and resolve to their `index.js`.
    pub fn resolve_import(&self, specifier: &str) -> Result<Option<PathBuf>> {
        if ImportMap::is_relative_or_absolute(specifier) {
            return Ok(None);
        }

        let mut resolved = self.map.resolve(specifier)?;
        if resolved.extension().is_none() {
            // NodeJS-style package imports
            resolved.push("index.js");
        }
        tracing::debug!("Resolved {} to {}", specifier, resolved.display());
        Ok(Some(resolved))
    }
}

/// Append a `/`-separated relative path to `base`.
fn join_slash_path(base: &Path, relative: &str) -> PathBuf {
    let mut path = base.to_path_buf();
    for part in relative.split('/').filter(|p| !p.is_empty()) {
        path.push(part);
    }
    path
}

/// Lexically remove `.` and `..` components.
fn clean_path(path: &Path) -> PathBuf {
    let mut cleaned: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match cleaned.last() {
                Some(Component::Normal(_)) => {
                    cleaned.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => cleaned.push(component),
            },
            other => cleaned.push(other),
        }
    }

    if cleaned.is_empty() {
        return PathBuf::from(".");
    }
    cleaned.iter().collect()
}
