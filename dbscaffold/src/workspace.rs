//! Import path resolution for the output directory.
//!
//! Generated controllers and routers import sibling packages by their full
//! import path, so the output root has to be located inside a Go module or
//! a GOPATH workspace.

use anyhow::{Context, Result, bail};
use std::ffi::OsStr;
use std::path::{Component, Path};

const GO_MOD_FILE: &str = "go.mod";
const MODULE_DIRECTIVE: &str = "module";

/// Resolves the import path of `output_root`.
///
/// The nearest `go.mod` at or above the directory wins; otherwise the
/// first GOPATH entry whose `src` directory contains it.
///
/// # Errors
/// Fails if the directory cannot be canonicalized or lies outside any
/// module and GOPATH workspace.
pub fn resolve_package_path(output_root: &Path, gopath: Option<&OsStr>) -> Result<String> {
    let root = output_root
        .canonicalize()
        .with_context(|| format!("Output directory {} is not accessible", output_root.display()))?;

    if let Some(package) = package_from_go_mod(&root)? {
        return Ok(package);
    }

    let Some(gopath) = gopath.filter(|value| !value.is_empty()) else {
        bail!(
            "{} is not inside a Go module and GOPATH is not set",
            root.display()
        );
    };

    for entry in std::env::split_paths(gopath) {
        let Ok(src) = entry.join("src").canonicalize() else {
            continue;
        };
        if let Ok(relative) = root.strip_prefix(&src) {
            let package = slash_path(relative);
            if package.is_empty() {
                bail!("Cannot generate application code directly in {}", src.display());
            }
            return Ok(package);
        }
    }

    bail!(
        "Cannot generate application code outside of GOPATH '{}'",
        gopath.to_string_lossy()
    )
}

fn package_from_go_mod(root: &Path) -> Result<Option<String>> {
    for directory in root.ancestors() {
        let go_mod = directory.join(GO_MOD_FILE);
        if !go_mod.is_file() {
            continue;
        }

        let content = std::fs::read_to_string(&go_mod)
            .with_context(|| format!("Failed to read {}", go_mod.display()))?;
        let module = module_path(&content)
            .with_context(|| format!("{} has no module directive", go_mod.display()))?;

        let relative = root.strip_prefix(directory).unwrap_or(Path::new(""));
        let package = match slash_path(relative) {
            suffix if suffix.is_empty() => module.to_string(),
            suffix => format!("{}/{}", module, suffix),
        };
        tracing::debug!("Using module path from {}", go_mod.display());
        return Ok(Some(package));
    }

    Ok(None)
}

/// Extracts the module path from `go.mod` content.
pub fn module_path(go_mod: &str) -> Option<&str> {
    go_mod.lines().find_map(|line| {
        let rest = line.trim().strip_prefix(MODULE_DIRECTIVE)?;
        if !rest.starts_with(char::is_whitespace) {
            return None;
        }
        let module = rest.split("//").next()?.trim().trim_matches('"');
        (!module.is_empty()).then_some(module)
    })
}

fn slash_path(path: &Path) -> String {
    path.components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;

    #[test]
    fn test_module_path() {
        assert_eq!(
            module_path("module github.com/acme/shop\n\ngo 1.21\n"),
            Some("github.com/acme/shop")
        );
        assert_eq!(
            module_path("// comment\nmodule \"example.com/app\" // main\n"),
            Some("example.com/app")
        );
        assert_eq!(module_path("go 1.21\n"), None);
        assert_eq!(module_path("modules foo\n"), None);
    }

    #[test]
    fn test_package_from_go_mod_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("go.mod"), "module github.com/acme/shop\n").unwrap();

        let package = resolve_package_path(dir.path(), None).unwrap();
        assert_eq!(package, "github.com/acme/shop");
    }

    #[test]
    fn test_package_from_go_mod_subdirectory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("go.mod"), "module github.com/acme/shop\n").unwrap();
        let nested = dir.path().join("services").join("api");
        std::fs::create_dir_all(&nested).unwrap();

        let package = resolve_package_path(&nested, None).unwrap();
        assert_eq!(package, "github.com/acme/shop/services/api");
    }

    #[test]
    fn test_package_from_gopath() {
        let gopath = tempfile::tempdir().unwrap();
        let app = gopath.path().join("src").join("github.com").join("acme").join("blog");
        std::fs::create_dir_all(&app).unwrap();

        let unrelated = tempfile::tempdir().unwrap();
        let value = std::env::join_paths([unrelated.path(), gopath.path()]).unwrap();

        let package = resolve_package_path(&app, Some(value.as_os_str())).unwrap();
        assert_eq!(package, "github.com/acme/blog");
    }

    #[test]
    fn test_outside_gopath_fails() {
        let gopath = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(gopath.path().join("src")).unwrap();
        let elsewhere = tempfile::tempdir().unwrap();

        let value = OsString::from(gopath.path());
        let err = resolve_package_path(elsewhere.path(), Some(value.as_os_str())).unwrap_err();
        assert!(err.to_string().contains("outside of GOPATH"));
    }

    #[test]
    fn test_missing_gopath_fails() {
        let elsewhere = tempfile::tempdir().unwrap();
        let err = resolve_package_path(elsewhere.path(), None).unwrap_err();
        assert!(err.to_string().contains("GOPATH is not set"));
    }

    #[test]
    fn test_missing_output_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(resolve_package_path(&dir.path().join("absent"), None).is_err());
    }
}
