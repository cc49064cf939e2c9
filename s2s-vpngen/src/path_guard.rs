use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

/// Fail if `output` names the same file as any of `inputs`.
pub fn ensure_output_not_input(output: &Path, inputs: &[&Path]) -> Result<()> {
    let target = resolve(output)?;
    for input in inputs {
        if resolve(input)? == target {
            bail!(
                "refusing to overwrite input file: output {} is {}",
                output.display(),
                input.display()
            );
        }
    }
    Ok(())
}

/// Absolute path with symlinks and `..` resolved.
///
/// A file that does not exist yet is resolved through its parent directory.
fn resolve(path: &Path) -> Result<PathBuf> {
    if path.exists() {
        return path
            .canonicalize()
            .with_context(|| format!("failed to resolve {}", path.display()));
    }
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => std::env::current_dir().context("failed to read current directory")?,
    };
    let parent = parent
        .canonicalize()
        .with_context(|| format!("output directory {} does not exist", parent.display()))?;
    Ok(match path.file_name() {
        Some(name) => parent.join(name),
        None => parent,
    })
}
