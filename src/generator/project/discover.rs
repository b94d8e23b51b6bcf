use anyhow::Context;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extension of module description files.
pub const CONFIG_EXTENSION: &str = "config";

/// Input files of one module found under the source root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleSources {
    /// `<dir>/<stem>.config`
    pub config_path: PathBuf,
    /// `<dir>/<stem>._hpp`
    pub header_template: PathBuf,
    /// `<dir>/<stem>._cpp`
    pub source_template: PathBuf,
    /// Directory of the module relative to the source root
    pub relative_dir: PathBuf,
    pub stem: String,
}

impl ModuleSources {
    /// Relative path of the `.config` file, used in reports.
    pub fn label(&self) -> String {
        self.relative_dir
            .join(format!("{}.{CONFIG_EXTENSION}", self.stem))
            .display()
            .to_string()
    }

    /// Output `.hpp` path under `destination`.
    pub fn header_output(&self, destination: &Path) -> PathBuf {
        destination
            .join(&self.relative_dir)
            .join(format!("{}.hpp", self.stem))
    }

    /// Output `.cpp` path under `destination`.
    pub fn source_output(&self, destination: &Path) -> PathBuf {
        destination
            .join(&self.relative_dir)
            .join(format!("{}.cpp", self.stem))
    }
}

/// Find every `<stem>.config` under `source_root`, in sorted path order.
///
/// Template paths are derived from the config path and not checked here;
/// a missing template fails its module later.
pub fn discover_modules(source_root: &Path) -> anyhow::Result<Vec<ModuleSources>> {
    if !source_root.is_dir() {
        anyhow::bail!("Source directory not found: {}", source_root.display());
    }

    let mut modules = Vec::new();
    for entry in WalkDir::new(source_root).sort_by_file_name() {
        let entry = entry
            .with_context(|| format!("Failed to walk source tree: {}", source_root.display()))?;
        let path = entry.path();
        if !entry.file_type().is_file()
            || path.extension().and_then(|e| e.to_str()) != Some(CONFIG_EXTENSION)
        {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let dir = path.parent().unwrap_or(source_root);
        let relative_dir = dir.strip_prefix(source_root).unwrap_or(dir).to_path_buf();

        modules.push(ModuleSources {
            config_path: path.to_path_buf(),
            header_template: dir.join(format!("{stem}._hpp")),
            source_template: dir.join(format!("{stem}._cpp")),
            relative_dir,
            stem: stem.to_string(),
        });
    }
    Ok(modules)
}

/// Where the expansion of `template` lands: its position relative to
/// `source_root`, mirrored under `destination`, with `._hpp`/`._cpp`
/// turned into `.hpp`/`.cpp`.
///
/// A template outside the source root lands at the destination root.
pub fn output_path_for(template: &Path, source_root: &Path, destination: &Path) -> PathBuf {
    let relative = template
        .strip_prefix(source_root)
        .map(Path::to_path_buf)
        .unwrap_or_else(|_| template.file_name().map(PathBuf::from).unwrap_or_default());

    let file_name = relative
        .file_name()
        .and_then(|n| n.to_str())
        .map(|name| {
            if let Some(stem) = name.strip_suffix("._hpp") {
                format!("{stem}.hpp")
            } else if let Some(stem) = name.strip_suffix("._cpp") {
                format!("{stem}.cpp")
            } else {
                name.to_string()
            }
        })
        .unwrap_or_default();

    destination.join(relative.with_file_name(file_name))
}
