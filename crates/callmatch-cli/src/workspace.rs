use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use callmatch_config::{load_for_workspace, CallmatchConfig};
use callmatch_symbols::{install_builtin_jdk, SourceLoader, SymbolTable};
use callmatch_syntax::MatcherSyntax;
use walkdir::WalkDir;

/// Config plus the symbols of every source the command can see.
pub(crate) struct Workspace {
    pub(crate) config: CallmatchConfig,
    pub(crate) table: SymbolTable,
}

impl Workspace {
    /// Load `config` (or the one discovered in `root`) and index `sources` along
    /// with the configured stub roots.
    pub(crate) fn open(config: Option<&Path>, root: &Path, sources: &[PathBuf]) -> Result<Self> {
        let config = load_config(config, root)?;

        let mut table = SymbolTable::new();
        if config.jdk.builtin_stubs {
            install_builtin_jdk(&mut table);
        }

        let mut loader = SourceLoader::new();
        let mut count = 0usize;
        for path in sources.iter().chain(&config.jdk.stub_roots) {
            for file in java_files_in(path) {
                loader
                    .add_path(&file)
                    .with_context(|| format!("failed to read {}", file.display()))?;
                count += 1;
            }
        }
        let classes = loader.load_into(&mut table)?;
        tracing::debug!(target: "callmatch.cli", files = count, classes, "indexed sources");

        Ok(Self { config, table })
    }

    pub(crate) fn syntax(&self) -> MatcherSyntax {
        MatcherSyntax::new(self.config.matchers.matcher_class.clone())
    }
}

fn load_config(explicit: Option<&Path>, root: &Path) -> Result<CallmatchConfig> {
    let (config, diagnostics) = match explicit {
        Some(path) => CallmatchConfig::load_from_path_with_diagnostics(path)?,
        None => {
            let (config, _, diagnostics) = load_for_workspace(root)?;
            (config, diagnostics)
        }
    };
    for key in &diagnostics.unknown_keys {
        eprintln!("warning: unknown config key `{key}`");
    }
    for warning in &diagnostics.warnings {
        eprintln!("warning: {warning}");
    }
    if let Some(error) = diagnostics.errors.first() {
        anyhow::bail!("invalid config: {error}");
    }
    callmatch_config::init_tracing(&config.logging);
    Ok(config)
}

/// `path` itself if it is a file, else every `.java` file below it in a stable order.
pub(crate) fn java_files_in(path: &Path) -> Vec<PathBuf> {
    if path.is_file() {
        return vec![path.to_path_buf()];
    }
    let mut files: Vec<PathBuf> = WalkDir::new(path)
        .follow_links(false)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| is_java_file(path))
        .collect();
    files.sort();
    files
}

fn is_java_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "java")
}
