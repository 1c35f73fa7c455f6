mod validate;

use callmatch_symbols::{SourceLoader, SymbolTable};

/// Built-in JDK stubs plus the given sources.
pub(crate) fn table_with_sources(files: &[(&str, &str)]) -> SymbolTable {
    let mut table = SymbolTable::with_builtin_jdk();
    let mut loader = SourceLoader::new();
    for (path, text) in files {
        loader.add_text(*path, *text);
    }
    loader.load_into(&mut table).expect("load fixture sources");
    table
}
