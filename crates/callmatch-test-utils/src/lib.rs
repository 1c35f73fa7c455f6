//! Fixture helpers shared by the callmatch test suites.

use std::fs;
use std::path::PathBuf;

use callmatch_core::{TextRange, TextSize};
use tempfile::TempDir;

pub const CURSOR: &str = "$0";

/// Extracts a byte range selection from a fixture containing `/*start*/` and
/// `/*end*/` markers.
///
/// Returns the fixture with markers removed and the selection `TextRange`
/// pointing at the extracted region.
pub fn extract_range(fixture: &str) -> (String, TextRange) {
    let start_marker = "/*start*/";
    let end_marker = "/*end*/";

    let start = fixture
        .find(start_marker)
        .expect("fixture missing /*start*/ marker");
    let after_start = start + start_marker.len();
    let end = fixture
        .find(end_marker)
        .expect("fixture missing /*end*/ marker");
    assert!(end >= after_start, "/*end*/ must come after /*start*/");

    let mut text = String::with_capacity(fixture.len());
    text.push_str(&fixture[..start]);
    text.push_str(&fixture[after_start..end]);
    text.push_str(&fixture[end + end_marker.len()..]);

    // The start stays put; the end shrinks by the length of the start marker.
    let range = callmatch_core::range(start, end - start_marker.len());
    (text, range)
}

/// Strips a single `$0` cursor marker, returning the text and the marker offset.
pub fn extract_offset(fixture: &str) -> (String, TextSize) {
    let offset = fixture.find(CURSOR).expect("fixture missing `$0` marker");
    assert!(
        !fixture[offset + CURSOR.len()..].contains(CURSOR),
        "fixture contains more than one `$0` marker"
    );

    let mut text = String::with_capacity(fixture.len());
    text.push_str(&fixture[..offset]);
    text.push_str(&fixture[offset + CURSOR.len()..]);
    (text, TextSize::from(offset as u32))
}

/// Strips `<error descr="...">text</error>` markers, returning the text and each
/// marked range with its description. Markers must not nest.
pub fn extract_error_markers(fixture: &str) -> (String, Vec<(TextRange, String)>) {
    const OPEN: &str = "<error descr=\"";
    const CLOSE: &str = "</error>";

    let mut text = String::with_capacity(fixture.len());
    let mut markers = Vec::new();
    let mut rest = fixture;
    while let Some(open) = rest.find(OPEN) {
        text.push_str(&rest[..open]);
        let after_open = &rest[open + OPEN.len()..];
        let descr_end = after_open.find("\">").expect("unterminated error description");
        let descr = after_open[..descr_end].to_string();
        let body = &after_open[descr_end + 2..];
        let close = body.find(CLOSE).expect("missing </error>");

        let start = text.len();
        text.push_str(&body[..close]);
        markers.push((callmatch_core::range(start, text.len()), descr));
        rest = &body[close + CLOSE.len()..];
    }
    text.push_str(rest);
    (text, markers)
}

/// A temporary directory populated from `(relative path, text)` pairs.
pub struct FixtureDir {
    dir: TempDir,
}

impl FixtureDir {
    pub fn new(files: &[(&str, &str)]) -> Self {
        let dir = TempDir::new().expect("create temp dir");
        for (rel, text) in files {
            let path = dir.path().join(rel);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).expect("create fixture parent dir");
            }
            fs::write(&path, text).expect("write fixture file");
        }
        Self { dir }
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }

    pub fn root(&self) -> &std::path::Path {
        self.dir.path()
    }
}
