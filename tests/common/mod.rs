#![allow(dead_code)]

use std::fs;
use std::sync::Arc;

use phpspec_rewriter::{TypeHintIndex, TypeHintRewriter};

/// A rewriter with the default `*Spec` convention, plus the index it
/// reports into.
pub fn create_test_rewriter() -> (TypeHintRewriter, Arc<TypeHintIndex>) {
    let index = Arc::new(TypeHintIndex::new());
    let rewriter = TypeHintRewriter::new(index.clone());
    (rewriter, index)
}

/// Rewrite `source` with a fresh rewriter, panicking on failure.
pub fn rewrite(source: &str) -> (String, Arc<TypeHintIndex>) {
    let (mut rewriter, index) = create_test_rewriter();
    let output = rewriter.rewrite(source).expect("rewrite failed");
    (output, index)
}

/// Helper: create a temp directory containing the given files.
pub fn create_workspace(files: &[(&str, &str)]) -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    for (rel_path, content) in files {
        let full = dir.path().join(rel_path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).expect("failed to create dirs");
        }
        fs::write(&full, content).expect("failed to write file");
    }
    dir
}
