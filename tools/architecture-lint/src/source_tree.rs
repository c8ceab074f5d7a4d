//! Reads the hexagon's source files through a capability-scoped directory.

use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs::Dir;

use crate::{LintError, LintSource};

const LAYER_DIRS: [&str; 3] = ["domain", "inbound", "outbound"];

/// Every `.rs` file under the layer directories of `src_dir`, sorted by path.
pub(crate) fn read_layer_sources(src_dir: &Utf8Path) -> Result<Vec<LintSource>, LintError> {
    let src = Dir::open_ambient_dir(src_dir, ambient_authority())?;
    let mut sources = Vec::new();
    for layer in LAYER_DIRS {
        match src.open_dir(layer) {
            Ok(dir) => read_dir(&dir, Utf8PathBuf::from(layer), &mut sources)?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => return Err(err.into()),
        }
    }
    sources.sort_by(|left, right| left.file.cmp(&right.file));
    Ok(sources)
}

fn read_dir(dir: &Dir, prefix: Utf8PathBuf, sources: &mut Vec<LintSource>) -> Result<(), LintError> {
    for entry in dir.entries()? {
        let entry = entry?;
        let name = entry
            .file_name()
            .into_string()
            .map_err(|name| LintError::NonUtf8Name {
                dir: prefix.clone(),
                name,
            })?;
        let path = prefix.join(&name);
        if entry.file_type()?.is_dir() {
            read_dir(&entry.open_dir()?, path, sources)?;
        } else if path.extension() == Some("rs") {
            let contents = dir.read_to_string(&name)?;
            sources.push(LintSource::new(path, contents));
        }
    }
    Ok(())
}

/// Unit test files: `tests.rs`, `*_tests.rs`, or anything under `tests/`.
pub(crate) fn is_test_file(file: &Utf8Path) -> bool {
    let named_as_tests = file
        .file_stem()
        .is_some_and(|stem| stem == "tests" || stem.ends_with("_tests"));
    named_as_tests
        || file
            .parent()
            .is_some_and(|dir| dir.components().any(|part| part.as_str() == "tests"))
}
