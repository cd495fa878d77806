//! In-memory `typst::World` for compiling generated sources.
//!
//! Each compilation gets its own world: one main source plus the binary
//! assets it references by rooted virtual path. Fonts and the standard
//! library come from the shared process-wide set.

use std::collections::HashMap;

use ecow::EcoString;
use typst::diag::{FileError, FileResult};
use typst::foundations::{Bytes, Datetime};
use typst::syntax::{FileId, Source, VirtualPath};
use typst::text::{Font, FontBook};
use typst::utils::LazyHash;
use typst::{Library, World};

use crate::fonts::{FONTS, LIBRARY};

/// Virtual path of the main document source.
const MAIN_PATH: &str = "/main.typ";

/// A self-contained compilation input.
pub struct PipelineWorld {
    main: FileId,
    source: EcoString,
    assets: HashMap<FileId, Bytes>,
}

impl PipelineWorld {
    /// Create a world for a source with no binary assets.
    pub fn new(source: impl Into<EcoString>) -> Self {
        Self::with_assets(source, HashMap::new())
    }

    /// Create a world serving `path -> bytes` assets.
    ///
    /// Keys are rooted virtual paths (for example `/formulas/f0.png`) and
    /// must match the paths referenced from the source.
    pub fn with_assets(source: impl Into<EcoString>, assets: HashMap<String, Vec<u8>>) -> Self {
        let assets = assets
            .into_iter()
            .map(|(path, data)| (asset_id(&path), Bytes::new(data)))
            .collect();
        Self {
            main: FileId::new(None, VirtualPath::new(MAIN_PATH)),
            source: source.into(),
            assets,
        }
    }

    /// Number of binary assets served by this world.
    pub fn asset_count(&self) -> usize {
        self.assets.len()
    }
}

/// The file id a rooted virtual path resolves to.
///
/// This matches how Typst resolves root-anchored path strings in the
/// source, so assets registered here are found by `image(..)` calls.
fn asset_id(path: &str) -> FileId {
    FileId::new(None, VirtualPath::new(path))
}

impl World for PipelineWorld {
    fn library(&self) -> &LazyHash<Library> {
        &LIBRARY
    }

    fn book(&self) -> &LazyHash<FontBook> {
        &FONTS.book
    }

    fn main(&self) -> FileId {
        self.main
    }

    fn source(&self, id: FileId) -> FileResult<Source> {
        if id == self.main {
            Ok(Source::new(id, self.source.to_string()))
        } else {
            Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
        }
    }

    fn file(&self, id: FileId) -> FileResult<Bytes> {
        self.assets
            .get(&id)
            .cloned()
            .ok_or_else(|| FileError::NotFound(id.vpath().as_rootless_path().into()))
    }

    fn font(&self, index: usize) -> Option<Font> {
        FONTS.fonts.get(index).cloned()
    }

    fn today(&self, _offset: Option<i64>) -> Option<Datetime> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serves_main_source() {
        let world = PipelineWorld::new("= Hola");
        let source = world.source(world.main()).unwrap();
        assert_eq!(source.text(), "= Hola");
    }

    #[test]
    fn test_serves_registered_assets() {
        let assets = HashMap::from([("/formulas/f0.png".to_string(), vec![1u8, 2, 3])]);
        let world = PipelineWorld::with_assets("#image(\"/formulas/f0.png\")", assets);
        assert_eq!(world.asset_count(), 1);

        let bytes = world.file(asset_id("/formulas/f0.png")).unwrap();
        assert_eq!(bytes.as_slice(), &[1u8, 2, 3]);
    }

    #[test]
    fn test_unknown_file_is_not_found() {
        let world = PipelineWorld::new("");
        assert!(world.file(asset_id("/missing.png")).is_err());
    }
}
