//! Process-wide font discovery for the embedded Typst compiler.
//!
//! Fonts are loaded once and shared by every compilation. The embedded
//! Typst set comes first so math always resolves to New Computer Modern
//! Math regardless of the host font inventory; system fonts follow for
//! broader text coverage.

use std::sync::Arc;

use fontdb::{Database, Source as FontSource};
use lazy_static::lazy_static;
use typst::foundations::Bytes;
use typst::text::{Font, FontBook};
use typst::utils::LazyHash;
use typst::{Library, LibraryExt};

/// Loaded fonts in the index order the font book was built from.
pub struct FontSet {
    /// Metadata Typst selects faces from.
    pub book: LazyHash<FontBook>,
    /// The fonts themselves; `fonts[i]` matches book index `i`.
    pub fonts: Vec<Font>,
}

lazy_static! {
    /// Typst standard library, shared by every world.
    pub static ref LIBRARY: LazyHash<Library> = LazyHash::new(Library::default());

    /// The process-wide font set.
    pub static ref FONTS: FontSet = load_fonts();
}

fn load_fonts() -> FontSet {
    let mut fonts: Vec<Font> = Vec::new();

    for data in typst_assets::fonts() {
        let buffer = Bytes::new(data);
        for font in Font::iter(buffer) {
            fonts.push(font);
        }
    }

    let mut db = Database::new();
    db.load_system_fonts();
    for face in db.faces() {
        let path = match &face.source {
            FontSource::File(path) | FontSource::SharedFile(path, _) => path.clone(),
            FontSource::Binary(_) => continue,
        };
        let Ok(data) = std::fs::read(&path) else {
            continue;
        };
        let owned: Arc<[u8]> = Arc::from(data);
        if let Some(font) = Font::new(Bytes::new(owned), face.index) {
            fonts.push(font);
        }
    }

    if fonts.is_empty() {
        log::warn!("no fonts could be loaded; document compilation will fail");
    } else {
        log::debug!("loaded {} font face(s)", fonts.len());
    }

    let book = FontBook::from_fonts(fonts.iter());
    FontSet {
        book: LazyHash::new(book),
        fonts,
    }
}
