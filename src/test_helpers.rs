//! Shared test utilities for the assetgen test suite.
//!
//! Builds throwaway projects with synthetic source images so tests never
//! depend on checked-in binaries.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_project(&[("icon.png", 64, 64), ("splash.png", 40, 30)]);
//! let project = Project::load(tmp.path()).unwrap();
//! ```

use image::{Rgb, RgbImage};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

use crate::catalog::AssetKind;
use crate::contents::{Contents, contents_path};
use crate::project::Project;

// =========================================================================
// Fixture setup
// =========================================================================

/// Create a project with `ios/App/` and the given source images in
/// `assets/`. Each entry is `(filename, width, height)`.
pub fn setup_project(sources: &[(&str, u32, u32)]) -> TempDir {
    let tmp = TempDir::new().unwrap();
    fs::create_dir_all(tmp.path().join("ios/App")).unwrap();
    fs::create_dir_all(tmp.path().join("assets")).unwrap();
    for (name, width, height) in sources {
        write_gradient(&tmp.path().join("assets").join(name), *width, *height);
    }
    tmp
}

/// Write an opaque gradient image. The format follows the extension.
pub fn write_gradient(path: &Path, width: u32, height: u32) {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    img.save(path).unwrap();
}

// =========================================================================
// Lookups
// =========================================================================

/// Load the `Contents.json` that `kind` writes to. Panics if it is invalid.
pub fn read_contents(project: &Project, kind: AssetKind) -> Contents {
    Contents::load(&contents_path(&project.asset_set_dir(kind))).unwrap()
}

/// Assert a manifest has no filename listed twice.
pub fn assert_no_duplicate_filenames(contents: &Contents) {
    let mut names = contents.filenames();
    let total = names.len();
    names.sort_unstable();
    names.dedup();
    assert_eq!(names.len(), total, "duplicate filenames in {names:?}");
}
