//! # assetgen
//!
//! Generates the iOS app icon and splash screen variants an Xcode project
//! needs from a handful of source images, and records them in the asset
//! catalog's `Contents.json` files.
//!
//! # Architecture: Catalog → Render → Manifest
//!
//! ```text
//! 1. Catalog   AssetKind  →  IosTemplate[]     (static table: name, size, idiom, scale)
//! 2. Render    source     →  PNG per template  (resize/crop in parallel)
//! 3. Manifest  templates  →  Contents.json     (read, merge, write once per kind)
//! ```
//!
//! The catalog is pure data and the renderer talks to an [`imaging::ImageBackend`]
//! trait, so the pipeline logic is tested against a mock backend without
//! encoding a single pixel.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`catalog`] | Every iOS output variant as a compile-time [`catalog::IosTemplate`] |
//! | [`generate`] | Renders a kind's templates and updates its asset set manifest |
//! | [`contents`] | `Contents.json` model, merge rules and Xcode-style serialization |
//! | [`project`] | Project layout, assets directory fallback, source discovery |
//! | [`config`] | `assets.toml` loading, merging over stock defaults, validation |
//! | [`imaging`] | Pure-Rust image operations: contain, cover, logo-on-canvas |
//! | [`output`] | CLI output formatting for every command |
//!
//! # Design Decisions
//!
//! ## Contain for Icons, Cover for Splashes
//!
//! Icons must show the whole artwork, so they are scaled to fit and padded
//! with the icon background color. Splashes must fill a 2732x2732 canvas, so
//! they are scaled to cover and center-cropped. Icons are always flattened:
//! App Store validation rejects icons with an alpha channel.
//!
//! ## Merge, Never Rewrite
//!
//! `Contents.json` is hand-edited by Xcode and by developers. A run replaces
//! the entries for the files it wrote and leaves every other entry, and any
//! key it does not understand, untouched. Running twice yields the same file.
//!
//! ## Pure-Rust Imaging
//!
//! The [`imaging`] module uses the `image` crate (Lanczos3 resampling) for
//! decoding, resizing and PNG encoding. No ImageMagick, no `sips`: the tool
//! runs the same on a Linux CI box as on a Mac.

pub mod catalog;
pub mod config;
pub mod contents;
pub mod generate;
pub mod imaging;
pub mod output;
pub mod project;

#[cfg(test)]
pub(crate) mod test_helpers;
