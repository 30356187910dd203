//! Asset-catalog manifest (`Contents.json`) bookkeeping.
//!
//! Every `.appiconset` / `.imageset` directory carries a `Contents.json`
//! listing its images by idiom, scale, point size and appearance. Xcode reads
//! it to decide which file serves which device.
//!
//! Updates are read-merge-write:
//!
//! 1. [`Contents::load`] parses the existing file, or starts from the empty
//!    skeleton when the asset set has none yet.
//! 2. [`Contents::merge`] folds in the entries for freshly generated files.
//! 3. [`Contents::save`] writes the result in Xcode's own layout.
//!
//! Entries are keyed by filename. Merging the same outputs twice yields the
//! same document, and entries (or keys) this tool knows nothing about are
//! carried through untouched.
//!
//! ## Merge rules
//!
//! For each incoming entry, first match wins:
//!
//! - an entry with the same `filename` is replaced (later duplicates of that
//!   filename are dropped);
//! - an unassigned slot (no `filename`) with the same idiom, size, scale and
//!   appearance is filled, which is how a fresh Xcode template lists its
//!   icon sizes;
//! - otherwise the entry is appended.
//!
//! An entry whose idiom, size, scale and appearance slot is already held by
//! a file of another name is still merged, and the collision is logged and
//! counted in [`MergeStats::conflicts`]. The other file is left in place.

use crate::catalog::IosTemplate;
use serde::ser::Error as _;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::ser::{Formatter, PrettyFormatter};
use serde_json::{Map, Value};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the manifest inside an asset set directory.
pub const CONTENTS_FILENAME: &str = "Contents.json";

#[derive(Error, Debug)]
pub enum ContentsError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Invalid {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Path of the manifest for an asset set directory.
pub fn contents_path(asset_set_dir: &Path) -> PathBuf {
    asset_set_dir.join(CONTENTS_FILENAME)
}

/// A parsed `Contents.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contents {
    #[serde(default)]
    pub images: Vec<ContentsImage>,
    #[serde(default = "default_info")]
    pub info: Map<String, Value>,
    /// Top-level keys other than `images` and `info`.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_info() -> Map<String, Value> {
    let mut info = Map::new();
    info.insert("author".to_string(), Value::from("xcode"));
    info.insert("version".to_string(), Value::from(1));
    info
}

impl Default for Contents {
    fn default() -> Self {
        Self {
            images: Vec::new(),
            info: default_info(),
            extra: Map::new(),
        }
    }
}

/// One entry of the `images` array.
///
/// Serialized with all keys, known and unknown, in alphabetical order, which
/// is the order Xcode writes them in.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ContentsImage {
    #[serde(default)]
    pub appearances: Vec<AppearanceEntry>,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub idiom: Option<String>,
    #[serde(default)]
    pub scale: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Serialize for ContentsImage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // serde_json::Map keeps keys sorted
        let mut fields = self.extra.clone();
        if !self.appearances.is_empty() {
            let appearances = serde_json::to_value(&self.appearances).map_err(S::Error::custom)?;
            fields.insert("appearances".to_string(), appearances);
        }
        let known = [
            ("filename", &self.filename),
            ("idiom", &self.idiom),
            ("scale", &self.scale),
            ("size", &self.size),
        ];
        for (key, value) in known {
            if let Some(value) = value {
                fields.insert(key.to_string(), Value::from(value.as_str()));
            }
        }
        fields.serialize(serializer)
    }
}

/// Appearance qualifier, e.g. `{"appearance": "luminosity", "value": "dark"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppearanceEntry {
    pub appearance: String,
    pub value: String,
}

impl ContentsImage {
    /// The entry describing a file rendered from `template`.
    pub fn from_template(template: &IosTemplate) -> Self {
        Self {
            appearances: template
                .appearance
                .map(|a| {
                    vec![AppearanceEntry {
                        appearance: "luminosity".to_string(),
                        value: a.as_str().to_string(),
                    }]
                })
                .unwrap_or_default(),
            filename: Some(template.name.to_string()),
            idiom: Some(template.idiom.as_str().to_string()),
            scale: Some(template.scale_label()),
            size: template.point_size(),
            extra: Map::new(),
        }
    }

    /// An entry with no fields set.
    fn placeholder() -> Self {
        Self {
            appearances: Vec::new(),
            filename: None,
            idiom: None,
            scale: None,
            size: None,
            extra: Map::new(),
        }
    }

    /// Whether both entries describe the same device slot.
    fn same_slot(&self, other: &ContentsImage) -> bool {
        self.idiom == other.idiom
            && self.size == other.size
            && self.scale == other.scale
            && self.appearances == other.appearances
    }

    /// Human-readable slot, e.g. `universal 2x dark`.
    fn slot_label(&self) -> String {
        let mut parts: Vec<&str> = [&self.idiom, &self.size, &self.scale]
            .into_iter()
            .filter_map(|v| v.as_deref())
            .collect();
        parts.extend(self.appearances.iter().map(|a| a.value.as_str()));
        parts.join(" ")
    }

    /// Take the new entry's fields, keeping old keys the new entry lacks.
    fn absorb(old: ContentsImage, mut new: ContentsImage) -> ContentsImage {
        for (key, value) in old.extra {
            new.extra.entry(key).or_insert(value);
        }
        new
    }
}

/// What a merge did to the manifest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    pub added: usize,
    pub replaced: usize,
    pub filled: usize,
    /// Merged entries whose slot is also held by another file. Both are
    /// kept; Xcode reports the set as ambiguous until one is removed.
    pub conflicts: usize,
}

impl Contents {
    /// Load from `path`. A missing file yields the empty skeleton; a file
    /// that exists but does not parse is an error and is never overwritten.
    pub fn load(path: &Path) -> Result<Self, ContentsError> {
        let content = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e.into()),
        };
        serde_json::from_str(&content).map_err(|source| ContentsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write to `path`, creating the asset set directory if needed.
    pub fn save(&self, path: &Path) -> Result<(), ContentsError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_xcode_json()?)?;
        Ok(())
    }

    /// Serialize the way Xcode does: two-space indent, `"key" : value`,
    /// trailing newline.
    pub fn to_xcode_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        let mut buf = Vec::new();
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, XcodeFormatter::new());
        // through Value so top-level keys kept from the old file sort too
        serde_json::to_value(self)?.serialize(&mut ser)?;
        buf.push(b'\n');
        Ok(buf)
    }

    /// Fold `entries` into the manifest. See the [module docs](self).
    pub fn merge(&mut self, entries: impl IntoIterator<Item = ContentsImage>) -> MergeStats {
        let mut stats = MergeStats::default();

        for entry in entries {
            let rivals = self.slot_rivals(&entry);
            if !rivals.is_empty() {
                log::warn!(
                    "{} shares its {} slot with {}",
                    entry.filename.as_deref().unwrap_or_default(),
                    entry.slot_label(),
                    rivals.join(", ")
                );
                stats.conflicts += 1;
            }

            let Some(filename) = entry.filename.clone() else {
                self.images.push(entry);
                stats.added += 1;
                continue;
            };

            let same_file = self
                .images
                .iter()
                .position(|img| img.filename.as_deref() == Some(filename.as_str()));
            if let Some(idx) = same_file {
                let old = std::mem::replace(&mut self.images[idx], ContentsImage::placeholder());
                self.images[idx] = ContentsImage::absorb(old, entry);
                self.drop_duplicates_of(&filename);
                stats.replaced += 1;
                continue;
            }

            let free_slot = self
                .images
                .iter()
                .position(|img| img.filename.is_none() && img.same_slot(&entry));
            if let Some(idx) = free_slot {
                let old = std::mem::replace(&mut self.images[idx], ContentsImage::placeholder());
                self.images[idx] = ContentsImage::absorb(old, entry);
                stats.filled += 1;
                continue;
            }

            self.images.push(entry);
            stats.added += 1;
        }

        stats
    }

    /// Other files already assigned to the slot `entry` describes.
    fn slot_rivals(&self, entry: &ContentsImage) -> Vec<String> {
        let Some(filename) = entry.filename.as_deref() else {
            return Vec::new();
        };
        self.images
            .iter()
            .filter(|img| img.same_slot(entry))
            .filter_map(|img| img.filename.as_deref())
            .filter(|name| *name != filename)
            .map(str::to_string)
            .collect()
    }

    /// Keep only the first entry named `filename`.
    fn drop_duplicates_of(&mut self, filename: &str) {
        let mut seen = false;
        self.images.retain(|img| {
            if img.filename.as_deref() != Some(filename) {
                return true;
            }
            let keep = !seen;
            seen = true;
            keep
        });
    }

    /// Filenames referenced by the manifest, in order.
    pub fn filenames(&self) -> Vec<&str> {
        self.images
            .iter()
            .filter_map(|img| img.filename.as_deref())
            .collect()
    }

    pub fn find(&self, filename: &str) -> Option<&ContentsImage> {
        self.images
            .iter()
            .find(|img| img.filename.as_deref() == Some(filename))
    }
}

/// `PrettyFormatter` with Xcode's `" : "` key separator.
struct XcodeFormatter<'a> {
    inner: PrettyFormatter<'a>,
}

impl XcodeFormatter<'_> {
    fn new() -> Self {
        Self {
            inner: PrettyFormatter::with_indent(b"  "),
        }
    }
}

impl Formatter for XcodeFormatter<'_> {
    fn begin_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_array(writer)
    }

    fn end_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_array(writer)
    }

    fn begin_array_value<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.inner.begin_array_value(writer, first)
    }

    fn end_array_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_array_value(writer)
    }

    fn begin_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_object(writer)
    }

    fn end_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_object(writer)
    }

    fn begin_object_key<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.inner.begin_object_key(writer, first)
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        writer.write_all(b" : ")
    }

    fn end_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_object_value(writer)
    }
}
