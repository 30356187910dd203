//! CLI output formatting for all commands.
//!
//! Every command has a pure `format_*` function returning lines and a thin
//! `print_*` wrapper writing them to stdout, so the layout is unit tested
//! without capturing output.
//!
//! # Output Format
//!
//! ## Generate
//!
//! ```text
//! icon (6 images) from icon.png 1024x1024
//!     AppIcon-60x60@2x.png 120x120
//!     AppIcon-60x60@3x.png 180x180
//!     Contents.json: 6 added, 0 replaced, 0 filled
//! Generated 6 images (1 kind) in ios/App
//! ```
//!
//! ## List
//!
//! ```text
//! icon → App/Assets.xcassets/AppIcon.appiconset
//!     AppIcon-60x60@2x.png  120x120  iphone  60x60 @2x
//! ```
//!
//! ## Check
//!
//! ```text
//! Sources (assets)
//!     icon: icon.png
//!     splash: missing
//!
//! Kinds
//!     icon ← icon.png
//!     splash-dark ← logo.png (logo on #111111)
//!     splash: no source
//! ```

use crate::catalog::{AssetKind, templates_for};
use crate::generate::{GenerateEvent, OutputAsset};
use crate::project::{InputAssets, SourcePlan};
use std::collections::BTreeSet;
use std::path::Path;

fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn plural(count: usize, one: &str, many: &str) -> String {
    if count == 1 {
        format!("{count} {one}")
    } else {
        format!("{count} {many}")
    }
}

// ============================================================================
// Generate
// ============================================================================

/// Format one progress event from the generate stage.
pub fn format_generate_event(event: &GenerateEvent) -> Vec<String> {
    match event {
        GenerateEvent::KindStarted {
            kind,
            source,
            source_size: (w, h),
            from_logo,
            count,
        } => {
            let from = if *from_logo { "from logo" } else { "from" };
            vec![format!(
                "{kind} ({}) {from} {} {w}x{h}",
                plural(*count, "image", "images"),
                file_name(source)
            )]
        }
        GenerateEvent::AssetWritten {
            name,
            width,
            height,
            ..
        } => vec![format!("{}{name} {width}x{height}", indent(1))],
        GenerateEvent::ManifestUpdated { path, stats, .. } => {
            let mut line = format!(
                "{}{}: {} added, {} replaced, {} filled",
                indent(1),
                file_name(path),
                stats.added,
                stats.replaced,
                stats.filled
            );
            if stats.conflicts > 0 {
                line.push_str(&format!(
                    ", {} sharing a slot with another file",
                    stats.conflicts
                ));
            }
            vec![line]
        }
    }
}

/// Format the closing line of a generate run.
pub fn format_summary(outputs: &[OutputAsset], ios_path: &Path) -> Vec<String> {
    if outputs.is_empty() {
        return vec!["Nothing to generate: no source images found".to_string()];
    }
    let kinds: BTreeSet<AssetKind> = outputs.iter().map(|o| o.template.kind).collect();
    vec![format!(
        "Generated {} ({}) in {}",
        plural(outputs.len(), "image", "images"),
        plural(kinds.len(), "kind", "kinds"),
        ios_path.display()
    )]
}

pub fn print_summary(outputs: &[OutputAsset], ios_path: &Path) {
    for line in format_summary(outputs, ios_path) {
        println!("{line}");
    }
}

// ============================================================================
// List
// ============================================================================

/// Format the template catalog, optionally restricted to one kind.
pub fn format_catalog(only: Option<AssetKind>) -> Vec<String> {
    let mut lines = Vec::new();
    for kind in AssetKind::ALL
        .into_iter()
        .filter(|k| only.is_none_or(|o| o == *k))
    {
        lines.push(format!("{kind} → {}", kind.asset_set_path()));
        for t in templates_for(kind) {
            let mut line = format!(
                "{}{:<38}{:>9}  {:<13}",
                indent(1),
                t.name,
                format!("{}x{}", t.width, t.height),
                t.idiom.as_str()
            );
            if let Some(size) = t.point_size() {
                line.push_str(&format!(" {size}"));
            }
            line.push_str(&format!(" @{}", t.scale_label()));
            if let Some(appearance) = t.appearance {
                line.push_str(&format!(" {}", appearance.as_str()));
            }
            lines.push(line.trim_end().to_string());
        }
    }
    lines
}

pub fn print_catalog(only: Option<AssetKind>) {
    for line in format_catalog(only) {
        println!("{line}");
    }
}

// ============================================================================
// Check
// ============================================================================

/// Format discovered sources and the kinds they enable.
pub fn format_sources(assets: &InputAssets, project_root: &Path) -> Vec<String> {
    let dir = assets
        .dir
        .strip_prefix(project_root)
        .unwrap_or(&assets.dir)
        .display()
        .to_string();
    let mut lines = vec![format!("Sources ({dir})")];
    for (role, path) in assets.roles() {
        let found = path.map(file_name).unwrap_or_else(|| "missing".to_string());
        lines.push(format!("{}{role}: {found}", indent(1)));
    }

    lines.push(String::new());
    lines.push("Kinds".to_string());
    for kind in AssetKind::ALL {
        let line = match assets.source_for(kind) {
            Some(SourcePlan::Image { path, .. }) => {
                format!("{kind} ← {}", file_name(&path))
            }
            Some(SourcePlan::Logo {
                path, background, ..
            }) => format!("{kind} ← {} (logo on {background})", file_name(&path)),
            None => format!("{kind}: no source"),
        };
        lines.push(format!("{}{line}", indent(1)));
    }
    lines
}

pub fn print_sources(assets: &InputAssets, project_root: &Path) {
    for line in format_sources(assets, project_root) {
        println!("{line}");
    }
}
