//! Asset generation.
//!
//! Renders every catalog template of a kind from the project's source
//! image and records the results in the asset set's `Contents.json`.
//!
//! ## Pipeline
//!
//! For each requested [`AssetKind`]:
//!
//! 1. Resolve the source ([`SourcePlan`]): an image, or a logo for splashes.
//! 2. Check every destination's output format before writing anything.
//! 3. Render all templates in parallel with [rayon](https://docs.rs/rayon).
//! 4. Merge the produced entries into `Contents.json`, once, after every
//!    render of the kind finished.
//!
//! Kinds run one after another, so two kinds sharing an asset set never
//! merge into the same manifest concurrently.
//!
//! ## Output Structure
//!
//! ```text
//! ios/App/App/Assets.xcassets/
//! ├── AppIcon.appiconset/
//! │   ├── Contents.json
//! │   ├── AppIcon-512@2x.png            # 1024x1024 marketing icon
//! │   ├── AppIcon-60x60@2x.png
//! │   └── ...
//! └── Splash.imageset/
//!     ├── Contents.json
//!     ├── Default@2x~universal~anyany.png
//!     └── Default@2x~universal~anyany-dark.png
//! ```
//!
//! Progress is reported through an optional [`GenerateEvent`] channel.

use crate::catalog::{AssetKind, IosTemplate, templates_for};
use crate::contents::{Contents, ContentsError, ContentsImage, MergeStats, contents_path};
use crate::imaging::{
    BackendError, Fit, ImageBackend, OutputFormat, RustBackend, get_dimensions, plan_logo,
    plan_render,
};
use crate::project::{Project, ProjectError, SourcePlan};
use rayon::prelude::*;
use std::fs;
use std::path::PathBuf;
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image processing failed: {0}")]
    Imaging(#[from] BackendError),
    #[error("Contents.json error: {0}")]
    Contents(#[from] ContentsError),
    #[error("{0}")]
    Project(#[from] ProjectError),
    #[error("No source image for {kind} in {dir}")]
    SourceNotFound { kind: AssetKind, dir: PathBuf },
    #[error("iOS platform directory not found: {0}")]
    PlatformNotFound(PathBuf),
    #[error("Unsupported output format for {name}: {reason}")]
    UnsupportedFormat { name: String, reason: String },
}

/// A generated file and the template that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputAsset {
    pub template: &'static IosTemplate,
    pub dest: PathBuf,
}

/// Progress reported while generating.
#[derive(Debug, Clone)]
pub enum GenerateEvent {
    KindStarted {
        kind: AssetKind,
        source: PathBuf,
        /// Source pixel dimensions.
        source_size: (u32, u32),
        from_logo: bool,
        count: usize,
    },
    AssetWritten {
        kind: AssetKind,
        name: &'static str,
        width: u32,
        height: u32,
    },
    ManifestUpdated {
        kind: AssetKind,
        path: PathBuf,
        stats: MergeStats,
    },
}

/// Generate `kind` with the `image` crate backend.
pub fn generate(
    project: &Project,
    kind: AssetKind,
    events: Option<&Sender<GenerateEvent>>,
) -> Result<Vec<OutputAsset>, GenerateError> {
    let backend = RustBackend::new();
    generate_with_backend(&backend, project, kind, events)
}

/// Generate `kinds` in order, sharing one backend (and its decode cache).
///
/// An empty `kinds` means every kind that has a source; kinds without a
/// source are skipped in that case. Explicitly requested kinds without a
/// source fail with [`GenerateError::SourceNotFound`].
pub fn generate_all(
    project: &Project,
    kinds: &[AssetKind],
    events: Option<Sender<GenerateEvent>>,
) -> Result<Vec<OutputAsset>, GenerateError> {
    let backend = RustBackend::new();
    generate_all_with_backend(&backend, project, kinds, events)
}

/// [`generate_all`] with a specific backend (allows testing with mock).
pub fn generate_all_with_backend(
    backend: &impl ImageBackend,
    project: &Project,
    kinds: &[AssetKind],
    events: Option<Sender<GenerateEvent>>,
) -> Result<Vec<OutputAsset>, GenerateError> {
    let kinds = if kinds.is_empty() {
        let available = project.load_input_assets()?.available_kinds();
        if available.is_empty() {
            log::warn!("no source images found in {}", project.assets_dir().display());
        }
        available
    } else {
        kinds.to_vec()
    };

    let mut outputs = Vec::new();
    for kind in kinds {
        outputs.extend(generate_with_backend(backend, project, kind, events.as_ref())?);
    }
    Ok(outputs)
}

/// Generate one kind using a specific backend (allows testing with mock).
pub fn generate_with_backend(
    backend: &impl ImageBackend,
    project: &Project,
    kind: AssetKind,
    events: Option<&Sender<GenerateEvent>>,
) -> Result<Vec<OutputAsset>, GenerateError> {
    let ios = project.ios_path();
    if !ios.is_dir() {
        return Err(GenerateError::PlatformNotFound(ios));
    }

    let plan = project
        .load_input_assets()?
        .source_for(kind)
        .ok_or_else(|| GenerateError::SourceNotFound {
            kind,
            dir: project.assets_dir(),
        })?;

    let outputs: Vec<OutputAsset> = templates_for(kind)
        .into_iter()
        .map(|template| OutputAsset {
            template,
            dest: ios.join(template.relative_path()),
        })
        .collect();
    check_output_formats(&outputs)?;

    // Read the manifest up front so a corrupt one fails before any write.
    let set_dir = project.asset_set_dir(kind);
    let manifest_path = contents_path(&set_dir);
    let mut contents = Contents::load(&manifest_path)?;
    fs::create_dir_all(&set_dir)?;

    let source_size = get_dimensions(backend, plan.path())?;
    warn_if_upscaling(kind, &plan, source_size);
    log::info!(
        "generating {} {kind} image(s) from {}",
        outputs.len(),
        plan.path().display()
    );
    if let Some(tx) = events {
        tx.send(GenerateEvent::KindStarted {
            kind,
            source: plan.path().to_path_buf(),
            source_size,
            from_logo: plan.is_logo(),
            count: outputs.len(),
        })
        .ok();
    }

    outputs
        .par_iter()
        .try_for_each(|output| render_output(backend, &plan, output, events))?;

    let stats = contents.merge(
        outputs
            .iter()
            .map(|output| ContentsImage::from_template(output.template)),
    );
    contents.save(&manifest_path)?;
    log::debug!(
        "{}: {} added, {} replaced, {} filled, {} conflicts",
        manifest_path.display(),
        stats.added,
        stats.replaced,
        stats.filled,
        stats.conflicts
    );
    if let Some(tx) = events {
        tx.send(GenerateEvent::ManifestUpdated {
            kind,
            path: manifest_path,
            stats,
        })
        .ok();
    }

    Ok(outputs)
}

fn check_output_formats(outputs: &[OutputAsset]) -> Result<(), GenerateError> {
    for output in outputs {
        OutputFormat::from_path(&output.dest).map_err(|e| GenerateError::UnsupportedFormat {
            name: output.template.name.to_string(),
            reason: e.to_string(),
        })?;
    }
    Ok(())
}

fn render_output(
    backend: &impl ImageBackend,
    plan: &SourcePlan,
    output: &OutputAsset,
    events: Option<&Sender<GenerateEvent>>,
) -> Result<(), GenerateError> {
    let template = output.template;
    match plan {
        SourcePlan::Image { path, background } => {
            backend.render(&plan_render(template, path, &output.dest, *background))?
        }
        SourcePlan::Logo {
            path,
            background,
            scale,
        } => backend.compose_logo(&plan_logo(template, path, &output.dest, *scale, *background))?,
    }
    log::debug!("wrote {}", output.dest.display());

    if let Some(tx) = events {
        tx.send(GenerateEvent::AssetWritten {
            kind: template.kind,
            name: template.name,
            width: template.width,
            height: template.height,
        })
        .ok();
    }
    Ok(())
}

/// Image sources smaller than the largest output get blurry.
fn warn_if_upscaling(kind: AssetKind, plan: &SourcePlan, (width, height): (u32, u32)) {
    if plan.is_logo() {
        return;
    }
    let (need_w, need_h) = templates_for(kind)
        .iter()
        .fold((0, 0), |(w, h), t| (w.max(t.width), h.max(t.height)));
    let too_small = match kind.fit() {
        Fit::Contain => width.max(height) < need_w.max(need_h),
        Fit::Cover => width < need_w && height < need_h,
    };
    if too_small {
        log::warn!(
            "{} is {width}x{height}, smaller than the {need_w}x{need_h} {kind} output",
            plan.path().display()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{
        IOS_2X_UNIVERSAL_ANYANY_SPLASH, IOS_2X_UNIVERSAL_ANYANY_SPLASH_DARK, templates,
    };
    use crate::imaging::backend::tests::{MockBackend, RecordedOp};
    use crate::imaging::Color;
    use crate::test_helpers::*;
    use std::sync::mpsc;

    fn renders(ops: &[RecordedOp]) -> Vec<&RecordedOp> {
        ops.iter()
            .filter(|op| !matches!(op, RecordedOp::Identify(_)))
            .collect()
    }

    #[test]
    fn generate_icon_renders_every_template() {
        let tmp = setup_project(&[("icon.png", 8, 8)]);
        let project = Project::load(tmp.path()).unwrap();
        let backend = MockBackend::new();

        let outputs = generate_with_backend(&backend, &project, AssetKind::Icon, None).unwrap();

        assert_eq!(outputs.len(), templates_for(AssetKind::Icon).len());
        let ops = backend.get_operations();
        assert_eq!(renders(&ops).len(), outputs.len());
        for output in &outputs {
            assert_eq!(output.dest, project.ios_path().join(output.template.relative_path()));
            assert!(ops.iter().any(|op| matches!(
                op,
                RecordedOp::Render { output: o, width, height, fit: Fit::Contain, background: Some(Color::WHITE), .. }
                    if *o == output.dest.to_string_lossy()
                        && *width == output.template.width
                        && *height == output.template.height
            )));
        }
    }

    #[test]
    fn generate_identifies_source_once() {
        let tmp = setup_project(&[("icon.png", 8, 8)]);
        let project = Project::load(tmp.path()).unwrap();
        let backend = MockBackend::new();

        generate_with_backend(&backend, &project, AssetKind::SettingsIcon, None).unwrap();

        let identifies: Vec<_> = backend
            .get_operations()
            .into_iter()
            .filter(|op| matches!(op, RecordedOp::Identify(_)))
            .collect();
        assert_eq!(identifies.len(), 1);
    }

    #[test]
    fn generate_splash_uses_cover_without_background() {
        let tmp = setup_project(&[("splash.png", 8, 8)]);
        let project = Project::load(tmp.path()).unwrap();
        let backend = MockBackend::new();

        let outputs = generate_with_backend(&backend, &project, AssetKind::Splash, None).unwrap();

        assert_eq!(outputs.len(), 1);
        assert_eq!(outputs[0].template, &IOS_2X_UNIVERSAL_ANYANY_SPLASH);
        let ops = backend.get_operations();
        assert!(matches!(
            renders(&ops).as_slice(),
            [RecordedOp::Render {
                width: 2732,
                height: 2732,
                fit: Fit::Cover,
                background: None,
                ..
            }]
        ));
    }

    #[test]
    fn generate_dark_splash_from_logo() {
        let tmp = setup_project(&[("logo.png", 8, 8)]);
        let project = Project::load(tmp.path()).unwrap();
        let backend = MockBackend::new();

        generate_with_backend(&backend, &project, AssetKind::SplashDark, None).unwrap();

        let ops = backend.get_operations();
        assert!(matches!(
            renders(&ops).as_slice(),
            [RecordedOp::ComposeLogo { logo, background, .. }]
                if logo.ends_with("logo.png") && *background == Color([17, 17, 17, 255])
        ));
    }

    #[test]
    fn generate_writes_manifest_entries() {
        let tmp = setup_project(&[("splash.png", 8, 8), ("splash-dark.png", 8, 8)]);
        let project = Project::load(tmp.path()).unwrap();
        let backend = MockBackend::new();

        generate_with_backend(&backend, &project, AssetKind::Splash, None).unwrap();
        generate_with_backend(&backend, &project, AssetKind::SplashDark, None).unwrap();

        let contents = read_contents(&project, AssetKind::Splash);
        assert_eq!(
            contents.filenames(),
            vec![
                IOS_2X_UNIVERSAL_ANYANY_SPLASH.name,
                IOS_2X_UNIVERSAL_ANYANY_SPLASH_DARK.name
            ]
        );
    }

    #[test]
    fn generate_twice_is_idempotent() {
        let tmp = setup_project(&[("icon.png", 8, 8)]);
        let project = Project::load(tmp.path()).unwrap();
        let backend = MockBackend::new();

        generate_all_with_backend(&backend, &project, &[], None).unwrap();
        let first = read_contents(&project, AssetKind::Icon);
        generate_all_with_backend(&backend, &project, &[], None).unwrap();
        let second = read_contents(&project, AssetKind::Icon);

        assert_no_duplicate_filenames(&second);
        assert_eq!(first.images.len(), second.images.len());
        let icon_count = templates().iter().filter(|t| t.kind.is_icon()).count();
        assert_eq!(second.images.len(), icon_count);
    }

    #[test]
    fn generate_missing_source_is_error() {
        let tmp = setup_project(&[("icon.png", 8, 8)]);
        let project = Project::load(tmp.path()).unwrap();
        let backend = MockBackend::new();

        let result = generate_with_backend(&backend, &project, AssetKind::Splash, None);

        assert!(matches!(
            result,
            Err(GenerateError::SourceNotFound { kind: AssetKind::Splash, .. })
        ));
        assert!(backend.get_operations().is_empty());
    }

    #[test]
    fn generate_missing_platform_is_error() {
        let tmp = setup_project(&[("icon.png", 8, 8)]);
        std::fs::remove_dir_all(tmp.path().join("ios")).unwrap();
        let project = Project::load(tmp.path()).unwrap();

        let result = generate_with_backend(&MockBackend::new(), &project, AssetKind::Icon, None);

        assert!(matches!(result, Err(GenerateError::PlatformNotFound(_))));
    }

    #[test]
    fn generate_corrupt_manifest_fails_before_rendering() {
        let tmp = setup_project(&[("icon.png", 8, 8)]);
        let project = Project::load(tmp.path()).unwrap();
        let set_dir = project.asset_set_dir(AssetKind::Icon);
        std::fs::create_dir_all(&set_dir).unwrap();
        std::fs::write(contents_path(&set_dir), "{ not json").unwrap();
        let backend = MockBackend::new();

        let result = generate_with_backend(&backend, &project, AssetKind::Icon, None);

        assert!(matches!(result, Err(GenerateError::Contents(_))));
        assert!(backend.get_operations().is_empty());
        // Left untouched
        assert_eq!(
            std::fs::read_to_string(contents_path(&set_dir)).unwrap(),
            "{ not json"
        );
    }

    #[test]
    fn render_failure_skips_manifest_write() {
        let tmp = setup_project(&[("icon.png", 8, 8)]);
        let project = Project::load(tmp.path()).unwrap();
        let backend = MockBackend::failing_on("AppIcon-76x76@1x.png");

        let result = generate_with_backend(&backend, &project, AssetKind::Icon, None);

        assert!(matches!(result, Err(GenerateError::Imaging(_))));
        assert!(!contents_path(&project.asset_set_dir(AssetKind::Icon)).exists());
    }

    #[test]
    fn unwritable_destination_fails_with_io_error() {
        let tmp = setup_project(&[("icon.png", 8, 8)]);
        let project = Project::load(tmp.path()).unwrap();
        // a directory where a PNG should go
        let blocked = project
            .ios_path()
            .join(crate::catalog::IOS_20_2X_NOTIFICATION_ICON.relative_path());
        std::fs::create_dir_all(&blocked).unwrap();

        let result = generate_with_backend(
            &RustBackend::new(),
            &project,
            AssetKind::NotificationIcon,
            None,
        );

        assert!(
            matches!(result, Err(GenerateError::Imaging(BackendError::Io(_)))),
            "got {result:?}"
        );
        assert!(blocked.is_dir());
        assert!(!contents_path(&project.asset_set_dir(AssetKind::NotificationIcon)).exists());
    }

    #[test]
    fn generate_all_skips_kinds_without_source() {
        let tmp = setup_project(&[("splash.png", 8, 8)]);
        let project = Project::load(tmp.path()).unwrap();
        let backend = MockBackend::new();

        let outputs = generate_all_with_backend(&backend, &project, &[], None).unwrap();

        assert_eq!(outputs.len(), 1);
        assert_eq!(outputs[0].template.kind, AssetKind::Splash);
    }

    #[test]
    fn generate_all_explicit_kind_without_source_fails() {
        let tmp = setup_project(&[("splash.png", 8, 8)]);
        let project = Project::load(tmp.path()).unwrap();

        let result = generate_all_with_backend(
            &MockBackend::new(),
            &project,
            &[AssetKind::Splash, AssetKind::Icon],
            None,
        );

        assert!(matches!(
            result,
            Err(GenerateError::SourceNotFound { kind: AssetKind::Icon, .. })
        ));
    }

    #[test]
    fn generate_all_nothing_to_do() {
        let tmp = setup_project(&[]);
        let project = Project::load(tmp.path()).unwrap();
        let outputs = generate_all_with_backend(&MockBackend::new(), &project, &[], None).unwrap();
        assert!(outputs.is_empty());
    }

    #[test]
    fn events_are_reported_per_kind() {
        let tmp = setup_project(&[("icon.png", 8, 8)]);
        let project = Project::load(tmp.path()).unwrap();
        let backend = MockBackend::new();
        let (tx, rx) = mpsc::channel();

        generate_all_with_backend(&backend, &project, &[AssetKind::SpotlightIcon], Some(tx))
            .unwrap();
        let events: Vec<GenerateEvent> = rx.into_iter().collect();

        assert!(matches!(
            events.first(),
            Some(GenerateEvent::KindStarted {
                kind: AssetKind::SpotlightIcon,
                source_size: (1024, 1024),
                from_logo: false,
                count: 4,
                ..
            })
        ));
        let written = events
            .iter()
            .filter(|e| matches!(e, GenerateEvent::AssetWritten { .. }))
            .count();
        assert_eq!(written, 4);
        assert!(matches!(
            events.last(),
            Some(GenerateEvent::ManifestUpdated { stats, .. }) if stats.added == 4
        ));
    }

    #[test]
    fn unsupported_format_detected() {
        let outputs = vec![OutputAsset {
            template: &IOS_2X_UNIVERSAL_ANYANY_SPLASH,
            dest: PathBuf::from("/out/splash.gif"),
        }];
        assert!(matches!(
            check_output_formats(&outputs),
            Err(GenerateError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn every_catalog_template_has_supported_format() {
        let outputs: Vec<OutputAsset> = templates()
            .iter()
            .map(|template| OutputAsset {
                template,
                dest: template.relative_path(),
            })
            .collect();
        check_output_formats(&outputs).unwrap();
    }
}
