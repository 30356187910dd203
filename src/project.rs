//! Project layout and source discovery.
//!
//! A project is a directory holding an optional `assets.toml`, a source
//! image directory and the native iOS platform directory:
//!
//! ```text
//! my-app/
//! ├── assets.toml
//! ├── assets/                  # or resources/
//! │   ├── icon.png             # or icon-only.png
//! │   ├── splash.png
//! │   ├── splash-dark.png
//! │   ├── logo.png             # splash fallback, centered on a solid color
//! │   ├── logo-dark.png
//! │   ├── icon-notification.png
//! │   ├── icon-settings.png
//! │   └── icon-spotlight.png
//! └── ios/App/
//! ```
//!
//! Each role is looked up by file stem; the first stem/extension pair that
//! exists wins. Extensions are tried in [`supported_input_extensions`] order.

use crate::catalog::AssetKind;
use crate::config::{self, AssetsConfig, ConfigError};
use crate::imaging::{Color, supported_input_extensions};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Directory tried when the configured assets directory does not exist.
pub const FALLBACK_ASSETS_DIR: &str = "resources";

#[derive(Error, Debug)]
pub enum ProjectError {
    #[error("Project directory not found: {0}")]
    NotFound(PathBuf),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// A loaded project: root directory plus resolved configuration.
#[derive(Debug, Clone)]
pub struct Project {
    pub root: PathBuf,
    pub config: AssetsConfig,
}

impl Project {
    /// Load the project rooted at `root`, reading `assets.toml` if present.
    pub fn load(root: &Path) -> Result<Self, ProjectError> {
        if !root.is_dir() {
            return Err(ProjectError::NotFound(root.to_path_buf()));
        }
        let config = config::load_config(root)?;
        log::debug!("loaded project at {}", root.display());
        Ok(Self::with_config(root, config))
    }

    pub fn with_config(root: &Path, config: AssetsConfig) -> Self {
        Self {
            root: root.to_path_buf(),
            config,
        }
    }

    /// The iOS platform directory.
    pub fn ios_path(&self) -> PathBuf {
        self.root.join(&self.config.ios.path)
    }

    /// Absolute directory of the asset set `kind` writes into.
    pub fn asset_set_dir(&self, kind: AssetKind) -> PathBuf {
        self.ios_path().join(kind.asset_set_path())
    }

    /// Source image directory. Falls back to `resources/` when the
    /// configured directory is missing and `resources/` exists.
    pub fn assets_dir(&self) -> PathBuf {
        let configured = self.root.join(&self.config.assets_dir);
        if configured.is_dir() {
            return configured;
        }
        let fallback = self.root.join(FALLBACK_ASSETS_DIR);
        if fallback.is_dir() {
            log::debug!(
                "{} missing, using {}",
                configured.display(),
                fallback.display()
            );
            return fallback;
        }
        configured
    }

    /// Discover every source image role in the assets directory.
    pub fn load_input_assets(&self) -> Result<InputAssets, ProjectError> {
        let dir = self.assets_dir();
        let find = |stems: &[&str]| find_source(&dir, stems);

        let assets = InputAssets {
            icon: find(&["icon", "icon-only"]),
            icon_notification: find(&["icon-notification"]),
            icon_settings: find(&["icon-settings"]),
            icon_spotlight: find(&["icon-spotlight"]),
            splash: find(&["splash"]),
            splash_dark: find(&["splash-dark"]),
            logo: find(&["logo"]),
            logo_dark: find(&["logo-dark"]),
            icon_background: self.config.icon_background()?,
            splash_background: self.config.splash_background()?,
            splash_background_dark: self.config.splash_background_dark()?,
            logo_scale: self.config.splash.logo_scale,
            dir,
        };
        for (role, path) in assets.roles() {
            if let Some(path) = path {
                log::debug!("source {role}: {}", path.display());
            }
        }
        Ok(assets)
    }
}

/// First `<dir>/<stem>.<ext>` that exists.
fn find_source(dir: &Path, stems: &[&str]) -> Option<PathBuf> {
    stems.iter().find_map(|stem| {
        supported_input_extensions()
            .into_iter()
            .map(|ext| dir.join(format!("{stem}.{ext}")))
            .find(|path| path.is_file())
    })
}

/// How a kind's outputs are produced.
#[derive(Debug, Clone, PartialEq)]
pub enum SourcePlan {
    /// Resize or crop an image. Icons carry the color alpha is flattened onto.
    Image {
        path: PathBuf,
        background: Option<Color>,
    },
    /// Center a logo on a solid canvas.
    Logo {
        path: PathBuf,
        background: Color,
        scale: f32,
    },
}

impl SourcePlan {
    pub fn path(&self) -> &Path {
        match self {
            SourcePlan::Image { path, .. } | SourcePlan::Logo { path, .. } => path,
        }
    }

    pub fn is_logo(&self) -> bool {
        matches!(self, SourcePlan::Logo { .. })
    }
}

/// Source images found in a project, one optional path per role.
#[derive(Debug, Clone)]
pub struct InputAssets {
    pub dir: PathBuf,
    pub icon: Option<PathBuf>,
    pub icon_notification: Option<PathBuf>,
    pub icon_settings: Option<PathBuf>,
    pub icon_spotlight: Option<PathBuf>,
    pub splash: Option<PathBuf>,
    pub splash_dark: Option<PathBuf>,
    pub logo: Option<PathBuf>,
    pub logo_dark: Option<PathBuf>,
    icon_background: Color,
    splash_background: Color,
    splash_background_dark: Color,
    logo_scale: f32,
}

impl InputAssets {
    /// Every role with the path found for it, in display order.
    pub fn roles(&self) -> Vec<(&'static str, Option<&Path>)> {
        vec![
            ("icon", self.icon.as_deref()),
            ("icon-notification", self.icon_notification.as_deref()),
            ("icon-settings", self.icon_settings.as_deref()),
            ("icon-spotlight", self.icon_spotlight.as_deref()),
            ("splash", self.splash.as_deref()),
            ("splash-dark", self.splash_dark.as_deref()),
            ("logo", self.logo.as_deref()),
            ("logo-dark", self.logo_dark.as_deref()),
        ]
    }

    /// Resolve the source for `kind`, or `None` when nothing usable exists.
    ///
    /// Role-specific icons fall back to the main icon. Splashes fall back to
    /// the logo; the dark splash tries `logo-dark` before `logo`.
    pub fn source_for(&self, kind: AssetKind) -> Option<SourcePlan> {
        let icon = |role: &Option<PathBuf>| {
            role.as_ref().or(self.icon.as_ref()).map(|path| SourcePlan::Image {
                path: path.clone(),
                background: Some(self.icon_background),
            })
        };
        let splash = |image: &Option<PathBuf>, logo: Option<&PathBuf>, background: Color| {
            match (image, logo) {
                (Some(path), _) => Some(SourcePlan::Image {
                    path: path.clone(),
                    background: None,
                }),
                (None, Some(path)) => Some(SourcePlan::Logo {
                    path: path.clone(),
                    background,
                    scale: self.logo_scale,
                }),
                (None, None) => None,
            }
        };

        match kind {
            AssetKind::Icon => icon(&None),
            AssetKind::NotificationIcon => icon(&self.icon_notification),
            AssetKind::SettingsIcon => icon(&self.icon_settings),
            AssetKind::SpotlightIcon => icon(&self.icon_spotlight),
            AssetKind::Splash => splash(&self.splash, self.logo.as_ref(), self.splash_background),
            AssetKind::SplashDark => splash(
                &self.splash_dark,
                self.logo_dark.as_ref().or(self.logo.as_ref()),
                self.splash_background_dark,
            ),
        }
    }

    /// Kinds that have a usable source, in generation order.
    pub fn available_kinds(&self) -> Vec<AssetKind> {
        AssetKind::ALL
            .into_iter()
            .filter(|kind| self.source_for(*kind).is_some())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn load_missing_root_is_error() {
        let tmp = TempDir::new().unwrap();
        let result = Project::load(&tmp.path().join("nope"));
        assert!(matches!(result, Err(ProjectError::NotFound(_))));
    }

    #[test]
    fn load_reads_config() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("assets.toml"), "[ios]\npath = \"native\"\n").unwrap();
        let project = Project::load(tmp.path()).unwrap();
        assert_eq!(project.ios_path(), tmp.path().join("native"));
    }

    #[test]
    fn asset_set_dir_per_kind() {
        let tmp = TempDir::new().unwrap();
        let project = Project::load(tmp.path()).unwrap();
        assert_eq!(
            project.asset_set_dir(AssetKind::SettingsIcon),
            tmp.path()
                .join("ios/App/App/Assets.xcassets/AppIcon.appiconset")
        );
        assert_eq!(
            project.asset_set_dir(AssetKind::SplashDark),
            tmp.path().join("ios/App/App/Assets.xcassets/Splash.imageset")
        );
    }

    #[test]
    fn assets_dir_falls_back_to_resources() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("resources")).unwrap();
        let project = Project::load(tmp.path()).unwrap();
        assert_eq!(project.assets_dir(), tmp.path().join("resources"));

        fs::create_dir_all(tmp.path().join("assets")).unwrap();
        assert_eq!(project.assets_dir(), tmp.path().join("assets"));
    }

    #[test]
    fn discovers_sources_by_stem() {
        let tmp = setup_project(&[("icon-only.jpg", 64, 64), ("splash.png", 32, 32)]);
        let project = Project::load(tmp.path()).unwrap();
        let assets = project.load_input_assets().unwrap();

        assert_eq!(assets.icon, Some(assets.dir.join("icon-only.jpg")));
        assert_eq!(assets.splash, Some(assets.dir.join("splash.png")));
        assert_eq!(assets.splash_dark, None);
    }

    #[test]
    fn icon_preferred_over_icon_only() {
        let tmp = setup_project(&[("icon.png", 8, 8), ("icon-only.png", 8, 8)]);
        let assets = Project::load(tmp.path()).unwrap().load_input_assets().unwrap();
        assert_eq!(assets.icon, Some(assets.dir.join("icon.png")));
    }

    #[test]
    fn unsupported_extensions_are_ignored() {
        let tmp = setup_project(&[]);
        fs::write(tmp.path().join("assets/icon.gif"), b"GIF89a").unwrap();
        let assets = Project::load(tmp.path()).unwrap().load_input_assets().unwrap();
        assert_eq!(assets.icon, None);
        assert_eq!(assets.source_for(AssetKind::Icon), None);
    }

    #[test]
    fn role_icons_fall_back_to_main_icon() {
        let tmp = setup_project(&[("icon.png", 8, 8), ("icon-settings.png", 8, 8)]);
        let assets = Project::load(tmp.path()).unwrap().load_input_assets().unwrap();

        let notification = assets.source_for(AssetKind::NotificationIcon).unwrap();
        assert_eq!(notification.path(), assets.dir.join("icon.png"));

        let settings = assets.source_for(AssetKind::SettingsIcon).unwrap();
        assert_eq!(settings.path(), assets.dir.join("icon-settings.png"));
        assert!(matches!(
            settings,
            SourcePlan::Image {
                background: Some(Color::WHITE),
                ..
            }
        ));
    }

    #[test]
    fn splash_prefers_image_over_logo() {
        let tmp = setup_project(&[("splash.png", 8, 8), ("logo.png", 8, 8)]);
        let assets = Project::load(tmp.path()).unwrap().load_input_assets().unwrap();
        let plan = assets.source_for(AssetKind::Splash).unwrap();
        assert_eq!(
            plan,
            SourcePlan::Image {
                path: assets.dir.join("splash.png"),
                background: None
            }
        );
    }

    #[test]
    fn dark_splash_falls_back_to_logo() {
        let tmp = setup_project(&[("logo.png", 8, 8)]);
        let assets = Project::load(tmp.path()).unwrap().load_input_assets().unwrap();

        let plan = assets.source_for(AssetKind::SplashDark).unwrap();
        assert!(plan.is_logo());
        assert_eq!(plan.path(), assets.dir.join("logo.png"));
        assert!(matches!(
            plan,
            SourcePlan::Logo { background, scale, .. }
                if background == Color([17, 17, 17, 255]) && scale == 0.2
        ));
    }

    #[test]
    fn dark_splash_prefers_dark_logo() {
        let tmp = setup_project(&[("logo.png", 8, 8), ("logo-dark.png", 8, 8)]);
        let assets = Project::load(tmp.path()).unwrap().load_input_assets().unwrap();
        let plan = assets.source_for(AssetKind::SplashDark).unwrap();
        assert_eq!(plan.path(), assets.dir.join("logo-dark.png"));
    }

    #[test]
    fn available_kinds_follow_sources() {
        let tmp = setup_project(&[("splash.png", 8, 8)]);
        let assets = Project::load(tmp.path()).unwrap().load_input_assets().unwrap();
        assert_eq!(assets.available_kinds(), vec![AssetKind::Splash]);

        let tmp = setup_project(&[("icon.png", 8, 8)]);
        let assets = Project::load(tmp.path()).unwrap().load_input_assets().unwrap();
        assert_eq!(
            assets.available_kinds(),
            vec![
                AssetKind::Icon,
                AssetKind::NotificationIcon,
                AssetKind::SettingsIcon,
                AssetKind::SpotlightIcon,
            ]
        );
    }

    #[test]
    fn configured_colors_flow_into_plans() {
        let tmp = setup_project(&[("icon.png", 8, 8), ("logo.png", 8, 8)]);
        fs::write(
            tmp.path().join("assets.toml"),
            "[icon]\nbackground_color = \"#000\"\n[splash]\nbackground_color = \"#ff0000\"\n",
        )
        .unwrap();
        let assets = Project::load(tmp.path()).unwrap().load_input_assets().unwrap();

        assert!(matches!(
            assets.source_for(AssetKind::Icon),
            Some(SourcePlan::Image { background: Some(c), .. }) if c == Color([0, 0, 0, 255])
        ));
        assert!(matches!(
            assets.source_for(AssetKind::Splash),
            Some(SourcePlan::Logo { background, .. }) if background == Color([255, 0, 0, 255])
        ));
    }
}
