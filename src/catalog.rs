//! Static catalog of iOS output templates.
//!
//! Every image Xcode needs is described by one [`IosTemplate`] constant. A
//! template carries everything required to render the file (pixel size) and
//! to describe it in the asset set's `Contents.json` (idiom, scale, point
//! size, appearance). Templates are grouped by [`AssetKind`]:
//!
//! | Kind | Asset set | Fit |
//! |------|-----------|-----|
//! | `icon` | `AppIcon.appiconset` | contain |
//! | `notification-icon` | `AppIcon.appiconset` | contain |
//! | `settings-icon` | `AppIcon.appiconset` | contain |
//! | `spotlight-icon` | `AppIcon.appiconset` | contain |
//! | `splash` | `Splash.imageset` | cover |
//! | `splash-dark` | `Splash.imageset` | cover |
//!
//! The table is pure data; rendering lives in [`generate`](crate::generate).

use crate::imaging::Fit;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// App icon asset set, relative to the iOS platform directory.
pub const IOS_APP_ICON_SET_PATH: &str = "App/Assets.xcassets/AppIcon.appiconset";

/// Splash screen image set, relative to the iOS platform directory.
pub const IOS_SPLASH_IMAGE_SET_PATH: &str = "App/Assets.xcassets/Splash.imageset";

/// The role an output image plays in the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AssetKind {
    Icon,
    NotificationIcon,
    SettingsIcon,
    SpotlightIcon,
    Splash,
    SplashDark,
}

impl AssetKind {
    /// Every kind, in generation order.
    pub const ALL: [AssetKind; 6] = [
        AssetKind::Icon,
        AssetKind::NotificationIcon,
        AssetKind::SettingsIcon,
        AssetKind::SpotlightIcon,
        AssetKind::Splash,
        AssetKind::SplashDark,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AssetKind::Icon => "icon",
            AssetKind::NotificationIcon => "notification-icon",
            AssetKind::SettingsIcon => "settings-icon",
            AssetKind::SpotlightIcon => "spotlight-icon",
            AssetKind::Splash => "splash",
            AssetKind::SplashDark => "splash-dark",
        }
    }

    pub fn is_icon(self) -> bool {
        !self.is_splash()
    }

    pub fn is_splash(self) -> bool {
        matches!(self, AssetKind::Splash | AssetKind::SplashDark)
    }

    /// Icons are fit into their square; splashes are cropped to fill.
    pub fn fit(self) -> Fit {
        if self.is_splash() {
            Fit::Cover
        } else {
            Fit::Contain
        }
    }

    /// Asset set directory the kind's files live in.
    pub fn asset_set_path(self) -> &'static str {
        if self.is_splash() {
            IOS_SPLASH_IMAGE_SET_PATH
        } else {
            IOS_APP_ICON_SET_PATH
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AssetKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                let names: Vec<&str> = AssetKind::ALL.iter().map(|k| k.as_str()).collect();
                format!("unknown asset kind '{s}' (expected one of: {})", names.join(", "))
            })
    }
}

/// Device class an image targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Idiom {
    #[serde(rename = "universal")]
    Universal,
    #[serde(rename = "iphone")]
    Iphone,
    #[serde(rename = "ipad")]
    Ipad,
    #[serde(rename = "ios-marketing")]
    IosMarketing,
}

impl Idiom {
    pub fn as_str(self) -> &'static str {
        match self {
            Idiom::Universal => "universal",
            Idiom::Iphone => "iphone",
            Idiom::Ipad => "ipad",
            Idiom::IosMarketing => "ios-marketing",
        }
    }
}

impl fmt::Display for Idiom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Appearance variant. Absent means "any appearance".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Appearance {
    Dark,
}

impl Appearance {
    pub fn as_str(self) -> &'static str {
        match self {
            Appearance::Dark => "dark",
        }
    }
}

/// Descriptor of one required output image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IosTemplate {
    /// Output filename, also the key in `Contents.json`.
    pub name: &'static str,
    pub kind: AssetKind,
    pub idiom: Idiom,
    /// Pixel dimensions of the generated file.
    pub width: u32,
    pub height: u32,
    pub scale: u32,
    pub appearance: Option<Appearance>,
}

impl IosTemplate {
    /// Scale as written in `Contents.json`, e.g. `"2x"`.
    pub fn scale_label(&self) -> String {
        format!("{}x", self.scale)
    }

    /// Point size as written in an app icon set, e.g. `"20x20"` or `"83.5x83.5"`.
    ///
    /// Image sets (splashes) carry no size, so this is `None` for them.
    pub fn point_size(&self) -> Option<String> {
        if self.kind.is_splash() {
            return None;
        }
        let w = format_points(self.width, self.scale);
        let h = format_points(self.height, self.scale);
        Some(format!("{w}x{h}"))
    }

    /// Destination relative to the iOS platform directory.
    pub fn relative_path(&self) -> PathBuf {
        PathBuf::from(self.kind.asset_set_path()).join(self.name)
    }
}

/// Points = pixels / scale, printed without a trailing `.0`.
fn format_points(pixels: u32, scale: u32) -> String {
    if pixels % scale == 0 {
        (pixels / scale).to_string()
    } else {
        format!("{}", pixels as f64 / scale as f64)
    }
}

const fn icon(
    name: &'static str,
    kind: AssetKind,
    idiom: Idiom,
    pixels: u32,
    scale: u32,
) -> IosTemplate {
    IosTemplate {
        name,
        kind,
        idiom,
        width: pixels,
        height: pixels,
        scale,
        appearance: None,
    }
}

// App icon proper
pub const IOS_60_2X_ICON: IosTemplate =
    icon("AppIcon-60x60@2x.png", AssetKind::Icon, Idiom::Iphone, 120, 2);
pub const IOS_60_3X_ICON: IosTemplate =
    icon("AppIcon-60x60@3x.png", AssetKind::Icon, Idiom::Iphone, 180, 3);
pub const IOS_76_1X_ICON: IosTemplate =
    icon("AppIcon-76x76@1x.png", AssetKind::Icon, Idiom::Ipad, 76, 1);
pub const IOS_76_2X_ICON: IosTemplate =
    icon("AppIcon-76x76@2x.png", AssetKind::Icon, Idiom::Ipad, 152, 2);
pub const IOS_83_5_2X_ICON: IosTemplate =
    icon("AppIcon-83.5x83.5@2x.png", AssetKind::Icon, Idiom::Ipad, 167, 2);
pub const IOS_1024_ICON: IosTemplate =
    icon("AppIcon-512@2x.png", AssetKind::Icon, Idiom::IosMarketing, 1024, 1);

// Notification
pub const IOS_20_1X_IPAD_NOTIFICATION_ICON: IosTemplate = icon(
    "AppIcon-20x20@1x.png",
    AssetKind::NotificationIcon,
    Idiom::Ipad,
    20,
    1,
);
pub const IOS_20_2X_NOTIFICATION_ICON: IosTemplate = icon(
    "AppIcon-20x20@2x.png",
    AssetKind::NotificationIcon,
    Idiom::Iphone,
    40,
    2,
);
pub const IOS_20_2X_IPAD_NOTIFICATION_ICON: IosTemplate = icon(
    "AppIcon-20x20@2x-1.png",
    AssetKind::NotificationIcon,
    Idiom::Ipad,
    40,
    2,
);
pub const IOS_20_3X_NOTIFICATION_ICON: IosTemplate = icon(
    "AppIcon-20x20@3x.png",
    AssetKind::NotificationIcon,
    Idiom::Iphone,
    60,
    3,
);

// Settings
pub const IOS_29_1X_IPAD_SETTINGS_ICON: IosTemplate = icon(
    "AppIcon-29x29@1x.png",
    AssetKind::SettingsIcon,
    Idiom::Ipad,
    29,
    1,
);
pub const IOS_29_2X_SETTINGS_ICON: IosTemplate = icon(
    "AppIcon-29x29@2x.png",
    AssetKind::SettingsIcon,
    Idiom::Iphone,
    58,
    2,
);
pub const IOS_29_2X_IPAD_SETTINGS_ICON: IosTemplate = icon(
    "AppIcon-29x29@2x-1.png",
    AssetKind::SettingsIcon,
    Idiom::Ipad,
    58,
    2,
);
pub const IOS_29_3X_SETTINGS_ICON: IosTemplate = icon(
    "AppIcon-29x29@3x.png",
    AssetKind::SettingsIcon,
    Idiom::Iphone,
    87,
    3,
);

// Spotlight
pub const IOS_40_1X_IPAD_SPOTLIGHT_ICON: IosTemplate = icon(
    "AppIcon-40x40@1x.png",
    AssetKind::SpotlightIcon,
    Idiom::Ipad,
    40,
    1,
);
pub const IOS_40_2X_SPOTLIGHT_ICON: IosTemplate = icon(
    "AppIcon-40x40@2x.png",
    AssetKind::SpotlightIcon,
    Idiom::Iphone,
    80,
    2,
);
pub const IOS_40_2X_IPAD_SPOTLIGHT_ICON: IosTemplate = icon(
    "AppIcon-40x40@2x-1.png",
    AssetKind::SpotlightIcon,
    Idiom::Ipad,
    80,
    2,
);
pub const IOS_40_3X_SPOTLIGHT_ICON: IosTemplate = icon(
    "AppIcon-40x40@3x.png",
    AssetKind::SpotlightIcon,
    Idiom::Iphone,
    120,
    3,
);

// Splash
pub const IOS_2X_UNIVERSAL_ANYANY_SPLASH: IosTemplate = IosTemplate {
    name: "Default@2x~universal~anyany.png",
    kind: AssetKind::Splash,
    idiom: Idiom::Universal,
    width: 2732,
    height: 2732,
    scale: 2,
    appearance: None,
};
pub const IOS_2X_UNIVERSAL_ANYANY_SPLASH_DARK: IosTemplate = IosTemplate {
    name: "Default@2x~universal~anyany-dark.png",
    kind: AssetKind::SplashDark,
    idiom: Idiom::Universal,
    width: 2732,
    height: 2732,
    scale: 2,
    appearance: Some(Appearance::Dark),
};

static TEMPLATES: &[IosTemplate] = &[
    IOS_60_2X_ICON,
    IOS_60_3X_ICON,
    IOS_76_1X_ICON,
    IOS_76_2X_ICON,
    IOS_83_5_2X_ICON,
    IOS_1024_ICON,
    IOS_20_1X_IPAD_NOTIFICATION_ICON,
    IOS_20_2X_NOTIFICATION_ICON,
    IOS_20_2X_IPAD_NOTIFICATION_ICON,
    IOS_20_3X_NOTIFICATION_ICON,
    IOS_29_1X_IPAD_SETTINGS_ICON,
    IOS_29_2X_SETTINGS_ICON,
    IOS_29_2X_IPAD_SETTINGS_ICON,
    IOS_29_3X_SETTINGS_ICON,
    IOS_40_1X_IPAD_SPOTLIGHT_ICON,
    IOS_40_2X_SPOTLIGHT_ICON,
    IOS_40_2X_IPAD_SPOTLIGHT_ICON,
    IOS_40_3X_SPOTLIGHT_ICON,
    IOS_2X_UNIVERSAL_ANYANY_SPLASH,
    IOS_2X_UNIVERSAL_ANYANY_SPLASH_DARK,
];

/// Every template in the catalog.
pub fn templates() -> &'static [IosTemplate] {
    TEMPLATES
}

/// Templates of one kind, in catalog order.
pub fn templates_for(kind: AssetKind) -> Vec<&'static IosTemplate> {
    TEMPLATES.iter().filter(|t| t.kind == kind).collect()
}

/// Look up a template by output filename.
pub fn find(name: &str) -> Option<&'static IosTemplate> {
    TEMPLATES.iter().find(|t| t.name == name)
}
