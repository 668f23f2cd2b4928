use crate::{
    core::{
        constants::{FLAG_ICON_ANCHOR, PIN_ICON_ANCHOR},
        geo::Point,
    },
    prelude::HashMap,
};
use serde::{Deserialize, Serialize};

/// The three marker icons the client knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IconKind {
    Origin,
    Destination,
    SelfPosition,
}

impl IconKind {
    /// Asset name the icon is published under
    pub fn asset_name(&self) -> &'static str {
        match self {
            IconKind::Origin => "green_flag_icon",
            IconKind::Destination => "pink_flag_icon",
            IconKind::SelfPosition => "cyan_pin_icon",
        }
    }

    /// Hot-spot inside the icon image, in pixels
    pub fn anchor(&self) -> Point {
        match self {
            IconKind::Origin | IconKind::Destination => FLAG_ICON_ANCHOR.into(),
            IconKind::SelfPosition => PIN_ICON_ANCHOR.into(),
        }
    }
}

/// Resolves icon names to image paths
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IconSet {
    pub base_path: String,
    pub extension: String,
    /// Full paths that replace the computed one for a given asset name
    pub overrides: HashMap<String, String>,
}

impl IconSet {
    pub fn resolve(&self, kind: IconKind) -> String {
        let name = kind.asset_name();
        if let Some(path) = self.overrides.get(name) {
            return path.clone();
        }
        let base = self.base_path.trim_end_matches('/');
        if base.is_empty() {
            format!("{}.{}", name, self.extension)
        } else {
            format!("{}/{}.{}", base, name, self.extension)
        }
    }
}

impl Default for IconSet {
    fn default() -> Self {
        Self {
            base_path: "static/img".to_string(),
            extension: "png".to_string(),
            overrides: HashMap::default(),
        }
    }
}
