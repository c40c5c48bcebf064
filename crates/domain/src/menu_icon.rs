use serde::{Deserialize, Serialize};

/// Closed set of icons a navigation entry can render with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MenuIcon {
    /// House glyph used for the landing dashboard.
    Home,
    /// People glyph.
    Users,
    /// Wrench glyph.
    Wrench,
    /// Box glyph.
    Package,
    /// Document glyph, also the fallback icon.
    FileText,
    /// Clipboard glyph.
    ClipboardList,
    /// Currency glyph.
    DollarSign,
    /// Bar chart glyph.
    BarChart3,
    /// Cog glyph.
    Settings,
}

/// Exhaustive name table. Lookups are exact and case-sensitive.
const ICON_REGISTRY: &[(&str, MenuIcon)] = &[
    ("Home", MenuIcon::Home),
    ("Users", MenuIcon::Users),
    ("Wrench", MenuIcon::Wrench),
    ("Package", MenuIcon::Package),
    ("FileText", MenuIcon::FileText),
    ("ClipboardList", MenuIcon::ClipboardList),
    ("DollarSign", MenuIcon::DollarSign),
    ("BarChart3", MenuIcon::BarChart3),
    ("Settings", MenuIcon::Settings),
];

impl MenuIcon {
    /// Icon used when a descriptor names no icon or an unknown one.
    pub const DEFAULT: Self = Self::FileText;

    /// Resolves an optional icon name, falling back to [`MenuIcon::DEFAULT`].
    #[must_use]
    pub fn resolve(name: Option<&str>) -> Self {
        name.and_then(Self::from_name).unwrap_or(Self::DEFAULT)
    }

    /// Looks up a registered icon name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        ICON_REGISTRY
            .iter()
            .find(|(registered, _)| *registered == name)
            .map(|(_, icon)| *icon)
    }

    /// Returns the stable registry name of this icon.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Users => "Users",
            Self::Wrench => "Wrench",
            Self::Package => "Package",
            Self::FileText => "FileText",
            Self::ClipboardList => "ClipboardList",
            Self::DollarSign => "DollarSign",
            Self::BarChart3 => "BarChart3",
            Self::Settings => "Settings",
        }
    }

    /// Returns all registered icons.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[MenuIcon] = &[
            MenuIcon::Home,
            MenuIcon::Users,
            MenuIcon::Wrench,
            MenuIcon::Package,
            MenuIcon::FileText,
            MenuIcon::ClipboardList,
            MenuIcon::DollarSign,
            MenuIcon::BarChart3,
            MenuIcon::Settings,
        ];

        ALL
    }
}

impl Default for MenuIcon {
    fn default() -> Self {
        Self::DEFAULT
    }
}
