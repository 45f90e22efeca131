//! Color palettes and the single theme context that tracks which one is
//! active. The context optionally persists the choice in long-lived storage and
//! mirrors it onto a document target (`data-theme` plus a change event).

use crate::{session::KeyValueStore, state::Observable};
use serde::Serialize;
use std::{fmt, sync::Arc};
use tracing::{debug, warn};

/// Long-lived storage key of the selected theme.
pub const THEME_STORAGE_KEY: &str = "selectedTheme";
pub const DEFAULT_THEME: &str = "default";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ThemeColors {
    pub primary: &'static str,
    pub secondary: &'static str,
    pub accent: &'static str,
    pub text: &'static str,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Theme {
    pub slug: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub colors: ThemeColors,
}

/// Catalog in cycling order; `default` comes first.
pub static THEMES: [Theme; 20] = [
    Theme {
        slug: "default",
        name: "Default",
        description: "Tema original de Geminis Labs",
        colors: ThemeColors {
            primary: "#222831",
            secondary: "#283b48",
            accent: "#00a6c0",
            text: "#d8d7cc",
        },
    },
    Theme {
        slug: "dual-tech-human",
        name: "Dual Tech Human",
        description: "Moderno, equilibrado y con calidez humana",
        colors: ThemeColors {
            primary: "#0D1B2A",
            secondary: "#142A3B",
            accent: "#2DD4BF",
            text: "#F8FAFC",
        },
    },
    Theme {
        slug: "vibrant",
        name: "Vibrant",
        description: "Experimental para marketing con colores vibrantes",
        colors: ThemeColors {
            primary: "#111827",
            secondary: "#1F2937",
            accent: "#14F4C8",
            text: "#E5E7EB",
        },
    },
    Theme {
        slug: "warm-tech",
        name: "Warm Tech",
        description: "Alternativa con tono humano y cálido",
        colors: ThemeColors {
            primary: "#1C1A1A",
            secondary: "#302E2E",
            accent: "#FFB347",
            text: "#F8FAFC",
        },
    },
    Theme {
        slug: "light-elegance",
        name: "Light Elegance",
        description: "Matices blancos elegantes y profesionales",
        colors: ThemeColors {
            primary: "#FAFBFC",
            secondary: "#F4F6F8",
            accent: "#2563EB",
            text: "#1F2937",
        },
    },
    Theme {
        slug: "neural-connect",
        name: "Neural Connect",
        description: "Conexión neuronal humano-tecnológica",
        colors: ThemeColors {
            primary: "#0F0F23",
            secondary: "#1A1A2E",
            accent: "#8B5CF6",
            text: "#E2E8F0",
        },
    },
    Theme {
        slug: "human-pulse",
        name: "Human Pulse",
        description: "Latido humano con tecnología orgánica",
        colors: ThemeColors {
            primary: "#1A1B1E",
            secondary: "#2D2E33",
            accent: "#FF6B6B",
            text: "#F5F5F5",
        },
    },
    Theme {
        slug: "celestial-core",
        name: "Celestial Core",
        description: "Inspirado en energía cósmica y precisión orbital",
        colors: ThemeColors {
            primary: "#090E1A",
            secondary: "#1E2A44",
            accent: "#00C6FF",
            text: "#E0E8FF",
        },
    },
    Theme {
        slug: "quantum-veins",
        name: "Quantum Veins",
        description: "Energía en movimiento y redes de datos vivas",
        colors: ThemeColors {
            primary: "#0C0B1D",
            secondary: "#1C1A3A",
            accent: "#7F5AF0",
            text: "#EAE9FF",
        },
    },
    Theme {
        slug: "digital-life",
        name: "Digital Life",
        description: "Vida digital con pulsaciones orgánicas",
        colors: ThemeColors {
            primary: "#1A1B1E",
            secondary: "#2D2E33",
            accent: "#FF6B6B",
            text: "#F5F5F5",
        },
    },
    Theme {
        slug: "cosmic-nebula",
        name: "Cosmic Nebula",
        description: "Nebulosa cósmica con pulsaciones orgánicas",
        colors: ThemeColors {
            primary: "#090E1A",
            secondary: "#1E2A44",
            accent: "#00C6FF",
            text: "#E0E8FF",
        },
    },
    Theme {
        slug: "terra-nexus",
        name: "Terra Nexus",
        description: "Conexión entre tecnología, territorio y sostenibilidad",
        colors: ThemeColors {
            primary: "#1E1C16",
            secondary: "#2F3027",
            accent: "#A3E635",
            text: "#F5F5DC",
        },
    },
    Theme {
        slug: "urban-vibes",
        name: "Urban Vibes",
        description: "Vibración urbana con colores vibrantes",
        colors: ThemeColors {
            primary: "#111827",
            secondary: "#1F2937",
            accent: "#14F4C8",
            text: "#E5E7EB",
        },
    },
    Theme {
        slug: "neon-pulse",
        name: "Neon Pulse",
        description: "Pulsaciones neon con colores vibrantes",
        colors: ThemeColors {
            primary: "#0C0B1D",
            secondary: "#1C1A3A",
            accent: "#7F5AF0",
            text: "#EAE9FF",
        },
    },
    Theme {
        slug: "retro-future",
        name: "Retro Future",
        description: "Futuro retro con colores vibrantes",
        colors: ThemeColors {
            primary: "#111827",
            secondary: "#1F2937",
            accent: "#14F4C8",
            text: "#E5E7EB",
        },
    },
    Theme {
        slug: "monochrome-light",
        name: "Monochrome Light",
        description: "Elegancia monocromática clara con acentos vibrantes",
        colors: ThemeColors {
            primary: "#FFFFFF",
            secondary: "#F8FAFC",
            accent: "#EF4444",
            text: "#1F2937",
        },
    },
    Theme {
        slug: "steel-contrast",
        name: "Steel Contrast",
        description: "Grises metálicos con acentos de alto contraste",
        colors: ThemeColors {
            primary: "#374151",
            secondary: "#4B5563",
            accent: "#F59E0B",
            text: "#F9FAFB",
        },
    },
    Theme {
        slug: "forest-tech",
        name: "Forest Tech",
        description: "Tecnología orgánica con tonos verdes naturales",
        colors: ThemeColors {
            primary: "#064E3B",
            secondary: "#065F46",
            accent: "#10B981",
            text: "#ECFDF5",
        },
    },
    Theme {
        slug: "slate-professional",
        name: "Slate Professional",
        description: "Elegancia profesional con grises pizarra",
        colors: ThemeColors {
            primary: "#1E293B",
            secondary: "#334155",
            accent: "#0EA5E9",
            text: "#F1F5F9",
        },
    },
    Theme {
        slug: "ocean-depth",
        name: "Ocean Depth",
        description: "Profundidades oceánicas con azules intensos",
        colors: ThemeColors {
            primary: "#0C4A6E",
            secondary: "#0369A1",
            accent: "#0284C7",
            text: "#E0F2FE",
        },
    },
];

#[must_use]
pub fn find_theme(slug: &str) -> Option<&'static Theme> {
    THEMES.iter().find(|theme| theme.slug == slug)
}

fn position(slug: &str) -> usize {
    THEMES
        .iter()
        .position(|theme| theme.slug == slug)
        .unwrap_or(0)
}

/// Notification emitted on the document target after a theme switch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ThemeChanged {
    pub theme: &'static str,
    pub config: &'static Theme,
}

/// Rendering target the active theme is applied to.
pub trait ThemeDocument: Send + Sync {
    fn set_theme_attribute(&self, theme: &str);

    fn theme_changed(&self, event: ThemeChanged);
}

#[derive(Clone)]
pub struct ThemeContext {
    active: Observable<&'static str>,
    preferences: Option<Arc<dyn KeyValueStore>>,
    document: Option<Arc<dyn ThemeDocument>>,
}

impl fmt::Debug for ThemeContext {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("ThemeContext")
            .field("active", &self.current_theme())
            .field("preferences", &self.preferences.is_some())
            .field("document", &self.document.is_some())
            .finish()
    }
}

impl Default for ThemeContext {
    fn default() -> Self {
        Self::new()
    }
}

impl ThemeContext {
    #[must_use]
    pub fn new() -> Self {
        Self {
            active: Observable::new(DEFAULT_THEME),
            preferences: None,
            document: None,
        }
    }

    /// Attaches preference storage and restores the saved theme. A saved name
    /// that is not in the catalog falls back to `default`.
    #[must_use]
    pub fn with_preferences(mut self, preferences: Arc<dyn KeyValueStore>) -> Self {
        let restored = match preferences.get_item(THEME_STORAGE_KEY) {
            Some(saved) => find_theme(&saved).map_or_else(
                || {
                    warn!(theme = %saved, "unknown saved theme, using default");
                    DEFAULT_THEME
                },
                |theme| theme.slug,
            ),
            None => DEFAULT_THEME,
        };
        self.active.set(restored);
        self.preferences = Some(preferences);
        self
    }

    #[must_use]
    pub fn with_document(mut self, document: Arc<dyn ThemeDocument>) -> Self {
        self.document = Some(document);
        self
    }

    #[must_use]
    pub fn current_theme(&self) -> &'static str {
        self.active.get()
    }

    /// Palette of `name`, or of the active theme; unknown names resolve to
    /// `default`.
    #[must_use]
    pub fn theme_config(&self, name: Option<&str>) -> &'static Theme {
        let slug = match name {
            Some(name) => name,
            None => self.current_theme(),
        };
        find_theme(slug).unwrap_or(&THEMES[0])
    }

    #[must_use]
    pub fn all_themes(&self) -> &'static [Theme] {
        &THEMES
    }

    #[must_use]
    pub fn subscribe(&self) -> tokio::sync::watch::Receiver<&'static str> {
        self.active.subscribe()
    }

    /// Activates `name`. Unknown names return false and change nothing.
    pub fn set_theme(&self, name: &str) -> bool {
        let Some(theme) = find_theme(name) else {
            debug!(theme = name, "rejected unknown theme");
            return false;
        };

        self.active.set(theme.slug);

        if let Some(preferences) = &self.preferences {
            if let Err(err) = preferences.set_item(THEME_STORAGE_KEY, theme.slug) {
                warn!(theme = theme.slug, "failed to persist theme: {err}");
            }
        }

        if let Some(document) = &self.document {
            document.set_theme_attribute(theme.slug);
            document.theme_changed(ThemeChanged {
                theme: theme.slug,
                config: theme,
            });
        }

        true
    }

    /// Applies the active theme to the document target, if any.
    pub fn initialize(&self) {
        if let Some(document) = &self.document {
            document.set_theme_attribute(self.current_theme());
        }
    }

    /// Activates the following theme, wrapping to the first one.
    pub fn next_theme(&self) -> &'static str {
        let next = THEMES[(position(self.current_theme()) + 1) % THEMES.len()].slug;
        self.set_theme(next);
        next
    }

    /// Activates the preceding theme, wrapping to the last one.
    pub fn previous_theme(&self) -> &'static str {
        let index = position(self.current_theme());
        let previous = THEMES[index.checked_sub(1).unwrap_or(THEMES.len() - 1)].slug;
        self.set_theme(previous);
        previous
    }
}
