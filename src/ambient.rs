/// Platform hint for "prefers dark". `None` means no signal is available,
/// e.g. a headless session with none of the usual environment set.
pub trait AmbientProbe {
    fn prefers_dark(&self) -> Option<bool>;
}

/// Reads the desktop's dark-mode hints from the environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemProbe;

impl AmbientProbe for SystemProbe {
    fn prefers_dark(&self) -> Option<bool> {
        from_env(
            std::env::var("GTK_THEME").ok().as_deref(),
            std::env::var("COLORFGBG").ok().as_deref(),
        )
    }
}

/// A probe with a canned answer, for tests and non-interactive runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedProbe(pub Option<bool>);

impl AmbientProbe for FixedProbe {
    fn prefers_dark(&self) -> Option<bool> {
        self.0
    }
}

fn from_env(gtk_theme: Option<&str>, colorfgbg: Option<&str>) -> Option<bool> {
    if let Some(theme) = gtk_theme {
        if theme.to_lowercase().contains("dark") {
            return Some(true);
        }
    }
    // COLORFGBG format: "fg;bg" - if bg < 8, it's a dark terminal
    if let Some(scheme) = colorfgbg {
        if let Some(bg) = scheme.split(';').next_back() {
            if let Ok(n) = bg.trim().parse::<u32>() {
                return Some(n < 8);
            }
        }
    }
    // An explicit non-dark GTK theme is a light hint
    if gtk_theme.is_some_and(|t| !t.trim().is_empty()) {
        return Some(false);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gtk_dark_theme() {
        assert_eq!(from_env(Some("Adwaita:dark"), None), Some(true));
    }

    #[test]
    fn test_gtk_light_theme() {
        assert_eq!(from_env(Some("Adwaita"), None), Some(false));
    }

    #[test]
    fn test_colorfgbg() {
        assert_eq!(from_env(None, Some("15;0")), Some(true));
        assert_eq!(from_env(None, Some("0;15")), Some(false));
        assert_eq!(from_env(None, Some("garbage")), None);
    }

    #[test]
    fn test_colorfgbg_beats_light_gtk() {
        assert_eq!(from_env(Some("Adwaita"), Some("15;0")), Some(true));
    }

    #[test]
    fn test_headless_has_no_signal() {
        assert_eq!(from_env(None, None), None);
        assert_eq!(FixedProbe(None).prefers_dark(), None);
    }
}
