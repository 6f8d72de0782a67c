//! Light/dark display preference: precedence, lifecycle and persistence.
//!
//! The resolved value lives in one owned [`PreferenceResolver`]; views get
//! it by reference through [`PreferenceResolver::lifecycle`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ambient::AmbientProbe;
use crate::error::Error;
use crate::store::PreferenceStore;

/// Key the preference is persisted under.
pub const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayPreference {
    Light,
    Dark,
}

impl DisplayPreference {
    /// Used when neither an override nor an ambient signal exists.
    pub const DEFAULT: DisplayPreference = DisplayPreference::Dark;

    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayPreference::Light => "light",
            DisplayPreference::Dark => "dark",
        }
    }

    pub fn is_dark(&self) -> bool {
        matches!(self, DisplayPreference::Dark)
    }

    pub fn toggled(&self) -> Self {
        match self {
            DisplayPreference::Light => DisplayPreference::Dark,
            DisplayPreference::Dark => DisplayPreference::Light,
        }
    }

    fn from_ambient(prefers_dark: bool) -> Self {
        if prefers_dark {
            DisplayPreference::Dark
        } else {
            DisplayPreference::Light
        }
    }
}

impl fmt::Display for DisplayPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DisplayPreference {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(DisplayPreference::Light),
            "dark" => Ok(DisplayPreference::Dark),
            other => Err(Error::InvalidInput(format!("unknown display preference {other:?}"))),
        }
    }
}

/// Preference precedence: persisted override, then ambient hint, then Dark.
pub fn initial(persisted: Option<DisplayPreference>, ambient: Option<bool>) -> DisplayPreference {
    persisted
        .or_else(|| ambient.map(DisplayPreference::from_ambient))
        .unwrap_or(DisplayPreference::DEFAULT)
}

/// Whether the theme has been decided yet. Nothing may be painted while
/// this is `Unresolved`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeLifecycle {
    #[default]
    Unresolved,
    Resolved(DisplayPreference),
}

impl ThemeLifecycle {
    pub fn preference(&self) -> Option<DisplayPreference> {
        match self {
            ThemeLifecycle::Unresolved => None,
            ThemeLifecycle::Resolved(p) => Some(*p),
        }
    }
}

/// Owns the display preference binding and the store that persists it.
pub struct PreferenceResolver<S> {
    store: S,
    state: ThemeLifecycle,
    /// Set once a persisted value was found or the user chose one; from
    /// then on ambient notifications are ignored.
    has_override: bool,
}

impl<S: PreferenceStore> PreferenceResolver<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            state: ThemeLifecycle::Unresolved,
            has_override: false,
        }
    }

    /// Read the stored override and the ambient hint once and settle the
    /// theme. A failed read counts as "no override".
    pub fn resolve(&mut self, probe: &dyn AmbientProbe) -> DisplayPreference {
        let persisted = self.read_persisted();
        self.has_override = persisted.is_some();
        let ambient = if persisted.is_none() { probe.prefers_dark() } else { None };
        let pref = initial(persisted, ambient);
        tracing::debug!(?persisted, ?ambient, resolved = %pref, "display preference resolved");
        self.state = ThemeLifecycle::Resolved(pref);
        pref
    }

    fn read_persisted(&self) -> Option<DisplayPreference> {
        match self.store.load(THEME_KEY) {
            Ok(Some(raw)) => match raw.parse() {
                Ok(pref) => Some(pref),
                Err(e) => {
                    tracing::warn!("ignoring stored theme: {e}");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                tracing::warn!("could not read theme preference: {e}");
                None
            }
        }
    }

    pub fn lifecycle(&self) -> &ThemeLifecycle {
        &self.state
    }

    pub fn current(&self) -> Option<DisplayPreference> {
        self.state.preference()
    }

    pub fn has_override(&self) -> bool {
        self.has_override
    }

    /// Apply an explicit choice. The binding changes before the store is
    /// touched, and a failed write only costs persistence for next session.
    pub fn set(&mut self, pref: DisplayPreference) {
        self.state = ThemeLifecycle::Resolved(pref);
        self.has_override = true;
        if let Err(e) = self.store.save(THEME_KEY, pref.as_str()) {
            tracing::warn!(theme = %pref, "theme active for this session only: {e}");
        }
    }

    pub fn toggle(&mut self) -> DisplayPreference {
        let next = self
            .current()
            .unwrap_or(DisplayPreference::DEFAULT)
            .toggled();
        self.set(next);
        next
    }

    /// Re-run precedence for a changed ambient hint. Returns the new value
    /// if it changed anything.
    pub fn on_ambient_change(&mut self, prefers_dark: Option<bool>) -> Option<DisplayPreference> {
        if self.has_override {
            return None;
        }
        let ThemeLifecycle::Resolved(old) = self.state else {
            return None;
        };
        let next = initial(None, prefers_dark);
        if next == old {
            return None;
        }
        tracing::debug!(from = %old, to = %next, "ambient theme changed");
        self.state = ThemeLifecycle::Resolved(next);
        Some(next)
    }

    pub fn into_store(self) -> S {
        self.store
    }
}
