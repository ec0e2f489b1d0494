use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::Result;
use crate::store::{self, keys, KeyValueStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Light => f.write_str("light"),
            Theme::Dark => f.write_str("dark"),
        }
    }
}

/// The stored theme, if any.
pub fn stored<B: KeyValueStore + ?Sized>(backend: &B) -> Option<Theme> {
    store::get(backend, keys::THEME, None)
}

/// The stored theme, or `fallback` when none was ever saved.
pub fn get<B: KeyValueStore + ?Sized>(backend: &B, fallback: Theme) -> Theme {
    stored(backend).unwrap_or(fallback)
}

pub fn set<B: KeyValueStore + ?Sized>(backend: &B, theme: Theme) -> Result<()> {
    store::set(backend, keys::THEME, &theme)
}

/// Flip the theme and persist it. Returns the new theme.
pub fn toggle<B: KeyValueStore + ?Sized>(backend: &B, fallback: Theme) -> Result<Theme> {
    let next = get(backend, fallback).toggled();
    set(backend, next)?;
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::mem_backend::MemBackend;

    #[test]
    fn defaults_to_fallback() {
        let backend = MemBackend::new();
        assert_eq!(get(&backend, Theme::Light), Theme::Light);
        assert_eq!(get(&backend, Theme::Dark), Theme::Dark);
    }

    #[test]
    fn toggle_flips_and_persists() {
        let backend = MemBackend::new();
        assert_eq!(toggle(&backend, Theme::Light).unwrap(), Theme::Dark);
        assert_eq!(backend.raw(keys::THEME).as_deref(), Some("\"dark\""));
        assert_eq!(toggle(&backend, Theme::Light).unwrap(), Theme::Light);
    }

    #[test]
    fn unknown_stored_value_falls_back() {
        let backend = MemBackend::new();
        store::set(&backend, keys::THEME, "sepia").unwrap();
        assert_eq!(get(&backend, Theme::Dark), Theme::Dark);
    }
}
