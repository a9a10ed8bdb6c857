//! Light/dark theme provider
//!
//! Games never branch on theme; only the platform layer reads the palette.

use serde::{Deserialize, Serialize};

use crate::store::{Store, SubscriptionId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ThemeMode {
    Light,
    #[default]
    Dark,
}

impl ThemeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }

    pub fn palette(&self) -> Palette {
        match self {
            ThemeMode::Light => Palette {
                background: "#800000",
                paper: "#800000",
                text_primary: "#ffffff",
            },
            ThemeMode::Dark => Palette {
                background: "#121212",
                paper: "#1e1e1e",
                text_primary: "#ffffff",
            },
        }
    }
}

/// Color tokens for the current mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: &'static str,
    pub paper: &'static str,
    pub text_primary: &'static str,
}

/// Owns the theme mode; consumers read or subscribe, only `toggle` writes
#[derive(Debug)]
pub struct ThemeProvider {
    mode: Store<ThemeMode>,
}

impl Default for ThemeProvider {
    fn default() -> Self {
        Self::new(ThemeMode::default())
    }
}

impl ThemeProvider {
    pub fn new(mode: ThemeMode) -> Self {
        Self {
            mode: Store::new(mode),
        }
    }

    pub fn mode(&self) -> ThemeMode {
        self.mode.get()
    }

    pub fn palette(&self) -> Palette {
        self.mode().palette()
    }

    pub fn subscribe(&self, listener: impl FnMut(&ThemeMode) + 'static) -> SubscriptionId {
        self.mode.subscribe(listener)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.mode.unsubscribe(id)
    }

    pub fn toggle(&self) -> ThemeMode {
        let mode = self.mode.update(|m| m.toggled());
        log::info!("Theme switched to {}", mode.as_str());
        mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_toggle_notifies() {
        let theme = ThemeProvider::default();
        assert_eq!(theme.mode(), ThemeMode::Dark);

        let last = Rc::new(Cell::new(None));
        let l = last.clone();
        theme.subscribe(move |m| l.set(Some(*m)));

        assert_eq!(theme.toggle(), ThemeMode::Light);
        assert_eq!(last.get(), Some(ThemeMode::Light));
        assert_eq!(theme.palette().background, "#800000");
    }
}
