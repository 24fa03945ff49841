//! Presentation state: active view, map layers, and panel visibility.

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator as _;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// Top-level screen.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum View {
    /// Landing screen.
    #[default]
    Home,
    /// Map, analysis, and chat.
    Dashboard,
    /// Usage documentation.
    Documentation,
}

/// Toggleable map overlay.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase", ascii_case_insensitive)]
pub enum Layer {
    /// Flood risk overlay.
    FloodRisk,
    /// Construction zone overlay.
    ConstructionZones,
    /// Terrain shading.
    Terrain,
    /// Land use classification.
    LandUse,
}

/// Visibility of each [`Layer`]. All layers start visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(clippy::struct_excessive_bools)]
pub struct LayerState {
    pub flood_risk: bool,
    pub construction_zones: bool,
    pub terrain: bool,
    pub land_use: bool,
}

impl Default for LayerState {
    fn default() -> Self {
        Self {
            flood_risk: true,
            construction_zones: true,
            terrain: true,
            land_use: true,
        }
    }
}

impl LayerState {
    const fn slot(&mut self, layer: Layer) -> &mut bool {
        match layer {
            Layer::FloodRisk => &mut self.flood_risk,
            Layer::ConstructionZones => &mut self.construction_zones,
            Layer::Terrain => &mut self.terrain,
            Layer::LandUse => &mut self.land_use,
        }
    }

    /// Whether `layer` is visible.
    #[must_use]
    pub const fn is_visible(&self, layer: Layer) -> bool {
        match layer {
            Layer::FloodRisk => self.flood_risk,
            Layer::ConstructionZones => self.construction_zones,
            Layer::Terrain => self.terrain,
            Layer::LandUse => self.land_use,
        }
    }

    /// Flips `layer` and returns its new visibility.
    pub const fn toggle(&mut self, layer: Layer) -> bool {
        let slot = self.slot(layer);
        *slot = !*slot;
        *slot
    }

    /// Layers paired with their visibility, in display order.
    pub fn iter(&self) -> impl Iterator<Item = (Layer, bool)> + '_ {
        Layer::iter().map(|layer| (layer, self.is_visible(layer)))
    }
}

/// Everything about the dashboard that is purely presentational.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewState {
    view: View,
    layers: LayerState,
    chat_open: bool,
    notifications_open: bool,
}

impl ViewState {
    /// Leaves the landing screen for the dashboard.
    pub const fn start(&mut self) {
        self.view = View::Dashboard;
    }

    /// Shows the documentation.
    pub const fn open_docs(&mut self) {
        self.view = View::Documentation;
    }

    /// Returns to the landing screen.
    pub const fn back_home(&mut self) {
        self.view = View::Home;
    }

    /// Current screen.
    #[must_use]
    pub const fn view(&self) -> View {
        self.view
    }

    /// Layer visibility.
    #[must_use]
    pub const fn layers(&self) -> &LayerState {
        &self.layers
    }

    /// Flips `layer` and returns its new visibility.
    pub const fn toggle_layer(&mut self, layer: Layer) -> bool {
        self.layers.toggle(layer)
    }

    /// Whether the chat panel is open.
    #[must_use]
    pub const fn chat_open(&self) -> bool {
        self.chat_open
    }

    /// Opens or closes the chat panel and returns the new state.
    pub(crate) const fn toggle_chat(&mut self) -> bool {
        self.chat_open = !self.chat_open;
        self.chat_open
    }

    /// Whether the alert panel is open.
    #[must_use]
    pub const fn notifications_open(&self) -> bool {
        self.notifications_open
    }

    /// Opens or closes the alert panel and returns the new state.
    pub const fn toggle_notifications(&mut self) -> bool {
        self.notifications_open = !self.notifications_open;
        self.notifications_open
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr as _;

    use super::*;

    #[test]
    fn layers_start_visible_and_toggle() {
        let mut view = ViewState::default();
        assert!(view.layers().iter().all(|(_, visible)| visible));

        assert!(!view.toggle_layer(Layer::Terrain));
        assert!(!view.layers().is_visible(Layer::Terrain));
        assert!(view.layers().is_visible(Layer::FloodRisk));
        assert!(view.toggle_layer(Layer::Terrain));
    }

    #[test]
    fn layer_names_are_camel_case() {
        assert_eq!(Layer::ConstructionZones.to_string(), "constructionZones");
        assert_eq!(Layer::from_str("landuse").unwrap(), Layer::LandUse);
        assert!(Layer::from_str("roads").is_err());
    }

    #[test]
    fn view_transitions() {
        let mut view = ViewState::default();
        assert_eq!(view.view(), View::Home);
        view.start();
        assert_eq!(view.view(), View::Dashboard);
        view.open_docs();
        assert_eq!(view.view(), View::Documentation);
        view.back_home();
        assert_eq!(view.view(), View::Home);
    }

    #[test]
    fn panels_start_closed() {
        let mut view = ViewState::default();
        assert!(!view.chat_open());
        assert!(!view.notifications_open());
        assert!(view.toggle_notifications());
        assert!(!view.toggle_notifications());
    }
}
