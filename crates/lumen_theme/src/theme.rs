//! Themes and element lookup

use std::fmt;
use std::io::Read;
use std::sync::Arc;

use lumen_paint::Paint;
use lumen_raster::Surface;
use lumen_shapes::{AppearanceProvider, BlockFont, FontHandle};
use rustc_hash::FxHashMap;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::color::parse_paint;
use crate::{defaults, Result};

/// Block name holding theme-wide fallbacks
const DEFAULTS_BLOCK: &str = "defaults";

// ─────────────────────────────────────────────────────────────────────────────
// JSON layout
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawBlock {
    #[serde(alias = "colors")]
    colours: FxHashMap<String, String>,
    misc: FxHashMap<String, serde_json::Value>,
    transitions: FxHashMap<String, f32>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Element blocks
// ─────────────────────────────────────────────────────────────────────────────

/// Values themed for one element id
#[derive(Clone, Debug, Default)]
pub struct ElementTheme {
    colours: FxHashMap<String, Paint>,
    misc: FxHashMap<String, String>,
    /// Keyed `from_to`
    transitions: FxHashMap<String, f32>,
}

impl ElementTheme {
    pub fn color(&self, key: &str) -> Option<&Paint> {
        self.colours.get(key)
    }

    pub fn misc(&self, key: &str) -> Option<&str> {
        self.misc.get(key).map(String::as_str)
    }

    pub fn transition(&self, from: &str, to: &str) -> Option<f32> {
        self.transitions.get(&format!("{from}_{to}")).copied()
    }

    fn from_raw(raw: RawBlock) -> Result<Self> {
        let colours = raw
            .colours
            .into_iter()
            .map(|(key, value)| parse_paint(&value).map(|paint| (key, paint)))
            .collect::<Result<_>>()?;
        let misc = raw
            .misc
            .into_iter()
            .map(|(key, value)| {
                let text = match value {
                    serde_json::Value::String(text) => text,
                    other => other.to_string(),
                };
                (key, text)
            })
            .collect();
        Ok(Self {
            colours,
            misc,
            transitions: raw.transitions,
        })
    }

    /// Overlay `other` onto this block, `other` winning on conflicts
    fn merge(&mut self, other: ElementTheme) {
        self.colours.extend(other.colours);
        self.misc.extend(other.misc);
        self.transitions.extend(other.transitions);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Theme
// ─────────────────────────────────────────────────────────────────────────────

/// A complete theme: per-element blocks, defaults, fonts and images
pub struct Theme {
    defaults: ElementTheme,
    elements: FxHashMap<String, ElementTheme>,
    default_font: Arc<dyn FontHandle>,
    fonts: FxHashMap<String, Arc<dyn FontHandle>>,
    images: FxHashMap<(String, String), Arc<Surface>>,
}

impl Theme {
    /// A theme with only built-in defaults
    pub fn new() -> Self {
        Self {
            defaults: ElementTheme::default(),
            elements: FxHashMap::default(),
            default_font: Arc::new(BlockFont::default()),
            fonts: FxHashMap::default(),
            images: FxHashMap::default(),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let mut theme = Self::new();
        theme.merge_json_str(json)?;
        Ok(theme)
    }

    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self> {
        let raw: FxHashMap<String, RawBlock> = serde_json::from_reader(reader)?;
        let mut theme = Self::new();
        theme.merge_blocks(raw)?;
        Ok(theme)
    }

    /// Layer another theme document over this one
    ///
    /// Nothing is applied if the document fails to parse.
    pub fn merge_json_str(&mut self, json: &str) -> Result<()> {
        let raw: FxHashMap<String, RawBlock> = serde_json::from_str(json)?;
        self.merge_blocks(raw)
    }

    fn merge_blocks(&mut self, raw: FxHashMap<String, RawBlock>) -> Result<()> {
        let parsed = raw
            .into_iter()
            .map(|(id, block)| ElementTheme::from_raw(block).map(|element| (id, element)))
            .collect::<Result<Vec<_>>>()?;

        for (id, element) in parsed {
            debug!("theme block '{}' loaded", id);
            if id == DEFAULTS_BLOCK {
                self.defaults.merge(element);
            } else {
                self.elements.entry(id).or_default().merge(element);
            }
        }
        Ok(())
    }

    pub fn element(&self, id: &str) -> Option<&ElementTheme> {
        self.elements.get(id)
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    fn block_mut(&mut self, id: &str) -> &mut ElementTheme {
        if id == DEFAULTS_BLOCK {
            &mut self.defaults
        } else {
            self.elements.entry(id.to_string()).or_default()
        }
    }

    pub fn set_color(&mut self, id: &str, key: impl Into<String>, paint: impl Into<Paint>) {
        self.block_mut(id).colours.insert(key.into(), paint.into());
    }

    pub fn set_misc(&mut self, id: &str, key: impl Into<String>, value: impl Into<String>) {
        self.block_mut(id).misc.insert(key.into(), value.into());
    }

    pub fn set_transition(&mut self, id: &str, from: &str, to: &str, duration: f32) {
        self.block_mut(id)
            .transitions
            .insert(format!("{from}_{to}"), duration);
    }

    pub fn set_default_font(&mut self, font: Arc<dyn FontHandle>) {
        self.default_font = font;
    }

    pub fn set_font(&mut self, id: &str, font: Arc<dyn FontHandle>) {
        self.fonts.insert(id.to_string(), font);
    }

    pub fn set_image(&mut self, id: &str, key: impl Into<String>, image: Arc<Surface>) {
        self.images.insert((id.to_string(), key.into()), image);
    }

    /// Element blocks for `ids` in lookup order, ending with the defaults
    fn blocks<'a>(&'a self, ids: &'a [&'a str]) -> impl Iterator<Item = &'a ElementTheme> + 'a {
        ids.iter()
            .filter_map(|id| self.elements.get(*id))
            .chain(std::iter::once(&self.defaults))
    }

    fn lookup_color(&self, ids: &[&str], key: &str) -> Option<Paint> {
        self.blocks(ids)
            .find_map(|block| block.color(key).cloned())
            .or_else(|| defaults::color(key).map(Paint::Solid))
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Theme")
            .field("defaults", &self.defaults)
            .field("elements", &self.elements.len())
            .field("fonts", &self.fonts.len())
            .field("images", &self.images.len())
            .finish()
    }
}

impl AppearanceProvider for Theme {
    /// Walks `ids`, then the defaults block, then built-ins
    ///
    /// A `state_part` key that resolves nowhere is retried as `normal_part`;
    /// failing that, [`defaults::MISSING_COLOR`] is returned.
    fn color_or_gradient(&self, ids: &[&str], key: &str) -> Paint {
        if let Some(paint) = self.lookup_color(ids, key) {
            return paint;
        }

        if let Some((_, part)) = key.split_once('_') {
            let fallback = format!("normal_{part}");
            if fallback != key {
                if let Some(paint) = self.lookup_color(ids, &fallback) {
                    debug!("color '{}' resolved as '{}'", key, fallback);
                    return paint;
                }
            }
        }

        warn!("no color for '{}' in {:?}", key, ids);
        Paint::Solid(defaults::MISSING_COLOR)
    }

    fn font(&self, ids: &[&str]) -> Arc<dyn FontHandle> {
        ids.iter()
            .find_map(|id| self.fonts.get(*id))
            .unwrap_or(&self.default_font)
            .clone()
    }

    fn misc(&self, ids: &[&str], key: &str) -> Option<String> {
        self.blocks(ids)
            .find_map(|block| block.misc(key))
            .or_else(|| defaults::misc(key))
            .map(str::to_string)
    }

    fn image(&self, ids: &[&str], key: &str) -> Option<Arc<Surface>> {
        ids.iter()
            .find_map(|id| self.images.get(&(id.to_string(), key.to_string())))
            .cloned()
    }

    fn transition_duration(&self, ids: &[&str], from: &str, to: &str) -> Option<f32> {
        self.blocks(ids).find_map(|block| block.transition(from, to))
    }
}
