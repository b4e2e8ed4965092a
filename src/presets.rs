//! Style presets and the instruction composer.

/// A named, reusable style instruction shown as a one-tap option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StylePreset {
    /// Stable identifier, used for selection.
    pub id: &'static str,
    /// Display label.
    pub label: &'static str,
    /// The instruction text sent to the model.
    pub prompt: &'static str,
    /// Icon glyph shown next to the label.
    pub icon: &'static str,
}

/// The fixed style catalog.
pub const PRESET_STYLES: [StylePreset; 4] = [
    StylePreset {
        id: "cozy",
        label: "Cozy Fireplace",
        prompt: "A warm, cozy Christmas scene with a fireplace in the background, soft lighting, and stockings.",
        icon: "\u{1F525}",
    },
    StylePreset {
        id: "snowy",
        label: "Winter Wonderland",
        prompt: "A magical outdoor snowy scene with falling snowflakes, pine trees, and winter accessories.",
        icon: "\u{2744}\u{FE0F}",
    },
    StylePreset {
        id: "santa",
        label: "Santa Helper",
        prompt: "The pet wearing a cute Santa hat and red scarf, surrounded by wrapped gifts.",
        icon: "\u{1F385}",
    },
    StylePreset {
        id: "lights",
        label: "Festive Lights",
        prompt: "Surrounded by glowing colorful Christmas lights with a bokeh effect, very festive and bright.",
        icon: "\u{1F4A1}",
    },
];

/// Looks up a preset by its identifier.
pub fn find(id: &str) -> Option<&'static StylePreset> {
    PRESET_STYLES.iter().find(|p| p.id == id)
}

/// Merges a selected preset and free text into the final instruction.
///
/// Preset alone yields its prompt, free text alone yields the text, both
/// yield `"<preset> Also: <text>"`, neither yields an empty string.
pub fn compose(preset: Option<&StylePreset>, custom: &str) -> String {
    match (preset, custom.is_empty()) {
        (Some(p), true) => p.prompt.to_string(),
        (Some(p), false) => format!("{} Also: {}", p.prompt, custom),
        (None, _) => custom.to_string(),
    }
}

/// Tracks the currently selected preset. Selecting the active preset again
/// deselects it.
#[derive(Debug, Clone, Default)]
pub struct PresetPicker {
    selected: Option<&'static str>,
}

impl PresetPicker {
    /// Creates a picker with nothing selected.
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggles the preset with the given id. Unknown ids are ignored.
    pub fn toggle(&mut self, id: &str) {
        let Some(preset) = find(id) else {
            tracing::debug!(id, "ignoring unknown preset id");
            return;
        };
        if self.selected == Some(preset.id) {
            self.selected = None;
        } else {
            self.selected = Some(preset.id);
        }
    }

    /// Returns the currently selected preset, if any.
    pub fn selected(&self) -> Option<&'static StylePreset> {
        self.selected.and_then(find)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_ids_are_unique() {
        for (i, a) in PRESET_STYLES.iter().enumerate() {
            for b in &PRESET_STYLES[i + 1..] {
                assert_ne!(a.id, b.id);
            }
        }
    }

    #[test]
    fn test_find() {
        assert_eq!(find("cozy").unwrap().label, "Cozy Fireplace");
        assert_eq!(find("nope"), None);
    }

    #[test]
    fn test_compose_neither() {
        assert_eq!(compose(None, ""), "");
    }

    #[test]
    fn test_compose_preset_only() {
        let p = find("santa").unwrap();
        assert_eq!(compose(Some(p), ""), p.prompt);
    }

    #[test]
    fn test_compose_text_only() {
        assert_eq!(compose(None, "add a reindeer"), "add a reindeer");
    }

    #[test]
    fn test_compose_both() {
        let p = find("snowy").unwrap();
        assert_eq!(
            compose(Some(p), "make it night"),
            format!("{} Also: make it night", p.prompt)
        );
    }

    #[test]
    fn test_toggle_selects_and_deselects() {
        let mut picker = PresetPicker::new();
        assert!(picker.selected().is_none());

        picker.toggle("lights");
        assert_eq!(picker.selected().unwrap().id, "lights");

        // Same preset twice in a row leaves nothing selected.
        picker.toggle("lights");
        assert!(picker.selected().is_none());
    }

    #[test]
    fn test_toggle_switches_presets() {
        let mut picker = PresetPicker::new();
        picker.toggle("cozy");
        picker.toggle("santa");
        assert_eq!(picker.selected().unwrap().id, "santa");
    }

    #[test]
    fn test_toggle_unknown_id_is_noop() {
        let mut picker = PresetPicker::new();
        picker.toggle("cozy");
        picker.toggle("mystery");
        assert_eq!(picker.selected().unwrap().id, "cozy");
    }
}
