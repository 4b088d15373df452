//! Named colour palettes that mimic popular messaging apps.
//!
//! The renderer only ever sees a fully resolved [`Palette`]; picking a preset
//! by name and merging caller overrides happens here, before rendering.

use crate::colour::Colour;

/// The colours used to draw one bubble
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Palette {
    /// Fill of the bubble and its pointer arrow
    pub bubble: Colour,
    /// Body text
    pub text: Colour,
    /// Vertical bar to the left of a quoted message
    pub quoted_bar: Colour,
    /// Name of the quoted message's author
    pub quoted_header: Colour,
    /// Quoted snippet text
    pub quoted_text: Colour,
    /// Timestamp
    pub time: Colour,
    /// Name of the message's author
    pub author: Colour,
}

/// Per-field replacements applied on top of a preset
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub struct PaletteOverride {
    pub bubble: Option<Colour>,
    pub text: Option<Colour>,
    pub quoted_bar: Option<Colour>,
    pub quoted_header: Option<Colour>,
    pub quoted_text: Option<Colour>,
    pub time: Option<Colour>,
    pub author: Option<Colour>,
}

/// The built-in palettes
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum StylePreset {
    #[default]
    WhatsappDark,
    WhatsappLight,
    TelegramDark,
    TelegramLight,
    IMessageDark,
    IMessageLight,
    BusinessDark,
    BusinessLight,
}

const fn rgb(hex: u32) -> Colour {
    Colour::new_rgb_bytes((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
}

impl StylePreset {
    pub const ALL: [StylePreset; 8] = [
        StylePreset::WhatsappDark,
        StylePreset::WhatsappLight,
        StylePreset::TelegramDark,
        StylePreset::TelegramLight,
        StylePreset::IMessageDark,
        StylePreset::IMessageLight,
        StylePreset::BusinessDark,
        StylePreset::BusinessLight,
    ];

    /// The preset's name, as accepted by [`StylePreset::from_name`]
    pub fn name(self) -> &'static str {
        match self {
            StylePreset::WhatsappDark => "whatsappDark",
            StylePreset::WhatsappLight => "whatsappLight",
            StylePreset::TelegramDark => "telegramDark",
            StylePreset::TelegramLight => "telegramLight",
            StylePreset::IMessageDark => "iMessageDark",
            StylePreset::IMessageLight => "iMessageLight",
            StylePreset::BusinessDark => "businessDark",
            StylePreset::BusinessLight => "businessLight",
        }
    }

    /// Look up a preset by its exact name
    pub fn from_name(name: &str) -> Option<StylePreset> {
        StylePreset::ALL.into_iter().find(|p| p.name() == name)
    }

    pub fn palette(self) -> Palette {
        match self {
            StylePreset::WhatsappDark => Palette {
                bubble: rgb(0x111317),
                text: rgb(0xffffff),
                quoted_bar: rgb(0x22c55e),
                quoted_header: rgb(0x22c55e),
                quoted_text: rgb(0xd1d5db),
                time: rgb(0x9ca3af),
                author: rgb(0x128c7e),
            },
            StylePreset::WhatsappLight => Palette {
                bubble: rgb(0xffffff),
                text: rgb(0x111827),
                quoted_bar: rgb(0x22c55e),
                quoted_header: rgb(0x16a34a),
                quoted_text: rgb(0x374151),
                time: rgb(0x6b7280),
                author: rgb(0x128c7e),
            },
            StylePreset::TelegramDark => Palette {
                bubble: rgb(0x17212b),
                text: rgb(0xe5e7eb),
                quoted_bar: rgb(0x2a9df4),
                quoted_header: rgb(0x38bdf8),
                quoted_text: rgb(0xcbd5e1),
                time: rgb(0x94a3b8),
                author: rgb(0xf9fafb),
            },
            StylePreset::TelegramLight => Palette {
                bubble: rgb(0xffffff),
                text: rgb(0x111827),
                quoted_bar: rgb(0x2a9df4),
                quoted_header: rgb(0x0284c7),
                quoted_text: rgb(0x374151),
                time: rgb(0x6b7280),
                author: rgb(0x1d4ed8),
            },
            StylePreset::IMessageDark => Palette {
                bubble: rgb(0x0a84ff),
                text: rgb(0xffffff),
                quoted_bar: rgb(0x60a5fa),
                quoted_header: rgb(0xbfdbfe),
                quoted_text: rgb(0xe0f2fe),
                time: rgb(0xf1f5f9),
                author: rgb(0xffffff),
            },
            StylePreset::IMessageLight => Palette {
                bubble: rgb(0xe5e5ea),
                text: rgb(0x000000),
                quoted_bar: rgb(0x2563eb),
                quoted_header: rgb(0x1d4ed8),
                quoted_text: rgb(0x374151),
                time: rgb(0x6b7280),
                author: rgb(0x111827),
            },
            StylePreset::BusinessDark => Palette {
                bubble: rgb(0x1f2937),
                text: rgb(0xf9fafb),
                quoted_bar: rgb(0xfacc15),
                quoted_header: rgb(0xfde047),
                quoted_text: rgb(0xe5e7eb),
                time: rgb(0xd1d5db),
                author: rgb(0xfbbf24),
            },
            StylePreset::BusinessLight => Palette {
                bubble: rgb(0xf9fafb),
                text: rgb(0x111827),
                quoted_bar: rgb(0xf59e0b),
                quoted_header: rgb(0xb45309),
                quoted_text: rgb(0x374151),
                time: rgb(0x6b7280),
                author: rgb(0xb45309),
            },
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        StylePreset::default().palette()
    }
}

impl Palette {
    /// Resolve a palette from an optional preset name, falling back to the default
    /// preset for missing or unknown names, then apply `overrides`
    pub fn resolve(name: Option<&str>, overrides: Option<&PaletteOverride>) -> Palette {
        let base = name
            .and_then(StylePreset::from_name)
            .unwrap_or_default()
            .palette();

        match overrides {
            Some(o) => base.with_override(o),
            None => base,
        }
    }

    /// Replace every field that is set in `o`
    pub fn with_override(&self, o: &PaletteOverride) -> Palette {
        Palette {
            bubble: o.bubble.unwrap_or(self.bubble),
            text: o.text.unwrap_or(self.text),
            quoted_bar: o.quoted_bar.unwrap_or(self.quoted_bar),
            quoted_header: o.quoted_header.unwrap_or(self.quoted_header),
            quoted_text: o.quoted_text.unwrap_or(self.quoted_text),
            time: o.time.unwrap_or(self.time),
            author: o.author.unwrap_or(self.author),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preset_names_round_trip() {
        for preset in StylePreset::ALL {
            assert_eq!(StylePreset::from_name(preset.name()), Some(preset));
        }
        assert_eq!(StylePreset::from_name("WhatsappDark"), None);
    }

    #[test]
    fn unknown_style_falls_back_to_whatsapp_dark() {
        let p = Palette::resolve(Some("nope"), None);
        assert_eq!(p, StylePreset::WhatsappDark.palette());
        assert_eq!(Palette::resolve(None, None), p);
    }

    #[test]
    fn override_only_touches_set_fields() {
        let red = Colour::new_rgb_bytes(255, 0, 0);
        let o = PaletteOverride {
            bubble: Some(red),
            ..Default::default()
        };
        let p = Palette::resolve(Some("telegramLight"), Some(&o));
        let base = StylePreset::TelegramLight.palette();
        assert_eq!(p.bubble, red);
        assert_eq!(p.text, base.text);
        assert_eq!(p.author, base.author);
    }
}
