//! Flatten a server [Description] into legacy `§`-formatted text.

use crate::server::{Component, Description};

const SECTION: char = '§';

/// Formatting that applies to one run of text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Style {
    color: Option<char>,
    obfuscated: bool,
    bold: bool,
    strikethrough: bool,
    underlined: bool,
    italic: bool,
}

impl Style {
    /// Children inherit every property their own component leaves unset.
    fn inherit(&self, component: &Component) -> Self {
        Self {
            color: component
                .color
                .as_deref()
                .and_then(color_code)
                .or(self.color),
            obfuscated: component.obfuscated.unwrap_or(self.obfuscated),
            bold: component.bold.unwrap_or(self.bold),
            strikethrough: component.strikethrough.unwrap_or(self.strikethrough),
            underlined: component.underlined.unwrap_or(self.underlined),
            italic: component.italic.unwrap_or(self.italic),
        }
    }

    fn is_plain(&self) -> bool {
        *self == Style::default()
    }

    fn push_codes(&self, out: &mut String) {
        let flags = [
            (self.obfuscated, 'k'),
            (self.bold, 'l'),
            (self.strikethrough, 'm'),
            (self.underlined, 'n'),
            (self.italic, 'o'),
        ];

        // A color code resets formatting, so it has to come first.
        if let Some(color) = self.color {
            out.push(SECTION);
            out.push(color);
        }

        for (_, code) in flags.iter().filter(|(on, _)| *on) {
            out.push(SECTION);
            out.push(*code);
        }
    }
}

/// Legacy code for a named color. Hex colors have none.
fn color_code(name: &str) -> Option<char> {
    let code = match name {
        "black" => '0',
        "dark_blue" => '1',
        "dark_green" => '2',
        "dark_aqua" => '3',
        "dark_red" => '4',
        "dark_purple" => '5',
        "gold" => '6',
        "gray" => '7',
        "dark_gray" => '8',
        "blue" => '9',
        "green" => 'a',
        "aqua" => 'b',
        "red" => 'c',
        "light_purple" => 'd',
        "yellow" => 'e',
        "white" => 'f',
        _ => return None,
    };

    Some(code)
}

#[derive(Default)]
struct Renderer {
    out: String,
    current: Style,
}

impl Renderer {
    fn push_run(&mut self, style: &Style, text: &str) {
        if text.is_empty() {
            return;
        }

        if *style != self.current {
            if !self.current.is_plain() {
                self.out.push(SECTION);
                self.out.push('r');
            }

            style.push_codes(&mut self.out);
            self.current = style.clone();
        }

        self.out.push_str(text);
    }

    fn walk(&mut self, description: &Description, parent: &Style) {
        match description {
            Description::Text(text) => self.push_run(parent, text),
            Description::List(items) => {
                for item in items {
                    self.walk(item, parent);
                }
            }
            Description::Component(component) => {
                let style = parent.inherit(component);
                let text = component
                    .text
                    .as_deref()
                    .or(component.translate.as_deref())
                    .unwrap_or_default();

                self.push_run(&style, text);

                for child in component.extra.iter().flatten() {
                    self.walk(child, &style);
                }
            }
            Description::Other(_) => {}
        }
    }
}

impl Description {
    /// Render the description as legacy formatted text.
    ///
    /// Plain strings come back unchanged, including any `§` codes they
    /// already carry. Shapes that are not text yield an empty string.
    ///
    /// ```
    /// # use mcstatus_query::{Component, Description};
    /// let motd = Description::Component(Component {
    ///     text: Some("Hello".into()),
    ///     ..Default::default()
    /// });
    ///
    /// assert_eq!(motd.to_legacy_text(), "Hello");
    /// ```
    pub fn to_legacy_text(&self) -> String {
        let mut renderer = Renderer::default();

        renderer.walk(self, &Style::default());
        renderer.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(value: serde_json::Value) -> String {
        serde_json::from_value::<Description>(value)
            .unwrap()
            .to_legacy_text()
    }

    #[test]
    fn plain_text_passes_through() {
        assert_eq!(render(json!("§aA Minecraft Server")), "§aA Minecraft Server");
        assert_eq!(render(json!({"text": "Hello"})), "Hello");
    }

    #[test]
    fn styles_become_section_codes() {
        let motd = json!({
            "text": "",
            "extra": [
                {"text": "Sky", "color": "gold", "bold": true},
                {"text": "Block", "color": "aqua"},
                " network"
            ]
        });

        assert_eq!(render(motd), "§6§lSky§r§bBlock§r network");
    }

    #[test]
    fn children_inherit_parent_style() {
        let motd = json!({
            "text": "A",
            "color": "red",
            "extra": [{"text": "B", "italic": true}, {"text": "C"}]
        });

        assert_eq!(render(motd), "§cA§r§c§oB§r§cC");
    }

    #[test]
    fn lists_translations_and_hex_colors() {
        assert_eq!(render(json!(["a", {"text": "b"}])), "ab");
        assert_eq!(render(json!({"translate": "menu.title"})), "menu.title");
        assert_eq!(render(json!({"text": "hex", "color": "#FF00AA"})), "hex");
    }

    #[test]
    fn non_text_shapes_are_empty() {
        assert_eq!(render(json!(42)), "");
        assert_eq!(render(json!(null)), "");
        assert_eq!(render(json!({"text": 5})), "");
    }
}
