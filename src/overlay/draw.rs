//! Draw requests issued to the overlay backend

use super::backend::OverlayBackend;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Font size used when a caller does not pick one
pub const DEFAULT_FONT_SIZE: f32 = 24.0;

/// 8-bit RGBA colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    #[serde(default = "opaque")]
    pub a: u8,
}

fn opaque() -> u8 {
    u8::MAX
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 255, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Color { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color::new(r, g, b, u8::MAX)
    }

    /// Channels scaled to `0.0..=1.0` as the backend expects
    pub fn normalized(&self) -> [f32; 4] {
        [
            channel(self.r),
            channel(self.g),
            channel(self.b),
            channel(self.a),
        ]
    }
}

fn channel(value: u8) -> f32 {
    value as f32 / 255.0
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
    }
}

/// A single primitive for the backend to rasterize this frame
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        thickness: f32,
        color: Color,
    },
    Box {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        thickness: f32,
        color: Color,
        filled: bool,
    },
    Circle {
        x: f32,
        y: f32,
        radius: f32,
        thickness: f32,
        color: Color,
        filled: bool,
    },
    Ellipse {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        thickness: f32,
        color: Color,
        filled: bool,
    },
    Text {
        x: f32,
        y: f32,
        text: String,
        size: f32,
        color: Color,
    },
}

impl DrawCommand {
    pub fn color(&self) -> Color {
        match self {
            DrawCommand::Line { color, .. }
            | DrawCommand::Box { color, .. }
            | DrawCommand::Circle { color, .. }
            | DrawCommand::Ellipse { color, .. }
            | DrawCommand::Text { color, .. } => *color,
        }
    }

    /// Normalized RGBA sent with the command
    ///
    /// Lines and text are always drawn opaque; shapes carry the colour's
    /// own alpha.
    pub fn rgba(&self) -> [f32; 4] {
        let mut rgba = self.color().normalized();
        if matches!(self, DrawCommand::Line { .. } | DrawCommand::Text { .. }) {
            rgba[3] = 1.0;
        }
        rgba
    }
}

/// Cheap handle for issuing draw commands from a frame callback
#[derive(Clone)]
pub struct Painter {
    backend: Arc<dyn OverlayBackend>,
}

impl Painter {
    pub fn new(backend: Arc<dyn OverlayBackend>) -> Self {
        Painter { backend }
    }

    pub fn draw(&self, command: DrawCommand) {
        self.backend.draw(&command);
    }

    pub fn draw_line(&self, x1: f32, y1: f32, x2: f32, y2: f32, thickness: f32, color: Color) {
        self.draw(DrawCommand::Line {
            x1,
            y1,
            x2,
            y2,
            thickness,
            color,
        });
    }

    #[allow(clippy::too_many_arguments)]
    pub fn draw_box(
        &self,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        thickness: f32,
        color: Color,
        filled: bool,
    ) {
        self.draw(DrawCommand::Box {
            x,
            y,
            width,
            height,
            thickness,
            color,
            filled,
        });
    }

    pub fn draw_circle(
        &self,
        x: f32,
        y: f32,
        radius: f32,
        thickness: f32,
        color: Color,
        filled: bool,
    ) {
        self.draw(DrawCommand::Circle {
            x,
            y,
            radius,
            thickness,
            color,
            filled,
        });
    }

    #[allow(clippy::too_many_arguments)]
    pub fn draw_ellipse(
        &self,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        thickness: f32,
        color: Color,
        filled: bool,
    ) {
        self.draw(DrawCommand::Ellipse {
            x,
            y,
            width,
            height,
            thickness,
            color,
            filled,
        });
    }

    /// Text at [`DEFAULT_FONT_SIZE`]
    pub fn draw_string(&self, x: f32, y: f32, text: impl Into<String>, color: Color) {
        self.draw_string_sized(x, y, text, color, DEFAULT_FONT_SIZE);
    }

    pub fn draw_string_sized(
        &self,
        x: f32,
        y: f32,
        text: impl Into<String>,
        color: Color,
        size: f32,
    ) {
        self.draw(DrawCommand::Text {
            x,
            y,
            text: text.into(),
            size,
            color,
        });
    }
}

impl fmt::Debug for Painter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Painter")
            .field("backend", &self.backend.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::RecordingOverlay;

    #[test]
    fn test_normalized_channels() {
        let color = Color::new(255, 0, 51, 102);
        assert_eq!(color.normalized(), [1.0, 0.0, 0.2, 0.4]);
    }

    #[test]
    fn test_line_and_text_alpha_is_opaque() {
        let half = Color::new(255, 255, 255, 0);
        let line = DrawCommand::Line {
            x1: 0.0,
            y1: 0.0,
            x2: 1.0,
            y2: 1.0,
            thickness: 1.0,
            color: half,
        };
        assert_eq!(line.rgba()[3], 1.0);

        let circle = DrawCommand::Circle {
            x: 0.0,
            y: 0.0,
            radius: 2.0,
            thickness: 1.0,
            color: half,
            filled: false,
        };
        assert_eq!(circle.rgba()[3], 0.0);
    }

    #[test]
    fn test_painter_default_font_size() {
        let backend = RecordingOverlay::new();
        let painter = Painter::new(Arc::new(backend.clone()));
        painter.draw_string(10.0, 20.0, "hp", Color::GREEN);

        match backend.commands().as_slice() {
            [DrawCommand::Text { size, text, .. }] => {
                assert_eq!(*size, DEFAULT_FONT_SIZE);
                assert_eq!(text, "hp");
            }
            other => panic!("unexpected commands: {:?}", other),
        }
    }

    #[test]
    fn test_color_serde_defaults_alpha() {
        let color: Color = toml::from_str("r = 1\ng = 2\nb = 3").unwrap();
        assert_eq!(color, Color::new(1, 2, 3, 255));
        assert_eq!(color.to_string(), "#010203FF");
    }
}
