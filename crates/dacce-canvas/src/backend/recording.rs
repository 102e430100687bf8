//! Canvas that records drawing commands instead of rendering them.

use super::{Align, Canvas, FontStyle, Image, Orientation, PageSize};
use crate::Result;

/// A single recorded drawing command.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    SetTitle(String),
    SetAutoPageBreak { auto: bool, margin: f32 },
    AddPage { size: PageSize, orientation: Orientation },
    SetFont { family: String, style: FontStyle, size: f32 },
    SetXY { x: f32, y: f32 },
    Rect { x: f32, y: f32, w: f32, h: f32 },
    Line { x1: f32, y1: f32, x2: f32, y2: f32 },
    Text { x: f32, y: f32, text: String },
    MultiCell { w: f32, h: f32, text: String, align: Align },
    Image { image: Image, x: f32, y: f32, w: f32, h: f32 },
}

/// Canvas that keeps the ordered list of commands issued to it.
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    commands: Vec<DrawCommand>,
}

impl RecordingCanvas {
    /// Create an empty recording canvas.
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands in the order they were issued.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Consume the canvas and return the recorded commands.
    pub fn into_commands(self) -> Vec<DrawCommand> {
        self.commands
    }

    /// Number of pages started.
    pub fn page_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::AddPage { .. }))
            .count()
    }

    /// All text drawn, single-line and wrapped, in issue order.
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } | DrawCommand::MultiCell { text, .. } => {
                    Some(text.as_str())
                }
                _ => None,
            })
            .collect()
    }

    /// Whether any drawn text contains `needle`.
    pub fn contains_text(&self, needle: &str) -> bool {
        self.texts().iter().any(|t| t.contains(needle))
    }
}

impl Canvas for RecordingCanvas {
    fn set_title(&mut self, title: &str) {
        self.commands.push(DrawCommand::SetTitle(title.to_string()));
    }

    fn set_auto_page_break(&mut self, auto: bool, margin: f32) {
        self.commands.push(DrawCommand::SetAutoPageBreak { auto, margin });
    }

    fn add_page(&mut self, size: PageSize, orientation: Orientation) {
        self.commands.push(DrawCommand::AddPage { size, orientation });
    }

    fn set_font(&mut self, family: &str, style: FontStyle, size: f32) {
        self.commands.push(DrawCommand::SetFont {
            family: family.to_string(),
            style,
            size,
        });
    }

    fn set_xy(&mut self, x: f32, y: f32) {
        self.commands.push(DrawCommand::SetXY { x, y });
    }

    fn rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.commands.push(DrawCommand::Rect { x, y, w, h });
    }

    fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
        self.commands.push(DrawCommand::Line { x1, y1, x2, y2 });
    }

    fn text(&mut self, x: f32, y: f32, text: &str) {
        self.commands.push(DrawCommand::Text {
            x,
            y,
            text: text.to_string(),
        });
    }

    fn multi_cell(&mut self, w: f32, h: f32, text: &str, align: Align) {
        self.commands.push(DrawCommand::MultiCell {
            w,
            h,
            text: text.to_string(),
            align,
        });
    }

    fn image(&mut self, image: &Image, x: f32, y: f32, w: f32, h: f32) -> Result<()> {
        self.commands.push(DrawCommand::Image {
            image: image.clone(),
            x,
            y,
            w,
            h,
        });
        Ok(())
    }
}
