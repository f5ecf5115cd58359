//! Paginated line layout for the exported report.
//!
//! A vertical cursor (distance from the top edge, in points) advances one
//! line height per placed line. When the next line would cross the bottom
//! margin, a new page starts and the cursor resets to the top margin.

use crate::report::font_metrics::{get_metrics, Font};

/// Page size and margins in PDF points (1/72 in).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
    pub margin_left: f32,
    pub margin_right: f32,
}

impl PageGeometry {
    /// US letter with 1" margins.
    pub fn letter() -> Self {
        Self {
            width: 612.0,
            height: 792.0,
            margin_top: 72.0,
            margin_bottom: 72.0,
            margin_left: 72.0,
            margin_right: 72.0,
        }
    }

    pub fn content_width(&self) -> f32 {
        self.width - self.margin_left - self.margin_right
    }

    /// Lowest cursor position a line may end at.
    pub fn bottom_limit(&self) -> f32 {
        self.height - self.margin_bottom
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::letter()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextStyle {
    Title,
    Heading,
    Body,
}

impl TextStyle {
    pub fn font(&self) -> Font {
        match self {
            TextStyle::Title | TextStyle::Heading => Font::HelveticaBold,
            TextStyle::Body => Font::Helvetica,
        }
    }

    pub fn size_pt(&self) -> f32 {
        match self {
            TextStyle::Title => 18.0,
            TextStyle::Heading => 14.0,
            TextStyle::Body => 11.0,
        }
    }

    pub fn line_height(&self) -> f32 {
        self.size_pt() * 1.4
    }
}

/// One line of text at a fixed position. `top` is measured from the page's top edge.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub x: f32,
    pub top: f32,
    pub style: TextStyle,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub lines: Vec<PlacedLine>,
}

pub struct PageLayout {
    geometry: PageGeometry,
    done: Vec<Page>,
    current: Page,
    cursor: f32,
}

impl PageLayout {
    pub fn new(geometry: PageGeometry) -> Self {
        Self {
            geometry,
            done: Vec::new(),
            current: Page::default(),
            cursor: geometry.margin_top,
        }
    }

    /// Places a single pre-wrapped line at `indent` points from the left margin.
    pub fn push_line(&mut self, style: TextStyle, text: impl Into<String>, indent: f32) {
        let height = style.line_height();
        let page_has_content = self.cursor > self.geometry.margin_top;
        if page_has_content && self.cursor + height > self.geometry.bottom_limit() {
            self.done.push(std::mem::take(&mut self.current));
            self.cursor = self.geometry.margin_top;
        }

        self.current.lines.push(PlacedLine {
            x: self.geometry.margin_left + indent,
            top: self.cursor,
            style,
            text: text.into(),
        });
        self.cursor += height;
    }

    /// Wraps `text` to the content width and places every line.
    /// Continuation lines get `hanging` extra indent.
    pub fn push_paragraph(&mut self, style: TextStyle, text: &str, indent: f32, hanging: f32) {
        let metrics = get_metrics(style.font());
        let width = self.geometry.content_width() - indent - hanging;
        for (i, line) in metrics.wrap(text, style.size_pt(), width).into_iter().enumerate() {
            let offset = if i == 0 { indent } else { indent + hanging };
            self.push_line(style, line, offset);
        }
    }

    /// Vertical gap; never starts a new page on its own.
    pub fn skip(&mut self, points: f32) {
        self.cursor = (self.cursor + points).min(self.geometry.bottom_limit());
    }

    pub fn finish(mut self) -> Vec<Page> {
        self.done.push(self.current);
        self.done
    }
}
