//! Downloadable PDF summary of a fit-score result.

use chrono::{DateTime, Utc};
use tracing::info;

use crate::models::analysis::FitScoreResult;

pub mod font_metrics;
pub mod layout;
pub mod pdf;

use font_metrics::{get_metrics, Font};
use layout::{Page, PageGeometry, PageLayout, TextStyle};

pub const REPORT_TITLE: &str = "Resume Analysis Report";
pub const REPORT_FILENAME: &str = "resume-analysis-report.pdf";

const PRODUCER: &str = "resumatch";
const BULLET: &str = "\u{2022} ";
const LIST_INDENT: f32 = 12.0;
const SECTION_GAP: f32 = 12.0;

/// Human-readable generation time, e.g. `March 5, 2024 at 14:07 UTC`.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format("%B %-d, %Y at %H:%M UTC").to_string()
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ReportExporter {
    geometry: PageGeometry,
}

impl ReportExporter {
    pub fn new(geometry: PageGeometry) -> Self {
        Self { geometry }
    }

    /// Lays out the report. `generated_at` is injected so output is reproducible.
    pub fn build_pages(&self, result: &FitScoreResult, generated_at: DateTime<Utc>) -> Vec<Page> {
        let mut layout = PageLayout::new(self.geometry);
        let bullet_width = get_metrics(Font::Helvetica).measure_str(BULLET, TextStyle::Body.size_pt());

        layout.push_paragraph(TextStyle::Title, REPORT_TITLE, 0.0, 0.0);
        layout.push_paragraph(
            TextStyle::Body,
            &format!("Generated on: {}", format_timestamp(generated_at)),
            0.0,
            0.0,
        );
        layout.skip(SECTION_GAP);
        layout.push_line(TextStyle::Heading, format!("Fit Score: {}%", result.fit_score), 0.0);

        layout.skip(SECTION_GAP);
        layout.push_line(TextStyle::Heading, "Matched Skills", 0.0);
        if result.matched_skills.is_empty() {
            layout.push_line(TextStyle::Body, "No skills matched.", LIST_INDENT);
        }
        for skill in &result.matched_skills {
            layout.push_paragraph(
                TextStyle::Body,
                &format!("{BULLET}{skill}"),
                LIST_INDENT,
                bullet_width,
            );
        }

        layout.skip(SECTION_GAP);
        layout.push_line(TextStyle::Heading, "Feedback", 0.0);
        if result.feedback.is_empty() {
            layout.push_line(TextStyle::Body, "No feedback available.", LIST_INDENT);
        }
        for item in &result.feedback {
            layout.push_paragraph(
                TextStyle::Body,
                &format!("{BULLET}{}", item.display_line()),
                LIST_INDENT,
                bullet_width,
            );
        }

        layout.finish()
    }

    pub fn export(&self, result: &FitScoreResult, generated_at: DateTime<Utc>) -> Vec<u8> {
        let pages = self.build_pages(result, generated_at);
        let bytes = pdf::write_document(
            &pages,
            &self.geometry,
            &pdf::DocumentInfo {
                title: REPORT_TITLE,
                producer: PRODUCER,
                created_at: generated_at,
            },
        );
        info!(
            pages = pages.len(),
            bytes = bytes.len(),
            "rendered analysis report"
        );
        bytes
    }
}
