//! Report Builder — turns one screening record into a downloadable PDF.
//!
//! Layout is computed as a flat list of styled lines first (pure, testable),
//! then drawn with `printpdf` builtin fonts on A4 pages.

pub mod handlers;

use std::io::BufWriter;

use anyhow::{anyhow, Result};
use printpdf::{BuiltinFont, Color, IndirectFontRef, Mm, PdfDocument, Rgb};
use serde::{Deserialize, Serialize};

use crate::models::resume::ResumeRecord;

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 14.0;
/// Roughly what fits between margins at 11pt Helvetica.
const WRAP_CHARS: usize = 95;

const DISCLAIMER: &str = "This report is generated using AI-assisted analysis and should be \
    used as guidance, not a final hiring decision.";

/// Data the report sink needs for one resume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportData {
    pub resume_name: String,
    pub final_score: f64,
    pub missing_skills: Vec<String>,
    pub skills_score: u8,
    pub experience_score: u8,
    pub projects_score: u8,
    pub clarity_score: u8,
    pub recommendations: String,
}

impl From<&ResumeRecord> for ReportData {
    fn from(record: &ResumeRecord) -> Self {
        Self {
            resume_name: record.resume.clone(),
            final_score: record.final_score,
            missing_skills: record.analysis.missing_skills.clone(),
            skills_score: record.analysis.skills_score,
            experience_score: record.analysis.experience_score,
            projects_score: record.analysis.projects_score,
            clarity_score: record.analysis.clarity_score,
            recommendations: record.recommendations.clone(),
        }
    }
}

impl ReportData {
    /// `<resume>_analysis_report.pdf`, with anything that is not printable
    /// ASCII or is unsafe in a Content-Disposition filename replaced by `_`.
    pub fn file_name(&self) -> String {
        let stem: String = self
            .resume_name
            .chars()
            .map(|c| match c {
                '"' | '\\' | '/' => '_',
                c if !c.is_ascii() || c.is_ascii_control() => '_',
                c => c,
            })
            .collect();
        format!("{stem}_analysis_report.pdf")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Title,
    Heading,
    Score,
    Body,
    Bullet,
    Footer,
}

impl LineStyle {
    fn font_size(self) -> f32 {
        match self {
            LineStyle::Title => 20.0,
            LineStyle::Heading => 14.0,
            LineStyle::Score => 13.0,
            LineStyle::Body | LineStyle::Bullet => 11.0,
            LineStyle::Footer => 9.0,
        }
    }

    /// Vertical advance before the line is drawn.
    fn advance_mm(self) -> f32 {
        match self {
            LineStyle::Title => 12.0,
            LineStyle::Heading => 11.0,
            LineStyle::Score => 9.0,
            LineStyle::Body | LineStyle::Bullet => 5.5,
            LineStyle::Footer => 8.0,
        }
    }

    fn color(self) -> Rgb {
        let hex: u32 = match self {
            LineStyle::Title => 0x1e293b,
            LineStyle::Heading => 0x2563eb,
            LineStyle::Score => 0x16a34a,
            LineStyle::Body | LineStyle::Bullet => 0x0f172a,
            LineStyle::Footer => 0x64748b,
        };
        let channel = |shift: u32| ((hex >> shift) & 0xff) as f32 / 255.0;
        Rgb::new(channel(16), channel(8), channel(0), None)
    }

    fn is_bold(self) -> bool {
        matches!(self, LineStyle::Title | LineStyle::Heading | LineStyle::Score)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportLine {
    pub style: LineStyle,
    pub text: String,
}

fn line(style: LineStyle, text: impl Into<String>) -> ReportLine {
    ReportLine {
        style,
        text: text.into(),
    }
}

/// Lays the report out as styled, pre-wrapped lines.
///
/// Recommendations are opaque prose: each source line is wrapped and kept,
/// nothing is split on punctuation.
pub fn layout_report(data: &ReportData) -> Vec<ReportLine> {
    let mut lines = vec![
        line(LineStyle::Title, "AI Resume Analysis Report"),
        line(LineStyle::Body, format!("Resume: {}", data.resume_name)),
        line(
            LineStyle::Score,
            format!("Final Score: {:.2}", data.final_score),
        ),
        line(LineStyle::Heading, "Missing Skills"),
    ];

    if data.missing_skills.is_empty() {
        lines.push(line(LineStyle::Body, "No major missing skills identified."));
    } else {
        for skill in &data.missing_skills {
            push_wrapped(&mut lines, LineStyle::Bullet, &format!("- {skill}"));
        }
    }

    lines.push(line(LineStyle::Heading, "Skill Evaluation"));
    for (label, score) in [
        ("Skills", data.skills_score),
        ("Experience", data.experience_score),
        ("Projects", data.projects_score),
        ("Clarity", data.clarity_score),
    ] {
        lines.push(line(LineStyle::Body, format!("{label} Score: {score} / 100")));
    }

    lines.push(line(LineStyle::Heading, "Recommendations"));
    if data.recommendations.trim().is_empty() {
        lines.push(line(LineStyle::Body, "No recommendations were returned."));
    } else {
        for source_line in data.recommendations.lines() {
            if source_line.trim().is_empty() {
                lines.push(line(LineStyle::Body, ""));
            } else {
                push_wrapped(&mut lines, LineStyle::Body, source_line);
            }
        }
    }

    push_wrapped(&mut lines, LineStyle::Footer, DISCLAIMER);
    lines
}

fn push_wrapped(lines: &mut Vec<ReportLine>, style: LineStyle, text: &str) {
    for wrapped in wrap_text(text, WRAP_CHARS) {
        lines.push(line(style, wrapped));
    }
}

/// Greedy word wrap by char count. Words longer than `max_chars` get their own line.
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current_line = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        if current_len > 0 && current_len + word_len + 1 > max_chars {
            lines.push(std::mem::take(&mut current_line));
            current_len = 0;
        }
        if current_len > 0 {
            current_line.push(' ');
            current_len += 1;
        }
        current_line.push_str(word);
        current_len += word_len;
    }

    if !current_line.is_empty() {
        lines.push(current_line);
    }
    lines
}

/// Renders the report to PDF bytes, adding pages as needed.
pub fn render_pdf(data: &ReportData) -> Result<Vec<u8>> {
    let (doc, page, layer) = PdfDocument::new(
        "AI Resume Analysis Report",
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Layer 1",
    );
    let regular: IndirectFontRef = doc.add_builtin_font(BuiltinFont::Helvetica)?;
    let bold: IndirectFontRef = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;

    let mut current_layer = doc.get_page(page).get_layer(layer);
    let mut y = PAGE_HEIGHT_MM - MARGIN_MM;

    for report_line in layout_report(data) {
        let style = report_line.style;
        y -= style.advance_mm();
        if y < MARGIN_MM {
            let (next_page, next_layer) =
                doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
            current_layer = doc.get_page(next_page).get_layer(next_layer);
            y = PAGE_HEIGHT_MM - MARGIN_MM - style.advance_mm();
        }
        if report_line.text.is_empty() {
            continue;
        }

        let font = if style.is_bold() { &bold } else { &regular };
        let x = if style == LineStyle::Bullet {
            MARGIN_MM + 4.0
        } else {
            MARGIN_MM
        };
        current_layer.set_fill_color(Color::Rgb(style.color()));
        current_layer.use_text(report_line.text, style.font_size(), Mm(x), Mm(y), font);
    }

    let mut writer = BufWriter::new(Vec::new());
    doc.save(&mut writer)?;
    writer
        .into_inner()
        .map_err(|e| anyhow!("Failed to flush PDF buffer: {}", e.error()))
}
