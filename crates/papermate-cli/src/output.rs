use std::io::Write;
use std::path::Path;

use owo_colors::OwoColorize;

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

pub fn print_processing(w: &mut dyn Write, pdf: &Path, color: ColorMode) -> std::io::Result<()> {
    let line = format!("Processing {}...", pdf.display());
    if color.enabled() {
        writeln!(w, "{}", line.dimmed())
    } else {
        writeln!(w, "{}", line)
    }
}

pub fn print_section_count(
    w: &mut dyn Write,
    count: usize,
    color: ColorMode,
) -> std::io::Result<()> {
    let line = format!("Split into {} section files", count);
    if color.enabled() {
        writeln!(w, "{}", line.dimmed())?;
    } else {
        writeln!(w, "{}", line)?;
    }
    writeln!(w)
}

pub fn print_report(w: &mut dyn Write, report: &str, color: ColorMode) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(w, "{}", "── Analysis ──".bold())?;
    } else {
        writeln!(w, "── Analysis ──")?;
    }
    writeln!(w, "{}", report)?;
    writeln!(w)
}

pub fn print_chat_banner(w: &mut dyn Write, color: ColorMode) -> std::io::Result<()> {
    let line = "Ask questions about the paper (exit/quit to leave).";
    if color.enabled() {
        writeln!(w, "{}", line.dimmed())
    } else {
        writeln!(w, "{}", line)
    }
}

pub fn print_question_prompt(w: &mut dyn Write, color: ColorMode) -> std::io::Result<()> {
    if color.enabled() {
        write!(w, "{} ", ">".green().bold())
    } else {
        write!(w, "> ")
    }
}

pub fn print_answer(w: &mut dyn Write, answer: &str) -> std::io::Result<()> {
    writeln!(w, "{}", answer)?;
    writeln!(w)
}

pub fn print_error(w: &mut dyn Write, message: &str, color: ColorMode) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(w, "{}", format!("error: {}", message).red())
    } else {
        writeln!(w, "error: {}", message)
    }
}
