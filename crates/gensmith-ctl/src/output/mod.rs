//! Terminal output for `gensmith`.
//!
//! Results go to stdout and failures to stderr. Styles come from
//! [`styles`] and are stripped by `anstream` when the stream is not a
//! terminal.

mod styles;

use std::fmt::Display;
use std::io::Write;
use std::path::Path;

use anstyle::Style;
use gensmith_engine::validate::{Severity, ValidationFinding};

pub(crate) use styles::clap_styles;

use styles::{DIM, ERROR, HEADER, HINT, LABEL, SUCCESS, WARNING};

#[derive(Debug, Clone, Copy)]
enum Stream {
    Out,
    Err,
}

fn emit(stream: Stream, style: Style, text: impl Display) {
    // A closed pipe is not worth failing a run over.
    let _ = match stream {
        Stream::Out => writeln!(anstream::stdout().lock(), "{style}{text}{style:#}"),
        Stream::Err => writeln!(anstream::stderr().lock(), "{style}{text}{style:#}"),
    };
}

pub(crate) fn success(msg: impl Display) {
    emit(Stream::Out, SUCCESS, format_args!("✓ {msg}"));
}

pub(crate) fn warning(msg: impl Display) {
    emit(Stream::Out, WARNING, format_args!("! {msg}"));
}

/// Failure of the whole command. Always stderr.
pub(crate) fn error(msg: impl Display) {
    emit(Stream::Err, ERROR, format_args!("✗ {msg}"));
}

/// Follow-up printed under [`error`], on the same stream.
pub(crate) fn hint(msg: impl Display) {
    emit(Stream::Err, HINT, msg);
}

pub(crate) fn header(msg: impl Display) {
    emit(Stream::Out, HEADER, msg);
}

pub(crate) fn label(name: impl Display, value: impl Display) {
    let mut out = anstream::stdout().lock();
    let _ = writeln!(out, "  {LABEL}{name}:{LABEL:#} {value}");
}

pub(crate) fn dim(msg: impl Display) {
    emit(Stream::Out, DIM, msg);
}

pub(crate) fn item(msg: impl Display) {
    emit(Stream::Out, Style::new(), format_args!("  • {msg}"));
}

pub(crate) fn plain(msg: impl Display) {
    emit(Stream::Out, Style::new(), msg);
}

pub(crate) fn blank() {
    emit(Stream::Out, Style::new(), "");
}

pub(crate) fn file_created(path: &Path) {
    success(format_args!("Created: {}", path.display()));
}

pub(crate) fn file_skipped(path: &Path) {
    warning(format_args!("Skipped existing: {}", path.display()));
}

/// One validation finding, colored by severity.
pub(crate) fn finding(finding: &ValidationFinding) {
    let (style, mark) = match finding.severity {
        Severity::Error => (ERROR, "✗"),
        Severity::Warning => (WARNING, "!"),
    };
    emit(
        Stream::Out,
        style,
        format_args!("{mark} [{}] {}", finding.code, finding.message),
    );
}
