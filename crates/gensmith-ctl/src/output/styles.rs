//! Palette for terminal output and clap help.

use anstyle::{AnsiColor, Color, Effects, Style};

const fn fg(color: AnsiColor) -> Style {
    Style::new().fg_color(Some(Color::Ansi(color)))
}

/// Written files, passing checks.
pub(crate) const SUCCESS: Style = fg(AnsiColor::Green);

/// Failed runs and error findings.
pub(crate) const ERROR: Style = fg(AnsiColor::Red);

/// Skipped files and warning findings.
pub(crate) const WARNING: Style = fg(AnsiColor::Yellow);

pub(crate) const HEADER: Style = Style::new().effects(Effects::BOLD);

pub(crate) const LABEL: Style = Style::new().effects(Effects::BOLD);

pub(crate) const DIM: Style = Style::new().effects(Effects::DIMMED);

pub(crate) const HINT: Style = fg(AnsiColor::Cyan).effects(Effects::DIMMED);

/// Clap help styles matching the output palette.
pub(crate) fn clap_styles() -> clap::builder::Styles {
    let heading = fg(AnsiColor::Green).effects(Effects::BOLD);
    clap::builder::Styles::styled()
        .header(heading)
        .usage(heading)
        .literal(fg(AnsiColor::Cyan))
        .placeholder(fg(AnsiColor::Cyan))
        .error(fg(AnsiColor::Red).effects(Effects::BOLD))
        .valid(SUCCESS)
        .invalid(WARNING)
}
