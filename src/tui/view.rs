//! Read-only rendering of the annotation state with ratatui.

use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use unicode_width::UnicodeWidthChar;

use crate::annotate::{Annotator, Mode, OverlayKind};
use crate::keys::help_rows;

const ACCENT: Color = Color::Indexed(62);
const CURSOR: Color = Color::Indexed(212);
const NOTE: Color = Color::Indexed(220);
const DIM: Color = Color::Indexed(241);

/// Rows below the panels for the current mode.
fn status_height(mode: &Mode) -> u16 {
    match mode {
        Mode::NoteEntry { .. } => 6,
        Mode::RangeCountEntry { .. } => 2,
        _ => 1,
    }
}

pub fn render(frame: &mut Frame, annotator: &Annotator) {
    let area = frame.area();
    let [panels, status] = Layout::vertical([
        Constraint::Min(1),
        Constraint::Length(status_height(annotator.mode())),
    ])
    .areas(area);
    let [content, marks] = Layout::horizontal([
        Constraint::Percentage(annotator.split_ratio()),
        Constraint::Fill(1),
    ])
    .areas(panels);

    render_content(frame, annotator, content);
    render_marks(frame, annotator, marks);
    render_status(frame, annotator, status);

    if let Mode::Overlay(kind) = annotator.mode() {
        render_overlay(frame, annotator, *kind, area);
    }
}

fn render_content(frame: &mut Frame, annotator: &Annotator, area: Rect) {
    let block = Block::default()
        .borders(Borders::TOP | Borders::BOTTOM)
        .border_style(Style::default().fg(ACCENT));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let buffer = annotator.buffer();
    if buffer.is_empty() {
        frame.render_widget(
            Paragraph::new(Span::styled(
                "Press r to capture left pane content",
                Style::default().fg(DIM).add_modifier(Modifier::ITALIC),
            )),
            inner,
        );
        return;
    }

    let height = usize::from(inner.height);
    let cursor = annotator.cursor();
    let mut start = annotator.viewport().offset().min(cursor);
    if height > 0 && cursor >= start + height {
        start = cursor + 1 - height;
    }
    let text_width = usize::from(inner.width).saturating_sub(8);

    let lines: Vec<Line> = buffer
        .lines()
        .iter()
        .enumerate()
        .skip(start)
        .take(height)
        .map(|(index, text)| {
            let marker = match annotator.marks().get(index) {
                Some(mark) if mark.note.is_some() => Span::styled("● ", Style::default().fg(NOTE)),
                Some(_) => Span::styled("● ", Style::default().fg(CURSOR)),
                None => Span::raw("  "),
            };
            let body = format!("{:4} ", index + 1);
            let text = fit_width(text, text_width);
            if index == cursor {
                let style = Style::default().fg(CURSOR).add_modifier(Modifier::BOLD);
                Line::from(vec![
                    Span::styled(format!("▶{body}"), style),
                    marker,
                    Span::styled(text, style),
                ])
            } else {
                Line::from(vec![Span::raw(format!(" {body}")), marker, Span::raw(text)])
            }
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_marks(frame: &mut Frame, annotator: &Annotator, area: Rect) {
    let marks = annotator.marks();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(ACCENT))
        .title(Span::styled(
            format!("Marks ({})", marks.len()),
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if marks.is_empty() {
        frame.render_widget(
            Paragraph::new(Span::styled(
                "Press m to mark a line",
                Style::default().fg(DIM).add_modifier(Modifier::ITALIC),
            )),
            inner,
        );
        return;
    }

    let width = usize::from(inner.width).saturating_sub(8);
    let lines: Vec<Line> = marks
        .iter()
        .map(|mark| {
            let label = mark.note.as_deref().unwrap_or(&mark.text);
            let first = label.lines().next().unwrap_or_default();
            Line::from(format!("L{} {}", mark.line + 1, fit_width(first, width)))
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_status(frame: &mut Frame, annotator: &Annotator, area: Rect) {
    let dim = Style::default().fg(DIM);
    match annotator.mode() {
        Mode::NoteEntry { line, buffer } => {
            let [hint, input] =
                Layout::vertical([Constraint::Length(1), Constraint::Min(1)]).areas(area);
            frame.render_widget(
                Paragraph::new(Span::styled(
                    format!("  Note L{}  (Ctrl+S submit | Esc cancel)", line + 1),
                    dim,
                )),
                hint,
            );
            let counter = format!(
                "{}/{}",
                buffer.chars().count(),
                annotator.note_char_limit()
            );
            frame.render_widget(
                Paragraph::new(format!("{buffer}▏"))
                    .wrap(Wrap { trim: false })
                    .block(
                        Block::default()
                            .borders(Borders::ALL)
                            .border_style(Style::default().fg(ACCENT))
                            .title_bottom(Line::from(counter).right_aligned()),
                    ),
                input,
            );
        }
        Mode::RangeCountEntry { buffer } => {
            let shown = if buffer.is_empty() {
                "(empty = full scrollback)"
            } else {
                buffer.as_str()
            };
            frame.render_widget(
                Paragraph::new(vec![
                    Line::styled(format!("  {}", annotator.status()), dim),
                    Line::styled(format!("  Lines: {shown}  (Enter confirm | Esc cancel)"), dim),
                ]),
                area,
            );
        }
        _ if !annotator.status().is_empty() => {
            let first = annotator.status().lines().collect::<Vec<_>>().join(" ");
            frame.render_widget(Paragraph::new(Span::styled(format!("  {first}"), dim)), area);
        }
        _ => {
            let position = format!(
                "L{}/{}  Marks: {}  ",
                annotator.cursor() + 1,
                annotator.buffer().len(),
                annotator.marks().len()
            );
            let [left, right] = Layout::horizontal([
                Constraint::Fill(1),
                Constraint::Length(position.chars().count() as u16),
            ])
            .areas(area);
            frame.render_widget(
                Paragraph::new(Span::styled("  ? help | q quit | m mark | S export", dim)),
                left,
            );
            frame.render_widget(Paragraph::new(Span::styled(position, dim)), right);
        }
    }
}

fn render_overlay(frame: &mut Frame, annotator: &Annotator, kind: OverlayKind, area: Rect) {
    let (title, lines) = match kind {
        OverlayKind::Help => {
            let mut lines: Vec<Line> = help_rows()
                .into_iter()
                .map(|(keys, description)| Line::from(format!("{keys:<10}{description}")))
                .collect();
            lines.push(Line::from(""));
            lines.push(Line::styled("press any key to close...", Style::default().fg(DIM)));
            ("clipnote shortcuts".to_string(), lines)
        }
        OverlayKind::Note => {
            let cursor = annotator.cursor();
            let note = annotator.marks().note(cursor).unwrap_or_default();
            let mut lines: Vec<Line> = note.lines().map(Line::from).collect();
            lines.push(Line::from(""));
            lines.push(Line::styled("press any key to close...", Style::default().fg(DIM)));
            (format!("Note on L{}", cursor + 1), lines)
        }
    };

    let popup = centered(area, 60, (lines.len() as u16).saturating_add(2));
    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: false }).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(ACCENT))
                .title(title),
        ),
        popup,
    );
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .areas(area);
    let [rect] = Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .areas(row);
    rect
}

/// Cut `text` to at most `width` terminal columns.
fn fit_width(text: &str, width: usize) -> String {
    let mut used = 0;
    let mut out = String::new();
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        used += w;
        out.push(c);
    }
    out
}
