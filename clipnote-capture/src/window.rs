//! Capture windowing: turn a pane's scroll state into a capture-pane range.
//!
//! tmux addresses pane history relative to the live screen: line 0 is the
//! first line of live output and negative numbers reach back into history.
//! When the pane is in copy mode and scrolled back by `sp` lines, the rows on
//! screen are `-sp ..= ph - 1 - sp`.

use crate::pane::PaneCollaborator;

/// What the user asked to capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureIntent {
    /// Whatever is currently on screen in the paired pane.
    Visible,
    /// The N lines ending at the bottom of the current view.
    Recent(u64),
    /// The whole history, from the oldest retained line.
    FullScrollback,
}

/// A concrete line range for `tmux capture-pane`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureRange {
    /// No `-S`/`-E`: tmux captures the visible screen.
    Screen,
    /// `-S start`, open-ended to the bottom.
    From(i64),
    /// `-S start -E end`, inclusive.
    Between(i64, i64),
    /// `-S -`: from the start of history.
    FullHistory,
}

impl CaptureRange {
    /// Extra arguments appended after `capture-pane -p -t <pane>`.
    pub fn to_args(&self) -> Vec<String> {
        match *self {
            CaptureRange::Screen => Vec::new(),
            CaptureRange::From(start) => vec!["-S".to_string(), start.to_string()],
            CaptureRange::Between(start, end) => vec![
                "-S".to_string(),
                start.to_string(),
                "-E".to_string(),
                end.to_string(),
            ],
            CaptureRange::FullHistory => vec!["-S".to_string(), "-".to_string()],
        }
    }
}

/// Resolve an intent against the pane's scroll position and height.
///
/// An unknown, zero or non-positive value collapses to the not-scrolled
/// branch; the capture still happens, just without the scroll adjustment.
/// The same applies when the reported values are too large to offset.
pub fn resolve_range(
    intent: CaptureIntent,
    scroll_position: Option<i64>,
    pane_height: Option<i64>,
) -> CaptureRange {
    let view = match (scroll_position, pane_height) {
        (Some(sp), Some(ph)) if sp != 0 && ph > 0 => {
            let view = scrolled_view(sp, ph);
            if view.is_none() {
                log::debug!("scroll_position {sp} / pane_height {ph} out of range, ignoring");
            }
            view
        }
        _ => None,
    };

    match intent {
        CaptureIntent::FullScrollback => CaptureRange::FullHistory,
        CaptureIntent::Visible => match view {
            Some((start, end)) => CaptureRange::Between(start, end),
            None => CaptureRange::Screen,
        },
        CaptureIntent::Recent(n) => view
            .and_then(|(_, end)| {
                let start = end.checked_sub(i64::try_from(n).ok()?)?.checked_add(1)?;
                Some(CaptureRange::Between(start, end))
            })
            .unwrap_or_else(|| last_lines(n)),
    }
}

/// First and last screen rows of a pane scrolled back by `sp` lines.
fn scrolled_view(sp: i64, ph: i64) -> Option<(i64, i64)> {
    Some((sp.checked_neg()?, ph.checked_sub(1)?.checked_sub(sp)?))
}

/// The last `n` lines of the pane, or the whole history if `n` cannot be
/// expressed as an offset.
fn last_lines(n: u64) -> CaptureRange {
    match i64::try_from(n).ok().and_then(i64::checked_neg) {
        Some(start) => CaptureRange::From(start),
        None => CaptureRange::FullHistory,
    }
}

/// Scroll state of a pane, queried best-effort.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaneMetrics {
    pub scroll_position: Option<i64>,
    pub pane_height: Option<i64>,
}

impl PaneMetrics {
    /// Query `scroll_position` and, when the pane is scrolled, `pane_height`.
    ///
    /// Query failures and non-numeric answers become `None`.
    pub fn query(collaborator: &dyn PaneCollaborator, pane: &str) -> Self {
        let scroll_position = numeric_var(collaborator, pane, "scroll_position");
        let pane_height = match scroll_position {
            Some(sp) if sp != 0 => numeric_var(collaborator, pane, "pane_height"),
            _ => None,
        };
        Self {
            scroll_position,
            pane_height,
        }
    }

    pub fn resolve(&self, intent: CaptureIntent) -> CaptureRange {
        resolve_range(intent, self.scroll_position, self.pane_height)
    }
}

fn numeric_var(collaborator: &dyn PaneCollaborator, pane: &str, name: &str) -> Option<i64> {
    match collaborator.display_var(pane, name) {
        Ok(value) => {
            let parsed = value.trim().parse().ok();
            if parsed.is_none() && !value.trim().is_empty() {
                log::debug!("pane {pane}: non-numeric {name} {value:?}, treating as unknown");
            }
            parsed
        }
        Err(e) => {
            log::debug!("pane {pane}: failed to query {name}: {e}");
            None
        }
    }
}
