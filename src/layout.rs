use crate::models::block::{Block, Placement, Span};

/// Desktop spans are authored against this many columns.
pub const DESKTOP_COLUMNS: u32 = 9;
pub const MOBILE_COLUMNS: u32 = 2;

/// Sort key used for a missing row or column so unplaced blocks sink last.
const UNPLACED: u32 = 999;

/// Re-bucket a desktop span into the two-column mobile grid.
/// Wide blocks take the full mobile width; mid-width blocks get at least two
/// rows so they keep some presence once they shrink to one column.
pub fn mobile_span(span: Span) -> Span {
    let cols = if span.cols >= 5 { 2 } else { 1 };
    let rows = if (3..5).contains(&span.cols) {
        span.rows.max(2)
    } else {
        span.rows
    };
    Span { cols, rows }
}

/// Blocks in natural reading order for the single-flow mobile layout:
/// ascending row, then column. The sort is stable, so ties keep document order.
pub fn mobile_order(blocks: &[Block]) -> Vec<&Block> {
    let mut sorted: Vec<&Block> = blocks.iter().collect();
    sorted.sort_by_key(|b| sort_key(&b.placement));
    sorted
}

fn sort_key(placement: &Placement) -> (u32, u32) {
    (
        placement.row.unwrap_or(UNPLACED),
        placement.column.unwrap_or(UNPLACED),
    )
}

/// Corner radius scaled by the tile's smaller dimension.
pub fn border_radius(span: Span) -> &'static str {
    match span.cols.min(span.rows) {
        0 | 1 => "0.5rem",
        2 => "0.625rem",
        3 => "0.75rem",
        _ => "0.875rem",
    }
}

/// Inline grid placement for the desktop grid. Empty when the block flows.
pub fn desktop_grid_css(span: Span, placement: &Placement) -> String {
    let mut css = String::new();
    match placement.column {
        Some(col) => css.push_str(&format!(
            "grid-column:{} / {};",
            col,
            col.saturating_add(span.cols)
        )),
        None => css.push_str(&format!("grid-column:span {};", span.cols)),
    }
    match placement.row {
        Some(row) => css.push_str(&format!(
            "grid-row:{} / {};",
            row,
            row.saturating_add(span.rows)
        )),
        None => css.push_str(&format!("grid-row:span {};", span.rows)),
    }
    css
}

/// Inline placement for a mobile cell. Explicit desktop placement is dropped.
pub fn mobile_grid_css(span: Span) -> String {
    let m = mobile_span(span);
    format!("grid-column:span {};grid-row:span {};", m.cols, m.rows)
}
