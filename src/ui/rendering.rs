use cairo::{Context, LineCap};

use crate::game::field::BOARD_SIDE;
use crate::game::logic::Snapshot;
use crate::game::types::{Cell, GameStatus, Player};

// Design-time (reference) size of the square play area. Everything below is
// laid out in this coordinate space and scaled to the widget.
pub const REF_SIZE: f64 = 360.0;

const BOARD_MARGIN: f64 = 15.0;
const CELL_SIZE: f64 = 110.0;
const GRID_WIDTH: f64 = 4.0;
const MARK_INSET: f64 = 26.0;
const MARK_WIDTH: f64 = 10.0;

/// How far the win line reaches past the centers of its end cells.
pub const WIN_LINE_EXTEND: f64 = 28.0;
const WIN_LINE_WIDTH: f64 = 8.0;

const BACKGROUND: (f64, f64, f64) = (0.17, 0.17, 0.19);
const GRID: (f64, f64, f64) = (0.85, 0.85, 0.88);
const X_COLOR: (f64, f64, f64) = (0.93, 0.33, 0.31);
const O_COLOR: (f64, f64, f64) = (0.27, 0.55, 0.95);
const WIN_COLOR: (f64, f64, f64) = (0.98, 0.84, 0.25);

/// Scale and offset that fit the reference square centered into the widget.
fn fit(widget_w: i32, widget_h: i32) -> (f64, f64, f64) {
    let w = widget_w as f64;
    let h = widget_h as f64;
    let scale = (w / REF_SIZE).min(h / REF_SIZE);
    let offset_x = (w - REF_SIZE * scale) / 2.0;
    let offset_y = (h - REF_SIZE * scale) / 2.0;
    (scale, offset_x, offset_y)
}

/// Top-left corner of a cell in reference coordinates.
fn cell_origin(index: usize) -> (f64, f64) {
    let col = (index % BOARD_SIDE) as f64;
    let row = (index / BOARD_SIDE) as f64;
    (BOARD_MARGIN + col * CELL_SIZE, BOARD_MARGIN + row * CELL_SIZE)
}

pub fn cell_center(index: usize) -> (f64, f64) {
    let (x, y) = cell_origin(index);
    (x + CELL_SIZE / 2.0, y + CELL_SIZE / 2.0)
}

/// Convert widget-space mouse coordinates to a board index.
pub fn mouse_to_cell(x: f64, y: f64, widget_w: i32, widget_h: i32) -> Option<usize> {
    let (scale, offset_x, offset_y) = fit(widget_w, widget_h);
    if scale <= 0.0 {
        return None;
    }
    let rx = (x - offset_x) / scale;
    let ry = (y - offset_y) / scale;

    let col = ((rx - BOARD_MARGIN) / CELL_SIZE).floor() as i32;
    let row = ((ry - BOARD_MARGIN) / CELL_SIZE).floor() as i32;
    let side = BOARD_SIDE as i32;

    if (0..side).contains(&col) && (0..side).contains(&row) {
        Some((row * side + col) as usize)
    } else {
        None
    }
}

/// Segment through the centers of `start` and `end`, stretched by
/// `WIN_LINE_EXTEND` on both sides.
pub fn win_line_segment(start: usize, end: usize) -> ((f64, f64), (f64, f64)) {
    let (mut x0, mut y0) = cell_center(start);
    let (mut x1, mut y1) = cell_center(end);

    let dx = x1 - x0;
    let dy = y1 - y0;
    let length = (dx * dx + dy * dy).sqrt();
    if length > 0.0 {
        let ux = dx / length;
        let uy = dy / length;
        x0 -= ux * WIN_LINE_EXTEND;
        y0 -= uy * WIN_LINE_EXTEND;
        x1 += ux * WIN_LINE_EXTEND;
        y1 += uy * WIN_LINE_EXTEND;
    }
    ((x0, y0), (x1, y1))
}

/// Render `snapshot` scaled to fit (widget_w, widget_h).
/// `hovered` is only highlighted while it would accept a click.
pub fn render(
    cr: &Context,
    snapshot: &Snapshot,
    hovered: Option<usize>,
    widget_w: i32,
    widget_h: i32,
) {
    let (scale, offset_x, offset_y) = fit(widget_w, widget_h);

    let _ = cr.save();
    cr.translate(offset_x, offset_y);
    cr.scale(scale, scale);

    set_color(cr, BACKGROUND);
    cr.rectangle(0.0, 0.0, REF_SIZE, REF_SIZE);
    let _ = cr.fill();

    // Hover highlight, tinted for the player about to move
    if let Some(idx) = hover_target(snapshot, hovered) {
        let (x, y) = cell_origin(idx);
        let (r, g, b) = mark_color(snapshot.current_player);
        cr.set_source_rgba(r, g, b, 0.08);
        cr.rectangle(x, y, CELL_SIZE, CELL_SIZE);
        let _ = cr.fill();
    }

    // Last placed mark
    if let Some((idx, player)) = snapshot.last_move {
        let (x, y) = cell_origin(idx);
        let (r, g, b) = mark_color(player);
        cr.set_source_rgba(r, g, b, 0.15);
        cr.rectangle(x, y, CELL_SIZE, CELL_SIZE);
        let _ = cr.fill();
    }

    // Winning cells
    if let GameStatus::WonBy(_, line) = snapshot.status {
        let (r, g, b) = WIN_COLOR;
        cr.set_source_rgba(r, g, b, 0.12);
        for idx in line.indices() {
            let (x, y) = cell_origin(idx);
            cr.rectangle(x, y, CELL_SIZE, CELL_SIZE);
        }
        let _ = cr.fill();
    }

    draw_grid(cr);

    for (idx, cell) in snapshot.board.cells().iter().enumerate() {
        match cell {
            Cell::X => draw_x(cr, idx),
            Cell::O => draw_o(cr, idx),
            Cell::Empty => {}
        }
    }

    if let Some((start, end)) = snapshot.win_endpoints {
        let ((x0, y0), (x1, y1)) = win_line_segment(start, end);
        set_color(cr, WIN_COLOR);
        cr.set_line_width(WIN_LINE_WIDTH);
        cr.set_line_cap(LineCap::Round);
        cr.move_to(x0, y0);
        cr.line_to(x1, y1);
        let _ = cr.stroke();
    }

    let _ = cr.restore();
}

/// The hovered cell, if a click there would place a mark.
fn hover_target(snapshot: &Snapshot, hovered: Option<usize>) -> Option<usize> {
    let idx = hovered?;
    let open = matches!(snapshot.status, GameStatus::InProgress(_))
        && !snapshot.awaits_computer()
        && snapshot.board.get(idx) == Some(Cell::Empty);
    open.then_some(idx)
}

fn draw_grid(cr: &Context) {
    set_color(cr, GRID);
    cr.set_line_width(GRID_WIDTH);
    cr.set_line_cap(LineCap::Round);
    let far = BOARD_MARGIN + CELL_SIZE * BOARD_SIDE as f64;
    for i in 1..BOARD_SIDE {
        let p = BOARD_MARGIN + CELL_SIZE * i as f64;
        cr.move_to(p, BOARD_MARGIN);
        cr.line_to(p, far);
        cr.move_to(BOARD_MARGIN, p);
        cr.line_to(far, p);
    }
    let _ = cr.stroke();
}

fn draw_x(cr: &Context, idx: usize) {
    let (x, y) = cell_origin(idx);
    let near = MARK_INSET;
    let far = CELL_SIZE - MARK_INSET;
    set_color(cr, mark_color(Player::X));
    cr.set_line_width(MARK_WIDTH);
    cr.set_line_cap(LineCap::Round);
    cr.move_to(x + near, y + near);
    cr.line_to(x + far, y + far);
    cr.move_to(x + far, y + near);
    cr.line_to(x + near, y + far);
    let _ = cr.stroke();
}

fn draw_o(cr: &Context, idx: usize) {
    let (cx, cy) = cell_center(idx);
    set_color(cr, mark_color(Player::O));
    cr.set_line_width(MARK_WIDTH);
    cr.new_sub_path();
    cr.arc(
        cx,
        cy,
        CELL_SIZE / 2.0 - MARK_INSET,
        0.0,
        2.0 * std::f64::consts::PI,
    );
    let _ = cr.stroke();
}

fn mark_color(player: Player) -> (f64, f64, f64) {
    match player {
        Player::X => X_COLOR,
        Player::O => O_COLOR,
    }
}

fn set_color(cr: &Context, (r, g, b): (f64, f64, f64)) {
    cr.set_source_rgb(r, g, b);
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::game::logic::GameEngine;
    use crate::game::types::Mode;
    use cairo::{Format, ImageSurface};

    fn snapshot_after(mode: Mode, moves: &[usize]) -> Snapshot {
        let mut engine = GameEngine::new();
        engine.start(mode);
        for &m in moves {
            engine.apply_move(m);
        }
        engine.snapshot()
    }

    /// Draw `snapshot` on a reference-sized surface and return the RGB of the
    /// pixel at (x, y).
    fn pixel_after_render(snapshot: &Snapshot, x: usize, y: usize) -> (u8, u8, u8) {
        let size = REF_SIZE as i32;
        let mut surface = ImageSurface::create(Format::ARgb32, size, size).unwrap();
        {
            let cr = Context::new(&surface).unwrap();
            render(&cr, snapshot, None, size, size);
        }
        surface.flush();
        let stride = surface.stride() as usize;
        let data = surface.data().unwrap();
        // ARGB32 is stored native-endian: B, G, R, A on little-endian hosts.
        let px = y * stride + x * 4;
        let word = u32::from_ne_bytes([data[px], data[px + 1], data[px + 2], data[px + 3]]);
        ((word >> 16) as u8, (word >> 8) as u8, word as u8)
    }

    fn is_win_color((r, g, b): (u8, u8, u8)) -> bool {
        r > 200 && g > 180 && b < 120
    }

    #[test]
    fn won_snapshot_draws_the_win_line() {
        let snapshot = snapshot_after(Mode::PvP, &[0, 3, 1, 4, 2]);
        assert_eq!(snapshot.win_endpoints, Some((0, 2)));
        // Center of cell 1 lies on the top-row line.
        assert!(is_win_color(pixel_after_render(&snapshot, 180, 70)));
        // Just past the center of cell 2, inside the extension.
        assert!(is_win_color(pixel_after_render(&snapshot, 310, 70)));
    }

    #[test]
    fn running_snapshot_has_no_win_line() {
        let snapshot = snapshot_after(Mode::PvP, &[0, 3, 1, 4]);
        assert_eq!(snapshot.win_endpoints, None);
        assert!(!is_win_color(pixel_after_render(&snapshot, 180, 70)));
    }

    #[test]
    fn hover_only_targets_clickable_cells() {
        let fresh = snapshot_after(Mode::PvP, &[]);
        assert_eq!(hover_target(&fresh, Some(4)), Some(4));
        assert_eq!(hover_target(&fresh, None), None);

        let taken = snapshot_after(Mode::PvP, &[4]);
        assert_eq!(hover_target(&taken, Some(4)), None);
        assert_eq!(hover_target(&taken, Some(0)), Some(0));

        let computer_turn = snapshot_after(Mode::PvComputer, &[4]);
        assert_eq!(hover_target(&computer_turn, Some(0)), None);

        let won = snapshot_after(Mode::PvP, &[0, 3, 1, 4, 2]);
        assert_eq!(hover_target(&won, Some(8)), None);

        let mut engine = GameEngine::new();
        engine.reset();
        assert_eq!(hover_target(&engine.snapshot(), Some(4)), None);
    }

    fn close(a: (f64, f64), b: (f64, f64)) -> bool {
        (a.0 - b.0).abs() < 1e-9 && (a.1 - b.1).abs() < 1e-9
    }

    #[test]
    fn clicks_map_to_row_major_cells() {
        assert_eq!(mouse_to_cell(70.0, 70.0, 360, 360), Some(0));
        assert_eq!(mouse_to_cell(290.0, 70.0, 360, 360), Some(2));
        assert_eq!(mouse_to_cell(70.0, 180.0, 360, 360), Some(3));
        assert_eq!(mouse_to_cell(290.0, 290.0, 360, 360), Some(8));
        // margin
        assert_eq!(mouse_to_cell(5.0, 5.0, 360, 360), None);
        assert_eq!(mouse_to_cell(350.0, 180.0, 360, 360), None);
    }

    #[test]
    fn wide_widgets_center_the_board() {
        // 720×360: scale 1, 180px bars on both sides.
        assert_eq!(mouse_to_cell(100.0, 70.0, 720, 360), None);
        assert_eq!(mouse_to_cell(250.0, 70.0, 720, 360), Some(0));
        // 720×720: scale 2.
        assert_eq!(mouse_to_cell(140.0, 580.0, 720, 720), Some(6));
        assert_eq!(mouse_to_cell(10.0, 10.0, 0, 0), None);
    }

    #[test]
    fn row_line_reaches_past_end_cells() {
        let (a, b) = win_line_segment(0, 2);
        assert!(close(a, (70.0 - WIN_LINE_EXTEND, 70.0)));
        assert!(close(b, (290.0 + WIN_LINE_EXTEND, 70.0)));

        let (a, b) = win_line_segment(1, 7);
        assert!(close(a, (180.0, 70.0 - WIN_LINE_EXTEND)));
        assert!(close(b, (180.0, 290.0 + WIN_LINE_EXTEND)));
    }

    #[test]
    fn diagonal_line_is_extended_along_its_direction() {
        let (a, b) = win_line_segment(2, 6);
        let (c2, c6) = (cell_center(2), cell_center(6));
        let base = ((c6.0 - c2.0).powi(2) + (c6.1 - c2.1).powi(2)).sqrt();
        let len = ((b.0 - a.0).powi(2) + (b.1 - a.1).powi(2)).sqrt();
        assert!((len - (base + 2.0 * WIN_LINE_EXTEND)).abs() < 1e-9);
        // Starts above-right of cell 2, ends below-left of cell 6.
        assert!(a.0 > c2.0 && a.1 < c2.1);
        assert!(b.0 < c6.0 && b.1 > c6.1);
    }
}
