//! Plain-text projection of a session: one block per horizontal layer, side by side.
//!
//! Each cell is its colour letter; selected cells are uppercase and empty slots are `.`.

use cubeclear::{CellSnapshot, GameSession, GridSnapshot, SessionStatus};

const LAYER_GAP: &str = "   ";

fn glyph(cell: &CellSnapshot) -> char {
    match (cell.active, cell.selected) {
        (false, _) => '.',
        (true, true) => cell.color.letter().to_ascii_uppercase(),
        (true, false) => cell.color.letter(),
    }
}

/// Layers y = 0 (floor) to y = size - 1 left to right; rows are z, columns are x.
pub fn render_grid(snapshot: &GridSnapshot) -> String {
    let size = snapshot.size;
    let at = |x: usize, y: usize, z: usize| &snapshot.cells[(x * size + y) * size + z];
    let width = size.max(2 + digits(size.saturating_sub(1)));
    let mut out = String::new();

    let headers: Vec<String> = (0..size)
        .map(|y| format!("{:<width$}", format!("y={y}")))
        .collect();
    out.push_str(headers.join(LAYER_GAP).trim_end());
    out.push('\n');

    for z in 0..size {
        let rows: Vec<String> = (0..size)
            .map(|y| {
                let row: String = (0..size).map(|x| glyph(at(x, y, z))).collect();
                format!("{row:<width$}")
            })
            .collect();
        out.push_str(rows.join(LAYER_GAP).trim_end());
        out.push('\n');
    }
    out
}

fn digits(n: usize) -> usize {
    n.checked_ilog10().map_or(1, |d| d as usize + 1)
}

pub fn render_status(status: &SessionStatus) -> String {
    let mut line = format!(
        "score {}  level {}  target {}",
        status.score, status.level, status.target
    );
    if !status.has_moves {
        line.push_str("  (no moves left)");
    }
    line
}

pub fn render_session(session: &GameSession) -> String {
    let mut out = render_grid(&session.grid_snapshot());
    let selection = session.selection_snapshot();
    if selection.size > 0 {
        let note = if selection.removable {
            ""
        } else {
            " (not removable)"
        };
        out.push_str(&format!("selected {} cell(s){note}\n", selection.size));
    }
    out.push_str(&render_status(&session.status()));
    out
}
