use std::fmt::Write;

use panelgen_core::*;

/// Two characters per cell: the solution (`#` lit, `.` unlit, `x` disabled) and the symbol.
///
/// Locked cells show their solution as `@` and `o`. Diamonds are drawn with the initial of
/// their color, flowers with their petal count.
pub fn grid(grid: &Grid) -> String {
    let mut out = String::new();
    for y in 0..grid.height() {
        for x in 0..grid.width() {
            let coords = (x, y);
            let cell = grid.cell(coords);
            let state = match (grid.is_disabled(coords), cell.locked, cell.solution) {
                (true, _, _) => 'x',
                (false, true, true) => '@',
                (false, true, false) => 'o',
                (false, false, true) => '#',
                (false, false, false) => '.',
            };
            out.push(state);
            out.push(symbol(cell.symbol, cell.color));
        }
        out.push('\n');
    }
    out
}

/// One character per cell: `#` and `.` for revealed cells, `?` for gaps and `x` for disabled cells.
pub fn canvas(canvas: &Canvas) -> String {
    let (width, height) = canvas.size();
    let mut out = String::new();
    for y in 0..height {
        for x in 0..width {
            let ch = match canvas.cell((x, y)) {
                _ if canvas.layout().is_disabled((x, y)) => 'x',
                CanvasCell::On => '#',
                CanvasCell::Off => '.',
                CanvasCell::Undecided => '?',
            };
            out.push(ch);
        }
        out.push('\n');
    }
    out
}

pub fn report(report: &catalog::CatalogReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "generated: {:?}", report.generated);
    let _ = writeln!(out, "skipped:   {:?}", report.skipped);
    let _ = writeln!(out, "attempts:  {}", report.attempts);
    out
}

/// One line per stored puzzle: id, size and how many cells carry a symbol.
pub fn summary(id: PuzzleId, grid: &Grid) -> String {
    let enabled = grid.layout().enabled_cell_count();
    let symbols = enabled as usize - grid.open_tiles().len();
    format!(
        "{id:>5}  {}x{}  {enabled} enabled, {symbols} symbols\n",
        grid.width(),
        grid.height()
    )
}

fn symbol(symbol: Symbol, color: Color) -> char {
    match symbol {
        Symbol::None => ' ',
        Symbol::Diamond => color_initial(color),
        Symbol::Dice => '%',
        Symbol::Bar => '|',
        Symbol::Flower(petals) => char::from(b'0' + petals),
    }
}

fn color_initial(color: Color) -> char {
    match color {
        Color::Black => 'K',
        Color::White => 'W',
        Color::Gray => 'G',
        Color::Gold => 'Y',
        Color::Teal => 'T',
        Color::PetalPurple => 'P',
        Color::Red => 'R',
        Color::Orange => 'O',
        Color::Blue => 'B',
    }
}
