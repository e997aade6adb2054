//! Text rendering of the win probability matrix.

use fair_dice_core::ProbabilityMatrix;

const CORNER: &str = "User dice v";

/// Render the matrix as an ASCII table: one row per user die, one column per
/// computer die
pub fn render(matrix: &ProbabilityMatrix, precision: usize) -> String {
    let mut header = vec![CORNER.to_string()];
    header.extend(matrix.labels().iter().cloned());

    let body: Vec<Vec<String>> = matrix
        .labels()
        .iter()
        .zip(matrix.rows())
        .map(|(label, row)| {
            let mut cells = vec![label.clone()];
            cells.extend(row.iter().map(|p| format!("{:.*}", precision, p)));
            cells
        })
        .collect();

    let widths: Vec<usize> = (0..header.len())
        .map(|col| {
            std::iter::once(&header)
                .chain(body.iter())
                .map(|row| row[col].len())
                .max()
                .unwrap_or(0)
        })
        .collect();

    let rule = widths
        .iter()
        .map(|w| "-".repeat(w + 2))
        .collect::<Vec<_>>()
        .join("+");
    let rule = format!("+{}+", rule);
    let line = |row: &[String]| {
        let cells: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, w)| format!(" {:<w$} ", cell, w = *w))
            .collect();
        format!("|{}|", cells.join("|"))
    };

    let mut out = vec![rule.clone(), line(&header), rule.clone()];
    for row in &body {
        out.push(line(row));
    }
    out.push(rule);
    out.join("\n")
}
