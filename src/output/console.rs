use crate::extract::Table;

/// One line per record, fields separated by a single space
pub fn format_plain(table: &Table) -> String {
    let mut out = String::new();
    for record in table.records() {
        out.push_str(&record.join(" "));
        out.push('\n');
    }
    out
}

/// A bordered table with left-aligned columns and the header on top
///
/// ```text
/// +------+---------+
/// | Link | Version |
/// +------+---------+
/// | ...  | 3.13    |
/// +------+---------+
/// ```
pub fn format_pretty(table: &Table) -> String {
    let widths: Vec<usize> = (0..table.header().len())
        .map(|col| {
            table
                .records()
                .filter_map(|record| record.get(col))
                .map(|field| field.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    let border = {
        let mut line = String::from("+");
        for width in &widths {
            line.push_str(&"-".repeat(width + 2));
            line.push('+');
        }
        line.push('\n');
        line
    };

    let render_row = |record: &Vec<String>| {
        let mut line = String::from("|");
        for (col, width) in widths.iter().enumerate() {
            let field = record.get(col).map(String::as_str).unwrap_or("");
            let padding = width - field.chars().count();
            line.push(' ');
            line.push_str(field);
            line.push_str(&" ".repeat(padding + 1));
            line.push('|');
        }
        line.push('\n');
        line
    };

    let mut out = border.clone();
    out.push_str(&render_row(table.header()));
    out.push_str(&border);
    for row in table.rows() {
        out.push_str(&render_row(row));
    }
    out.push_str(&border);
    out
}
