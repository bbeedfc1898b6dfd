use itertools::Itertools;

/// Write a column-aligned text table. Every row must have one cell per
/// header.
pub(crate) fn render(
    f: &mut std::fmt::Formatter<'_>,
    headers: &[&str],
    rows: &[Vec<String>],
) -> std::fmt::Result {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }

    let header = headers
        .iter()
        .zip(&widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .join(" | ");
    writeln!(f, "{header}")?;
    writeln!(f, "{}", "-".repeat(header.len()))?;

    for row in rows {
        let line = row
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!("{cell:<width$}"))
            .join(" | ");
        writeln!(f, "{line}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    struct Sample;

    impl std::fmt::Display for Sample {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            super::render(
                f,
                &["Id", "Name"],
                &[
                    vec!["0".to_string(), "start".to_string()],
                    vec!["10".to_string(), "x".to_string()],
                ],
            )
        }
    }

    #[test]
    fn columns_are_aligned() {
        let rendered = Sample.to_string();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "Id | Name");
        assert_eq!(lines[2], "0  | start");
        assert_eq!(lines[3], "10 | x");
    }
}
