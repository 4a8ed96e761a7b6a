use super::error::{PhyloError, PhyloResult};
use anyhow::Context;
use itertools::Itertools;
use std::collections::HashSet;

/// A square distance matrix over an ordered set of unique labels.
///
/// Values are stored row-major. Only the upper triangle is consulted when
/// building trees, so mild asymmetry in the input is tolerated (and reported).
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    names: Vec<String>,
    values: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Delimiter {
    Tab,
    Comma,
    Whitespace,
}

impl Delimiter {
    fn detect(line: &str) -> Self {
        if line.contains('\t') {
            Delimiter::Tab
        } else if line.contains(',') {
            Delimiter::Comma
        } else {
            Delimiter::Whitespace
        }
    }

    fn split<'a>(&self, line: &'a str) -> Vec<&'a str> {
        match self {
            Delimiter::Tab => line.split('\t').map(clean_cell).collect(),
            Delimiter::Comma => line.split(',').map(clean_cell).collect(),
            Delimiter::Whitespace => line.split_whitespace().collect(),
        }
    }
}

// Trim and drop one level of surrounding double quotes, as CSV writers emit them
fn clean_cell(cell: &str) -> &str {
    let cell = cell.trim();
    cell.strip_prefix('"')
        .and_then(|c| c.strip_suffix('"'))
        .unwrap_or(cell)
}

impl DistanceMatrix {
    /// Create a matrix from labels and row-major values.
    ///
    /// ```
    /// use phylofam::libs::phylo::matrix::DistanceMatrix;
    /// let names = vec!["A".to_string(), "B".to_string()];
    /// let m = DistanceMatrix::new(names, vec![0.0, 1.5, 1.5, 0.0]).unwrap();
    /// assert_eq!(m.size(), 2);
    /// assert_eq!(m.get(0, 1), 1.5);
    ///
    /// let dup = vec!["A".to_string(), "A".to_string()];
    /// assert!(DistanceMatrix::new(dup, vec![0.0; 4]).is_err());
    /// ```
    pub fn new(names: Vec<String>, values: Vec<f64>) -> PhyloResult<Self> {
        let n = names.len();
        if values.len() != n * n {
            return Err(PhyloError::Format(format!(
                "{} labels need {} values, got {}",
                n,
                n * n,
                values.len()
            )));
        }

        let mut seen = HashSet::with_capacity(n);
        for name in &names {
            if !seen.insert(name.as_str()) {
                return Err(PhyloError::Format(format!("duplicated label: {}", name)));
            }
        }

        let matrix = Self { names, values };
        matrix.report_oddities();
        Ok(matrix)
    }

    pub fn size(&self) -> usize {
        self.names.len()
    }

    pub fn get_names(&self) -> &[String] {
        &self.names
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.size() + j]
    }

    /// Pairwise distances with `i < j`, in row-major order.
    ///
    /// ```
    /// use phylofam::libs::phylo::matrix::DistanceMatrix;
    /// let names = ["A", "B", "C"].iter().map(|s| s.to_string()).collect();
    /// let m = DistanceMatrix::new(names, vec![0., 1., 3., 1., 0., 3., 3., 3., 0.]).unwrap();
    /// assert_eq!(m.upper_triangle(), vec![(0, 1, 1.0), (0, 2, 3.0), (1, 2, 3.0)]);
    /// ```
    pub fn upper_triangle(&self) -> Vec<(usize, usize, f64)> {
        (0..self.size())
            .tuple_combinations()
            .map(|(i, j)| (i, j, self.get(i, j)))
            .collect()
    }

    /// Parse a labeled matrix.
    ///
    /// Two layouts are recognized:
    ///
    /// * A table with a header row of labels and a leading label column.
    ///   Cells are separated by tabs, commas or runs of whitespace. The
    ///   header may carry an extra corner cell (empty or an index name).
    /// * Relaxed PHYLIP: the first line holds the dimension, followed by one
    ///   `label d1 d2 ...` line per row.
    ///
    /// Blank lines and lines starting with `#` are skipped.
    pub fn parse(text: &str) -> PhyloResult<Self> {
        let lines: Vec<&str> = text
            .lines()
            .filter(|l| !l.trim().is_empty() && !l.trim_start().starts_with('#'))
            .collect();

        let Some(first) = lines.first() else {
            return Err(PhyloError::Format("empty matrix".to_string()));
        };

        if let Ok(n) = first.trim().parse::<usize>() {
            Self::parse_phylip(n, &lines[1..])
        } else {
            Self::parse_table(first, &lines[1..])
        }
    }

    fn parse_table(header: &str, rows: &[&str]) -> PhyloResult<Self> {
        let delim = Delimiter::detect(header);
        let mut columns = delim.split(header);
        if delim == Delimiter::Whitespace {
            columns.retain(|c| !c.is_empty());
        }

        let n = rows.len();
        if columns.len() == n + 1 {
            // corner cell of the label column
            columns.remove(0);
        }
        if columns.len() != n {
            return Err(PhyloError::Format(format!(
                "matrix is not square: {} columns, {} rows",
                columns.len(),
                n
            )));
        }

        let mut names = Vec::with_capacity(n);
        let mut values = Vec::with_capacity(n * n);
        for (i, row) in rows.iter().enumerate() {
            let cells = delim.split(row);
            let (name, cells) = split_row(&cells, n, i)?;
            if name != columns[i] {
                return Err(PhyloError::Format(format!(
                    "row {} label '{}' does not match column label '{}'",
                    i + 1,
                    name,
                    columns[i]
                )));
            }
            names.push(name.to_string());
            values.extend(parse_cells(name, cells)?);
        }

        Self::new(names, values)
    }

    fn parse_phylip(n: usize, rows: &[&str]) -> PhyloResult<Self> {
        if rows.len() != n {
            return Err(PhyloError::Format(format!(
                "PHYLIP header declares {} taxa, found {} rows",
                n,
                rows.len()
            )));
        }

        let mut names = Vec::with_capacity(n);
        let mut values = Vec::with_capacity(n * n);
        for (i, row) in rows.iter().enumerate() {
            let cells: Vec<&str> = row.split_whitespace().collect();
            let (name, cells) = split_row(&cells, n, i)?;
            names.push(name.to_string());
            values.extend(parse_cells(name, cells)?);
        }

        Self::new(names, values)
    }

    /// Load a matrix from a file (`stdin` and `.gz` are accepted).
    pub fn from_file(infile: &str) -> anyhow::Result<Self> {
        let text = crate::libs::io::read_to_string(infile)?;
        let matrix =
            Self::parse(&text).with_context(|| format!("invalid matrix in {}", infile))?;
        tracing::info!("Loaded {}x{} matrix from {}", matrix.size(), matrix.size(), infile);
        Ok(matrix)
    }

    // Values are passed through untouched; suspicious ones are only logged
    fn report_oddities(&self) {
        let n = self.size();
        for i in 0..n {
            if self.get(i, i) != 0.0 {
                tracing::warn!("Non-zero diagonal for {}: {}", self.names[i], self.get(i, i));
            }
            for j in (i + 1)..n {
                let d = self.get(i, j);
                if d < 0.0 {
                    tracing::warn!(
                        "Negative distance between {} and {}: {}",
                        self.names[i],
                        self.names[j],
                        d
                    );
                }
                if d != self.get(j, i) {
                    tracing::warn!(
                        "Asymmetric distance between {} and {}, using {}",
                        self.names[i],
                        self.names[j],
                        d
                    );
                }
            }
        }
    }
}

fn split_row<'a, 'b>(
    cells: &'b [&'a str],
    n: usize,
    i: usize,
) -> PhyloResult<(&'a str, &'b [&'a str])> {
    match cells.split_first() {
        Some((name, rest)) if rest.len() == n => Ok((*name, rest)),
        _ => Err(PhyloError::Format(format!(
            "row {} has {} distances, expected {}",
            i + 1,
            cells.len().saturating_sub(1),
            n
        ))),
    }
}

fn parse_cells(name: &str, cells: &[&str]) -> PhyloResult<Vec<f64>> {
    cells
        .iter()
        .map(|cell| match cell.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(v),
            _ => Err(PhyloError::Format(format!(
                "row {}: '{}' is not a distance",
                name, cell
            ))),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_csv() {
        let text = ",A,B,C\nA,0,1,3\nB,1,0,3\nC,3,3,0\n";
        let m = DistanceMatrix::parse(text).unwrap();
        assert_eq!(m.get_names(), &["A", "B", "C"]);
        assert_eq!(m.get(0, 2), 3.0);
        assert_eq!(m.get(2, 1), 3.0);
    }

    #[test]
    fn test_parse_quoted_csv_with_index_name() {
        let text = "\"sample\",\"A\",\"B\"\n\"A\",0,0.25\n\"B\",0.25,0\n";
        let m = DistanceMatrix::parse(text).unwrap();
        assert_eq!(m.get_names(), &["A", "B"]);
        assert_eq!(m.get(1, 0), 0.25);
    }

    #[test]
    fn test_parse_tsv_and_whitespace() {
        let tsv = "\tA\tB\nA\t0\t2\nB\t2\t0\n";
        let m = DistanceMatrix::parse(tsv).unwrap();
        assert_eq!(m.get(0, 1), 2.0);

        let ws = "   A   B\nA  0  2\nB  2  0\n";
        let m = DistanceMatrix::parse(ws).unwrap();
        assert_eq!(m.get_names(), &["A", "B"]);
    }

    #[test]
    fn test_parse_phylip() {
        let text = "3\nA 0 2 4\nB 2 0 4\nC 4 4 0\n";
        let m = DistanceMatrix::parse(text).unwrap();
        assert_eq!(m.size(), 3);
        assert_eq!(m.get(2, 0), 4.0);
    }

    #[test]
    fn test_parse_skips_comments_and_blank_lines() {
        let text = "# distances\n\n,A,B\nA,0,1\n\nB,1,0\n";
        let m = DistanceMatrix::parse(text).unwrap();
        assert_eq!(m.size(), 2);
    }

    #[test]
    fn test_not_square() {
        let text = ",A,B,C\nA,0,1,3\nB,1,0,3\n";
        let err = DistanceMatrix::parse(text).unwrap_err();
        assert!(matches!(err, PhyloError::Format(_)));

        let text = ",A,B\nA,0,1\nB,1\n";
        assert!(matches!(
            DistanceMatrix::parse(text),
            Err(PhyloError::Format(_))
        ));
    }

    #[test]
    fn test_duplicated_label() {
        let text = ",A,A\nA,0,1\nA,1,0\n";
        let err = DistanceMatrix::parse(text).unwrap_err();
        assert!(err.to_string().contains("duplicated label"));
    }

    #[test]
    fn test_label_order_mismatch() {
        let text = ",A,B\nB,0,1\nA,1,0\n";
        let err = DistanceMatrix::parse(text).unwrap_err();
        assert!(err.to_string().contains("does not match"));
    }

    #[test]
    fn test_bad_cell() {
        let text = ",A,B\nA,0,x\nB,1,0\n";
        assert!(matches!(
            DistanceMatrix::parse(text),
            Err(PhyloError::Format(_))
        ));
        assert!(DistanceMatrix::parse("").is_err());
    }

    #[test]
    fn test_negative_passes_through() {
        let text = ",A,B\nA,0,-1\nB,-1,0\n";
        let m = DistanceMatrix::parse(text).unwrap();
        assert_eq!(m.get(0, 1), -1.0);
    }
}
