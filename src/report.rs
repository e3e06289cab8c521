// This file contains the two report formats produced by a POCP run: the symmetric all-vs-all
// matrix and the append-only per-pair statistics log.

// This file is part of pocp. pocp is free software: you can redistribute it and/or modify it
// under the terms of the GNU General Public License as published by the Free Software Foundation,
// either version 3 of the License, or (at your option) any later version. pocp is distributed in
// the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU General Public License for
// more details. You should have received a copy of the GNU General Public License along with
// pocp. If not, see <http://www.gnu.org/licenses/>.

use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io;
use std::io::{prelude::*, BufWriter};
use std::path::Path;

use crate::misc::quit_with_error;


const STATS_HEADER: &str = "Genome1\tGenome2\tTotal_Proteins_G1\tTotal_Proteins_G2\t\
                            Conserved_G1\tConserved_G2\tPOCP";


/// A symmetric genome-by-genome POCP table. The diagonal is fixed at 100 when the matrix is
/// created and off-diagonal cells are filled once per unordered pair.
pub struct PocpMatrix {
    names: Vec<String>,
    indices: HashMap<String, usize>,
    values: Vec<Vec<f64>>,
}

impl PocpMatrix {
    pub fn new(names: &[String]) -> PocpMatrix {
        let mut values = vec![vec![0.0; names.len()]; names.len()];
        for (i, row) in values.iter_mut().enumerate() {
            row[i] = 100.0;
        }
        let indices = names.iter().enumerate().map(|(i, name)| (name.clone(), i)).collect();
        PocpMatrix {
            names: names.to_vec(),
            indices,
            values,
        }
    }

    fn index_of(&self, name: &str) -> usize {
        match self.indices.get(name) {
            Some(i) => *i,
            None => quit_with_error(&format!("genome {} not in matrix", name)),
        }
    }

    /// Stores one pair's POCP, writing both cells so the matrix stays symmetric.
    pub fn set(&mut self, name_1: &str, name_2: &str, pocp: f64) {
        let i = self.index_of(name_1);
        let j = self.index_of(name_2);
        self.values[i][j] = pocp;
        self.values[j][i] = pocp;
    }

    #[cfg(test)]
    pub fn get(&self, name_1: &str, name_2: &str) -> f64 {
        self.values[self.index_of(name_1)][self.index_of(name_2)]
    }

    pub fn write_tsv(&self, filename: &Path) -> io::Result<()> {
        let file = File::create(filename)?;
        let mut writer = BufWriter::new(file);
        writeln!(writer, "\t{}", self.names.join("\t"))?;
        for (name, row) in self.names.iter().zip(&self.values) {
            let cells: Vec<String> = row.iter().map(|v| format!("{:.2}", v)).collect();
            writeln!(writer, "{}\t{}", name, cells.join("\t"))?;
        }
        Ok(())
    }
}


/// Appends one pair's statistics to the log, writing the header first if the file is new. The
/// log accumulates across runs that share an output directory.
#[allow(clippy::too_many_arguments)]
pub fn append_stats_row(filename: &Path, name_1: &str, name_2: &str,
                        total_1: usize, total_2: usize,
                        conserved_1: usize, conserved_2: usize, pocp: f64) -> io::Result<()> {
    let needs_header = !filename.exists();
    let mut file = OpenOptions::new().append(true).create(true).open(filename)?;
    if needs_header {
        writeln!(file, "{}", STATS_HEADER)?;
    }
    writeln!(file, "{}\t{}\t{}\t{}\t{}\t{}\t{:.2}",
             name_1, name_2, total_1, total_2, conserved_1, conserved_2, pocp)?;
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_diagonal_is_100() {
        let matrix = PocpMatrix::new(&names(&["a", "b", "c"]));
        for genome in ["a", "b", "c"] {
            assert_eq!(matrix.get(genome, genome), 100.0);
        }
    }

    #[test]
    fn test_set_is_symmetric() {
        let mut matrix = PocpMatrix::new(&names(&["a", "b", "c"]));
        matrix.set("a", "b", 22.73);
        matrix.set("b", "c", 87.5);
        assert_eq!(matrix.get("a", "b"), matrix.get("b", "a"));
        assert_eq!(matrix.get("b", "c"), matrix.get("c", "b"));
        assert_eq!(matrix.get("a", "b"), 22.73);
    }

    #[test]
    fn test_write_tsv() {
        let mut matrix = PocpMatrix::new(&names(&["a", "b"]));
        matrix.set("a", "b", 22.73);
        let dir = tempdir().unwrap();
        let tsv = dir.path().join("matrix.tsv");
        matrix.write_tsv(&tsv).unwrap();
        let contents = fs::read_to_string(&tsv).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines[0], "\ta\tb");
        assert_eq!(lines[1], "a\t100.00\t22.73");
        assert_eq!(lines[2], "b\t22.73\t100.00");
    }

    #[test]
    fn test_stats_header_written_once() {
        let dir = tempdir().unwrap();
        let stats = dir.path().join("protein_stats.tsv");
        append_stats_row(&stats, "a", "b", 10, 12, 2, 3, 22.73).unwrap();
        append_stats_row(&stats, "a", "c", 10, 20, 5, 6, 36.67).unwrap();
        let contents = fs::read_to_string(&stats).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Genome1\tGenome2"));
        assert_eq!(lines[1], "a\tb\t10\t12\t2\t3\t22.73");
        assert_eq!(lines[2], "a\tc\t10\t20\t5\t6\t36.67");
    }
}
