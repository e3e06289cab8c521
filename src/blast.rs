// This file contains the code for interacting with the BLAST+ suite: building protein databases,
// running directional BLASTP searches and counting conserved proteins in the tabular output.

// This file is part of pocp. pocp is free software: you can redistribute it and/or modify it
// under the terms of the GNU General Public License as published by the Free Software Foundation,
// either version 3 of the License, or (at your option) any later version. pocp is distributed in
// the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU General Public License for
// more details. You should have received a copy of the GNU General Public License along with
// pocp. If not, see <http://www.gnu.org/licenses/>.

use std::collections::HashSet;
use std::ffi::OsStr;
use std::fs::File;
use std::io;
use std::io::{prelude::*, BufReader};
use std::path::{Path, PathBuf};

use crate::misc::{quit_with_error, run_command};


/// One line of BLASTP tabular output (-outfmt "6 std qlen"), keeping only the columns needed for
/// the conserved-protein decision.
#[derive(Debug, PartialEq)]
pub struct BlastHit {
    qseqid: String,
    pident: f64,
    length: f64,
    qlen: f64,
}

impl BlastHit {
    fn new(blast_line: &str) -> Result<BlastHit, &'static str> {
        let parts = blast_line.split('\t').collect::<Vec<&str>>();
        if parts.len() < 13 {
            return Err("too few columns");
        }
        let qseqid = parts[0];
        let pident = parts[2].parse::<f64>().map_err(|_| "invalid identity value")?;
        let length = parts[3].parse::<f64>().map_err(|_| "invalid alignment length")?;
        let qlen = parts[12].parse::<f64>().map_err(|_| "invalid query length")?;

        Ok(BlastHit {
            qseqid: qseqid.to_string(),
            pident,
            length,
            qlen,
        })
    }

    fn query_coverage(&self) -> f64 {
        self.length / self.qlen * 100.0
    }

    fn is_conserved(&self, min_identity: f64, min_coverage: f64) -> bool {
        self.pident >= min_identity && self.query_coverage() >= min_coverage
    }
}


/// Builds a protein BLAST database for one genome, unless its index file already exists from a
/// previous run. Returns the database path.
pub fn build_database(fasta: &Path, db_dir: &Path) -> PathBuf {
    let basename = match fasta.file_name() {
        Some(name) => name,
        None => quit_with_error(&format!("unable to get filename from {:?}", fasta)),
    };
    let db_path = db_dir.join(basename);

    let mut index_file = db_path.clone().into_os_string();
    index_file.push(".pin");
    if PathBuf::from(index_file).is_file() {
        eprintln!("{} (already built)", db_path.display());
        return db_path;
    }

    eprintln!("{}", db_path.display());
    let args: Vec<&OsStr> = vec!["-in".as_ref(), fasta.as_os_str(),
                                 "-dbtype".as_ref(), "prot".as_ref(),
                                 "-parse_seqids".as_ref(),
                                 "-out".as_ref(), db_path.as_os_str()];
    run_command("makeblastdb", &args);
    db_path
}


/// Runs one directional BLASTP search, writing tabular output (with the query length appended)
/// restricted to the single best hit per query.
pub fn run_blastp(query: &Path, db: &Path, output: &Path, threads: u32) {
    let threads = threads.to_string();
    let args: Vec<&OsStr> = vec!["-query".as_ref(), query.as_os_str(),
                                 "-db".as_ref(), db.as_os_str(),
                                 "-out".as_ref(), output.as_os_str(),
                                 "-evalue".as_ref(), "1e-5".as_ref(),
                                 "-outfmt".as_ref(), "6 std qlen".as_ref(),
                                 "-max_target_seqs".as_ref(), "1".as_ref(),
                                 "-num_threads".as_ref(), threads.as_ref()];
    run_command("blastp", &args);
}


/// Counts the distinct query proteins in a BLASTP tabular file with identity and query coverage
/// at or above the thresholds.
pub fn count_conserved(filename: &Path, min_identity: f64, min_coverage: f64) -> usize {
    let result = count_conserved_queries(filename, min_identity, min_coverage);
    match result {
        Ok(count) => count,
        Err(_) => quit_with_error(&format!("unable to read BLAST output from {:?}", filename)),
    }
}


fn count_conserved_queries(filename: &Path, min_identity: f64,
                           min_coverage: f64) -> io::Result<usize> {
    let file = File::open(filename)?;
    let reader = BufReader::new(file);
    let mut conserved: HashSet<String> = HashSet::new();

    let mut line_count: usize = 0;
    for line in reader.lines() {
        line_count += 1;
        let blast_line = line?;
        if blast_line.is_empty() {continue;}

        let hit = match BlastHit::new(&blast_line) {
            Ok(hit) => hit,
            Err(e) => quit_with_error(&format!("{} in {:?} (line {})", e, filename, line_count)),
        };
        if hit.is_conserved(min_identity, min_coverage) {
            conserved.insert(hit.qseqid);
        }
    }
    Ok(conserved.len())
}


/// The POCP formula from Qin et al. 2014: conserved proteins in both directions over total
/// proteins in both genomes, as a percentage.
pub fn calculate_pocp(conserved_1: usize, total_1: usize,
                      conserved_2: usize, total_2: usize) -> f64 {
    (conserved_1 + conserved_2) as f64 / (total_1 + total_2) as f64 * 100.0
}
