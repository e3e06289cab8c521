// This file contains the code for the pocp matrix subcommand: the all-vs-all POCP computation
// over a directory of protein FASTA files.

// This file is part of pocp. pocp is free software: you can redistribute it and/or modify it
// under the terms of the GNU General Public License as published by the Free Software Foundation,
// either version 3 of the License, or (at your option) any later version. pocp is distributed in
// the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU General Public License for
// more details. You should have received a copy of the GNU General Public License along with
// pocp. If not, see <http://www.gnu.org/licenses/>.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use num_format::{Locale, ToFormattedString};

use crate::blast;
use crate::log;
use crate::misc;
use crate::report;


#[derive(Debug)]
struct Genome {
    name: String,
    path: PathBuf,
    total_proteins: usize,
}


pub fn matrix(input: PathBuf, output: PathBuf, threads: u32, min_identity: f64,
              min_coverage: f64, clean: bool) {
    let start_time = Instant::now();
    check_option_values(&min_identity, &min_coverage);
    misc::check_if_dir_exists(&input);
    misc::check_requirements(&["makeblastdb", "blastp"]);
    starting_message(&input, &output, &threads, &min_identity, &min_coverage, &clean);
    let genomes = load_genomes(&input);
    let (db_dir, blast_dir) = create_output_dirs(&output);
    let db_paths = build_databases(&genomes, &db_dir);

    let names: Vec<String> = genomes.iter().map(|g| g.name.clone()).collect();
    let mut pocp_matrix = report::PocpMatrix::new(&names);
    let stats_file = output.join("protein_stats.tsv");
    all_vs_all(&genomes, &db_paths, &blast_dir, &stats_file, threads, min_identity, min_coverage,
               &mut pocp_matrix);

    let matrix_file = output.join("matrix.tsv");
    if pocp_matrix.write_tsv(&matrix_file).is_err() {
        misc::quit_with_error(&format!("unable to write to {:?}", matrix_file));
    }
    if clean {
        clean_up(&db_dir, &blast_dir);
    }
    finished_message(&matrix_file, &stats_file, start_time);
}


fn starting_message(input: &Path, output: &Path, threads: &u32, min_identity: &f64,
                    min_coverage: &f64, clean: &bool) {
    log::section_header("Starting pocp matrix");
    log::explanation("POCP (Percentage of Conserved Proteins) is a genome-relatedness metric \
                      based on reciprocal BLASTP hits. For every pair of genomes, the proteins \
                      of each are searched against the other and hits meeting the identity and \
                      coverage thresholds count as conserved. The conserved counts from both \
                      directions over both genomes' protein totals give the pair's POCP.");
    eprintln!("Input protein FASTA directory:");
    eprintln!("  {}", input.display());
    eprintln!();
    eprintln!("Output directory:");
    eprintln!("  {}", output.display());
    eprintln!();
    eprintln!("Settings:");
    eprintln!("  --threads {}", threads);
    eprintln!("  --min_identity {}", min_identity);
    eprintln!("  --min_coverage {}", min_coverage);
    if *clean {
        eprintln!("  deleting intermediate files after completion");
    } else {
        eprintln!("  keeping intermediate files");
    }
    eprintln!();
}


fn finished_message(matrix_file: &Path, stats_file: &Path, start_time: Instant) {
    log::section_header("Finished!");
    eprintln!("POCP matrix: {}", matrix_file.display());
    eprintln!("Per-pair statistics: {}", stats_file.display());
    eprintln!();
    eprintln!("Time to run: {}", misc::format_duration(start_time.elapsed()));
    eprintln!();
}


/// Finds the protein FASTA files and counts each genome's proteins. Genome names come from the
/// file stems, so they are unique within the input directory.
fn load_genomes(input: &Path) -> Vec<Genome> {
    log::section_header("Loading genomes");
    let fasta_files = misc::find_files_with_extension(input, "faa");
    if fasta_files.len() < 2 {
        misc::quit_with_error(&format!("at least two .faa files are required in {:?} (found {})",
                                       input, fasta_files.len()));
    }
    let mut genomes = Vec::new();
    for filename in &fasta_files {
        let name = misc::filename_stem(filename);
        let total_proteins = match misc::count_fasta_seqs(filename) {
            Ok(count) => count,
            Err(_) => misc::quit_with_error(&format!("unable to read {:?}", filename)),
        };
        if total_proteins == 0 {
            misc::quit_with_error(&format!("no sequences in {:?}", filename));
        }
        eprintln!("{} ({} proteins)", name, total_proteins.to_formatted_string(&Locale::en));
        genomes.push(Genome { name, path: filename.clone(), total_proteins });
    }
    eprintln!();
    genomes
}


fn create_output_dirs(output: &Path) -> (PathBuf, PathBuf) {
    let db_dir = output.join("db");
    let blast_dir = output.join("blast");
    misc::create_dir(output);
    misc::create_dir(&db_dir);
    misc::create_dir(&blast_dir);
    (db_dir, blast_dir)
}


fn build_databases(genomes: &[Genome], db_dir: &Path) -> HashMap<String, PathBuf> {
    log::section_header("Building BLAST databases");
    log::explanation("Each genome's proteins are indexed into a BLAST database. Databases left \
                      on disk by a previous run are reused rather than rebuilt.");
    let mut db_paths = HashMap::new();
    for genome in genomes {
        let db_path = blast::build_database(&genome.path, db_dir);
        db_paths.insert(genome.name.clone(), db_path);
    }
    eprintln!();
    db_paths
}


#[allow(clippy::too_many_arguments)]
fn all_vs_all(genomes: &[Genome], db_paths: &HashMap<String, PathBuf>, blast_dir: &Path,
              stats_file: &Path, threads: u32, min_identity: f64, min_coverage: f64,
              pocp_matrix: &mut report::PocpMatrix) {
    log::section_header("All-vs-all comparisons");
    log::explanation("For each pair of genomes, BLASTP runs in both directions and the hits \
                      meeting the thresholds are counted as conserved proteins. Each pair's \
                      result goes into the matrix and the statistics log as soon as it is \
                      computed.");
    for i in 0..genomes.len() {
        for j in i+1..genomes.len() {
            let genome_1 = &genomes[i];
            let genome_2 = &genomes[j];
            eprintln!("{} vs {}:", genome_1.name, genome_2.name);

            let out_1 = blast_dir.join(format!("{}_vs_{}.tab", genome_1.name, genome_2.name));
            let out_2 = blast_dir.join(format!("{}_vs_{}.tab", genome_2.name, genome_1.name));
            blast::run_blastp(&genome_1.path, &db_paths[&genome_2.name], &out_1, threads);
            blast::run_blastp(&genome_2.path, &db_paths[&genome_1.name], &out_2, threads);

            let conserved_1 = blast::count_conserved(&out_1, min_identity, min_coverage);
            let conserved_2 = blast::count_conserved(&out_2, min_identity, min_coverage);
            let pocp = round_pocp(blast::calculate_pocp(conserved_1, genome_1.total_proteins,
                                                        conserved_2, genome_2.total_proteins));
            pocp_matrix.set(&genome_1.name, &genome_2.name, pocp);
            let result = report::append_stats_row(stats_file, &genome_1.name, &genome_2.name,
                                                  genome_1.total_proteins,
                                                  genome_2.total_proteins,
                                                  conserved_1, conserved_2, pocp);
            if result.is_err() {
                misc::quit_with_error(&format!("unable to write to {:?}", stats_file));
            }

            eprintln!("  {} of {} conserved in {}",
                      conserved_1.to_formatted_string(&Locale::en),
                      genome_1.total_proteins.to_formatted_string(&Locale::en), genome_1.name);
            eprintln!("  {} of {} conserved in {}",
                      conserved_2.to_formatted_string(&Locale::en),
                      genome_2.total_proteins.to_formatted_string(&Locale::en), genome_2.name);
            eprintln!("  POCP = {:.2}%", pocp);
            eprintln!();
        }
    }
}


fn clean_up(db_dir: &Path, blast_dir: &Path) {
    log::section_header("Cleaning up");
    for dir in [blast_dir, db_dir] {
        if let Err(e) = misc::delete_dir_contents(dir) {
            misc::quit_with_error(&format!("unable to clean {:?}: {}", dir, e));
        }
        eprintln!("removed intermediate files from {}", dir.display());
    }
    eprintln!();
}


/// Rounds a POCP value to 2 decimals. Uses round-half-to-even so the behaviour matches the
/// previous Python implementation.
fn round_pocp(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}


fn check_option_values(min_identity: &f64, min_coverage: &f64) {
    if *min_identity <= 0.0 || *min_identity > 100.0 {
        misc::quit_with_error("--min_identity must be greater than 0 and at most 100");
    }
    if *min_coverage <= 0.0 || *min_coverage > 100.0 {
        misc::quit_with_error("--min_coverage must be greater than 0 and at most 100");
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use std::panic;
    use tempfile::tempdir;

    fn write_fasta(dir: &Path, name: &str, seq_count: usize) -> PathBuf {
        let path = dir.join(name);
        let mut file = File::create(&path).unwrap();
        for i in 0..seq_count {
            writeln!(file, ">protein_{}", i).unwrap();
            writeln!(file, "MKVLAT").unwrap();
        }
        path
    }

    #[test]
    fn test_load_genomes() {
        let dir = tempdir().unwrap();
        write_fasta(dir.path(), "genome_b.faa", 12);
        write_fasta(dir.path(), "genome_a.faa", 10);
        write_fasta(dir.path(), "unrelated.txt", 5);
        let genomes = load_genomes(dir.path());
        assert_eq!(genomes.len(), 2);
        assert_eq!(genomes[0].name, "genome_a");
        assert_eq!(genomes[0].total_proteins, 10);
        assert_eq!(genomes[1].name, "genome_b");
        assert_eq!(genomes[1].total_proteins, 12);
    }

    #[test]
    fn test_load_genomes_needs_two() {
        let dir = tempdir().unwrap();
        write_fasta(dir.path(), "only.faa", 10);
        assert!(panic::catch_unwind(|| {
            load_genomes(dir.path());
        }).is_err());
    }

    #[test]
    fn test_load_genomes_rejects_empty_fasta() {
        let dir = tempdir().unwrap();
        write_fasta(dir.path(), "genome_a.faa", 10);
        write_fasta(dir.path(), "genome_b.faa", 0);
        assert!(panic::catch_unwind(|| {
            load_genomes(dir.path());
        }).is_err());
    }

    #[test]
    fn test_check_option_values() {
        check_option_values(&40.0, &50.0);
        assert!(panic::catch_unwind(|| check_option_values(&0.0, &50.0)).is_err());
        assert!(panic::catch_unwind(|| check_option_values(&40.0, &101.0)).is_err());
    }

    #[test]
    fn test_create_output_dirs() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("results");
        let (db_dir, blast_dir) = create_output_dirs(&output);
        assert!(db_dir.is_dir());
        assert!(blast_dir.is_dir());
        assert_eq!(db_dir, output.join("db"));
        assert_eq!(blast_dir, output.join("blast"));
    }

    #[test]
    fn test_pocp_rounding() {
        // the worked example: 2 of 10 and 3 of 12 conserved
        let pocp = round_pocp(blast::calculate_pocp(2, 10, 3, 12));
        assert_eq!(pocp, 22.73);
        assert_eq!(round_pocp(100.0), 100.0);
        assert_eq!(round_pocp(87.456), 87.46);
    }
}
