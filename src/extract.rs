// This file contains the code for the pocp extract subcommand, which gathers the protein FASTA
// files out of a Prokka results tree into one flat directory with clean filenames.

// This file is part of pocp. pocp is free software: you can redistribute it and/or modify it
// under the terms of the GNU General Public License as published by the Free Software Foundation,
// either version 3 of the License, or (at your option) any later version. pocp is distributed in
// the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU General Public License for
// more details. You should have received a copy of the GNU General Public License along with
// pocp. If not, see <http://www.gnu.org/licenses/>.

use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use lazy_static::lazy_static;
use num_format::{Locale, ToFormattedString};
use regex::Regex;

use crate::log;
use crate::misc;


lazy_static! {
    static ref WHITESPACE_RE: Regex = Regex::new(r"\s+").unwrap();
}


pub fn extract(input: PathBuf, output: PathBuf) {
    let start_time = Instant::now();
    misc::check_if_dir_exists(&input);
    starting_message(&input, &output);
    misc::create_dir(&output);
    let faa_files = find_faa_files(&input);
    let copied_count = copy_faa_files(&faa_files, &output);
    finished_message(copied_count, &output, start_time);
}


fn starting_message(input: &Path, output: &Path) {
    log::section_header("Starting pocp extract");
    log::explanation("Prokka writes each genome's protein FASTA file into its own results \
                      directory. This gathers all .faa files under the input directory into one \
                      flat directory, replacing whitespace in filenames with underscores, ready \
                      for the pocp matrix subcommand.");
    eprintln!("Input directory:");
    eprintln!("  {}", input.display());
    eprintln!();
    eprintln!("Output directory:");
    eprintln!("  {}", output.display());
    eprintln!();
}


fn finished_message(copied_count: usize, output: &Path, start_time: Instant) {
    log::section_header("Finished!");
    eprintln!("{} protein FASTA files copied to {}",
              copied_count.to_formatted_string(&Locale::en), output.display());
    eprintln!();
    eprintln!("Time to run: {}", misc::format_duration(start_time.elapsed()));
    eprintln!();
}


/// Recursively finds all .faa files under a directory, sorted by path.
fn find_faa_files(input: &Path) -> Vec<PathBuf> {
    let mut faa_files = Vec::new();
    if let Err(e) = collect_faa_files(input, &mut faa_files) {
        misc::quit_with_error(&format!("unable to search {:?}: {}", input, e));
    }
    if faa_files.is_empty() {
        misc::quit_with_error(&format!("no .faa files found under {:?}", input));
    }
    faa_files.sort();
    faa_files
}


fn collect_faa_files(dir: &Path, faa_files: &mut Vec<PathBuf>) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_faa_files(&path, faa_files)?;
        } else if path.extension() == Some(OsStr::new("faa")) {
            faa_files.push(path);
        }
    }
    Ok(())
}


fn copy_faa_files(faa_files: &[PathBuf], output: &Path) -> usize {
    log::section_header("Copying protein FASTA files");
    for faa in faa_files {
        let dest = output.join(sanitised_filename(faa));
        if let Err(e) = fs::copy(faa, &dest) {
            misc::quit_with_error(&format!("unable to copy {:?} to {:?}: {}", faa, dest, e));
        }
        eprintln!("{} -> {}", faa.display(), dest.display());
    }
    eprintln!();
    faa_files.len()
}


fn sanitised_filename(path: &Path) -> String {
    let name = match path.file_name().and_then(|n| n.to_str()) {
        Some(name) => name,
        None => misc::quit_with_error(&format!("unable to get filename from {:?}", path)),
    };
    WHITESPACE_RE.replace_all(name, "_").into_owned()
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::panic;
    use tempfile::tempdir;

    #[test]
    fn test_sanitised_filename() {
        assert_eq!(sanitised_filename(Path::new("genome_1.faa")), "genome_1.faa");
        assert_eq!(sanitised_filename(Path::new("my genome.faa")), "my_genome.faa");
        assert_eq!(sanitised_filename(Path::new("a  b\tc.faa")), "a_b_c.faa");
    }

    #[test]
    fn test_find_faa_files_recursive() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("genome_1");
        fs::create_dir(&nested).unwrap();
        File::create(nested.join("genome_1.faa")).unwrap();
        File::create(nested.join("genome_1.gff")).unwrap();
        File::create(dir.path().join("top_level.faa")).unwrap();
        let found = find_faa_files(dir.path());
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|p| p.extension() == Some(OsStr::new("faa"))));
    }

    #[test]
    fn test_find_faa_files_none() {
        let dir = tempdir().unwrap();
        File::create(dir.path().join("genome_1.fna")).unwrap();
        assert!(panic::catch_unwind(|| {
            find_faa_files(dir.path());
        }).is_err());
    }

    #[test]
    fn test_extract_copies_and_renames() {
        let in_dir = tempdir().unwrap();
        let out_dir = tempdir().unwrap();
        let nested = in_dir.path().join("results");
        fs::create_dir(&nested).unwrap();
        File::create(nested.join("my genome.faa")).unwrap();
        extract(in_dir.path().to_path_buf(), out_dir.path().to_path_buf());
        assert!(out_dir.path().join("my_genome.faa").is_file());
    }
}
