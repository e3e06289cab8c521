// This file contains the code for the pocp annotate subcommand, which runs Prokka over a
// directory of genome FASTA files and collects the resulting GFF annotations.

// This file is part of pocp. pocp is free software: you can redistribute it and/or modify it
// under the terms of the GNU General Public License as published by the Free Software Foundation,
// either version 3 of the License, or (at your option) any later version. pocp is distributed in
// the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU General Public License for
// more details. You should have received a copy of the GNU General Public License along with
// pocp. If not, see <http://www.gnu.org/licenses/>.

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use num_format::{Locale, ToFormattedString};

use crate::log;
use crate::misc;


pub fn annotate(input: PathBuf, output: PathBuf, threads: u32) {
    let start_time = Instant::now();
    misc::check_if_dir_exists(&input);
    misc::check_requirements(&["prokka"]);
    starting_message(&input, &output, &threads);
    let fna_files = find_fna_files(&input);
    let (prokka_dir, gff_dir) = create_output_dirs(&output);
    let gff_count = annotate_genomes(&fna_files, &prokka_dir, &gff_dir, threads);
    finished_message(gff_count, &gff_dir, start_time);
}


fn starting_message(input: &Path, output: &Path, threads: &u32) {
    log::section_header("Starting pocp annotate");
    log::explanation("Each genome FASTA file in the input directory is annotated with Prokka. \
                      The per-genome Prokka results are kept and the GFF files are additionally \
                      gathered into one directory.");
    eprintln!("Input genome FASTA directory:");
    eprintln!("  {}", input.display());
    eprintln!();
    eprintln!("Output directory:");
    eprintln!("  {}", output.display());
    eprintln!();
    eprintln!("Settings:");
    eprintln!("  --threads {}", threads);
    eprintln!();
}


fn finished_message(gff_count: usize, gff_dir: &Path, start_time: Instant) {
    log::section_header("Finished!");
    eprintln!("{} GFF files collected in {}",
              gff_count.to_formatted_string(&Locale::en), gff_dir.display());
    eprintln!();
    eprintln!("Time to run: {}", misc::format_duration(start_time.elapsed()));
    eprintln!();
}


fn find_fna_files(input: &Path) -> Vec<PathBuf> {
    let fna_files = misc::find_files_with_extension(input, "fna");
    if fna_files.is_empty() {
        misc::quit_with_error(&format!("no .fna files found in {:?}", input));
    }
    fna_files
}


fn create_output_dirs(output: &Path) -> (PathBuf, PathBuf) {
    let prokka_dir = output.join("prokka");
    let gff_dir = output.join("gff");
    misc::create_dir(output);
    misc::create_dir(&prokka_dir);
    misc::create_dir(&gff_dir);
    (prokka_dir, gff_dir)
}


fn annotate_genomes(fna_files: &[PathBuf], prokka_dir: &Path, gff_dir: &Path,
                    threads: u32) -> usize {
    log::section_header("Annotating genomes");
    let threads = threads.to_string();
    let mut gff_count: usize = 0;
    for fna in fna_files {
        let name = misc::filename_stem(fna);
        eprintln!("Running Prokka on {}", name);
        let out_dir = prokka_dir.join(&name);
        let args: Vec<&OsStr> = vec!["--outdir".as_ref(), out_dir.as_os_str(),
                                     "--prefix".as_ref(), name.as_ref(),
                                     "--cpus".as_ref(), threads.as_ref(),
                                     "--force".as_ref(),
                                     fna.as_os_str()];
        misc::run_command("prokka", &args);

        let gff_file = out_dir.join(format!("{}.gff", name));
        if gff_file.is_file() {
            let dest = gff_dir.join(format!("{}.gff", name));
            if let Err(e) = fs::copy(&gff_file, &dest) {
                misc::quit_with_error(&format!("unable to copy {:?} to {:?}: {}",
                                               gff_file, dest, e));
            }
            eprintln!("  copied {} to {}", gff_file.display(), gff_dir.display());
            gff_count += 1;
        } else {
            eprintln!("  warning: no GFF file found for {}", name);
        }
    }
    eprintln!();
    gff_count
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::panic;
    use tempfile::tempdir;

    #[test]
    fn test_find_fna_files() {
        let dir = tempdir().unwrap();
        for name in ["genome_2.fna", "genome_1.fna", "proteins.faa"] {
            File::create(dir.path().join(name)).unwrap();
        }
        let found = find_fna_files(dir.path());
        let names: Vec<String> = found.iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string()).collect();
        assert_eq!(names, vec!["genome_1.fna", "genome_2.fna"]);
    }

    #[test]
    fn test_find_fna_files_none() {
        let dir = tempdir().unwrap();
        File::create(dir.path().join("proteins.faa")).unwrap();
        assert!(panic::catch_unwind(|| {
            find_fna_files(dir.path());
        }).is_err());
    }

    #[test]
    fn test_create_output_dirs() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("annotation");
        let (prokka_dir, gff_dir) = create_output_dirs(&output);
        assert!(prokka_dir.is_dir());
        assert!(gff_dir.is_dir());
    }
}
