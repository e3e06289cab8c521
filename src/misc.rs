// This file is part of pocp. pocp is free software: you can redistribute it and/or modify it
// under the terms of the GNU General Public License as published by the Free Software Foundation,
// either version 3 of the License, or (at your option) any later version. pocp is distributed in
// the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU General Public License for
// more details. You should have received a copy of the GNU General Public License along with
// pocp. If not, see <http://www.gnu.org/licenses/>.

use std::ffi::OsStr;
use std::fs::{self, File};
use std::io;
use std::io::{prelude::*, BufReader};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

use which::which;


pub fn quit_with_error(text: &str) -> ! {
    eprintln!();
    eprintln!("Error: {}", text);
    if cfg!(test) {
        panic!("Error: {}", text);
    }
    std::process::exit(1);
}


pub fn check_if_dir_exists(dir: &Path) {
    if !dir.is_dir() {
        quit_with_error(&format!("{:?} is not a directory", dir));
    }
}


pub fn create_dir(dir: &Path) {
    if let Err(e) = fs::create_dir_all(dir) {
        quit_with_error(&format!("unable to create directory {:?}: {}", dir, e));
    }
}


pub fn check_requirements(reqs: &[&str]) {
    for cmd in reqs {
        if which(cmd).is_err() {
            quit_with_error(&format!("required program '{cmd}' not found in $PATH"));
        }
    }
}


/// Returns all files in a directory (non-recursive) with the given extension, sorted by filename.
pub fn find_files_with_extension(dir: &Path, extension: &str) -> Vec<PathBuf> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => quit_with_error(&format!("unable to read directory {:?}: {}", dir, e)),
    };
    let mut files: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file() && p.extension() == Some(OsStr::new(extension)))
        .collect();
    files.sort();
    files
}


pub fn filename_stem(path: &Path) -> String {
    match path.file_stem().and_then(|s| s.to_str()) {
        Some(stem) => stem.to_string(),
        None => quit_with_error(&format!("unable to get filename from {:?}", path)),
    }
}


/// Counts the sequences in a FASTA file (one '>' header line per sequence).
pub fn count_fasta_seqs(filename: &Path) -> io::Result<usize> {
    let file = File::open(filename)?;
    let reader = BufReader::new(file);
    let mut count: usize = 0;
    for line in reader.lines() {
        if line?.starts_with('>') {
            count += 1;
        }
    }
    Ok(count)
}


/// Runs an external command, letting its output pass through to the terminal. A failure to start
/// the program or a non-zero exit status aborts the run.
pub fn run_command(program: &str, args: &[&OsStr]) {
    let status = Command::new(program).args(args).status();
    match status {
        Ok(s) if s.success() => {},
        Ok(s) => quit_with_error(&format!("{} failed with exit status: {}", program, s)),
        Err(e) => quit_with_error(&format!("unable to run {}: {}", program, e)),
    }
}


/// Deletes all files directly under a directory, keeping the directory itself.
pub fn delete_dir_contents(dir: &Path) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() {
            fs::remove_file(path)?;
        }
    }
    Ok(())
}


pub fn format_duration(duration: Duration) -> String {
    let milliseconds = duration.as_millis() % 1000;
    let seconds = duration.as_secs() % 60;
    let minutes = (duration.as_secs() / 60) % 60;
    let hours = duration.as_secs() / 3600;
    format!("{}:{:02}:{:02}.{:03}", hours, minutes, seconds, milliseconds)
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_count_fasta_seqs() {
        let dir = tempdir().unwrap();
        let fasta = dir.path().join("test.faa");
        let mut file = File::create(&fasta).unwrap();
        writeln!(file, ">protein_1 hypothetical protein").unwrap();
        writeln!(file, "MKVLAT").unwrap();
        writeln!(file, "GHIKWW").unwrap();
        writeln!(file, ">protein_2").unwrap();
        writeln!(file, "MSTQRE").unwrap();
        writeln!(file, ">protein_3").unwrap();
        writeln!(file, "MAAAAH").unwrap();
        assert_eq!(count_fasta_seqs(&fasta).unwrap(), 3);
    }

    #[test]
    fn test_count_fasta_seqs_empty() {
        let dir = tempdir().unwrap();
        let fasta = dir.path().join("empty.faa");
        File::create(&fasta).unwrap();
        assert_eq!(count_fasta_seqs(&fasta).unwrap(), 0);
    }

    #[test]
    fn test_find_files_with_extension() {
        let dir = tempdir().unwrap();
        for name in ["b.faa", "a.faa", "c.fna", "notes.txt"] {
            File::create(dir.path().join(name)).unwrap();
        }
        let found = find_files_with_extension(dir.path(), "faa");
        let names: Vec<String> = found.iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string()).collect();
        assert_eq!(names, vec!["a.faa", "b.faa"]);
    }

    #[test]
    fn test_filename_stem() {
        assert_eq!(filename_stem(Path::new("/some/dir/genome_1.faa")), "genome_1");
        assert_eq!(filename_stem(Path::new("genome.2.faa")), "genome.2");
    }

    #[test]
    fn test_delete_dir_contents() {
        let dir = tempdir().unwrap();
        File::create(dir.path().join("one.tab")).unwrap();
        File::create(dir.path().join("two.tab")).unwrap();
        delete_dir_contents(dir.path()).unwrap();
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
        assert!(dir.path().is_dir());
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::new(0, 0)), "0:00:00.000");
        assert_eq!(format_duration(Duration::new(75, 123_000_000)), "0:01:15.123");
        assert_eq!(format_duration(Duration::new(3661, 0)), "1:01:01.000");
    }
}
