// This is the main file of pocp and where execution starts. It only handles the CLI and then
// calls into other files to run whichever subcommand the user chose.

// This file is part of pocp. pocp is free software: you can redistribute it and/or modify it
// under the terms of the GNU General Public License as published by the Free Software Foundation,
// either version 3 of the License, or (at your option) any later version. pocp is distributed in
// the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU General Public License for
// more details. You should have received a copy of the GNU General Public License along with
// pocp. If not, see <http://www.gnu.org/licenses/>.

use std::path::PathBuf;
use clap::{Parser, Subcommand, crate_version};

mod annotate;
mod blast;
mod extract;
mod log;
mod matrix;
mod misc;
mod report;

#[derive(Parser)]
#[clap(name = "pocp",
       version = concat!("v", crate_version!()),
       about = "all-vs-all POCP (Percentage of Conserved Proteins) from protein FASTA files")]
#[clap(subcommand_required = true)]
#[clap(arg_required_else_help = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {

    /// compute an all-vs-all POCP matrix from a directory of protein FASTA files
    Matrix {
        /// Directory containing protein FASTA files (.faa) (required)
        #[clap(short = 'i', long = "input", required = true)]
        input: PathBuf,

        /// Output directory (required)
        #[clap(short = 'o', long = "output", required = true)]
        output: PathBuf,

        /// Number of BLAST threads
        #[clap(short = 't', long = "threads", default_value = "4")]
        threads: u32,

        /// Minimum percent identity for a BLASTP hit to count as conserved
        #[clap(long = "min_identity", default_value = "40.0")]
        min_identity: f64,

        /// Minimum query coverage (%) for a BLASTP hit to count as conserved
        #[clap(long = "min_coverage", default_value = "50.0")]
        min_coverage: f64,

        /// Remove BLAST database and alignment files after completion
        #[clap(long = "clean")]
        clean: bool,
    },

    /// annotate genomes with Prokka and collect the GFF output
    Annotate {
        /// Directory containing genome FASTA files (.fna) (required)
        #[clap(short = 'i', long = "input", required = true)]
        input: PathBuf,

        /// Output directory (required)
        #[clap(short = 'o', long = "output", required = true)]
        output: PathBuf,

        /// Number of Prokka CPUs
        #[clap(short = 't', long = "threads", default_value = "4")]
        threads: u32,
    },

    /// gather Prokka protein FASTA files (.faa) into one directory
    Extract {
        /// Directory to search recursively for .faa files (required)
        #[clap(short = 'i', long = "input", required = true)]
        input: PathBuf,

        /// Output directory (required)
        #[clap(short = 'o', long = "output", required = true)]
        output: PathBuf,
    },
}


fn main() {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Matrix { input, output, threads, min_identity, min_coverage, clean }) => {
            matrix::matrix(input, output, threads, min_identity, min_coverage, clean);
        },
        Some(Commands::Annotate { input, output, threads }) => {
            annotate::annotate(input, output, threads);
        },
        Some(Commands::Extract { input, output }) => {
            extract::extract(input, output);
        },
        None => {}
    }
}
