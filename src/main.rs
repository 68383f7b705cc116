use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use siq_reader::siq::markdown::{self, RenderOptions};
use siq_reader::{Result, SiqReader};

/// A CLI tool for processing SIQ files.
#[derive(Parser)]
#[command(name = "sigma", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Read and display information from a SIQ file
    Read {
        /// Path to the SIQ file
        file: PathBuf,
    },
    /// Convert a SIQ file to markdown format
    Markdown {
        /// Path to the SIQ file
        file: PathBuf,
        /// Path of the markdown file to write
        output: PathBuf,
        /// Skip questions with media content (image, audio, video)
        #[arg(short, long)]
        skip_media: bool,
    },
}

fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Read { file } => run_read(&file),
        Command::Markdown {
            file,
            output,
            skip_media,
        } => run_markdown(&file, &output, skip_media),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run_read(file: &PathBuf) -> Result<()> {
    let mut reader = SiqReader::open(file)?;
    let package = reader.read()?;

    println!("=== SIG Pack Information ===");
    println!("Name: {}", package.name);
    println!("ID: {}", package.id);
    println!("Version: {}", package.version);
    if let Some(version) = reader.version() {
        println!("Detected Format: {version}");
    }
    println!("Difficulty: {}/10", package.difficulty);
    println!("Language: {}", package.language);
    println!("Publisher: {}", package.publisher);
    println!("Date: {}", package.date);

    if let Some(info) = &package.info {
        if !info.authors.is_empty() {
            println!("Authors:");
            for author in &info.authors {
                // Author entries may be @id references into the global table.
                let display = package
                    .resolve_reference(author)
                    .unwrap_or_else(|_| author.clone());
                println!("  {display}");
            }
        }
    }

    println!("\n=== Statistics ===");
    println!("Rounds: {}", package.round_count());
    println!("Themes: {}", package.theme_count());
    println!("Questions: {}", package.question_count());

    println!("\n=== Files in Archive ===");
    for entry in reader.list_entries()? {
        println!("  {entry}");
    }

    println!("\n=== Questions Summary ===");
    for (i, question) in package.all_questions().iter().enumerate() {
        println!("Question {}:", i + 1);
        println!("  Type: {}", question.question_type);
        println!("  Right answers: {}", question.right.len());
        println!("  Wrong answers: {}", question.wrong.len());

        if !question.right.is_empty() {
            println!("  Right answer(s):");
            for (j, answer) in question.right.iter().enumerate() {
                println!("    {}. {}", j + 1, answer);
            }
        }
        if !question.wrong.is_empty() {
            println!("  Wrong answer(s):");
            for (j, answer) in question.wrong.iter().enumerate() {
                println!("    {}. {}", j + 1, answer);
            }
        }

        let content = question.content();
        if !content.is_empty() {
            println!("  Content items: {}", content.len());
            for (j, item) in content.iter().enumerate() {
                println!("    Item {}: {} ({})", j + 1, item.content_type, item.value);
            }
        }
        println!();
    }

    println!("SIQ file processed successfully!");
    Ok(())
}

fn run_markdown(file: &PathBuf, output: &PathBuf, skip_media: bool) -> Result<()> {
    let mut reader = SiqReader::open(file)?;
    let package = reader.read()?;

    let report = markdown::render_with(&package, &RenderOptions { skip_media });
    fs::write(output, report)?;

    println!(
        "Successfully converted {} to {}",
        file.display(),
        output.display()
    );
    Ok(())
}
