use std::{error::Error, fs, path::PathBuf, process::ExitCode};

use clap::{ArgAction, Parser};
use cuelist::{print_cue_list, print_document, CueReader, Diagnostic, SourceId};
use log::LevelFilter;

use crate::error::{to_error, CueReaderCache};

mod error;

/// Read lighting cue list files and show what was read from them.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Cue list files to read
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Honour the radix marker of parameter literals (`0H`, `0D`, `0B`)
    /// instead of reading every literal as hexadecimal
    #[arg(long)]
    radix_literals: bool,

    /// Consume string parameters without storing them in the document head
    #[arg(long)]
    inert_strings: bool,

    /// Write the document and cue list back in source notation
    #[arg(long)]
    print: bool,

    /// Show the document and cue list as a tree
    #[arg(long)]
    tree: bool,

    /// Only report problems
    #[arg(short, long)]
    quiet: bool,

    /// Increase logging, may be repeated
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    #[command(flatten)]
    color: concolor_clap::Color,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    cli.color.apply();

    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let mut reader = CueReader::new();
    reader.radix_literals = cli.radix_literals;
    reader.inert_strings = cli.inert_strings;

    let mut failed = false;
    for path in &cli.files {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) => {
                log::error!("unable to read {}: {err}", path.display());
                failed = true;
                continue;
            }
        };

        match reader.add_file(path.display().to_string(), raw) {
            Ok(id) if !cli.quiet => show(&cli, &reader, id),
            Ok(_) => {}
            Err(diag) => {
                failed = true;
                if let Err(err) = report(&reader, &diag) {
                    log::error!("unable to render diagnostic: {err}");
                    eprintln!("{diag}");
                }
            }
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn show(cli: &Cli, reader: &CueReader, id: SourceId) {
    let Some(parsed) = reader.parsed(id) else {
        return;
    };

    if cli.files.len() > 1 {
        println!("==> {} <==", reader.source_name(id));
    }

    println!("Raw object code:");
    println!("{}", reader.source_text(id));
    println!("Interpreted symbols:");
    println!("{}", parsed.trace);
    print!("{}", parsed.cue_list);

    if cli.tree {
        print!("{}", parsed.tree());
    }

    if cli.print {
        if let Some(document) = &parsed.document {
            println!("{}", print_document(document));
        }
        println!("{}", print_cue_list(&parsed.cue_list));
    }
}

fn report(reader: &CueReader, diag: &Diagnostic) -> Result<(), Box<dyn Error>> {
    to_error(diag)?.eprint(CueReaderCache::new(reader))?;
    Ok(())
}
