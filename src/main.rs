//! hocr-pagenum - Printed page number inference for scanned books
//!
//! CLI entry point

use clap::Parser;
use hocr_pagenum::{
    cli::Cli,
    exit_codes,
    hocr::HocrParser,
    infer::infer_page_numbers,
    report::{self, OutputMode},
    PageNumberDocument, Scandata,
};
use std::collections::HashSet;
use std::io::Write;

fn main() {
    let cli = Cli::parse();

    std::process::exit(match run(&cli) {
        Ok(()) => exit_codes::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            exit_codes::GENERAL_ERROR
        }
    });
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if !cli.infile.exists() {
        eprintln!("Error: Input file does not exist: {}", cli.infile.display());
        std::process::exit(exit_codes::INPUT_NOT_FOUND);
    }

    let mode = if cli.quiet {
        OutputMode::Quiet
    } else {
        OutputMode::from_verbosity(cli.verbose)
    };

    let skip: HashSet<usize> = match &cli.scandata {
        Some(path) => {
            let scandata = Scandata::load(path)?;
            if mode.should_show(OutputMode::Verbose) {
                println!("Skipping {} leaves from scandata", scandata.skip_pages().len());
            }
            scandata.skip_pages().clone()
        }
        None => HashSet::new(),
    };

    if mode.should_show(OutputMode::Verbose) {
        println!("Inferring page numbers: {}", cli.infile.display());
    }

    let options = cli.inference_options();
    let infile = cli.infile.clone();
    let result = infer_page_numbers(
        || HocrParser::open(&infile).map_err(Into::into),
        &skip,
        &options,
    )?;

    report::print_assignments(&result, mode);

    let document = PageNumberDocument::from_result(&result, cli.identifier.clone());
    let json = document.to_json_pretty()?;

    match &cli.outfile {
        Some(path) => {
            let mut file = std::fs::File::create(path)?;
            file.write_all(json.as_bytes())?;
            file.write_all(b"\n")?;
            if mode.should_show(OutputMode::Verbose) {
                println!("Wrote {}", path.display());
            }
        }
        None => println!("{}", json),
    }

    report::print_summary(&result, mode);

    Ok(())
}
