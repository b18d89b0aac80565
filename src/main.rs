use std::path::PathBuf;
use std::process;

use clap::Parser;
use ydecode::{Channel, DecodeMode, Decoder};

#[derive(Parser)]
#[command(name = "ydecode")]
#[command(author, version, about = "yEnc 1.2 decoder with multipart reassembly", long_about = None)]
struct Cli {
    /// yEnc-encoded input files, in part order
    #[arg(required = true, value_name = "FILE")]
    inputs: Vec<PathBuf>,

    /// Directory to write decoded files to
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    output: PathBuf,

    /// Keep decoding past errors and zero-fill missing data
    #[arg(short, long)]
    force: bool,

    /// Skip CRC-32 verification
    #[arg(long)]
    no_crc: bool,

    /// Sort inputs into logical files by name and part number
    #[arg(short, long)]
    group: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter))
        .format_timestamp(None)
        .format_target(false)
        .init();

    let mode = if cli.force {
        DecodeMode::Force
    } else {
        DecodeMode::Strict
    };
    let mut decoder = Decoder::new().mode(mode);
    if cli.no_crc {
        decoder = decoder.no_crc_check();
    }
    decoder.subscribe(Channel::Message, |msg| println!("{}", msg));

    let ok = if cli.group {
        let outcomes = decoder.decode_groups(&cli.inputs, &cli.output);
        let mut ok = !outcomes.is_empty();
        for outcome in outcomes {
            match outcome.written {
                Some(path) => println!(
                    "> {} [{}] -> {}",
                    outcome.name,
                    outcome.status,
                    path.display()
                ),
                None => {
                    eprintln!("Error: {} not written [{}]", outcome.name, outcome.status);
                    ok = false;
                }
            }
        }
        ok
    } else {
        for input in &cli.inputs {
            let status = decoder.decode_file(input);
            if !status.is_success() {
                eprintln!("{}: {}", input.display(), status);
            }
        }
        if cli.force {
            decoder.pad_to_declared_size();
        }
        match decoder.write(&cli.output) {
            Ok(path) => {
                println!("> Wrote {} bytes to {}", decoder.session().data().len(), path.display());
                true
            }
            Err(e) => {
                eprintln!("Error: writing failed: {}", e);
                false
            }
        }
    };

    if !ok {
        process::exit(1);
    }
}
