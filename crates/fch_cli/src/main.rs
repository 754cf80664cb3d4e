use std::path::PathBuf;
use std::process;

use clap::Parser;
use fch_core::ChecksumMode;
use fch_core::core_api::{CoreError, Engine, Session};
use fch_render::{TextRenderOptions, render_json_tree, render_text_with_options};
use log::info;

/// Inspect, unpack and rebuild Valheim character (.fch) files.
///
/// Without --construct or --destruct the file at PATH is loaded, verified
/// and printed.
#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Cli {
    /// Character file to read, or to write when constructing.
    #[arg(value_name = "PATH")]
    path: PathBuf,
    /// Build PATH from the player.json / world<N>.json / world<N>.pbm files in DIR.
    #[arg(long, value_name = "DIR", conflicts_with = "destruct")]
    construct: Option<PathBuf>,
    /// Unpack PATH into editable files in DIR.
    #[arg(long, value_name = "DIR")]
    destruct: Option<PathBuf>,
    /// Replace existing output files.
    #[arg(long)]
    overwrite: bool,
    /// Do not print the character.
    #[arg(long)]
    quiet: bool,
    /// Print the full JSON tree instead of the text dump.
    #[arg(long)]
    json: bool,
    /// Print every entry of long string lists.
    #[arg(long)]
    full: bool,
    /// Skip checksum verification and write a zeroed checksum.
    #[arg(long = "no-checksum")]
    no_checksum: bool,
    /// Log progress to stderr.
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

fn fail(context: &str, err: CoreError) -> ! {
    eprintln!("Error {context}");
    eprintln!("  {err}");
    process::exit(1);
}

fn print_session(session: &Session, cli: &Cli) {
    if cli.quiet {
        return;
    }
    if cli.json {
        let value = render_json_tree(session);
        match serde_json::to_string_pretty(&value) {
            Ok(text) => println!("{text}"),
            Err(e) => fail("rendering JSON", e.into()),
        }
    } else {
        let options = TextRenderOptions { verbose: cli.full };
        print!("{}", render_text_with_options(session, options));
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let checksum = if cli.no_checksum {
        ChecksumMode::Disabled
    } else {
        ChecksumMode::Sha512
    };
    let engine = Engine::with_checksum(checksum);

    if let Some(dir) = &cli.construct {
        let built = engine.construct(dir).unwrap_or_else(|e| {
            fail(&format!("constructing from {}", dir.display()), e)
        });
        built
            .save_path(&cli.path, cli.overwrite)
            .unwrap_or_else(|e| fail(&format!("writing {}", cli.path.display()), e));
        info!("re-reading {} to check it", cli.path.display());
    }

    let session = engine
        .open_path(&cli.path)
        .unwrap_or_else(|e| fail(&format!("loading {}", cli.path.display()), e));

    if let Some(dir) = &cli.destruct {
        session
            .destruct(dir, cli.overwrite)
            .unwrap_or_else(|e| fail(&format!("destructing into {}", dir.display()), e));
    }

    print_session(&session, &cli);
}
