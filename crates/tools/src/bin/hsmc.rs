//! Compile the state chart embedded in a source file and rewrite the file
//! with the generated code.
//!
//! Usage: `hsmc <target> <file>` where `<target>` is `cs`, `cpp` or `go`.

use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing::{debug, error};

use hsmc::foundation::SourceMap;
use hsmc_codegen::Target;
use hsmc_tools::{init_logging, read_chart_region, write_if_changed};

#[derive(Parser, Debug)]
#[command(name = "hsmc")]
#[command(about = "Compile a hierarchical state chart into source code")]
struct Args {
    /// Target language: cs, cpp or go
    target: Target,

    /// File holding the chart between /** and **/; rewritten in place
    file: PathBuf,
}

fn main() {
    init_logging();

    let args = Args::parse();
    if let Err(message) = run(&args) {
        error!("{message}");
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), String> {
    let region = read_chart_region(&args.file).map_err(|err| err.to_string())?;

    let mut sources = SourceMap::new();
    let file_id = sources.add_file(args.file.clone(), region);

    let mut chart = hsmc::parse_chart(&sources, file_id).map_err(|err| err.render(&sources))?;
    let source_lines = hsmc::print::print_root(&chart);
    hsmc::resolve::inherit_events(&mut chart);

    let output = args
        .target
        .emit(&chart, &source_lines)
        .map_err(|err| err.render(&sources))?;

    write_if_changed(&args.file, output.as_bytes()).map_err(|err| err.to_string())?;
    debug!(
        file = %args.file.display(),
        target = %args.target,
        "chart compiled"
    );
    Ok(())
}
