use std::path::{Path, PathBuf};

use clap::Parser;
use log::{debug, info};
use shacl_algebra::{conforms, parse_shapes, rdf, OxigraphGraphPort, ShaclError};

/// Checks RDF data against SHACL shapes by compiling each shape to a unary
/// SPARQL query and checking its target set against its constraint set.
#[derive(Parser)]
#[command(name = "shacl-check")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the SHACL shapes file
    #[arg(value_name = "SHAPES_FILE")]
    shapes_file: PathBuf,

    /// Data files to check (one or more)
    #[arg(value_name = "DATA_FILE", required = true)]
    data_files: Vec<PathBuf>,

    /// RDF format of the shapes file (auto-detected from extension if not specified)
    #[arg(short = 's', long)]
    shapes_format: Option<String>,

    /// RDF format of the data files (auto-detected from extension if not specified)
    #[arg(short = 'd', long)]
    data_format: Option<String>,

    /// Set the verbosity level (can be used multiple times: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<(), ShaclError> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    debug!("starting shacl-check");

    let shapes_graph = read_graph_from_file(&cli.shapes_file, cli.shapes_format.as_deref())?;
    info!("shapes graph loaded with {} triples", shapes_graph.len());

    let schema = parse_shapes(&shapes_graph);
    info!("parsed {} shape definitions", schema.definitions.len());

    let mut data_graph = oxigraph::model::Graph::new();
    for data_file in &cli.data_files {
        let graph = read_graph_from_file(data_file, cli.data_format.as_deref())?;
        info!(
            "merged data file {} ({} triples)",
            data_file.display(),
            graph.len()
        );
        data_graph.extend(graph.iter().map(oxigraph::model::Triple::from));
    }
    info!("data graph has {} triples total", data_graph.len());

    let port = OxigraphGraphPort::new(&data_graph)?;
    let report = conforms(&port, &schema)?;

    for conforming in &report.conforming {
        println!("conforms: {} ({} target node(s))", conforming.shape, conforming.targets.len());
    }
    for violating in &report.violations {
        println!(
            "violates: {} ({} target node(s) out of constraint)",
            violating.shape,
            violating.violating.len()
        );
        for node in &violating.violating {
            println!("  - {}", node);
        }
    }

    if !report.conforms() {
        std::process::exit(1);
    }

    Ok(())
}

fn read_graph_from_file(path: &Path, format: Option<&str>) -> Result<oxigraph::model::Graph, ShaclError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| ShaclError::Io(format!("failed to read '{}': {}", path.display(), e)))?;

    let effective_format = format
        .map(str::to_string)
        .or_else(|| path.extension().and_then(|ext| ext.to_str()).map(str::to_string))
        .ok_or_else(|| {
            ShaclError::Parse(format!(
                "could not infer RDF format for '{}'; pass --shapes-format/--data-format",
                path.display()
            ))
        })?;

    rdf::read_graph_from_string(&content, &effective_format)
}
