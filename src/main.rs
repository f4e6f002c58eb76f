//! modelgraph CLI: move component documents in and out of hypergraph files.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use modelgraph::graph::MemoryGraph;
use modelgraph::ident::Uid;
use modelgraph::Model;

#[derive(Parser)]
#[command(
    name = "modelgraph",
    version,
    about = "Bridge between a component catalog and a typed hypergraph"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import a component document into a hypergraph file.
    Import {
        /// Component document to read.
        document_in: PathBuf,
        /// Hypergraph file to write.
        hypergraph_out: PathBuf,
        /// Existing hypergraph to extend instead of starting fresh.
        hypergraph_in: Option<PathBuf>,
    },
    /// Export a component document from a hypergraph file.
    Export {
        /// Hypergraph file to read.
        hypergraph_in: PathBuf,
        /// Document file to write; its stem names the concept to export.
        document_out: PathBuf,
    },
}

const EXIT_USAGE: u8 = 1;
const EXIT_READ: u8 = 2;
const EXIT_WRITE: u8 = 3;

fn main() -> ExitCode {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return ExitCode::from(EXIT_USAGE);
        }
    };

    match cli.command {
        Commands::Import {
            document_in,
            hypergraph_out,
            hypergraph_in,
        } => run_import(&document_in, &hypergraph_out, hypergraph_in.as_deref()),
        Commands::Export {
            hypergraph_in,
            document_out,
        } => run_export(&hypergraph_in, &document_out),
    }
}

fn run_import(document_in: &Path, hypergraph_out: &Path, hypergraph_in: Option<&Path>) -> ExitCode {
    let text = match std::fs::read_to_string(document_in) {
        Ok(text) => text,
        Err(err) => {
            eprintln!("cannot read {}: {err}", document_in.display());
            return ExitCode::from(EXIT_READ);
        }
    };

    let graph = match hypergraph_in {
        Some(path) => match load_graph(path) {
            Some(graph) => graph,
            None => return ExitCode::from(EXIT_READ),
        },
        None => MemoryGraph::new(),
    };

    let mut model = Model::from_graph(graph);
    match model.import(&text) {
        Ok(true) => {}
        // A structurally incomplete document leaves the graph untouched in
        // any meaningful way; still write it out, mirroring the old tooling.
        Ok(false) => tracing::warn!(document = %document_in.display(), "document was not imported"),
        Err(err) => {
            eprintln!("{:?}", miette::Report::new(err));
            return ExitCode::from(EXIT_READ);
        }
    }

    let yaml = match model.into_graph().to_yaml() {
        Ok(yaml) => yaml,
        Err(err) => {
            eprintln!("{:?}", miette::Report::new(err));
            return ExitCode::from(EXIT_WRITE);
        }
    };
    if let Err(err) = std::fs::write(hypergraph_out, yaml) {
        eprintln!("cannot write {}: {err}", hypergraph_out.display());
        return ExitCode::from(EXIT_WRITE);
    }
    ExitCode::SUCCESS
}

fn run_export(hypergraph_in: &Path, document_out: &Path) -> ExitCode {
    let Some(graph) = load_graph(hypergraph_in) else {
        return ExitCode::from(EXIT_READ);
    };
    let model = Model::from_graph(graph);

    let stem = document_out
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let document = match model.export(&Uid::new(stem)) {
        Ok(document) => document,
        Err(err) => {
            eprintln!("{:?}", miette::Report::new(err));
            return ExitCode::from(EXIT_WRITE);
        }
    };

    if let Err(err) = std::fs::write(document_out, document) {
        eprintln!("cannot write {}: {err}", document_out.display());
        return ExitCode::from(EXIT_WRITE);
    }
    ExitCode::SUCCESS
}

fn load_graph(path: &Path) -> Option<MemoryGraph> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) => {
            eprintln!("cannot read {}: {err}", path.display());
            return None;
        }
    };
    match MemoryGraph::from_yaml(&text) {
        Ok(graph) => Some(graph),
        Err(err) => {
            eprintln!("{:?}", miette::Report::new(err));
            None
        }
    }
}
