use crate::builder::Builder;
use crate::config::{Config, load_config, parse_relaxed};
use crate::describe::{self, GraphDesc};
use crate::graph::{Graph, GraphParams};
use crate::tree::{self, DEFAULT_EXCLUDE};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use regex::Regex;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "dotgen", version, about = "Build Graphviz DOT documents")]
pub struct Args {
    /// Config file (JSON or JSON5)
    #[arg(short = 'c', long = "configFile", global = true)]
    pub config: Option<PathBuf>,

    /// Output file. Defaults to stdout if omitted.
    #[arg(short = 'o', long = "output", global = true)]
    pub output: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Two nodes and an arrow between them
    Hello,
    /// Directory hierarchy of PATH
    Tree {
        path: PathBuf,

        /// Regex matched against entry names to skip
        #[arg(short = 'x', long = "exclude")]
        exclude: Option<String>,

        /// Render with undirected edges
        #[arg(long = "undirected")]
        undirected: bool,
    },
    /// Graph description file (.json/.json5) or '-' for stdin
    Render { input: PathBuf },
}

pub fn run() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;
    let graph = build(&args.command, &config)?;
    let dot = graph.render(&config.render, 0);
    write_output(&dot, args.output.as_deref())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

/// Command defaults, then the config file's params on top.
fn with_config(mut params: GraphParams, config: &Config) -> GraphParams {
    params.merge(config.graph.clone());
    params
}

fn build(command: &Command, config: &Config) -> Result<Graph> {
    match command {
        Command::Hello => {
            let builder = Builder::new();
            let graph = builder
                .graph()
                .set_params(with_config(GraphParams::new().oriented(true), config));
            let hello = builder.node("hello");
            let world = builder.node("world");
            let edge = builder.edge(&hello, &world);
            Ok(graph.add(hello).add(world).add(edge))
        }
        Command::Tree {
            path,
            exclude,
            undirected,
        } => {
            let mut params = with_config(tree::default_params(), config);
            if *undirected {
                params.merge(GraphParams::new().oriented(false));
            }
            match exclude {
                Some(pattern) => {
                    let exclude = Regex::new(pattern)
                        .with_context(|| format!("invalid exclude pattern `{pattern}`"))?;
                    tree::file_tree(path, &exclude, params)
                }
                None => tree::file_tree(path, &DEFAULT_EXCLUDE, params),
            }
        }
        Command::Render { input } => {
            let contents = read_input(input)?;
            let mut desc: GraphDesc = parse_relaxed(&contents)
                .with_context(|| format!("failed to parse {}", input.display()))?;
            let mut params = config.graph.clone();
            params.merge(desc.params);
            desc.params = params;
            Ok(describe::build(desc)?)
        }
    }
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        return Ok(buf);
    }
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn write_output(dot: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => std::fs::write(path, format!("{dot}\n"))
            .with_context(|| format!("failed to write {}", path.display())),
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{dot}")?;
            Ok(())
        }
    }
}
