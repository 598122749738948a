use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use log::{LevelFilter, debug, info, warn};
use renfa_core::{Automaton, Config, compile_with, dot, parse};
use std::fmt::Display;
use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use std::process::Command;

#[derive(Parser)]
#[command(name = "renfa")]
#[command(about = "Renfa - Thompson NFA construction and Graphviz export")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Abort construction once the automaton would exceed this many states
    #[arg(long, global = true)]
    state_limit: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the automaton and write it as a Graphviz graph
    Export {
        #[command(flatten)]
        source: Source,
        /// Output path without extension
        #[arg(short, long, default_value = "nfa")]
        output: PathBuf,
        /// Image format rendered from the .dot file
        #[arg(short = 't', long = "type", value_enum, default_value_t = Format::Png)]
        format: Format,
    },
    /// Print the states and transitions of the automaton
    Inspect {
        #[command(flatten)]
        source: Source,
    },
    /// Print the parsed syntax tree
    Parse {
        #[command(flatten)]
        source: Source,
    },
}

#[derive(Args)]
struct Source {
    /// The regex pattern (read from --file or stdin when omitted)
    pattern: Option<String>,
    /// Read the pattern from a file
    #[arg(short, long)]
    file: Option<PathBuf>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Dot,
    Png,
    Svg,
    Pdf,
}

impl Format {
    fn extension(self) -> &'static str {
        match self {
            Format::Dot => "dot",
            Format::Png => "png",
            Format::Svg => "svg",
            Format::Pdf => "pdf",
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    let config = Config::new().state_limit(cli.state_limit);

    match cli.command {
        Commands::Export {
            source,
            output,
            format,
        } => cmd_export(&read_pattern(&source), config, &output, format),
        Commands::Inspect { source } => cmd_inspect(&read_pattern(&source), config),
        Commands::Parse { source } => cmd_parse(&read_pattern(&source)),
    }
}

fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    // RUST_LOG, when set, takes precedence over -v
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn fail(e: impl Display) -> ! {
    eprintln!("{} {}", "Error:".red().bold(), e);
    std::process::exit(1);
}

fn read_pattern(source: &Source) -> String {
    if let Some(pattern) = &source.pattern {
        return pattern.clone();
    }

    let text = match &source.file {
        Some(path) => fs::read_to_string(path)
            .unwrap_or_else(|e| fail(format!("cannot read {}: {}", path.display(), e))),
        None => io::read_to_string(io::stdin())
            .unwrap_or_else(|e| fail(format!("cannot read stdin: {}", e))),
    };

    let trimmed = text.strip_suffix('\n').unwrap_or(&text);
    let trimmed = trimmed.strip_suffix('\r').unwrap_or(trimmed);
    trimmed.to_string()
}

fn build(pattern: &str, config: Config) -> Automaton {
    debug!("building automaton for {:?}", pattern);
    compile_with(pattern, config).unwrap_or_else(|e| fail(e))
}

/// `output` with `.ext` appended, keeping any dots already in the name
fn with_suffix(output: &Path, ext: &str) -> PathBuf {
    let mut name = output.as_os_str().to_owned();
    name.push(".");
    name.push(ext);
    PathBuf::from(name)
}

fn cmd_export(pattern: &str, config: Config, output: &Path, format: Format) {
    let automaton = build(pattern, config);

    let dot_path = with_suffix(output, "dot");
    let file = File::create(&dot_path)
        .unwrap_or_else(|e| fail(format!("cannot create {}: {}", dot_path.display(), e)));
    if let Err(e) = dot::write_dot(automaton.nfa(), automaton.start(), BufWriter::new(file)) {
        fail(format!("cannot write {}: {}", dot_path.display(), e));
    }

    println!("{}", "Exported automaton".bold());
    println!("  Pattern: {}", pattern.cyan());
    println!("  States:  {}", automaton.state_count());
    println!("  Graph:   {}", dot_path.display().to_string().green());

    if format == Format::Dot {
        return;
    }

    let image_path = with_suffix(output, format.extension());
    info!("rendering {} with graphviz", image_path.display());
    let status = Command::new("dot")
        .arg(format!("-T{}", format.extension()))
        .arg(&dot_path)
        .arg("-o")
        .arg(&image_path)
        .status();

    match status {
        Ok(status) if status.success() => {
            println!("  Image:   {}", image_path.display().to_string().green());
        }
        Ok(status) => fail(format!("graphviz exited with {}", status)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            warn!("graphviz `dot` not found on PATH");
            println!(
                "{} graphviz `dot` not found; render {} manually",
                "Warning:".yellow().bold(),
                dot_path.display()
            );
        }
        Err(e) => fail(format!("cannot run graphviz: {}", e)),
    }
}

fn cmd_inspect(pattern: &str, config: Config) {
    let automaton = build(pattern, config);

    println!("{}", "Automaton".bold());
    println!("  Pattern: {}", pattern.cyan());
    println!("  States:  {}", automaton.state_count());
    println!("  Start:   {}", automaton.start());
    println!("  Accept:  {}", automaton.accept());
    println!();

    for state in automaton.bfs() {
        let id = state.id().to_string();
        if state.is_accepting() {
            println!("  {} {}", id.green().bold(), "(accept)".green());
        } else if state.id() == automaton.start() {
            println!("  {} {}", id.bold(), "(start)".dimmed());
        } else {
            println!("  {}", id.bold());
        }
        for transition in state.transitions() {
            println!(
                "    -[{}]-> {}",
                transition.symbol.to_string().yellow(),
                transition.target
            );
        }
    }
}

fn cmd_parse(pattern: &str) {
    let expr = parse(pattern).unwrap_or_else(|e| fail(e));

    println!("{}", "Parsed pattern".bold());
    println!("  Input:  {}", pattern.cyan());
    println!("  Regex:  {}", expr.to_string().green());
    println!();
    println!("{:#?}", expr);
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_export_defaults() {
        let cli = Cli::try_parse_from(["renfa", "export", "a|b"]).unwrap();
        match cli.command {
            Commands::Export {
                source,
                output,
                format,
            } => {
                assert_eq!(source.pattern.as_deref(), Some("a|b"));
                assert_eq!(output, PathBuf::from("nfa"));
                assert!(format == Format::Png);
            }
            _ => panic!("expected export"),
        }
    }

    fn export_format(args: &[&str]) -> Format {
        match Cli::try_parse_from(args).unwrap().command {
            Commands::Export { format, .. } => format,
            _ => panic!("expected export"),
        }
    }

    #[test]
    fn test_export_type_flag() {
        assert!(export_format(&["renfa", "export", "a", "-t", "svg"]) == Format::Svg);
        assert!(export_format(&["renfa", "export", "a", "--type", "pdf"]) == Format::Pdf);
        assert!(export_format(&["renfa", "export", "a", "--type=dot"]) == Format::Dot);
        assert!(Cli::try_parse_from(["renfa", "export", "a", "--format", "svg"]).is_err());
    }

    #[test]
    fn test_global_flags() {
        let cli =
            Cli::try_parse_from(["renfa", "inspect", "a*", "-vv", "--state-limit", "8"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.state_limit, Some(8));
    }

    #[test]
    fn test_with_suffix() {
        assert_eq!(with_suffix(Path::new("nfa"), "dot"), PathBuf::from("nfa.dot"));
        assert_eq!(
            with_suffix(Path::new("out/graph.v1"), "svg"),
            PathBuf::from("out/graph.v1.svg")
        );
    }
}
