mod config;
mod test_runner;

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use codespan_reporting::diagnostic::Diagnostic;
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};

use autoheader::{AutoHeader, AutoHeaderError, RenderedDocument};

const SUBCOMMANDS: &[&str] = &["run", "test", "help"];

#[derive(Parser)]
#[command(
    name = "autoheader",
    version,
    about = "Number Markdown headings from an inline autoHeader signifier"
)]
struct Cli {
    /// Disable colored error output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Number the headings of a Markdown file
    Run(RunArgs),

    /// Run .test.md fixture files
    Test(TestArgs),
}

#[derive(clap::Args)]
struct RunArgs {
    /// Markdown file to number
    file: String,

    /// Config file with an [auto_header] table (default: autoheader.toml next to FILE)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Convert to HTML, numbering through the configured hook
    #[arg(long)]
    html: bool,

    /// Validate the configuration and signifier only (exit 0 if valid)
    #[arg(long)]
    check: bool,

    /// Print the numbered heading outline instead of the document
    #[arg(long)]
    outline: bool,
}

#[derive(clap::Args)]
struct TestArgs {
    /// Path to a .test.md file or directory containing them
    path: String,

    /// Run only tests in these categories (subfolder names). Repeatable.
    #[arg(short, long)]
    category: Vec<String>,

    /// List available categories and exit
    #[arg(long)]
    list_categories: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    // `autoheader file.md` is shorthand for `autoheader run file.md`.
    let mut args: Vec<String> = std::env::args().collect();
    let first_pos = args
        .iter()
        .enumerate()
        .skip(1)
        .find(|(_, a)| !a.starts_with('-'))
        .map(|(pos, a)| (pos, SUBCOMMANDS.contains(&a.as_str())));
    if let Some((pos, false)) = first_pos {
        args.insert(pos, "run".to_string());
    }

    let cli = Cli::parse_from(&args);

    match cli.command {
        Command::Run(run_args) => do_run(run_args, cli.no_color),
        Command::Test(test_args) => {
            let path = Path::new(&test_args.path);
            if test_args.list_categories {
                test_runner::list_categories(path);
                return;
            }
            let exit_code = test_runner::run_tests(path, cli.no_color, &test_args.category);
            process::exit(exit_code);
        }
    }
}

struct DiagnosticSink {
    writer: StandardStream,
    config: term::Config,
    files: SimpleFiles<String, String>,
    file_id: usize,
}

impl DiagnosticSink {
    fn emit(&self, diagnostic: &Diagnostic<usize>) {
        let _ = term::emit_to_write_style(
            &mut self.writer.lock(),
            &self.config,
            &self.files,
            diagnostic,
        );
    }

    fn fail(&self, error: &AutoHeaderError) -> ! {
        self.emit(&error.to_diagnostic(self.file_id));
        process::exit(1);
    }
}

fn do_run(args: RunArgs, no_color: bool) {
    let color_choice = if no_color {
        ColorChoice::Never
    } else {
        ColorChoice::Auto
    };

    let source = match std::fs::read_to_string(&args.file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: cannot read '{}': {}", args.file, e);
            process::exit(1);
        }
    };

    let mut files = SimpleFiles::new();
    let file_id = files.add(args.file.clone(), source.clone());
    let sink = DiagnosticSink {
        writer: StandardStream::stderr(color_choice),
        config: term::Config::default(),
        files,
        file_id,
    };

    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| config::default_path(Path::new(&args.file)));
    let raw = match config::load(&config_path) {
        Ok(raw) => raw,
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    };

    let engine = match AutoHeader::configure(raw.as_ref()) {
        Ok(Some(engine)) => engine,
        Ok(None) => {
            // Configuration was rejected quietly: hand the document back as-is.
            if !args.check && !args.outline {
                emit_output(&source, args.html);
            }
            return;
        }
        Err(error) => sink.fail(&error),
    };

    if args.check {
        match engine.parse_signifier_and_seed(&source) {
            Ok((state, _)) => {
                let scoped: Vec<String> = state.scope().levels().map(|l| l.to_string()).collect();
                eprintln!(
                    "ok: {} numbers levels {} in {} mode",
                    args.file,
                    scoped.join(","),
                    state.mode()
                );
            }
            Err(error) => sink.fail(&error),
        }
        return;
    }

    if args.outline {
        let (mut state, cleaned) = match engine.parse_signifier_and_seed(&source) {
            Ok(seeded) => seeded,
            Err(error) => sink.fail(&error),
        };
        let mut document = RenderedDocument::parse(&cleaned);
        engine.render_tree(document.headings_mut(), &mut state);
        for heading in document.headings() {
            let indent = "  ".repeat(usize::from(heading.level.saturating_sub(1)));
            let hashes = "#".repeat(usize::from(heading.level));
            println!("{}{} {}", indent, hashes, heading.content);
        }
        return;
    }

    let output = if args.html {
        engine.render_html(&source)
    } else {
        engine.render_markdown(&source)
    };
    match output {
        Ok(text) => print!("{}", text),
        Err(error) => sink.fail(&error),
    }
}

fn emit_output(source: &str, html: bool) {
    if html {
        print!("{}", RenderedDocument::parse(source).to_html());
    } else {
        print!("{}", source);
    }
}
