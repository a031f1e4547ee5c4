mod report;

use std::io::{self, IsTerminal};
use std::path::PathBuf;
use vpath::{Browser, Completion, MatchContext, MemoryBackend, Options, RuleRegistry, VpathError};

fn main() {
    env_logger::init();

    let config = match parse_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    if let Err(err) = run(&config) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

struct CliConfig {
    path: String,
    options: Options,
}

fn run(config: &CliConfig) -> Result<(), VpathError> {
    let opts = &config.options;

    let mut registry = RuleRegistry::new();
    let report = vpath::load_rules_file(&opts.rules_path, &mut registry)?;
    log::info!("{} rules loaded from {}", report.loaded, opts.rules_path.display());

    let browser = match &opts.library_path {
        Some(path) => Some(Browser::new(MemoryBackend::from_tsv_file(path)?)),
        None => None,
    };

    if opts.complete {
        match vpath::complete(&registry, &config.path)? {
            Completion::Actions(names) => {
                for name in names {
                    println!("//{name}");
                }
            }
            Completion::Context(ctx) => show(&config.path, &ctx, browser.as_ref(), opts)?,
        }
        return Ok(());
    }

    let ctx = registry.match_path(&config.path)?;
    show(&config.path, &ctx, browser.as_ref(), opts)
}

fn show(
    path: &str,
    ctx: &MatchContext,
    browser: Option<&Browser<MemoryBackend>>,
    opts: &Options,
) -> Result<(), VpathError> {
    if opts.verbose || browser.is_none() {
        report::print_context(path, ctx, opts.color);
    }
    if let Some(browser) = browser {
        let lines = if opts.complete { browser.candidates(ctx)? } else { browser.list(ctx)? };
        for line in lines {
            println!("{line}");
        }
    }
    Ok(())
}

fn parse_args() -> Result<CliConfig, String> {
    let mut path: Option<String> = None;
    let mut options = Options::from_env();
    options.color = io::stdout().is_terminal();
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("vpath {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--color" => options.color = true,
            "--no-color" => options.color = false,
            "-c" | "--complete" => options.complete = true,
            "-v" | "--verbose" => options.verbose = true,
            "--rules" | "-r" => {
                let value = args.next().ok_or_else(|| "error: --rules expects a value".to_string())?;
                options.rules_path = PathBuf::from(value);
            }
            "--library" | "-l" => {
                let value = args.next().ok_or_else(|| "error: --library expects a value".to_string())?;
                options.library_path = Some(PathBuf::from(value));
            }
            _ if arg.starts_with("--rules=") => {
                options.rules_path = PathBuf::from(arg.trim_start_matches("--rules="));
            }
            _ if arg.starts_with("--library=") => {
                options.library_path = Some(PathBuf::from(arg.trim_start_matches("--library=")));
            }
            _ if arg.starts_with('-') => {
                return Err(format!("error: unknown option '{arg}'"));
            }
            _ => {
                if path.is_some() {
                    return Err("error: path provided multiple times".to_string());
                }
                path = Some(arg);
            }
        }
    }

    let Some(path) = path else {
        return Err(format!("error: no path provided\n\n{}", help_text()));
    };

    Ok(CliConfig { path, options })
}

fn print_help() {
    println!("{}", help_text());
}

fn help_text() -> String {
    format!(
        "vpath {version}

Browse a media library through virtual paths.

Usage:
  vpath [OPTIONS] <//action/elem/...>

Options:
  -r, --rules <file>         Rule file with `name = /template` lines.
                             Default: $VPATH_RULES or {default_rules}
  -l, --library <file>       Tab-separated library (header line of field
                             names). Default: $VPATH_LIBRARY
  -c, --complete             Complete the path; unknown actions list the
                             matching action names.
  -v, --verbose              Print the match report.
  --color                    Force ANSI color output.
  --no-color                 Disable ANSI color output.
  -h, --help                 Show this help message.
  -V, --version              Print version information.

Set RUST_LOG=vpath=debug to trace the rule walk.

Exit codes:
  0  Success.
  1  Rule, path or library error.
  2  Invalid arguments or missing path.
",
        version = env!("CARGO_PKG_VERSION"),
        default_rules = vpath::DEFAULT_RULES_PATH
    )
}
