mod debug_report;

use glosilo::{
    AnnotationFormat, Converter, InputFiles, LetterForm, Options, Placeholders, RankerOptions, RuleDatabase,
    build_rules,
};
use std::io::{self, IsTerminal, Read, Write};
use std::path::PathBuf;

fn main() {
    let command = match parse_args() {
        Ok(command) => command,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    let verbose = match &command {
        Command::Build(args) => args.verbose,
        Command::Convert(args) => args.verbose,
    };
    let default_filter = if verbose { "glosilo=debug" } else { "glosilo=info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();

    let result = match command {
        Command::Build(args) => run_build(args),
        Command::Convert(args) => run_convert(args),
    };
    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

enum Command {
    Build(BuildArgs),
    Convert(ConvertArgs),
}

struct BuildArgs {
    files: InputFiles,
    format: AnnotationFormat,
    workers: usize,
    placeholders: Option<PathBuf>,
    output: Option<PathBuf>,
    report: bool,
    color: bool,
    verbose: bool,
}

struct ConvertArgs {
    rules: PathBuf,
    config: Option<PathBuf>,
    format: Option<AnnotationFormat>,
    letters: Option<LetterForm>,
    workers: Option<usize>,
    placeholders: Option<PathBuf>,
    input: String,
    report: bool,
    color: bool,
    verbose: bool,
}

fn run_build(args: BuildArgs) -> glosilo::Result<()> {
    let placeholders = match &args.placeholders {
        Some(dir) => Placeholders::from_dir(dir)?,
        None => Placeholders::default(),
    };
    let options = RankerOptions { format: args.format, workers: args.workers, placeholders };
    let out = build_rules(&args.files, &options)?;

    match &args.output {
        Some(path) => out.database.write(path)?,
        None => {
            let mut stdout = io::stdout().lock();
            out.database.to_writer(&mut stdout)?;
            writeln!(stdout)?;
        }
    }

    if args.report {
        debug_report::print_build(&out.report, args.color);
    }
    Ok(())
}

fn run_convert(args: ConvertArgs) -> glosilo::Result<()> {
    let mut options = match &args.config {
        Some(path) => Options::read(path)?,
        None => Options::default(),
    };
    if let Some(format) = args.format {
        options.format = format;
    }
    if let Some(letters) = args.letters {
        options.letters = letters;
    }
    if let Some(workers) = args.workers {
        options.workers = workers;
    }
    let placeholders = match &args.placeholders {
        Some(dir) => Placeholders::from_dir(dir)?,
        None => Placeholders::default(),
    };

    let database = RuleDatabase::read(&args.rules)?;
    let converter = Converter::with_placeholders(&database, &options, &placeholders)?;

    if args.report {
        let details = converter.convert_verbose(&args.input)?;
        debug_report::print_conversion(&details, args.color);
    } else {
        let result = converter.convert(&args.input)?;
        let mut stdout = io::stdout().lock();
        stdout.write_all(result.output.as_bytes())?;
        if !result.output.ends_with('\n') {
            writeln!(stdout)?;
        }
    }
    Ok(())
}

fn parse_args() -> Result<Command, String> {
    let mut args = std::env::args().skip(1);
    match args.next().as_deref() {
        Some("-h" | "--help") | None => {
            print_help();
            std::process::exit(0);
        }
        Some("-V" | "--version") => {
            println!("glosilo {}", env!("CARGO_PKG_VERSION"));
            std::process::exit(0);
        }
        Some("build") => parse_build(args.collect()).map(Command::Build),
        Some("convert") => parse_convert(args.collect()).map(Command::Convert),
        Some(other) => Err(format!("error: unknown command '{other}'\n\n{}", help_text())),
    }
}

/// Split `--flag=value` into its parts.
fn split_flag(arg: &str) -> (&str, Option<&str>) {
    match arg.split_once('=') {
        Some((flag, value)) if flag.starts_with("--") => (flag, Some(value)),
        _ => (arg, None),
    }
}

/// The value of `flag`: the inline `--flag=value` part, or the next argument.
fn take_value(flag: &str, inline: Option<&str>, rest: &mut impl Iterator<Item = String>) -> Result<String, String> {
    match inline {
        Some(value) => Ok(value.to_string()),
        None => rest.next().ok_or_else(|| format!("error: {flag} expects a value")),
    }
}

fn parse_format(value: &str) -> Result<AnnotationFormat, String> {
    AnnotationFormat::from_name(value).ok_or_else(|| {
        let names: Vec<_> = AnnotationFormat::ALL.iter().map(|f| f.name()).collect();
        format!("error: invalid --format '{value}' (expected one of: {})", names.join(", "))
    })
}

fn parse_workers(value: &str) -> Result<usize, String> {
    value.parse().map_err(|_| format!("error: invalid --workers '{value}' (expected a non-negative integer)"))
}

fn parse_build(args: Vec<String>) -> Result<BuildArgs, String> {
    let mut roots = None;
    let mut glosses = None;
    let mut dictionary = None;
    let mut out = BuildArgs {
        files: InputFiles::default(),
        format: AnnotationFormat::default(),
        workers: 1,
        placeholders: None,
        output: None,
        report: false,
        color: io::stderr().is_terminal(),
        verbose: false,
    };

    let mut rest = args.into_iter();
    while let Some(arg) = rest.next() {
        let (flag, inline) = split_flag(&arg);
        match flag {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "--color" => out.color = true,
            "--no-color" => out.color = false,
            "--report" => out.report = true,
            "-v" | "--verbose" => out.verbose = true,
            "--roots" => roots = Some(PathBuf::from(take_value(flag, inline, &mut rest)?)),
            "--gloss" => glosses = Some(PathBuf::from(take_value(flag, inline, &mut rest)?)),
            "--dictionary" => dictionary = Some(PathBuf::from(take_value(flag, inline, &mut rest)?)),
            "--stem-overrides" => {
                out.files.stem_overrides = Some(PathBuf::from(take_value(flag, inline, &mut rest)?));
            }
            "--replacement-overrides" => {
                out.files.replacement_overrides = Some(PathBuf::from(take_value(flag, inline, &mut rest)?));
            }
            "--ambiguity" => out.files.ambiguity = Some(PathBuf::from(take_value(flag, inline, &mut rest)?)),
            "--format" => out.format = parse_format(&take_value(flag, inline, &mut rest)?)?,
            "--workers" => out.workers = parse_workers(&take_value(flag, inline, &mut rest)?)?,
            "--placeholders" => out.placeholders = Some(PathBuf::from(take_value(flag, inline, &mut rest)?)),
            "-o" | "--output" => out.output = Some(PathBuf::from(take_value(flag, inline, &mut rest)?)),
            _ => return Err(format!("error: unknown build option '{arg}'")),
        }
    }

    let missing = |name: &str| format!("error: build requires {name}\n\n{}", help_text());
    out.files.roots = roots.ok_or_else(|| missing("--roots"))?;
    out.files.glosses = glosses.ok_or_else(|| missing("--gloss"))?;
    out.files.dictionary = dictionary.ok_or_else(|| missing("--dictionary"))?;
    Ok(out)
}

fn parse_convert(args: Vec<String>) -> Result<ConvertArgs, String> {
    let mut rules = None;
    let mut input: Option<String> = None;
    let mut out = ConvertArgs {
        rules: PathBuf::new(),
        config: None,
        format: None,
        letters: None,
        workers: None,
        placeholders: None,
        input: String::new(),
        report: false,
        color: io::stdout().is_terminal(),
        verbose: false,
    };

    let mut rest = args.into_iter();
    while let Some(arg) = rest.next() {
        let (flag, inline) = split_flag(&arg);
        match flag {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "--color" => out.color = true,
            "--no-color" => out.color = false,
            "--report" => out.report = true,
            "-v" | "--verbose" => out.verbose = true,
            "--rules" => rules = Some(PathBuf::from(take_value(flag, inline, &mut rest)?)),
            "--config" => out.config = Some(PathBuf::from(take_value(flag, inline, &mut rest)?)),
            "--format" => out.format = Some(parse_format(&take_value(flag, inline, &mut rest)?)?),
            "--letters" => {
                let value = take_value(flag, inline, &mut rest)?;
                let letters = LetterForm::from_name(&value)
                    .ok_or_else(|| format!("error: invalid --letters '{value}' (expected circumflex, x or hat)"))?;
                out.letters = Some(letters);
            }
            "--workers" => out.workers = Some(parse_workers(&take_value(flag, inline, &mut rest)?)?),
            "--placeholders" => out.placeholders = Some(PathBuf::from(take_value(flag, inline, &mut rest)?)),
            "--input" | "-i" => {
                let value = take_value(flag, inline, &mut rest)?;
                if input.is_some() {
                    return Err("error: input provided multiple times".to_string());
                }
                input = Some(value);
            }
            "--" => {
                let joined = rest.by_ref().collect::<Vec<_>>().join(" ");
                if !joined.is_empty() {
                    if input.is_some() {
                        return Err("error: input provided multiple times".to_string());
                    }
                    input = Some(joined);
                }
                break;
            }
            _ if arg.starts_with('-') => {
                return Err(format!("error: unknown convert option '{arg}'"));
            }
            _ => {
                let joined = std::iter::once(arg).chain(rest.by_ref()).collect::<Vec<_>>().join(" ");
                if input.is_some() {
                    return Err("error: input provided multiple times".to_string());
                }
                input = Some(joined);
                break;
            }
        }
    }

    out.rules = rules.ok_or_else(|| format!("error: convert requires --rules\n\n{}", help_text()))?;
    out.input = match input {
        Some(value) => value,
        None => read_stdin_input()?,
    };
    Ok(out)
}

fn read_stdin_input() -> Result<String, String> {
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer).map_err(|err| format!("error: failed to read stdin: {err}"))?;
    Ok(buffer)
}

fn print_help() {
    println!("{}", help_text());
}

fn help_text() -> String {
    format!(
        "glosilo {version}

Annotate Esperanto text with per-root glosses.

Usage:
  glosilo build --roots <file> --gloss <file> --dictionary <file> [OPTIONS]
  glosilo convert --rules <file> [OPTIONS] [--] <input...>
  glosilo convert --rules <file> [OPTIONS] --input <text>

Build options:
  --roots <file>                   Root list, one root per line.
  --gloss <file>                   Root/gloss CSV with a header row.
  --dictionary <file>              JSON array of [stem, part-of-speech tags].
  --stem-overrides <file>          JSON array of [root, priority, flags].
  --replacement-overrides <file>   JSON array of [root, priority, flags, replacement].
  --ambiguity <file>               Replaces the bundled -an/-on tables.
  --format <name>                  {formats}.
                                   Default: ruby
  --workers <n>                    Threads for stem resolution. Default: 1
  --placeholders <dir>             Directory of placeholder pool files.
  -o, --output <file>              Write the rule database here instead of stdout.
  --report                         Print the build report to stderr.

Convert options:
  --rules <file>                   Rule database written by `glosilo build`.
  --config <file>                  JSON options file; flags below override it.
  --format <name>                  Format the rules were built for.
  --letters <form>                 circumflex, x or hat. Default: circumflex
  --workers <n>                    Convert in parallel line chunks.
  --placeholders <dir>             Directory of placeholder pool files.
  -i, --input <text>               Input text. If omitted, reads remaining args
                                   or stdin when no args are provided.
  --report                         Print stage timings instead of only the output.

Common options:
  --color                          Force ANSI color output.
  --no-color                       Disable ANSI color output.
  -v, --verbose                    Debug logging (RUST_LOG overrides).
  -h, --help                       Show this help message.
  -V, --version                    Print version information.

Exit codes:
  0  Success.
  1  Build or conversion failed.
  2  Invalid arguments.
",
        version = env!("CARGO_PKG_VERSION"),
        formats = AnnotationFormat::ALL.iter().map(|f| f.name()).collect::<Vec<_>>().join(", "),
    )
}
