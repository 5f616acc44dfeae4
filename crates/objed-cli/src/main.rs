use clap::{Args as ClapArgs, Parser, Subcommand};
use objed_core::{ArrayNormalization, ContainerPolicy, DocFormat, RebuildOpts, SaveOpts, Session};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "objed",
    about = "Rebuild JSON/YAML documents from flat dotted form data, and back",
    version
)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// List .json/.yml/.yaml documents below a directory
    List(ListArgs),
    /// Load a JSON or YAML document and print it as pretty JSON
    Show(ShowArgs),
    /// Print a document as flat form data (dotted keys)
    Flatten(FlattenArgs),
    /// Rebuild a document from flat form data; prints or writes with --out
    Rebuild(RebuildArgs),
    /// Open a document, then save rebuilt form data over it (or to --out)
    Save(SaveArgs),
    /// Flatten and rebuild a document, report whether it survives unchanged
    Roundtrip(ShowArgs),
}

#[derive(ClapArgs, Debug)]
struct ListArgs {
    /// Directory to scan recursively
    dir: PathBuf,
    /// Print full paths instead of paths relative to the directory
    #[arg(long, default_value_t = false)]
    absolute: bool,
}

#[derive(ClapArgs, Debug)]
struct ShowArgs {
    /// Document to load (.json, .yml or .yaml)
    path: PathBuf,
}

#[derive(ClapArgs, Debug)]
struct FlattenArgs {
    /// Document to load (.json, .yml or .yaml)
    path: PathBuf,
    /// Emit key=value lines instead of a JSON object
    #[arg(long, default_value_t = false)]
    lines: bool,
}

#[derive(ClapArgs, Debug, Clone, Copy)]
struct RebuildFlags {
    /// Decide List vs Map after collecting all keys, instead of from the first key
    #[arg(long, default_value_t = false)]
    promote: bool,
    /// Convert numeric-keyed maps into lists at every level, not just the root
    #[arg(long, default_value_t = false)]
    recursive_arrays: bool,
    /// Keep every leaf as a string (no true/false/null/number coercion)
    #[arg(long, default_value_t = false)]
    raw: bool,
}

impl From<RebuildFlags> for RebuildOpts {
    fn from(f: RebuildFlags) -> Self {
        RebuildOpts {
            containers: if f.promote {
                ContainerPolicy::Promote
            } else {
                ContainerPolicy::Lookahead
            },
            arrays: if f.recursive_arrays {
                ArrayNormalization::Recursive
            } else {
                ArrayNormalization::Root
            },
            coerce_scalars: !f.raw,
        }
    }
}

#[derive(ClapArgs, Debug)]
struct RebuildArgs {
    /// Form data: a JSON object of strings, or key=value lines
    form: PathBuf,
    /// Optional output path (.json, .yml or .yaml); otherwise prints to stdout
    #[arg(long)]
    out: Option<PathBuf>,
    /// Print YAML instead of JSON when writing to stdout
    #[arg(long, default_value_t = false)]
    yaml: bool,
    #[command(flatten)]
    flags: RebuildFlags,
}

#[derive(ClapArgs, Debug)]
struct SaveArgs {
    /// Document being edited; the default save target
    path: PathBuf,
    /// Open this folder first; relative PATH and --out resolve against it
    #[arg(long)]
    folder: Option<PathBuf>,
    /// Form data: a JSON object of strings, or key=value lines
    #[arg(long)]
    form: PathBuf,
    /// Save somewhere else; the extension picks JSON or YAML
    #[arg(long)]
    out: Option<PathBuf>,
    /// Zip the existing target before overwriting it
    #[arg(long, default_value_t = false)]
    backup: bool,
    #[command(flatten)]
    flags: RebuildFlags,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Cmd::List(a) => cmd_list(a),
        Cmd::Show(a) => cmd_show(a),
        Cmd::Flatten(a) => cmd_flatten(a),
        Cmd::Rebuild(a) => cmd_rebuild(a),
        Cmd::Save(a) => cmd_save(a),
        Cmd::Roundtrip(a) => cmd_roundtrip(a),
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_pretty(v: &serde_json::Value, format: DocFormat) {
    match objed_core::to_text(v, format) {
        Ok(s) => {
            print!("{}", s);
            if !s.ends_with('\n') {
                println!();
            }
        }
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(5);
        }
    }
}

fn cmd_list(args: ListArgs) {
    let (session, docs) = Session::open_folder(&args.dir).unwrap_or_else(|e| {
        eprintln!("error: {}", e);
        std::process::exit(2);
    });
    let folder = session.folder().filter(|_| !args.absolute);
    for d in docs {
        let shown = folder
            .and_then(|f| d.strip_prefix(f).ok())
            .unwrap_or(d.as_path());
        println!("{}", shown.display());
    }
}

fn cmd_show(args: ShowArgs) {
    let mut session = Session::new();
    let v = session.display(&args.path).unwrap_or_else(|e| {
        eprintln!("error: {}", e);
        std::process::exit(2);
    });
    print_pretty(&v, DocFormat::Json);
}

fn cmd_flatten(args: FlattenArgs) {
    let mut session = Session::new();
    let v = session.display(&args.path).unwrap_or_else(|e| {
        eprintln!("error: {}", e);
        std::process::exit(2);
    });
    let form = objed_core::flatten(&v);
    if args.lines {
        print!("{}", objed_core::store::form_to_lines(&form));
    } else {
        print_pretty(&objed_core::store::form_to_json(&form), DocFormat::Json);
    }
}

fn cmd_rebuild(args: RebuildArgs) {
    let form = objed_core::read_form(&args.form).unwrap_or_else(|e| {
        eprintln!("error reading form: {}", e);
        std::process::exit(2);
    });
    let doc = objed_core::form_to_document(form, &args.flags.into());
    if let Some(out) = args.out {
        let format = DocFormat::for_target(&out);
        objed_core::write_document(&out, &doc, format).unwrap_or_else(|e| {
            eprintln!("error writing: {}", e);
            std::process::exit(5);
        });
    } else {
        let format = if args.yaml {
            DocFormat::Yaml
        } else {
            DocFormat::Json
        };
        print_pretty(&doc, format);
    }
}

fn cmd_save(args: SaveArgs) {
    let form = objed_core::read_form(&args.form).unwrap_or_else(|e| {
        eprintln!("error reading form: {}", e);
        std::process::exit(2);
    });
    let mut session = match &args.folder {
        Some(dir) => {
            Session::open_folder(dir)
                .unwrap_or_else(|e| {
                    eprintln!("error: {}", e);
                    std::process::exit(2);
                })
                .0
        }
        None => Session::new(),
    };
    // A document that fails to parse can still be overwritten.
    if let Err(e) = session.display(&args.path) {
        tracing::warn!(path = %args.path.display(), error = %e, "could not load document");
        if session.file().is_none() {
            eprintln!("error: {}", e);
            std::process::exit(3);
        }
    }
    let opts = SaveOpts {
        rebuild: args.flags.into(),
        backup: args.backup,
    };
    let saved = session
        .save(form, args.out.as_deref(), &opts)
        .unwrap_or_else(|e| {
            eprintln!("error saving: {}", e);
            std::process::exit(4);
        });
    if let Some(b) = &saved.backup {
        eprintln!("backup: {}", b.display());
    }
    eprintln!(
        "saved {} as {}",
        saved.path.display(),
        saved.format.label()
    );
}

fn cmd_roundtrip(args: ShowArgs) {
    let mut session = Session::new();
    let v = session.display(&args.path).unwrap_or_else(|e| {
        eprintln!("error: {}", e);
        std::process::exit(2);
    });
    let rebuilt = objed_core::form_to_document(objed_core::flatten(&v), &RebuildOpts::default());
    if objed_core::equivalent(&v, &rebuilt) {
        println!("ok");
    } else {
        println!("differs");
        print_pretty(&rebuilt, DocFormat::Json);
        std::process::exit(1);
    }
}
