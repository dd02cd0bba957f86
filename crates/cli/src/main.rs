use clap::{Parser, Subcommand};
use scriptshare::scripts::{self, DescriptorRecord, DescriptorStatus, IndexSnapshot, Program};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "scriptshare")]
#[command(about = "Scripts Share CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Scripts root and program selection shared by the read commands.
#[derive(clap::Args)]
struct Source {
    /// Config file path (default: SCRIPTSHARE_CONFIG_PATH or ~/.scriptshare/config.json)
    #[arg(long, short, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Scripts root (default from config, or the `scripts` directory next to the config file)
    #[arg(long, short, value_name = "DIR")]
    dir: Option<PathBuf>,

    /// Program whose descriptors are read (default: SCRIPTSHARE_PROGRAM, config, or "maya")
    #[arg(long, short)]
    program: Option<Program>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show version
    Version,

    /// Create the configuration directory and default files (config, scripts root with a `__templates` package).
    Init {
        /// Config file path (default: SCRIPTSHARE_CONFIG_PATH or ~/.scriptshare/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<PathBuf>,
    },

    /// Print the project → type → scripts index for a program.
    Index {
        #[command(flatten)]
        source: Source,

        /// Print the full snapshot (index, loaded packages, diagnostics) as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Report packages that are broken, malformed, or tagged with a project but no type. Exits 1 if any.
    Check {
        #[command(flatten)]
        source: Source,
    },

    /// Write a descriptor into a package directory under the scripts root (created if missing).
    New {
        /// Package directory name
        package: String,

        #[command(flatten)]
        source: Source,

        /// Command text run by the host program
        #[arg(long)]
        command: String,

        /// Icon image path
        #[arg(long)]
        icon: String,

        /// Tooltip shown for the icon
        #[arg(long)]
        tooltip: String,

        /// Command language (e.g. python, mel)
        #[arg(long, value_name = "TYPE")]
        command_type: Option<String>,

        /// Project tag (repeatable)
        #[arg(long = "project", value_name = "PROJECT")]
        projects: Vec<String>,

        /// Type tag (repeatable)
        #[arg(long = "type", value_name = "TYPE")]
        types: Vec<String>,

        /// Write the program-agnostic scriptInformation.json instead of the program variant
        #[arg(long)]
        legacy: bool,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Version) => {
            println!("scriptshare {}", env!("CARGO_PKG_VERSION"));
        }
        Some(Commands::Init { config }) => {
            if let Err(e) = run_init(config) {
                log::error!("init failed: {}", e);
                std::process::exit(1);
            }
        }
        Some(Commands::Index { source, json }) => {
            if let Err(e) = run_index(source, json) {
                log::error!("index failed: {}", e);
                std::process::exit(1);
            }
        }
        Some(Commands::Check { source }) => match run_check(source) {
            Ok(true) => {}
            Ok(false) => std::process::exit(1),
            Err(e) => {
                log::error!("check failed: {}", e);
                std::process::exit(1);
            }
        },
        Some(Commands::New {
            package,
            source,
            command,
            icon,
            tooltip,
            command_type,
            projects,
            types,
            legacy,
        }) => {
            let mut record = DescriptorRecord::new(command, icon, tooltip, projects, types);
            record.command_type = command_type;
            if let Err(e) = run_new(source, &package, &record, legacy) {
                log::error!("new failed: {}", e);
                std::process::exit(1);
            }
        }
        None => {
            println!("Run with --help for usage");
        }
    }
}

fn run_init(config_path: Option<PathBuf>) -> anyhow::Result<()> {
    let path = config_path.unwrap_or_else(scriptshare::config::default_config_path);
    let dir = scriptshare::init::init_config_dir(&path)?;
    println!("initialized configuration at {}", dir.display());
    Ok(())
}

/// Resolve the scripts root and program: flags override config and environment.
fn resolve_source(source: Source) -> anyhow::Result<(PathBuf, Program)> {
    let (config, path) = scriptshare::config::load_config(source.config)?;
    let root = source
        .dir
        .unwrap_or_else(|| scriptshare::config::resolve_scripts_dir(&config, &path));
    let program = source
        .program
        .unwrap_or_else(|| scriptshare::config::resolve_program(&config));
    Ok((root, program))
}

fn build(source: Source) -> anyhow::Result<IndexSnapshot> {
    let (root, program) = resolve_source(source)?;
    log::info!("indexing {} for {}", root.display(), program);
    Ok(scripts::build_index(&root, &program))
}

fn run_index(source: Source, json: bool) -> anyhow::Result<()> {
    let snapshot = build(source)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }
    for diagnostic in snapshot.diagnostics() {
        eprintln!("{}", diagnostic);
    }
    if snapshot.is_empty() {
        println!(
            "no scripts available for {} in {}",
            snapshot.program(),
            snapshot.root().display()
        );
        return Ok(());
    }
    for (project, types) in snapshot.index().projects() {
        println!("{}", project);
        for (type_tag, summaries) in types {
            println!("  {}", type_tag);
            for s in summaries {
                let marker = if s.broken { " [broken]" } else { "" };
                println!("    - {}{}: {}", s.tooltip, marker, s.command);
            }
        }
    }
    Ok(())
}

/// Ok(true) when nothing needs attention.
fn run_check(source: Source) -> anyhow::Result<bool> {
    let snapshot = build(source)?;
    let mut clean = true;
    for diagnostic in snapshot.diagnostics() {
        println!("error: {}", diagnostic);
        clean = false;
    }
    for d in snapshot.scripts() {
        match &d.status {
            DescriptorStatus::Broken { missing } => {
                let fields: Vec<String> = missing.iter().map(|f| f.to_string()).collect();
                println!("broken: {} (missing {})", d.name(), fields.join(", "));
                clean = false;
            }
            DescriptorStatus::Malformed { reason } => {
                println!("malformed: {} ({})", d.name(), reason);
                clean = false;
            }
            DescriptorStatus::Missing => {
                println!("skipped: {} (no {} descriptor)", d.name(), snapshot.program().descriptor_file_name());
            }
            DescriptorStatus::Loaded => {}
        }
    }
    for d in snapshot.unplaced() {
        println!("unplaced: {} (projects {:?} but no types)", d.name(), d.parent_projects);
        clean = false;
    }
    if clean {
        println!(
            "{} packages, {} placements, no problems",
            snapshot.scripts().len(),
            snapshot.index().summary_count()
        );
    }
    Ok(clean)
}

fn run_new(
    source: Source,
    package: &str,
    record: &DescriptorRecord,
    legacy: bool,
) -> anyhow::Result<()> {
    use anyhow::Context;

    let (root, program) = resolve_source(source)?;
    let package_dir = root.join(package);
    if scripts::is_reserved_package(&package_dir) {
        log::warn!(
            "{} starts with {}; it will not be indexed",
            package,
            scripts::RESERVED_PREFIX
        );
    }
    std::fs::create_dir_all(&package_dir)
        .with_context(|| format!("creating package directory {}", package_dir.display()))?;
    let path = if legacy {
        scripts::generate(&package_dir, record)?
    } else {
        scripts::generate_for(&package_dir, &program, record)?
    };
    println!("wrote {}", path.display());
    Ok(())
}
