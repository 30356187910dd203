use assetgen::catalog::AssetKind;
use assetgen::project::Project;
use assetgen::{config, generate, output};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "assetgen")]
#[command(about = "Generate iOS app icons and splash screens from source images")]
#[command(long_about = "\
Generate iOS app icons and splash screens from source images

Source images live in assets/ (or resources/) in the project root; the
generated files and their Contents.json entries are written into the
Xcode asset catalog of the iOS platform directory.

Project structure:

  my-app/
  ├── assets.toml                 # Optional config
  ├── assets/
  │   ├── icon.png                # App icon, 1024x1024 recommended (or icon-only.png)
  │   ├── splash.png              # Splash, 2732x2732 recommended
  │   ├── splash-dark.png         # Dark mode splash
  │   ├── logo.png                # Used for splashes when splash.png is missing
  │   ├── logo-dark.png
  │   └── icon-notification.png   # Per-role icon overrides (also -settings, -spotlight)
  └── ios/App/
      └── App/Assets.xcassets/
          ├── AppIcon.appiconset/ # ← icons + Contents.json
          └── Splash.imageset/    # ← splashes + Contents.json

Kinds: icon, notification-icon, settings-icon, spotlight-icon, splash, splash-dark

Run 'assetgen gen-config' to generate a documented assets.toml.")]
#[command(version)]
struct Cli {
    /// Project root directory
    #[arg(long, default_value = ".", global = true)]
    project: PathBuf,

    /// Show debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate images and update Contents.json (all kinds with a source by default)
    Generate {
        /// Kinds to generate
        kinds: Vec<AssetKind>,
    },
    /// Print the template catalog
    List {
        /// Only show this kind
        kind: Option<AssetKind>,
    },
    /// Show which source images were found and what they produce
    Check,
    /// Print a stock assets.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Generate { kinds } => {
            let project = Project::load(&cli.project)?;
            init_thread_pool(&project.config.processing);
            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    for line in output::format_generate_event(&event) {
                        println!("{}", line);
                    }
                }
            });
            let result = generate::generate_all(&project, &kinds, Some(tx));
            printer
                .join()
                .map_err(|_| "progress printer thread panicked")?;
            let outputs = result?;
            output::print_summary(&outputs, &project.ios_path());
        }
        Command::List { kind } => {
            output::print_catalog(kind);
        }
        Command::Check => {
            let project = Project::load(&cli.project)?;
            println!("==> Checking {}", project.root.display());
            let assets = project.load_input_assets()?;
            output::print_sources(&assets, &project.root);
            if !project.ios_path().is_dir() {
                println!(
                    "==> iOS platform directory missing: {}",
                    project.ios_path().display()
                );
            } else if assets.available_kinds().is_empty() {
                println!("==> No source images found");
            } else {
                println!("==> Ready to generate");
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// `warn` by default, `debug` with `-v`; `RUST_LOG` wins over both.
fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores. The user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
