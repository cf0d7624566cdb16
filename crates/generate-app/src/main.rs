//! generate-app - Project scaffolding for React and Next.js starters

use appgen_core::tui::CreateArgs;
use appgen_core::workflow::ProjectSummary;
use anyhow::Result;
use appgen_core::{Feature, Framework, ProductConfig, TemplateRepo};
use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the tracing filter
const LOG_ENV: &str = "GENERATE_APP_LOG";

/// generate-app product configuration
#[derive(Clone)]
pub struct GenerateAppConfig;

impl ProductConfig for GenerateAppConfig {
    fn name(&self) -> &'static str {
        "generate-app"
    }

    fn display_name(&self) -> &'static str {
        "React / Next.js project generator"
    }

    fn default_template_repo(&self) -> TemplateRepo {
        TemplateRepo::new("JulianVNuam", "generate-app-cli", "main")
    }

    fn template_repo_env(&self) -> &'static str {
        "GENERATE_APP_TEMPLATE_REPO"
    }

    fn archive_url_env(&self) -> &'static str {
        "GENERATE_APP_ARCHIVE_URL"
    }

    fn next_steps(&self, summary: &ProjectSummary) -> Vec<String> {
        let pm = summary.package_manager;
        let mut steps = vec![summary.next_command.clone()];

        if summary.provisioned.contains(&Feature::Testing) {
            steps.push(pm.exec_line(test_runner(summary)));
        }
        if summary.provisioned.contains(&Feature::Storybook) {
            steps.push(pm.run_script_line("storybook"));
        }
        if summary.provisioned.contains(&Feature::LintFormat) {
            steps.push(pm.exec_line("eslint ."));
        }

        steps
    }
}

fn test_runner(summary: &ProjectSummary) -> &'static str {
    match summary.framework {
        Framework::React => "vitest",
        Framework::NextJs => "jest",
    }
}

#[derive(Parser, Debug)]
#[command(name = "generate-app")]
#[command(about = "Scaffold a React or Next.js project with optional tooling")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub create: CliCreateArgs,

    /// Increase diagnostic output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new project (the default)
    Create(CliCreateArgs),
}

#[derive(Parser, Debug, Default)]
pub struct CliCreateArgs {
    /// Project name; the project is created in ./<name>
    #[arg(short, long)]
    pub name: Option<String>,

    /// Framework to use
    #[arg(short, long, value_enum)]
    pub framework: Option<Framework>,

    /// Optional features (comma-separated: tailwind,eslint-prettier,husky,testing,storybook,i18n,auth)
    #[arg(long, value_enum, value_delimiter = ',', num_args = 0..)]
    pub features: Option<Vec<Feature>>,

    /// Auto-confirm all prompts (non-interactive mode)
    #[arg(short, long)]
    pub yes: bool,
}

impl From<CliCreateArgs> for CreateArgs {
    fn from(args: CliCreateArgs) -> Self {
        CreateArgs {
            name: args.name,
            framework: args.framework,
            features: args.features,
            yes: args.yes,
        }
    }
}

fn init_tracing(verbose: u8) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        EnvFilter::new(match verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        })
    });

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

async fn run(args: Args) -> Result<()> {
    let config = GenerateAppConfig;

    let create_args = match args.command {
        Some(Command::Create(create_args)) => create_args,
        // No subcommand provided, default to create behavior
        None => args.create,
    };

    let result = appgen_core::run(&config, create_args.into()).await;

    // Ensure cursor is visible on normal exit
    let _ = console::Term::stderr().show_cursor();

    result
}

/// Single-line message for stderr; the cause chain only goes to tracing
fn error_line(error: &anyhow::Error) -> String {
    format!("Error: {}", error)
}

#[tokio::main]
async fn main() {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    let args = Args::parse();
    init_tracing(args.verbose);

    if let Err(e) = run(args).await {
        tracing::debug!(error = ?e, "run failed");
        eprintln!("{}", error_line(&e));
        std::process::exit(1);
    }
}
