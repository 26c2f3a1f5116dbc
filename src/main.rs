use clap::Parser;
use console::style;
use tracing_subscriber::EnvFilter;

use node_checker_console::config::Config;
use node_checker_console::domains::inputs::InputField;
use node_checker_console::domains::network::Network;
use node_checker_console::domains::query::UrlQueryState;
use node_checker_console::domains::report::CheckReport;
use node_checker_console::error::{NodeCheckerError, Result};
use node_checker_console::services::gateway::{HttpGateway, ServiceResolver};
use node_checker_console::services::registry::ConfigurationRegistry;
use node_checker_console::{CheckConsole, CheckEvent, CheckResult, ConsoleView};

#[derive(Parser, Debug)]
#[command(name = "node-checker")]
#[command(about = "Check a node against a remote health checker baseline")]
struct Cli {
    #[arg(long, env = "NODE_CHECKER_CONFIG")]
    config: Option<String>,

    #[arg(long, env = "NODE_CHECKER_NETWORK")]
    network: Option<String>,

    #[arg(long, default_value_t = false, help = "Print the console state as JSON")]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    Check {
        #[arg(long)]
        url: Option<String>,

        #[arg(long)]
        api_port: Option<String>,

        #[arg(long)]
        noise_port: Option<String>,

        #[arg(long)]
        metrics_port: Option<String>,

        #[arg(long)]
        public_key: Option<String>,

        #[arg(long)]
        baseline_config: Option<String>,

        #[arg(long, help = "Replay a shared query string, e.g. 'url=...&baselineConfig=...'")]
        query: Option<String>,
    },
    Configurations,
    Resolve,
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,node_checker_console=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    let resolver = ServiceResolver::from_config(&config);

    match cli.command {
        Commands::Resolve => {
            let network = pick_network(cli.network.as_deref(), None, &config);
            println!("{}", resolver.resolve(&network));
            Ok(())
        }
        Commands::Configurations => {
            let network = pick_network(cli.network.as_deref(), None, &config);
            let gateway = HttpGateway::from_config(&config)?;
            let service_url = resolver.resolve(&network);
            let mut registry = ConfigurationRegistry::new();
            registry.load(&gateway, service_url).await?;
            if cli.json {
                let list: Vec<_> = registry.list().map(|c| c.as_ref().clone()).collect();
                print_json(&list)?;
            } else {
                for configuration in registry.list() {
                    println!(
                        "{}  {}",
                        style(&configuration.id).bold(),
                        configuration.display_name
                    );
                }
            }
            Ok(())
        }
        Commands::Check {
            url,
            api_port,
            noise_port,
            metrics_port,
            public_key,
            baseline_config,
            query,
        } => {
            let query = UrlQueryState::parse(query.as_deref().unwrap_or_default());
            let network = pick_network(cli.network.as_deref(), query.network(), &config);
            let mut console = CheckConsole::from_config(&config, network, query)?;
            console.settle().await;

            let typed = [
                (InputField::Url, url),
                (InputField::ApiPort, api_port),
                (InputField::NoisePort, noise_port),
                (InputField::MetricsPort, metrics_port),
                (InputField::PublicKey, public_key),
            ];
            for (field, value) in typed {
                if let Some(value) = value {
                    console.set_input(field, value);
                }
            }
            if let Some(id) = baseline_config {
                console.dispatch(CheckEvent::ConfigurationSelected(id));
            }

            console.check().await;
            let view = console.view();
            if cli.json {
                print_json(&view)?;
            } else {
                render(&view);
            }
            match &view.result {
                Some(CheckResult::Success(_)) => Ok(()),
                Some(CheckResult::Failure(message)) => {
                    Err(NodeCheckerError::Runtime(message.clone()))
                }
                _ => Err(NodeCheckerError::Runtime(
                    view.error
                        .clone()
                        .unwrap_or_else(|| "check was not submitted".to_string()),
                )),
            }
        }
    }
}

fn pick_network(flag: Option<&str>, from_query: Option<Network>, config: &Config) -> Network {
    if let Some(name) = flag {
        return Network::from(name.to_string());
    }
    if let Some(network) = from_query {
        return network;
    }
    config
        .default_network
        .clone()
        .map(Network::from)
        .unwrap_or_default()
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| NodeCheckerError::Serialization(e.to_string()))?;
    println!("{text}");
    Ok(())
}

fn render(view: &ConsoleView) {
    println!(
        "{} {} ({})",
        style("Node Health Checker").bold(),
        style(&view.network).cyan(),
        view.service_url
    );
    if let Some(error) = &view.error {
        println!("{} {}", style("error:").red().bold(), error);
    }

    for (field, result) in view.validation.fields() {
        if !result.is_valid {
            println!("{} {} is invalid", style("✗").red(), field.label());
        }
    }
    if view.selected_configuration.is_none() && !view.configurations_loading {
        println!("{} no baseline configuration selected", style("✗").red());
    }

    match &view.result {
        Some(CheckResult::Success(report)) => render_report(report),
        Some(CheckResult::Failure(_)) => {}
        Some(CheckResult::Pending) | None => {
            if let Some(text) = &view.status_text {
                println!("{}", style(text).dim());
            }
        }
    }

    if !view.share_query.is_empty() {
        println!("{} ?{}", style("share:").dim(), view.share_query);
    }
}

fn render_report(report: &CheckReport) {
    let verdict = if report.passed() {
        style("PASS").green().bold()
    } else {
        style("FAIL").red().bold()
    };
    println!(
        "{} score {}: {}",
        verdict, report.summary_score, report.summary_explanation
    );
    for result in &report.evaluation_results {
        let mark = if result.passed() {
            style("✓").green()
        } else {
            style("✗").red()
        };
        println!(
            "{} {} [{}] {}",
            mark,
            style(&result.headline).bold(),
            result.score,
            style(&result.evaluator_name).dim()
        );
        println!("    {}", result.explanation);
        for link in &result.links {
            println!("    {}", style(link).underlined());
        }
    }
}
