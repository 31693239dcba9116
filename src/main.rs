use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

mod cli;

use cli::Cli;
use cli::commands::{Commands, Target};
use toolchat::catalog::{Catalog, CatalogStore, HttpCatalogSource};
use toolchat::chat::Orchestrator;
use toolchat::config::Config;
use toolchat::llm::{GroqClient, GroqConfig, LlmClient};

fn setup_logging() -> Result<()> {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("toolchat")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("toolchat.log");

    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

fn catalog_store(config: &Config) -> Result<CatalogStore> {
    let timeout = Duration::from_millis(config.catalog.timeout_ms);
    let source =
        HttpCatalogSource::new(&config.catalog.url, timeout).context("Failed to create catalog client")?;
    Ok(CatalogStore::new(
        config.catalog_path(),
        config.refresh_record_path(),
        Arc::new(source),
    ))
}

fn llm_client(config: &Config) -> Result<Arc<dyn LlmClient>> {
    let api_key = config.llm.api_key.clone().unwrap_or_default();
    let groq_config = GroqConfig {
        api_base: config.llm.api_base.clone(),
        timeout: Duration::from_millis(config.llm.timeout_ms),
    };
    let client = GroqClient::with_api_key(api_key, groq_config).context("Failed to create LLM client")?;
    Ok(Arc::new(client))
}

async fn build_orchestrator(config: &Config) -> Result<Orchestrator> {
    let client = llm_client(config)?;
    let store = catalog_store(config)?;
    let mut orchestrator =
        Orchestrator::from_config(config, client, Catalog::default()).with_catalog_store(store);
    orchestrator.sync_catalog().await;
    Ok(orchestrator)
}

async fn run_application(cli: &Cli, config: &Config) -> Result<()> {
    info!("Starting application");

    if cli.is_verbose() {
        println!("{}", "Verbose mode enabled".yellow());
        println!("  data dir: {}", config.data_dir.display());
        println!("  models:   {}", config.llm.models.join(", "));
    }

    match &cli.command {
        None => handle_chat_command(&Target::default(), config).await,
        Some(Commands::Chat { target }) => handle_chat_command(target, config).await,
        Some(Commands::Ask { target, question }) => {
            handle_ask_command(target, &question.join(" "), config).await
        }
        Some(Commands::Tools { refresh }) => handle_tools_command(*refresh, config).await,
        Some(Commands::Prompt { name }) => handle_prompt_command(name, config).await,
        Some(Commands::Forget { name }) => handle_forget_command(name, config),
    }
}

async fn handle_chat_command(target: &Target, config: &Config) -> Result<()> {
    let mut orchestrator = build_orchestrator(config).await?;
    if orchestrator.catalog().is_empty() {
        println!("{}", "Tool catalog unavailable; general questions still work.".yellow());
    }
    cli::repl::run(&mut orchestrator, target.selection()).await
}

async fn handle_ask_command(target: &Target, question: &str, config: &Config) -> Result<()> {
    let orchestrator = build_orchestrator(config).await?;
    let answer = orchestrator.ask(&target.selection(), question, &[]).await;
    println!("{}", answer);
    info!("Answer used {} tokens", orchestrator.usage().total());
    Ok(())
}

async fn handle_tools_command(refresh: bool, config: &Config) -> Result<()> {
    let store = catalog_store(config)?;

    let catalog = if refresh {
        if !store.refresh_catalog().await {
            println!("{}", "Refresh failed; showing the local catalog.".yellow());
        }
        store.read_local().context("Failed to read local catalog")?
    } else {
        store.load_catalog().await
    };
    if catalog.is_empty() {
        println!("{}", "No tools in the catalog.".yellow());
        return Ok(());
    }

    for tool in catalog.iter() {
        println!("{} {}", tool.name.green(), tool.category_or_unknown().dimmed());
    }
    println!("{} tools", catalog.len());
    Ok(())
}

async fn handle_prompt_command(name: &str, config: &Config) -> Result<()> {
    let orchestrator = build_orchestrator(config).await?;
    let tool = orchestrator.catalog().find(name);
    if tool.is_none() {
        println!("{} {} is not in the catalog", "Note:".yellow(), name);
    }
    let prompt = orchestrator.synthesizer().get_or_create_prompt(name, tool).await;
    println!("{}", prompt);
    Ok(())
}

fn handle_forget_command(name: &str, config: &Config) -> Result<()> {
    let cache = toolchat::prompt::PromptCache::new(config.prompts_path());
    if cache.remove(name).context("Failed to update prompt cache")? {
        println!("{} {}", "Forgot prompt for".green(), name);
    } else {
        println!("{} {}", "No cached prompt for".yellow(), name);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging().context("Failed to setup logging")?;

    let cli = Cli::parse();

    let config = Config::resolve(cli.config.as_ref()).context("Failed to load configuration")?;

    info!("Starting with config from: {:?}", cli.config);

    run_application(&cli, &config).await.context("Application failed")?;

    Ok(())
}
