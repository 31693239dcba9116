//! End-to-end chat flow with a scripted model and an in-memory catalog
//!
//! Wires the catalog store, prompt cache and orchestrator the way the binary
//! does, with no network access.

use std::fs;
use std::sync::Arc;

use chrono::NaiveDate;
use tempfile::TempDir;
use toolchat::catalog::{Catalog, CatalogStore, StaticCatalogSource, parse_catalog};
use toolchat::chat::{ChatSession, Orchestrator, ToolSelection};
use toolchat::config::Config;
use toolchat::error::Result;
use toolchat::llm::{Message, MockLlmClient, Role};
use toolchat::locale::Language;

const CATALOG: &str = r#"[
    {"name": "ToolA", "description": "Writes code", "category": "Code", "rating": 4.7,
     "url": "https://a.example"},
    {"name": "ToolB", "description": "Draws pictures", "category": "Images", "rating": "4.2"}
]"#;

fn config(dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.data_dir = dir.path().to_path_buf();
    config.llm.models = vec!["model-1".to_string(), "model-2".to_string()];
    config
}

async fn load_catalog(config: &Config) -> Catalog {
    let store = CatalogStore::new(
        config.catalog_path(),
        config.refresh_record_path(),
        Arc::new(StaticCatalogSource::new(CATALOG)),
    );
    store.load_catalog().await
}

#[tokio::test]
async fn test_general_question_single_call() -> Result<()> {
    let dir = TempDir::new()?;
    let config = config(&dir);
    let mock = Arc::new(MockLlmClient::new().with_default_reply("general answer"));
    let orch = Orchestrator::from_config(&config, mock.clone(), load_catalog(&config).await);

    let answer = orch.ask(&ToolSelection::GeneralOnly, "hello", &[]).await;

    assert_eq!(answer, "general answer");
    assert_eq!(mock.call_count(), 1);
    let request = mock.last_request().unwrap();
    assert!(!request.system_prompt().unwrap().contains("Writes code"));
    Ok(())
}

#[tokio::test]
async fn test_comparison_uses_catalog_metadata() -> Result<()> {
    let dir = TempDir::new()?;
    let config = config(&dir);
    let mock = Arc::new(MockLlmClient::new());
    let orch = Orchestrator::from_config(&config, mock.clone(), load_catalog(&config).await);

    orch.ask(&ToolSelection::multi(["ToolA", "ToolB"], false), "which is better?", &[])
        .await;

    let request = mock.last_request().unwrap();
    let system = request.system_prompt().unwrap();
    assert!(system.contains("Writes code"));
    assert!(system.contains("Draws pictures"));
    assert!(system.contains("Rating: 4.2"));
    assert_eq!(request.temperature, 0.1);
    Ok(())
}

#[tokio::test]
async fn test_tool_prompt_generated_once_across_orchestrators() -> Result<()> {
    let dir = TempDir::new()?;
    let config = config(&dir);
    let catalog = load_catalog(&config).await;

    let first = Arc::new(MockLlmClient::new().with_default_reply("ToolA expert prompt"));
    let orch = Orchestrator::from_config(&config, first.clone(), catalog.clone());
    orch.ask(&ToolSelection::SingleTool("ToolA".into()), "what can it do?", &[])
        .await;
    assert_eq!(first.call_count(), 2);

    let second = Arc::new(MockLlmClient::new());
    let orch = Orchestrator::from_config(&config, second.clone(), catalog);
    orch.ask(&ToolSelection::SingleTool("ToolA".into()), "pricing?", &[])
        .await;

    assert_eq!(second.call_count(), 1);
    let system = second.last_request().unwrap().messages[0].content.clone();
    assert!(system.contains("ToolA expert prompt"));
    assert!(fs::read_to_string(config.prompts_path())?.contains("ToolA expert prompt"));
    Ok(())
}

#[tokio::test]
async fn test_long_conversation_forwards_window() -> Result<()> {
    let dir = TempDir::new()?;
    let config = config(&dir);
    let mock = Arc::new(MockLlmClient::new());
    let orch = Orchestrator::from_config(&config, mock.clone(), load_catalog(&config).await);

    let mut session = ChatSession::new(ToolSelection::GeneralOnly, Language::English);
    for i in 0..12 {
        session.submit(&orch, &format!("question {}", i)).await;
    }

    let request = mock.last_request().unwrap();
    // system + 10 history + question
    assert_eq!(request.messages.len(), 12);
    assert!(request.messages[1..11].iter().all(|m| m.role != Role::System));
    assert_eq!(
        request.messages.last(),
        Some(&Message::user("Question about AI tools: question 11"))
    );
    Ok(())
}

#[tokio::test]
async fn test_every_model_down_gives_apology() -> Result<()> {
    let dir = TempDir::new()?;
    let mut config = config(&dir);
    config.chat.language = Language::Hebrew;
    let mock = Arc::new(MockLlmClient::failing());
    let orch = Orchestrator::from_config(&config, mock.clone(), load_catalog(&config).await);

    let answer = orch.ask(&ToolSelection::SingleTool("ToolA".into()), "q", &[]).await;

    assert_eq!(answer, Language::Hebrew.apology());
    // prompt generation and the answer each tried both models
    assert_eq!(mock.call_count(), 4);
    assert!(orch.synthesizer().cache().get("ToolA").is_none());
    Ok(())
}

#[tokio::test]
async fn test_catalog_refresh_once_per_day() -> Result<()> {
    let dir = TempDir::new()?;
    let config = config(&dir);
    let source = Arc::new(StaticCatalogSource::new(CATALOG));
    let store = CatalogStore::new(config.catalog_path(), config.refresh_record_path(), source.clone());
    let day = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();

    store.load_catalog_on(day).await;
    store.load_catalog_on(day).await;
    assert_eq!(source.fetch_count(), 1);

    store.load_catalog_on(day.succ_opt().unwrap()).await;
    assert_eq!(source.fetch_count(), 2);
    Ok(())
}

#[tokio::test]
async fn test_session_past_midnight_sees_new_catalog() -> Result<()> {
    let dir = TempDir::new()?;
    let config = config(&dir);
    let source = Arc::new(StaticCatalogSource::new(CATALOG));
    let store = CatalogStore::new(config.catalog_path(), config.refresh_record_path(), source.clone());
    let mock = Arc::new(MockLlmClient::new());
    let mut orch =
        Orchestrator::from_config(&config, mock.clone(), Catalog::default()).with_catalog_store(store);
    let day = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
    let compare = ToolSelection::multi(["ToolA", "ToolC"], false);

    orch.sync_catalog_on(day).await;
    orch.ask(&compare, "which is better?", &[]).await;
    let system = mock.last_request().unwrap().system_prompt().unwrap().to_string();
    assert!(system.contains("No catalog information is available for: ToolC"));

    source.set_body(
        r#"{"tools": [
            {"name": "ToolA", "description": "Writes code"},
            {"name": "ToolC", "description": "Transcribes audio"}
        ]}"#,
    );
    orch.sync_catalog_on(day).await;
    assert_eq!(source.fetch_count(), 1);

    orch.sync_catalog_on(day.succ_opt().unwrap()).await;
    assert_eq!(source.fetch_count(), 2);
    orch.ask(&compare, "and now?", &[]).await;

    let system = mock.last_request().unwrap().system_prompt().unwrap().to_string();
    assert!(system.contains("Tool: ToolC"));
    assert!(system.contains("Transcribes audio"));
    assert!(!system.contains("No catalog information"));
    Ok(())
}

#[test]
fn test_catalog_document_shapes_agree() -> Result<()> {
    let wrapped = format!(r#"{{"tools": {}}}"#, CATALOG);
    let from_array: Vec<String> = parse_catalog(CATALOG.as_bytes())?.into_iter().map(|t| t.name).collect();
    let from_object: Vec<String> = parse_catalog(wrapped.as_bytes())?.into_iter().map(|t| t.name).collect();

    assert_eq!(from_array, vec!["ToolA", "ToolB"]);
    assert_eq!(from_array, from_object);
    Ok(())
}
