//! warranty-cli: command-line client for the Warranty Assistant HTTP API
//!
//! # Subcommands
//! - `ask <question> --user <id> --name <name> [--json]`  one chat turn
//! - `history <user_id> [--session <id>]`                 read stored conversations
//! - `status`                                             show server health

use clap::{Parser, Subcommand};
use serde::Deserialize;

const DEFAULT_SERVER: &str = "http://127.0.0.1:5001";

// ============================================================================
// CLI Definition
// ============================================================================

#[derive(Debug, Parser)]
#[command(
    name = "warranty-cli",
    version,
    about = "Ask the Warranty Assistant about product warranty coverage"
)]
struct Cli {
    /// Warranty server URL (overrides WARRANTY_HTTP_URL env var)
    #[arg(long, env = "WARRANTY_HTTP_URL", default_value = DEFAULT_SERVER)]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Send one question and print the assistant's answer
    Ask {
        /// Question text
        question: String,

        /// Caller's user id
        #[arg(short, long, env = "WARRANTY_USER_ID")]
        user: String,

        /// Display name used in greetings
        #[arg(short, long, env = "WARRANTY_USER_NAME")]
        name: String,

        /// Print the raw JSON response
        #[arg(long)]
        json: bool,
    },

    /// List a user's chat sessions, or print one session's transcript
    History {
        user_id: String,

        #[arg(short, long)]
        session: Option<String>,
    },

    /// Show Warranty server status
    Status,
}

// ============================================================================
// API Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResponse {
    pub response: String,
    pub session_id: String,
}

#[derive(Debug, Deserialize)]
pub struct MessageView {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub timestamp: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SessionView {
    pub id: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub messages: Vec<MessageView>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryResponse {
    pub sessions: Vec<SessionView>,
    pub total_sessions: usize,
}

// ============================================================================
// Formatting
// ============================================================================

/// One line per session: id, state, message count, last update.
pub fn format_session_line(s: &SessionView) -> String {
    format!(
        "{}  {:<8}  {:>3} messages  updated {}",
        s.id,
        if s.active { "active" } else { "closed" },
        s.messages.len(),
        s.updated_at.as_deref().unwrap_or("?")
    )
}

/// Full transcript with speaker labels, oldest first.
pub fn format_transcript(s: &SessionView) -> String {
    let mut out = format!(
        "Session {} ({})\n",
        s.id,
        if s.display_name.is_empty() { "unknown user" } else { s.display_name.as_str() }
    );
    if s.messages.is_empty() {
        out.push_str("(no messages)\n");
        return out;
    }
    for m in &s.messages {
        let speaker = if m.role == "assistant" { "Assistant" } else { "Customer" };
        out.push_str(&format!("\n{}: {}\n", speaker, m.content));
    }
    out
}

// ============================================================================
// HTTP Client Calls
// ============================================================================

fn client(timeout_secs: u64) -> anyhow::Result<reqwest::blocking::Client> {
    Ok(reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()?)
}

fn fail(msg: impl std::fmt::Display) -> ! {
    eprintln!("warranty-cli: {}", msg);
    std::process::exit(1);
}

/// Check status, returning the response or exiting with the server's message.
fn expect_success(
    url: &str,
    resp: reqwest::Result<reqwest::blocking::Response>,
) -> reqwest::blocking::Response {
    let resp = match resp {
        Ok(r) => r,
        Err(e) => fail(format!("connection failed to {}: {}", url, e)),
    };

    if !resp.status().is_success() {
        let status = resp.status();
        let body: serde_json::Value = resp.json().unwrap_or_default();
        let msg = body["error"].as_str().unwrap_or("no error message");
        fail(format!("server returned {}: {}", status, msg));
    }
    resp
}

/// POST /api/query. Generation can take a while, hence the longer timeout.
fn do_ask(server: &str, question: &str, user: &str, name: &str, json_output: bool) -> anyhow::Result<()> {
    let url = format!("{}/api/query", server);
    let body = serde_json::json!({
        "prompt": question,
        "userId": user,
        "username": name,
    });

    let resp = expect_success(&url, client(60)?.post(&url).json(&body).send());

    if json_output {
        let raw: serde_json::Value = resp.json()?;
        println!("{}", serde_json::to_string_pretty(&raw)?);
        return Ok(());
    }

    let answer: QueryResponse = match resp.json() {
        Ok(r) => r,
        Err(e) => fail(format!("failed to parse query response: {}", e)),
    };
    println!("{}", answer.response);
    eprintln!("(session {})", answer.session_id);
    Ok(())
}

fn do_history(server: &str, user_id: &str, session: Option<&str>) -> anyhow::Result<()> {
    let client = client(10)?;

    if let Some(session_id) = session {
        let url = format!("{}/api/chat-history/{}/{}", server, user_id, session_id);
        let resp = expect_success(&url, client.get(&url).send());
        let session: SessionView = resp.json()?;
        print!("{}", format_transcript(&session));
        return Ok(());
    }

    let url = format!("{}/api/chat-history/{}", server, user_id);
    let resp = expect_success(&url, client.get(&url).send());
    let history: HistoryResponse = resp.json()?;

    if history.sessions.is_empty() {
        eprintln!("No chat sessions for user: {}", user_id);
        return Ok(());
    }
    println!("{} session(s) for {}\n", history.total_sessions, user_id);
    for s in &history.sessions {
        println!("{}", format_session_line(s));
    }
    Ok(())
}

fn do_status(server: &str) -> anyhow::Result<()> {
    let url = format!("{}/health", server);
    let resp = client(10)?.get(&url).send();

    match resp {
        Ok(r) if r.status().is_success() => {
            let body: serde_json::Value = r.json().unwrap_or_default();
            println!("Warranty server: {}", body["status"].as_str().unwrap_or("unknown"));
            println!("Version:         {}", body["version"].as_str().unwrap_or("?"));
            println!("Session store:   {}", body["session_store"].as_str().unwrap_or("?"));
            println!("Snippets loaded: {}", body["snippets"].as_u64().unwrap_or(0));
            println!("Model:           {}", body["model"].as_str().unwrap_or("?"));
        }
        Ok(r) => fail(format!("server unhealthy (HTTP {})", r.status())),
        Err(e) => fail(format!("cannot reach {}: {}", url, e)),
    }

    Ok(())
}

// ============================================================================
// Main
// ============================================================================

fn main() {
    let cli = Cli::parse();
    let server = cli.server.trim_end_matches('/').to_string();

    let result = match cli.command {
        Commands::Ask {
            question,
            user,
            name,
            json,
        } => do_ask(&server, &question, &user, &name, json),
        Commands::History { user_id, session } => do_history(&server, &user_id, session.as_deref()),
        Commands::Status => do_status(&server),
    };

    if let Err(e) = result {
        fail(e);
    }
}

// ============================================================================
// Tests
// ============================================================================
