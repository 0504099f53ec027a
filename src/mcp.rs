use anyhow::Result;
use rmcp::{
    ServerHandler, ServiceExt,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{ServerCapabilities, ServerInfo},
    schemars, tool, tool_handler, tool_router,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::commands::select::{open_input, select};
use crate::config::{Config, RawArgs};
use crate::paginate::Segmenter;
use crate::sink::MemorySink;

// Request structs for tools

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SelectPagesRequest {
    #[schemars(description = "Path to the text file")]
    pub path: String,
    #[schemars(description = "First page to select (1-based)")]
    pub start_page: i64,
    #[schemars(description = "Last page to select, inclusive")]
    pub end_page: i64,
    #[schemars(description = "Lines per page (default: 72). Must be omitted when form_feed is true")]
    #[serde(default)]
    pub page_length: Option<i64>,
    #[schemars(description = "Split pages on form-feed characters instead of line count (default: false)")]
    #[serde(default)]
    pub form_feed: bool,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CountPagesRequest {
    #[schemars(description = "Path to the text file")]
    pub path: String,
    #[schemars(description = "Lines per page (default: 72). Must be omitted when form_feed is true")]
    #[serde(default)]
    pub page_length: Option<i64>,
    #[schemars(description = "Split pages on form-feed characters instead of line count (default: false)")]
    #[serde(default)]
    pub form_feed: bool,
}

#[derive(Debug, Clone)]
pub struct SelpgServer {
    tool_router: ToolRouter<Self>,
}

impl SelpgServer {
    pub fn new() -> Self {
        Self {
            tool_router: Self::tool_router(),
        }
    }
}

impl Default for SelpgServer {
    fn default() -> Self {
        Self::new()
    }
}

fn config_for(
    path: String,
    start_page: i64,
    end_page: i64,
    page_length: Option<i64>,
    form_feed: bool,
) -> crate::error::Result<Config> {
    Config::validate(RawArgs {
        start_page,
        end_page,
        page_length,
        form_feed,
        dest: None,
        print_command: String::new(),
        inputs: vec![PathBuf::from(path)],
    })
}

fn select_pages(req: SelectPagesRequest) -> Result<SelectPagesResult> {
    let config = config_for(
        req.path,
        req.start_page,
        req.end_page,
        req.page_length,
        req.form_feed,
    )?;
    let input = open_input(&config.input)?;

    let mut sink = MemorySink::new();
    let result = select(input, config.mode, config.range, &mut sink)?;

    Ok(SelectPagesResult {
        total_pages: result.total_pages,
        output: String::from_utf8_lossy(&sink.into_inner()).into_owned(),
        diagnostic: result.shortfall.map(|s| s.to_string()),
    })
}

fn count_pages(req: CountPagesRequest) -> Result<CountPagesResult> {
    // Any valid range will do; only the segmenter's count is used.
    let config = config_for(req.path, 1, 1, req.page_length, req.form_feed)?;
    let input = open_input(&config.input)?;

    let mut pages = Segmenter::new(input, config.mode);
    for unit in pages.by_ref() {
        unit?;
    }

    Ok(CountPagesResult {
        total_pages: pages.pages_emitted(),
    })
}

#[tool_router]
impl SelpgServer {
    #[tool(description = "Select an inclusive range of pages from a text file. Pages are either a fixed number of lines or separated by form feeds.")]
    fn select_pages(&self, Parameters(req): Parameters<SelectPagesRequest>) -> String {
        match select_pages(req) {
            Ok(result) => {
                serde_json::to_string_pretty(&result).unwrap_or_else(|e| format!("Error: {}", e))
            }
            Err(e) => format!("Error: {}", e),
        }
    }

    #[tool(description = "Count the pages in a text file, by line count or form feeds")]
    fn count_pages(&self, Parameters(req): Parameters<CountPagesRequest>) -> String {
        match count_pages(req) {
            Ok(result) => {
                serde_json::to_string_pretty(&result).unwrap_or_else(|e| format!("Error: {}", e))
            }
            Err(e) => format!("Error: {}", e),
        }
    }
}

// Result types for MCP tools

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct SelectPagesResult {
    pub total_pages: u64,
    pub output: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostic: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct CountPagesResult {
    pub total_pages: u64,
}

#[tool_handler]
impl ServerHandler for SelpgServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Page selection for plain text. Use count_pages to learn how many pages a file has, \
                 and select_pages to read an inclusive page range. Pages are page_length lines \
                 each, or form-feed separated when form_feed is true."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

pub async fn run_server() -> Result<()> {
    let server = SelpgServer::new();

    // Serve using stdin/stdout as a tuple
    let service = server.serve((tokio::io::stdin(), tokio::io::stdout())).await?;

    service.waiting().await?;

    Ok(())
}
