use clap::Parser;
use std::path::PathBuf;

pub const USAGE: &str =
    "USAGE: selpg -s start_page -e end_page [ -f | -l lines_per_page ] [ -d dest ] [ in_filename ]";

#[derive(Parser, Debug)]
#[command(name = "selpg")]
#[command(about = "Select a range of pages from a text stream, with MCP server support")]
#[command(version)]
pub struct Cli {
    /// First page to select (1-based)
    #[arg(
        short = 's',
        long = "start-page",
        default_value_t = -1,
        allow_negative_numbers = true
    )]
    pub start_page: i64,

    /// Last page to select, inclusive
    #[arg(
        short = 'e',
        long = "end-page",
        default_value_t = -1,
        allow_negative_numbers = true
    )]
    pub end_page: i64,

    /// Lines per page (default 72)
    #[arg(short = 'l', long = "page-length", allow_negative_numbers = true)]
    pub page_length: Option<i64>,

    /// Pages are delimited by form feeds instead of a fixed line count
    #[arg(short = 'f', long = "form-feed")]
    pub form_feed: bool,

    /// Also send the selected pages to this print destination
    #[arg(short = 'd', long = "dest")]
    pub dest: Option<String>,

    /// Command that receives the selected pages for printing
    #[arg(long, env = "SELPG_PRINT_CMD", default_value = "lp", hide = true)]
    pub print_command: String,

    /// Run as MCP server over stdio
    #[arg(long)]
    pub mcp: bool,

    /// Input file (standard input when omitted)
    pub inputs: Vec<PathBuf>,
}
