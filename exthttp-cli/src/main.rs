use std::fs::File;
use std::io::{self, Write};
use std::process;
use std::time::Duration;

use clap::{Parser, Subcommand};
use colored::Colorize;

use exthttp_core::{
    ExecutorConfig, HttpRequestExecutor, RequestBody, ResponseBody, ResponseMode, ResponseRecord,
};

/// exthttp — issue a single blocking HTTP request
#[derive(Parser, Debug)]
#[command(name = "exthttp", version, about = "A minimal synchronous HTTP client")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Show response headers
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Overall request timeout in seconds (default: none)
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Connection timeout in seconds (default: none)
    #[arg(long, global = true)]
    connect_timeout: Option<u64>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Send a GET request
    Get {
        url: String,

        /// Request header, "Name: Value" (repeatable)
        #[arg(short = 'H', long = "header")]
        headers: Vec<String>,

        /// Stream the body instead of buffering it as text
        #[arg(long)]
        stream: bool,

        /// Write the body to FILE instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Send a POST request
    Post {
        url: String,

        /// Request header, "Name: Value" (repeatable)
        #[arg(short = 'H', long = "header")]
        headers: Vec<String>,

        /// Content-Type of the request body
        #[arg(short = 't', long = "content-type")]
        content_type: String,

        /// Request body text
        #[arg(short = 'd', long = "data", conflicts_with = "data_file")]
        data: Option<String>,

        /// Stream the request body from FILE
        #[arg(long = "data-file")]
        data_file: Option<String>,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let executor = HttpRequestExecutor::with_config(ExecutorConfig {
        connect_timeout: cli.connect_timeout.map(Duration::from_secs),
        timeout: cli.timeout.map(Duration::from_secs),
    });

    match cli.command {
        Command::Get {
            url,
            headers,
            stream,
            output,
        } => {
            let headers = parse_headers(&headers);
            let mode = if stream {
                ResponseMode::Stream
            } else {
                ResponseMode::Text
            };

            let record = match executor.get(&url, &headers, mode) {
                Ok(r) => r,
                Err(e) => fail(&e.to_string()),
            };
            print_response(record, cli.verbose, output.as_deref());
        }
        Command::Post {
            url,
            headers,
            content_type,
            data,
            data_file,
        } => {
            let headers = parse_headers(&headers);
            let body = match (data, data_file) {
                (Some(text), None) => RequestBody::Text(text),
                (None, Some(path)) => match File::open(&path) {
                    Ok(file) => RequestBody::stream(file),
                    Err(e) => fail(&format!("Error opening '{}': {}", path, e)),
                },
                _ => fail("POST requires exactly one of --data or --data-file"),
            };

            let record = match executor.post(&url, &headers, &content_type, body) {
                Ok(r) => r,
                Err(e) => fail(&e.to_string()),
            };
            print_response(record, cli.verbose, None);
        }
    }
}

fn fail(message: &str) -> ! {
    eprintln!("{} {}", "✖".red().bold(), message);
    process::exit(1);
}

fn parse_headers(raw: &[String]) -> Vec<(String, String)> {
    let mut headers = Vec::new();
    for h in raw {
        match h.split_once(':') {
            Some((k, v)) => headers.push((k.trim().to_string(), v.trim().to_string())),
            None => fail(&format!("Invalid header '{}': expected 'Name: Value'", h)),
        }
    }
    headers
}

fn print_response(record: ResponseRecord, verbose: bool, output: Option<&str>) {
    let status = record.status;
    let status_colored = if record.is_success() {
        format!("{}", status).green().bold()
    } else if (400..500).contains(&status) {
        format!("{}", status).yellow().bold()
    } else if status >= 500 {
        format!("{}", status).red().bold()
    } else {
        format!("{}", status).white().bold()
    };
    eprintln!("{} {}", "Status:".dimmed(), status_colored);

    if verbose {
        eprintln!("{}", "Response Headers:".dimmed());
        for (k, v) in &record.headers {
            eprintln!("  {}: {}", k.as_str().dimmed(), v.as_str());
        }
    }

    match record.body {
        ResponseBody::Text(text) => {
            if text.is_empty() {
                return;
            }
            if let Some(path) = output {
                if let Err(e) = std::fs::write(path, &text) {
                    fail(&format!("Error writing '{}': {}", path, e));
                }
                return;
            }
            // Pretty-print JSON bodies.
            if let Ok(json) = serde_json::from_str::<serde_json::Value>(&text) {
                let pretty = serde_json::to_string_pretty(&json).unwrap_or_else(|_| text.clone());
                println!("{}", pretty);
            } else {
                println!("{}", text);
            }
        }
        ResponseBody::Stream(mut reader) => {
            let copied = match output {
                Some(path) => match File::create(path) {
                    Ok(mut file) => io::copy(&mut reader, &mut file),
                    Err(e) => fail(&format!("Error creating '{}': {}", path, e)),
                },
                None => {
                    let stdout = io::stdout();
                    let mut out = stdout.lock();
                    let res = io::copy(&mut reader, &mut out);
                    let _ = out.flush();
                    res
                }
            };
            if let Err(e) = copied {
                fail(&format!("Error reading response body: {}", e));
            }
        }
    }
}
