// ABOUTME: CLI binary for article-extract: fetches URLs (or stdin) and prints fragments.
// ABOUTME: Positional URLs, `-` for stdin; -h/--html or -t/--text (default) selects output.

use std::io::{self, Read, Write};
use std::process::ExitCode;

use clap::Parser;

use article_extract::{Client, ContentType};

#[derive(Parser, Debug)]
#[command(name = "article-extract")]
#[command(about = "Extract article content from one or more URLs")]
struct Args {
    /// Emit HTML fragments instead of plain text.
    #[arg(short = 'h', long = "html", conflicts_with = "text")]
    html: bool,

    /// Emit plain-text fragments (default).
    #[arg(short = 't', long = "text")]
    text: bool,

    /// Allow fetching from private/local networks.
    #[arg(long = "allow-private-networks")]
    allow_private_networks: bool,

    /// URLs to fetch, or `-` to read raw HTML from stdin.
    #[arg(required = true)]
    urls: Vec<String>,
}

fn read_stdin() -> io::Result<String> {
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let content_type = if args.html {
        ContentType::Html
    } else {
        ContentType::Text
    };

    let client = Client::builder()
        .content_type(content_type)
        .allow_private_networks(args.allow_private_networks)
        .build();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut had_error = false;

    for url in &args.urls {
        let result = if url == "-" {
            match read_stdin() {
                Ok(html) => client.parse_html(&html, "stdin:-").await,
                Err(e) => {
                    eprintln!("article-extract: stdin: {}", e);
                    had_error = true;
                    continue;
                }
            }
        } else {
            client.parse(url).await
        };

        match result {
            Ok(extracted) => {
                for fragment in &extracted.fragments {
                    let _ = writeln!(out, "{}", fragment);
                    let _ = writeln!(out);
                }
                if let Some(title) = &extracted.metadata.title {
                    let _ = writeln!(out, "title: {}", title);
                }
                if let Some(description) = &extracted.metadata.description {
                    let _ = writeln!(out, "description: {}", description);
                }
            }
            Err(e) => {
                eprintln!("article-extract: {}", e);
                had_error = true;
            }
        }
    }

    if had_error {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}
