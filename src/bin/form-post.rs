use std::time::Duration;

use clap::Parser;
use url::Url;

use form_handlers::config::PosterConfig;
use form_handlers::poster::FormPoster;

#[derive(Parser)]
#[command(name = "form-post")]
#[command(about = "Send one url-encoded form POST and print the response body", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://127.0.0.1:8080/submit")]
    endpoint: Url,

    /// Form field as `key=value`. Repeat for more fields.
    #[arg(short, long = "field", value_parser = parse_field)]
    fields: Vec<(String, String)>,

    /// Request timeout in seconds.
    #[arg(short, long)]
    timeout: Option<u64>,
}

fn parse_field(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, _)) if key.is_empty() => Err(format!("empty field name in '{}'", raw)),
        Some((key, value)) => Ok((key.to_string(), value.to_string())),
        None => Err(format!("expected key=value, got '{}'", raw)),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let fields = if cli.fields.is_empty() {
        PosterConfig::default().fields.into_iter().collect()
    } else {
        cli.fields
    };

    let poster = FormPoster::new(cli.endpoint, cli.timeout.map(Duration::from_secs))?;
    match poster.post_form(fields).await {
        Ok(body) => {
            print!("{}", body);
            Ok(())
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
