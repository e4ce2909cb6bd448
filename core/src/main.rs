use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use site_core::{
    ApiGateway, CredentialStore, HtmlHeadSink, MetadataResolver, NoCredentials, PageMetadataInput,
    ReqwestTransport, RouteContext, RuntimeConfig, StaticCredential,
};

/// Render page heads and call the backend API with the site's configuration.
///
/// Reads SITE_API_BASE, SITE_URL and SITE_ENV from the environment.
#[derive(Parser)]
#[command(name = "site-head", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the document head for a route.
    Head {
        /// Route path, e.g. /listings/42
        #[arg(long, default_value = "/")]
        route: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        image: Option<String>,
        /// No defaults; title required.
        #[arg(long)]
        strict: bool,
        /// Print the head payload as JSON instead of HTML.
        #[arg(long)]
        json: bool,
    },
    /// GET an endpoint and print the response body.
    Get { endpoint: String },
    /// POST a JSON body to an endpoint and print the response body.
    Post { endpoint: String, body: String },
}

fn credentials() -> Arc<dyn CredentialStore> {
    match std::env::var("SITE_TOKEN") {
        Ok(token) if !token.is_empty() => Arc::new(StaticCredential::new(token)),
        _ => Arc::new(NoCredentials),
    }
}

fn print_response(response: site_core::HttpResponse) {
    eprintln!("HTTP {}", response.status);
    println!("{}", response.body);
}

#[tokio::main]
async fn main() -> Result<()> {
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "site_core=info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Arc::new(RuntimeConfig::from_env().context("invalid site configuration")?);

    match cli.command {
        Commands::Head {
            route,
            title,
            description,
            image,
            strict,
            json,
        } => {
            let resolver = MetadataResolver::new(config, strict);
            let input = PageMetadataInput {
                title,
                description,
                image,
            };
            let route = RouteContext::new(route);
            if json {
                let resolved = resolver.resolve(&input, &route)?;
                println!("{}", serde_json::to_string_pretty(&resolver.head(&resolved))?);
            } else {
                let mut sink = HtmlHeadSink::new();
                resolver.apply(&input, &route, &mut sink)?;
                print!("{}", sink.html());
            }
        }
        Commands::Get { endpoint } => {
            let gateway = ApiGateway::new(config, Arc::new(ReqwestTransport::new()), credentials());
            let response = gateway
                .get(&endpoint)
                .await
                .with_context(|| format!("GET {endpoint} failed"))?;
            print_response(response);
        }
        Commands::Post { endpoint, body } => {
            let body: serde_json::Value =
                serde_json::from_str(&body).context("body is not valid JSON")?;
            let gateway = ApiGateway::new(config, Arc::new(ReqwestTransport::new()), credentials());
            let response = gateway
                .post(&endpoint, &body)
                .await
                .with_context(|| format!("POST {endpoint} failed"))?;
            print_response(response);
        }
    }

    Ok(())
}
