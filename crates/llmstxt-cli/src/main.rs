//! llmstxt CLI - Generate llms.txt documents for Shopify stores

use clap::{Args, Parser, Subcommand, ValueEnum};
use llmstxt::fetchers::DEFAULT_API_VERSION;
use llmstxt::{
    fetch_catalog, generate_document, AdminApiConfig, AdminApiFetcher, Catalog, CatalogError,
    CatalogFetcher, GeneratedDocument, SnapshotFetcher, TOOL_LLMTXT,
};
use serde::Serialize;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Output format for generate subcommand
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Plain llms.txt text
    #[default]
    Md,
    /// JSON with store overview and document text
    Json,
}

/// llmstxt - llms.txt generator for Shopify stores
#[derive(Parser, Debug)]
#[command(name = "llmstxt")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Print full help with examples (llmtxt)
    #[arg(long)]
    llmtxt: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch the catalog and print (or write) llms.txt
    Generate {
        #[command(flatten)]
        store: StoreArgs,

        /// Read the catalog from a snapshot file instead of the Admin API
        #[arg(long)]
        snapshot: Option<PathBuf>,

        /// Write to this path instead of stdout (a directory gets llms.txt inside)
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, short, default_value = "md")]
        format: OutputFormat,
    },
    /// Fetch the catalog and save it as a snapshot JSON file
    Export {
        #[command(flatten)]
        store: StoreArgs,

        /// Snapshot file to write
        #[arg(long, short, default_value = "catalog.json")]
        output: PathBuf,
    },
}

/// Admin API connection flags
#[derive(Args, Debug)]
struct StoreArgs {
    /// Store handle, e.g. acme.myshopify.com
    #[arg(long, env = "SHOPIFY_SHOP_DOMAIN")]
    shop: Option<String>,

    /// Admin API access token
    #[arg(long, env = "SHOPIFY_ACCESS_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Admin API version
    #[arg(long, env = "SHOPIFY_API_VERSION", default_value = DEFAULT_API_VERSION)]
    api_version: String,

    /// Custom User-Agent
    #[arg(long)]
    user_agent: Option<String>,
}

impl StoreArgs {
    fn fetcher(&self) -> Result<AdminApiFetcher, CatalogError> {
        let shop = self
            .shop
            .as_deref()
            .ok_or(CatalogError::MissingConfig("shop_domain"))?;
        let token = self
            .token
            .as_deref()
            .ok_or(CatalogError::MissingConfig("access_token"))?;

        let mut config = AdminApiConfig::new(shop, token).api_version(&self.api_version);
        if let Some(ref ua) = self.user_agent {
            config = config.user_agent(ua);
        }
        AdminApiFetcher::new(config)
    }
}

/// JSON output for `generate --format json`
#[derive(Debug, Serialize)]
struct GenerateOutput<'a> {
    shop: &'a str,
    domain: &'a str,
    products: usize,
    currency: &'a str,
    text: &'a str,
}

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();

    // Handle --llmtxt flag
    if cli.llmtxt {
        print_safe(TOOL_LLMTXT);
        std::process::exit(0);
    }

    let result = match cli.command {
        Some(Commands::Generate {
            store,
            snapshot,
            output,
            format,
        }) => run_generate(&store, snapshot, output, format).await,
        Some(Commands::Export { store, output }) => run_export(&store, &output).await,
        None => {
            eprintln!("Usage: llmstxt generate --shop <DOMAIN> --token <TOKEN>");
            eprintln!("   or: llmstxt generate --snapshot <FILE>");
            eprintln!("   or: llmstxt --help");
            std::process::exit(1);
        }
    };

    if let Err(e) = result {
        if e.is_auth() {
            eprintln!("Authentication error: {}", e);
        } else {
            eprintln!("Error: {}", e);
        }
        std::process::exit(1);
    }
}

/// Log to stderr so stdout carries only the document
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

async fn run_generate(
    store: &StoreArgs,
    snapshot: Option<PathBuf>,
    output: Option<PathBuf>,
    format: OutputFormat,
) -> Result<(), CatalogError> {
    let fetcher: Box<dyn CatalogFetcher> = match snapshot {
        Some(path) => Box::new(SnapshotFetcher::new(path)),
        None => Box::new(store.fetcher()?),
    };

    let catalog = fetch_catalog(fetcher.as_ref()).await?;
    let doc = generate_document(&catalog);
    let rendered = render(&catalog, &doc, format);

    match output {
        Some(path) => {
            let path = resolve_output_path(&path);
            write_output(&path, &rendered).await?;
            tracing::info!(path = %path.display(), "Wrote llms.txt");
            eprintln!("{}", format_overview(&catalog));
            eprintln!("Wrote {}", path.display());
        }
        None => print_safe(&rendered),
    }

    Ok(())
}

async fn run_export(store: &StoreArgs, output: &Path) -> Result<(), CatalogError> {
    let fetcher = store.fetcher()?;
    let catalog = fetch_catalog(&fetcher).await?;
    SnapshotFetcher::write(output, &catalog).await?;
    eprintln!("{}", format_overview(&catalog));
    eprintln!("Wrote {}", output.display());
    Ok(())
}

fn render(catalog: &Catalog, doc: &GeneratedDocument, format: OutputFormat) -> String {
    match format {
        OutputFormat::Md => doc.text.clone(),
        OutputFormat::Json => {
            let output = GenerateOutput {
                shop: &catalog.shop.name,
                domain: &catalog.shop.domain,
                products: catalog.products.len(),
                currency: &catalog.shop.currency_code,
                text: &doc.text,
            };
            let mut json = serde_json::to_string_pretty(&output).unwrap_or_else(|e| {
                eprintln!("Error serializing output: {}", e);
                std::process::exit(1);
            });
            json.push('\n');
            json
        }
    }
}

/// A directory resolves to `{dir}/llms.txt`
fn resolve_output_path(path: &Path) -> PathBuf {
    if path.is_dir() {
        path.join(GeneratedDocument::FILE_NAME)
    } else {
        path.to_path_buf()
    }
}

/// Sibling file the document is staged in before replacing `path`
fn staging_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| GeneratedDocument::FILE_NAME.to_string());
    path.with_file_name(format!(".{}.tmp", name))
}

/// Replace `path` with `contents`; the previous file stays intact on failure
async fn write_output(path: &Path, contents: &str) -> Result<(), CatalogError> {
    let output_err = |e: io::Error| CatalogError::Output(format!("{}: {}", path.display(), e));
    let staging = staging_path(path);

    if let Err(e) = tokio::fs::write(&staging, contents).await {
        let _ = tokio::fs::remove_file(&staging).await;
        return Err(output_err(e));
    }
    if let Err(e) = tokio::fs::rename(&staging, path).await {
        let _ = tokio::fs::remove_file(&staging).await;
        return Err(output_err(e));
    }
    Ok(())
}

/// Short store overview shown after writing a file
fn format_overview(catalog: &Catalog) -> String {
    let mut output = String::new();
    output.push_str(&format!("Store Name: {}\n", catalog.shop.name));
    output.push_str(&format!("Domain: {}\n", catalog.shop.domain));
    output.push_str(&format!("Products: {}\n", catalog.products.len()));
    output.push_str(&format!("Currency: {}", catalog.shop.currency_code));
    output
}

/// Write to stdout, exit silently on broken pipe
fn print_safe(s: &str) {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if let Err(e) = write!(handle, "{}", s) {
        if e.kind() == io::ErrorKind::BrokenPipe {
            std::process::exit(0);
        }
        eprintln!("Error writing to stdout: {}", e);
        std::process::exit(1);
    }
}
