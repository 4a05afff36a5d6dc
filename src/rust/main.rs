use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{bail, Context};
use clap::Parser;
use jangle::{
    ClassificationClient, ClientConfig, ImageFile, InputMode, RequestState, Session,
    TransportStrategy,
};
use log::info;

#[derive(Parser)]
#[command(author, version, about = "Find out if Jangle will eat what's in your picture", long_about = None)]
struct Args {
    /// Image file to classify
    #[arg(short, long, conflicts_with_all = ["url", "example"])]
    file: Option<PathBuf>,

    /// Image URL to classify
    #[arg(short, long, conflicts_with = "example")]
    url: Option<String>,

    /// Classify the bundled sample image
    #[arg(long)]
    example: bool,

    /// How to reach the classifier: multipart or rpc
    #[arg(short, long, default_value = "multipart")]
    transport: TransportStrategy,

    /// Which inputs to accept: file, url or tabbed
    #[arg(short, long, default_value = "tabbed")]
    mode: InputMode,

    /// Base URL of the multipart endpoint (overrides JANGLE_API_BASE)
    #[arg(long)]
    api_base: Option<String>,

    /// Hosted space URL for the rpc transport (overrides JANGLE_SPACE_URL)
    #[arg(long)]
    space_url: Option<String>,

    /// Use the local development server
    #[arg(long)]
    dev: bool,

    /// Give up after this many seconds (default: wait indefinitely)
    #[arg(long)]
    timeout: Option<u64>,

    /// Print the normalized result as JSON instead of a verdict
    #[arg(long)]
    json: bool,
}

impl Args {
    fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::from_env().with_development(self.dev);
        config.transport = self.transport;
        if let Some(base) = &self.api_base {
            config.api_base = base.clone();
        }
        if let Some(space) = &self.space_url {
            config.space_url = space.clone();
        }
        config.timeout = self.timeout.map(Duration::from_secs);
        config
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = args.client_config();
    let client = ClassificationClient::builder().with_config(config).build()?;
    info!("Using {:?}", client.info());

    let mut session = Session::new(client, args.mode);
    let start = Instant::now();

    let state = if let Some(path) = &args.file {
        let file = ImageFile::load(path)
            .await
            .with_context(|| format!("loading {}", path.display()))?;
        session.select_file(file)?;
        session.submit_file().await?
    } else if let Some(url) = &args.url {
        session.set_url_text(url.as_str());
        session.submit_url(url).await?
    } else if args.example {
        session.submit_example().await?
    } else {
        bail!("nothing to classify: pass --file, --url or --example");
    };
    info!("Request finished in {:.2?}", start.elapsed());

    if args.json {
        if let RequestState::Succeeded(result) = state {
            println!("{}", serde_json::to_string_pretty(result)?);
        }
    } else {
        for line in jangle::render(state) {
            println!("{}", line);
        }
    }

    if let RequestState::Failed(err) = state {
        if args.json {
            eprintln!("{}", err.user_message());
        }
        std::process::exit(1);
    }
    Ok(())
}
