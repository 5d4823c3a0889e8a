mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use std::path::Path;

use tokio_util::sync::CancellationToken;
use vf_av::ToolRegistry;
use vf_core::config::Config;
use vf_server::context::AppContext;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            // Verbose mode: trace for vodforge crates, debug for HTTP
            "vodforge=trace,vf_server=trace,vf_av=trace,vf_hls=trace,vf_core=debug,tower_http=debug"
                .to_string()
        } else {
            // Normal mode: debug for vodforge crates, info for HTTP requests
            "vodforge=debug,vf_server=debug,vf_av=debug,vf_hls=debug,tower_http=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .init();

    match cli.command {
        Commands::Start { host, port } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(start_server(host, port, cli.config.as_deref()))
        }
        Commands::Run { input } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(run_file(&input, cli.config.as_deref()))
        }
        Commands::Probe { file, json } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(probe_file(&file, cli.config.as_deref(), json))
        }
        Commands::CheckTools => check_tools(cli.config.as_deref()),
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("vodforge {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

async fn start_server(host: String, port: u16, config_path: Option<&Path>) -> Result<()> {
    let mut config = Config::load_or_default(config_path);

    // Override host/port from CLI if specified
    config.server.host = host;
    config.server.port = port;

    tracing::info!("Starting vodforge server");
    tracing::info!(
        "Server will listen on {}:{}",
        config.server.host,
        config.server.port
    );

    vf_server::start(config).await?;
    Ok(())
}

async fn run_file(input: &Path, config_path: Option<&Path>) -> Result<()> {
    let config = Config::load_or_default(config_path);

    if !input.exists() {
        anyhow::bail!("Input file does not exist: {:?}", input);
    }

    tracing::info!("Transcoding file: {:?}", input);

    let ctx = AppContext::new(config)?;
    let published =
        vf_server::pipeline::process_upload(&ctx, input, CancellationToken::new()).await?;

    println!("Published asset {}", published.id);
    println!("  Master playlist: {}", published.master_path.display());
    println!("  Renditions: {}", published.renditions.join(", "));

    Ok(())
}

async fn probe_file(file: &Path, config_path: Option<&Path>, json: bool) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("File does not exist: {:?}", file);
    }

    let config = Config::load_or_default(config_path);
    let tools = ToolRegistry::discover(&config.tools);
    let descriptor = vf_av::probe::inspect(&tools, file).await?;

    if json {
        let json_str = serde_json::to_string_pretty(&descriptor)?;
        println!("{}", json_str);
    } else {
        println!("File: {}", descriptor.path.display());
        println!("Video: {}x{}", descriptor.width, descriptor.height);

        println!("\nAudio Tracks: {}", descriptor.audio_tracks.len());
        for track in &descriptor.audio_tracks {
            println!("  [{}] {}", track.stream_index, track.codec);
        }
    }

    Ok(())
}

fn check_tools(config_path: Option<&Path>) -> Result<()> {
    println!("Checking external tools...\n");

    let config = Config::load_or_default(config_path);
    let tools = ToolRegistry::discover(&config.tools);
    let mut all_ok = true;

    for tool in tools.check_all() {
        let status = if tool.available {
            "✓"
        } else {
            all_ok = false;
            "✗"
        };

        print!("{} {}", status, tool.name);

        if let Some(ref version) = tool.version {
            print!(" ({})", version.lines().next().unwrap_or(""));
        }

        if let Some(ref path) = tool.path {
            print!(" - {}", path.display());
        }

        println!();
    }

    println!();
    if all_ok {
        println!("All required tools are available!");
    } else {
        println!("Some tools are missing. Uploads will fail until they are installed.");
    }

    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let contents = std::fs::read_to_string(p)?;
            let config = Config::from_json(&contents)?;
            println!("✓ Configuration is valid");
            println!("  Server: {}:{}", config.server.host, config.server.port);
            println!("  Upload dir: {}", config.storage.upload_dir.display());
            println!("  HLS output: {}", config.storage.hls_dir.display());
            println!("  Segment length: {}s", config.encode.segment_seconds);
            println!("  Encode slots: {}", config.encode.max_concurrent);
            for warning in config.validate() {
                println!("  ⚠ {}", warning);
            }
        }
        None => {
            println!("No config file specified, using defaults");
            let config = Config::default();
            println!("Default config:");
            println!("  Server: {}:{}", config.server.host, config.server.port);
            println!("  Upload dir: {}", config.storage.upload_dir.display());
            println!("  HLS output: {}", config.storage.hls_dir.display());
        }
    }

    Ok(())
}
