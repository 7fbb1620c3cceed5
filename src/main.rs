use std::path::PathBuf;

use clap::Parser;

use edge_show::config::{load_config, Config};
use edge_show::exit::ExitFlag;

#[derive(Parser)]
#[command(about = "Show the Canny edges of an image, timing every frame")]
struct Cli {
    #[arg(long, short)]
    /// Config file, yaml or json. Defaults are used when absent
    config: Option<PathBuf>,

    #[arg(long, short)]
    /// Image to run edge detection on, overrides the config
    image: Option<PathBuf>,

    #[arg(long, short)]
    /// Stop after this many frames, overrides the config
    frames: Option<u64>,
}

fn load(cli: &Cli) -> edge_show::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => Config::default(),
    };
    if let Some(image) = &cli.image {
        config.image = image.clone();
    }
    if let Some(frames) = cli.frames {
        config.max_frames = Some(frames);
    }
    Ok(config)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let exit = ExitFlag::new();
    let res = load(&cli).and_then(|config| {
        exit.install_ctrl_c()?;
        edge_show::run(&config, &exit)
    });

    match res {
        Ok(summary) => log::info!("stopped after {} frames", summary.frames),
        Err(err) => {
            log::error!("{err}");
            std::process::exit(1);
        }
    }
}
