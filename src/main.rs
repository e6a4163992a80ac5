use std::error::Error;

use clap::Parser;
use log::{error, info};
use plinko::{
    cli::{Args, Command, LabelArgs},
    render_label, server, shuffle, Config, LabelRequest,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            return Err(e.into());
        }
    }
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    match args.command {
        None => serve(args.serve.into()).await,
        Some(Command::Serve(serve_args)) => serve(serve_args.into()).await,
        Some(Command::Label(label)) => write_label(label),
        Some(Command::Shuffle { mut items }) => {
            for item in shuffle(&mut items) {
                println!("{item}");
            }
            Ok(())
        }
    }
}

async fn serve(config: Config) -> Result<(), Box<dyn Error>> {
    let listener = server::bind(&config).await?;
    match server::serve(listener, &config.public_dir).await {
        Ok(_) => Ok(()),
        Err(e) => {
            error!("{e}");
            Err(e.into())
        }
    }
}

fn write_label(args: LabelArgs) -> Result<(), Box<dyn Error>> {
    let request = LabelRequest::new(args.text, args.width, args.font_size).centered(args.center);
    let label = render_label(&request)?;

    match args.output {
        Some(path) => {
            std::fs::write(&path, label.to_png()?)?;
            info!("wrote {}x{} label to {}", label.width(), label.height(), path.display());
        }
        None => println!("{}", label.to_data_url()?),
    }
    Ok(())
}
