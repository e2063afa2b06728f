use std::path::PathBuf;

use gumdrop::Options as _;
use touchdown::config::Config;

#[derive(Debug, gumdrop::Options)]
/// a twitch chat bot that answers a few commands and announces landings
struct Args {
    /// print this help message
    help: bool,

    /// file to append the log to
    #[options(default = "logs/touchdown.log", meta = "<path>")]
    log_file: PathBuf,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    simple_env_load::load_env_from([".dev.env"]);
    let args = Args::parse_args_default_or_exit();
    touchdown::logging::init(&args.log_file)?;

    log::info!("loading configuration");
    let config = Config::load()?;

    match touchdown::run(config).await? {
        reason if reason.is_failure() => anyhow::bail!("{reason}"),
        reason => {
            log::info!("exiting: {reason}");
            Ok(())
        }
    }
}
