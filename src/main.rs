use clap::Parser;
use mimalloc::MiMalloc;
use qrboot::cli::{Cli, Command};
use qrboot::config::Config;
use qrboot::db::{UserStorage, connect};
use qrboot::error::BootError;
use qrboot::service::layout::prepare_dirs;
use qrboot::service::schema_init::{init_database, migrate_database};
use qrboot::service::seeder::add_user;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    dotenvy::dotenv().ok();

    let cfg = Config::from_env();
    let loglevel = cfg
        .as_ref()
        .map(|c| c.loglevel.clone())
        .unwrap_or_else(|_| "info".to_string());
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(loglevel));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false),
        )
        .init();

    let result = match cfg {
        Ok(cfg) => dispatch(cli.command, cfg).await,
        Err(e) => Err(e),
    };
    match result {
        Ok(code) => ExitCode::from(clamp(code)),
        Err(e) => {
            error!(error = %e.chain(), "qrboot failed");
            ExitCode::from(clamp(e.exit_code()))
        }
    }
}

async fn dispatch(command: Command, cfg: Config) -> Result<i32, BootError> {
    info!(
        app_root = %cfg.app_root.display(),
        database = %cfg.database_path().display(),
        init_command = %cfg.init_command,
        default_username = %cfg.default_username,
        loglevel = %cfg.loglevel
    );

    match command {
        Command::Run { server } => qrboot::run(&cfg, &server).await,
        Command::InitDb => {
            prepare_dirs(&[cfg.instance_dir()])?;
            init_database(&cfg.database_path(), cfg.seed_account()).await?;
            Ok(0)
        }
        Command::AddUser {
            username,
            password,
            admin,
        } => {
            prepare_dirs(&[cfg.instance_dir()])?;
            let storage = UserStorage::new(connect(&cfg.database_path()).await?);
            let result = async {
                storage.init_schema().await?;
                add_user(&storage, &username, &password, admin).await
            }
            .await;
            storage.close().await;
            result.map(|_| 0)
        }
        Command::Migrate => {
            prepare_dirs(&[cfg.instance_dir()])?;
            migrate_database(&cfg.database_path()).await?;
            Ok(0)
        }
    }
}

fn clamp(code: i32) -> u8 {
    u8::try_from(code).unwrap_or(1)
}
