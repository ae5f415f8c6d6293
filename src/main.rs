//! mysql-client-tui - a terminal front-end for the MySQL command-line tools.

use mysql_client_tui::cli::{self, Cli};
use mysql_client_tui::config::{Config, ConnectionFields};
use mysql_client_tui::error::{AppError, Result};
use mysql_client_tui::logging;
use mysql_client_tui::mysql::{DatabaseCli, MysqlCli};
use mysql_client_tui::session::Session;
use mysql_client_tui::tui;
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // A missing .env is the normal case.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse_args();
    let subcommand = cli.command.is_some();
    if subcommand {
        logging::init_stderr_logging();
    } else {
        logging::init_file_logging();
    }

    if let Err(e) = run(cli).await {
        // Subcommands already logged their failure line to stderr.
        if !subcommand {
            error!("{}: {}", e.category(), e);
        }
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());
    let config = Config::load_from_file(&config_path)?;

    let mut fields = cli.resolve_fields(&config.connection, |k| std::env::var(k).ok())?;
    if cli.prompt_password {
        fields.password = prompt_password(&fields)?;
    }

    let runner: Arc<dyn DatabaseCli> = Arc::new(MysqlCli::new(&cli.tools(&config.tools)));

    match cli.command {
        Some(command) => {
            let mut stdout = std::io::stdout().lock();
            let result = cli::run_command(
                command.clone(),
                runner,
                config.connection,
                fields,
                &mut stdout,
            )
            .await;
            if let Err(e) = &result {
                error!("{}", cli::failure_line(&command, e));
            }
            result
        }
        None => {
            let session = Session::new(runner, config.connection).with_fields(fields);
            tui::run(session).await
        }
    }
}

fn prompt_password(fields: &ConnectionFields) -> Result<String> {
    rpassword::prompt_password(format!("Password for {}@{}: ", fields.user, fields.host))
        .map_err(|e| AppError::io(format!("Failed to read password: {e}")))
}
