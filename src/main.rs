use std::io::Write as _;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use registrant::app::{App, MockClientFactory};
use registrant::config::AppConfig;
use registrant::net::mock::MockRegistry;
use registrant::shell::Shell;
use registrant::state::auth::{AuthError, AuthStore};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to load session: {0}")]
    Auth(#[from] AuthError),
}

#[derive(Parser, Debug)]
#[command(name = "registrant", about = "Register and manage baskets, protocols, and certificate types")]
struct Cli {
    /// Read commands from this file instead of stdin.
    #[arg(long)]
    script: Option<PathBuf>,

    #[arg(long, env = "REGISTRANT_REGISTER_DELAY_MS")]
    register_delay_ms: Option<u64>,

    #[arg(long, env = "REGISTRANT_LIST_DELAY_MS")]
    list_delay_ms: Option<u64>,

    #[arg(long, env = "REGISTRANT_REVOKE_DELAY_MS")]
    revoke_delay_ms: Option<u64>,

    /// Persist the auth snapshot (never key material) to this file.
    #[arg(long, env = "REGISTRANT_SESSION_FILE")]
    session_file: Option<PathBuf>,
}

impl Cli {
    fn apply(&self, mut config: AppConfig) -> AppConfig {
        if let Some(ms) = self.register_delay_ms {
            config.latency.register = Duration::from_millis(ms);
        }
        if let Some(ms) = self.list_delay_ms {
            config.latency.list = Duration::from_millis(ms);
        }
        if let Some(ms) = self.revoke_delay_ms {
            config.latency.revoke = Duration::from_millis(ms);
        }
        if let Some(path) = &self.session_file {
            config.session_file = Some(path.clone());
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let config = cli.apply(AppConfig::from_env());

    let auth = match &config.session_file {
        Some(path) => AuthStore::with_snapshot_file(path)?,
        None => AuthStore::new(),
    };
    let factory = MockClientFactory { registry: MockRegistry::new(), latency: config.latency };
    let mut app = App::new(auth, Box::new(factory));
    app.sync().await;
    let mut shell = Shell::new(app);

    tracing::info!(latency = ?config.latency, "registrant starting");

    match &cli.script {
        Some(path) => {
            let file = tokio::fs::File::open(path).await?;
            run(&mut shell, BufReader::new(file), false).await
        }
        None => run(&mut shell, BufReader::new(tokio::io::stdin()), true).await,
    }
}

async fn run<R>(shell: &mut Shell, reader: R, interactive: bool) -> Result<(), CliError>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    print!("{}", shell.run_line("show").await.text);
    loop {
        if interactive {
            print!("> ");
            std::io::stdout().flush()?;
        }
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let output = shell.run_line(&line).await;
        print!("{}", output.text);
        if output.quit {
            break;
        }
    }
    Ok(())
}
