use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;

use foxden::api_server::{self, ApiState};
use foxden::camoufox::CamoufoxEngine;
use foxden::engine::AutomationEngine;
use foxden::{app_dirs, CredentialVault, NullEngine, ProfileManager, SessionManager};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum EngineKind {
  /// Spawn a real Camoufox executable.
  Camoufox,
  /// Simulate sessions without a browser (development / CI).
  Null,
}

#[derive(Parser, Debug)]
#[command(name = "foxden", about = "Profile and session manager for Camoufox automation")]
struct Args {
  /// Port for the HTTP API (falls back to a random port on conflict).
  #[arg(long, default_value_t = 12000)]
  port: u16,

  /// Data directory override (defaults to the platform data dir).
  #[arg(long)]
  data_dir: Option<PathBuf>,

  /// Which automation engine to drive.
  #[arg(long, value_enum, default_value_t = EngineKind::Camoufox)]
  engine: EngineKind,

  /// Path to the Camoufox executable (or CAMOUFOX_EXECUTABLE).
  #[arg(long)]
  camoufox_path: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
  env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

  let args = Args::parse();

  if let Some(data_dir) = &args.data_dir {
    // app_dirs reads the override from the environment on every call.
    std::env::set_var("FOXDEN_DATA_DIR", data_dir);
  }

  // Fail fast: a registry that cannot protect proxy credentials must not
  // start and silently store them in plaintext.
  let vault = match CredentialVault::initialize(&app_dirs::vault_key_file()) {
    Ok(vault) => Arc::new(vault),
    Err(e) => {
      log::error!("Encryption initialization failed, refusing to start: {e}");
      std::process::exit(1);
    }
  };

  let engine: Arc<dyn AutomationEngine> = match args.engine {
    EngineKind::Camoufox => {
      let executable = args
        .camoufox_path
        .or_else(|| std::env::var_os("CAMOUFOX_EXECUTABLE").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("camoufox"));
      log::info!("Using Camoufox engine: {}", executable.display());
      Arc::new(CamoufoxEngine::new(executable))
    }
    EngineKind::Null => {
      log::info!("Using null engine, sessions will be simulated");
      Arc::new(NullEngine)
    }
  };

  let sessions = Arc::new(SessionManager::new(engine));
  let profiles = Arc::new(ProfileManager::new(
    app_dirs::profiles_file(),
    vault,
    sessions,
  ));

  let state = ApiState { profiles };
  if let Err(e) = api_server::serve(state, args.port).await {
    log::error!("{e}");
    std::process::exit(1);
  }
}
