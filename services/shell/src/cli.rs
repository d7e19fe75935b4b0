use crate::replay::{run_decide, run_replay, run_session, DecideArgs, ReplayArgs, SessionCommand};
use crate::server;
use clap::{Args, Parser, Subcommand};
use route_gate::error::AppError;
use route_gate::routing::RouteSegment;

#[derive(Parser, Debug)]
#[command(
    name = "route-gate",
    about = "Host and exercise the session-aware routing gate from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP navigation host (default command)
    Serve(ServeArgs),
    /// Replay a JSON scenario of signal updates and print each decision
    Replay(ReplayArgs),
    /// Evaluate the routing rules once for the given signals
    Decide(DecideArgs),
    /// Inspect or modify the persisted session token
    Session {
        #[command(subcommand)]
        command: SessionCommand,
    },
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Segment the host displays before any signal arrives
    #[arg(long, value_parser = crate::infra::parse_segment)]
    pub(crate) initial_segment: Option<RouteSegment>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Replay(args) => run_replay(args),
        Command::Decide(args) => run_decide(args),
        Command::Session { command } => run_session(command),
    }
}
