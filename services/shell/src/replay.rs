use crate::infra::{parse_segment, HostNavigator};
use clap::{Args, Subcommand};
use route_gate::config::AppConfig;
use route_gate::error::AppError;
use route_gate::routing::{
    classify, decide, IdentitySignal, NavigationOutcome, OnboardingSignal, OnboardingStatus,
    Role, RouteSegment, UserId,
};
use route_gate::scenario::{replay, ReplayStep, Scenario};
use route_gate::session::SessionStore;
use route_gate::telemetry;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct ReplayArgs {
    /// Path to the JSON scenario file
    pub(crate) scenario: PathBuf,
    /// Print the replay as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct DecideArgs {
    /// Treat the identity provider as still resolving
    #[arg(long)]
    pub(crate) not_loaded: bool,
    /// The user has an active session
    #[arg(long)]
    pub(crate) signed_in: bool,
    /// Identity provider user id
    #[arg(long)]
    pub(crate) user_id: Option<String>,
    /// Role metadata (vendor or public); anything else counts as missing
    #[arg(long)]
    pub(crate) role: Option<String>,
    /// Onboarding status: unknown, pending or complete
    #[arg(long, value_parser = parse_onboarding, default_value = "unknown")]
    pub(crate) onboarding: OnboardingStatus,
    /// Segment currently displayed
    #[arg(long, value_parser = parse_segment)]
    pub(crate) segment: RouteSegment,
}

#[derive(Subcommand, Debug)]
pub(crate) enum SessionCommand {
    /// Show whether a session token is stored
    Show,
    /// Store a session token
    Set { token: String },
    /// Remove the stored session token
    Clear,
}

fn parse_onboarding(raw: &str) -> Result<OnboardingStatus, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "unknown" => Ok(OnboardingStatus::Unknown),
        "pending" => Ok(OnboardingStatus::Pending),
        "complete" | "completed" => Ok(OnboardingStatus::Complete),
        _ => Err(format!(
            "unknown onboarding status '{raw}' (expected unknown, pending or complete)"
        )),
    }
}

pub(crate) fn run_replay(args: ReplayArgs) -> Result<(), AppError> {
    let scenario = Scenario::from_path(&args.scenario)?;
    let navigator = Arc::new(HostNavigator::default());
    let steps = replay(&scenario, navigator.clone())?;

    if args.json {
        let body = serde_json::json!({
            "initial_segment": scenario.initial_segment,
            "steps": steps,
            "navigations": navigator.history(),
        });
        println!("{body:#}");
        return Ok(());
    }

    println!("Scenario replay from {}", args.scenario.display());
    println!("Initial segment: {}", scenario.initial_segment);
    for step in &steps {
        println!("{}", render_step(step));
    }

    let history = navigator.history();
    if history.is_empty() {
        println!("\nNavigations: none");
    } else {
        println!("\nNavigations");
        for record in history {
            println!("- {}", record.segment);
        }
    }

    Ok(())
}

fn render_step(step: &ReplayStep) -> String {
    let Some(report) = &step.report else {
        return format!("{:>3}. {} -> unchanged", step.index + 1, step.event);
    };

    let navigation = match report.navigation {
        NavigationOutcome::Idle => "stay".to_string(),
        NavigationOutcome::Suppressed(segment) => format!("already sent to {segment}"),
        NavigationOutcome::Issued(segment) => format!("navigate to {segment}"),
        NavigationOutcome::Failed(segment) => format!("navigation to {segment} failed"),
    };

    format!(
        "{:>3}. {} -> {} [{}; {}]",
        step.index + 1,
        step.event,
        navigation,
        report.user_state.label(),
        report.decision.reason
    )
}

pub(crate) fn run_decide(args: DecideArgs) -> Result<(), AppError> {
    let identity = IdentitySignal {
        loaded: !args.not_loaded,
        signed_in: args.signed_in,
        user_id: args.user_id.map(UserId),
        role: args.role.as_deref().and_then(Role::parse),
    };
    let onboarding = OnboardingSignal::from(args.onboarding);

    let decision = decide(&identity, &onboarding, args.segment);
    let user_state = classify(&identity, &onboarding);

    match decision.navigation_target() {
        Some(target) => println!("navigate to {target} ({})", decision.reason),
        None => println!("stay on {} ({})", args.segment, decision.reason),
    }
    println!("user state: {}", user_state.label());

    Ok(())
}

pub(crate) fn run_session(command: SessionCommand) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    let store = SessionStore::open(&config.session);

    match command {
        SessionCommand::Show => match store.load_token() {
            Some(token) => println!(
                "session stored in {} backend ({} characters)",
                store.backend_kind(),
                token.chars().count()
            ),
            None => println!("no session stored in {} backend", store.backend_kind()),
        },
        SessionCommand::Set { token } => {
            if token.is_empty() {
                println!("refusing to store an empty token; use `session clear`");
            } else {
                store.save_token(&token);
                println!("session stored in {} backend", store.backend_kind());
            }
        }
        SessionCommand::Clear => {
            store.clear_token();
            println!("session cleared from {} backend", store.backend_kind());
        }
    }

    Ok(())
}
