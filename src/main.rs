use std::path::PathBuf;
use std::process::ExitCode;

use attendance::config::Config;
use attendance::error::AppError;
use attendance::models::Course;
use attendance::preferences::Cutoff;
use attendance::projector::CourseReport;
use attendance::render;
use attendance::services::{DashboardService, WrappedService};
use attendance::state::AppState;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "attendance", about = "Attendance dashboard for Ezygo")]
struct Args {
    #[arg(long, help = "API base URL (overrides EZYGO_API_BASE_URL)")]
    base_url: Option<String>,

    #[arg(long, help = "State file holding the session and preferences")]
    state: Option<PathBuf>,

    #[arg(long, global = true, help = "Print JSON instead of text")]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sign in and remember the session
    Login {
        #[arg(short, long, env = "EZYGO_USERNAME")]
        username: String,
        #[arg(short, long, env = "EZYGO_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the stored session
    Logout,
    /// Show whether a session is stored
    Status,
    /// List enrolled courses
    Courses,
    /// Attendance for one course
    Attendance { course_id: u64 },
    /// Show the signed-in user's profile
    Profile,
    /// Attendance for every course
    Dashboard,
    /// Show or set the minimum attendance percentage (50-100)
    Cutoff { percent: Option<Cutoff> },
    /// Term recap across all semesters
    Wrapped,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "attendance=info".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            if e.is_auth_failure() {
                eprintln!("Run `attendance login` to sign in again.");
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<(), AppError> {
    let mut config = Config::new_from_env()?;
    if let Some(base_url) = args.base_url {
        config.base_url = base_url.trim().trim_end_matches('/').to_string();
    }
    if let Some(state) = args.state {
        config.state_path = state;
    }
    debug!("using state file {}", config.state_path.display());

    let state = AppState::new(config)?;
    let json = args.json;

    match args.command {
        Command::Login { username, password } => {
            let response = state.api.login(&username, &password).await;
            if !response.is_success() {
                return Err(AppError::LoginFailed(response.error_message().to_string()));
            }
            println!("Logged in as {}", username);
        }
        Command::Logout => {
            state.api.logout();
            println!("Logged out");
        }
        Command::Status => {
            let authenticated = state.api.is_authenticated();
            if json {
                print_json(&serde_json::json!({ "authenticated": authenticated }))?;
            } else if authenticated {
                println!("Logged in");
            } else {
                println!("Not logged in");
            }
        }
        Command::Courses => {
            let courses = state.api.get_courses().await?;
            if json {
                print_json(&courses)?;
            } else {
                print!("{}", render::course_list(&courses));
            }
        }
        Command::Attendance { course_id } => {
            let summary = state.api.get_course_attendance(course_id).await?;
            let course = state
                .api
                .get_courses()
                .await?
                .into_iter()
                .find(|c| c.numeric_id() == Some(course_id))
                .unwrap_or_else(|| Course {
                    id: course_id.to_string(),
                    ..Course::default()
                });
            let report = CourseReport::new(&course, &summary, state.preferences.cutoff());
            if json {
                print_json(&report)?;
            } else {
                print!("{}", render::report(&report));
            }
        }
        Command::Profile => {
            let profile = state.api.get_my_profile().await?;
            if json {
                print_json(&profile)?;
            } else {
                print!("{}", render::profile(&profile));
            }
        }
        Command::Dashboard => {
            let service = DashboardService::new(state.api.clone());
            let dashboard = service.load(state.preferences.cutoff()).await?;
            if json {
                print_json(&dashboard)?;
            } else {
                print!("{}", render::dashboard(&dashboard));
            }
        }
        Command::Cutoff { percent } => {
            if let Some(cutoff) = percent {
                state.preferences.set_cutoff(cutoff)?;
            }
            let cutoff = state.preferences.cutoff();
            if json {
                print_json(&serde_json::json!({ "cutoff": cutoff }))?;
            } else {
                println!("Cutoff: {}", cutoff);
            }
        }
        Command::Wrapped => {
            let service = WrappedService::new(state.api.clone());
            let summary = service.summarize().await?;
            if json {
                print_json(&summary)?;
            } else {
                print!("{}", render::wrapped(&summary));
            }
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
