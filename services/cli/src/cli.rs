use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use coach_tracker::config::AppConfig;
use coach_tracker::error::AppError;
use coach_tracker::telemetry;

use crate::commands;
use crate::demo::{run_demo, DemoArgs};
use crate::infra::{file_service, parse_date};

#[derive(Parser, Debug)]
#[command(
    name = "coach",
    about = "Record athlete assessments, track progress and classify performance trends",
    version
)]
pub(crate) struct Cli {
    /// Directory holding the JSON collections (overrides COACH_DATA_DIR)
    #[arg(long, global = true)]
    pub(crate) data_dir: Option<PathBuf>,
    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    pub(crate) json: bool,
    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Manage the athlete roster
    Athlete {
        #[command(subcommand)]
        command: AthleteCommand,
    },
    /// Record, list and delete assessments
    Assessment {
        #[command(subcommand)]
        command: AssessmentCommand,
    },
    /// Show an athlete's score history and current trend
    Performance(PerformanceArgs),
    /// Log and review competition results
    Competition {
        #[command(subcommand)]
        command: CompetitionCommand,
    },
    /// Summary counts and the most recent assessments
    Dashboard(DashboardArgs),
    /// Delete every athlete, assessment and competition
    Reset(ResetArgs),
    /// Run a scripted season against an in-memory store
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
pub(crate) enum AthleteCommand {
    /// Register a new athlete
    Add(AthleteAddArgs),
    /// List athletes, optionally filtered by name, sport or position
    List {
        #[arg(long)]
        search: Option<String>,
    },
    /// Delete an athlete together with their assessments and competitions
    Delete { id: String },
}

#[derive(Args, Debug)]
pub(crate) struct AthleteAddArgs {
    #[arg(long)]
    pub(crate) name: String,
    #[arg(long, default_value = "")]
    pub(crate) sport: String,
    #[arg(long, default_value = "")]
    pub(crate) position: String,
    #[arg(long, default_value = "")]
    pub(crate) age_grade: String,
    #[arg(long, default_value = "")]
    pub(crate) season: String,
    #[arg(long, default_value = "")]
    pub(crate) goals: String,
}

#[derive(Subcommand, Debug)]
pub(crate) enum AssessmentCommand {
    /// Validate, score and save an assessment
    Record(AssessmentRecordArgs),
    /// List assessments with score and band
    List {
        #[arg(long)]
        athlete: Option<String>,
        /// Matches athlete name or MM/DD/YYYY date
        #[arg(long)]
        search: Option<String>,
    },
    /// Delete a single assessment
    Delete { id: String },
}

#[derive(Args, Debug)]
pub(crate) struct AssessmentRecordArgs {
    #[arg(long)]
    pub(crate) athlete: String,
    /// Assessment date (YYYY-MM-DD, defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) date: Option<NaiveDate>,
    #[arg(long, allow_negative_numbers = true)]
    pub(crate) technical: Option<i64>,
    #[arg(long, allow_negative_numbers = true)]
    pub(crate) tactical: Option<i64>,
    #[arg(long, allow_negative_numbers = true)]
    pub(crate) physical: Option<i64>,
    #[arg(long, allow_negative_numbers = true)]
    pub(crate) mental: Option<i64>,
    #[arg(long, allow_negative_numbers = true)]
    pub(crate) teamwork: Option<i64>,
    #[arg(long, allow_negative_numbers = true)]
    pub(crate) coachability: Option<i64>,
    /// Strength to note (repeatable)
    #[arg(long = "strength")]
    pub(crate) strengths: Vec<String>,
    /// Area for improvement (repeatable); the first becomes the key focus
    #[arg(long = "improve")]
    pub(crate) areas_for_improvement: Vec<String>,
    #[arg(long = "short-term-goal")]
    pub(crate) short_term_goals: Vec<String>,
    #[arg(long = "medium-term-goal")]
    pub(crate) medium_term_goals: Vec<String>,
    #[arg(long = "long-term-goal")]
    pub(crate) long_term_goals: Vec<String>,
    #[arg(long = "drill")]
    pub(crate) drills: Vec<String>,
    #[arg(long, default_value = "")]
    pub(crate) notes: String,
}

#[derive(Args, Debug)]
pub(crate) struct PerformanceArgs {
    pub(crate) athlete: String,
}

#[derive(Subcommand, Debug)]
pub(crate) enum CompetitionCommand {
    /// Log a competition result
    Add(CompetitionAddArgs),
    /// List competitions, newest first
    List {
        #[arg(long)]
        athlete: Option<String>,
    },
    /// Delete a competition
    Delete { id: String },
}

#[derive(Args, Debug)]
pub(crate) struct CompetitionAddArgs {
    #[arg(long)]
    pub(crate) athlete: String,
    #[arg(long, value_parser = parse_date)]
    pub(crate) date: Option<NaiveDate>,
    #[arg(long)]
    pub(crate) opponent: String,
    #[arg(long)]
    pub(crate) result: String,
    #[arg(long, default_value = "")]
    pub(crate) playing_time: String,
    #[arg(long, allow_negative_numbers = true)]
    pub(crate) mental_readiness: i64,
    #[arg(long, allow_negative_numbers = true)]
    pub(crate) execution: i64,
    #[arg(long, allow_negative_numbers = true)]
    pub(crate) adaptability: i64,
    #[arg(long = "goal")]
    pub(crate) goals: Vec<String>,
    #[arg(long = "highlight")]
    pub(crate) highlights: Vec<String>,
    #[arg(long = "challenge")]
    pub(crate) challenges: Vec<String>,
    #[arg(long = "stat")]
    pub(crate) statistics: Vec<String>,
    #[arg(long, default_value = "")]
    pub(crate) observations: String,
}

#[derive(Args, Debug)]
pub(crate) struct DashboardArgs {
    /// Number of recent assessments to show
    #[arg(long, default_value_t = 5)]
    pub(crate) limit: usize,
}

#[derive(Args, Debug)]
pub(crate) struct ResetArgs {
    /// Confirm that all stored data should be erased
    #[arg(long, required = true)]
    pub(crate) yes: bool,
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let Cli {
        data_dir,
        json,
        command,
    } = cli;

    let service = || file_service(&config, data_dir.clone());
    match command {
        Command::Demo(args) => run_demo(&config, args, json),
        Command::Athlete { command } => commands::athlete(&service()?, command, json),
        Command::Assessment { command } => commands::assessment(&service()?, command, json),
        Command::Performance(args) => commands::performance(&service()?, args, json),
        Command::Competition { command } => commands::competition(&service()?, command, json),
        Command::Dashboard(args) => commands::dashboard(&service()?, args, json),
        Command::Reset(args) => commands::reset(&service()?, args, json),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_assessment_ratings_including_out_of_range_values() {
        let cli = Cli::try_parse_from([
            "coach",
            "assessment",
            "record",
            "--athlete",
            "a-1",
            "--date",
            "2025-04-07",
            "--technical",
            "5",
            "--coachability",
            "-1",
            "--improve",
            "First touch",
            "--improve",
            "Scanning",
        ])
        .expect("parses");

        match cli.command {
            Command::Assessment {
                command: AssessmentCommand::Record(args),
            } => {
                assert_eq!(args.technical, Some(5));
                assert_eq!(args.coachability, Some(-1));
                assert_eq!(args.tactical, None);
                assert_eq!(args.areas_for_improvement, vec!["First touch", "Scanning"]);
                assert_eq!(args.date, NaiveDate::from_ymd_opt(2025, 4, 7));
            }
            other => panic!("expected assessment record, got {other:?}"),
        }
    }

    #[test]
    fn global_flags_apply_after_the_subcommand() {
        let cli = Cli::try_parse_from(["coach", "dashboard", "--json", "--data-dir", "/tmp/coach"])
            .expect("parses");
        assert!(cli.json);
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/coach")));
        assert!(matches!(cli.command, Command::Dashboard(DashboardArgs { limit: 5 })));
    }

    #[test]
    fn reset_requires_explicit_confirmation() {
        let err = Cli::try_parse_from(["coach", "reset"]).expect_err("confirmation missing");
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);

        let cli = Cli::try_parse_from(["coach", "reset", "--yes"]).expect("parses");
        assert!(matches!(cli.command, Command::Reset(ResetArgs { yes: true })));
    }
}
