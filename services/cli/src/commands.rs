use chrono::{Local, NaiveDate};
use coach_tracker::coaching::{
    filter_assessments, join_assessments, search_athletes, AssessmentDraft, AssessmentFilter,
    AssessmentId, AthleteDraft, AthleteId, CoachingRepository, CoachingService,
    CoachingServiceError, CompetitionDraft, CompetitionId, DevelopmentPlan, MetricsDraft,
};
use coach_tracker::error::AppError;
use serde::Serialize;

use crate::cli::{
    AssessmentCommand, AssessmentRecordArgs, AthleteCommand, CompetitionAddArgs,
    CompetitionCommand, DashboardArgs, PerformanceArgs, ResetArgs,
};
use crate::render;

/// Prints `value` as JSON, or the text rendering otherwise.
fn emit<T, F>(json: bool, value: &T, text: F) -> Result<(), AppError>
where
    T: Serialize + ?Sized,
    F: FnOnce() -> String,
{
    if json {
        println!("{}", render::json(value)?);
    } else {
        println!("{}", text());
    }
    Ok(())
}

fn today_or(date: Option<NaiveDate>) -> NaiveDate {
    date.unwrap_or_else(|| Local::now().date_naive())
}

pub(crate) fn athlete<R>(
    service: &CoachingService<R>,
    command: AthleteCommand,
    json: bool,
) -> Result<(), AppError>
where
    R: CoachingRepository + 'static,
{
    match command {
        AthleteCommand::Add(args) => {
            let athlete = service.register_athlete(AthleteDraft {
                name: args.name,
                sport: args.sport,
                position: args.position,
                age_grade: args.age_grade,
                season: args.season,
                goals: args.goals,
                profile_image: None,
            })?;
            emit(json, &athlete, || {
                format!("Registered {}", render::athlete_line(&athlete))
            })
        }
        AthleteCommand::List { search } => {
            let athletes = service.repository().list_athletes()?;
            let matches = search_athletes(&athletes, search.as_deref().unwrap_or_default());
            emit(json, &matches, || render::athletes(&matches))
        }
        AthleteCommand::Delete { id } => {
            let id = AthleteId(id);
            let summary = service.delete_athlete(&id)?;
            emit(json, &summary, || render::cascade(&format!("athlete {id}"), &summary))
        }
    }
}

pub(crate) fn assessment<R>(
    service: &CoachingService<R>,
    command: AssessmentCommand,
    json: bool,
) -> Result<(), AppError>
where
    R: CoachingRepository + 'static,
{
    match command {
        AssessmentCommand::Record(args) => {
            let assessment = service.record_assessment(assessment_draft(args))?;
            emit(json, &assessment, || render::recorded_assessment(&assessment))
        }
        AssessmentCommand::List { athlete, search } => {
            let repository = service.repository();
            let athletes = repository.list_athletes()?;
            let mut assessments = repository.list_assessments()?;
            assessments.sort_by(|a, b| b.date.cmp(&a.date));

            let filter = AssessmentFilter {
                search: search.unwrap_or_default(),
                athlete: athlete.map(AthleteId),
            };
            let rows = filter_assessments(join_assessments(&athletes, &assessments), &filter);
            emit(json, &rows, || render::assessment_rows(&rows))
        }
        AssessmentCommand::Delete { id } => {
            let id = AssessmentId(id);
            service.delete_assessment(&id)?;
            emit(json, &id, || format!("Deleted assessment {id}"))
        }
    }
}

fn assessment_draft(args: AssessmentRecordArgs) -> AssessmentDraft {
    AssessmentDraft {
        athlete_id: AthleteId(args.athlete),
        date: today_or(args.date),
        metrics: MetricsDraft {
            technical_skills: args.technical,
            tactical_awareness: args.tactical,
            physical_fitness: args.physical,
            mental_fortitude: args.mental,
            teamwork: args.teamwork,
            coachability: args.coachability,
        },
        development_plan: DevelopmentPlan {
            strengths: args.strengths,
            areas_for_improvement: args.areas_for_improvement,
            short_term_goals: args.short_term_goals,
            medium_term_goals: args.medium_term_goals,
            long_term_goals: args.long_term_goals,
            recommended_drills: args.drills,
        },
        notes: args.notes,
        technical_skills: Vec::new(),
        self_assessment: None,
    }
}

pub(crate) fn performance<R>(
    service: &CoachingService<R>,
    args: PerformanceArgs,
    json: bool,
) -> Result<(), AppError>
where
    R: CoachingRepository + 'static,
{
    let overview = service.performance_overview(&AthleteId(args.athlete))?;
    emit(json, &overview, || render::overview(&overview))
}

pub(crate) fn competition<R>(
    service: &CoachingService<R>,
    command: CompetitionCommand,
    json: bool,
) -> Result<(), AppError>
where
    R: CoachingRepository + 'static,
{
    match command {
        CompetitionCommand::Add(args) => {
            let competition = service.record_competition(competition_draft(args))?;
            emit(json, &competition, || {
                format!("Logged {}", render::competition_line(&competition))
            })
        }
        CompetitionCommand::List { athlete } => {
            let repository = service.repository();
            let mut competitions = match athlete {
                Some(id) => repository.get_competitions_for_athlete(&AthleteId(id))?,
                None => repository.list_competitions()?,
            };
            competitions.sort_by(|a, b| b.date.cmp(&a.date));
            emit(json, &competitions, || render::competitions(&competitions))
        }
        CompetitionCommand::Delete { id } => {
            let id = CompetitionId(id);
            service.delete_competition(&id)?;
            emit(json, &id, || format!("Deleted competition {id}"))
        }
    }
}

fn competition_draft(args: CompetitionAddArgs) -> CompetitionDraft {
    CompetitionDraft {
        athlete_id: AthleteId(args.athlete),
        date: today_or(args.date),
        opponent: args.opponent,
        result: args.result,
        playing_time: args.playing_time,
        pre_competition_goals: args.goals,
        key_statistics: args.statistics,
        highlight_moments: args.highlights,
        challenge_areas: args.challenges,
        mental_readiness: args.mental_readiness,
        execution_of_game_plan: args.execution,
        adaptability: args.adaptability,
        additional_observations: args.observations,
    }
}

pub(crate) fn dashboard<R>(
    service: &CoachingService<R>,
    args: DashboardArgs,
    json: bool,
) -> Result<(), AppError>
where
    R: CoachingRepository + 'static,
{
    let summary = service.dashboard(args.limit)?;
    emit(json, &summary, || render::dashboard(&summary))
}

pub(crate) fn reset<R>(
    service: &CoachingService<R>,
    args: ResetArgs,
    json: bool,
) -> Result<(), AppError>
where
    R: CoachingRepository + 'static,
{
    if !args.yes {
        return Err(CoachingServiceError::MissingField("--yes confirmation").into());
    }
    let summary = service.reset()?;
    emit(json, &summary, || render::reset(&summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::FileRepository;
    use coach_tracker::coaching::{
        FileStore, KeyValueRepository, KeyValueStore, ThresholdTrendPolicy, TrendPolicyConfig,
    };
    use std::sync::Arc;

    fn service(dir: &std::path::Path) -> CoachingService<FileRepository> {
        let store = FileStore::open(dir).expect("store opens");
        CoachingService::new(
            Arc::new(KeyValueRepository::new(store)),
            Arc::new(ThresholdTrendPolicy::new(TrendPolicyConfig::default())),
        )
    }

    fn record_args(athlete: &str, ratings: [Option<i64>; 6]) -> AssessmentRecordArgs {
        AssessmentRecordArgs {
            athlete: athlete.to_string(),
            date: NaiveDate::from_ymd_opt(2025, 6, 1),
            technical: ratings[0],
            tactical: ratings[1],
            physical: ratings[2],
            mental: ratings[3],
            teamwork: ratings[4],
            coachability: ratings[5],
            strengths: Vec::new(),
            areas_for_improvement: vec!["Decision making".to_string()],
            short_term_goals: Vec::new(),
            medium_term_goals: Vec::new(),
            long_term_goals: Vec::new(),
            drills: Vec::new(),
            notes: String::new(),
        }
    }

    #[test]
    fn assessment_args_map_onto_the_draft() {
        let ratings = [Some(5), Some(4), None, Some(4), Some(5), Some(3)];
        let draft = assessment_draft(record_args("a-1", ratings));
        assert_eq!(draft.athlete_id, AthleteId("a-1".to_string()));
        assert_eq!(draft.metrics.physical_fitness, None);
        assert_eq!(draft.development_plan.key_focus(), "Decision making");
    }

    #[test]
    fn incomplete_ratings_exit_with_input_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let service = service(dir.path());
        let athlete = service
            .register_athlete(AthleteDraft {
                name: "Sione Fa".to_string(),
                ..AthleteDraft::default()
            })
            .expect("registers");

        let command = AssessmentCommand::Record(record_args(
            &athlete.id.0,
            [Some(5), Some(4), None, Some(4), Some(5), Some(3)],
        ));
        let err = assessment(&service, command, true).expect_err("missing physical rating");
        assert_eq!(err.exit_code(), 2);
        assert!(service.repository().list_assessments().expect("list").is_empty());
    }

    #[test]
    fn unknown_athlete_exits_with_lookup_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let service = service(dir.path());
        let args = PerformanceArgs {
            athlete: "missing".to_string(),
        };
        let err = performance(&service, args, false).expect_err("athlete does not exist");
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn recorded_assessment_is_listed_and_deleted() {
        let dir = tempfile::tempdir().expect("tempdir");
        let service = service(dir.path());
        let athlete = service
            .register_athlete(AthleteDraft {
                name: "Sione Fa".to_string(),
                ..AthleteDraft::default()
            })
            .expect("registers");

        let command = AssessmentCommand::Record(record_args(&athlete.id.0, [Some(4); 6]));
        assessment(&service, command, false).expect("records");

        let stored = service.repository().list_assessments().expect("list");
        assert_eq!(stored.len(), 1);

        let delete = AssessmentCommand::Delete {
            id: stored[0].id.0.clone(),
        };
        assessment(&service, delete, false).expect("deletes");
        assert!(service.repository().list_assessments().expect("list").is_empty());
    }

    #[test]
    fn reset_clears_the_data_directory_only_when_confirmed() {
        let dir = tempfile::tempdir().expect("tempdir");
        let service = service(dir.path());
        let athlete = service
            .register_athlete(AthleteDraft {
                name: "Sione Fa".to_string(),
                ..AthleteDraft::default()
            })
            .expect("registers");
        let command = AssessmentCommand::Record(record_args(&athlete.id.0, [Some(4); 6]));
        assessment(&service, command, false).expect("records");

        let err = reset(&service, ResetArgs { yes: false }, false).expect_err("unconfirmed");
        assert_eq!(err.exit_code(), 2);
        assert_eq!(service.repository().list_athletes().expect("list").len(), 1);

        reset(&service, ResetArgs { yes: true }, true).expect("resets");
        let reopened = FileStore::open(dir.path()).expect("reopen");
        assert_eq!(reopened.get("athletes").expect("get").as_deref(), Some("[]"));
        assert_eq!(reopened.get("assessments").expect("get").as_deref(), Some("[]"));
    }
}
