use std::fmt;

use chrono::{DateTime, Duration, Utc};
use dashboard_core::model::{
    Completion, CourseDraft, CourseId, CourseRef, CourseStatus, EmbeddedCourse, PlanTier,
    ProgressId, ProgressRecord, Student, StudentId, UserId,
};
use storage::repository::Storage;

#[derive(Debug, Clone)]
struct Args {
    db_url: String,
    user_id: UserId,
    student_name: Option<String>,
    now: Option<DateTime<Utc>>,
}

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidUserId { raw: String },
    InvalidDbUrl { raw: String },
    InvalidNow { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidUserId { raw } => write!(f, "invalid --user value: {raw}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidNow { raw } => {
                write!(f, "invalid --now value (expected RFC3339): {raw}")
            }
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

impl Args {
    fn parse() -> Result<Self, ArgsError> {
        let mut db_url =
            std::env::var("LEARN_DB_URL").unwrap_or_else(|_| "sqlite:dev.sqlite3".into());
        let mut user_id = std::env::var("LEARN_USER_ID")
            .ok()
            .and_then(|value| value.parse::<UserId>().ok())
            .unwrap_or_else(|| UserId::new("demo-user"));
        let mut student_name = std::env::var("LEARN_STUDENT_NAME").ok();
        let mut now: Option<DateTime<Utc>> = None;

        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = value;
                }
                "--user" => {
                    let value = require_value(&mut args, "--user")?;
                    user_id = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidUserId { raw: value.clone() })?;
                }
                "--student-name" => {
                    student_name = Some(require_value(&mut args, "--student-name")?);
                }
                "--now" => {
                    let value = require_value(&mut args, "--now")?;
                    let parsed = DateTime::parse_from_rfc3339(&value)
                        .map_err(|_| ArgsError::InvalidNow { raw: value.clone() })?
                        .with_timezone(&Utc);
                    now = Some(parsed);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            db_url,
            user_id,
            student_name,
            now,
        })
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p storage --bin seed -- [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --db <sqlite_url>         SQLite URL (default: sqlite:dev.sqlite3)");
    eprintln!("  --user <id>               User id owning the demo student (default: demo-user)");
    eprintln!("  --student-name <name>     Optional display name for the student");
    eprintln!("  --now <rfc3339>           Fixed current time for deterministic seeding");
    eprintln!("  -h, --help                Show this help");
    eprintln!();
    eprintln!("Environment (same as flags):");
    eprintln!("  LEARN_DB_URL, LEARN_USER_ID, LEARN_STUDENT_NAME");
}

/// (id, title, language, sub_type, tier, status, rating)
const CATALOG: [(&str, &str, &str, &str, PlanTier, CourseStatus, f32); 6] = [
    ("py-101", "Python Basics", "python", "video", PlanTier::Free, CourseStatus::Active, 4.6),
    ("js-101", "JavaScript Games", "javascript", "project", PlanTier::Free, CourseStatus::Active, 4.2),
    ("scratch", "Scratch Stories", "scratch", "interactive", PlanTier::Free, CourseStatus::Active, 4.8),
    ("py-ai", "Python and AI", "python", "project", PlanTier::Premium, CourseStatus::Active, 4.9),
    ("web-201", "Building Websites", "html", "video", PlanTier::Basic, CourseStatus::Active, 4.1),
    ("lua-old", "Lua Modding", "lua", "video", PlanTier::Free, CourseStatus::Inactive, 3.5),
];

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse().map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let storage = Storage::sqlite(&args.db_url).await?;
    let now = args.now.unwrap_or_else(Utc::now);

    for (offset, (id, title, language, sub_type, tier, status, rating)) in
        CATALOG.iter().enumerate()
    {
        let created_at = now - Duration::days(90 - i64::try_from(offset)?);
        let course = CourseDraft {
            title: Some((*title).to_owned()),
            language: Some((*language).to_owned()),
            sub_type: Some((*sub_type).to_owned()),
            description: Some(format!("Learn **{title}** step by step.")),
            rating: Some(*rating),
            status: Some(*status),
            tier: Some(*tier),
            created_at: Some(created_at),
            updated_at: Some(created_at),
            ..CourseDraft::new(CourseId::new(*id))
        }
        .fill_defaults(now)?;
        storage.courses.upsert_course(&course).await?;
    }

    let student_id = match storage.students.find_by_user(&args.user_id).await? {
        Some(student) => student.id().clone(),
        None => {
            let student = Student::new(
                StudentId::generate(),
                args.user_id.clone(),
                args.student_name.clone(),
            );
            storage.students.upsert_student(&student).await?;
            student.id().clone()
        }
    };

    let progress = [
        ("seed-p1", embedded("py-101", "Python Basics"), 80, 1),
        ("seed-p2", embedded("scratch", "Scratch Stories"), 35, 3),
        ("seed-p3", embedded("ext-robotics", "Robotics Club"), 10, 6),
        ("seed-p4", CourseRef::Id(CourseId::new("js-101")), 55, 2),
        ("seed-p5", CourseRef::Missing, 20, 9),
    ];
    for (id, course, pct, days_ago) in progress {
        let record = ProgressRecord::new(
            ProgressId::new(id),
            course,
            Completion::new(pct)?,
            Some(now - Duration::days(days_ago)),
        );
        storage.progress.upsert_progress(&student_id, &record).await?;
    }

    println!(
        "Seeded {} courses and student {} (user {}) into {}",
        CATALOG.len(),
        student_id,
        args.user_id,
        args.db_url
    );

    Ok(())
}

fn embedded(id: &str, title: &str) -> CourseRef {
    CourseRef::Embedded(EmbeddedCourse::titled(CourseId::new(id), title))
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
