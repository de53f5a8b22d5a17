use clap::{Parser, Subcommand};
use onlineschool::Config;
use onlineschool::auth::hash_password;
use onlineschool::model::entity::{
    Account, AccountCreate, Course, CourseCreate, Grade, GradeUpdate, ProfileCreate, Student,
};
use onlineschool::model::{DatabaseError, DbConnection, ModelManager};
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(about = "CLI tool for filling the online school DB", long_about = None)]
pub struct Cli {
    /// Database URI, defaults to the one in config.toml
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage courses
    Course {
        #[command(subcommand)]
        action: CourseCommands,
    },

    /// Manage accounts
    Account {
        #[command(subcommand)]
        action: AccountCommands,
    },

    /// Manage students
    Student {
        #[command(subcommand)]
        action: StudentCommands,
    },

    /// Manage grades
    Grade {
        #[command(subcommand)]
        action: GradeCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum CourseCommands {
    Add {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum AccountCommands {
    Add {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
        #[arg(long, default_value = "")]
        first_name: String,
        #[arg(long, default_value = "")]
        last_name: String,
        #[arg(long, default_value = "")]
        email: String,
        /// student, teacher or mentor; without it the account has no profile
        #[arg(long)]
        role: Option<String>,
        /// Course title for students and teachers
        #[arg(long)]
        course_title: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum StudentCommands {
    /// Moves a student into a course
    Enroll {
        #[arg(long)]
        username: String,
        #[arg(long)]
        course_title: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum GradeCommands {
    Add {
        #[arg(long)]
        username: String,
        #[arg(long)]
        course_title: String,
        #[arg(long, default_value_t = 0)]
        homework1: i32,
        #[arg(long, default_value_t = 0)]
        homework2: i32,
        #[arg(long, default_value_t = 0)]
        project: i32,
        #[arg(long, default_value_t = 0)]
        final_mark: i32,
    },
}

async fn course_id(mm: &ModelManager, title: &str) -> Result<Uuid, DatabaseError> {
    let id = sqlx::query_scalar("SELECT id FROM courses WHERE title = $1")
        .bind(title)
        .fetch_one(mm.executor())
        .await?;
    Ok(id)
}

async fn student_id(mm: &ModelManager, username: &str) -> Result<Uuid, DatabaseError> {
    let id = sqlx::query_scalar(
        "SELECT s.id FROM students s JOIN users u ON u.id = s.user_id WHERE u.username = $1",
    )
    .bind(username)
    .fetch_one(mm.executor())
    .await?;
    Ok(id)
}

#[tokio::main]
async fn main() -> onlineschool::error::AppResult<()> {
    let _ = dotenvy::dotenv();
    let args = Cli::parse();

    let database_url = match args.database_url {
        Some(url) => url,
        None => Config::get_or_init(cfg!(debug_assertions))
            .await
            .app()
            .database_uri()
            .to_string(),
    };
    let mm = ModelManager::new(DbConnection::connect(&database_url)?);

    match args.command {
        Commands::Course { action } => match action {
            CourseCommands::Add { title, description } => {
                let course = Course::create(&mm, CourseCreate { title, description }).await?;
                println!("Course created: {:?}", course);
            }
        },

        Commands::Account { action } => match action {
            AccountCommands::Add {
                username,
                password,
                first_name,
                last_name,
                email,
                role,
                course_title,
            } => {
                let data = AccountCreate {
                    username,
                    password_hash: hash_password(&password)?,
                    first_name,
                    last_name,
                    email,
                };

                let course_id = match course_title {
                    Some(title) => Some(course_id(&mm, &title).await?),
                    None => None,
                };
                let profile = match role.as_deref() {
                    Some("student") => Some(ProfileCreate::Student { course_id }),
                    Some("teacher") => Some(ProfileCreate::Teacher {
                        course_id,
                        bio: String::new(),
                    }),
                    Some("mentor") => Some(ProfileCreate::Mentor {
                        about: String::new(),
                    }),
                    Some(other) => {
                        eprintln!("Unknown role `{other}`, expected student, teacher or mentor");
                        std::process::exit(2);
                    }
                    None => None,
                };

                let account = match profile {
                    Some(profile) => Account::create_with_profile(&mm, data, profile).await?,
                    None => Account::create(&mm, data).await?,
                };
                println!("Account created: {:?}", account);
            }
        },

        Commands::Student { action } => match action {
            StudentCommands::Enroll {
                username,
                course_title,
            } => {
                let student = student_id(&mm, &username).await?;
                let course = course_id(&mm, &course_title).await?;
                Student::enroll(&mm, student, Some(course)).await?;
                println!("Student {username} enrolled into {course_title}");
            }
        },

        Commands::Grade { action } => match action {
            GradeCommands::Add {
                username,
                course_title,
                homework1,
                homework2,
                project,
                final_mark,
            } => {
                let grade = Grade::create(
                    &mm,
                    GradeUpdate {
                        course_id: course_id(&mm, &course_title).await?,
                        student_id: student_id(&mm, &username).await?,
                        homework1,
                        homework2,
                        project,
                        final_mark,
                    },
                )
                .await?;
                println!("Grade created: {:?}", grade);
            }
        },
    }

    Ok(())
}
