use anyhow::Context;
use clap::{Parser, Subcommand};
use dialoguer::{Input, Select};
use dotenvy::dotenv;
use schoolyard_auth::create_access_token;
use schoolyard_cli::admin;
use schoolyard_cli::seeder::{self, SeedConfig};
use schoolyard_config::JwtConfig;
use schoolyard_db::init_db_pool;
use schoolyard_models::UserRole;
use sqlx::PgPool;

#[derive(Parser)]
#[command(name = "schoolyard-cli")]
#[command(about = "Schoolyard CLI - Administrative tools for Schoolyard", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account (prompts for anything not given)
    CreateUser {
        #[arg(short = 'f', long)]
        first_name: Option<String>,

        #[arg(short = 'l', long)]
        last_name: Option<String>,

        #[arg(short = 'e', long)]
        email: Option<String>,

        /// admin, teacher, student or parent
        #[arg(short = 'r', long)]
        role: Option<UserRole>,
    },
    /// Print a bearer token for an existing account
    IssueToken {
        #[arg(short = 'e', long)]
        email: Option<String>,
    },
    /// Create an academic year with the default three terms
    CreateAcademicYear {
        /// Year label, e.g. 2025-2026
        label: String,

        /// Make it the current year
        #[arg(long)]
        current: bool,
    },
    /// Seed the database with fake staff and students
    Seed {
        #[arg(short = 's', long, default_value = "120")]
        students: usize,

        #[arg(long, default_value = "1")]
        admins: usize,

        #[arg(long, default_value = "4")]
        teachers: usize,

        /// Comma-separated grades students are spread over
        #[arg(long, value_delimiter = ',', default_value = "grade1,grade2,grade3,grade4,grade5,grade6")]
        grades: Vec<String>,

        /// Comma-separated sections within each grade
        #[arg(long, value_delimiter = ',', default_value = "a,b")]
        sections: Vec<String>,
    },
    /// Delete seeded accounts
    ClearSeed,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let cli = Cli::parse();
    let pool = init_db_pool().await?;

    match cli.command {
        Commands::CreateUser {
            first_name,
            last_name,
            email,
            role,
        } => handle_create_user(&pool, first_name, last_name, email, role).await,
        Commands::IssueToken { email } => handle_issue_token(&pool, email).await,
        Commands::CreateAcademicYear { label, current } => {
            let year_id = admin::create_academic_year(&pool, &label, current).await?;
            println!("✅ Academic year {} created ({})", label, year_id);
            Ok(())
        }
        Commands::Seed {
            students,
            admins,
            teachers,
            grades,
            sections,
        } => {
            let config = SeedConfig::new(students)
                .with_staff(admins, teachers)
                .with_groups(grades, sections);
            seeder::seed_all(&pool, config).await
        }
        Commands::ClearSeed => seeder::clear_users(&pool).await.map(|_| ()),
    }
}

fn prompt(value: Option<String>, label: &str) -> anyhow::Result<String> {
    match value {
        Some(value) => Ok(value),
        None => Input::new()
            .with_prompt(label)
            .interact_text()
            .with_context(|| format!("Failed to read {}", label.to_lowercase())),
    }
}

async fn handle_create_user(
    pool: &PgPool,
    first_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
    role: Option<UserRole>,
) -> anyhow::Result<()> {
    let first_name = prompt(first_name, "First name")?;
    let last_name = prompt(last_name, "Last name")?;
    let email = prompt(email, "Email address")?;
    let role = match role {
        Some(role) => role,
        None => {
            let roles = [
                UserRole::Admin,
                UserRole::Teacher,
                UserRole::Student,
                UserRole::Parent,
            ];
            let choice = Select::new()
                .with_prompt("Role")
                .items(&roles.map(|r| r.as_str()))
                .default(1)
                .interact()
                .context("Failed to read role")?;
            roles[choice]
        }
    };

    let user_id = admin::create_user(pool, &first_name, &last_name, &email, role).await?;

    println!("\n✅ User created successfully!");
    println!("   ID: {}", user_id);
    println!("   Email: {}", email);
    println!("   Role: {}", role);
    Ok(())
}

async fn handle_issue_token(pool: &PgPool, email: Option<String>) -> anyhow::Result<()> {
    let email = prompt(email, "Email address")?;
    let (user_id, role) = admin::find_user_by_email(pool, &email).await?;

    let token = create_access_token(user_id, &email, role, &JwtConfig::from_env())
        .map_err(|e| e.error)?;

    println!("{}", token);
    Ok(())
}
