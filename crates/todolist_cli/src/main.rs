//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a small executable to verify `todolist_core` linkage.
//! - Exercise validation and the remote API without the Flutter shell.

use anyhow::{bail, Context, Result};
use clap::Parser;
use todolist_core::{validate, ClientConfig, GraphQlClient, TodoApp};

#[derive(Parser)]
#[command(name = "todolist")]
#[command(version)]
#[command(about = "Todolist core smoke tool")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// GraphQL endpoint (default: TODOLIST_API_URL or localhost)
    #[arg(long, global = true)]
    api_url: Option<String>,
}

/// Credentials for commands that talk to the API.
#[derive(clap::Args, Debug, Clone)]
struct Credentials {
    #[arg(short, long)]
    username: String,

    #[arg(short, long)]
    password: String,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Prints ping and core version
    Ping,
    /// Validates credentials locally
    Validate {
        username: String,
        password: String,
    },
    /// Signs in and prints the user's lists
    Lists {
        #[command(flatten)]
        credentials: Credentials,
    },
    /// Signs in and prints the tasks of one list
    Todos {
        #[command(flatten)]
        credentials: Credentials,

        #[arg(value_name = "LIST_ID")]
        list_id: String,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    match cli.command.unwrap_or(Commands::Ping) {
        Commands::Ping => {
            println!("todolist_core ping={}", todolist_core::ping());
            println!("todolist_core version={}", todolist_core::core_version());
            Ok(())
        }
        Commands::Validate { username, password } => {
            let errors = validate(&username, &password);
            if errors.is_valid() {
                println!("valid");
                return Ok(());
            }
            bail!(
                "username: {} | password: {}",
                errors.username_error,
                errors.password_error
            )
        }
        Commands::Lists { credentials } => {
            build_runtime()?.block_on(print_lists(cli.api_url.as_deref(), &credentials))
        }
        Commands::Todos {
            credentials,
            list_id,
        } => build_runtime()?.block_on(print_todos(
            cli.api_url.as_deref(),
            &credentials,
            &list_id,
        )),
    }
}

async fn print_lists(api_url: Option<&str>, credentials: &Credentials) -> Result<()> {
    let mut app = signed_in_app(api_url, credentials).await?;
    for list in app.load_lists().await.context("failed to load lists")? {
        println!("{}\t{}", list.id, list.title);
    }
    Ok(())
}

async fn print_todos(
    api_url: Option<&str>,
    credentials: &Credentials,
    list_id: &str,
) -> Result<()> {
    let mut app = signed_in_app(api_url, credentials).await?;
    app.load_lists().await.context("failed to load lists")?;
    if app.toggle_list(list_id).await?.is_none() {
        bail!("list `{list_id}` not found");
    }
    for todo in app.tasks().todos() {
        let mark = if todo.done { "x" } else { " " };
        println!("[{mark}] {}\t{}", todo.id, todo.content);
    }
    println!("progress={:.0}%", app.tasks().progress());
    Ok(())
}

fn build_runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")
}

async fn signed_in_app(
    api_url: Option<&str>,
    credentials: &Credentials,
) -> Result<TodoApp<GraphQlClient>> {
    let config = match api_url {
        Some(url) => ClientConfig::new(url)?,
        None => ClientConfig::from_env()?,
    };
    let client = GraphQlClient::new(config)?;
    let mut app = TodoApp::new(client);
    app.sign_in(&credentials.username, &credentials.password)
        .await
        .context("sign-in failed")?;
    Ok(app)
}
