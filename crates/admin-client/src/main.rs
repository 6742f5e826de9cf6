//! `users-admin`: manage users through the users API from a terminal.

use std::io;
use std::sync::Arc;

use admin_client::render::render_grid;
use admin_client::{HttpUsersApi, User, UserDraft, UserListState, UserPatch, UsersApi};
use clap::{Parser, Subcommand};
use reqwest::Url;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

/// `users-admin` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "users-admin",
    about = "List, create, update, and delete users through the users API",
    version
)]
struct CliArgs {
    /// Base URL of the users API.
    #[arg(
        long = "api-url",
        env = "USERS_API_URL",
        value_name = "url",
        default_value = "http://localhost:3000"
    )]
    api_url: Url,
    /// Bearer token from `users-admin login`.
    #[arg(long, env = "USERS_API_TOKEN", value_name = "token", hide_env_values = true)]
    token: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Print a bearer token for the given credentials.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Show every user.
    List,
    /// Show one user.
    Get { id: Uuid },
    /// Register a user.
    Create {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Change a user's email and/or password.
    Update {
        id: Uuid,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        password: Option<String>,
    },
    /// Delete a user and show the remaining list.
    Delete { id: Uuid },
}

#[tokio::main]
async fn main() -> io::Result<()> {
    // Logs go to stderr so stdout stays pipeable (e.g. `login` tokens).
    if let Err(error) = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .try_init()
    {
        eprintln!("tracing init failed: {error}");
    }

    let args = CliArgs::parse();
    let api = HttpUsersApi::new(args.api_url)
        .map_err(io::Error::other)?
        .with_token(args.token);
    let output = run(Arc::new(api), args.command)
        .await
        .map_err(io::Error::other)?;
    print!("{output}");
    Ok(())
}

async fn run(
    api: Arc<dyn UsersApi>,
    command: Command,
) -> Result<String, admin_client::ClientError> {
    match command {
        Command::Login { email, password } => {
            let token = api.login(&UserDraft { email, password }).await?;
            Ok(format!("{}\n", token.token))
        }
        Command::List => {
            let mut state = list_state(api);
            state.fetch_users().await?;
            Ok(render_grid(state.users(), state.is_loading()))
        }
        Command::Get { id } => Ok(render_one(&api.get_user(id).await?)),
        Command::Create { email, password } => {
            let user = api.create_user(&UserDraft { email, password }).await?;
            Ok(render_one(&user))
        }
        Command::Update {
            id,
            email,
            password,
        } => {
            let user = api.update_user(id, &UserPatch { email, password }).await?;
            Ok(render_one(&user))
        }
        Command::Delete { id } => {
            let mut state = list_state(api);
            state.remove(id).await?;
            Ok(render_grid(state.users(), state.is_loading()))
        }
    }
}

/// List state that reports in-flight requests on stderr.
fn list_state(api: Arc<dyn UsersApi>) -> UserListState {
    UserListState::new(api).with_observer(|users, is_loading| {
        if is_loading {
            eprint!("{}", render_grid(users, is_loading));
        }
    })
}

fn render_one(user: &User) -> String {
    render_grid(std::slice::from_ref(user), false)
}
