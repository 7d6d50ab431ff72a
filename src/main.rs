//! Russian Town command-line client.
//!
//! Usage: `town <command> [args]`
//!
//! Commands: `whoami`, `login <user> <password>`, `register <user> <password>`,
//! `logout`, `profile [user-id]`, `set-profile <custom-status> [avatar-url]`,
//! `factions`, `posts [category]`, `post <title> <content> [category]`,
//! `like <post-id>`, `roster [code]`, `ban|mute <user-id> [code]`,
//! `set-status <user-id> <status> [code]`, `assign-faction <user-id> <faction-id> [code]`,
//! `roles [code]`, `create-role <name> [code]`, `assign-role <user-id> <role-id> [code]`.

use std::fmt;
use std::process::ExitCode;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use russian_town_client::console::RosterOutcome;
use russian_town_client::models::{CreateRoleRequest, FactionType};
use russian_town_client::{ClientError, Config, TownClient};

/// Why a command did not complete.
#[derive(Debug)]
enum CommandError {
    Usage(String),
    Client(ClientError),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::Usage(msg) => write!(f, "{}", msg),
            CommandError::Client(e) => write!(f, "{}", e.user_message()),
        }
    }
}

impl From<ClientError> for CommandError {
    fn from(err: ClientError) -> Self {
        CommandError::Client(err)
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env();

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::debug!("Storage path: {:?}", config.storage_path);

    let client = TownClient::connect(config).await?;
    let args: Vec<String> = std::env::args().skip(1).collect();
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    match run(&client, &args).await {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            eprintln!("{}", e);
            if let CommandError::Client(err) = &e {
                tracing::debug!("Command failed: {}", err);
            }
            Ok(match e {
                CommandError::Usage(_) => ExitCode::from(2),
                CommandError::Client(_) => ExitCode::FAILURE,
            })
        }
    }
}

fn parse_id(value: &str, what: &str) -> Result<i64, CommandError> {
    value
        .parse()
        .map_err(|_| CommandError::Usage(format!("invalid {}: {}", what, value)))
}

async fn run(client: &TownClient, args: &[&str]) -> Result<(), CommandError> {
    match args {
        [] | ["whoami"] => {
            match client.session.session() {
                Some(s) => {
                    println!("{} ({}) rank {}", s.username, s.display_status(), s.display_rank());
                    println!("access: {}", client.capability().label());
                    if let Some(role) = &s.admin_role {
                        println!("admin role: {}", role);
                    }
                    if let Some(faction) = &s.faction_name {
                        println!("faction: {}", faction);
                    }
                }
                None => println!("not logged in"),
            }
        }
        ["login", username, password] => {
            let session = client.login(username, password).await?;
            println!("Добро пожаловать, {}!", session.username);
        }
        ["register", username, password] => {
            let session = client.register(username, password).await?;
            println!("Добро пожаловать, {}!", session.username);
        }
        ["logout"] => {
            client.logout().await?;
            println!("Вы вышли из аккаунта");
        }
        ["profile", rest @ ..] => {
            let user_id = match rest {
                [id] => parse_id(id, "user id")?,
                _ => client.session.session().ok_or(ClientError::NoSession)?.id,
            };
            let profile = client.profile(user_id).await?;
            let user = &profile.user;
            println!("{} rank {} ({} exp)", user.username, user.rank_level.unwrap_or(1), user.experience);
            if let Some(status) = user.custom_status.as_ref().or(user.status.as_ref()) {
                println!("status: {}", status);
            }
            if let Some(faction) = &user.faction_name {
                println!("faction: {}", faction);
            }
            for role in &profile.roles {
                println!("role: {}", role.name);
            }
        }
        ["set-profile", custom_status, rest @ ..] => {
            let session = client.update_profile(Some(*custom_status), rest.first().copied()).await?;
            println!("Профиль обновлён: {}", session.custom_status.unwrap_or_default());
        }
        ["factions"] => {
            client.directory.load_factions().await?;
            for faction_type in FactionType::ALL {
                println!("[{}]", faction_type.as_str());
                for faction in client.directory.factions_of(faction_type) {
                    match &faction.general_name {
                        Some(general) => println!("  {} (генерал: {})", faction.name, general),
                        None => println!("  {}", faction.name),
                    }
                }
            }
        }
        ["posts", rest @ ..] => {
            client.directory.load_forum_posts().await?;
            let posts = match rest {
                [category] => client.directory.posts_in_category(category),
                _ => client.directory.posts().items.clone(),
            };
            for post in posts {
                println!(
                    "#{} [{}] {} by {} ({} likes)",
                    post.id, post.category, post.title, post.author_username, post.like_count
                );
            }
        }
        ["post", title, content, rest @ ..] => {
            client.forum.create_post(title, content, rest.first().copied()).await?;
            println!("Пост создан!");
        }
        ["like", post_id] => {
            client.forum.like_post(parse_id(post_id, "post id")?).await?;
        }
        ["roster", rest @ ..] => {
            client.console.open()?;
            let outcome = client.console.load_roster(rest.first().copied()).await?;
            print_roster(client, outcome);
        }
        [action @ ("ban" | "mute"), user_id, rest @ ..] => {
            let user_id = parse_id(user_id, "user id")?;
            let code = rest.first().copied();
            client.console.open()?;
            let outcome = if *action == "ban" {
                client.console.ban_user(user_id, code).await?
            } else {
                client.console.mute_user(user_id, code).await?
            };
            print_roster(client, outcome);
        }
        ["set-status", user_id, status, rest @ ..] => {
            let user_id = parse_id(user_id, "user id")?;
            client.console.open()?;
            let outcome = client
                .console
                .update_status(user_id, status, rest.first().copied())
                .await?;
            print_roster(client, outcome);
        }
        ["assign-faction", user_id, faction_id, rest @ ..] => {
            let user_id = parse_id(user_id, "user id")?;
            let faction_id = parse_id(faction_id, "faction id")?;
            client.console.open()?;
            let outcome = client
                .console
                .assign_faction(user_id, faction_id, rest.first().copied())
                .await?;
            print_roster(client, outcome);
        }
        ["assign-role", user_id, role_id, rest @ ..] => {
            let user_id = parse_id(user_id, "user id")?;
            let role_id = parse_id(role_id, "role id")?;
            client.console.open()?;
            let outcome = client
                .console
                .assign_role(user_id, role_id, rest.first().copied())
                .await?;
            print_roster(client, outcome);
        }
        ["roles", rest @ ..] => {
            client.console.open()?;
            match client.console.list_roles(rest.first().copied()).await? {
                Some(roles) => {
                    for role in roles {
                        let kind = if role.is_custom { "custom" } else { "built-in" };
                        println!("#{} {} ({})", role.id, role.name, kind);
                    }
                }
                None => println!("roles not loaded"),
            }
        }
        ["create-role", name, rest @ ..] => {
            client.console.open()?;
            let request = CreateRoleRequest::new(*name);
            match client.console.create_role(&request, rest.first().copied()).await? {
                Some(role) => println!("Роль создана: #{} {}", role.id, role.name),
                None => println!("role not created"),
            }
        }
        _ => {
            return Err(CommandError::Usage(format!(
                "unknown command: {}",
                args.join(" ")
            )))
        }
    }
    Ok(())
}

fn print_roster(client: &TownClient, outcome: RosterOutcome) {
    match outcome {
        RosterOutcome::Loaded(count) => {
            println!("Все пользователи ({})", count);
            for entry in client.console.roster().iter().flat_map(|r| r.iter()) {
                println!("  {} [{}] {}", entry.username, entry.badge().label(), entry.summary());
            }
        }
        RosterOutcome::Skipped => println!("roster not loaded"),
    }
}
