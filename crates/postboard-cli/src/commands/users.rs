use std::future::Future;
use std::io;
use std::time::Duration;

use postboard_core::api::RemoteClient;
use postboard_core::app::AppContainer;
use postboard_core::store::UserStore;
use postboard_core::{User, UserId};
use tokio::time::MissedTickBehavior;

use crate::cli::UserCommands;
use crate::commands::common::{
    format_user_lines, normalize_field, parse_user_id, user_to_list_item, UserListItem,
};
use crate::error::CliError;

const EXTERNAL_POLL_INTERVAL: Duration = Duration::from_millis(500);

pub async fn run_users<C: RemoteClient>(
    container: &AppContainer<C>,
    command: UserCommands,
) -> Result<(), CliError> {
    let store = container.user_store().await?;

    match command {
        UserCommands::Add { name, email } => {
            let id = add_user(&store, &name, &email).await?;
            println!("{id}");
        }
        UserCommands::List { json } => {
            let users = store.list().await?;
            print_users(&users, json)?;
        }
        UserCommands::Get { id, json } => {
            let user = find_user(&store, &id).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&user_to_list_item(&user))?);
            } else {
                print_users(std::slice::from_ref(&user), false)?;
            }
        }
        UserCommands::Update { id, name, email } => {
            let rows = update_user(&store, &id, name.as_deref(), email.as_deref()).await?;
            println!("{rows}");
        }
        UserCommands::Delete { id } => {
            let rows = delete_user(&store, &id).await?;
            println!("{rows}");
        }
        UserCommands::Clear => {
            let rows = store.delete_all().await?;
            println!("{rows}");
        }
        UserCommands::Watch => run_watch(&store).await?,
    }

    Ok(())
}

pub async fn add_user(store: &UserStore, name: &str, email: &str) -> Result<UserId, CliError> {
    let user = User::new(normalize_field(name, "Name")?, normalize_field(email, "Email")?);
    Ok(store.insert(&user).await?)
}

pub async fn find_user(store: &UserStore, id: &str) -> Result<User, CliError> {
    let user_id = parse_user_id(id)?;
    store
        .get(user_id)
        .await?
        .ok_or_else(|| CliError::UserNotFound(user_id.to_string()))
}

pub async fn update_user(
    store: &UserStore,
    id: &str,
    name: Option<&str>,
    email: Option<&str>,
) -> Result<usize, CliError> {
    if name.is_none() && email.is_none() {
        return Err(CliError::NothingToUpdate);
    }

    let mut user = find_user(store, id).await?;
    if let Some(name) = name {
        user.name = normalize_field(name, "Name")?;
    }
    if let Some(email) = email {
        user.email = normalize_field(email, "Email")?;
    }
    Ok(store.update(&user).await?)
}

/// Delete by id; an unknown id affects zero rows rather than failing
pub async fn delete_user(store: &UserStore, id: &str) -> Result<usize, CliError> {
    let user_id = parse_user_id(id)?;
    match store.get(user_id).await? {
        Some(user) => Ok(store.delete(&user).await?),
        None => Ok(0),
    }
}

async fn run_watch(store: &UserStore) -> Result<(), CliError> {
    watch_users(store, EXTERNAL_POLL_INTERVAL, tokio::signal::ctrl_c(), |users| {
        println!("--- {} user(s)", users.len());
        for line in format_user_lines(users) {
            println!("{line}");
        }
    })
    .await
}

/// Feed every snapshot of the user table to `emit` until `shutdown`
/// resolves.
///
/// Writes from other processes are picked up by polling the database every
/// `poll_every`.
pub async fn watch_users<S>(
    store: &UserStore,
    poll_every: Duration,
    shutdown: S,
    mut emit: impl FnMut(&[User]),
) -> Result<(), CliError>
where
    S: Future<Output = io::Result<()>>,
{
    let mut feed = store.observe_all();
    let mut poll = tokio::time::interval(poll_every);
    poll.set_missed_tick_behavior(MissedTickBehavior::Delay);
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            snapshot = feed.next() => {
                let users = snapshot?;
                emit(users.as_slice());
            }
            _ = poll.tick() => {
                store.poll_external_changes().await?;
            }
            result = &mut shutdown => {
                result?;
                break;
            }
        }
    }

    Ok(())
}

fn print_users(users: &[User], as_json: bool) -> Result<(), CliError> {
    if as_json {
        let items = users
            .iter()
            .map(user_to_list_item)
            .collect::<Vec<UserListItem>>();
        println!("{}", serde_json::to_string_pretty(&items)?);
    } else if users.is_empty() {
        println!("No users");
    } else {
        for line in format_user_lines(users) {
            println!("{line}");
        }
    }
    Ok(())
}
