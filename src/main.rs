use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};

use rig_client::api::ApiClient;
use rig_client::config::{Config, ConfigStore, SecureString, SessionStore, ViewConfig};
use rig_client::fallback::Fallback;
use rig_client::logging::init_tracing;
use rig_client::model::{
    Agent, Guide, ModerationKind, Prompt, ProposalDraft, Resource, Ruleset, User, UserDraft,
    UserRole,
};
use rig_client::moderation::{
    Decision, ModerationFilter, ModerationQueue, StatusFilter, TypeFilter, UserAdmin,
};
use rig_client::view::{Form, Pagination, RemoteCollectionView, ViewState};

#[derive(Parser)]
#[command(name = "rig", version, about = "Browse, submit and moderate RIG content")]
struct Cli {
    /// Config file (default: <config dir>/rig/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Override the API base URL
    #[arg(long, global = true, value_name = "URL")]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List one page of a collection
    List {
        resource: ResourceKind,
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Show one item as JSON
    Show { resource: ResourceKind, id: i64 },
    /// Log in and store the session token
    Login { email: String, password: String },
    /// Forget the stored session token
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Moderation queue
    #[command(subcommand)]
    Moderation(ModerationCommand),
    /// Submit a content proposal
    Propose(ProposeArgs),
    /// User administration
    #[command(subcommand)]
    Users(UsersCommand),
    /// Check the API health endpoint
    Health,
}

#[derive(Clone, Copy, ValueEnum)]
enum ResourceKind {
    Prompts,
    Guides,
    Rulesets,
    Agents,
    Users,
}

#[derive(Subcommand)]
enum ModerationCommand {
    /// List queue entries
    List {
        #[arg(long = "type", default_value = "all")]
        kind: TypeFilter,
        #[arg(long, default_value = "pending")]
        status: StatusFilter,
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Approve a pending item
    Approve { kind: ModerationKind, id: i64 },
    /// Reject a pending item
    Reject { kind: ModerationKind, id: i64 },
}

#[derive(Args)]
struct ProposeArgs {
    #[arg(long = "type")]
    kind: String,
    #[arg(long)]
    title: String,
    #[arg(long)]
    description: String,
    #[arg(long)]
    content: String,
    #[arg(long)]
    email: String,
    #[arg(long = "tag")]
    tags: Vec<String>,
}

#[derive(Subcommand)]
enum UsersCommand {
    /// USER -> MODERATOR -> ADMIN -> USER
    CycleRole { id: i64 },
    /// Enable or disable an account
    SetActive {
        id: i64,
        #[arg(action = clap::ArgAction::Set)]
        active: bool,
    },
    /// Create an account
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long, value_enum, default_value = "user")]
        role: RoleArg,
    },
    /// Delete an account
    Delete { id: i64 },
}

#[derive(Clone, Copy, ValueEnum)]
enum RoleArg {
    User,
    Moderator,
    Admin,
}

impl From<RoleArg> for UserRole {
    fn from(role: RoleArg) -> Self {
        match role {
            RoleArg::User => UserRole::User,
            RoleArg::Moderator => UserRole::Moderator,
            RoleArg::Admin => UserRole::Admin,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let path = cli.config.clone().unwrap_or_else(Config::config_path);
    let store = ConfigStore::open(path.clone(), cli.api_url.clone())
        .with_context(|| format!("Failed to load config from {}", path.display()))?;
    let config = store.get();

    let session = SessionStore::load(config.session.token_path())?;
    let client = ApiClient::new(&config.api, Arc::new(session.clone()))?;

    match cli.command {
        Command::List {
            resource,
            search,
            page,
        } => match resource {
            ResourceKind::Prompts => list::<Prompt>(client, &config.view, &search, page).await,
            ResourceKind::Guides => list::<Guide>(client, &config.view, &search, page).await,
            ResourceKind::Rulesets => list::<Ruleset>(client, &config.view, &search, page).await,
            ResourceKind::Agents => list::<Agent>(client, &config.view, &search, page).await,
            ResourceKind::Users => list::<User>(client, &config.view, &search, page).await,
        },
        Command::Show { resource, id } => match resource {
            ResourceKind::Prompts => show::<Prompt>(&client, id).await,
            ResourceKind::Guides => show::<Guide>(&client, id).await,
            ResourceKind::Rulesets => show::<Ruleset>(&client, id).await,
            ResourceKind::Agents => show::<Agent>(&client, id).await,
            ResourceKind::Users => show::<User>(&client, id).await,
        },
        Command::Login { email, password } => {
            let token = client.login(&email, &password).await?;
            session.set(SecureString::new(token.access_token))?;
            let me = client.me().await?;
            println!("Logged in as {} <{}> ({})", me.name, me.email, me.role.as_str());
            Ok(())
        }
        Command::Logout => {
            session.clear()?;
            println!("Logged out");
            Ok(())
        }
        Command::Whoami => {
            if !session.is_authenticated() {
                bail!("Not logged in");
            }
            let me = client.me().await?;
            println!("{} <{}> ({})", me.name, me.email, me.role.as_str());
            Ok(())
        }
        Command::Moderation(command) => moderation(client, &config.view, command).await,
        Command::Propose(args) => propose(&client, args).await,
        Command::Users(command) => users(client, command).await,
        Command::Health => {
            let health = client.health().await?;
            println!("{}", serde_json::to_string_pretty(&health)?);
            Ok(())
        }
    }
}

/// Load `page` of a collection through a view and print it.
async fn list<T: Resource + Fallback>(
    client: ApiClient,
    config: &ViewConfig,
    search: &str,
    page: u32,
) -> Result<()> {
    let view = RemoteCollectionView::<T>::for_resource(client, config);
    let state = load_page(&view, search, page).await?;
    print_rows(&state, |item| {
        format!("{}\t{}\t{}", item.id(), item.badge().unwrap_or("-"), item.title())
    });
    Ok(())
}

async fn load_page<T>(
    view: &RemoteCollectionView<T>,
    search: &str,
    page: u32,
) -> Result<ViewState<T>>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    if !search.trim().is_empty() {
        view.submit_search(search);
    }
    let mut state = view.settled().await;
    if page != state.page {
        if !view.set_page(page) {
            bail!("Page {} is out of range (1..={})", page, state.pages.max(1));
        }
        state = view.settled().await;
    }
    view.unmount();
    Ok(state)
}

fn print_rows<T>(state: &ViewState<T>, row: impl Fn(&T) -> String) {
    if let Some(error) = &state.error {
        eprintln!("warning: {} (showing bundled data)", error);
    }
    for item in &state.items {
        println!("{}", row(item));
    }

    let pagination = Pagination::from_state(state);
    if pagination.is_visible() {
        let strip: Vec<String> = pagination
            .page_numbers()
            .iter()
            .map(ToString::to_string)
            .collect();
        println!(
            "-- page {} of {} [{}], {} total",
            state.page,
            state.pages,
            strip.join(" "),
            state.total
        );
    } else {
        println!("-- {} total", state.total);
    }
}

async fn show<T: Resource>(client: &ApiClient, id: i64) -> Result<()> {
    let item: T = client.get(id).await?;
    println!("{}", serde_json::to_string_pretty(&item)?);
    Ok(())
}

async fn moderation(
    client: ApiClient,
    config: &ViewConfig,
    command: ModerationCommand,
) -> Result<()> {
    match command {
        ModerationCommand::List {
            kind,
            status,
            search,
            page,
        } => {
            let filter = ModerationFilter { kind, status };
            let queue = ModerationQueue::mount_with(client, config, filter);
            let state = load_page(queue.view(), &search, page).await?;
            print_rows(&state, |item| {
                format!(
                    "{}\t{}\t{}\t{}\t{}",
                    item.kind.as_str(),
                    item.id,
                    item.status.as_str(),
                    item.created_at,
                    item.title
                )
            });
            let counts = queue.pending_counts().await?;
            println!(
                "-- pending: {} prompts, {} guides, {} proposals",
                counts.prompts, counts.guides, counts.proposals
            );
            Ok(())
        }
        ModerationCommand::Approve { kind, id } => {
            decide(client, config, kind, id, Decision::Approve).await
        }
        ModerationCommand::Reject { kind, id } => {
            decide(client, config, kind, id, Decision::Reject).await
        }
    }
}

async fn decide(
    client: ApiClient,
    config: &ViewConfig,
    kind: ModerationKind,
    id: i64,
    decision: Decision,
) -> Result<()> {
    let queue = ModerationQueue::mount_with(
        client,
        config,
        ModerationFilter {
            kind: TypeFilter::from(kind),
            status: StatusFilter::Pending,
        },
    );
    let item = queue.decide_by_id(kind, id, decision).await?;
    queue.unmount();
    println!(
        "{} {} is now {}",
        item.kind.as_str(),
        item.id,
        decision.target(item.kind).as_str()
    );
    Ok(())
}

async fn propose(client: &ApiClient, args: ProposeArgs) -> Result<()> {
    let mut form = Form::new(ProposalDraft {
        kind: args.kind,
        title: args.title,
        description: args.description,
        content: args.content,
        email: args.email,
        tags: args.tags,
    });
    let proposal = form
        .submit(|draft| async move { client.submit_proposal(&draft).await })
        .await?;
    println!("Proposal {} submitted ({})", proposal.id, proposal.status.as_str());
    Ok(())
}

async fn users(client: ApiClient, command: UsersCommand) -> Result<()> {
    let admin = UserAdmin::new(client.clone());
    match command {
        UsersCommand::CycleRole { id } => {
            let user: User = client.get(id).await?;
            let updated = admin.cycle_role(&user).await?;
            println!("{} is now {}", updated.email, updated.role.as_str());
        }
        UsersCommand::SetActive { id, active } => {
            let user: User = client.get(id).await?;
            let updated = admin.set_active(&user, active).await?;
            println!(
                "{} is now {}",
                updated.email,
                if updated.is_active { "active" } else { "inactive" }
            );
        }
        UsersCommand::Create {
            name,
            email,
            password,
            role,
        } => {
            let mut form = Form::new(UserDraft {
                name,
                email,
                password,
                role: role.into(),
            });
            let user = admin.create(&mut form).await?;
            println!("Created user {} <{}>", user.id, user.email);
        }
        UsersCommand::Delete { id } => {
            admin.delete(id).await?;
            println!("Deleted user {}", id);
        }
    }
    Ok(())
}
