use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use tableauctl::{
    auth, logging, scripts::MembershipOutcome, Config, Page, Session, SiteRole, TableauClient,
};

#[derive(Parser, Debug)]
#[command(name = "tableauctl")]
#[command(about = "Administer a Tableau Server site from the command line")]
#[command(version)]
struct Cli {
    /// JSON file with server_url, username and (optionally) password
    #[arg(short, long, global = true, default_value = "tableau.json")]
    config: PathBuf,

    /// Site to sign in to; empty for the default site
    #[arg(short, long, global = true, default_value = "")]
    site: String,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List all sites on the server
    Sites,
    /// Show the current site, or another one by URL
    Site {
        #[arg(long)]
        url: Option<String>,
    },
    /// List views on the site
    Views {
        /// Include usage statistics
        #[arg(long)]
        usage: bool,
    },
    /// List workbooks on the site
    Workbooks {
        #[arg(long, default_value_t = 1000)]
        page_size: u32,
        #[arg(long, default_value_t = 1)]
        page_number: u32,
    },
    /// List the connections of a workbook
    Connections { workbook_id: String },
    /// List users on the site
    Users {
        /// Print a lowercased name -> id table instead
        #[arg(long)]
        lookup: bool,
        #[arg(long, default_value_t = 1000)]
        page_size: u32,
        #[arg(long, default_value_t = 1)]
        page_number: u32,
    },
    /// Show a single user
    User { user_id: String },
    /// Add a user to the site
    AddUser {
        name: String,
        #[arg(long, default_value_t = SiteRole::Interactor)]
        role: SiteRole,
    },
    /// List groups on the site
    Groups,
    /// Create a group
    CreateGroup { name: String },
    /// Add a user to a group by ids
    AddToGroup { user_id: String, group_id: String },
    /// Resolve group names to ids
    GroupIds {
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Resolve user names or emails to ids
    UserIds {
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Add many users to a group
    BatchAdd {
        group: String,
        users: Vec<String>,
        /// Create the group if it does not exist
        #[arg(long)]
        force: bool,
    },
    /// List every workbook connection on the site
    Inventory,
    /// Fetch an absolute URL with the session cookie
    Fetch { url: String },
    /// Store the password for the configured user in the OS keyring
    RememberPassword,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    if let Err(error) = run(cli).await {
        eprintln!("error: {error:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::from_path(&cli.config)
        .with_context(|| format!("unable to load {}", cli.config.display()))?;

    if let Command::RememberPassword = cli.command {
        let password = auth::interactive_prompt("your password")?;
        auth::store_password(&config.server_url, &config.username, &password)?;
        println!("Stored password for {}", config.username);
        return Ok(());
    }

    let client = TableauClient::from_config(&config)?;
    let session = client
        .sign_in(&cli.site)
        .await
        .with_context(|| format!("unable to sign in to site {:?}", cli.site))?;

    // Sign out even if the command failed, but report the command's error first.
    let outcome = dispatch(&session, cli.command).await;
    let signed_out = session.sign_out().await;
    outcome?;
    signed_out.context("unable to sign out")?;
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn dispatch(session: &Session, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Sites => print_json(&session.query_sites().await?),
        Command::Site { url } => print_json(&session.query_site(url.as_deref()).await?),
        Command::Views { usage } => print_json(&session.query_views(usage).await?),
        Command::Workbooks {
            page_size,
            page_number,
        } => print_json(
            &session
                .query_workbooks(Page::new(page_size, page_number))
                .await?,
        ),
        Command::Connections { workbook_id } => {
            print_json(&session.query_workbook_connections(&workbook_id).await?)
        }
        Command::Users {
            lookup,
            page_size,
            page_number,
        } => {
            let page = Page::new(page_size, page_number);
            if lookup {
                print_json(&session.user_lookup_table(page).await?)
            } else {
                print_json(&session.query_users(page).await?)
            }
        }
        Command::User { user_id } => print_json(&session.query_user(&user_id).await?),
        Command::AddUser { name, role } => {
            print_json(&session.add_user_to_site(&name, role).await?.created())
        }
        Command::Groups => print_json(&session.query_groups().await?),
        Command::CreateGroup { name } => {
            print_json(&session.create_group(&name).await?.created())
        }
        Command::AddToGroup { user_id, group_id } => print_json(
            &session
                .add_user_to_group(&user_id, &group_id)
                .await?
                .created(),
        ),
        Command::GroupIds { names } => print_json(&session.group_ids_from_names(&names).await?),
        Command::UserIds { names } => print_json(&session.user_ids_from_names(&names).await?),
        Command::BatchAdd {
            group,
            users,
            force,
        } => {
            let results = session
                .batch_add_users_to_group(&users, &group, force)
                .await?;
            for result in &results {
                let status = match &result.outcome {
                    MembershipOutcome::Added => "added".to_string(),
                    MembershipOutcome::AlreadyMember => "already a member".to_string(),
                    MembershipOutcome::UnknownUser => "unknown user".to_string(),
                    MembershipOutcome::Failed(error) => format!("failed: {error}"),
                };
                println!("{}\t{status}", result.user_name);
            }
            Ok(())
        }
        Command::Inventory => {
            for record in session.workbooks_with_connections().await? {
                println!("{}", serde_json::to_string(&record)?);
            }
            Ok(())
        }
        Command::Fetch { url } => {
            let body = session.get_url(&url).await?.text().await?;
            println!("{body}");
            Ok(())
        }
        Command::RememberPassword => anyhow::bail!("remember-password does not need a session"),
    }
}
