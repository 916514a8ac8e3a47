use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use lightfeedback::cli::{Cli, Commands, ConfigAction, generate_completions};
use lightfeedback::commands::{
    AppContext, CreateOptions, LsOptions, OutputOptions, UpdateOptions, cmd_comment,
    cmd_comments, cmd_config_get, cmd_config_set, cmd_config_show, cmd_create, cmd_health,
    cmd_ls, cmd_people, cmd_projects, cmd_show, cmd_update,
};
use lightfeedback::error::Result;
use lightfeedback::filter::FilterCriteria;
use lightfeedback::types::SortOrder;

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("lightfeedback=warn")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let output = OutputOptions { json: cli.json };
    let user = cli.user.as_deref();

    match cli.command {
        Commands::Completions { shell } => {
            generate_completions(shell);
            Ok(())
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => cmd_config_show(&AppContext::load(user)?, output),
            ConfigAction::Get { key } => cmd_config_get(&AppContext::load(user)?, &key, output),
            ConfigAction::Set { key, value } => cmd_config_set(&key, &value, output),
        },
        command => {
            let ctx = AppContext::load(user)?;
            match command {
                Commands::Projects => cmd_projects(&ctx, output).await,
                Commands::People => cmd_people(&ctx, output).await,
                Commands::Health => cmd_health(&ctx, output).await,

                Commands::Ls {
                    project,
                    feedback_type,
                    status,
                    search,
                    page,
                    oldest_first,
                } => {
                    let filters = FilterCriteria {
                        project_key: project.unwrap_or_default(),
                        feedback_type: feedback_type.map(|t| t.to_string()).unwrap_or_default(),
                        status: status.map(|s| s.to_string()).unwrap_or_default(),
                        search: search.unwrap_or_default(),
                    };
                    let sort = if oldest_first {
                        SortOrder::OldestFirst
                    } else {
                        SortOrder::NewestFirst
                    };
                    cmd_ls(
                        &ctx,
                        LsOptions {
                            filters,
                            page,
                            sort,
                        },
                        output,
                    )
                    .await
                }

                Commands::Show { id } => cmd_show(&ctx, id, output).await,

                Commands::Create {
                    project,
                    title,
                    description,
                    feedback_type,
                    severity,
                    assignee,
                } => {
                    cmd_create(
                        &ctx,
                        CreateOptions {
                            project_key: project,
                            title,
                            description,
                            feedback_type,
                            severity,
                            assignee,
                        },
                        output,
                    )
                    .await
                }

                Commands::Update {
                    id,
                    status,
                    assignee,
                    resolution,
                    title,
                    description,
                    severity,
                } => {
                    cmd_update(
                        &ctx,
                        id,
                        UpdateOptions {
                            status,
                            assignee,
                            resolution,
                            title,
                            description,
                            severity,
                        },
                        output,
                    )
                    .await
                }

                Commands::Comments { id } => cmd_comments(&ctx, id, output).await,
                Commands::Comment { id, text } => {
                    cmd_comment(&ctx, id, &text.join(" "), output).await
                }

                Commands::Completions { .. } | Commands::Config { .. } => Ok(()),
            }
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
