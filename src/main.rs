// SPDX-License-Identifier: PMPL-1.0-or-later

//! portfolio: command-line client for the portfolio site.
//!
//! Resolves site routes, looks up UI translations, and calls the backend API
//! with the session token from local storage.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use portfolio_client::config::{self, ClientConfig, Profile};
use portfolio_client::http::{ApiClient, ConsoleNotifier};
use portfolio_client::i18n::{Locale, Translator};
use portfolio_client::storage::FileStore;
use portfolio_client::types::{Article, Career, Comment, NewComment, Project, ProjectSort};
use portfolio_client::{api, diagnostics, router};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "portfolio")]
#[command(version)]
#[command(about = "Route table, translations and authenticated API client for the portfolio site")]
#[command(long_about = None)]
struct Cli {
    /// Config file (default: <config dir>/portfolio-client/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Profile to run with
    #[arg(long, global = true, value_enum)]
    profile: Option<ProfileArg>,

    /// Local storage file holding `token` and `site_lang`
    #[arg(long, global = true, value_name = "PATH")]
    storage: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the site's routes
    Routes,

    /// Resolve a URL path to its page view
    Route {
        #[arg(value_name = "PATH")]
        path: String,
    },

    /// Translate a UI string key such as nav.home
    T {
        #[arg(value_name = "KEY")]
        key: String,

        /// Locale (default: stored site_lang, else zh)
        #[arg(short, long, value_enum)]
        lang: Option<LangArg>,
    },

    /// GET an API path and print the JSON response
    Get {
        #[arg(value_name = "PATH")]
        path: String,
    },

    /// List articles
    Articles,

    /// Show one article
    Article {
        #[arg(value_name = "ID")]
        id: i64,
    },

    /// List or search projects
    Projects {
        /// Sort order
        #[arg(short, long, value_enum, default_value = "newest")]
        sort: SortArg,

        /// Search titles and descriptions instead of listing
        #[arg(long, value_name = "KEYWORD")]
        search: Option<String>,
    },

    /// Show one project
    Project {
        #[arg(value_name = "ID")]
        id: i64,
    },

    /// Show the career timeline
    Careers,

    /// List comments on an article
    Comments {
        #[arg(value_name = "ARTICLE_ID")]
        article_id: i64,
    },

    /// Post a comment on an article (needs a session)
    Comment {
        #[arg(value_name = "ARTICLE_ID")]
        article_id: i64,

        #[arg(value_name = "TEXT")]
        content: String,

        /// Reply to this comment
        #[arg(long, value_name = "COMMENT_ID")]
        reply_to: Option<i64>,
    },

    /// Delete an article, project, career entry or comment
    Delete {
        #[arg(value_enum)]
        kind: ResourceArg,

        #[arg(value_name = "ID")]
        id: i64,
    },

    /// Check configuration and local storage
    Doctor,
}

// CLI argument types
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum ProfileArg {
    Dev,
    Prod,
}

impl From<ProfileArg> for Profile {
    fn from(arg: ProfileArg) -> Self {
        match arg {
            ProfileArg::Dev => Profile::Development,
            ProfileArg::Prod => Profile::Production,
        }
    }
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum LangArg {
    Zh,
    En,
    Ja,
}

impl From<LangArg> for Locale {
    fn from(arg: LangArg) -> Self {
        match arg {
            LangArg::Zh => Locale::Zh,
            LangArg::En => Locale::En,
            LangArg::Ja => Locale::Ja,
        }
    }
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum SortArg {
    Newest,
    Likes,
}

impl From<SortArg> for ProjectSort {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Newest => ProjectSort::Newest,
            SortArg::Likes => ProjectSort::MostLiked,
        }
    }
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum ResourceArg {
    Article,
    Project,
    Career,
    Comment,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let (config, config_file) = load_config(&cli)?;
    let store = Arc::new(FileStore::new(&config.storage_path));
    // The locale is read once; later changes to site_lang apply on next start.
    let tr = Translator::from_store(store.as_ref());

    let connect = || ApiClient::from_config(&config, store.clone(), ConsoleNotifier::new(tr));
    let failed = || tr.t("cli.request_failed").to_string();

    match cli.command {
        Commands::Routes => print_routes(tr),
        Commands::Route { path } => print_route(tr, &path),
        Commands::T { key, lang } => {
            let locale = lang.map(Locale::from).unwrap_or(tr.locale());
            println!("{}", Translator::new(locale).t(&key));
        }
        Commands::Doctor => diagnostics::run_self_diagnostics(&config, config_file.as_deref())?,
        Commands::Get { path } => get_raw(&connect()?, &path).await.with_context(failed)?,
        Commands::Articles => show_articles(&connect()?, tr).await.with_context(failed)?,
        Commands::Article { id } => show_article(&connect()?, tr, id)
            .await
            .with_context(failed)?,
        Commands::Projects { sort, search } => {
            show_projects(&connect()?, tr, sort.into(), search.as_deref())
                .await
                .with_context(failed)?
        }
        Commands::Project { id } => show_project(&connect()?, tr, id)
            .await
            .with_context(failed)?,
        Commands::Careers => show_careers(&connect()?, tr).await.with_context(failed)?,
        Commands::Comments { article_id } => show_comments(&connect()?, tr, article_id)
            .await
            .with_context(failed)?,
        Commands::Comment {
            article_id,
            content,
            reply_to,
        } => {
            let mut comment = NewComment::new(article_id, content);
            if let Some(parent) = reply_to {
                comment = comment.reply_to(parent);
            }
            api::post_comment(&connect()?, &comment)
                .await
                .with_context(failed)?;
            println!("{}", tr.t("cli.done").green());
        }
        Commands::Delete { kind, id } => {
            delete(&connect()?, kind, id).await.with_context(failed)?;
            println!("{}", tr.t("cli.done").green());
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("portfolio=debug,portfolio_client=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Resolved settings plus the config file they were read from, if any.
fn load_config(cli: &Cli) -> Result<(ClientConfig, Option<PathBuf>)> {
    let (mut settings, source) = config::load_with_source(cli.config.as_deref())?;
    settings.apply_env()?;
    if let Some(profile) = cli.profile {
        settings.profile = Some(profile.into());
    }
    if let Some(storage) = &cli.storage {
        settings.storage_path = Some(storage.clone());
    }
    let resolved = settings.resolve().context("resolving configuration")?;
    Ok((resolved, source))
}

async fn get_raw(client: &ApiClient, path: &str) -> Result<()> {
    let value: serde_json::Value = client.get_json(path).await?;
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

async fn delete(client: &ApiClient, kind: ResourceArg, id: i64) -> Result<()> {
    match kind {
        ResourceArg::Article => api::delete_article(client, id).await?,
        ResourceArg::Project => api::delete_project(client, id).await?,
        ResourceArg::Career => api::delete_career(client, id).await?,
        ResourceArg::Comment => api::delete_comment(client, id).await?,
    }
    Ok(())
}

async fn show_articles(client: &ApiClient, tr: Translator) -> Result<()> {
    let articles = api::list_articles(client).await?;
    print_heading(tr.t("nav.articles"));
    if articles.is_empty() {
        println!("  {}", tr.t("cli.empty").dimmed());
    }
    for article in &articles {
        print_article_line(tr, article);
    }
    Ok(())
}

async fn show_article(client: &ApiClient, tr: Translator, id: i64) -> Result<()> {
    let article = api::get_article(client, id).await?;
    print_article(tr, &article);
    Ok(())
}

async fn show_projects(
    client: &ApiClient,
    tr: Translator,
    sort: ProjectSort,
    search: Option<&str>,
) -> Result<()> {
    let projects = match search {
        Some(keyword) => api::search_projects(client, keyword).await?,
        None => api::list_projects(client, sort).await?,
    };
    print_heading(tr.t("nav.projects"));
    if projects.is_empty() {
        println!("  {}", tr.t("cli.empty").dimmed());
    }
    for project in &projects {
        print_project_line(tr, project);
    }
    Ok(())
}

async fn show_project(client: &ApiClient, tr: Translator, id: i64) -> Result<()> {
    let project = api::get_project(client, id).await?;
    print_project_line(tr, &project);
    if let Some(description) = &project.description {
        println!("\n{description}");
    }
    for url in [&project.media_url, &project.attachment_url]
        .into_iter()
        .flatten()
    {
        println!("  {}", client.url_for(url)?);
    }
    Ok(())
}

async fn show_careers(client: &ApiClient, tr: Translator) -> Result<()> {
    let careers = api::list_careers(client).await?;
    print_heading(tr.t("nav.career"));
    if careers.is_empty() {
        println!("  {}", tr.t("cli.empty").dimmed());
    }
    for career in &careers {
        print_career(tr, career);
    }
    Ok(())
}

async fn show_comments(client: &ApiClient, tr: Translator, article_id: i64) -> Result<()> {
    let comments = api::list_comments(client, article_id).await?;
    print_heading(tr.t("cli.comments"));
    if comments.is_empty() {
        println!("  {}", tr.t("cli.empty").dimmed());
    }
    for comment in &comments {
        print_comment(comment);
    }
    Ok(())
}

fn print_heading(title: &str) {
    println!("\n{}", title.bold().yellow());
}

fn print_routes(tr: Translator) {
    print_heading(tr.t("cli.routes"));
    for route in router::ROUTES {
        println!(
            "  {:18} {:16} {}",
            route.path.cyan(),
            route.view.name(),
            tr.t(route.view.title_key())
        );
    }
}

fn print_route(tr: Translator, path: &str) {
    let Some(nav) = router::navigate(path) else {
        println!("{}: {}", tr.t("cli.no_route").red(), path);
        return;
    };
    let view = nav.target.view();
    println!(
        "{} {} ({})",
        format!("{}:", tr.t("cli.view")).bold(),
        view.name().green(),
        tr.t(view.title_key())
    );
    if !nav.target.params.is_empty() {
        println!("{}", format!("{}:", tr.t("cli.params")).bold());
        for (name, value) in &nav.target.params {
            println!("  {name} = {value}");
        }
    }
    println!("  ({})", tr.t("cli.scroll_top").dimmed());
}

fn print_article_line(tr: Translator, article: &Article) {
    println!(
        "  #{:<4} {}  {}",
        article.id,
        article.title.as_deref().unwrap_or("-").bold(),
        format!(
            "[{} {} · {} {}]",
            article.view_count,
            tr.t("cli.views"),
            article.like_count,
            tr.t("cli.likes")
        )
        .dimmed()
    );
}

fn print_article(tr: Translator, article: &Article) {
    print_article_line(tr, article);
    if let Some(created) = article.created_at {
        println!("  {}", created.format("%Y-%m-%d %H:%M").to_string().dimmed());
    }
    if let Some(summary) = &article.summary {
        println!("\n{}", summary.italic());
    }
    if let Some(content) = &article.content {
        println!("\n{content}");
    }
}

fn print_project_line(tr: Translator, project: &Project) {
    let kind = project
        .media_type
        .map(|m| format!("{m:?}").to_lowercase())
        .unwrap_or_default();
    println!(
        "  #{:<4} {} {} {}",
        project.id,
        project.title.as_deref().unwrap_or("-").bold(),
        kind.cyan(),
        format!(
            "[{} {} · {} {}]",
            project.view_count,
            tr.t("cli.views"),
            project.like_count,
            tr.t("cli.likes")
        )
        .dimmed()
    );
}

fn print_career(tr: Translator, career: &Career) {
    println!(
        "  {}  {} / {}",
        career.display_period(tr.t("cli.current")).cyan(),
        career.company.as_deref().unwrap_or("-").bold(),
        career.position.as_deref().unwrap_or("-")
    );
    let tags = career.tag_list();
    if !tags.is_empty() {
        println!("      {}", tags.join(" · ").dimmed());
    }
}

fn print_comment(comment: &Comment) {
    let author = comment.username.as_deref().unwrap_or("?");
    let prefix = match &comment.parent_username {
        Some(parent) if comment.is_reply() => format!("{author} -> {parent}"),
        _ => author.to_string(),
    };
    println!("  {} {}", format!("{prefix}:").bold(), comment.content);
    if let Some(created) = &comment.created_at {
        println!("      {}", created.dimmed());
    }
}
