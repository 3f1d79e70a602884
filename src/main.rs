use anyhow::Result;
use clap::{Parser, Subcommand};
use is_terminal::IsTerminal;
use minus::Pager;
use std::io::Write;
use twig::areas::repository::Repository;
use twig::artifacts::core::{PagerWriter, TwigError};

#[derive(Parser)]
#[command(
    name = "twig",
    version = "0.1.0",
    author = "Sami Barbut-Dica",
    about = "A small content-addressed version control system",
    long_about = "twig tracks snapshots of a working directory as commits, \
    merges branches with a three-way merge and exchanges history with other \
    repositories reachable on the filesystem.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
",
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(name = "init", about = "Create a repository in the current directory")]
    Init,
    #[command(name = "add", about = "Stage a file for the next commit")]
    Add {
        #[arg(index = 1)]
        file: String,
    },
    #[command(name = "commit", about = "Record the staged changes")]
    Commit {
        #[arg(index = 1, help = "The commit message")]
        message: String,
    },
    #[command(
        name = "rm",
        about = "Unstage a file or stage its removal",
        long_about = "This command unstages a file staged for addition. If the file is \
        tracked by the current commit instead, it is staged for removal and deleted \
        from the working directory."
    )]
    Rm {
        #[arg(index = 1)]
        file: String,
    },
    #[command(name = "log", about = "Show the history of the current branch")]
    Log,
    #[command(name = "global-log", about = "Show every commit ever made")]
    GlobalLog,
    #[command(name = "find", about = "Print the ids of commits with the given message")]
    Find {
        #[arg(index = 1)]
        message: String,
    },
    #[command(name = "status", about = "Show branches, staged and unstaged changes")]
    Status,
    #[command(
        name = "checkout",
        about = "Restore a file or switch branches",
        long_about = "Forms:\n  \
        checkout -- <file>              restore a file from the current commit\n  \
        checkout <commit id> -- <file>  restore a file from the given commit\n  \
        checkout <branch>               switch to a branch"
    )]
    Checkout {
        #[arg(index = 1, help = "A branch name, or a commit id when a file follows")]
        target: Option<String>,
        #[arg(index = 2, last = true, help = "The file to restore")]
        file: Option<String>,
    },
    #[command(name = "branch", about = "Create a branch at the current commit")]
    Branch {
        #[arg(index = 1)]
        name: String,
    },
    #[command(name = "rm-branch", about = "Delete a branch")]
    RmBranch {
        #[arg(index = 1)]
        name: String,
    },
    #[command(name = "reset", about = "Move the current branch to a commit")]
    Reset {
        #[arg(index = 1)]
        commit_id: String,
    },
    #[command(name = "merge", about = "Merge a branch into the current branch")]
    Merge {
        #[arg(index = 1)]
        branch: String,
    },
    #[command(name = "add-remote", about = "Register a remote repository")]
    AddRemote {
        #[arg(index = 1)]
        name: String,
        #[arg(index = 2, help = "Path to the remote's .twig directory")]
        path: String,
    },
    #[command(name = "rm-remote", about = "Forget a remote repository")]
    RmRemote {
        #[arg(index = 1)]
        name: String,
    },
    #[command(name = "push", about = "Copy the current branch to a remote branch")]
    Push {
        #[arg(index = 1)]
        remote: String,
        #[arg(index = 2)]
        branch: String,
    },
    #[command(name = "fetch", about = "Copy a remote branch into <remote>/<branch>")]
    Fetch {
        #[arg(index = 1)]
        remote: String,
        #[arg(index = 2)]
        branch: String,
    },
    #[command(name = "pull", about = "Fetch a remote branch and merge it")]
    Pull {
        #[arg(index = 1)]
        remote: String,
        #[arg(index = 2)]
        branch: String,
    },
}

fn open_repository(writer: Box<dyn Write>) -> Result<Repository> {
    let pwd = std::env::current_dir()?;
    Repository::new(&pwd.to_string_lossy(), writer)
}

fn paging_enabled() -> bool {
    std::io::stdout().is_terminal() && std::env::var_os("NO_PAGER").is_none()
}

fn paged_writer(pager: &Pager) -> Box<dyn Write> {
    if paging_enabled() {
        Box::new(PagerWriter::new(pager.clone()))
    } else {
        Box::new(std::io::stdout())
    }
}

fn page_output(pager: Pager) -> Result<()> {
    if paging_enabled() {
        minus::page_all(pager)?;
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Log => {
            let pager = Pager::new();
            open_repository(paged_writer(&pager))?.log().await?;
            page_output(pager)?;
        }
        Commands::GlobalLog => {
            let pager = Pager::new();
            open_repository(paged_writer(&pager))?.global_log().await?;
            page_output(pager)?;
        }
        command => {
            let mut repository = open_repository(Box::new(std::io::stdout()))?;
            run(&mut repository, command).await?;
        }
    }

    Ok(())
}

async fn run(repository: &mut Repository, command: Commands) -> Result<()> {
    match command {
        Commands::Init => repository.init().await?,
        Commands::Add { file } => repository.add(&file).await?,
        Commands::Commit { message } => {
            repository.commit(&message).await?;
        }
        Commands::Rm { file } => repository.rm(&file).await?,
        Commands::Find { message } => {
            repository.find(&message).await?;
        }
        Commands::Status => repository.status().await?,
        Commands::Checkout { target, file } => match (target, file) {
            (None, Some(file)) => repository.checkout_file(&file).await?,
            (Some(commit_id), Some(file)) => {
                repository.checkout_commit_file(&commit_id, &file).await?
            }
            (Some(branch), None) => repository.checkout_branch(&branch).await?,
            (None, None) => return Err(TwigError::Usage.into()),
        },
        Commands::Branch { name } => repository.branch(&name).await?,
        Commands::RmBranch { name } => repository.rm_branch(&name).await?,
        Commands::Reset { commit_id } => {
            repository.reset(&commit_id).await?;
        }
        Commands::Merge { branch } => {
            repository.merge(&branch).await?;
        }
        Commands::AddRemote { name, path } => repository.add_remote(&name, &path).await?,
        Commands::RmRemote { name } => repository.rm_remote(&name).await?,
        Commands::Push { remote, branch } => {
            repository.push(&remote, &branch).await?;
        }
        Commands::Fetch { remote, branch } => {
            repository.fetch(&remote, &branch).await?;
        }
        Commands::Pull { remote, branch } => {
            repository.pull(&remote, &branch).await?;
        }
        Commands::Log => repository.log().await?,
        Commands::GlobalLog => repository.global_log().await?,
    }

    Ok(())
}
