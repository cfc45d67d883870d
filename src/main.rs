use clap::{Parser, Subcommand};
use colored::Colorize;
use dvc::artifacts::diff::tree_diff::{DiffEntry, DiffFilter, TreeChangeType};
use dvc::artifacts::objects::object::ObjectBox;
use dvc::{DvcError, Repository, RepositoryConfig};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(
    name = "dvc",
    version = "0.1.0",
    about = "Version control for data files",
    long_about = "Tracks snapshots of a directory of data files as content-addressed objects, \
    with branches, three-way merges and commit-to-commit diffs.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "init",
        about = "Initialize a new repository",
        long_about = "Creates the .dvc directory in the current directory or at the specified path. \
        Running it on an existing repository keeps its state."
    )]
    Init {
        #[arg(index = 1, help = "The path to the repository")]
        path: Option<PathBuf>,
    },
    #[command(
        name = "add",
        about = "Stage files for the next commit",
        long_about = "Stages files, or every file below a directory. \
        Tracked files that no longer exist are staged for removal."
    )]
    Add {
        #[arg(index = 1, required = true, num_args = 1.., help = "Files or directories to stage")]
        paths: Vec<PathBuf>,
    },
    #[command(name = "commit", about = "Record the staged changes")]
    Commit {
        #[arg(short, long, help = "The commit message")]
        message: String,
    },
    #[command(
        name = "branch",
        about = "Create a branch at HEAD, or list branches",
        long_about = "With a name, creates a branch pointing at the current HEAD commit. \
        Without one, lists every branch and marks the current one."
    )]
    Branch {
        #[arg(index = 1, help = "The name of the branch to create")]
        name: Option<String>,
    },
    #[command(
        name = "checkout",
        about = "Switch to a branch or a commit",
        long_about = "Materializes the snapshot of a branch (or of a full commit id, detaching HEAD) \
        in the working directory. The staging area must be empty."
    )]
    Checkout {
        #[arg(index = 1, help = "Branch name or full commit id")]
        target: String,
    },
    #[command(name = "merge", about = "Merge a branch into the current HEAD")]
    Merge {
        #[arg(index = 1, help = "The branch to merge")]
        branch: String,
        #[arg(short, long, help = "Message for the merge commit")]
        message: Option<String>,
    },
    #[command(name = "log", about = "Show commit history, newest first")]
    Log {
        #[arg(index = 1, help = "Branch to show, HEAD when omitted")]
        branch: Option<String>,
    },
    #[command(
        name = "diff",
        about = "List paths changed between two commits",
        long_about = "Prints one <A|D|M><TAB><path> line per changed path, in path order. \
        Either side may be a branch name or a full commit id."
    )]
    Diff {
        #[arg(index = 1)]
        old: String,
        #[arg(index = 2)]
        new: String,
        #[arg(long = "diff-filter", value_parser = parse_diff_filter, help = "Show only (A)dded, (D)eleted or (M)odified paths")]
        diff_filter: Option<DiffFilter>,
    },
    #[command(name = "clone", about = "Copy the repository into a new directory")]
    Clone {
        #[arg(index = 1, help = "Destination directory, must not exist")]
        destination: PathBuf,
    },
    #[command(
        name = "hash-object",
        about = "Hash a file and optionally write it to the object database"
    )]
    HashObject {
        #[arg(short, long, required = false, help = "Write the object to the object database")]
        write: bool,
        #[arg(index = 1)]
        file: PathBuf,
    },
    #[command(name = "cat-file", about = "Print the content of an object")]
    CatFile {
        #[arg(short = 'p', long, help = "The object id to print")]
        sha: String,
    },
}

fn parse_diff_filter(value: &str) -> Result<DiffFilter, String> {
    DiffFilter::try_parse(value).ok_or_else(|| format!("invalid diff filter '{value}', expected letters from AMD"))
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    if std::env::var_os("NO_COLOR").is_some() {
        colored::control::set_override(false);
    }

    let cli = Cli::parse();

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            if let DvcError::MergeConflict { paths } = &error {
                for path in paths {
                    eprintln!("CONFLICT (content): merge conflict in {path}");
                }
            }
            eprintln!("error: {error}");
            ExitCode::from(1)
        }
    }
}

fn run(command: Commands) -> dvc::Result<()> {
    let config = RepositoryConfig::from_env()?;
    let pwd = std::env::current_dir()?;

    if let Commands::Init { path } = &command {
        let path = path.clone().unwrap_or(pwd);
        let repository = Repository::init(&path, config)?;
        println!(
            "Initialized empty dvc repository in {}",
            repository.metadata_path().display()
        );
        return Ok(());
    }

    let repository = Repository::discover(&pwd, config)?;

    match command {
        Commands::Init { .. } => {}
        Commands::Add { paths } => repository.add_all(&paths[..])?,
        Commands::Commit { message } => {
            let commit_oid = repository.commit(&message)?;
            let head = match repository.current_branch()? {
                Some(branch_name) => branch_name.to_string(),
                None => "detached HEAD".to_string(),
            };
            let commit = repository.database().load_commit(&commit_oid)?;
            println!(
                "[{} {}] {}",
                head,
                commit_oid.to_short_oid(),
                commit.short_message()
            );
        }
        Commands::Branch { name: Some(name) } => repository.branch(&name)?,
        Commands::Branch { name: None } => {
            let current = repository.current_branch()?;
            for branch_name in repository.list_branches()? {
                if current.as_ref() == Some(&branch_name) {
                    println!("* {}", branch_name.as_ref().green());
                } else {
                    println!("  {branch_name}");
                }
            }
        }
        Commands::Checkout { target } => {
            repository.checkout(&target)?;
            match repository.current_branch()? {
                Some(branch_name) => println!("Switched to branch '{branch_name}'"),
                None => println!("HEAD is now at {target}"),
            }
        }
        Commands::Merge { branch, message } => {
            let head_before = repository.current_head()?;
            let result = repository.merge(&branch, message.as_deref())?;
            if head_before.as_ref() == Some(&result) {
                println!("Already up to date.");
            } else {
                println!("Merge made by the 'three-way' strategy: {result}");
            }
        }
        Commands::Log { branch } => {
            let entries = match branch {
                Some(branch) => repository.log(&branch)?,
                None => repository.log_head()?,
            };
            let blocks = entries
                .iter()
                .map(|entry| entry.display())
                .collect::<Vec<_>>();
            if !blocks.is_empty() {
                println!("{}", blocks.join("\n\n"));
            }
        }
        Commands::Diff {
            old,
            new,
            diff_filter,
        } => {
            let filter = diff_filter.unwrap_or(DiffFilter::all());
            for entry in repository.diff(&old, &new)? {
                if entry.change.matches_filter(filter) {
                    println!("{}", colorize(&entry));
                }
            }
        }
        Commands::Clone { destination } => {
            let cloned = repository.clone_to(&destination)?;
            println!("Cloned into {}", cloned.path().display());
        }
        Commands::HashObject { write, file } => {
            println!("{}", repository.hash_object(&file, write)?);
        }
        Commands::CatFile { sha } => match repository.cat_file(&sha)? {
            ObjectBox::Blob(blob) => std::io::stdout().write_all(blob.content())?,
            other => println!("{}", other.display()),
        },
    }

    Ok(())
}

fn colorize(entry: &DiffEntry) -> String {
    let line = entry.display();

    match entry.change {
        TreeChangeType::Added(_) => line.green().to_string(),
        TreeChangeType::Removed(_) => line.red().to_string(),
        TreeChangeType::Modified { .. } => line.yellow().to_string(),
    }
}
