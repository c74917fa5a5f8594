//! quizdesk CLI: author quizzes, serve them to students and review results.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};

mod commands;

#[derive(Parser)]
#[command(name = "quizdesk", version, about = "Author, serve and grade quizzes")]
struct Cli {
    /// Config file path (default: ./quizdesk.toml, then ~/.config/quizdesk/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a starter config and an example quiz
    Init,

    /// List stored quizzes
    List,

    /// Create a new, empty quiz
    New {
        /// Quiz name (also its file name)
        name: String,

        /// Display title
        #[arg(long)]
        title: Option<String>,

        /// Time allowed per student, in minutes
        #[arg(long, default_value = "30")]
        timer: u32,

        /// Shuffle question order once per launch
        #[arg(long)]
        shuffle: bool,

        /// Let students submit without entering a name
        #[arg(long)]
        no_name_required: bool,

        /// Message shown before the quiz starts
        #[arg(long)]
        start_message: Option<String>,

        /// Message shown after submitting
        #[arg(long)]
        end_message: Option<String>,

        /// Overwrite an existing quiz with the same name
        #[arg(long)]
        force: bool,
    },

    /// Change quiz properties without touching its questions
    Edit {
        /// Quiz name
        name: String,

        /// Display title
        #[arg(long)]
        title: Option<String>,

        /// Time allowed per student, in minutes
        #[arg(long)]
        timer: Option<u32>,

        /// Shuffle question order once per launch
        #[arg(long, value_name = "BOOL")]
        shuffle: Option<bool>,

        /// Require students to enter their full name
        #[arg(long, value_name = "BOOL")]
        require_name: Option<bool>,

        /// Message shown before the quiz starts
        #[arg(long)]
        start_message: Option<String>,

        /// Message shown after submitting
        #[arg(long)]
        end_message: Option<String>,
    },

    /// Copy a quiz JSON file into the data directory
    Import {
        /// Path to the quiz JSON file
        file: PathBuf,
    },

    /// Print a quiz
    Show {
        /// Quiz name
        name: String,

        /// Include correct answers
        #[arg(long)]
        answers: bool,
    },

    /// Check that a quiz can be served
    Validate {
        /// Quiz name, or path to a quiz JSON file
        target: String,
    },

    /// Delete a quiz
    Delete {
        /// Quiz name
        name: String,
    },

    /// Append a question to a quiz
    AddQuestion {
        /// Quiz name
        name: String,

        /// Question type: multiple_choice_single, multiple_choice_multiple,
        /// true_false, short_answer, paragraph (or single, multi, tf, short)
        #[arg(long = "type")]
        question_type: String,

        /// Question text
        #[arg(long)]
        text: String,

        /// Points for a correct answer
        #[arg(long, default_value = "1")]
        weight: f64,

        /// An option (repeat for each option)
        #[arg(long = "option")]
        options: Vec<String>,

        /// Correct answer (repeat for multi-select questions)
        #[arg(long = "answer")]
        answers: Vec<String>,
    },

    /// Remove a question by its 1-based number
    RemoveQuestion {
        /// Quiz name
        name: String,

        /// Question number (1-based)
        number: usize,
    },

    /// Move a question to another position (both 1-based)
    MoveQuestion {
        /// Quiz name
        name: String,

        /// Current question number
        from: usize,

        /// New position
        to: usize,
    },

    /// Serve a quiz to students until Ctrl+C
    Serve {
        /// Quiz name
        name: String,

        /// Override the configured host
        #[arg(long)]
        host: Option<String>,

        /// Override the configured port
        #[arg(long)]
        port: Option<u16>,
    },

    /// Summarize submitted results
    Results {
        /// Quiz name
        name: String,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: ResultsFormat,

        /// Where to write the HTML report
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ResultsFormat {
    Text,
    Html,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("quizdesk=info".parse().unwrap()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match quizdesk_core::config::load_config_from(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e:#}");
            process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Init => commands::init::execute(&config),
        Commands::List => commands::list::execute(&config),
        Commands::New {
            name,
            title,
            timer,
            shuffle,
            no_name_required,
            start_message,
            end_message,
            force,
        } => commands::new::execute(
            &config,
            commands::new::NewQuiz {
                name,
                title,
                timer,
                shuffle,
                require_full_name: !no_name_required,
                start_message,
                end_message,
                force,
            },
        ),
        Commands::Edit {
            name,
            title,
            timer,
            shuffle,
            require_name,
            start_message,
            end_message,
        } => commands::edit::execute(
            &config,
            &name,
            commands::edit::QuizEdits {
                title,
                timer,
                shuffle,
                require_full_name: require_name,
                start_message,
                end_message,
            },
        ),
        Commands::Import { file } => commands::import::execute(&config, file),
        Commands::Show { name, answers } => commands::show::execute(&config, &name, answers),
        Commands::Validate { target } => commands::validate::execute(&config, &target),
        Commands::Delete { name } => commands::delete::execute(&config, &name),
        Commands::AddQuestion {
            name,
            question_type,
            text,
            weight,
            options,
            answers,
        } => commands::add_question::execute(
            &config,
            &name,
            &question_type,
            text,
            weight,
            options,
            answers,
        ),
        Commands::RemoveQuestion { name, number } => {
            commands::remove_question::execute(&config, &name, number)
        }
        Commands::MoveQuestion { name, from, to } => {
            commands::move_question::execute(&config, &name, from, to)
        }
        Commands::Serve { name, host, port } => {
            commands::serve::execute(config, &name, host, port).await
        }
        Commands::Results {
            name,
            format,
            output,
        } => match format {
            ResultsFormat::Text => commands::results::execute_text(&config, &name),
            ResultsFormat::Html => commands::results::execute_html(&config, &name, output),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
