use anyhow::Result;

use neighborhood_ratings::cli::Command;
use neighborhood_ratings::{
    handle_batch, handle_evaluate, handle_neighbors, handle_predict, handle_recommend,
    handle_stats, interpret,
};

fn main() {
    setup_logging();
    parse_and_execute().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });
}

fn setup_logging() {
    sensible_env_logger::init!();
}

fn parse_and_execute() -> Result<()> {
    let command = interpret();
    execute_command(&command)
}

fn execute_command(command: &Command) -> Result<()> {
    match command {
        Command::Evaluate {
            data,
            model,
            evaluation,
            json,
        } => handle_evaluate(data, model, evaluation, *json),
        Command::Predict {
            data,
            model,
            user,
            item,
        } => handle_predict(data, model, user, item),
        Command::Batch {
            data,
            model,
            queries,
            output,
        } => handle_batch(data, model, queries, output),
        Command::Neighbors {
            data,
            model,
            user,
            size,
        } => handle_neighbors(data, model, user, *size),
        Command::Recommend {
            data,
            model,
            user,
            limit,
        } => handle_recommend(data, model, user, *limit),
        Command::Stats { data } => handle_stats(data),
    }
}
