use anyhow::{ensure, Result};
use dotenv::dotenv;
use env_logger;
use log::{error, info};
use srwto_dscr::config::AppConfig;
use srwto_dscr::models::{FieldKey, FieldStore, Unit};
use srwto_dscr::services::payload::build_payload;
use srwto_dscr::services::presenter::{is_flagged_invalid, summarize};
use srwto_dscr::services::suggestion::apply_suggestion;
use srwto_dscr::services::workflow::{Operation, Phase, Workflow, WorkflowState};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;

const HELP: &str = "\
Commands:
  show                  list every field
  set <field> [value]   change a field (no value clears it)
  touch <field>         mark a field as visited
  payload               print the request that would be sent
  calc                  calculate DSCR
  pdf                   download the filled PDF
  result                show the last result
  apply                 copy the suggested inputs into the form
  help                  this text
  quit                  leave";

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenv().ok();
    env_logger::init();
    info!("Logger initialized. Starting the DSCR form...");

    let config = AppConfig::from_env();
    ensure!(
        config.download_dir.is_dir(),
        "download directory {} does not exist",
        config.download_dir.display()
    );

    let workflow = Workflow::from_config(&config);
    tokio::spawn(report_progress(workflow.subscribe()));

    let mut store = FieldStore::default();
    println!("SRWTO DSCR Calculator");
    println!("{}", HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            continue;
        };

        match command {
            "show" => show_fields(&store, &workflow.state()),
            "set" => match words.next().map(str::parse::<FieldKey>) {
                Some(Ok(key)) => {
                    let value = words.collect::<Vec<_>>().join(" ");
                    store = store.with_value(key, value);
                }
                Some(Err(e)) => println!("{}", e),
                None => println!("usage: set <field> [value]"),
            },
            "touch" => match words.next().map(str::parse::<FieldKey>) {
                Some(Ok(key)) => workflow.mark_touched(key),
                Some(Err(e)) => println!("{}", e),
                None => println!("usage: touch <field>"),
            },
            "payload" => match serde_json::to_string_pretty(&build_payload(&store)) {
                Ok(json) => println!("{}", json),
                Err(e) => error!("Failed to render payload: {}", e),
            },
            "calc" | "pdf" if workflow.state().loading => {
                println!("Busy, wait for the current request to finish");
            }
            "calc" => match workflow.compute(&store).await {
                Ok(_) => show_result(&workflow.state()),
                Err(_) => show_error(&workflow.state()),
            },
            "pdf" => match workflow.download(&store).await {
                Ok(path) => println!("Saved {}", path.display()),
                Err(_) => show_error(&workflow.state()),
            },
            "result" => show_result(&workflow.state()),
            "apply" => {
                let state = workflow.state();
                if state.result.is_none() {
                    println!("No result to apply");
                } else {
                    store = apply_suggestion(&store, state.result.as_ref());
                    show_fields(&store, &state);
                }
            }
            "help" => println!("{}", HELP),
            "quit" | "exit" => break,
            other => println!("unknown command '{}', try 'help'", other),
        }
    }

    info!("Form closed");
    Ok(())
}

/// Prints a progress line whenever a request goes out.
async fn report_progress(mut updates: watch::Receiver<WorkflowState>) {
    while updates.changed().await.is_ok() {
        let phase = updates.borrow_and_update().phase;
        match phase {
            Phase::Submitting(Operation::Compute) => println!("Calculating..."),
            Phase::Submitting(Operation::Download) => println!("Generating..."),
            _ => {}
        }
    }
}

fn show_error(state: &WorkflowState) {
    if let Some(message) = &state.error {
        println!("Error: {}", message);
    }
}

fn show_fields(store: &FieldStore, state: &WorkflowState) {
    for (key, value) in store.iter() {
        let unit = match key.unit() {
            Unit::Monthly => "per month",
            Unit::Annual => "per year",
            Unit::Plain => "",
        };
        let flag = if is_flagged_invalid(key, store, state) { " (required)" } else { "" };
        println!("{:<22} {:>12}  {:<10} {}{}", key.name(), value, unit, key.label(), flag);
    }
}

fn show_result(state: &WorkflowState) {
    match summarize(state.result.as_ref()) {
        Some(summary) => {
            println!("Baseline DSCR:           {}", summary.baseline_dscr);
            println!("Final DSCR (suggestion): {}", summary.final_dscr);
            println!("{}", summary.breakdown);
        }
        None => println!("No result yet"),
    }
}
