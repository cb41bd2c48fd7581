// server/src/cli/handlers.rs

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use log::info;
use serde_json::{json, Value};

use lib::config::DEFAULT_CONFIG_FILE;
use lib::{create_storage, AppConfig, ErrorResponse, PrescriptionService, PrescriptionStore};
use models::{EntityRecord, PrescriptionDraft, PrescriptionError};

use super::commands::{CliArgs, RxCommand};

fn bad_request(message: String) -> ErrorResponse {
    ErrorResponse::new(400, "Bad Request", message)
}

fn read_input(path: &Path) -> Result<String, ErrorResponse> {
    fs::read_to_string(path).map_err(|e| bad_request(format!("Cannot read {}: {}", path.display(), e)))
}

fn parse_date(text: &str) -> Result<NaiveDate, ErrorResponse> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d").map_err(|_| bad_request("Invalid date format or request.".to_string()))
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<Value, ErrorResponse> {
    serde_json::to_value(value).map_err(|e| ErrorResponse::from(PrescriptionError::InvalidPrescription(e.to_string())))
}

/// Runs one command. `Err` carries the response to report instead of a result.
pub async fn handle_command(
    service: &PrescriptionService,
    store: &dyn PrescriptionStore,
    command: RxCommand,
) -> Result<Value, ErrorResponse> {
    match command {
        RxCommand::Seed { file } => {
            let records: Vec<EntityRecord> = serde_json::from_str(&read_input(&file)?)
                .map_err(|e| bad_request(format!("Invalid seed file: {}", e)))?;
            let count = records.len();
            for record in records {
                store.put_entity(record).await.map_err(PrescriptionError::from)?;
            }
            Ok(json!({ "seeded": count }))
        }
        RxCommand::Create { file } => {
            let draft = PrescriptionDraft::from_json(&read_input(&file)?)?;
            to_json(&service.create_prescription(draft).await?)
        }
        RxCommand::Update { id, file } => {
            let draft = PrescriptionDraft::from_json(&read_input(&file)?)?;
            to_json(&service.update_prescription(id, draft).await?)
        }
        RxCommand::Get { id } => to_json(&service.get_prescription_by_id(id).await?),
        RxCommand::List { user_id: Some(user_id), date: Some(date) } => {
            let date = parse_date(&date)?;
            let found = service.get_prescriptions_by_user_id_and_date(user_id, date).await?;
            if found.is_empty() {
                return Err(ErrorResponse::no_content("No prescriptions found for the given user and date."));
            }
            to_json(&found)
        }
        RxCommand::List { .. } => {
            let found = service.get_all_prescriptions().await?;
            if found.is_empty() {
                return Err(ErrorResponse::no_content("No prescriptions found."));
            }
            to_json(&found)
        }
        RxCommand::Delete { id } => {
            service.delete_prescription(id).await?;
            Ok(json!({ "message": "Prescription deleted successfully." }))
        }
    }
}

/// Entry point for the binary. Returns the process exit code.
pub async fn start_cli(args: CliArgs) -> Result<i32> {
    // Without --config, a rx.yaml in the working directory is picked up if present.
    let path = args.config.or_else(|| {
        let local = PathBuf::from(DEFAULT_CONFIG_FILE);
        local.exists().then_some(local)
    });
    let config = AppConfig::load_or_default(path.as_ref()).context("loading configuration")?;
    let store = create_storage(&config.storage).context("opening storage")?;
    let service = PrescriptionService::new(store.clone(), config.engine.clone());
    info!("Running {:?} with slot policy {:?}", args.command, config.engine.slot_policy);

    let outcome = handle_command(&service, store.as_ref(), args.command).await;
    store.flush().await.context("flushing storage")?;

    let (body, code) = match outcome {
        Ok(value) => (value, 0),
        Err(response) => {
            let code = if response.is_success() { 0 } else { 1 };
            (serde_json::to_value(&response)?, code)
        }
    };
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(code)
}
