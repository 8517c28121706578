use std::sync::Arc;

use serde::Serialize;

use dealflow_core::config::{AppConfig, LoadOptions};
use dealflow_sheets::{GoogleSheetsStore, RowStore, SheetsCredentials};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

pub fn run(json_output: bool) -> String {
    let report = build_report();

    if json_output {
        return serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}",
                error.to_string().replace('"', "\\\"")
            )
        });
    }

    render_human(&report)
}

fn build_report() -> DoctorReport {
    let mut checks = Vec::new();

    match AppConfig::load(LoadOptions::default()) {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: "configuration loaded and validated".to_string(),
            });

            match SheetsCredentials::load(&config.sheets.token_path) {
                Ok(credentials) => {
                    checks.push(DoctorCheck {
                        name: "sheets_credentials",
                        status: CheckStatus::Pass,
                        details: "bearer token loaded".to_string(),
                    });
                    checks.push(check_sheets_connectivity(&config, credentials));
                }
                Err(error) => {
                    checks.push(DoctorCheck {
                        name: "sheets_credentials",
                        status: CheckStatus::Fail,
                        details: error.to_string(),
                    });
                    checks.push(DoctorCheck {
                        name: "sheets_connectivity",
                        status: CheckStatus::Skipped,
                        details: "skipped because credentials did not load".to_string(),
                    });
                }
            }
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            });
            checks.push(DoctorCheck {
                name: "sheets_credentials",
                status: CheckStatus::Skipped,
                details: "skipped because configuration did not load".to_string(),
            });
            checks.push(DoctorCheck {
                name: "sheets_connectivity",
                status: CheckStatus::Skipped,
                details: "skipped because configuration did not load".to_string(),
            });
        }
    }

    let all_pass = checks.iter().all(|check| check.status == CheckStatus::Pass);
    let overall_status = if all_pass { CheckStatus::Pass } else { CheckStatus::Fail };
    let summary = if all_pass {
        "doctor: all readiness checks passed".to_string()
    } else {
        "doctor: one or more readiness checks failed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

fn check_sheets_connectivity(config: &AppConfig, credentials: SheetsCredentials) -> DoctorCheck {
    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return DoctorCheck {
                name: "sheets_connectivity",
                status: CheckStatus::Fail,
                details: format!("failed to initialize async runtime: {error}"),
            };
        }
    };

    let result = runtime.block_on(async {
        let store = GoogleSheetsStore::new(&config.sheets, credentials)
            .map_err(|error| error.to_string())?;
        let store: Arc<dyn RowStore> = Arc::new(store);
        let deals = store.fetch_all().await.map_err(|error| error.to_string())?;
        Ok::<usize, String>(deals.len())
    });

    match result {
        Ok(count) => DoctorCheck {
            name: "sheets_connectivity",
            status: CheckStatus::Pass,
            details: format!("spreadsheet reachable, {count} deal(s) in pipeline"),
        },
        Err(details) => DoctorCheck { name: "sheets_connectivity", status: CheckStatus::Fail, details },
    }
}

fn render_human(report: &DoctorReport) -> String {
    let mut output = String::new();
    output.push_str(&report.summary);
    output.push('\n');
    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "FAIL",
            CheckStatus::Skipped => "skip",
        };
        output.push_str(&format!("  [{marker}] {}: {}\n", check.name, check.details));
    }
    output
}
