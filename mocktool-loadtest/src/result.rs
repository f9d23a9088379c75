//! Per-step, per-account and per-run load test results

use mocktool_config::domains::utils::serde_duration_millis;
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use std::time::Duration;

/// Outcome of one step for one account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepResult {
    pub step_name: String,
    pub status_code: u16,
    #[serde(with = "serde_duration_millis")]
    pub duration: Duration,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl StepResult {
    pub fn success(step_name: impl Into<String>, status_code: u16, duration: Duration) -> Self {
        Self {
            step_name: step_name.into(),
            status_code,
            duration,
            success: true,
            error_message: None,
        }
    }

    pub fn failure(
        step_name: impl Into<String>,
        status_code: u16,
        duration: Duration,
        message: impl Into<String>,
    ) -> Self {
        Self {
            step_name: step_name.into(),
            status_code,
            duration,
            success: false,
            error_message: Some(message.into()),
        }
    }
}

/// Outcome of the whole scenario for one account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountResult {
    pub username: String,
    pub step_results: Vec<StepResult>,
    #[serde(with = "serde_duration_millis")]
    pub total_time: Duration,
    pub success: bool,
}

/// Aggregate of one load test run, account results in completion order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadTestResult {
    pub scenario_name: String,
    pub total_accounts: usize,
    pub success_count: usize,
    pub failure_count: usize,
    #[serde(with = "serde_duration_millis")]
    pub total_duration: Duration,
    #[serde(with = "serde_duration_millis")]
    pub avg_duration: Duration,
    pub account_results: Vec<AccountResult>,
}

impl LoadTestResult {
    pub fn empty(scenario_name: impl Into<String>) -> Self {
        Self {
            scenario_name: scenario_name.into(),
            total_accounts: 0,
            success_count: 0,
            failure_count: 0,
            total_duration: Duration::ZERO,
            avg_duration: Duration::ZERO,
            account_results: Vec::new(),
        }
    }

    /// Percentage of accounts that completed every step
    pub fn success_rate(&self) -> f64 {
        if self.total_accounts == 0 {
            return 0.0;
        }
        self.success_count as f64 / self.total_accounts as f64 * 100.0
    }

    /// Human-readable report with a breakdown of every failed account
    pub fn render_summary(&self) -> String {
        let mut out = String::new();
        // Writing to a String cannot fail
        let _ = writeln!(out, "Load Test Result: {}", self.scenario_name);
        let _ = writeln!(out, "Total Accounts: {}", self.total_accounts);
        let _ = writeln!(out, "Success: {}", self.success_count);
        let _ = writeln!(out, "Failure: {}", self.failure_count);
        let _ = writeln!(out, "Success Rate: {:.2}%", self.success_rate());
        let _ = writeln!(out, "Total Duration: {}ms", self.total_duration.as_millis());
        let _ = writeln!(out, "Avg Duration: {}ms", self.avg_duration.as_millis());

        for account in self.account_results.iter().filter(|a| !a.success) {
            let _ = writeln!(
                out,
                "Failed: {} (took {}ms)",
                account.username,
                account.total_time.as_millis()
            );
            for step in &account.step_results {
                let marker = if step.success { '✓' } else { '✗' };
                let _ = write!(
                    out,
                    "  {} {}: {}ms",
                    marker,
                    step.step_name,
                    step.duration.as_millis()
                );
                if let Some(message) = &step.error_message {
                    let _ = write!(out, " - {}", message);
                }
                out.push('\n');
            }
        }

        out
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
