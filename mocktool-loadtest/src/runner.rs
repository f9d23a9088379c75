//! Multi-account load runner

use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::account::run_account;
use crate::executor::StepExecutor;
use crate::result::{AccountResult, LoadTestResult};
use crate::scenario::{Account, Scenario};

/// Runs a scenario once per account across a fixed pool of workers
#[derive(Debug, Clone)]
pub struct LoadRunner {
    executor: Arc<StepExecutor>,
    max_concurrency: usize,
}

impl LoadRunner {
    pub fn new(executor: Arc<StepExecutor>, max_concurrency: usize) -> Self {
        Self {
            executor,
            max_concurrency: max_concurrency.max(1),
        }
    }

    /// Worker count for a scenario: its concurrency clamped to
    /// `1..=accounts`, then capped by the runner's own limit
    pub fn worker_count(&self, concurrency: usize, accounts: usize) -> usize {
        concurrency
            .clamp(1, accounts.max(1))
            .min(self.max_concurrency)
    }

    /// Execute `scenario` for every account and aggregate the outcome.
    ///
    /// Account failures are recorded in the result and never abort the run.
    /// Account results appear in completion order.
    pub async fn run(&self, scenario: &Scenario, accounts: Vec<Account>) -> LoadTestResult {
        let total_accounts = accounts.len();
        if total_accounts == 0 {
            return LoadTestResult::empty(&scenario.name);
        }

        let workers = self.worker_count(scenario.concurrency, total_accounts);
        info!(
            scenario = %scenario.name,
            accounts = total_accounts,
            workers,
            "Starting load test"
        );

        let start = Instant::now();
        let scenario = Arc::new(scenario.clone());

        let (dispatch_tx, dispatch_rx) = mpsc::channel::<Account>(total_accounts);
        for account in accounts {
            if dispatch_tx.send(account).await.is_err() {
                break;
            }
        }
        drop(dispatch_tx);

        let dispatch_rx = Arc::new(Mutex::new(dispatch_rx));
        let (result_tx, mut result_rx) = mpsc::channel::<AccountResult>(total_accounts);

        let mut handles: Vec<JoinHandle<()>> = Vec::with_capacity(workers);
        for _ in 0..workers {
            let dispatch_rx = Arc::clone(&dispatch_rx);
            let result_tx = result_tx.clone();
            let executor = Arc::clone(&self.executor);
            let scenario = Arc::clone(&scenario);

            handles.push(tokio::spawn(async move {
                loop {
                    let next = dispatch_rx.lock().await.recv().await;
                    let Some(account) = next else {
                        break;
                    };

                    let result = run_account(&executor, &scenario, &account).await;
                    if result_tx.send(result).await.is_err() {
                        break;
                    }
                }
            }));
        }
        drop(result_tx);

        for handle in handles {
            if let Err(e) = handle.await {
                error!("Load test worker terminated abnormally: {}", e);
            }
        }

        let mut result = LoadTestResult::empty(&scenario.name);
        result.total_accounts = total_accounts;
        while let Some(account_result) = result_rx.recv().await {
            if account_result.success {
                result.success_count += 1;
            } else {
                result.failure_count += 1;
            }
            result.account_results.push(account_result);
        }

        result.total_duration = start.elapsed();
        let ran = result.account_results.len();
        if ran > 0 {
            let sum: Duration = result.account_results.iter().map(|r| r.total_time).sum();
            result.avg_duration = sum / ran as u32;
        }

        info!(
            scenario = %result.scenario_name,
            success = result.success_count,
            failure = result.failure_count,
            elapsed_ms = result.total_duration.as_millis() as u64,
            "Load test finished"
        );

        result
    }
}
