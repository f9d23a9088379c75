//! One account's pass through a scenario

use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::condition::evaluate_condition;
use crate::executor::StepExecutor;
use crate::result::{AccountResult, StepResult};
use crate::scenario::{Account, Scenario};
use crate::Scope;

/// Run every step of `scenario` in order as `account`.
///
/// The account gets a scope of its own seeded with `username` and
/// `password`. Steps whose condition is false are skipped without a result;
/// the first failing step, or a condition that cannot be evaluated, ends the
/// run for this account.
pub async fn run_account(
    executor: &StepExecutor,
    scenario: &Scenario,
    account: &Account,
) -> AccountResult {
    let start = Instant::now();
    let mut scope = Scope::from([
        ("username".to_string(), account.username.clone()),
        ("password".to_string(), account.password.clone()),
    ]);

    let mut step_results = Vec::with_capacity(scenario.steps.len());
    let mut success = true;

    for step in &scenario.steps {
        match evaluate_condition(&step.condition, &scope) {
            Ok(true) => {}
            Ok(false) => {
                debug!(account = %account.username, step = %step.name, "Condition not met, skipping step");
                continue;
            }
            Err(e) => {
                step_results.push(StepResult::failure(
                    &step.name,
                    400,
                    Duration::ZERO,
                    format!("failed to evaluate condition: {}", e),
                ));
                success = false;
                break;
            }
        }

        let result = executor.execute(step, &mut scope).await;
        let failed = !result.success;
        step_results.push(result);

        if failed {
            success = false;
            break;
        }
    }

    let total_time = start.elapsed();
    info!(
        account = %account.username,
        success,
        elapsed_ms = total_time.as_millis() as u64,
        "Account finished scenario {}",
        scenario.name
    );

    AccountResult {
        username: account.username.clone(),
        step_results,
        total_time,
        success,
    }
}
