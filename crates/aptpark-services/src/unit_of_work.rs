//! Finishing the one transaction of a mutating operation.

use crate::console::Console;
use crate::error::{Outcome, ServiceResult};
use crate::messages::DisplayMessages;
use aptpark_storage::transaction::{self, Tx};
use tracing::error;

/// Commit on `Done`, end on `Rejected` or `Cancelled`, roll back on error.
///
/// Rejections and cancellations are announced on the console here so the
/// operation bodies only return them.
pub(crate) async fn settle<T>(
    tx: Tx,
    console: &mut impl Console,
    result: ServiceResult<Outcome<T>>,
) -> ServiceResult<Outcome<T>> {
    match result {
        Ok(Outcome::Done(value)) => {
            transaction::commit(tx).await?;
            Ok(Outcome::Done(value))
        }
        Ok(outcome) => {
            transaction::end(tx).await;
            announce(console, &outcome);
            Ok(outcome)
        }
        Err(e) => {
            error!(error = %e, "Operation failed, rolling back");
            transaction::rollback(tx).await;
            Err(e)
        }
    }
}

/// Print why an operation stopped.
pub(crate) fn announce<T>(console: &mut impl Console, outcome: &Outcome<T>) {
    match outcome {
        Outcome::Done(_) => {}
        Outcome::Rejected(rejection) => console.say(&rejection.to_string()),
        Outcome::Cancelled => console.say(DisplayMessages::OPERATION_CANCELLED),
    }
}
