use crate::correlation::{build_door_board, ConfigSummaryIndex};
use crate::domain::DoorStatusView;
use crate::error::AppResult;
use crate::store::TelemetryStore;

pub async fn door_board(store: &dyn TelemetryStore) -> AppResult<Vec<DoorStatusView>> {
    let (events, summaries) = tokio::try_join!(
        store.door_status_latest(),
        store.config_names_and_maintenance(),
    )?;

    Ok(build_door_board(events, &ConfigSummaryIndex::build(summaries)))
}
