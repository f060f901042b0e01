use crate::domain::collation::locale_cmp;
use crate::domain::policy::NameFallback;
use crate::domain::{DoorStatusEvent, DoorStatusView};

use super::ConfigSummaryIndex;

/// Decorate the latest door states for the door panel, sorted by name.
#[must_use]
pub fn build_door_board(
    events: Vec<DoorStatusEvent>,
    configs: &ConfigSummaryIndex,
) -> Vec<DoorStatusView> {
    let mut board: Vec<DoorStatusView> = events
        .into_iter()
        .map(|event| {
            let config = configs.get(&event.device_id);
            let (status_text, status_color) = if event.is_open {
                ("ABERTA (Virtual)", "red")
            } else {
                ("FECHADO", "green")
            };

            DoorStatusView {
                display_name: NameFallback::DoorPanel.resolve(
                    config.and_then(|c| c.display_name.as_deref()),
                    &event.device_id,
                ),
                status_text: status_text.to_string(),
                status_color: status_color.to_string(),
                is_configured: config.is_some(),
                event,
            }
        })
        .collect();

    board.sort_by(|a, b| locale_cmp(&a.display_name, &b.display_name));
    board
}
