//! Room listing.

use serde::Serialize;
use tabled::Tabled;

use adax_core::{Bridge, HeatingState, Remote, Room, RoomId, TargetMode, ThermostatState};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::host::ConsoleHost;
use crate::output;

/// One room as printed by `adax rooms`.
#[derive(Debug, Serialize)]
pub struct RoomView {
    pub id: RoomId,
    pub name: String,
    pub current_celsius: Option<f64>,
    pub target_celsius: Option<f64>,
    pub heating: HeatingState,
    pub power_watts: Option<f64>,
    pub heating_enabled: Option<bool>,
}

impl From<&Room> for RoomView {
    fn from(room: &Room) -> Self {
        Self {
            id: room.id,
            name: room.display_name(),
            current_celsius: room.current_temperature.map(|t| t.to_celsius()),
            target_celsius: room.target_temperature.map(|t| t.to_celsius()),
            heating: ThermostatState::derive(room, TargetMode::Heat).heating,
            power_watts: room.energy_watts,
            heating_enabled: room.heating_enabled,
        }
    }
}

#[derive(Tabled)]
struct RoomRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Current")]
    current: String,
    #[tabled(rename = "Target")]
    target: String,
    #[tabled(rename = "Heating")]
    heating: String,
    #[tabled(rename = "Power")]
    power: String,
}

fn celsius(value: Option<f64>) -> String {
    value.map_or_else(|| "-".into(), |c| format!("{c:.1} °C"))
}

fn row(view: &RoomView, color: bool) -> RoomRow {
    RoomRow {
        id: view.id.to_string(),
        name: view.name.clone(),
        current: celsius(view.current_celsius),
        target: celsius(view.target_celsius),
        heating: output::heating_label(view.heating, color),
        power: view
            .power_watts
            .map_or_else(|| "-".into(), |w| format!("{w:.0} W")),
    }
}

pub async fn handle(bridge: &Bridge<Remote, ConsoleHost>, global: &GlobalOpts) -> Result<(), CliError> {
    let snapshot = bridge.rooms().await?;
    let views: Vec<RoomView> = snapshot.rooms.iter().map(RoomView::from).collect();
    let color = output::should_color(&global.color);

    let out = output::render_list(
        &global.output,
        &views,
        |v| row(v, color),
        |v| v.id.to_string(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
