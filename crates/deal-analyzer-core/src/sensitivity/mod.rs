pub mod adjustments;
pub mod sweep;
pub mod table;

pub use adjustments::{
    apply_adjustments, run_scenario, ScenarioAdjustments, ScenarioInput, ScenarioOutput,
};
pub use sweep::{
    run_sensitivity, sweep, sweep_grid, sweep_range, ParameterPath, SensitivityGrid,
    SensitivityInput, SensitivityPoint, SensitivityResult,
};
pub use table::{exit_cap_rate_table, ExitCapSensitivityTable};
