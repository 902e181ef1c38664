//! Validation of finished metadata layers.
//!
//! Runs every check against a metadata layer after mount detection and
//! reports errors and warnings. All checks run even when an earlier one
//! fails, so a single pass shows every problem in the annotation image.
//! Used by both `tilebake validate` and `tilebake build`.

mod checks;
mod warning;

pub use checks::{
    check_breakable, check_collectibles, check_start_positions, check_teleport_positions,
    check_terminal_reactions,
};
pub use warning::{CellRef, Diagnostic, Severity, ValidationResult};

use crate::output::Printer;
use crate::types::{Collision, MetadataGrid, MetadataLayer};

/// Collectible limit of the game runtime.
pub const DEFAULT_MAX_COLLECTIBLES: usize = 84;

/// Run all validation checks against one metadata layer.
///
/// Collectible approach directions are resolved in place as a side effect.
pub fn validate_layer(layer: &mut MetadataLayer, max_collectibles: usize) -> ValidationResult {
    let mut result = ValidationResult::new();

    result.merge(check_breakable(&layer.grid));
    result.merge(check_collectibles(&mut layer.grid, max_collectibles));
    result.merge(check_terminal_reactions(&layer.grid));
    result.merge(check_start_positions(&layer.grid, &layer.positions.start));
    result.merge(check_teleport_positions(&layer.grid, &layer.positions.teleport));

    result
}

/// Drop collision from ghost cells. Ghosts count as solid while mounts are
/// detected and checked, and are passable in the exported table.
pub fn remove_ghosts(grid: &mut MetadataGrid) {
    for cell in grid.cells_mut() {
        if cell.ghost {
            cell.collision = Collision::None;
            cell.ghost = false;
        }
    }
}

/// Print diagnostics to stderr.
pub fn print_diagnostics(printer: &Printer, result: &ValidationResult) {
    for d in result.iter() {
        let is_error = d.severity == Severity::Error;
        let label = printer.severity(&d.severity.to_string(), is_error);
        eprintln!("  {}[{}]: {}", label, printer.bold(&d.code), d);
        if let Some(help) = &d.help {
            eprintln!("    {}: {}", printer.cyan("help"), help);
        }
    }

    let errors = result.error_count();
    let warnings = result.warning_count();

    if errors > 0 {
        printer.error(
            "Failed",
            &format!(
                "validation: {} error(s), {} warning(s)",
                errors, warnings
            ),
        );
    } else if warnings > 0 {
        printer.warning("Passed", &format!("validation ({} warning(s))", warnings));
    } else {
        printer.success("Passed", "validation");
    }
}
