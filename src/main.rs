// Entry point and high-level console flow.
//
// One full pipeline pass (load -> resolve -> filter -> aggregate -> render)
// runs per user interaction; the loader's TTL cache guarantees that filter
// changes never trigger a second network fetch inside the cache window.
use std::io::{self, Write};

use inventario::aggregate;
use inventario::columns;
use inventario::config::DashboardConfig;
use inventario::filter::{self, FilterAction, FilterState};
use inventario::loader::{self, LoadMode};
use inventario::output;
use inventario::source::CsvDirSource;
use inventario::types::{Notice, RecordSet, SummaryStats};
use inventario::util::{format_int, format_number};

/// Read a single line of input after printing a prompt.
fn read_line(prompt: &str) -> String {
    print!("{}", prompt);
    let _ = io::stdout().flush();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf.trim().to_string()
}

/// Load the equipment sheet and materialize the filtered grid view for the
/// given filter state. Returns the view plus every notice the pipeline
/// produced along the way.
fn equipment_view(
    cfg: &DashboardConfig,
    source: &CsvDirSource,
    state: &FilterState,
) -> (RecordSet, Vec<Notice>) {
    let outcome = loader::load(
        source,
        &cfg.equipment_sheet,
        LoadMode::HeaderFirstRow,
        cfg.equipment_ttl_secs,
    );
    let mut notices = outcome.notices;
    let (view, filter_notices) = filter::apply(&outcome.records, state);
    notices.extend(filter_notices);
    (view, notices)
}

/// Render the equipment dashboard once: charts from the graph sheet, the
/// per-state series, then the filtered grid.
fn render_equipment(cfg: &DashboardConfig, source: &CsvDirSource, state: &FilterState) {
    let graph = loader::load(
        source,
        &cfg.graph_sheet,
        LoadMode::HeaderFirstRow,
        cfg.equipment_ttl_secs,
    );
    output::print_notices(&graph.notices);

    let shares = aggregate::group_sum(&graph.records, "Etiqueta", Some("Equipos"), false);
    output::print_share_table("Inventario de Equipos de Computo Asignados", &shares);
    output::print_gauge(
        "Equipos activos",
        aggregate::percentage("ACTIVOS", "TOTAL", &shares),
    );

    let (view, notices) = equipment_view(cfg, source, state);
    output::print_notices(&notices);

    let mut by_state = aggregate::group_sum(&view, "Estado", None, true);
    aggregate::sort_by_label(&mut by_state);
    output::print_series("Equipos por estado", &by_state);

    match aggregate::cost_summary(&view, &cfg.cost_column) {
        Some(summary) => println!(
            "Costo total: {}  |  promedio: {}  ({} equipos)\n",
            format_number(summary.total, 2),
            format_number(summary.mean, 2),
            format_int(summary.counted as i64)
        ),
        None => println!("Costo: no disponible\n"),
    }

    if let Some(active) = &state.status {
        println!("Filtro de estatus activo: {}", active);
    }
    if let Some(region) = &state.region {
        println!("Filtro de región activo: {}", region);
    }
    if let Some(query) = &state.query {
        println!("Búsqueda: {}", query);
    }
    output::print_grid(&view, 25);
}

/// The equipment dashboard interaction loop. Each action is folded through
/// the pure reducer and the whole view re-renders from cached data.
fn equipment_dashboard(cfg: &DashboardConfig, source: &CsvDirSource, state: &mut FilterState) {
    loop {
        render_equipment(cfg, source, state);
        for (i, status) in cfg.status_values.iter().enumerate() {
            let marker = if state.status.as_deref() == Some(status.as_str()) {
                "*"
            } else {
                " "
            };
            println!("[{}]{} {}", i + 1, marker, status);
        }
        println!("[R] Filtrar región  [X] Quitar filtro de región");
        println!("[F] Buscar  [C] Limpiar búsqueda  [B] Volver\n");

        let choice = read_line("Enter choice: ");
        let action = match choice.to_uppercase().as_str() {
            "B" => return,
            "R" => {
                let region = read_line("Región (como aparece en la serie por estado): ");
                if region.is_empty() {
                    continue;
                }
                FilterAction::ToggleRegion(region)
            }
            "X" => FilterAction::ClearRegion,
            "F" => FilterAction::SetQuery(read_line("Buscar: ")),
            "C" => FilterAction::SetQuery(String::new()),
            other => match other.parse::<usize>() {
                Ok(n) if n >= 1 && n <= cfg.status_values.len() => {
                    FilterAction::ToggleStatus(cfg.status_values[n - 1].clone())
                }
                _ => {
                    println!("Invalid choice.\n");
                    continue;
                }
            },
        };
        *state = filter::reduce(state, action);
    }
}

/// The phone directory: offset-header load, fixed ACTIVA filter, desired
/// column resolution with fail-open, free-text search.
fn phone_directory(cfg: &DashboardConfig, source: &CsvDirSource) {
    let mut query = FilterState::default();
    loop {
        let outcome = loader::load(
            source,
            &cfg.phone_sheet,
            LoadMode::HeaderAtRow(cfg.phone_header_row),
            cfg.phone_ttl_secs,
        );
        output::print_notices(&outcome.notices);

        let active_only = filter::reduce(
            &FilterState::default(),
            FilterAction::ToggleStatus("ACTIVA".to_string()),
        );
        let (actives, notices) = filter::apply(&outcome.records, &active_only);
        output::print_notices(&notices);

        let resolution = columns::resolve(&cfg.phone_columns, &actives);
        if resolution.fail_open {
            output::print_notices(&[Notice::info(
                "None of the configured columns matched; showing all columns.",
            )]);
        }
        let projected = actives.select(&resolution.columns);
        let (view, _) = filter::apply(&projected, &query);

        println!("Equipos Telefónicos (ACTIVA)");
        output::print_grid(&view, 25);

        println!("[F] Buscar  [C] Limpiar búsqueda  [B] Volver\n");
        match read_line("Enter choice: ").to_uppercase().as_str() {
            "B" => return,
            "F" => query = filter::reduce(&query, FilterAction::SetQuery(read_line("Buscar: "))),
            "C" => query = filter::reduce(&query, FilterAction::SetQuery(String::new())),
            _ => println!("Invalid choice.\n"),
        }
    }
}

/// Export the current equipment view as CSV plus a JSON stats summary.
fn export_equipment(cfg: &DashboardConfig, source: &CsvDirSource, state: &FilterState) {
    let outcome = loader::load(
        source,
        &cfg.equipment_sheet,
        LoadMode::HeaderFirstRow,
        cfg.equipment_ttl_secs,
    );
    let (view, notices) = filter::apply(&outcome.records, state);
    output::print_notices(&outcome.notices);
    output::print_notices(&notices);

    let csv_path = "equipos_filtrados.csv";
    if let Err(e) = output::write_csv(csv_path, &view) {
        eprintln!("Write error: {}", e);
        return;
    }

    let costs = aggregate::cost_summary(&view, &cfg.cost_column);
    let summary = SummaryStats {
        total_rows: outcome.records.len(),
        visible_rows: view.len(),
        active_status: state.status.clone(),
        active_region: state.region.clone(),
        query: state.query.clone(),
        cost_total: costs.as_ref().map(|c| c.total),
        cost_mean: costs.as_ref().map(|c| c.mean),
    };
    if let Err(e) = output::write_json("summary.json", &summary) {
        eprintln!("Write error: {}", e);
        return;
    }
    println!(
        "Exported {} of {} rows to {} (stats in summary.json)\n",
        format_int(summary.visible_rows as i64),
        format_int(summary.total_rows as i64),
        csv_path
    );
}

fn main() {
    env_logger::init();
    let cfg = DashboardConfig::load("config.json");
    let source = CsvDirSource::new("inventario", &cfg.data_dir);

    // The filter state lives for the whole session and is only ever replaced
    // through the reducer.
    let mut equipment_filters = FilterState::default();

    loop {
        println!("Inventario");
        println!("[1] Equipos de cómputo");
        println!("[2] Equipos telefónicos");
        println!("[3] Exportar vista actual");
        println!("[4] Refrescar datos");
        println!("[Q] Salir\n");
        match read_line("Enter choice: ").to_uppercase().as_str() {
            "1" => equipment_dashboard(&cfg, &source, &mut equipment_filters),
            "2" => phone_directory(&cfg, &source),
            "3" => export_equipment(&cfg, &source, &equipment_filters),
            "4" => {
                loader::invalidate_cache();
                println!("Cache cleared; next view will fetch fresh data.\n");
            }
            "Q" => {
                println!("Exiting the program.");
                break;
            }
            _ => println!("Invalid choice.\n"),
        }
    }
}
