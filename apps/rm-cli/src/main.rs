use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::Level;

use rm_app::{AppError, AppResult, EditOutcome, PassDesignSession, project_service};
use rm_core::UnitId;
use rm_grooves::{ConstraintStatus, GrooveFamily, GrooveParam, evaluate};
use rm_project::{FieldKind, IssueKind, PassDesign, UnitType};

#[derive(Parser)]
#[command(name = "rollmill")]
#[command(about = "Rolling-mill pass design checker", long_about = None)]
struct Cli {
    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the groove families and their optional-parameter rules
    Grooves,
    /// Show the parameters of one groove family
    Groove {
        /// Family identifier, e.g. BoxGroove
        family: String,
    },
    /// Evaluate a set of active optional parameters against a family
    Check {
        /// Family identifier
        family: String,
        /// Active optional parameter keys, e.g. r2 depth
        keys: Vec<String>,
    },
    /// Show the fields of a unit type
    Unit {
        /// TwoRollPass, ThreeRollPass, Transport or CoolingPipe
        unit_type: String,
    },
    /// Create a new design with one two-roll pass
    New {
        /// Output path (.yaml, .yml or .json)
        path: PathBuf,
        /// Design name
        #[arg(long, default_value = "Untitled")]
        name: String,
    },
    /// List the units of a design
    List {
        /// Path to the design file
        design_path: PathBuf,
    },
    /// Show the fields of one unit of a design
    Show {
        /// Path to the design file
        design_path: PathBuf,
        /// Unit id
        unit: u32,
    },
    /// Check that a design can be submitted to the simulation engine
    Validate {
        /// Path to the design file
        design_path: PathBuf,
    },
    /// Append a unit to a design
    Add {
        /// Path to the design file
        design_path: PathBuf,
        /// Unit type of the new row
        unit_type: String,
    },
    /// Set a field of a unit
    Set {
        /// Path to the design file
        design_path: PathBuf,
        /// Unit id
        unit: u32,
        /// Field key, e.g. gap, grooveType, transportDefineBy
        key: String,
        /// New value as typed
        value: String,
    },
    /// Set a groove parameter of a unit
    SetGroove {
        /// Path to the design file
        design_path: PathBuf,
        /// Unit id
        unit: u32,
        /// Groove parameter key, e.g. r1
        key: String,
        /// New value as typed
        value: String,
    },
    /// Switch an optional groove parameter on or off
    Toggle {
        /// Path to the design file
        design_path: PathBuf,
        /// Unit id
        unit: u32,
        /// Optional groove parameter key
        key: String,
    },
    /// Change the type of a unit, resetting its fields
    Retype {
        /// Path to the design file
        design_path: PathBuf,
        /// Unit id
        unit: u32,
        /// New unit type
        unit_type: String,
    },
    /// Remove a unit
    Remove {
        /// Path to the design file
        design_path: PathBuf,
        /// Unit id
        unit: u32,
    },
    /// Write the simulation-engine request for a design
    Request {
        /// Path to the design file
        design_path: PathBuf,
        /// Output JSON path
        #[arg(short, long, default_value = "request.json")]
        output: PathBuf,
    },
}

fn main() -> AppResult<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Grooves => cmd_grooves(),
        Commands::Groove { family } => cmd_groove(&family),
        Commands::Check { family, keys } => cmd_check(&family, &keys),
        Commands::Unit { unit_type } => cmd_unit(&unit_type),
        Commands::New { path, name } => cmd_new(&path, &name),
        Commands::List { design_path } => cmd_list(&design_path),
        Commands::Show { design_path, unit } => cmd_show(&design_path, unit),
        Commands::Validate { design_path } => cmd_validate(&design_path),
        Commands::Add {
            design_path,
            unit_type,
        } => cmd_add(&design_path, &unit_type),
        Commands::Set {
            design_path,
            unit,
            key,
            value,
        } => edit(&design_path, unit, |session, id| {
            session.set_field(id, &key, &value);
            session.commit_field(id, &key);
            Ok(())
        }),
        Commands::SetGroove {
            design_path,
            unit,
            key,
            value,
        } => edit(&design_path, unit, |session, id| {
            session.set_groove_param(id, &key, &value);
            Ok(())
        }),
        Commands::Toggle {
            design_path,
            unit,
            key,
        } => edit(&design_path, unit, |session, id| {
            session.toggle_optional_groove_param(id, &key);
            Ok(())
        }),
        Commands::Retype {
            design_path,
            unit,
            unit_type,
        } => {
            let unit_type = parse_unit_type(&unit_type)?;
            edit(&design_path, unit, |session, id| {
                session.change_unit_type(id, unit_type);
                Ok(())
            })
        }
        Commands::Remove { design_path, unit } => {
            edit(&design_path, unit, |session, id| session.remove_unit(id))
        }
        Commands::Request {
            design_path,
            output,
        } => cmd_request(&design_path, &output),
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn parse_family(family: &str) -> AppResult<GrooveFamily> {
    family
        .parse()
        .map_err(|e: rm_grooves::GrooveError| AppError::InvalidInput(e.to_string()))
}

fn parse_unit_type(unit_type: &str) -> AppResult<UnitType> {
    Ok(unit_type.parse::<UnitType>()?)
}

fn parse_unit_id(raw: u32) -> AppResult<UnitId> {
    UnitId::new(raw).ok_or_else(|| AppError::InvalidInput("unit ids start at 1".to_string()))
}

fn status_mark(status: ConstraintStatus) -> &'static str {
    match status {
        ConstraintStatus::Valid => "✓",
        ConstraintStatus::TooFew => "…",
        ConstraintStatus::TooMany | ConstraintStatus::Invalid => "✗",
    }
}

fn cmd_grooves() -> AppResult<()> {
    println!("Groove families:");
    for family in GrooveFamily::ALL {
        let schema = family.schema();
        if schema.rule.is_empty() {
            println!("  {}", family);
        } else {
            println!("  {} - {}", family, schema.rule);
        }
    }
    Ok(())
}

fn cmd_groove(family: &str) -> AppResult<()> {
    let family = parse_family(family)?;
    let schema = family.schema();

    println!("{}", family);
    println!("  Required:");
    for spec in schema.required {
        let unit = if spec.key.is_angle() { "°" } else { "m" };
        match spec.default {
            Some(default) => println!(
                "    {:<18} [{}] {} (default {})",
                spec.key.key(),
                unit,
                spec.tooltip,
                default
            ),
            None => println!("    {:<18} [{}] {}", spec.key.key(), unit, spec.tooltip),
        }
    }
    if !schema.optional.is_empty() {
        println!("  Optional:");
        for spec in schema.optional {
            let unit = if spec.key.is_angle() { "°" } else { "m" };
            println!("    {:<18} [{}] {}", spec.key.key(), unit, spec.tooltip);
        }
        println!("  Rule: {}", schema.rule);
        for (a, b) in schema.forbidden_pairs() {
            println!("  Never together: {} and {}", a, b);
        }
    }
    Ok(())
}

fn cmd_check(family: &str, keys: &[String]) -> AppResult<()> {
    let family = parse_family(family)?;
    let schema = family.schema();

    let mut active = Vec::with_capacity(keys.len());
    for key in keys {
        let param: GrooveParam = key
            .parse()
            .map_err(|e: rm_grooves::GrooveError| AppError::InvalidInput(e.to_string()))?;
        if !schema.is_optional(param) {
            return Err(AppError::InvalidInput(format!(
                "'{}' is not an optional parameter of {}",
                param, family
            )));
        }
        active.push(param);
    }

    let evaluation = evaluate(schema, active);
    println!("{} {}", status_mark(evaluation.status), evaluation.message);
    if evaluation.groups.len() > 1 {
        for group in &evaluation.groups {
            println!(
                "  {} {}: {}",
                status_mark(group.status),
                group.group,
                group.message
            );
        }
    }
    Ok(())
}

fn cmd_unit(unit_type: &str) -> AppResult<()> {
    let unit_type = parse_unit_type(unit_type)?;
    let schema = unit_type.schema();

    println!("{}", unit_type);
    for field in schema.fields {
        let kind = match field.kind {
            FieldKind::Number => "number",
            FieldKind::Text => "text",
            FieldKind::Select => "select",
            FieldKind::Groove => "groove",
        };
        let mut line = format!("  {:<30} {:<7} {}", field.key, kind, field.label);
        if !field.unit.is_empty() {
            line.push_str(&format!(" [{}]", field.unit));
        }
        if let Some(partner) = field.mutually_exclusive_with() {
            line.push_str(&format!(" (or {})", partner));
        }
        if let Some(selector) = field.unit_selector() {
            line.push_str(&format!(" (unit from {})", selector));
        }
        println!("{}", line);
        if !field.options.is_empty() {
            println!("      options: {}", field.options.join(", "));
        }
    }
    Ok(())
}

fn cmd_new(path: &Path, name: &str) -> AppResult<()> {
    project_service::save_design(path, &PassDesign::new(name))?;
    println!("✓ Created {}", path.display());
    Ok(())
}

fn cmd_list(design_path: &Path) -> AppResult<()> {
    let design = project_service::load_design(design_path)?;
    let profile = project_service::describe_profile(&design);
    println!("{} ({} units):", design.name, design.units.len());
    println!(
        "  in: {} {:.1} mm², {:.0} °C, {}",
        profile.shape, profile.area_mm2, profile.temperature_c, profile.material
    );
    for unit in project_service::list_units(&design) {
        let label = if unit.label.is_empty() {
            String::new()
        } else {
            format!(" \"{}\"", unit.label)
        };
        match (&unit.groove, unit.groove_status, &unit.groove_message) {
            (Some(groove), Some(status), Some(message)) => println!(
                "  {} {}{} - {} {} {}",
                unit.id,
                unit.unit_type,
                label,
                groove,
                status_mark(status),
                message
            ),
            _ => match unit.span {
                Some(span) => println!("  {} {}{} - {}", unit.id, unit.unit_type, label, span),
                None => println!("  {} {}{}", unit.id, unit.unit_type, label),
            },
        }
    }
    Ok(())
}

fn cmd_show(design_path: &Path, unit: u32) -> AppResult<()> {
    let id = parse_unit_id(unit)?;
    let design = project_service::load_design(design_path)?;
    for row in project_service::describe_unit(&design, id)? {
        if row.unit.is_empty() {
            println!("  {:<30} {}", row.label, row.value);
        } else {
            println!("  {:<30} {} {}", row.label, row.value, row.unit);
        }
    }
    Ok(())
}

fn cmd_validate(design_path: &Path) -> AppResult<()> {
    println!("Validating design: {}", design_path.display());
    let design = project_service::load_design(design_path)?;
    match project_service::validate_design(&design) {
        Ok(()) => {
            println!("✓ Design is ready for simulation");
            Ok(())
        }
        Err(AppError::NotSubmittable(issues)) => {
            for issue in &issues {
                let mark = match issue.kind {
                    IssueKind::PlaceholderValue => "…",
                    _ => "✗",
                };
                println!("  {} {}", mark, issue);
            }
            Err(AppError::NotSubmittable(issues))
        }
        Err(other) => Err(other),
    }
}

fn cmd_add(design_path: &Path, unit_type: &str) -> AppResult<()> {
    let unit_type = parse_unit_type(unit_type)?;
    let mut session = PassDesignSession::new(project_service::load_design(design_path)?)?;
    let id = session.add_unit(unit_type)?;
    project_service::save_design(design_path, session.design())?;
    println!("✓ Added {} as unit {}", unit_type, id);
    Ok(())
}

/// Load a design, apply one edit to an existing unit and save it back.
fn edit(
    design_path: &Path,
    unit: u32,
    apply: impl FnOnce(&mut PassDesignSession, UnitId) -> AppResult<()>,
) -> AppResult<()> {
    let id = parse_unit_id(unit)?;
    let mut session = PassDesignSession::new(project_service::load_design(design_path)?)?;

    match session.edit_unit(id, apply)? {
        EditOutcome::Unchanged => {
            println!("Unit {} unchanged", id);
            return Ok(());
        }
        EditOutcome::Removed => {
            project_service::save_design(design_path, session.design())?;
            println!("✓ Removed unit {}", id);
            return Ok(());
        }
        EditOutcome::Updated => project_service::save_design(design_path, session.design())?,
    }

    if let Some(unit) = session.unit(id) {
        println!("✓ Updated unit {} ({})", id, unit.unit_type());
    }
    if let Some(evaluation) = session.groove_status(id) {
        println!("  {} {}", status_mark(evaluation.status), evaluation.message);
        for warning in &evaluation.warnings {
            println!("  ! {}", warning);
        }
    }
    Ok(())
}

fn cmd_request(design_path: &Path, output: &Path) -> AppResult<()> {
    let design = project_service::load_design(design_path)?;
    let request = project_service::write_request(&design, output)?;
    println!(
        "✓ Wrote {} ({} units, {})",
        output.display(),
        request.pass_design_data.len(),
        request.solve_method
    );
    Ok(())
}
