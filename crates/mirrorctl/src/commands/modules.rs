//! Module command handlers.

use serde_json::json;
use tabled::Tabled;

use mirrorctl_core::{AppState, Mirror, ModuleDescriptor};

use crate::cli::{GlobalOpts, ModulesArgs, ModulesCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
pub(super) struct AppRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Module")]
    module: String,
    #[tabled(rename = "Mirror")]
    mirror: String,
    #[tabled(rename = "Dashboard")]
    dashboard: String,
}

pub(super) fn app_row(app: &AppState, color: bool) -> AppRow {
    AppRow {
        id: app.id.clone(),
        name: app.display_name(),
        module: app.name.clone(),
        mirror: output::visibility_label(app.is_visible_on_mirror, color),
        dashboard: output::visibility_label(!app.is_hidden_from_dashboard, color),
    }
}

pub(super) fn app_detail(app: &AppState) -> String {
    let mut lines = vec![
        format!("ID:        {}", app.id),
        format!("Name:      {}", app.display_name()),
        format!("Module:    {}", app.name),
    ];
    if let Some(ref longname) = app.longname {
        lines.push(format!("Long name: {longname}"));
    }
    if let Some(ref desc) = app.desc {
        lines.push(format!("About:     {desc}"));
    }
    lines.push(format!(
        "Mirror:    {}",
        if app.is_visible_on_mirror { "visible" } else { "hidden" }
    ));
    lines.push(format!(
        "Dashboard: {}",
        if app.is_hidden_from_dashboard { "hidden" } else { "visible" }
    ));
    lines.join("\n")
}

#[derive(Tabled)]
struct DescriptorRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Long name")]
    longname: String,
    #[tabled(rename = "Description")]
    desc: String,
}

fn descriptor_row(m: &ModuleDescriptor) -> DescriptorRow {
    DescriptorRow {
        name: m.name.clone(),
        longname: m.longname.clone().unwrap_or_default(),
        desc: m.desc.clone().unwrap_or_default(),
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(mirror: &Mirror, args: ModulesArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let color = output::should_color(&global.color);

    match args.command {
        ModulesCommand::List => {
            util::load_apps(mirror, global.quiet).await?;
            let apps = mirror.apps_snapshot();
            let out = output::render_list(&global.output, apps.as_slice(), |a| app_row(a, color), |a| a.id.clone());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ModulesCommand::Installed => {
            let modules = mirror.installed_modules().await?;
            print_descriptors(&modules, global);
            Ok(())
        }

        ModulesCommand::Available => {
            let modules = mirror.available_modules().await?;
            print_descriptors(&modules, global);
            Ok(())
        }

        ModulesCommand::Show { module } => set_visibility(mirror, &module, Some(true), global).await,
        ModulesCommand::Hide { module } => set_visibility(mirror, &module, Some(false), global).await,
        ModulesCommand::Toggle { module } => set_visibility(mirror, &module, None, global).await,

        ModulesCommand::Actions { module } => {
            let actions = mirror.module_actions(&module).await?;
            output::print_output(&output::render_value(&global.output, &actions), global.quiet);
            Ok(())
        }

        ModulesCommand::Exec { module, action } => {
            let result = mirror.execute_module_action(&module, &action).await?;
            if !global.quiet {
                eprintln!("✓ Ran '{action}' on {module}");
            }
            print_if_meaningful(&result, global);
            Ok(())
        }

        ModulesCommand::Update { module } => {
            let result = mirror.update_module(&module).await?;
            if !global.quiet {
                eprintln!("✓ Update requested for {module}");
            }
            print_if_meaningful(&result, global);
            Ok(())
        }

        ModulesCommand::Install { url, from_file } => {
            let body = match (from_file, url) {
                (Some(path), _) => util::read_json_file(&path)?,
                (None, Some(url)) => json!({ "url": url }),
                (None, None) => {
                    return Err(CliError::Validation {
                        field: "url".into(),
                        reason: "a repository URL or --from-file is required".into(),
                    });
                }
            };
            let result = mirror.install_module(&body).await?;
            if !global.quiet {
                eprintln!("✓ Install requested");
            }
            print_if_meaningful(&result, global);
            Ok(())
        }
    }
}

/// Drive a module to the wanted visibility (`None` flips it).
async fn set_visibility(
    mirror: &Mirror,
    key: &str,
    want_visible: Option<bool>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let app = util::resolve_app(mirror, key).await?;

    let app = if want_visible.is_some_and(|v| v == app.is_visible_on_mirror) {
        if !global.quiet {
            eprintln!("{} is already {}", app.display_name(), visibility_word(app.is_visible_on_mirror));
        }
        app
    } else {
        let updated = mirror.toggle_mirror_visibility(&app.id).await?;
        if !global.quiet {
            eprintln!("✓ {} is now {}", updated.display_name(), visibility_word(updated.is_visible_on_mirror));
        }
        updated
    };

    let out = output::render_single(&global.output, &app, app_detail, |a| a.id.clone());
    output::print_output(&out, global.quiet);
    Ok(())
}

fn visibility_word(visible: bool) -> &'static str {
    if visible { "visible" } else { "hidden" }
}

fn print_descriptors(modules: &[ModuleDescriptor], global: &GlobalOpts) {
    let out = output::render_list(&global.output, modules, descriptor_row, |m| m.name.clone());
    output::print_output(&out, global.quiet);
}

/// Print a pass-through payload unless it carries nothing.
pub(super) fn print_if_meaningful(value: &serde_json::Value, global: &GlobalOpts) {
    let empty = match value {
        serde_json::Value::Null => true,
        serde_json::Value::Object(map) => map.is_empty(),
        _ => false,
    };
    if !empty {
        output::print_output(&output::render_value(&global.output, value), global.quiet);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> AppState {
        AppState {
            id: "module_2_MMM-AccuWeatherForecastDeluxe".into(),
            name: "MMM-AccuWeatherForecastDeluxe".into(),
            longname: None,
            desc: Some("Forecast".into()),
            is_visible_on_mirror: false,
            is_hidden_from_dashboard: false,
        }
    }

    #[test]
    fn detail_uses_display_name_and_states() {
        let detail = app_detail(&app());
        assert!(detail.contains("Name:      Weather"));
        assert!(detail.contains("Mirror:    hidden"));
        assert!(detail.contains("Dashboard: visible"));
        assert!(!detail.contains("Long name"));
    }

    #[test]
    fn descriptor_row_fills_blanks() {
        let row = descriptor_row(&ModuleDescriptor {
            name: "MMM-Foo".into(),
            ..ModuleDescriptor::default()
        });
        assert_eq!(row.longname, "");
        assert_eq!(row.desc, "");
    }
}
