//! Rendering of classified tables into Go source text.

use super::Blueprint;
use super::templates::{
    CONTROLLER_TEMPLATE, MODEL_TEMPLATE, NAMESPACE_TEMPLATE, READ_ONLY_MODEL_TEMPLATE,
    ROUTER_TEMPLATE,
};
use crate::models::{Column, RelationKind, Table, Tag};
use crate::naming::route_segment;

/// Import line spliced into an existing import block
const TIME_IMPORT: &str = "\"time\"\n";

/// Standalone import statement
const TIME_IMPORT_STATEMENT: &str = "import \"time\"\n";

/// Renders the struct tag of a field.
///
/// Options are emitted in a fixed order and joined with `;`. The JSON name
/// is always the source column name.
pub fn render_tag(tag: &Tag) -> String {
    let mut options = Vec::new();

    if !tag.column.is_empty() {
        options.push(format!("column({})", tag.column));
    }
    if tag.auto_generated {
        options.push("auto".to_string());
    }
    if let Some(size) = &tag.size {
        options.push(format!("size({})", size));
    }
    if let Some(kind) = tag.temporal {
        options.push(format!("type({})", kind.as_str()));
    } else if let Some(native) = &tag.native_type {
        options.push(format!("type({})", native));
    }
    if tag.nullable {
        options.push("null".to_string());
    }
    if tag.auto_now {
        options.push("auto_now".to_string());
    }
    if tag.auto_now_add {
        options.push("auto_now_add".to_string());
    }
    if let Some(decimal) = &tag.decimal {
        options.push(format!("digits({});decimals({})", decimal.digits, decimal.scale));
    }
    if tag.relation == RelationKind::BelongsToForeignKey {
        options.push("rel(fk)".to_string());
    }
    if tag.primary_key_explicit {
        options.push("pk".to_string());
    }
    if tag.unique {
        options.push("unique".to_string());
    }
    if let Some(default_value) = &tag.default_value {
        options.push(format!("default({})", default_value));
    }

    if options.is_empty() {
        return String::new();
    }
    format!("`orm:\"{}\" json:\"{}\"`", options.join(";"), tag.column)
}

fn render_field(column: &Column) -> String {
    let tag = render_tag(&column.tag);
    if tag.is_empty() {
        format!("\t{} {}", column.name, column.field_type)
    } else {
        format!("\t{} {} {}", column.name, column.field_type, tag)
    }
}

/// Renders the struct declaration of a table.
///
/// ```rust
/// use dbscaffold_core::emit::render_struct;
/// use dbscaffold_core::models::{Table, TableConstraints};
///
/// let table = Table::new("audit_log", TableConstraints::default());
/// assert_eq!(render_struct(&table), "type AuditLog struct {\n}\n");
/// ```
pub fn render_struct(table: &Table) -> String {
    let mut rendered = format!("type {} struct {{\n", table.entity_name());
    for column in &table.columns {
        rendered.push_str(&render_field(column));
        rendered.push('\n');
    }
    rendered.push_str("}\n");
    rendered
}

/// Renders the model source of a table.
///
/// Tables without a usable primary key get the read-only template.
pub fn render_model(table: &Table, package_path: &str) -> String {
    let template = if table.has_primary_key() {
        MODEL_TEMPLATE
    } else {
        READ_ONLY_MODEL_TEMPLATE
    };
    let (time_pkg, import_time_pkg) = if table.imports_time {
        (TIME_IMPORT, TIME_IMPORT_STATEMENT)
    } else {
        ("", "")
    };

    let model_struct = render_struct(table);
    let model_name = table.entity_name();

    Blueprint::new(template)
        .fill_all(&[
            ("modelStruct", model_struct.as_str()),
            ("modelName", model_name.as_str()),
            ("tableName", table.name.as_str()),
            ("pkgPath", package_path),
            ("timePkg", time_pkg),
            ("importTimePkg", import_time_pkg),
        ])
        .into_string()
}

/// Renders the controller source of a table.
pub fn render_controller(table: &Table, package_path: &str) -> String {
    let ctrl_name = table.entity_name();
    Blueprint::new(CONTROLLER_TEMPLATE)
        .fill_all(&[("ctrlName", ctrl_name.as_str()), ("pkgPath", package_path)])
        .into_string()
}

/// Renders one namespace fragment of the router.
pub fn render_namespace(table: &Table) -> String {
    let name_space = route_segment(&table.name);
    let ctrl_name = table.entity_name();
    Blueprint::new(NAMESPACE_TEMPLATE)
        .fill_all(&[
            ("nameSpace", name_space.as_str()),
            ("ctrlName", ctrl_name.as_str()),
        ])
        .into_string()
}

/// Renders the router with one namespace per table that has a usable
/// primary key, in the order given.
pub fn render_router(tables: &[Table], package_path: &str) -> String {
    let namespaces: String = tables
        .iter()
        .filter(|table| table.has_primary_key())
        .map(render_namespace)
        .collect();

    Blueprint::new(ROUTER_TEMPLATE)
        .fill_all(&[("nameSpaces", namespaces.as_str()), ("pkgPath", package_path)])
        .into_string()
}
