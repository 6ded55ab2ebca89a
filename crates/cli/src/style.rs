//! Terminal styling for merge reports.

use console::Style;

use trimerge_core::RegionType;

/// `msg` prefixed with a colored status mark.
fn marked(mark: &str, style: Style, msg: &str) -> String {
    format!("{} {}", style.apply_to(mark), msg)
}

/// Green check mark, for a clean merge or a file written.
pub fn success(msg: &str) -> String {
    marked("✓", Style::new().green(), msg)
}

/// Yellow warning sign, for conflicts left open.
pub fn warn(msg: &str) -> String {
    marked("⚠", Style::new().yellow(), msg)
}

/// Bold report title.
pub fn header(msg: &str) -> String {
    Style::new().bold().apply_to(msg).to_string()
}

/// Dimmed secondary text such as the region summary line.
pub fn dim(msg: &str) -> String {
    Style::new().dim().apply_to(msg).to_string()
}

/// Colored label for a region type.
pub fn region_type(region_type: RegionType) -> String {
    let style = match region_type {
        RegionType::Unchanged => Style::new().dim(),
        RegionType::OursOnly => Style::new().blue(),
        RegionType::TheirsOnly => Style::new().green(),
        RegionType::Conflict => Style::new().red().bold(),
    };
    style.apply_to(region_type).to_string()
}
