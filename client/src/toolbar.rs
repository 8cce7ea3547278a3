use wasm_bindgen::JsCast;
use web_sys::{Element, Event, HtmlInputElement};

pub const CLEAR_ID: &str = "clear";
pub const SUBMIT_ID: &str = "submit";
pub const STROKE_ID: &str = "stroke";
pub const LINE_WIDTH_ID: &str = "lineWidth";

#[derive(Debug, PartialEq)]
pub enum ToolbarClick {
    Clear,
    Submit,
}

#[derive(Debug, PartialEq)]
pub enum ToolbarChange {
    StrokeColor(String),
    LineWidth(f64),
}

/// Button presses on the toolbar.
pub fn click_action(target_id: &str) -> Option<ToolbarClick> {
    match target_id {
        CLEAR_ID => Some(ToolbarClick::Clear),
        SUBMIT_ID => Some(ToolbarClick::Submit),
        _ => None,
    }
}

/// Input changes on the toolbar. A width that is not a positive number is
/// dropped so the previous width stays in effect.
pub fn change_action(target_id: &str, value: &str) -> Option<ToolbarChange> {
    match target_id {
        STROKE_ID => Some(ToolbarChange::StrokeColor(value.to_string())),
        LINE_WIDTH_ID => {
            let width = value.trim().parse::<f64>().ok()?;
            (width.is_finite() && width > 0.0).then_some(ToolbarChange::LineWidth(width))
        }
        _ => None,
    }
}

pub fn click_action_from_event(event: &Event) -> Option<ToolbarClick> {
    let target = event.target()?.dyn_into::<Element>().ok()?;
    click_action(&target.id())
}

pub fn change_action_from_event(event: &Event) -> Option<ToolbarChange> {
    let input = event.target()?.dyn_into::<HtmlInputElement>().ok()?;
    change_action(&input.id(), &input.value())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clicks_map_to_buttons() {
        assert_eq!(click_action("clear"), Some(ToolbarClick::Clear));
        assert_eq!(click_action("submit"), Some(ToolbarClick::Submit));
        assert_eq!(click_action("toolbar"), None);
    }

    #[test]
    fn stroke_change_carries_the_color() {
        assert_eq!(
            change_action("stroke", "#ff0000"),
            Some(ToolbarChange::StrokeColor("#ff0000".into()))
        );
    }

    #[test]
    fn line_width_must_be_positive() {
        assert_eq!(change_action("lineWidth", "4"), Some(ToolbarChange::LineWidth(4.0)));
        assert_eq!(change_action("lineWidth", " 2.5 "), Some(ToolbarChange::LineWidth(2.5)));
        assert_eq!(change_action("lineWidth", "0"), None);
        assert_eq!(change_action("lineWidth", "-3"), None);
        assert_eq!(change_action("lineWidth", "wide"), None);
        assert_eq!(change_action("lineWidth", "NaN"), None);
    }

    #[test]
    fn unknown_inputs_are_ignored() {
        assert_eq!(change_action("opacity", "0.5"), None);
    }
}
