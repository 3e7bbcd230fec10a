use crate::dashboard::controls::SelectOption;
use crate::dashboard::widgets::{RangeSliderSpec, Widget};
use crate::utils::constants::DOWNLOAD_FILENAME;

/// Render a complete HTML document around the widget tree.
pub fn render_page(title: &str, root: &Widget) -> String {
    let mut out = String::with_capacity(16 * 1024);
    out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    out.push_str("<meta charset=\"UTF-8\">\n");
    out.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n");
    out.push_str(&format!("<title>{}</title>\n", escape(title)));
    out.push_str("<style>");
    out.push_str(THEME_CSS);
    out.push_str("</style>\n</head>\n<body>\n");
    render_widget(root, &mut out);
    out.push_str("\n<script>");
    out.push_str(CONTROLS_JS);
    out.push_str("</script>\n</body>\n</html>\n");
    out
}

/// Render one widget (and its children) as an HTML fragment.
pub fn render_widget(widget: &Widget, out: &mut String) {
    match widget {
        Widget::Container {
            id,
            class,
            children,
        } => {
            out.push_str(&format!("<div class=\"{}\"", escape(class)));
            if let Some(id) = id {
                out.push_str(&format!(" id=\"{}\"", escape(id)));
            }
            out.push('>');
            for child in children {
                render_widget(child, out);
            }
            out.push_str("</div>\n");
        }
        Widget::Image { src, alt } => {
            out.push_str(&format!(
                "<img class=\"logo\" src=\"{}\" alt=\"{}\">",
                escape(src),
                escape(alt)
            ));
        }
        Widget::Heading { level, text } => {
            let level = (*level).clamp(1, 6);
            out.push_str(&format!("<h{level}>{}</h{level}>\n", escape(text)));
        }
        Widget::Label { text, target } => {
            out.push_str(&format!(
                "<label for=\"{}\">{}</label>\n",
                escape(target),
                escape(text)
            ));
        }
        Widget::Paragraph { text } => {
            out.push_str(&format!("<p>{}</p>\n", escape(text)));
        }
        Widget::RadioItems { id, options, value } => {
            out.push_str(&format!("<div class=\"radio-items\" id=\"{}\">", escape(id)));
            for option in options {
                out.push_str(&format!(
                    "<label><input type=\"radio\" name=\"{}\" value=\"{}\"{}{}> {}</label>",
                    escape(id),
                    escape(&option.value),
                    flag(option.value == *value, "checked"),
                    flag(!option.enabled, "disabled"),
                    escape(&option.label)
                ));
            }
            out.push_str("</div>\n");
        }
        Widget::DatePickerRange {
            id,
            min_date_allowed,
            max_date_allowed,
            start_date,
            end_date,
        } => {
            out.push_str(&format!("<div class=\"date-picker-range\" id=\"{}\">", escape(id)));
            for (name, value) in [("start_date", start_date), ("end_date", end_date)] {
                out.push_str(&format!(
                    "<input type=\"date\" name=\"{}\" min=\"{}\" max=\"{}\" value=\"{}\">",
                    name, min_date_allowed, max_date_allowed, value
                ));
            }
            out.push_str("</div>\n");
        }
        Widget::RangeSlider(slider) => render_slider(slider, out),
        Widget::Dropdown {
            id,
            options,
            value,
            multi,
            hidden,
        } => {
            out.push_str(&format!(
                "<select class=\"dropdown\" id=\"{}\" name=\"{}\"{}{}>",
                escape(id),
                escape(id),
                flag(*multi, "multiple"),
                flag(*hidden, "hidden")
            ));
            for option in options {
                render_option(option, value.contains(&option.value), out);
            }
            out.push_str("</select>\n");
        }
        Widget::Button { id, text, action } => {
            let action = serde_json::to_value(action)
                .ok()
                .and_then(|v| v.as_str().map(str::to_string))
                .unwrap_or_default();
            out.push_str(&format!(
                "<button type=\"button\" class=\"action\" id=\"{}\" data-action=\"{}\">{}</button>\n",
                escape(id),
                escape(&action),
                escape(text)
            ));
        }
        Widget::Download { id, href } => {
            out.push_str(&format!(
                "<a id=\"{}\" href=\"{}\" download=\"{}\" hidden></a>\n",
                escape(id),
                escape(href),
                DOWNLOAD_FILENAME
            ));
        }
    }
}

fn render_slider(slider: &RangeSliderSpec, out: &mut String) {
    out.push_str(&format!(
        "<div class=\"range-slider\" id=\"{}\" data-min=\"{}\" data-max=\"{}\" data-step=\"{}\">",
        escape(&slider.id),
        slider.min,
        slider.max,
        slider.step
    ));
    for (bound, value) in ["lower", "upper"].iter().zip(slider.value) {
        out.push_str(&format!(
            "<input type=\"range\" name=\"{}\" min=\"{}\" max=\"{}\" step=\"{}\" value=\"{}\">",
            bound, slider.min, slider.max, slider.step, value
        ));
    }
    out.push_str("<div class=\"slider-marks\">");
    for mark in &slider.marks {
        out.push_str(&format!(
            "<span data-value=\"{}\">{}</span>",
            mark.value,
            escape(&mark.label)
        ));
    }
    out.push_str("</div></div>\n");
}

fn render_option(option: &SelectOption, selected: bool, out: &mut String) {
    out.push_str(&format!(
        "<option value=\"{}\"{}{}>{}</option>",
        escape(&option.value),
        flag(selected, "selected"),
        flag(!option.enabled, "disabled"),
        escape(&option.label)
    ));
}

fn flag(on: bool, attribute: &str) -> String {
    if on {
        format!(" {}", attribute)
    } else {
        String::new()
    }
}

/// Escape text for use in element content and quoted attributes.
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

const THEME_CSS: &str = r#"
:root {
    --coral: #FF6F61;
    --orange: #FF8E53;
    --gold: #FFCC70;
    --text: #f4f4f4;
    --muted: #b8b8c8;
}
* { box-sizing: border-box; }
body {
    margin: 0;
    font-family: 'Segoe UI', Roboto, Arial, sans-serif;
    color: var(--text);
    background: linear-gradient(135deg, #1e1e2f 0%, #2a2a40 100%);
    min-height: 100vh;
}
.header {
    display: flex;
    align-items: center;
    gap: 16px;
    padding: 16px 24px;
    background: linear-gradient(90deg, var(--coral), var(--orange), var(--gold));
}
.header h1 { margin: 0; color: #1e1e2f; }
.logo { height: 56px; }
.main { display: flex; gap: 24px; padding: 24px; }
.sidebar {
    width: 320px;
    flex-shrink: 0;
    padding: 20px;
    border-radius: 12px;
    background: linear-gradient(180deg, #2b2b45 0%, #232336 100%);
    border: 1px solid var(--coral);
}
.sidebar h2 { margin-top: 0; color: var(--gold); }
.sidebar label { display: block; margin: 14px 0 6px; color: var(--muted); }
.radio-items label { display: block; margin: 4px 0; color: var(--text); }
.date-picker-range input, .dropdown { width: 100%; margin-bottom: 4px; }
.range-slider input { width: 100%; accent-color: var(--orange); }
.slider-marks { display: flex; justify-content: space-between; font-size: 0.75rem; color: var(--muted); }
.action {
    display: block;
    width: 100%;
    margin-top: 14px;
    padding: 10px;
    border: none;
    border-radius: 8px;
    font-weight: 600;
    cursor: pointer;
    color: #1e1e2f;
    background: linear-gradient(90deg, var(--coral), var(--orange));
}
.action:hover { background: linear-gradient(90deg, var(--orange), var(--gold)); }
.credits p { font-size: 0.8rem; color: var(--muted); }
.content {
    flex: 1;
    padding: 20px;
    border-radius: 12px;
    background: rgba(255, 255, 255, 0.04);
}
"#;

const CONTROLS_JS: &str = r#"
(function () {
    function setSlider(id, range) {
        var inputs = document.querySelectorAll('#' + id + ' input');
        if (inputs.length === 2) { inputs[0].value = range[0]; inputs[1].value = range[1]; }
    }
    function applyState(state) {
        var tab = document.querySelector('#tab-selector input[value="' + state.tab + '"]');
        if (tab) { tab.checked = true; }
        var dates = document.querySelectorAll('#date-picker input');
        if (dates.length === 2) { dates[0].value = state.start_date; dates[1].value = state.end_date; }
        setSlider('mag-slider', state.mag_range);
        setSlider('depth-slider', state.depth_range);
        var regions = document.getElementById('region-dropdown');
        if (regions) {
            Array.prototype.forEach.call(regions.options, function (o) {
                o.selected = state.regions.indexOf(o.value) !== -1;
            });
        }
    }
    document.querySelectorAll('button[data-action]').forEach(function (button) {
        button.addEventListener('click', function () {
            if (button.dataset.action === 'reset-filters') {
                fetch('/api/reset', { method: 'POST' })
                    .then(function (r) { return r.json(); })
                    .then(applyState);
            } else if (button.dataset.action === 'download-data') {
                var link = document.getElementById('download-data');
                if (link) { link.click(); }
            }
        });
    });
})();
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::controls::graph_type_options;
    use crate::dashboard::widgets::ButtonAction;

    #[test]
    fn test_escape() {
        assert_eq!(escape("a < b & \"c\""), "a &lt; b &amp; &quot;c&quot;");
        assert_eq!(escape("Nevada"), "Nevada");
    }

    #[test]
    fn test_page_contains_title() {
        let root = Widget::container(
            "header",
            vec![Widget::Heading {
                level: 1,
                text: "Quakes <live>".to_string(),
            }],
        );
        let html = render_page("Quakes <live>", &root);

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Quakes &lt;live&gt;</title>"));
        assert!(html.contains("<h1>Quakes &lt;live&gt;</h1>"));
        assert!(html.contains("#FF6F61"));
    }

    #[test]
    fn test_disabled_and_hidden_dropdown() {
        let widget = Widget::Dropdown {
            id: "graph-selector-dropdown".to_string(),
            options: graph_type_options(),
            value: vec!["none".to_string()],
            multi: false,
            hidden: true,
        };
        let mut html = String::new();
        render_widget(&widget, &mut html);

        assert!(html.contains(" hidden>"));
        assert!(!html.contains("multiple"));
        assert!(html.contains("<option value=\"none\" selected>None</option>"));
        assert!(html.contains("<option value=\"3d\" disabled>"));
        assert!(html.contains("<option value=\"risk\" disabled>"));
    }

    #[test]
    fn test_button_carries_action() {
        let widget = Widget::Button {
            id: "btn-reset".to_string(),
            text: "Reset Filters".to_string(),
            action: ButtonAction::ResetFilters,
        };
        let mut html = String::new();
        render_widget(&widget, &mut html);
        assert!(html.contains("data-action=\"reset-filters\""));
    }
}
