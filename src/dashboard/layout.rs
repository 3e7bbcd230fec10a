use crate::analyzers::DatasetSummary;
use crate::config::LayoutConfig;
use crate::dashboard::controls::{
    depth_marks, graph_type_options, magnitude_marks, region_options, tab_options, FilterState,
};
use crate::dashboard::widgets::{ButtonAction, RangeSliderSpec, Widget};
use crate::utils::constants::{DEPTH_SLIDER_STEP, MAG_SLIDER_STEP};

pub const TAB_SELECTOR_ID: &str = "tab-selector";
pub const DATE_PICKER_ID: &str = "date-picker";
pub const MAG_SLIDER_ID: &str = "mag-slider";
pub const REGION_DROPDOWN_ID: &str = "region-dropdown";
pub const DEPTH_SLIDER_ID: &str = "depth-slider";
pub const RESET_BUTTON_ID: &str = "btn-reset";
pub const DOWNLOAD_BUTTON_ID: &str = "btn-download";
pub const DOWNLOAD_ID: &str = "download-data";
pub const GRAPH_SELECTOR_ID: &str = "graph-selector-dropdown";
pub const TAB_CONTENT_ID: &str = "tab-content";

pub const DOWNLOAD_HREF: &str = "/api/download";

/// Build the full page: header, sidebar control panel, content area.
///
/// A pure function of the summary and the static layout settings, so the
/// tree can be built once at startup and shared.
pub fn build_layout(summary: &DatasetSummary, config: &LayoutConfig) -> Widget {
    Widget::container(
        "dashboard",
        vec![
            header(config),
            Widget::container("main", vec![sidebar(summary, config), content()]),
        ],
    )
}

fn header(config: &LayoutConfig) -> Widget {
    Widget::container(
        "header",
        vec![
            Widget::Image {
                src: config.logo_src.clone(),
                alt: "Logo".to_string(),
            },
            Widget::Heading {
                level: 1,
                text: config.title.clone(),
            },
        ],
    )
}

fn sidebar(summary: &DatasetSummary, config: &LayoutConfig) -> Widget {
    let state = FilterState::defaults(summary);
    let (min_date, max_date) = summary.date_bounds();

    let mut children = vec![
        Widget::Heading {
            level: 2,
            text: "Controls".to_string(),
        },
        Widget::label("Select Tab:", TAB_SELECTOR_ID),
        Widget::RadioItems {
            id: TAB_SELECTOR_ID.to_string(),
            options: tab_options(),
            value: state.tab.value().to_string(),
        },
        Widget::label("Time Range:", DATE_PICKER_ID),
        Widget::DatePickerRange {
            id: DATE_PICKER_ID.to_string(),
            min_date_allowed: min_date,
            max_date_allowed: max_date,
            start_date: state.start_date,
            end_date: state.end_date,
        },
        Widget::label("Magnitude Range:", MAG_SLIDER_ID),
        Widget::RangeSlider(RangeSliderSpec {
            id: MAG_SLIDER_ID.to_string(),
            min: summary.mag_min,
            max: summary.mag_max,
            step: MAG_SLIDER_STEP,
            value: state.mag_range,
            marks: magnitude_marks(summary),
        }),
        Widget::label("Region:", REGION_DROPDOWN_ID),
        Widget::Dropdown {
            id: REGION_DROPDOWN_ID.to_string(),
            options: region_options(&summary.regions),
            value: state.regions.clone(),
            multi: true,
            hidden: false,
        },
        Widget::label("Depth Range:", DEPTH_SLIDER_ID),
        Widget::RangeSlider(RangeSliderSpec {
            id: DEPTH_SLIDER_ID.to_string(),
            min: summary.depth_min,
            max: summary.depth_max,
            step: DEPTH_SLIDER_STEP,
            value: state.depth_range,
            marks: depth_marks(summary),
        }),
        Widget::Button {
            id: RESET_BUTTON_ID.to_string(),
            text: "Reset Filters".to_string(),
            action: ButtonAction::ResetFilters,
        },
        Widget::Button {
            id: DOWNLOAD_BUTTON_ID.to_string(),
            text: "Download Data".to_string(),
            action: ButtonAction::DownloadData,
        },
        Widget::Download {
            id: DOWNLOAD_ID.to_string(),
            href: DOWNLOAD_HREF.to_string(),
        },
    ];

    if !config.credits.is_empty() {
        let credits = config
            .credits
            .iter()
            .map(|line| Widget::Paragraph { text: line.clone() })
            .collect();
        children.push(Widget::container("credits", credits));
    }

    Widget::container_with_id("sidebar", "sidebar", children)
}

fn content() -> Widget {
    Widget::container(
        "content",
        vec![
            // Declared for the extra graph views; kept out of sight until one is enabled.
            Widget::Dropdown {
                id: GRAPH_SELECTOR_ID.to_string(),
                options: graph_type_options(),
                value: vec!["none".to_string()],
                multi: false,
                hidden: true,
            },
            Widget::container_with_id(TAB_CONTENT_ID, "tab-content", Vec::new()),
        ],
    )
}
