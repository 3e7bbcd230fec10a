use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::dashboard::controls::{SelectOption, SliderMark};

/// What a button does when pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ButtonAction {
    ResetFilters,
    DownloadData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeSliderSpec {
    pub id: String,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub value: [f64; 2],
    pub marks: Vec<SliderMark>,
}

/// Declarative page tree. Rendered to HTML or served as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Widget {
    Container {
        id: Option<String>,
        class: String,
        children: Vec<Widget>,
    },
    Image {
        src: String,
        alt: String,
    },
    Heading {
        level: u8,
        text: String,
    },
    Label {
        text: String,
        target: String,
    },
    Paragraph {
        text: String,
    },
    RadioItems {
        id: String,
        options: Vec<SelectOption>,
        value: String,
    },
    DatePickerRange {
        id: String,
        min_date_allowed: NaiveDate,
        max_date_allowed: NaiveDate,
        start_date: NaiveDate,
        end_date: NaiveDate,
    },
    RangeSlider(RangeSliderSpec),
    Dropdown {
        id: String,
        options: Vec<SelectOption>,
        value: Vec<String>,
        multi: bool,
        hidden: bool,
    },
    Button {
        id: String,
        text: String,
        action: ButtonAction,
    },
    Download {
        id: String,
        href: String,
    },
}

impl Widget {
    pub fn container(class: &str, children: Vec<Widget>) -> Self {
        Widget::Container {
            id: None,
            class: class.to_string(),
            children,
        }
    }

    pub fn container_with_id(id: &str, class: &str, children: Vec<Widget>) -> Self {
        Widget::Container {
            id: Some(id.to_string()),
            class: class.to_string(),
            children,
        }
    }

    pub fn label(text: &str, target: &str) -> Self {
        Widget::Label {
            text: text.to_string(),
            target: target.to_string(),
        }
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            Widget::Container { id, .. } => id.as_deref(),
            Widget::RadioItems { id, .. }
            | Widget::DatePickerRange { id, .. }
            | Widget::Dropdown { id, .. }
            | Widget::Button { id, .. }
            | Widget::Download { id, .. } => Some(id.as_str()),
            Widget::RangeSlider(slider) => Some(slider.id.as_str()),
            _ => None,
        }
    }

    pub fn children(&self) -> &[Widget] {
        match self {
            Widget::Container { children, .. } => children,
            _ => &[],
        }
    }

    /// Depth-first search for the widget carrying `id`.
    pub fn find(&self, id: &str) -> Option<&Widget> {
        if self.id() == Some(id) {
            return Some(self);
        }
        self.children().iter().find_map(|child| child.find(id))
    }

    /// Every id in the tree, in document order.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids = Vec::new();
        self.collect_ids(&mut ids);
        ids
    }

    fn collect_ids<'a>(&'a self, ids: &mut Vec<&'a str>) {
        if let Some(id) = self.id() {
            ids.push(id);
        }
        for child in self.children() {
            child.collect_ids(ids);
        }
    }
}
