//! Size-bounded, paginated report rendering.
//!
//! A report is an ordered list of [`ReportPage`]s. Every page body stays
//! within the byte budget of the [`PageBudget`] it was rendered with, long
//! item lists are split across pages, and a list that does not fit in the
//! page ceiling ends with an explicit truncation page instead of silently
//! losing items.

mod alert;
mod memory;
mod ports;
mod status;
mod temperature;

pub use alert::alert_page;
pub use memory::memory_report;
pub use ports::{ports_report, shorten_process_name};
pub use status::{status_page, StatusInfo};
pub use temperature::{status_tag, temperature_report};

use serde::Serialize;
use std::fmt;

const ELLIPSIS: &str = "...";

/// "page i of n" marker for multi-page reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageMarker {
    pub index: usize,
    pub total: usize,
}

impl fmt::Display for PageMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "page {} of {}", self.index, self.total)
    }
}

/// One bounded chunk of rendered report content
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportPage {
    pub title: String,
    pub body: String,
    pub marker: Option<PageMarker>,
}

impl ReportPage {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            marker: None,
        }
    }

    /// Page with its body cut down to `max_body_bytes`
    pub fn bounded(title: impl Into<String>, body: &str, max_body_bytes: usize) -> Self {
        Self::new(title, fit_to_budget(body, max_body_bytes))
    }

    /// User-visible error page for a failed on-demand request
    pub fn error(title: &str, err: &dyn fmt::Display) -> Self {
        Self::bounded(
            format!("Error: {}", title),
            &err.to_string(),
            PageBudget::default().max_body_bytes,
        )
    }

    /// Plain-text rendering used by the console and webhook sinks
    pub fn to_text(&self) -> String {
        match self.marker {
            Some(marker) => format!("{} ({})\n{}", self.title, marker, self.body),
            None => format!("{}\n{}", self.title, self.body),
        }
    }
}

/// Size ceilings applied while paginating
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageBudget {
    pub max_body_bytes: usize,
    pub max_items_per_page: usize,
    pub max_pages: usize,
}

impl Default for PageBudget {
    fn default() -> Self {
        Self {
            max_body_bytes: 1024,
            max_items_per_page: 25,
            max_pages: 10,
        }
    }
}

impl PageBudget {
    /// Narrower pages for port listings, whose lines carry full addresses
    pub fn ports() -> Self {
        Self {
            max_body_bytes: 1000,
            max_items_per_page: 6,
            max_pages: 12,
        }
    }

    fn normalized(&self) -> Self {
        Self {
            max_body_bytes: self.max_body_bytes,
            max_items_per_page: self.max_items_per_page.max(1),
            max_pages: self.max_pages.max(1),
        }
    }
}

/// Rendered report plus how many items made it onto pages
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub pages: Vec<ReportPage>,
    pub shown: usize,
    pub total: usize,
}

impl Report {
    pub fn single(page: ReportPage) -> Self {
        Self {
            pages: vec![page],
            shown: 0,
            total: 0,
        }
    }

    /// Items that did not fit within the page ceiling
    pub fn truncated(&self) -> usize {
        self.total - self.shown
    }
}

/// Cut `text` to at most `max_bytes`, ending in an ellipsis when shortened
/// and the budget leaves room for one
pub fn fit_to_budget(text: &str, max_bytes: usize) -> String {
    if text.len() <= max_bytes {
        return text.to_string();
    }
    if max_bytes <= ELLIPSIS.len() {
        return char_prefix(text, max_bytes).to_string();
    }
    format!("{}{}", char_prefix(text, max_bytes - ELLIPSIS.len()), ELLIPSIS)
}

fn char_prefix(text: &str, max_bytes: usize) -> &str {
    let mut end = max_bytes.min(text.len());
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

/// Append `line` to `body` only when the result stays within `max_bytes`
pub(crate) fn push_line_within(body: &mut String, line: &str, max_bytes: usize) -> bool {
    let needed = if body.is_empty() {
        line.len()
    } else {
        body.len() + 1 + line.len()
    };
    if needed > max_bytes {
        return false;
    }
    if !body.is_empty() {
        body.push('\n');
    }
    body.push_str(line);
    true
}

/// Splits a list of items into bounded pages
pub struct Paginator {
    title: String,
    budget: PageBudget,
    empty_message: String,
}

impl Paginator {
    pub fn new(title: impl Into<String>, budget: &PageBudget) -> Self {
        Self {
            title: title.into(),
            budget: budget.normalized(),
            empty_message: "Nothing to report".to_string(),
        }
    }

    pub fn empty_message(mut self, message: impl Into<String>) -> Self {
        self.empty_message = message.into();
        self
    }

    /// Lay `items` out across pages and finish with the summary page.
    ///
    /// The summary page is always appended, after the truncation page when
    /// one is needed.
    pub fn paginate<T, F>(&self, items: &[T], format_item: F, summary: ReportPage) -> Report
    where
        F: Fn(&T) -> String,
    {
        let max_bytes = self.budget.max_body_bytes;
        let mut bodies: Vec<String> = Vec::new();
        let mut current = String::new();
        let mut count = 0usize;
        let mut shown = 0usize;

        for item in items {
            let line = fit_to_budget(&format_item(item), max_bytes);
            let needed = if count == 0 {
                line.len()
            } else {
                current.len() + 1 + line.len()
            };

            if count > 0 && (needed > max_bytes || count >= self.budget.max_items_per_page) {
                bodies.push(std::mem::take(&mut current));
                count = 0;
            }
            if count == 0 && bodies.len() >= self.budget.max_pages {
                break;
            }

            if count > 0 {
                current.push('\n');
            }
            current.push_str(&line);
            count += 1;
            shown += 1;
        }
        if count > 0 {
            bodies.push(current);
        }
        if items.is_empty() {
            bodies.push(fit_to_budget(&self.empty_message, max_bytes));
        }

        let total_pages = bodies.len();
        let mut pages: Vec<ReportPage> = bodies
            .into_iter()
            .enumerate()
            .map(|(i, body)| ReportPage {
                title: self.title.clone(),
                body,
                marker: (total_pages > 1).then_some(PageMarker {
                    index: i + 1,
                    total: total_pages,
                }),
            })
            .collect();

        if shown < items.len() {
            log::debug!("{}: page ceiling reached, {} of {} shown", self.title, shown, items.len());
            pages.push(ReportPage::bounded(
                "Truncated",
                &format!("Truncated: showing {} of {} items", shown, items.len()),
                max_bytes,
            ));
        }

        pages.push(ReportPage {
            body: fit_to_budget(&summary.body, max_bytes),
            marker: None,
            ..summary
        });

        Report {
            pages,
            shown,
            total: items.len(),
        }
    }
}
